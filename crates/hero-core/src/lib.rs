#![forbid(unsafe_code)]

//! Core: shared model types, configuration, plan gating, and session context.
//!
//! # Role in My IEP Hero
//! `hero-core` is the bottom layer. It owns the item/message contracts that
//! the windowed renderer and the message search are generic over, the view
//! configuration loaded at startup, the subscription plan table, and the
//! lifecycle-scoped session context that replaces the old global role holder.
//!
//! # Primary responsibilities
//! - **Identified / Searchable**: stable-id and searchable-content contracts.
//! - **Message**: the conversation message record.
//! - **ViewConfig**: list/search defaults with env overrides and diagnostics.
//! - **Plan gating**: static feature table and upgrade hints per plan.
//! - **SessionContext**: explicit open/close of the active role.
//!
//! # How it fits in the system
//! `hero-text` provides the string primitives, `hero-runtime` the debouncer,
//! visibility observer, and composition root, and `hero-widgets` the windowed
//! list and search state built on top of the contracts defined here.

pub mod config;
pub mod identity;
pub mod logging;
pub mod message;
pub mod plan;
pub mod session;

pub use config::{ConfigError, ConfigParse, ViewConfig};
pub use identity::{Identified, Searchable};
pub use message::Message;
pub use plan::{PlanFeature, SubscriptionPlan, ToolAccess};
pub use session::{
    FileRoleStore, MemoryRoleStore, ParseRoleError, Role, RoleStore, SessionContext, SessionError,
};

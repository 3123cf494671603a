#![forbid(unsafe_code)]

//! Application context: the composition root.
//!
//! [`AppContext`] is created once at startup and owns everything that used
//! to be process-wide: the view configuration, the session (active role) and
//! the subscription plan. Components receive what they need from it
//! explicitly. [`AppContext::shutdown`] closes the session and returns the
//! role store, so teardown is as explicit as setup.

use std::fmt;
use std::time::Duration;

use hero_core::plan::{self, PlanFeature, SubscriptionPlan, ToolAccess};
use hero_core::{ConfigError, Role, RoleStore, SessionContext, SessionError, ViewConfig};

use crate::debounce::Debouncer;
use crate::visibility::VisibilityObserver;

/// Errors raised while building the context.
#[derive(Debug)]
pub enum ContextError {
    /// The view configuration violates its constraints.
    InvalidConfig(Vec<ConfigError>),
    /// The session could not be opened.
    Session(SessionError),
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(errors) => {
                write!(f, "invalid view configuration")?;
                for (i, err) in errors.iter().enumerate() {
                    let sep = if i == 0 { ": " } else { "; " };
                    write!(f, "{sep}{err}")?;
                }
                Ok(())
            }
            Self::Session(err) => write!(f, "failed to open session: {err}"),
        }
    }
}

impl std::error::Error for ContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidConfig(_) => None,
            Self::Session(err) => Some(err),
        }
    }
}

impl From<SessionError> for ContextError {
    fn from(err: SessionError) -> Self {
        Self::Session(err)
    }
}

/// Lifecycle-scoped application state.
#[derive(Debug)]
pub struct AppContext<S: RoleStore> {
    config: ViewConfig,
    session: SessionContext<S>,
    plan: SubscriptionPlan,
}

impl<S: RoleStore> AppContext<S> {
    /// Validate `config`, open the session on `store`, and adopt `plan`.
    pub fn init(config: ViewConfig, store: S, plan: SubscriptionPlan) -> Result<Self, ContextError> {
        config.validate().map_err(ContextError::InvalidConfig)?;
        let session = SessionContext::open(store)?;
        tracing::info!(
            plan = plan.as_str(),
            config = %config.summary_short(),
            "app context initialized"
        );
        Ok(Self {
            config,
            session,
            plan,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> &SessionContext<S> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionContext<S> {
        &mut self.session
    }

    /// Shorthand for the session's active role.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.session.role()
    }

    #[must_use]
    pub fn plan(&self) -> SubscriptionPlan {
        self.plan
    }

    /// Adopt a new plan (after checkout or a billing refresh).
    pub fn set_plan(&mut self, plan: SubscriptionPlan) {
        if plan != self.plan {
            tracing::info!(from = self.plan.as_str(), to = plan.as_str(), "plan changed");
            self.plan = plan;
        }
    }

    /// Whether the current plan grants `feature`.
    #[must_use]
    pub fn has_feature(&self, feature: PlanFeature) -> bool {
        plan::has_feature_access(self.plan, feature)
    }

    /// Access decision for `feature` under the current plan.
    #[must_use]
    pub fn check_tool_access(&self, feature: PlanFeature) -> ToolAccess {
        plan::check_tool_access(self.plan, feature)
    }

    /// A debouncer with the configured search quiet period.
    #[must_use]
    pub fn search_debouncer<T>(&self) -> Debouncer<T> {
        Debouncer::new(self.config.search_debounce)
    }

    /// A debouncer with an explicit quiet period.
    #[must_use]
    pub fn debouncer<T>(&self, delay: Duration) -> Debouncer<T> {
        Debouncer::new(delay)
    }

    /// A fresh visibility observer for a list sentinel.
    #[must_use]
    pub fn visibility_observer(&self) -> VisibilityObserver {
        VisibilityObserver::new()
    }

    /// Close the session and hand back the role store.
    pub fn shutdown(self) -> S {
        tracing::info!(plan = self.plan.as_str(), "app context shutting down");
        self.session.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hero_core::{FileRoleStore, MemoryRoleStore};
    use tracing_test::traced_test;

    #[test]
    fn init_with_defaults() {
        let ctx = AppContext::init(
            ViewConfig::default(),
            MemoryRoleStore::with_role(Role::Parent),
            SubscriptionPlan::Free,
        )
        .expect("valid context");
        assert_eq!(ctx.role(), Some(Role::Parent));
        assert_eq!(ctx.plan(), SubscriptionPlan::Free);
        assert_eq!(ctx.config().overscan, 5);
        assert_eq!(ctx.search_debouncer::<String>().delay(), Duration::from_millis(300));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ViewConfig::default().with_item_height(0.0).with_container_height(-1.0);
        let err = AppContext::init(config, MemoryRoleStore::new(), SubscriptionPlan::Basic)
            .expect_err("invalid");
        match &err {
            ContextError::InvalidConfig(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with("invalid view configuration: "));
    }

    #[test]
    fn corrupt_session_surfaces_as_session_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"[").expect("write");
        let err = AppContext::init(
            ViewConfig::default(),
            FileRoleStore::new(&path),
            SubscriptionPlan::Free,
        )
        .expect_err("corrupt");
        assert!(matches!(err, ContextError::Session(SessionError::Corrupt(_))));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn plan_changes_gate_features() {
        let mut ctx = AppContext::init(
            ViewConfig::default(),
            MemoryRoleStore::new(),
            SubscriptionPlan::Free,
        )
        .expect("valid context");

        let gated = PlanFeature::ALL
            .iter()
            .copied()
            .find(|f| f.minimum_plan() == Some(SubscriptionPlan::Hero))
            .expect("some feature needs the top plan");
        assert!(!ctx.has_feature(gated));
        assert_eq!(
            ctx.check_tool_access(gated).upgrade_required(),
            Some(SubscriptionPlan::Hero)
        );

        ctx.set_plan(SubscriptionPlan::Hero);
        assert!(ctx.has_feature(gated));
        assert!(ctx.check_tool_access(gated).is_granted());
    }

    #[traced_test]
    #[test]
    fn shutdown_returns_store_with_role() {
        let mut ctx = AppContext::init(
            ViewConfig::default(),
            MemoryRoleStore::new(),
            SubscriptionPlan::Plus,
        )
        .expect("valid context");
        ctx.session_mut().set_role(Role::Advocate).expect("set role");

        let store = ctx.shutdown();
        assert_eq!(store.persisted(), Some(Role::Advocate));
        assert!(logs_contain("app context shutting down"));
    }
}

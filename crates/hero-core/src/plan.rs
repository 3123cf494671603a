#![forbid(unsafe_code)]

//! Subscription plans and feature gating.
//!
//! Plans are totally ordered (`Free < Basic < Plus < Premium < Hero`) and
//! every feature is unlocked at a single minimum plan, so the whole gating
//! table reduces to [`PlanFeature::minimum_plan`]. Features that no plan
//! offers yet return `None` there and always report [`ToolAccess::Unavailable`].
//!
//! # Invariants
//!
//! 1. Access is monotonic: if a plan grants a feature, every higher plan does.
//! 2. [`check_tool_access`] names the lowest plan that grants the feature.
//! 3. [`SubscriptionPlan::normalize`] never fails; unknown input maps to `Free`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A subscription tier.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    #[default]
    Free,
    Basic,
    Plus,
    Premium,
    Hero,
}

impl SubscriptionPlan {
    /// All plans in ascending order.
    pub const ALL: [SubscriptionPlan; 5] = [
        SubscriptionPlan::Free,
        SubscriptionPlan::Basic,
        SubscriptionPlan::Plus,
        SubscriptionPlan::Premium,
        SubscriptionPlan::Hero,
    ];

    /// Stable lowercase identifier (matches the billing backend).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Basic => "basic",
            Self::Plus => "plus",
            Self::Premium => "premium",
            Self::Hero => "hero",
        }
    }

    /// Name shown in upgrade prompts.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Basic => "Basic",
            Self::Plus => "Plus",
            Self::Premium => "Premium",
            Self::Hero => "Hero Family Pack",
        }
    }

    /// Route of the plan-specific parent dashboard.
    #[must_use]
    pub fn dashboard_route(self) -> String {
        format!("/parent/dashboard-{}", self.as_str())
    }

    /// Normalize a raw plan name from the billing backend.
    ///
    /// Case and whitespace are ignored; the hero family pack aliases map to
    /// `Hero`; anything unrecognized (or absent) maps to `Free`.
    #[must_use]
    pub fn normalize(raw: Option<&str>) -> SubscriptionPlan {
        let Some(raw) = raw else {
            return Self::Free;
        };
        let normalized: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "herofamilypack" | "hero-family-pack" | "hero_family_pack" | "hero" => Self::Hero,
            "premium" => Self::Premium,
            "plus" => Self::Plus,
            "basic" => Self::Basic,
            _ => Self::Free,
        }
    }

    /// Whether a user on `self` must upgrade to reach `required`.
    #[must_use]
    pub fn should_show_upgrade(self, required: SubscriptionPlan) -> bool {
        self < required
    }

    /// Usage and support limits for this plan.
    #[must_use]
    pub const fn limits(self) -> PlanLimits {
        match self {
            Self::Free => PlanLimits {
                storage_limit: "Community access only",
                support_level: "Community forum",
                priority_support: false,
                max_children: 1,
                max_documents: 5,
                ai_analysis_limit: 0,
                letter_generation_limit: 2,
            },
            Self::Basic => PlanLimits {
                storage_limit: "2GB",
                support_level: "Email support",
                priority_support: false,
                max_children: 2,
                max_documents: 50,
                ai_analysis_limit: 5,
                letter_generation_limit: 10,
            },
            Self::Plus => PlanLimits {
                storage_limit: "5GB",
                support_level: "Priority email support",
                priority_support: true,
                max_children: 3,
                max_documents: 200,
                ai_analysis_limit: 15,
                letter_generation_limit: 25,
            },
            Self::Premium => PlanLimits {
                storage_limit: "10GB",
                support_level: "Priority email support",
                priority_support: true,
                max_children: 5,
                max_documents: 500,
                ai_analysis_limit: 50,
                letter_generation_limit: 100,
            },
            Self::Hero => PlanLimits {
                storage_limit: "Unlimited",
                support_level: "Priority phone & email support + monthly strategy calls",
                priority_support: true,
                max_children: 999,
                max_documents: 999_999,
                ai_analysis_limit: 999,
                letter_generation_limit: 999,
            },
        }
    }

    /// Features granted by this plan, in declaration order.
    pub fn features(self) -> impl Iterator<Item = PlanFeature> {
        PlanFeature::ALL
            .iter()
            .copied()
            .filter(move |feature| has_feature_access(self, *feature))
    }

    /// Number of enabled entitlements (features plus priority support).
    #[must_use]
    pub fn tool_count(self) -> usize {
        self.features().count() + usize::from(self.limits().priority_support)
    }
}

impl fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-plan usage limits. Monthly limits reset with the billing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanLimits {
    pub storage_limit: &'static str,
    pub support_level: &'static str,
    pub priority_support: bool,
    pub max_children: u32,
    pub max_documents: u32,
    /// AI analyses per month.
    pub ai_analysis_limit: u32,
    /// Generated letters per month.
    pub letter_generation_limit: u32,
}

macro_rules! plan_features {
    ($( $variant:ident => $key:literal, $min:expr; )*) => {
        /// A gated tool or feature.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum PlanFeature {
            $( #[serde(rename = $key)] $variant, )*
        }

        impl PlanFeature {
            /// Every feature, in table order.
            pub const ALL: &'static [PlanFeature] = &[ $( PlanFeature::$variant, )* ];

            /// Key used by the tools registry and the web client.
            #[must_use]
            pub const fn key(self) -> &'static str {
                match self {
                    $( PlanFeature::$variant => $key, )*
                }
            }

            /// Look a feature up by its registry key.
            #[must_use]
            pub fn from_key(key: &str) -> Option<PlanFeature> {
                match key {
                    $( $key => Some(PlanFeature::$variant), )*
                    _ => None,
                }
            }

            /// Lowest plan granting this feature, if any.
            #[must_use]
            pub const fn minimum_plan(self) -> Option<SubscriptionPlan> {
                use SubscriptionPlan::*;
                match self {
                    $( PlanFeature::$variant => $min, )*
                }
            }
        }
    };
}

plan_features! {
    // Parent dashboard
    GoalManagement => "goalManagement", Some(Basic);
    MeetingScheduler => "meetingScheduler", Some(Basic);
    AiInsights => "aiInsights", Some(Plus);
    ProgressAnalytics => "progressAnalytics", Some(Plus);
    StudentProfileManagement => "studentProfileManagement", Some(Free);
    SubscriptionManagement => "subscriptionManagement", Some(Free);
    // Analysis and review
    IepReviewTool => "iepReviewTool", Some(Basic);
    UnifiedIepReview => "unifiedIEPReview", Some(Plus);
    AskAiAboutDocs => "askAIAboutDocs", Some(Plus);
    ExpertAnalysis => "expertAnalysis", Some(Premium);
    AiIepReview => "aiIEPReview", Some(Plus);
    // Communication and documentation
    SmartLetterGenerator => "smartLetterGenerator", Some(Free);
    DocumentVault => "documentVault", Some(Basic);
    ParentMessages => "parentMessages", Some(Plus);
    CommunicationTracker => "communicationTracker", Some(Plus);
    ProgressNotes => "progressNotes", Some(Basic);
    // Meetings and planning
    MeetingPrepWizard => "meetingPrepWizard", Some(Basic);
    MeetingPrepAssistant => "meetingPrepAssistant", Some(Plus);
    ParentMeetingPrep => "parentMeetingPrep", Some(Plus);
    TimelineCalculator => "timelineCalculator", Some(Free);
    // Specialized support
    AccommodationBuilder => "accommodationBuilder", Some(Plus);
    AutismAccommodationBuilder => "autismAccommodationBuilder", Some(Premium);
    GiftedTwoeSupport => "giftedTwoeSupport", Some(Premium);
    Plan504Builder => "plan504Builder", Some(Plus);
    GoalGenerator => "goalGenerator", Some(Plus);
    OtActivityRecommender => "otActivityRecommender", Some(Premium);
    // Educational resources
    IdeaRightsGuide => "ideaRightsGuide", Some(Free);
    FerpaOverview => "ferpaOverview", Some(Free);
    Plan504Guide => "plan504Guide", Some(Basic);
    EmotionTracker => "emotionTracker", Some(Plus);
    ParentEmotionTracker => "parentEmotionTracker", Some(Plus);
    // Premium services
    HeroPlan => "heroPlan", Some(Hero);
    AdvocateMatchingTool => "advocateMatchingTool", Some(Plus);
    ExpertSupport => "expertSupport", Some(Hero);
    // Advocate tools for dual-role accounts
    ClientManagement => "clientManagement", Some(Hero);
    CaseAnalytics => "caseAnalytics", None;
    BillingTools => "billingTools", None;
    ScheduleManagement => "scheduleManagement", Some(Hero);
    TeamCollaboration => "teamCollaboration", None;
    ProfessionalAnalysis => "professionalAnalysis", Some(Hero);
    AdvocateMessaging => "advocateMessaging", Some(Hero);
    AdvocacyReports => "advocacyReports", None;
    CaseManagement => "caseManagement", Some(Hero);
    ProfessionalPlanning => "professionalPlanning", Some(Hero);
    ProfessionalResources => "professionalResources", Some(Hero);
    BusinessManagement => "businessManagement", None;
    SpecializedProfessionalTools => "specializedProfessionalTools", Some(Hero);
}

/// Outcome of a tool access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolAccess {
    /// The plan includes the tool.
    Granted,
    /// A higher plan includes the tool.
    UpgradeRequired {
        plan: SubscriptionPlan,
        message: String,
    },
    /// No current plan includes the tool.
    Unavailable { message: String },
}

impl ToolAccess {
    /// Whether access is granted.
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }

    /// The plan to upgrade to, if an upgrade would help.
    #[must_use]
    pub fn upgrade_required(&self) -> Option<SubscriptionPlan> {
        match self {
            Self::UpgradeRequired { plan, .. } => Some(*plan),
            _ => None,
        }
    }
}

/// Whether `plan` grants `feature`.
#[must_use]
pub fn has_feature_access(plan: SubscriptionPlan, feature: PlanFeature) -> bool {
    feature.minimum_plan().is_some_and(|min| plan >= min)
}

/// Check access to a tool and describe the upgrade path when denied.
#[must_use]
pub fn check_tool_access(plan: SubscriptionPlan, feature: PlanFeature) -> ToolAccess {
    match feature.minimum_plan() {
        Some(min) if plan >= min => ToolAccess::Granted,
        Some(min) => {
            tracing::debug!(
                feature = feature.key(),
                plan = plan.as_str(),
                required = min.as_str(),
                "tool gated behind upgrade"
            );
            ToolAccess::UpgradeRequired {
                plan: min,
                message: format!(
                    "This tool requires {} plan or higher.",
                    min.display_name()
                ),
            }
        }
        None => ToolAccess::Unavailable {
            message: "This tool is not available in any current plan.".to_string(),
        },
    }
}

//! Threat assessment analysis
//!
//! Pure computations over the fixture data: portfolio roll-ups, assessment
//! comparison, display projections, the clarification flow and printable
//! reports. Nothing here performs I/O except [`FixtureLoader`].

pub mod activity;
pub mod aggregation;
pub mod clarification;
pub mod comparison;
pub mod fixtures;
pub mod projection;
pub mod report;
pub mod selection;

#[cfg(test)]
pub(crate) mod testing;

pub use activity::{ApprovalFilter, ApprovalQueue, NotificationFeed, RemediationStats};
pub use aggregation::{
    application_summary, portfolio_stats, recent_assessments, trend_direction, PortfolioStats,
    SecurityGrade, SecurityPosture, Trend,
};
pub use clarification::{ClarificationFlow, FlowState};
pub use comparison::{compare_assessments, compare_by_id, AssessmentComparison, Bucket, Delta};
pub use fixtures::FixtureLoader;
pub use projection::{resolve_component_name, sort_threats, ThreatSortKey};
pub use selection::SelectionWindow;

pub mod dashboard;
pub mod error;
pub mod model;
pub mod severity;
pub mod threat;

pub use dashboard::{
    ApprovalSource, DashboardData, Notification, PendingApproval, Recommendation,
    RemediationItem, RemediationStatus, User,
};
pub use error::{Error, Result};
pub use model::{Application, Assessment, AssessmentStatus, IntakeType, ThreatStats};
pub use severity::{Severity, SeverityStyle};
pub use threat::{
    AttackPath, AttackStage, ClarificationQuestion, Component, ComponentType, DataFlow,
    DreadScore, ModelSummary, TargetApplication, Threat, ThreatModel,
};

//! Request and response bodies for the dashboard API

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use virantis_analysis::{
    activity::{NotificationGroup, RemediationStats},
    aggregation::{ApplicationSummary, RecentAssessment},
    projection::ResolvedThreat,
    ApprovalFilter, AssessmentComparison, ClarificationFlow, PortfolioStats, SecurityGrade,
    SecurityPosture, ThreatSortKey,
};
use virantis_common::{
    Application, AttackPath, PendingApproval, RemediationItem, ThreatStats, User,
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: Uuid,
    pub user: User,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioResponse<'a> {
    pub user: &'a User,
    pub stats: PortfolioStats,
    pub posture: SecurityPosture,
    /// 0-100, higher is better
    pub score: u32,
    pub grade: SecurityGrade,
    pub unread_notifications: usize,
    pub pending_reviews: usize,
}

#[derive(Debug, Serialize)]
pub struct ApplicationsResponse {
    pub applications: Vec<ApplicationSummary>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ApplicationResponse<'a> {
    pub application: &'a Application,
    pub summary: ApplicationSummary,
}

/// Query for `/compare`
#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    pub a: Option<String>,
    pub b: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecentAssessmentsResponse<'a> {
    pub assessments: Vec<RecentAssessment<'a>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SortQuery {
    #[serde(default)]
    pub sort: ThreatSortKey,
}

#[derive(Debug, Serialize)]
pub struct ThreatsResponse<'a> {
    pub threats: Vec<ResolvedThreat<'a>>,
    pub counts: ThreatStats,
}

#[derive(Debug, Serialize)]
pub struct AttackPathResponse<'a> {
    pub path: &'a AttackPath,
    pub nodes: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct NotificationsResponse<'a> {
    pub unread: usize,
    pub groups: Vec<NotificationGroup<'a>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApprovalQuery {
    #[serde(default)]
    pub filter: ApprovalFilter,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalsResponse<'a> {
    pub approvals: Vec<&'a PendingApproval>,
    pub needs_review: usize,
}

#[derive(Debug, Serialize)]
pub struct RemediationsResponse<'a> {
    pub items: &'a [RemediationItem],
    pub stats: RemediationStats,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRequest {
    pub assessment_id: String,
}

#[derive(Debug, Serialize)]
pub struct SelectionResponse<'a> {
    pub selected: Vec<String>,
    /// Present once two assessments are selected
    pub comparison: Option<AssessmentComparison<'a>>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct ClarificationResponse<'a> {
    pub id: Uuid,
    pub complete: bool,
    #[serde(flatten)]
    pub flow: &'a ClarificationFlow,
}

/// Generic acknowledgement
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

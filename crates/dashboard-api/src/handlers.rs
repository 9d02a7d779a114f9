//! API request handlers for the dashboard service

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;
use virantis_analysis::{
    aggregation::{application_summary, recent_assessments, severity_counts},
    activity::remediation_stats,
    compare_by_id,
    projection::{attack_path_nodes, find_application, find_assessment, resolve_threats},
    portfolio_stats,
    report::{generate_executive_summary, generate_threat_report, SummaryOptions},
    sort_threats, AssessmentComparison, SecurityGrade, SecurityPosture, SelectionWindow,
};
use virantis_common::{Application, Assessment, Error, User};

use crate::{
    models::{
        AnswerRequest, ApplicationResponse, ApplicationsResponse, ApprovalQuery,
        ApprovalsResponse, AttackPathResponse, ClarificationResponse, CompareQuery,
        LoginRequest, LoginResponse, NotificationsResponse, PortfolioResponse,
        RecentAssessmentsResponse, RemediationsResponse, SelectionRequest, SelectionResponse,
        SortQuery, StatusResponse, ThreatsResponse,
    },
    session::{Session, SessionRegistry},
    store::{FixtureStore, Workspace},
};

/// Assessments per application considered for the recent list
const RECENT_PER_APP: usize = 2;
const RECENT_LIMIT: usize = 5;

/// Shared application state
pub struct AppState {
    pub fixtures: FixtureStore,
    pub workspace: Mutex<Workspace>,
    pub sessions: Mutex<SessionRegistry>,
    /// Pause before the assistant replies in a clarification conversation
    pub response_delay: Duration,
}

impl AppState {
    pub fn new(fixtures: FixtureStore, response_delay: Duration) -> Self {
        let workspace = Workspace::seed(&fixtures);
        Self {
            fixtures,
            workspace: Mutex::new(workspace),
            sessions: Mutex::new(SessionRegistry::default()),
            response_delay,
        }
    }
}

/// API Error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        ApiError {
            status: StatusCode::UNAUTHORIZED,
            message: "Missing or invalid session token".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.message
        });

        (self.status, Json(body)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::InvalidComparison(_) | Error::InvalidTransition(_) => StatusCode::BAD_REQUEST,
            Error::DataIntegrity(_)
            | Error::JsonSerialization(_)
            | Error::Io(_)
            | Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        ApiError {
            status,
            message: err.to_string(),
        }
    }
}

type JsonResult = Result<Json<serde_json::Value>, ApiError>;

/// Serialize a response that borrows from the shared state
fn to_json<T: Serialize>(value: &T) -> JsonResult {
    serde_json::to_value(value)
        .map(Json)
        .map_err(|err| Error::from(err).into())
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "dashboard-api"
    }))
}

/// Sign in. Any non-empty email and password pair is accepted.
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = payload.email.trim();
    if email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    info!("Signing in {}", email);

    let profile = &state.fixtures.dashboard().user;
    let user = if profile.email.eq_ignore_ascii_case(email) {
        profile.clone()
    } else {
        User {
            name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            role: profile.role.clone(),
        }
    };

    let token = state.sessions.lock().await.create(user.clone());

    Ok(Json(LoginResponse { token, user }))
}

/// Sign out and drop everything owned by the session
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Json<StatusResponse> {
    info!("Signing out {}", session.user.email);

    state.sessions.lock().await.remove(&session.token);
    state.workspace.lock().await.end_session(session.token);

    Json(StatusResponse {
        success: true,
        message: "Signed out".to_string(),
    })
}

/// Headline numbers for the dashboard
pub async fn portfolio_handler(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> JsonResult {
    let applications = &state.fixtures.dashboard().applications;
    let stats = portfolio_stats(applications);
    let posture = SecurityPosture::classify(stats.critical_issues, stats.high_issues);
    let score = (100.0 - stats.avg_risk_score).round().clamp(0.0, 100.0) as u32;

    let workspace = state.workspace.lock().await;
    let response = PortfolioResponse {
        user: &session.user,
        grade: SecurityGrade::from_score(score),
        score,
        stats,
        posture,
        unread_notifications: workspace.notifications.unread_count(),
        pending_reviews: workspace.approvals.needs_review(),
    };

    to_json(&response)
}

pub async fn list_applications_handler(
    State(state): State<Arc<AppState>>,
    _session: Session,
) -> Json<ApplicationsResponse> {
    let applications: Vec<_> = state
        .fixtures
        .dashboard()
        .applications
        .iter()
        .map(application_summary)
        .collect();
    let total = applications.len();

    Json(ApplicationsResponse {
        applications,
        total,
    })
}

pub async fn get_application_handler(
    State(state): State<Arc<AppState>>,
    _session: Session,
    Path(app_id): Path<String>,
) -> JsonResult {
    info!("Getting application: {}", app_id);

    let application = find_application(state.fixtures.dashboard(), &app_id)?;
    let response = ApplicationResponse {
        application,
        summary: application_summary(application),
    };

    to_json(&response)
}

pub async fn get_assessment_handler(
    State(state): State<Arc<AppState>>,
    _session: Session,
    Path((app_id, assessment_id)): Path<(String, String)>,
) -> Result<Json<Assessment>, ApiError> {
    info!("Getting assessment {} of {}", assessment_id, app_id);

    let application = find_application(state.fixtures.dashboard(), &app_id)?;
    let assessment = find_assessment(application, &assessment_id)?;

    Ok(Json(assessment.clone()))
}

/// Compare two assessments of one application, given in either order
pub async fn compare_handler(
    State(state): State<Arc<AppState>>,
    _session: Session,
    Path(app_id): Path<String>,
    Query(query): Query<CompareQuery>,
) -> JsonResult {
    let (a, b) = match (query.a, query.b) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            return Err(ApiError::bad_request(
                "Query parameters 'a' and 'b' are required",
            ))
        }
    };

    info!("Comparing {} and {} for {}", a, b, app_id);

    let application = find_application(state.fixtures.dashboard(), &app_id)?;
    let comparison: AssessmentComparison<'_> = compare_by_id(application, &a, &b)?;

    to_json(&comparison)
}

pub async fn recent_assessments_handler(
    State(state): State<Arc<AppState>>,
    _session: Session,
) -> JsonResult {
    let assessments = recent_assessments(
        &state.fixtures.dashboard().applications,
        RECENT_PER_APP,
        RECENT_LIMIT,
    );

    to_json(&RecentAssessmentsResponse { assessments })
}

fn selection_response(application: &Application, window: &SelectionWindow) -> JsonResult {
    let selected: Vec<String> = window.selected().map(str::to_string).collect();
    let comparison = match window.pair() {
        Some((a, b)) => Some(compare_by_id(application, a, b)?),
        None => None,
    };

    to_json(&SelectionResponse {
        selected,
        comparison,
    })
}

/// Current comparison selection for an application
pub async fn get_selection_handler(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(app_id): Path<String>,
) -> JsonResult {
    let application = find_application(state.fixtures.dashboard(), &app_id)?;

    let mut workspace = state.workspace.lock().await;
    selection_response(application, workspace.selection(session.token, &application.id))
}

/// Toggle an assessment in the comparison selection
pub async fn toggle_selection_handler(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(app_id): Path<String>,
    Json(payload): Json<SelectionRequest>,
) -> JsonResult {
    let application = find_application(state.fixtures.dashboard(), &app_id)?;
    find_assessment(application, &payload.assessment_id)?;

    let mut workspace = state.workspace.lock().await;
    let window = workspace.selection(session.token, &application.id);
    window.toggle(payload.assessment_id);

    selection_response(application, window)
}

pub async fn threats_handler(
    State(state): State<Arc<AppState>>,
    _session: Session,
    Query(query): Query<SortQuery>,
) -> JsonResult {
    let model = state.fixtures.threat_model();
    let sorted = sort_threats(&model.threats, query.sort);

    to_json(&ThreatsResponse {
        threats: resolve_threats(&sorted, &model.components),
        counts: severity_counts(&model.threats),
    })
}

pub async fn attack_path_handler(
    State(state): State<Arc<AppState>>,
    _session: Session,
) -> JsonResult {
    let model = state.fixtures.threat_model();

    to_json(&AttackPathResponse {
        path: &model.attack_path,
        nodes: attack_path_nodes(&model.attack_path, &model.components),
    })
}

fn html_attachment(html: String, filename: &str) -> Response {
    (
        [(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", filename),
        )],
        Html(html),
    )
        .into_response()
}

/// Printable threat model report
pub async fn threat_report_handler(
    State(state): State<Arc<AppState>>,
    _session: Session,
) -> Response {
    info!("Generating threat model report");

    let html = generate_threat_report(state.fixtures.threat_model(), Utc::now().date_naive());
    html_attachment(html, "threat-model-report.html")
}

/// Printable executive summary
pub async fn executive_summary_handler(
    State(state): State<Arc<AppState>>,
    _session: Session,
    Query(options): Query<SummaryOptions>,
) -> Response {
    info!("Generating executive summary");

    let html = generate_executive_summary(
        &state.fixtures.dashboard().applications,
        state.fixtures.threat_model(),
        options,
        Utc::now().date_naive(),
    );
    html_attachment(html, "executive-summary.html")
}

pub async fn notifications_handler(
    State(state): State<Arc<AppState>>,
    _session: Session,
) -> JsonResult {
    let workspace = state.workspace.lock().await;
    let feed = &workspace.notifications;

    to_json(&NotificationsResponse {
        unread: feed.unread_count(),
        groups: feed.grouped(&state.fixtures.dashboard().applications),
    })
}

pub async fn mark_notification_read_handler(
    State(state): State<Arc<AppState>>,
    _session: Session,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.workspace.lock().await.notifications.mark_read(&id)?;

    Ok(Json(StatusResponse {
        success: true,
        message: format!("Notification marked as read: {}", id),
    }))
}

pub async fn mark_all_notifications_read_handler(
    State(state): State<Arc<AppState>>,
    _session: Session,
) -> Json<StatusResponse> {
    state.workspace.lock().await.notifications.mark_all_read();

    Json(StatusResponse {
        success: true,
        message: "All notifications marked as read".to_string(),
    })
}

pub async fn approvals_handler(
    State(state): State<Arc<AppState>>,
    _session: Session,
    Query(query): Query<ApprovalQuery>,
) -> JsonResult {
    let workspace = state.workspace.lock().await;

    to_json(&ApprovalsResponse {
        approvals: workspace.approvals.filtered(query.filter),
        needs_review: workspace.approvals.needs_review(),
    })
}

pub async fn dismiss_approval_handler(
    State(state): State<Arc<AppState>>,
    _session: Session,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    let dismissed = state.workspace.lock().await.approvals.dismiss(&id)?;
    info!("Dismissed approval {} ({})", dismissed.id, dismissed.title);

    Ok(Json(StatusResponse {
        success: true,
        message: format!("Approval dismissed: {}", id),
    }))
}

pub async fn remediations_handler(
    State(state): State<Arc<AppState>>,
    _session: Session,
) -> JsonResult {
    let items = &state.fixtures.dashboard().remediations;

    to_json(&RemediationsResponse {
        items,
        stats: remediation_stats(items),
    })
}

/// Open a new clarification conversation
pub async fn start_clarification_handler(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let mut workspace = state.workspace.lock().await;
    let (id, flow) = workspace.start_clarification(session.token, &state.fixtures);

    info!("Started clarification {}", id);

    let body = to_json(&ClarificationResponse {
        id,
        complete: flow.is_complete(),
        flow,
    })?;

    Ok((StatusCode::CREATED, body))
}

pub async fn get_clarification_handler(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<Uuid>,
) -> JsonResult {
    let workspace = state.workspace.lock().await;
    let flow = workspace.clarification(session.token, id)?;

    to_json(&ClarificationResponse {
        id,
        complete: flow.is_complete(),
        flow,
    })
}

/// Answer the current question. The reply is held back by the configured
/// response delay after the answer has been recorded.
pub async fn answer_clarification_handler(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<AnswerRequest>,
) -> JsonResult {
    let response = {
        let mut workspace = state.workspace.lock().await;
        let flow = workspace.clarification_mut(session.token, id)?;
        if let Err(err) = flow.answer(payload.answer) {
            warn!("Rejected answer for clarification {}: {}", id, err);
            return Err(err.into());
        }

        to_json(&ClarificationResponse {
            id,
            complete: flow.is_complete(),
            flow,
        })?
    };

    if !state.response_delay.is_zero() {
        tokio::time::sleep(state.response_delay).await;
    }

    Ok(response)
}

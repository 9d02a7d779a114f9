//! Roll-up statistics across applications and assessment snapshots

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use virantis_common::{Application, Assessment, Severity, Threat, ThreatStats};

/// Direction of risk between two snapshots. `Up` means more threats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    /// Classify a signed change
    pub fn from_delta(delta: i64) -> Self {
        match delta {
            d if d > 0 => Self::Up,
            d if d < 0 => Self::Down,
            _ => Self::Stable,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioStats {
    pub total_apps: usize,
    pub total_threats: u64,
    pub critical_issues: u64,
    pub high_issues: u64,
    /// Mean of [`Severity::risk_score`] over every application's risk level
    pub avg_risk_score: f64,
}

/// Compute portfolio-wide statistics. Empty input yields all-zero stats.
pub fn portfolio_stats(applications: &[Application]) -> PortfolioStats {
    if applications.is_empty() {
        return PortfolioStats::default();
    }

    let mut stats = PortfolioStats {
        total_apps: applications.len(),
        ..PortfolioStats::default()
    };

    let mut risk_sum = 0.0;
    for app in applications {
        stats.total_threats += u64::from(app.derived_total_threats());
        if let Some(latest) = app.latest_assessment() {
            stats.critical_issues += u64::from(latest.threats.critical);
            stats.high_issues += u64::from(latest.threats.high);
        }
        risk_sum += app.risk_level.risk_score();
    }
    stats.avg_risk_score = risk_sum / applications.len() as f64;

    stats
}

/// Compare the two most recent assessments by total threat count.
///
/// Input order doesn't matter; the sequence is re-sorted newest first.
pub fn trend_direction(assessments: &[Assessment]) -> Trend {
    if assessments.len() < 2 {
        return Trend::Stable;
    }

    let mut sorted: Vec<&Assessment> = assessments.iter().collect();
    sorted.sort_by(|a, b| b.chronological_cmp(a));

    let current = i64::from(sorted[0].threats.total);
    let previous = i64::from(sorted[1].threats.total);
    Trend::from_delta(current - previous)
}

/// Per-application view used by the portfolio listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSummary {
    pub id: String,
    pub name: String,
    pub risk_level: Severity,
    pub total_threats: u32,
    pub latest: Option<ThreatStats>,
    pub trend: Trend,
    pub assessment_count: usize,
    pub last_assessed: DateTime<Utc>,
}

pub fn application_summary(app: &Application) -> ApplicationSummary {
    ApplicationSummary {
        id: app.id.clone(),
        name: app.name.clone(),
        risk_level: app.risk_level,
        total_threats: app.derived_total_threats(),
        latest: app.latest_assessment().map(|a| a.threats),
        trend: trend_direction(&app.assessments),
        assessment_count: app.assessments.len(),
        last_assessed: app.last_assessed,
    }
}

/// An assessment tagged with the application it belongs to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentAssessment<'a> {
    pub app_id: &'a str,
    pub app_name: &'a str,
    #[serde(flatten)]
    pub assessment: &'a Assessment,
}

/// Take each application's `per_app` newest assessments, merge them newest
/// first and keep at most `limit`.
pub fn recent_assessments(
    applications: &[Application],
    per_app: usize,
    limit: usize,
) -> Vec<RecentAssessment<'_>> {
    let mut recent: Vec<RecentAssessment<'_>> = applications
        .iter()
        .flat_map(|app| {
            app.assessments_newest_first()
                .into_iter()
                .take(per_app)
                .map(move |assessment| RecentAssessment {
                    app_id: &app.id,
                    app_name: &app.name,
                    assessment,
                })
        })
        .collect();

    recent.sort_by(|a, b| b.assessment.chronological_cmp(a.assessment));
    recent.truncate(limit);
    recent
}

/// Count threats by severity. Unknown severities only contribute to `total`.
pub fn severity_counts(threats: &[Threat]) -> ThreatStats {
    let mut stats = ThreatStats::default();
    for threat in threats {
        stats.total += 1;
        match threat.severity {
            Severity::Critical => stats.critical += 1,
            Severity::High => stats.high += 1,
            Severity::Medium => stats.medium += 1,
            Severity::Low => stats.low += 1,
            Severity::Unknown => {}
        }
    }
    stats
}

/// Overall security posture for the executive summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityPosture {
    Critical,
    HighRisk,
    Moderate,
    Good,
}

impl SecurityPosture {
    pub fn classify(critical: u64, high: u64) -> Self {
        if critical > 2 {
            Self::Critical
        } else if critical > 0 || high > 5 {
            Self::HighRisk
        } else if high > 0 {
            Self::Moderate
        } else {
            Self::Good
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::HighRisk => "High Risk",
            Self::Moderate => "Moderate",
            Self::Good => "Good",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Critical => "#ef4444",
            Self::HighRisk => "#f97316",
            Self::Moderate => "#f59e0b",
            Self::Good => "#10b981",
        }
    }
}

/// Letter grade for a 0-100 security score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SecurityGrade {
    pub grade: &'static str,
    pub label: &'static str,
}

impl SecurityGrade {
    pub fn from_score(score: u32) -> Self {
        let (grade, label) = match score {
            s if s >= 90 => ("A", "Excellent"),
            s if s >= 80 => ("A-", "Very Good"),
            s if s >= 70 => ("B+", "Good"),
            s if s >= 60 => ("B", "Moderate"),
            s if s >= 50 => ("C", "Fair"),
            _ => ("D", "Needs Work"),
        };
        Self { grade, label }
    }
}

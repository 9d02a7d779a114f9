//! Severity levels shared by threats, assessments and applications

use serde::{Deserialize, Serialize};

/// Severity of a threat, or the overall risk level of an assessment/application.
///
/// Strings that don't name a known level decode to `Unknown` so fixtures with
/// unexpected values still load; every lookup below handles that arm explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    #[serde(other)]
    Unknown,
}

/// Display attributes for a severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeverityStyle {
    pub label: &'static str,
    /// Hex colour used in printed reports
    pub color: &'static str,
    /// Badge class consumed by the UI
    pub badge: &'static str,
}

impl Severity {
    /// Sort rank: critical first, unknown last
    pub fn rank(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
            Self::Unknown => 4,
        }
    }

    /// Numeric proxy used when averaging risk levels across a portfolio (0-100)
    pub fn risk_score(self) -> f64 {
        match self {
            Self::Critical => 90.0,
            Self::High => 70.0,
            Self::Medium => 45.0,
            Self::Low => 20.0,
            Self::Unknown => 0.0,
        }
    }

    pub fn style(self) -> SeverityStyle {
        match self {
            Self::Critical => SeverityStyle {
                label: "Critical",
                color: "#ef4444",
                badge: "badge-critical",
            },
            Self::High => SeverityStyle {
                label: "High",
                color: "#f97316",
                badge: "badge-high",
            },
            Self::Medium => SeverityStyle {
                label: "Medium",
                color: "#f59e0b",
                badge: "badge-medium",
            },
            Self::Low => SeverityStyle {
                label: "Low",
                color: "#22c55e",
                badge: "badge-low",
            },
            Self::Unknown => SeverityStyle {
                label: "Info",
                color: "#71717a",
                badge: "badge-info",
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.style().label)
    }
}

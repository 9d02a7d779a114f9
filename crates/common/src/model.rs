//! Application and assessment records

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Severity;

/// How the system under assessment was supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntakeType {
    Image,
    Repo,
    Document,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    Completed,
    InProgress,
    Failed,
    #[serde(other)]
    Unknown,
}

/// Threat counts for one assessment snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatStats {
    pub total: u32,
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

impl ThreatStats {
    /// Stats whose total is the bucket sum, saturating at `u32::MAX`
    pub fn new(critical: u32, high: u32, medium: u32, low: u32) -> Self {
        Self {
            total: critical
                .saturating_add(high)
                .saturating_add(medium)
                .saturating_add(low),
            critical,
            high,
            medium,
            low,
        }
    }

    /// Sum of the per-severity buckets, widened so it cannot overflow
    pub fn bucket_sum(&self) -> u64 {
        [self.critical, self.high, self.medium, self.low]
            .iter()
            .map(|&n| u64::from(n))
            .sum()
    }

    /// `total` agrees with the per-severity buckets
    pub fn is_consistent(&self) -> bool {
        u64::from(self.total) == self.bucket_sum()
    }
}

/// One point-in-time threat-modeling run against an application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: String,
    pub date: DateTime<Utc>,
    pub duration: String,
    pub methodology: String,
    pub intake_type: IntakeType,
    pub intake_file: String,
    pub status: AssessmentStatus,
    pub risk_level: Severity,
    pub threats: ThreatStats,
    /// Free-text summary of what changed since the previous run
    #[serde(default)]
    pub changes: String,
}

impl Assessment {
    /// Chronological order; equal dates fall back to the id so the order is total.
    pub fn chronological_cmp(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| self.id.cmp(&other.id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub last_assessed: DateTime<Utc>,
    pub risk_level: Severity,
    /// Stored count as supplied by the fixture. Prefer [`Application::derived_total_threats`].
    pub total_threats: u32,
    pub intake_type: IntakeType,
    pub intake_file: String,
    #[serde(default)]
    pub assessments: Vec<Assessment>,
}

impl Application {
    /// Most recent assessment by date, regardless of storage order
    pub fn latest_assessment(&self) -> Option<&Assessment> {
        self.assessments
            .iter()
            .max_by(|a, b| a.chronological_cmp(b))
    }

    /// Assessments ordered newest first
    pub fn assessments_newest_first(&self) -> Vec<&Assessment> {
        let mut sorted: Vec<&Assessment> = self.assessments.iter().collect();
        sorted.sort_by(|a, b| b.chronological_cmp(a));
        sorted
    }

    pub fn assessment(&self, assessment_id: &str) -> Option<&Assessment> {
        self.assessments.iter().find(|a| a.id == assessment_id)
    }

    /// Threat total taken from the latest assessment, falling back to the
    /// stored `total_threats` when there is no history.
    pub fn derived_total_threats(&self) -> u32 {
        self.latest_assessment()
            .map(|a| a.threats.total)
            .unwrap_or(self.total_threats)
    }
}

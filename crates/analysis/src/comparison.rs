//! Side-by-side comparison of two assessment snapshots of one application

use std::collections::BTreeMap;

use serde::Serialize;
use virantis_common::{Application, Assessment, Error, Result, ThreatStats};

use crate::aggregation::Trend;

/// Severity buckets that participate in a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Total,
    Critical,
    High,
    Medium,
}

impl Bucket {
    pub const ALL: [Bucket; 4] = [Bucket::Total, Bucket::Critical, Bucket::High, Bucket::Medium];

    pub fn count(self, stats: &ThreatStats) -> u32 {
        match self {
            Self::Total => stats.total,
            Self::Critical => stats.critical,
            Self::High => stats.high,
            Self::Medium => stats.medium,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Delta {
    pub value: i64,
    pub trend: Trend,
}

impl Delta {
    pub fn between(older: u32, newer: u32) -> Self {
        let value = i64::from(newer) - i64::from(older);
        Self {
            value,
            trend: Trend::from_delta(value),
        }
    }
}

/// An assessment together with the id of the application that owns it
#[derive(Debug, Clone, Copy)]
pub struct ScopedAssessment<'a> {
    pub application_id: &'a str,
    pub assessment: &'a Assessment,
}

impl<'a> ScopedAssessment<'a> {
    pub fn new(application: &'a Application, assessment: &'a Assessment) -> Self {
        Self {
            application_id: &application.id,
            assessment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentComparison<'a> {
    pub older: &'a Assessment,
    pub newer: &'a Assessment,
    pub deltas: BTreeMap<Bucket, Delta>,
}

/// Compare two snapshots of the same application.
///
/// The pair is re-ordered chronologically (equal dates fall back to the id),
/// so swapping the arguments yields the same result.
pub fn compare_assessments<'a>(
    a: Option<ScopedAssessment<'a>>,
    b: Option<ScopedAssessment<'a>>,
) -> Result<AssessmentComparison<'a>> {
    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            return Err(Error::InvalidComparison(
                "both assessments must be present".to_string(),
            ))
        }
    };

    if a.application_id != b.application_id {
        return Err(Error::InvalidComparison(format!(
            "assessments belong to different applications ('{}' and '{}')",
            a.application_id, b.application_id
        )));
    }

    if a.assessment.id == b.assessment.id {
        return Err(Error::InvalidComparison(format!(
            "cannot compare assessment '{}' with itself",
            a.assessment.id
        )));
    }

    let (older, newer) = if a.assessment.chronological_cmp(b.assessment).is_le() {
        (a.assessment, b.assessment)
    } else {
        (b.assessment, a.assessment)
    };

    let deltas = Bucket::ALL
        .iter()
        .map(|bucket| {
            (
                *bucket,
                Delta::between(bucket.count(&older.threats), bucket.count(&newer.threats)),
            )
        })
        .collect();

    Ok(AssessmentComparison {
        older,
        newer,
        deltas,
    })
}

/// Look both ids up in `application` and compare them. Unknown ids are an
/// invalid comparison rather than a lookup failure.
pub fn compare_by_id<'a>(
    application: &'a Application,
    a_id: &str,
    b_id: &str,
) -> Result<AssessmentComparison<'a>> {
    let scoped = |id: &str| -> Result<ScopedAssessment<'a>> {
        application
            .assessment(id)
            .map(|assessment| ScopedAssessment::new(application, assessment))
            .ok_or_else(|| {
                Error::InvalidComparison(format!(
                    "assessment '{}' not found in application '{}'",
                    id, application.id
                ))
            })
    };

    compare_assessments(Some(scoped(a_id)?), Some(scoped(b_id)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{application, assessment};
    use virantis_common::Severity;

    fn scenario() -> Application {
        let mut app = application("app-1", Severity::Critical);
        app.assessments = vec![
            assessment("assess-2", (2024, 10, 1), ThreatStats::new(2, 3, 4, 1)),
            assessment("assess-1", (2024, 9, 1), ThreatStats::new(1, 3, 3, 1)),
        ];
        app
    }

    #[test]
    fn test_concrete_scenario_deltas() {
        let app = scenario();
        let cmp = compare_by_id(&app, "assess-1", "assess-2").unwrap();

        assert_eq!(cmp.older.id, "assess-1");
        assert_eq!(cmp.newer.id, "assess-2");
        assert_eq!(cmp.deltas[&Bucket::Total], Delta { value: 2, trend: Trend::Up });
        assert_eq!(cmp.deltas[&Bucket::Critical], Delta { value: 1, trend: Trend::Up });
        assert_eq!(cmp.deltas[&Bucket::High], Delta { value: 0, trend: Trend::Stable });
        assert_eq!(cmp.deltas[&Bucket::Medium], Delta { value: 1, trend: Trend::Up });
    }

    #[test]
    fn test_comparison_is_commutative() {
        let app = scenario();
        let forward = compare_by_id(&app, "assess-1", "assess-2").unwrap();
        let backward = compare_by_id(&app, "assess-2", "assess-1").unwrap();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_equal_dates_break_ties_by_id() {
        let mut app = application("app-1", Severity::High);
        app.assessments = vec![
            assessment("b", (2024, 9, 1), ThreatStats::new(0, 2, 0, 0)),
            assessment("a", (2024, 9, 1), ThreatStats::new(0, 1, 0, 0)),
        ];
        let forward = compare_by_id(&app, "a", "b").unwrap();
        let backward = compare_by_id(&app, "b", "a").unwrap();
        assert_eq!(forward.older.id, "a");
        assert_eq!(forward, backward);
        assert_eq!(forward.deltas[&Bucket::High].trend, Trend::Up);
    }

    #[test]
    fn test_improvement_trends_down() {
        let mut app = application("app-1", Severity::High);
        app.assessments = vec![
            assessment("old", (2024, 9, 1), ThreatStats::new(3, 3, 3, 1)),
            assessment("new", (2024, 10, 1), ThreatStats::new(0, 2, 3, 1)),
        ];
        let cmp = compare_by_id(&app, "new", "old").unwrap();
        assert_eq!(cmp.deltas[&Bucket::Critical], Delta { value: -3, trend: Trend::Down });
        assert_eq!(cmp.deltas[&Bucket::Total].value, -4);
    }

    #[test]
    fn test_rejects_self_comparison() {
        let app = scenario();
        let err = compare_by_id(&app, "assess-1", "assess-1").unwrap_err();
        assert!(matches!(err, Error::InvalidComparison(_)));
    }

    #[test]
    fn test_rejects_missing_assessment() {
        let app = scenario();
        let err = compare_by_id(&app, "assess-1", "nope").unwrap_err();
        assert!(matches!(err, Error::InvalidComparison(_)));
        assert!(compare_assessments(None, None).is_err());
    }

    #[test]
    fn test_rejects_cross_application_comparison() {
        let first = scenario();
        let mut second = application("app-2", Severity::Low);
        second.assessments = vec![assessment("other", (2024, 9, 5), ThreatStats::new(0, 0, 1, 0))];

        let err = compare_assessments(
            Some(ScopedAssessment::new(&first, &first.assessments[0])),
            Some(ScopedAssessment::new(&second, &second.assessments[0])),
        )
        .unwrap_err();
        assert!(err.to_string().contains("different applications"));
    }

    #[test]
    fn test_serializes_bucket_keys_lowercase() {
        let app = scenario();
        let cmp = compare_by_id(&app, "assess-1", "assess-2").unwrap();
        let json = serde_json::to_value(&cmp).unwrap();
        assert_eq!(json["deltas"]["total"]["value"], 2);
        assert_eq!(json["deltas"]["high"]["trend"], "stable");
    }
}

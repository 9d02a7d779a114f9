//! Fixture loading and integrity validation
//!
//! Fixtures are the only data source. They are parsed once, checked for
//! internal consistency and then treated as immutable.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, warn};
use virantis_common::{DashboardData, Error, Result, ThreatModel};

/// Loader for the dashboard and threat model fixtures
pub struct FixtureLoader;

impl FixtureLoader {
    /// Parse the dashboard fixture from a JSON string
    pub fn parse_dashboard_str(json_str: &str) -> Result<DashboardData> {
        let data: DashboardData = serde_json::from_str(json_str)?;

        Self::validate_dashboard(&data)?;

        Ok(data)
    }

    /// Parse the dashboard fixture from a JSON file
    pub fn parse_dashboard_file<P: AsRef<Path>>(path: P) -> Result<DashboardData> {
        let json_str = std::fs::read_to_string(path.as_ref())?;
        debug!("Loaded dashboard fixture from {}", path.as_ref().display());

        Self::parse_dashboard_str(&json_str)
    }

    /// Parse the threat model fixture from a JSON string
    pub fn parse_threat_model_str(json_str: &str) -> Result<ThreatModel> {
        let model: ThreatModel = serde_json::from_str(json_str)?;

        Self::validate_threat_model(&model)?;

        Ok(model)
    }

    /// Parse the threat model fixture from a JSON file
    pub fn parse_threat_model_file<P: AsRef<Path>>(path: P) -> Result<ThreatModel> {
        let json_str = std::fs::read_to_string(path.as_ref())?;
        debug!("Loaded threat model fixture from {}", path.as_ref().display());

        Self::parse_threat_model_str(&json_str)
    }

    /// Checks for:
    /// - Non-empty, unique application ids
    /// - Assessment ids unique within their application
    /// - Threat totals equal to the per-severity sum
    ///
    /// A stored `totalThreats` that disagrees with the latest assessment is
    /// only logged; aggregation uses the derived value.
    fn validate_dashboard(data: &DashboardData) -> Result<()> {
        let mut app_ids = HashSet::new();

        for app in &data.applications {
            if app.id.is_empty() {
                return Err(Error::DataIntegrity(format!(
                    "application '{}' has an empty id",
                    app.name
                )));
            }
            if !app_ids.insert(app.id.as_str()) {
                return Err(Error::DataIntegrity(format!(
                    "duplicate application id '{}'",
                    app.id
                )));
            }

            let mut assessment_ids = HashSet::new();
            for assessment in &app.assessments {
                if !assessment_ids.insert(assessment.id.as_str()) {
                    return Err(Error::DataIntegrity(format!(
                        "application '{}': duplicate assessment id '{}'",
                        app.id, assessment.id
                    )));
                }

                let stats = &assessment.threats;
                if !stats.is_consistent() {
                    return Err(Error::DataIntegrity(format!(
                        "application '{}' assessment '{}': total {} does not match severity sum {}",
                        app.id,
                        assessment.id,
                        stats.total,
                        stats.bucket_sum()
                    )));
                }
            }

            let derived = app.derived_total_threats();
            if derived != app.total_threats {
                warn!(
                    "Application {} stores totalThreats={} but latest assessment has {}; using {}",
                    app.id, app.total_threats, derived, derived
                );
            }
        }

        Ok(())
    }

    /// Checks for unique component and threat ids and valid DREAD scores.
    /// References to unknown components are tolerated; they display as raw ids.
    fn validate_threat_model(model: &ThreatModel) -> Result<()> {
        let mut component_ids = HashSet::new();
        for component in &model.components {
            if !component_ids.insert(component.id.as_str()) {
                return Err(Error::DataIntegrity(format!(
                    "duplicate component id '{}'",
                    component.id
                )));
            }
        }

        let mut threat_ids = HashSet::new();
        for threat in &model.threats {
            if !threat_ids.insert(threat.id.as_str()) {
                return Err(Error::DataIntegrity(format!(
                    "duplicate threat id '{}'",
                    threat.id
                )));
            }

            threat.dread.validate().map_err(|err| match err {
                Error::DataIntegrity(msg) => {
                    Error::DataIntegrity(format!("threat '{}': {}", threat.id, msg))
                }
                other => other,
            })?;

            if !component_ids.contains(threat.affected_component.as_str()) {
                debug!(
                    "Threat {} references unknown component {}",
                    threat.id, threat.affected_component
                );
            }
        }

        Ok(())
    }
}

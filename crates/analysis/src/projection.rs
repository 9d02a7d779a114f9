//! Display projections: id resolution, record lookups and threat ordering

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use virantis_common::{
    Application, Assessment, AttackPath, Component, DashboardData, Error, Result, Threat,
};

/// Attack path endpoints that are not components
const EXTERNAL_SOURCES: [&str; 2] = ["Internet", "external"];

/// Name of the component with `id`, or `id` itself when there is none
pub fn resolve_component_name<'a>(id: &'a str, components: &'a [Component]) -> &'a str {
    components
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.name.as_str())
        .unwrap_or(id)
}

pub fn find_application<'a>(data: &'a DashboardData, app_id: &str) -> Result<&'a Application> {
    data.application(app_id)
        .ok_or_else(|| Error::not_found("Application", app_id))
}

pub fn find_assessment<'a>(app: &'a Application, assessment_id: &str) -> Result<&'a Assessment> {
    app.assessment(assessment_id)
        .ok_or_else(|| Error::not_found("Assessment", assessment_id))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatSortKey {
    #[default]
    Severity,
    Name,
}

/// Case-insensitive ordering with a raw comparison to keep it total
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Stable sort of `threats` by `key`; equal keys keep their input order.
pub fn sort_threats(threats: &[Threat], key: ThreatSortKey) -> Vec<&Threat> {
    let mut sorted: Vec<&Threat> = threats.iter().collect();
    match key {
        ThreatSortKey::Severity => sorted.sort_by_key(|t| t.severity.rank()),
        ThreatSortKey::Name => sorted.sort_by(|a, b| compare_names(&a.name, &b.name)),
    }
    sorted
}

/// A threat with its affected component resolved for display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedThreat<'a> {
    #[serde(flatten)]
    pub threat: &'a Threat,
    pub component_name: &'a str,
}

pub fn resolve_threats<'a>(
    threats: &[&'a Threat],
    components: &'a [Component],
) -> Vec<ResolvedThreat<'a>> {
    threats
        .iter()
        .copied()
        .map(|threat| ResolvedThreat {
            threat,
            component_name: resolve_component_name(&threat.affected_component, components),
        })
        .collect()
}

/// Resolve the endpoint of a stage. External sources are shown verbatim.
pub fn resolve_stage_endpoint<'a>(endpoint: &'a str, components: &'a [Component]) -> &'a str {
    if EXTERNAL_SOURCES.contains(&endpoint) {
        endpoint
    } else {
        resolve_component_name(endpoint, components)
    }
}

/// Node labels along the path: every stage source, then the last target.
pub fn attack_path_nodes<'a>(path: &'a AttackPath, components: &'a [Component]) -> Vec<&'a str> {
    let mut nodes: Vec<&str> = path
        .stages
        .iter()
        .map(|stage| resolve_stage_endpoint(&stage.source, components))
        .collect();

    if let Some(last) = path.stages.last() {
        nodes.push(resolve_stage_endpoint(&last.target, components));
    }

    nodes
}

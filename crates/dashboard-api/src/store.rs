//! Fixture-backed storage for the dashboard service
//!
//! The fixtures are read once at startup and never change. Everything the
//! user can mutate (read flags, dismissed approvals, running clarification
//! conversations, comparison selections) lives in [`Workspace`].

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};
use uuid::Uuid;
use virantis_analysis::{
    ApprovalQueue, ClarificationFlow, FixtureLoader, NotificationFeed, SelectionWindow,
};
use virantis_common::{DashboardData, Error, ThreatModel};

/// Immutable fixture data
#[derive(Debug, Clone)]
pub struct FixtureStore {
    dashboard: DashboardData,
    threat_model: ThreatModel,
}

impl FixtureStore {
    pub fn new(dashboard: DashboardData, threat_model: ThreatModel) -> Self {
        Self {
            dashboard,
            threat_model,
        }
    }

    /// Load and validate both fixture files
    pub fn load(dashboard_path: &Path, threat_model_path: &Path) -> Result<Self> {
        let dashboard = FixtureLoader::parse_dashboard_file(dashboard_path).with_context(|| {
            format!(
                "Failed to load dashboard fixture: {}",
                dashboard_path.display()
            )
        })?;

        let threat_model =
            FixtureLoader::parse_threat_model_file(threat_model_path).with_context(|| {
                format!(
                    "Failed to load threat model fixture: {}",
                    threat_model_path.display()
                )
            })?;

        info!(
            "Loaded {} applications and {} threats",
            dashboard.applications.len(),
            threat_model.threats.len()
        );

        Ok(Self::new(dashboard, threat_model))
    }

    pub fn dashboard(&self) -> &DashboardData {
        &self.dashboard
    }

    pub fn threat_model(&self) -> &ThreatModel {
        &self.threat_model
    }
}

/// Mutable state seeded from the fixtures
#[derive(Debug)]
pub struct Workspace {
    pub notifications: NotificationFeed,
    pub approvals: ApprovalQueue,
    /// Keyed by (session token, flow id)
    clarifications: HashMap<(Uuid, Uuid), ClarificationFlow>,
    selections: HashMap<(Uuid, String), SelectionWindow>,
}

impl Workspace {
    pub fn seed(fixtures: &FixtureStore) -> Self {
        let dashboard = fixtures.dashboard();
        Self {
            notifications: NotificationFeed::new(dashboard.notifications.clone()),
            approvals: ApprovalQueue::new(dashboard.approvals.clone()),
            clarifications: HashMap::new(),
            selections: HashMap::new(),
        }
    }

    /// Start a clarification conversation over the threat model questions,
    /// owned by `session`
    pub fn start_clarification(
        &mut self,
        session: Uuid,
        fixtures: &FixtureStore,
    ) -> (Uuid, &ClarificationFlow) {
        let id = Uuid::new_v4();
        let flow = ClarificationFlow::new(fixtures.threat_model().clarifications.clone());
        debug!("Started clarification flow {}", id);
        (id, &*self.clarifications.entry((session, id)).or_insert(flow))
    }

    /// Flows started by another session are reported as not found.
    pub fn clarification(
        &self,
        session: Uuid,
        id: Uuid,
    ) -> virantis_common::Result<&ClarificationFlow> {
        self.clarifications
            .get(&(session, id))
            .ok_or_else(|| Error::not_found("Clarification", id.to_string()))
    }

    pub fn clarification_mut(
        &mut self,
        session: Uuid,
        id: Uuid,
    ) -> virantis_common::Result<&mut ClarificationFlow> {
        self.clarifications
            .get_mut(&(session, id))
            .ok_or_else(|| Error::not_found("Clarification", id.to_string()))
    }

    /// Selection window for one session and application, created on first use
    pub fn selection(&mut self, session: Uuid, app_id: &str) -> &mut SelectionWindow {
        self.selections
            .entry((session, app_id.to_string()))
            .or_default()
    }

    /// Forget everything owned by a session
    pub fn end_session(&mut self, session: Uuid) {
        self.selections.retain(|(owner, _), _| *owner != session);
        self.clarifications.retain(|(owner, _), _| *owner != session);
    }
}

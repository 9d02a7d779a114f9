//! Notification feed, pending approvals and remediation roll-ups

use serde::{Deserialize, Serialize};
use virantis_common::{
    Application, Error, Notification, PendingApproval, Recommendation, RemediationItem,
    RemediationStatus, Result,
};

/// Notifications for one application
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationGroup<'a> {
    pub app_id: &'a str,
    /// Application name, or the raw id when the application is unknown
    pub app_name: &'a str,
    pub unread: usize,
    pub items: Vec<&'a Notification>,
}

/// Mutable notification list with read tracking
#[derive(Debug, Clone, Default)]
pub struct NotificationFeed {
    notifications: Vec<Notification>,
}

impl NotificationFeed {
    pub fn new(notifications: Vec<Notification>) -> Self {
        Self { notifications }
    }

    pub fn all(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    pub fn mark_read(&mut self, id: &str) -> Result<()> {
        let notification = self
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| Error::not_found("Notification", id))?;
        notification.read = true;
        Ok(())
    }

    pub fn mark_all_read(&mut self) {
        for notification in &mut self.notifications {
            notification.read = true;
        }
    }

    /// Group by application, newest notification first within each group.
    /// Groups appear in order of their newest notification.
    pub fn grouped<'a>(&'a self, applications: &'a [Application]) -> Vec<NotificationGroup<'a>> {
        let mut groups: Vec<NotificationGroup<'a>> = Vec::new();

        for notification in &self.notifications {
            let app_id = notification.app_id.as_str();
            match groups.iter_mut().find(|g| g.app_id == app_id) {
                Some(group) => group.items.push(notification),
                None => {
                    let app_name = applications
                        .iter()
                        .find(|a| a.id == app_id)
                        .map(|a| a.name.as_str())
                        .unwrap_or(app_id);
                    groups.push(NotificationGroup {
                        app_id,
                        app_name,
                        unread: 0,
                        items: vec![notification],
                    });
                }
            }
        }

        for group in &mut groups {
            group.items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            group.unread = group.items.iter().filter(|n| !n.read).count();
        }
        groups.sort_by(|a, b| b.items[0].timestamp.cmp(&a.items[0].timestamp));

        groups
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalFilter {
    #[default]
    All,
    Assess,
    Skip,
}

impl ApprovalFilter {
    pub fn matches(self, approval: &PendingApproval) -> bool {
        match self {
            Self::All => true,
            Self::Assess => approval.recommendation == Recommendation::Assess,
            Self::Skip => approval.recommendation == Recommendation::Skip,
        }
    }
}

/// Queue of upstream changes awaiting a decision
#[derive(Debug, Clone, Default)]
pub struct ApprovalQueue {
    approvals: Vec<PendingApproval>,
}

impl ApprovalQueue {
    pub fn new(approvals: Vec<PendingApproval>) -> Self {
        Self { approvals }
    }

    pub fn filtered(&self, filter: ApprovalFilter) -> Vec<&PendingApproval> {
        self.approvals.iter().filter(|a| filter.matches(a)).collect()
    }

    /// Approvals recommended for a new assessment
    pub fn needs_review(&self) -> usize {
        self.filtered(ApprovalFilter::Assess).len()
    }

    pub fn dismiss(&mut self, id: &str) -> Result<PendingApproval> {
        let pos = self
            .approvals
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| Error::not_found("Approval", id))?;
        Ok(self.approvals.remove(pos))
    }

    pub fn len(&self) -> usize {
        self.approvals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.approvals.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemediationStats {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    /// Fixed or verified
    pub resolved: usize,
}

pub fn remediation_stats(items: &[RemediationItem]) -> RemediationStats {
    let mut stats = RemediationStats {
        total: items.len(),
        ..RemediationStats::default()
    };
    for item in items {
        match item.status {
            RemediationStatus::Open => stats.open += 1,
            RemediationStatus::InProgress => stats.in_progress += 1,
            RemediationStatus::Fixed | RemediationStatus::Verified => stats.resolved += 1,
        }
    }
    stats
}

//! Record builders shared by unit tests

use chrono::{TimeZone, Utc};
use virantis_common::{
    Application, Assessment, AssessmentStatus, Component, ComponentType, DreadScore, IntakeType,
    Severity, Threat, ThreatStats,
};

pub fn assessment(id: &str, (y, m, d): (i32, u32, u32), threats: ThreatStats) -> Assessment {
    Assessment {
        id: id.to_string(),
        date: Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap(),
        duration: "45s".to_string(),
        methodology: "STRIDE + PASTA".to_string(),
        intake_type: IntakeType::Image,
        intake_file: "architecture.png".to_string(),
        status: AssessmentStatus::Completed,
        risk_level: Severity::High,
        threats,
        changes: String::new(),
    }
}

pub fn application(id: &str, risk_level: Severity) -> Application {
    Application {
        id: id.to_string(),
        name: format!("Application {}", id),
        description: String::new(),
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        last_assessed: Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap(),
        risk_level,
        total_threats: 0,
        intake_type: IntakeType::Image,
        intake_file: "architecture.png".to_string(),
        assessments: Vec::new(),
    }
}

pub fn component(id: &str, name: &str, component_type: ComponentType) -> Component {
    Component {
        id: id.to_string(),
        name: name.to_string(),
        component_type,
    }
}

pub fn threat(id: &str, name: &str, severity: Severity) -> Threat {
    Threat {
        id: id.to_string(),
        name: name.to_string(),
        category: "Tampering".to_string(),
        source: "STRIDE".to_string(),
        severity,
        affected_component: "agent".to_string(),
        description: format!("{} description", name),
        dread: DreadScore {
            damage: 8,
            reproducibility: 7,
            exploitability: 6,
            affected_users: 8,
            discoverability: 5,
            total: 34,
        },
        mitigation: "Validate inputs".to_string(),
        status: "open".to_string(),
    }
}

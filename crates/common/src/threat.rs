//! Threat model records: components, data flows, threats and the attack path

use serde::{Deserialize, Serialize};

use crate::{Error, Result, Severity};

/// Highest score a single DREAD factor may take
pub const DREAD_FACTOR_MAX: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    ExternalEntity,
    Process,
    DataStore,
}

impl ComponentType {
    pub fn label(self) -> &'static str {
        match self {
            Self::ExternalEntity => "External Entity",
            Self::Process => "Process",
            Self::DataStore => "Data Store",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFlow {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub data_type: String,
}

/// DREAD rating. `total` is supplied by the fixture, not computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DreadScore {
    pub damage: u8,
    pub reproducibility: u8,
    pub exploitability: u8,
    pub affected_users: u8,
    pub discoverability: u8,
    pub total: u8,
}

impl DreadScore {
    pub fn factors(&self) -> [(&'static str, u8); 5] {
        [
            ("Damage", self.damage),
            ("Reproducibility", self.reproducibility),
            ("Exploitability", self.exploitability),
            ("Affected Users", self.affected_users),
            ("Discoverability", self.discoverability),
        ]
    }

    pub fn computed_total(&self) -> u32 {
        self.factors().iter().map(|(_, v)| u32::from(*v)).sum()
    }

    /// Every factor is within 0..=10 and `total` matches their sum
    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.factors() {
            if value > DREAD_FACTOR_MAX {
                return Err(Error::DataIntegrity(format!(
                    "DREAD factor {} is {} (max {})",
                    name, value, DREAD_FACTOR_MAX
                )));
            }
        }

        let computed = self.computed_total();
        if u32::from(self.total) != computed {
            return Err(Error::DataIntegrity(format!(
                "DREAD total {} does not match factor sum {}",
                self.total, computed
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Threat {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Methodology that produced the threat (STRIDE, PASTA, OWASP Agentic, ...)
    pub source: String,
    pub severity: Severity,
    /// Component id
    pub affected_component: String,
    pub description: String,
    pub dread: DreadScore,
    pub mitigation: String,
    pub status: String,
}

/// One hop of an attack path. `source` is a component id, `"Internet"` or `"external"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackStage {
    pub source: String,
    pub target: String,
    pub data_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackPath {
    pub name: String,
    pub description: String,
    pub stages: Vec<AttackStage>,
}

/// Pre-computed summary shipped with the threat model fixture
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSummary {
    pub total_threats: u32,
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetApplication {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Question asked by the assistant before running the full model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClarificationQuestion {
    pub id: String,
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatModel {
    pub application: TargetApplication,
    pub components: Vec<Component>,
    #[serde(default)]
    pub data_flows: Vec<DataFlow>,
    pub threats: Vec<Threat>,
    #[serde(default)]
    pub summary: ModelSummary,
    pub attack_path: AttackPath,
    #[serde(default)]
    pub clarifications: Vec<ClarificationQuestion>,
}

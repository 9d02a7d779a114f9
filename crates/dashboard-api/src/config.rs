//! Configuration management for the dashboard API
//!
//! Loads configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server host
    pub api_host: String,

    /// API server port
    pub api_port: u16,

    /// Portfolio fixture (applications, notifications, approvals, remediations)
    pub dashboard_fixture: PathBuf,

    /// Threat model fixture
    pub threat_model_fixture: PathBuf,

    /// Delay before the assistant replies in a clarification conversation
    pub response_delay: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenvy::dotenv().ok();

        let response_delay_ms: u64 = env::var("RESPONSE_DELAY_MS")
            .unwrap_or_else(|_| "800".to_string())
            .parse()
            .context("Invalid RESPONSE_DELAY_MS")?;

        let config = Config {
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            api_port: env::var("API_PORT")
                .unwrap_or_else(|_| "8084".to_string())
                .parse()
                .context("Invalid API_PORT")?,

            dashboard_fixture: env::var("DASHBOARD_FIXTURE")
                .unwrap_or_else(|_| "./fixtures/mock_dashboard.json".to_string())
                .into(),

            threat_model_fixture: env::var("THREAT_MODEL_FIXTURE")
                .unwrap_or_else(|_| "./fixtures/dummy_threat_model.json".to_string())
                .into(),

            response_delay: Duration::from_millis(response_delay_ms),
        };

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.api_port == 0 {
            anyhow::bail!("API_PORT must be greater than 0");
        }

        for fixture in [&self.dashboard_fixture, &self.threat_model_fixture] {
            if !fixture.is_file() {
                anyhow::bail!("Fixture file does not exist: {}", fixture.display());
            }
        }

        Ok(())
    }

    /// Get the API server address
    pub fn api_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

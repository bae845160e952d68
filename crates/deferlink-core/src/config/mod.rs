//! Per-subsystem configuration, loadable from TOML with full defaults.

pub mod defaults;

mod adaptation_config;
mod candidate_config;
mod maintenance_config;
mod risk_config;

pub use adaptation_config::AdaptationConfig;
pub use candidate_config::CandidateConfig;
pub use maintenance_config::MaintenanceConfig;
pub use risk_config::RiskConfig;

use serde::{Deserialize, Serialize};

use crate::errors::{DeferlinkError, DeferlinkResult};

/// Top-level DeferLink configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeferlinkConfig {
    pub candidates: CandidateConfig,
    pub adaptation: AdaptationConfig,
    pub maintenance: MaintenanceConfig,
    pub risk: RiskConfig,
}

impl DeferlinkConfig {
    /// Parse a configuration from a TOML document. Missing sections and
    /// fields fall back to defaults. The result is validated.
    pub fn from_toml_str(s: &str) -> DeferlinkResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| DeferlinkError::InvalidConfig {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check configured values against their documented bounds.
    pub fn validate(&self) -> DeferlinkResult<()> {
        let invalid = |reason: String| Err(DeferlinkError::InvalidConfig { reason });

        if self.candidates.default_ttl_hours == 0
            || self.candidates.default_ttl_hours > self.candidates.max_ttl_hours
        {
            return invalid(format!(
                "default_ttl_hours must be in 1..={}",
                self.candidates.max_ttl_hours
            ));
        }
        if self.candidates.candidate_limit == 0 {
            return invalid("candidate_limit must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.adaptation.confidence_floor) {
            return invalid("adaptation.confidence_floor must be in [0.0, 1.0]".into());
        }
        if !(0.0..=1.0).contains(&self.adaptation.smoothing) {
            return invalid("adaptation.smoothing must be in [0.0, 1.0]".into());
        }
        if self.adaptation.min_samples == 0 {
            return invalid("adaptation.min_samples must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.risk.risk_threshold) {
            return invalid("risk.risk_threshold must be in [0.0, 1.0]".into());
        }
        Ok(())
    }
}

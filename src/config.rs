use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::core::{
    DEFAULT_EMERGENCY_MAX_MONTHS, DEFAULT_EMERGENCY_MIN_MONTHS, DEFAULT_FIRE_REAL_RETURN,
    DEFAULT_SAFE_WITHDRAWAL_RATE,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default = "default_safe_withdrawal_rate")]
    pub safe_withdrawal_rate: f64,
    #[serde(default = "default_fire_real_return")]
    pub fire_real_return: f64,
    #[serde(default = "default_emergency_min_months")]
    pub emergency_min_months: u32,
    #[serde(default = "default_emergency_max_months")]
    pub emergency_max_months: u32,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            safe_withdrawal_rate: default_safe_withdrawal_rate(),
            fire_real_return: default_fire_real_return(),
            emergency_min_months: default_emergency_min_months(),
            emergency_max_months: default_emergency_max_months(),
            log_filter: default_log_filter(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl PlannerConfig {
    /// Reads a TOML file; a missing path yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed = Self::from_toml(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn from_toml(data: &str) -> Result<Self> {
        let parsed: Self = toml::from_str(data)?;
        parsed.validate()?;
        Ok(parsed)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.safe_withdrawal_rate > 0.0 && self.safe_withdrawal_rate < 1.0) {
            bail!("safe_withdrawal_rate must be strictly between 0 and 1");
        }
        if !self.fire_real_return.is_finite() || self.fire_real_return < 0.0 {
            bail!("fire_real_return must be finite and >= 0");
        }
        if self.emergency_min_months == 0 {
            bail!("emergency_min_months must be > 0");
        }
        if self.emergency_max_months < self.emergency_min_months {
            bail!("emergency_max_months must be >= emergency_min_months");
        }
        Ok(())
    }
}

fn default_safe_withdrawal_rate() -> f64 {
    DEFAULT_SAFE_WITHDRAWAL_RATE
}

fn default_fire_real_return() -> f64 {
    DEFAULT_FIRE_REAL_RETURN
}

fn default_emergency_min_months() -> u32 {
    DEFAULT_EMERGENCY_MIN_MONTHS
}

fn default_emergency_max_months() -> u32 {
    DEFAULT_EMERGENCY_MAX_MONTHS
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_port() -> u16 {
    8080
}

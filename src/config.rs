//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Secrets (API keys) are referenced by env-var name in the config and
//! resolved at runtime via `std::env::var`.

use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::fs;

use crate::strategy::ScanConfig;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub agent: AgentConfig,
    #[serde(default)]
    pub strategy: StrategyConfig,
    pub platforms: PlatformsConfig,
    #[serde(default)]
    pub coingecko: CoinGeckoConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AgentConfig {
    pub name: String,
    pub scan_interval_secs: u64,
    pub bankroll: Decimal,
    pub currency: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StrategyConfig {
    pub reference_stake: Decimal,
    pub risk_tolerance: Decimal,
    pub default_confidence: Decimal,
    pub rank_limit: usize,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        let scan = ScanConfig::default();
        Self {
            reference_stake: scan.reference_stake,
            risk_tolerance: scan.risk_tolerance,
            default_confidence: scan.default_confidence,
            rank_limit: scan.rank_limit,
        }
    }
}

impl From<&StrategyConfig> for ScanConfig {
    fn from(cfg: &StrategyConfig) -> Self {
        ScanConfig {
            reference_stake: cfg.reference_stake,
            risk_tolerance: cfg.risk_tolerance,
            default_confidence: cfg.default_confidence,
            rank_limit: cfg.rank_limit,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlatformsConfig {
    pub azuro: AzuroConfig,
    pub overtime: OvertimeConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AzuroConfig {
    pub enabled: bool,
    /// Only scan this sport when set.
    #[serde(default)]
    pub sport: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OvertimeConfig {
    pub enabled: bool,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CoinGeckoConfig {
    pub enabled: bool,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key_env: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub enabled: bool,
    pub port: u16,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config = Self::from_toml(&contents)
            .with_context(|| format!("Failed to load config file: {path}"))?;
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents).context("Invalid config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the strategy engine would refuse at scan time.
    pub fn validate(&self) -> Result<()> {
        if self.agent.scan_interval_secs == 0 {
            bail!("agent.scan_interval_secs must be positive");
        }
        if self.agent.bankroll < Decimal::ZERO {
            bail!("agent.bankroll must be non-negative, got {}", self.agent.bankroll);
        }

        let s = &self.strategy;
        if s.reference_stake <= Decimal::ZERO {
            bail!("strategy.reference_stake must be positive, got {}", s.reference_stake);
        }
        if s.risk_tolerance <= Decimal::ZERO {
            bail!("strategy.risk_tolerance must be positive, got {}", s.risk_tolerance);
        }
        if s.default_confidence < Decimal::ZERO || s.default_confidence > dec!(1) {
            bail!(
                "strategy.default_confidence must be within [0, 1], got {}",
                s.default_confidence
            );
        }
        if s.rank_limit == 0 {
            bail!("strategy.rank_limit must be at least 1");
        }
        Ok(())
    }

    /// Resolve an environment variable name to its value.
    /// Useful for loading secrets referenced in the config.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }
}

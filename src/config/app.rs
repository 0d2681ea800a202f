//! Main application configuration
//!
//! This module defines the primary configuration structures for the swiss-room
//! tournament service, including environment variable and TOML file loading
//! and validation.

use crate::config::pairing::PairingConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub pairing: PairingConfig,
    pub registration: RegistrationSettings,
    pub simulation: SimulationSettings,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// How new player ids are drawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    #[default]
    Sequential,
    Random,
}

/// Player registration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationSettings {
    /// Attempts before a registration is reported as failed
    pub max_attempts: u32,
    pub id_strategy: IdStrategy,
}

/// Settings for the round simulation driven by the binary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Tournament code used when the roster does not name one
    pub tournament: String,
    /// Number of rounds to play
    pub rounds: u32,
    /// RNG seed for match outcomes; random when absent
    pub seed: Option<u64>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "swiss-room".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for RegistrationSettings {
    fn default() -> Self {
        Self {
            max_attempts: 100,
            id_strategy: IdStrategy::Sequential,
        }
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tournament: "WOW".to_string(),
            rounds: 3,
            seed: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_toml_str(&raw)?;
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Parse a TOML document; missing sections take their defaults
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| anyhow!("Invalid configuration file: {}", e))
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Pairing settings
        if let Ok(tie_break) = env::var("TIE_BREAK") {
            self.pairing.tie_break = tie_break.parse()?;
        }
        if let Ok(policy) = env::var("PARTIAL_ROUND_POLICY") {
            self.pairing.partial_round_policy = policy.parse()?;
        }
        if let Ok(allow) = env::var("ALLOW_REMATCHES") {
            self.pairing.allow_rematches = allow
                .parse()
                .map_err(|_| anyhow!("Invalid ALLOW_REMATCHES value: {}", allow))?;
        }

        // Registration settings
        if let Ok(attempts) = env::var("MAX_REGISTRATION_ATTEMPTS") {
            self.registration.max_attempts = attempts
                .parse()
                .map_err(|_| anyhow!("Invalid MAX_REGISTRATION_ATTEMPTS value: {}", attempts))?;
        }
        if let Ok(strategy) = env::var("ID_STRATEGY") {
            self.registration.id_strategy = match strategy.to_ascii_lowercase().as_str() {
                "sequential" => IdStrategy::Sequential,
                "random" => IdStrategy::Random,
                _ => return Err(anyhow!("Invalid ID_STRATEGY value: {}", strategy)),
            };
        }

        // Simulation settings
        if let Ok(tournament) = env::var("TOURNAMENT") {
            self.simulation.tournament = tournament;
        }
        if let Ok(rounds) = env::var("ROUNDS") {
            self.simulation.rounds = rounds
                .parse()
                .map_err(|_| anyhow!("Invalid ROUNDS value: {}", rounds))?;
        }
        if let Ok(seed) = env::var("SEED") {
            self.simulation.seed = Some(
                seed.parse()
                    .map_err(|_| anyhow!("Invalid SEED value: {}", seed))?,
            );
        }

        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.registration.max_attempts == 0 {
        return Err(anyhow!("Registration attempts must be greater than 0"));
    }

    if config.simulation.tournament.trim().is_empty() {
        return Err(anyhow!("Tournament code cannot be empty"));
    }

    Ok(())
}

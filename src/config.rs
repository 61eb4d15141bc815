//! Configuration system for the simulation.
//!
//! Supports YAML configuration files with sensible defaults.

use crate::agent::Species;
use crate::ecology::{ForagingConfig, PredationConfig, ResourcesConfig, SeasonsConfig};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub world: WorldConfig,
    #[serde(default = "SpeciesConfig::prey")]
    pub prey: SpeciesConfig,
    #[serde(default = "SpeciesConfig::predator")]
    pub predator: SpeciesConfig,
    #[serde(default = "SpeciesConfig::apex_hunter")]
    pub apex_hunter: SpeciesConfig,
    #[serde(default)]
    pub foraging: ForagingConfig,
    #[serde(default)]
    pub predation: PredationConfig,
    #[serde(default)]
    pub seasons: SeasonsConfig,
    #[serde(default)]
    pub resources: ResourcesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// When the season controller runs relative to the agents in a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonPhase {
    /// Agents already see the new season in the step it starts
    BeforeTick,
    /// Agents see the new season from the following step
    AfterTick,
}

/// Field configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Number of rows. Zero falls back to the default.
    pub depth: usize,
    /// Number of columns. Zero falls back to the default.
    pub width: usize,
    /// Pause between steps in `run_for`, in milliseconds
    #[serde(default)]
    pub step_delay_ms: u64,
    #[serde(default = "default_season_phase")]
    pub season_phase: SeasonPhase,
}

fn default_season_phase() -> SeasonPhase {
    SeasonPhase::BeforeTick
}

/// Per-species life history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesConfig {
    /// Age at which breeding becomes possible
    pub breeding_age: u32,
    /// Agents older than this die
    pub max_age: u32,
    /// Chance per step of producing a litter
    pub breeding_probability: f64,
    /// Upper bound of a litter before seasonal scaling
    pub max_litter_size: u32,
    /// Steps a carnivore can go on one meal. Unused for prey.
    pub food_value: i32,
    /// Chance a cell receives this species when populating
    pub creation_probability: f64,
}

impl SpeciesConfig {
    pub fn prey() -> Self {
        Self {
            breeding_age: 5,
            max_age: 50,
            breeding_probability: 0.15,
            max_litter_size: 5,
            food_value: 0,
            creation_probability: 0.08,
        }
    }

    pub fn predator() -> Self {
        Self {
            breeding_age: 10,
            max_age: 150,
            breeding_probability: 0.09,
            max_litter_size: 3,
            food_value: 4,
            creation_probability: 0.02,
        }
    }

    pub fn apex_hunter() -> Self {
        Self {
            breeding_age: 20,
            max_age: 350,
            breeding_probability: 0.05,
            max_litter_size: 2,
            food_value: 6,
            creation_probability: 0.002,
        }
    }

    /// Food level for an agent created at populate time
    pub fn random_food_level<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        if self.food_value <= 0 {
            0
        } else {
            rng.gen_range(1..=self.food_value)
        }
    }

    fn validate(&self, name: &str, carnivore: bool) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.breeding_probability) {
            return Err(ConfigError::invalid(format!(
                "{name}.breeding_probability must be within [0, 1]"
            )));
        }
        if !(0.0..=1.0).contains(&self.creation_probability) {
            return Err(ConfigError::invalid(format!(
                "{name}.creation_probability must be within [0, 1]"
            )));
        }
        if self.max_litter_size == 0 {
            return Err(ConfigError::invalid(format!("{name}.max_litter_size must be > 0")));
        }
        if carnivore && self.food_value <= 0 {
            return Err(ConfigError::invalid(format!("{name}.food_value must be > 0")));
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Steps between stats history snapshots
    pub stats_interval: u64,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            prey: SpeciesConfig::prey(),
            predator: SpeciesConfig::predator(),
            apex_hunter: SpeciesConfig::apex_hunter(),
            foraging: ForagingConfig::default(),
            predation: PredationConfig::default(),
            seasons: SeasonsConfig::default(),
            resources: ResourcesConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            depth: WorldConfig::DEFAULT_DEPTH,
            width: WorldConfig::DEFAULT_WIDTH,
            step_delay_ms: 0,
            season_phase: SeasonPhase::BeforeTick,
        }
    }
}

impl WorldConfig {
    pub const DEFAULT_DEPTH: usize = 100;
    pub const DEFAULT_WIDTH: usize = 100;
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            stats_interval: 10,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Life-history parameters for `species`
    pub fn species(&self, species: Species) -> &SpeciesConfig {
        match species {
            Species::Prey => &self.prey,
            Species::Predator => &self.predator,
            Species::ApexHunter => &self.apex_hunter,
        }
    }

    pub fn species_mut(&mut self, species: Species) -> &mut SpeciesConfig {
        match species {
            Species::Prey => &mut self.prey,
            Species::Predator => &mut self.predator,
            Species::ApexHunter => &mut self.apex_hunter,
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.prey.validate("prey", false)?;
        self.predator.validate("predator", true)?;
        self.apex_hunter.validate("apex_hunter", true)?;
        if !(0.0..=1.0).contains(&self.predation.fight_death_probability) {
            return Err(ConfigError::invalid(
                "predation.fight_death_probability must be within [0, 1]",
            ));
        }
        if self.seasons.season_length == 0 {
            return Err(ConfigError::invalid("seasons.season_length must be > 0"));
        }
        if self.seasons.replenish_period == 0 {
            return Err(ConfigError::invalid("seasons.replenish_period must be > 0"));
        }
        if self.resources.initial_min < 0 {
            return Err(ConfigError::invalid("resources.initial_min must be >= 0"));
        }
        if self.resources.initial_min > self.resources.initial_max {
            return Err(ConfigError::invalid(
                "resources.initial_min cannot exceed resources.initial_max",
            ));
        }
        if self.foraging.age_tiers[0] >= self.foraging.age_tiers[1] {
            return Err(ConfigError::invalid("foraging.age_tiers must be increasing"));
        }
        if self.foraging.draw.iter().any(|&d| d <= 0) {
            return Err(ConfigError::invalid("foraging.draw values must be > 0"));
        }
        if self.logging.stats_interval == 0 {
            return Err(ConfigError::invalid("logging.stats_interval must be > 0"));
        }
        Ok(())
    }
}

/// Errors that can occur while loading or saving a configuration
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_yaml::Error),
    Invalid(String),
}

impl ConfigError {
    fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
            Self::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.world.season_phase = SeasonPhase::AfterTick;
        let yaml = serde_yaml::to_string(&config).unwrap();
        let loaded: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config.world.depth, loaded.world.depth);
        assert_eq!(loaded.world.season_phase, SeasonPhase::AfterTick);
        assert_eq!(loaded.apex_hunter.max_age, 350);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "world:\n  depth: 20\n  width: 30\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.world.depth, 20);
        assert_eq!(config.world.width, 30);
        assert_eq!(config.world.step_delay_ms, 0);
        assert_eq!(config.prey.breeding_age, 5);
        assert_eq!(config.predator.food_value, 4);
        assert_eq!(config.seasons.season_length, 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_probability() {
        let mut config = Config::default();
        config.predator.breeding_probability = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_inverted_resource_bounds() {
        let mut config = Config::default();
        config.resources.initial_min = 10;
        config.resources.initial_max = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_starving_carnivore() {
        let mut config = Config::default();
        config.apex_hunter.food_value = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_dimensions_are_not_an_error() {
        let mut config = Config::default();
        config.world.depth = 0;
        config.world.width = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_random_food_level() {
        use rand::SeedableRng;
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(5);
        let predator = SpeciesConfig::predator();
        for _ in 0..100 {
            let level = predator.random_food_level(&mut rng);
            assert!((1..=4).contains(&level));
        }
        assert_eq!(SpeciesConfig::prey().random_food_level(&mut rng), 0);
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_file("/nonexistent/predation-sim.yaml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}

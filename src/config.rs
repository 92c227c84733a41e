use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Error type for table configuration loading and validation.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Stakes and seating rules for one cash table.
///
/// Buy-in limits are multiples of the big blind.
///
/// ```
/// use holdem_engine::config::TableConfig;
///
/// let cfg = TableConfig::from_toml("small_blind = 5\nbig_blind = 10").unwrap();
/// assert_eq!(cfg.max_buy_in_chips(), 1_000);
/// assert_eq!(cfg.ante, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableConfig {
    pub small_blind: u64,
    pub big_blind: u64,
    pub ante: u64,
    pub max_seats: usize,
    pub min_buy_in: u64,
    pub max_buy_in: u64,
    /// Rejected decisions tolerated before the default action is forced.
    pub max_invalid_actions: u32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            small_blind: 1,
            big_blind: 2,
            ante: 0,
            max_seats: 9,
            min_buy_in: 20,
            max_buy_in: 100,
            max_invalid_actions: 3,
        }
    }
}

impl TableConfig {
    pub const MIN_SEATS: usize = 2;
    pub const MAX_SEATS: usize = 10;

    /// Nine-handed 1/2 with a 1 chip ante.
    pub fn low() -> Self {
        Self { ante: 1, ..Self::default() }
    }

    /// Heads-up 10/20 with a 1 chip ante.
    pub fn heads_up() -> Self {
        Self { small_blind: 10, big_blind: 20, ante: 1, max_seats: 2, ..Self::default() }
    }

    /// Read and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate TOML; omitted keys keep their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let cfg: TableConfig = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.big_blind == 0 {
            return Err(ConfigError::Invalid("big blind must be positive".into()));
        }
        if self.small_blind > self.big_blind {
            return Err(ConfigError::Invalid(format!(
                "small blind {} exceeds big blind {}",
                self.small_blind, self.big_blind
            )));
        }
        if !(Self::MIN_SEATS..=Self::MAX_SEATS).contains(&self.max_seats) {
            return Err(ConfigError::Invalid(format!(
                "max_seats must be in {}..={}, got {}",
                Self::MIN_SEATS,
                Self::MAX_SEATS,
                self.max_seats
            )));
        }
        if self.min_buy_in == 0 || self.min_buy_in > self.max_buy_in {
            return Err(ConfigError::Invalid(format!(
                "buy-in range {}..={} big blinds is empty",
                self.min_buy_in, self.max_buy_in
            )));
        }
        Ok(())
    }

    pub fn min_buy_in_chips(&self) -> u64 {
        self.min_buy_in * self.big_blind
    }

    pub fn max_buy_in_chips(&self) -> u64 {
        self.max_buy_in * self.big_blind
    }
}

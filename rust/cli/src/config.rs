use serde::{Deserialize, Serialize};
use std::fs;

use tubesim_engine::config::MAX_PLAYERS;

/// Resolved CLI defaults for simulation runs. Inspected with the `cfg`
/// command; the `sim` command takes explicit flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub rounds: u64,
    pub players: usize,
    pub ante: u64,
    pub seed: Option<u64>,
    pub strategy: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub rounds: ValueSource,
    pub players: ValueSource,
    pub ante: ValueSource,
    pub seed: ValueSource,
    pub strategy: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            rounds: ValueSource::Default,
            players: ValueSource::Default,
            ante: ValueSource::Default,
            seed: ValueSource::Default,
            strategy: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rounds: 20_000,
            players: 4,
            ante: 5,
            seed: None,
            strategy: "rulebook".into(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Resolve defaults from `TUBESIM_CONFIG` (TOML file) and `TUBESIM_*`
/// environment overrides, tracking where each value came from.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("TUBESIM_CONFIG") {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.rounds {
            cfg.rounds = v;
            sources.rounds = ValueSource::File;
        }
        if let Some(v) = f.players {
            cfg.players = v;
            sources.players = ValueSource::File;
        }
        if let Some(v) = f.ante {
            cfg.ante = v;
            sources.ante = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.strategy {
            cfg.strategy = v;
            sources.strategy = ValueSource::File;
        }
    }

    if let Ok(seed) = std::env::var("TUBESIM_SEED") {
        if !seed.is_empty() {
            cfg.seed = Some(
                seed.parse()
                    .map_err(|_| ConfigError::Invalid("Invalid seed".into()))?,
            );
            sources.seed = ValueSource::Env;
        }
    }
    if let Ok(rounds) = std::env::var("TUBESIM_ROUNDS") {
        if !rounds.is_empty() {
            cfg.rounds = rounds
                .parse()
                .map_err(|_| ConfigError::Invalid("Invalid rounds".into()))?;
            sources.rounds = ValueSource::Env;
        }
    }
    if let Ok(players) = std::env::var("TUBESIM_PLAYERS") {
        if !players.is_empty() {
            cfg.players = players
                .parse()
                .map_err(|_| ConfigError::Invalid("Invalid players".into()))?;
            sources.players = ValueSource::Env;
        }
    }
    if let Ok(ante) = std::env::var("TUBESIM_ANTE") {
        if !ante.is_empty() {
            cfg.ante = ante
                .parse()
                .map_err(|_| ConfigError::Invalid("Invalid ante".into()))?;
            sources.ante = ValueSource::Env;
        }
    }
    if let Ok(strategy) = std::env::var("TUBESIM_STRATEGY") {
        if !strategy.is_empty() {
            cfg.strategy = strategy;
            sources.strategy = ValueSource::Env;
        }
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    rounds: Option<u64>,
    #[serde(default)]
    players: Option<usize>,
    #[serde(default)]
    ante: Option<u64>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    strategy: Option<String>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.rounds == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: rounds must be >=1".into(),
        ));
    }
    if cfg.players == 0 || cfg.players > MAX_PLAYERS {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: players must be 1..={}",
            MAX_PLAYERS
        )));
    }
    if cfg.ante == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: ante must be >=1".into(),
        ));
    }
    if !crate::validation::is_known_strategy(&cfg.strategy) {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: unknown strategy '{}'",
            cfg.strategy
        )));
    }
    Ok(())
}

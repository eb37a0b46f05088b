use thiserror::Error;

/// Configuration rejection reasons. All of these are reported before
/// any round executes; a validated config never fails mid-run.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("rounds must be >= 1")]
    ZeroRounds,
    #[error("players must be between 1 and {max} (one 52-card deck serves deal and draw)")]
    PlayerCount { max: usize },
    #[error("ante must be >= 1")]
    ZeroAnte,
    #[error("refill amount must be >= 1 when a refill policy is enabled")]
    ZeroRefill,
    #[error("bust multiplier must be finite and >= 0, got {0}")]
    BadBustMultiplier(f64),
    #[error("volatility refresh interval must be >= 1")]
    ZeroRefreshInterval,
}

/// Engine-side failures. The core performs no I/O, so none of these
/// are transient; each marks a broken caller contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    #[error("run already completed all {0} configured rounds")]
    RunComplete(u64),
    #[error("deck exhausted during {phase}")]
    DeckExhausted { phase: &'static str },
    #[error("participant {participant} holds an incomplete hand at {phase}")]
    IncompleteHand {
        participant: usize,
        phase: &'static str,
    },
}

//! Immutable per-run configuration.
//!
//! Built once by the embedding caller, validated before the first
//! round, then passed by reference into the driver. Core logic never
//! consults ambient defaults; everything it needs is here.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::tube::TubeKind;

/// Highest supported player count. Each participant (players plus the
/// dealer) may consume up to ten cards per round from a single 52-card
/// deck, so five seats is the ceiling and one belongs to the dealer.
pub const MAX_PLAYERS: usize = 4;

/// Per-run parameters. Never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Number of rounds to simulate.
    pub rounds: u64,
    /// Number of players, dealer excluded.
    pub players: usize,
    /// Fixed stake collected from every participant each round.
    pub ante: u64,
    /// Credits each player starts the run with.
    pub starting_credits: u64,
    /// Initial balances of the five tubes.
    pub tube_straight: u64,
    pub tube_flush: u64,
    pub tube_full_house: u64,
    pub tube_straight_flush: u64,
    pub tube_royal_flush: u64,
    /// Refill every tube at or below the trigger threshold, house-funded.
    pub house_refill_enabled: bool,
    /// Refill every tube a winner drained this round, winner-funded.
    pub player_refill_enabled: bool,
    /// Credits added per refill event.
    pub refill_amount: u64,
    /// When false the dealer stands pat on the dealt five.
    pub dealer_draw_allowed: bool,
    /// Bust penalty is `ante * bust_multiplier`, rounded.
    pub bust_multiplier: f64,
    /// Absolute balance at or below which a tube triggers a house refill.
    pub trigger_threshold: u64,
    /// Recompute the published volatility index every this many rounds.
    pub volatility_refresh_interval: u64,
    /// Base RNG seed; `None` lets the driver pick one.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rounds: 20_000,
            players: 4,
            ante: 5,
            starting_credits: 1_000,
            tube_straight: 5,
            tube_flush: 10,
            tube_full_house: 15,
            tube_straight_flush: 20,
            tube_royal_flush: 25,
            house_refill_enabled: true,
            player_refill_enabled: true,
            refill_amount: 20,
            dealer_draw_allowed: true,
            bust_multiplier: 1.0,
            trigger_threshold: 5,
            volatility_refresh_interval: 1_000,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Initial balance configured for one tube.
    pub fn tube_initial(&self, kind: TubeKind) -> u64 {
        match kind {
            TubeKind::Straight => self.tube_straight,
            TubeKind::Flush => self.tube_flush,
            TubeKind::FullHouse => self.tube_full_house,
            TubeKind::StraightFlush => self.tube_straight_flush,
            TubeKind::RoyalFlush => self.tube_royal_flush,
        }
    }

    /// Fail fast on invalid inputs, before any state mutation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rounds == 0 {
            return Err(ConfigError::ZeroRounds);
        }
        if self.players == 0 || self.players > MAX_PLAYERS {
            return Err(ConfigError::PlayerCount { max: MAX_PLAYERS });
        }
        if self.ante == 0 {
            return Err(ConfigError::ZeroAnte);
        }
        if (self.house_refill_enabled || self.player_refill_enabled) && self.refill_amount == 0 {
            return Err(ConfigError::ZeroRefill);
        }
        if !self.bust_multiplier.is_finite() || self.bust_multiplier < 0.0 {
            return Err(ConfigError::BadBustMultiplier(self.bust_multiplier));
        }
        if self.volatility_refresh_interval == 0 {
            return Err(ConfigError::ZeroRefreshInterval);
        }
        Ok(())
    }

    /// Bust penalty in credits, rounded to the nearest credit.
    pub fn bust_penalty(&self) -> u64 {
        (self.ante as f64 * self.bust_multiplier).round() as u64
    }
}

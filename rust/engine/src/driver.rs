//! Simulation driver: owns all run state and advances one round at a
//! time.
//!
//! Execution is single-threaded and synchronous; each round completes
//! atomically before [`Simulation::advance_round`] returns, which makes
//! the gap between rounds a safe suspension point for embedding
//! callers. Independent simulations share no mutable state, so a
//! parameter sweep may run one `Simulation` per thread with zero
//! synchronization.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::deck::Deck;
use crate::errors::{ConfigError, SimError};
use crate::holds::HoldResolver;
use crate::participant::Participant;
use crate::round::{run_round, RoundOutcome};
use crate::stats::{EconomicReport, StatsEngine};
use crate::tube::TubeLedger;

/// Full per-round history is retained only up to this many rounds;
/// longer runs keep a ring of the most recent outcomes. Aggregate
/// statistics stay exact either way.
pub const HISTORY_RETENTION_CAP: usize = 10_000;

/// Observer payload delivered after every completed round. Carries
/// copies only; observers cannot touch engine state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundProgress {
    /// Rounds completed so far, 1-based.
    pub round: u64,
    pub rounds_total: u64,
    pub pot_collected: u64,
    /// Running house net across the whole run.
    pub house_net: i64,
    /// Volatility index as of the last refresh interval.
    pub volatility_index: f64,
}

/// Everything a finished run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub seed: u64,
    pub config: SimConfig,
    /// Final balances in [`crate::tube::TubeKind::ALL`] order.
    pub tube_balances: [u64; 5],
    pub analysis: EconomicReport,
    /// Bounded round-by-round history (most recent
    /// [`HISTORY_RETENTION_CAP`] rounds for long runs).
    pub history: Vec<RoundOutcome>,
}

/// One simulation run: participants, tubes, and statistics threaded
/// through `rounds` invocations of the resolution pipeline.
pub struct Simulation {
    config: SimConfig,
    seed: u64,
    players: Vec<Participant>,
    dealer: Participant,
    tubes: TubeLedger,
    stats: StatsEngine,
    resolver: Box<dyn HoldResolver>,
    completed: u64,
    history: VecDeque<RoundOutcome>,
}

impl Simulation {
    /// Validate the configuration and build the run. Fails fast before
    /// any state exists; a constructed simulation always completes.
    pub fn new(config: SimConfig, resolver: Box<dyn HoldResolver>) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let players = (0..config.players)
            .map(|i| Participant::new(i, false, config.starting_credits))
            .collect();
        let dealer = Participant::new(config.players, true, config.starting_credits);
        let tubes = TubeLedger::new(&config);
        let stats = StatsEngine::new(config.ante, config.volatility_refresh_interval);
        let history_cap = (config.rounds as usize).min(HISTORY_RETENTION_CAP);
        Ok(Self {
            config,
            seed,
            players,
            dealer,
            tubes,
            stats,
            resolver,
            completed: 0,
            history: VecDeque::with_capacity(history_cap),
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn completed_rounds(&self) -> u64 {
        self.completed
    }

    pub fn is_complete(&self) -> bool {
        self.completed >= self.config.rounds
    }

    pub fn tubes(&self) -> &TubeLedger {
        &self.tubes
    }

    pub fn stats(&self) -> &StatsEngine {
        &self.stats
    }

    pub fn players(&self) -> &[Participant] {
        &self.players
    }

    /// Run exactly one round to completion and fold it into the
    /// aggregates. Each round gets its own deck, seeded
    /// `base_seed + round_index` so any round is reproducible in
    /// isolation.
    pub fn advance_round(&mut self) -> Result<RoundOutcome, SimError> {
        if self.is_complete() {
            return Err(SimError::RunComplete(self.config.rounds));
        }
        let mut deck = Deck::new_with_seed(self.seed.wrapping_add(self.completed));
        deck.shuffle();
        let outcome = run_round(
            self.completed,
            &self.config,
            &mut deck,
            &mut self.players,
            &mut self.dealer,
            &mut self.tubes,
            self.resolver.as_ref(),
        )?;
        self.stats.record_round(&outcome);
        if self.history.len() >= HISTORY_RETENTION_CAP {
            self.history.pop_front();
        }
        self.history.push_back(outcome.clone());
        self.completed += 1;
        Ok(outcome)
    }

    /// Run all remaining rounds.
    pub fn run(&mut self) -> Result<(), SimError> {
        self.run_with_observer(|_| {})
    }

    /// Run all remaining rounds, invoking `observer` after each one.
    /// The observer sees copies of the round number and running totals
    /// and cannot affect determinism.
    pub fn run_with_observer<F>(&mut self, mut observer: F) -> Result<(), SimError>
    where
        F: FnMut(&RoundProgress),
    {
        while !self.is_complete() {
            let outcome = self.advance_round()?;
            let progress = RoundProgress {
                round: self.completed,
                rounds_total: self.config.rounds,
                pot_collected: outcome.pot_collected,
                house_net: self.stats.totals().house_net,
                volatility_index: self.stats.volatility_index(),
            };
            observer(&progress);
        }
        Ok(())
    }

    /// Finalize the statistics (volatility refresh + exploit scan) and
    /// assemble the run report.
    pub fn into_report(self) -> RunReport {
        let analysis = self.stats.finalize(&self.tubes);
        RunReport {
            seed: self.seed,
            tube_balances: self.tubes.balances(),
            config: self.config,
            analysis,
            history: self.history.into(),
        }
    }
}

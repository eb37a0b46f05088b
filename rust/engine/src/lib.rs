//! # tubesim-engine: Draw-Game Economy Simulation Core
//!
//! A deterministic five-card-draw wagering simulator for validating
//! payout economics before deployment. Runs thousands to hundreds of
//! thousands of reproducible rounds against a liquidity-pool ("tube")
//! payout model and reports house edge, outcome volatility, and
//! statistically profitable hold strategies.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and deck construction
//! - [`deck`] - Deterministic deck shuffling with ChaCha20 RNG
//! - [`hand`] - Five-card hand evaluation and strength comparison
//! - [`holds`] - Hold-decision value types and the resolver contract
//! - [`tube`] - Per-rank liquidity pools with refill triggers
//! - [`participant`] - Player/dealer state and credit management
//! - [`round`] - The per-round resolution pipeline (ante through payout)
//! - [`stats`] - Running aggregates, volatility, and exploit detection
//! - [`driver`] - Run orchestration and report assembly
//! - [`logger`] - JSONL round-history serialization
//! - [`config`] - Immutable per-run configuration
//! - [`errors`] - Error types for configuration and engine contracts
//!
//! ## Quick Start
//!
//! ```rust
//! use tubesim_engine::config::SimConfig;
//! use tubesim_engine::driver::Simulation;
//! use tubesim_engine::holds::{HoldCategory, HoldDecision, HoldResolver};
//!
//! // Any deterministic resolver satisfies the engine contract; the
//! // production rulebook ships in the strategy crate.
//! struct DrawFive;
//! impl HoldResolver for DrawFive {
//!     fn resolve(&self, _hand: &[tubesim_engine::cards::Card; 5]) -> HoldDecision {
//!         HoldDecision {
//!             keep: [false; 5],
//!             id: "draw-five",
//!             category: HoldCategory::H0,
//!             ev_estimate: 0.0,
//!             bust_possible: false,
//!         }
//!     }
//!     fn name(&self) -> &str {
//!         "draw-five"
//!     }
//! }
//!
//! let config = SimConfig {
//!     rounds: 100,
//!     seed: Some(42),
//!     ..SimConfig::default()
//! };
//! let mut sim = Simulation::new(config, Box::new(DrawFive)).expect("valid config");
//! sim.run().expect("run completes");
//! let report = sim.into_report();
//! println!("house edge: {:.2}%", report.analysis.house_edge * 100.0);
//! ```
//!
//! ## Deterministic Rounds
//!
//! Every round draws from its own deck seeded `base_seed + round_index`,
//! so a single round can be reproduced in isolation:
//!
//! ```rust
//! use tubesim_engine::deck::Deck;
//!
//! // Same seed produces same shuffle
//! let mut deck1 = Deck::new_with_seed(42);
//! let mut deck2 = Deck::new_with_seed(42);
//! deck1.shuffle();
//! deck2.shuffle();
//! assert_eq!(deck1.deal_n(5), deck2.deal_n(5));
//! ```

pub mod cards;
pub mod config;
pub mod deck;
pub mod driver;
pub mod errors;
pub mod hand;
pub mod holds;
pub mod logger;
pub mod participant;
pub mod round;
pub mod stats;
pub mod tube;

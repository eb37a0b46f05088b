//! # tubesim-strategy: Deterministic Hold Strategies
//!
//! Hold-decision resolvers for the draw-game simulator. Every resolver
//! implements the engine's [`HoldResolver`] contract: a pure function
//! from a 5-card hand to a hold/discard decision, with no randomness
//! and no history dependence.
//!
//! ## Core Components
//!
//! - [`rulebook`] - The production rule-hierarchy resolver
//! - [`PatResolver`] - Degenerate stand-pat baseline for comparison runs
//! - [`create_resolver`] - Factory function for resolvers by name
//!
//! ## Quick Start
//!
//! ```rust
//! use tubesim_strategy::create_resolver;
//! use tubesim_engine::cards::{Card, Rank, Suit};
//!
//! let resolver = create_resolver("rulebook");
//! let hand = [
//!     Card { suit: Suit::Hearts, rank: Rank::Ace },
//!     Card { suit: Suit::Hearts, rank: Rank::King },
//!     Card { suit: Suit::Hearts, rank: Rank::Queen },
//!     Card { suit: Suit::Hearts, rank: Rank::Jack },
//!     Card { suit: Suit::Hearts, rank: Rank::Ten },
//! ];
//! let decision = resolver.resolve(&hand);
//! assert_eq!(decision.id, "pat-royal-flush");
//! ```

use tubesim_engine::cards::Card;
use tubesim_engine::holds::{HoldCategory, HoldDecision};

pub use tubesim_engine::holds::HoldResolver;

pub mod rulebook;

/// Baseline resolver that stands pat on every hand. Useful as a
/// degenerate comparison strategy: it never improves and never busts
/// by choice, so it bounds the house edge from above.
#[derive(Debug, Clone, Default)]
pub struct PatResolver;

impl HoldResolver for PatResolver {
    fn resolve(&self, _hand: &[Card; 5]) -> HoldDecision {
        HoldDecision {
            keep: [true; 5],
            id: "stand-pat",
            category: HoldCategory::H5,
            ev_estimate: 0.0,
            bust_possible: false,
        }
    }

    fn name(&self) -> &str {
        "pat"
    }
}

/// Factory function to create resolvers by name.
///
/// # Supported resolvers
///
/// - `"rulebook"` - The production rule-hierarchy resolver
/// - `"pat"` - Stand-pat baseline
///
/// # Panics
///
/// Panics on an unknown resolver name. Callers validate user input
/// before reaching this point.
pub fn create_resolver(kind: &str) -> Box<dyn HoldResolver> {
    match kind {
        "rulebook" => Box::new(rulebook::RulebookResolver::new()),
        "pat" => Box::new(PatResolver),
        _ => panic!("Unknown resolver: {}", kind),
    }
}

/// Names accepted by [`create_resolver`], for input validation.
pub const RESOLVER_NAMES: [&str; 2] = ["rulebook", "pat"];

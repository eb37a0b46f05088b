//! Hold-decision value types and the resolver seam.
//!
//! The decision itself is produced by a [`HoldResolver`] implementation
//! (the production rulebook lives in the strategy crate); the engine
//! only depends on this contract.

use serde::{Deserialize, Serialize};

use crate::cards::Card;

/// How many of the five positions a decision keeps. Closed set so that
/// dispatch over hold categories is exhaustive at compile time.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum HoldCategory {
    H0,
    H1,
    H2,
    H3,
    H4,
    H5,
}

impl HoldCategory {
    /// Cards held under this category.
    pub fn held_count(self) -> usize {
        match self {
            HoldCategory::H0 => 0,
            HoldCategory::H1 => 1,
            HoldCategory::H2 => 2,
            HoldCategory::H3 => 3,
            HoldCategory::H4 => 4,
            HoldCategory::H5 => 5,
        }
    }

    pub fn from_held_count(count: usize) -> HoldCategory {
        match count {
            0 => HoldCategory::H0,
            1 => HoldCategory::H1,
            2 => HoldCategory::H2,
            3 => HoldCategory::H3,
            4 => HoldCategory::H4,
            _ => HoldCategory::H5,
        }
    }
}

/// An immutable hold/discard decision for one 5-card hand.
///
/// Produced fresh every round per participant and never mutated. The
/// `id` names the matched pattern (e.g. `four-flush-draw`) and keys the
/// per-strategy performance records.
#[derive(Debug, Clone, Serialize)]
pub struct HoldDecision {
    /// Which of the five hand positions to keep.
    pub keep: [bool; 5],
    /// Stable identifier of the matched pattern.
    pub id: &'static str,
    /// Cards-held tier.
    pub category: HoldCategory,
    /// Theoretical expected value of the decision, in antes.
    pub ev_estimate: f64,
    /// True when the hand this decision makes (or keeps) is paid from a
    /// tube, so a showdown win can still bust on an empty pool.
    pub bust_possible: bool,
}

impl HoldDecision {
    pub fn held_count(&self) -> usize {
        self.keep.iter().filter(|&&k| k).count()
    }
}

/// Deterministic hold-strategy contract.
///
/// Implementations must be pure: no randomness, no history dependence;
/// the same five cards (in any order) always produce the same decision.
pub trait HoldResolver: Send + Sync {
    /// Decide which positions of `hand` to keep through the draw.
    fn resolve(&self, hand: &[Card; 5]) -> HoldDecision;

    /// Stable name of this strategy implementation.
    fn name(&self) -> &str;
}

/// Decision identifier recorded when the dealer stands pat without
/// consulting a resolver (`dealer_draw_allowed = false`).
pub const DEALER_STAND_PAT: &str = "dealer-stand-pat";

/// Stand-pat decision used for the dealer when drawing is disabled.
/// A documented fixed case, not a resolver call.
pub fn dealer_stand_pat() -> HoldDecision {
    HoldDecision {
        keep: [true; 5],
        id: DEALER_STAND_PAT,
        category: HoldCategory::H5,
        ev_estimate: 0.0,
        bust_possible: false,
    }
}

//! Liquidity-pool ("tube") ledger.
//!
//! One tube per tube-backed hand rank funds the payouts for that rank.
//! The ledger exposes query, pay, refill, and threshold-trigger
//! detection as separate operations so the round pipeline can apply
//! house-refill-on-decline and player-refill-on-take in a fixed,
//! deterministic order.

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::hand::Category;

/// The closed set of hand ranks backed by a liquidity pool.
///
/// FourOfAKind deliberately has no tube: it wins the flat ante return
/// like any other non-tube-backed rank.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum TubeKind {
    Straight,
    Flush,
    FullHouse,
    StraightFlush,
    RoyalFlush,
}

impl TubeKind {
    pub const ALL: [TubeKind; 5] = [
        TubeKind::Straight,
        TubeKind::Flush,
        TubeKind::FullHouse,
        TubeKind::StraightFlush,
        TubeKind::RoyalFlush,
    ];

    /// Which tube, if any, pays for a given hand category.
    pub fn from_category(category: Category) -> Option<TubeKind> {
        match category {
            Category::Straight => Some(TubeKind::Straight),
            Category::Flush => Some(TubeKind::Flush),
            Category::FullHouse => Some(TubeKind::FullHouse),
            Category::StraightFlush => Some(TubeKind::StraightFlush),
            Category::RoyalFlush => Some(TubeKind::RoyalFlush),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TubeKind::Straight => "straight",
            TubeKind::Flush => "flush",
            TubeKind::FullHouse => "full-house",
            TubeKind::StraightFlush => "straight-flush",
            TubeKind::RoyalFlush => "royal-flush",
        }
    }

    fn index(self) -> usize {
        match self {
            TubeKind::Straight => 0,
            TubeKind::Flush => 1,
            TubeKind::FullHouse => 2,
            TubeKind::StraightFlush => 3,
            TubeKind::RoyalFlush => 4,
        }
    }
}

/// Who funded a refill. Informational only; numeric behavior is
/// identical for both.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum Funder {
    House,
    Player(usize),
}

/// A single payout reservoir.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tube {
    /// Credits currently available for payout.
    pub balance: u64,
    /// Cumulative credits ever put in (initial + refills).
    pub funded: u64,
    /// Cumulative credits paid out.
    pub paid: u64,
    /// Number of winning hits that drained from this tube.
    pub hits: u64,
}

/// The five tubes, addressed by [`TubeKind`].
///
/// Owned exclusively by one simulation's driver thread; no interior
/// locking. Invariant: balances never go negative, enforced by the
/// `can_pay`-before-`pay` contract and unsigned arithmetic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TubeLedger {
    tubes: [Tube; 5],
}

impl TubeLedger {
    /// Seed each tube with its configured initial balance.
    pub fn new(config: &SimConfig) -> Self {
        let mut ledger = Self {
            tubes: Default::default(),
        };
        for kind in TubeKind::ALL {
            let initial = config.tube_initial(kind);
            let t = &mut ledger.tubes[kind.index()];
            t.balance = initial;
            t.funded = initial;
        }
        ledger
    }

    pub fn balance_of(&self, kind: TubeKind) -> u64 {
        self.tubes[kind.index()].balance
    }

    pub fn tube(&self, kind: TubeKind) -> &Tube {
        &self.tubes[kind.index()]
    }

    pub fn can_pay(&self, kind: TubeKind, amount: u64) -> bool {
        self.balance_of(kind) >= amount
    }

    /// Drain `amount` from a tube.
    ///
    /// Precondition: `can_pay(kind, amount)`. The round pipeline checks
    /// first and turns an empty tube into a bust outcome; calling
    /// without the check is a programming error, not a recoverable
    /// condition.
    pub fn pay(&mut self, kind: TubeKind, amount: u64, _winner: usize) {
        let t = &mut self.tubes[kind.index()];
        debug_assert!(t.balance >= amount, "pay called without can_pay");
        t.balance -= amount;
        t.paid += amount;
        t.hits += 1;
    }

    pub fn refill(&mut self, kind: TubeKind, amount: u64, _funder: Funder) {
        let t = &mut self.tubes[kind.index()];
        t.balance += amount;
        t.funded += amount;
    }

    /// Tubes whose balance has fallen to or below the trigger
    /// threshold, in declaration order (deterministic).
    pub fn check_triggers(&self, threshold: u64) -> Vec<TubeKind> {
        TubeKind::ALL
            .into_iter()
            .filter(|&k| self.balance_of(k) <= threshold)
            .collect()
    }

    pub fn process_triggers(&mut self, triggered: &[TubeKind], amount: u64, funder: Funder) {
        for &kind in triggered {
            self.refill(kind, amount, funder);
        }
    }

    /// Snapshot of all balances in `TubeKind::ALL` order.
    pub fn balances(&self) -> [u64; 5] {
        let mut out = [0u64; 5];
        for kind in TubeKind::ALL {
            out[kind.index()] = self.balance_of(kind);
        }
        out
    }
}

//! The production rule-hierarchy resolver.
//!
//! Hands are matched against a strict, ordered hierarchy; the first
//! matching rule wins and binds the decision identifier. Ties inside a
//! tier are broken by fixed sub-rules, never randomness:
//!
//! 1. Stand pat on any made straight-or-better.
//! 2. Four-card holds: two pair, then four to a flush, then an
//!    open-ended straight draw, then an inside straight draw.
//! 3. Three of a kind.
//! 4. One pair (high pair Jacks-or-better vs low pair get distinct
//!    identifiers so their economics are tracked separately).
//! 5. A lone Jack-or-better high card.
//! 6. Draw five.
//!
//! When a hand offers both a flush draw and a straight draw, the flush
//! draw wins. When several straight draws exist, an open-ended draw
//! beats an inside one, then the higher top card wins. Duplicate ranks
//! inside a kept draw keep the first matching card in hand order.
//!
//! EV estimates are coarse theoretical figures in antes, used for
//! reporting only; realized performance comes from the statistics
//! engine.

use tubesim_engine::cards::{all_suits, Card, Rank};
use tubesim_engine::hand::{evaluate_hand, Category};
use tubesim_engine::holds::{HoldCategory, HoldDecision, HoldResolver};

/// Deterministic rule-hierarchy hold resolver.
#[derive(Debug, Clone, Default)]
pub struct RulebookResolver;

impl RulebookResolver {
    pub fn new() -> Self {
        Self
    }
}

impl HoldResolver for RulebookResolver {
    fn resolve(&self, hand: &[Card; 5]) -> HoldDecision {
        decide(hand)
    }

    fn name(&self) -> &str {
        "rulebook"
    }
}

fn decide(hand: &[Card; 5]) -> HoldDecision {
    let strength = evaluate_hand(hand);
    match strength.category {
        Category::RoyalFlush => pat("pat-royal-flush", 5.0, true),
        Category::StraightFlush => pat("pat-straight-flush", 4.0, true),
        // quads win only the flat ante return; no tube behind them
        Category::FourOfAKind => pat("pat-four-of-a-kind", 2.5, false),
        Category::FullHouse => pat("pat-full-house", 2.2, true),
        Category::Flush => pat("pat-flush", 1.8, true),
        Category::Straight => pat("pat-straight", 1.5, true),
        Category::TwoPair => keep_count_2(hand),
        Category::ThreeOfAKind => keep_count_3(hand),
        Category::OnePair | Category::HighCard => weak_hand(hand, strength.category),
    }
}

fn pat(id: &'static str, ev: f64, bust_possible: bool) -> HoldDecision {
    HoldDecision {
        keep: [true; 5],
        id,
        category: HoldCategory::H5,
        ev_estimate: ev,
        bust_possible,
    }
}

fn decision(
    keep: [bool; 5],
    id: &'static str,
    category: HoldCategory,
    ev: f64,
    bust_possible: bool,
) -> HoldDecision {
    HoldDecision {
        keep,
        id,
        category,
        ev_estimate: ev,
        bust_possible,
    }
}

/// Two pair: keep all four paired cards, draw one at the full house.
fn keep_count_2(hand: &[Card; 5]) -> HoldDecision {
    let counts = rank_counts(hand);
    let mut keep = [false; 5];
    for (i, c) in hand.iter().enumerate() {
        if counts[c.rank.value() as usize] == 2 {
            keep[i] = true;
        }
    }
    decision(keep, "two-pair-hold", HoldCategory::H4, 0.8, true)
}

/// Three of a kind: keep the trips, draw two.
fn keep_count_3(hand: &[Card; 5]) -> HoldDecision {
    let counts = rank_counts(hand);
    let mut keep = [false; 5];
    for (i, c) in hand.iter().enumerate() {
        if counts[c.rank.value() as usize] == 3 {
            keep[i] = true;
        }
    }
    decision(keep, "trips-hold", HoldCategory::H3, 0.9, true)
}

fn weak_hand(hand: &[Card; 5], category: Category) -> HoldDecision {
    if let Some(keep) = four_flush_positions(hand) {
        return decision(keep, "four-flush-draw", HoldCategory::H4, 0.6, true);
    }
    if let Some((keep, open)) = straight_draw(hand) {
        return if open {
            decision(keep, "open-straight-draw", HoldCategory::H4, 0.5, true)
        } else {
            decision(keep, "inside-straight-draw", HoldCategory::H4, 0.2, true)
        };
    }
    if category == Category::OnePair {
        return pair_hold(hand);
    }
    if let Some(keep) = lone_high_card(hand) {
        return decision(keep, "lone-high-card", HoldCategory::H1, -0.2, false);
    }
    decision([false; 5], "draw-five", HoldCategory::H0, -0.5, false)
}

fn pair_hold(hand: &[Card; 5]) -> HoldDecision {
    let counts = rank_counts(hand);
    let mut keep = [false; 5];
    let mut pair_rank = 0u8;
    for (i, c) in hand.iter().enumerate() {
        if counts[c.rank.value() as usize] == 2 {
            keep[i] = true;
            pair_rank = c.rank.value();
        }
    }
    if pair_rank >= Rank::Jack.value() {
        decision(keep, "high-pair-hold", HoldCategory::H2, 0.4, false)
    } else {
        decision(keep, "low-pair-hold", HoldCategory::H2, 0.1, false)
    }
}

/// Keep the single highest card when it is a Jack or better.
fn lone_high_card(hand: &[Card; 5]) -> Option<[bool; 5]> {
    let mut best: Option<(u8, usize)> = None;
    for (i, c) in hand.iter().enumerate() {
        let v = c.rank.value();
        if v >= Rank::Jack.value() && best.map_or(true, |(bv, _)| v > bv) {
            best = Some((v, i));
        }
    }
    best.map(|(_, i)| {
        let mut keep = [false; 5];
        keep[i] = true;
        keep
    })
}

/// Exactly four cards of one suit: keep them.
fn four_flush_positions(hand: &[Card; 5]) -> Option<[bool; 5]> {
    for s in all_suits() {
        if hand.iter().filter(|c| c.suit == s).count() == 4 {
            let mut keep = [false; 5];
            for (i, c) in hand.iter().enumerate() {
                if c.suit == s {
                    keep[i] = true;
                }
            }
            return Some(keep);
        }
    }
    None
}

/// Find the best four-card straight draw, if any.
///
/// Scans every straight window (wheel through Broadway) for four
/// distinct hand ranks. Open-ended means two ranks complete the
/// straight (a consecutive run not pinned to either end of the rank
/// scale); inside means exactly one. Preference: open over inside,
/// then the higher top card.
fn straight_draw(hand: &[Card; 5]) -> Option<([bool; 5], bool)> {
    // rank presence with the ace at both ends
    let mut present = [false; 15];
    for c in hand.iter() {
        present[c.rank.value() as usize] = true;
        if c.rank == Rank::Ace {
            present[1] = true;
        }
    }

    // (open, window-domain high, window-domain kept ranks)
    let mut best: Option<(bool, u8, Vec<u8>)> = None;
    for low in 1..=10u8 {
        let in_hand: Vec<u8> = (low..low + 5).filter(|&r| present[r as usize]).collect();
        if in_hand.len() != 4 {
            continue;
        }
        let consecutive = in_hand.windows(2).all(|w| w[1] == w[0] + 1);
        let open = consecutive && in_hand[0] >= 2 && in_hand[3] <= 13;
        let high = in_hand[3];
        let replace = match &best {
            None => true,
            Some((b_open, b_high, _)) => (open && !b_open) || (open == *b_open && high > *b_high),
        };
        if replace {
            best = Some((open, high, in_hand));
        }
    }

    best.map(|(open, _, ranks)| (positions_for_ranks(hand, &ranks), open))
}

/// Keep one card per wanted rank, first match in hand order.
/// Window-domain rank 1 is the low ace.
fn positions_for_ranks(hand: &[Card; 5], ranks: &[u8]) -> [bool; 5] {
    let mut keep = [false; 5];
    for &r in ranks {
        let target = if r == 1 { Rank::Ace.value() } else { r };
        for (i, c) in hand.iter().enumerate() {
            if !keep[i] && c.rank.value() == target {
                keep[i] = true;
                break;
            }
        }
    }
    keep
}

fn rank_counts(hand: &[Card; 5]) -> [u8; 15] {
    let mut counts = [0u8; 15];
    for c in hand.iter() {
        counts[c.rank.value() as usize] += 1;
    }
    counts
}

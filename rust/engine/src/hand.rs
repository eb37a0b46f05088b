use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};

/// Hand category for a 5-card draw hand, weakest to strongest.
///
/// RoyalFlush is split out from StraightFlush because the payout model
/// funds the two from separate liquidity pools.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

/// Number of distinct hand categories, for distribution tables.
pub const CATEGORY_COUNT: usize = 10;

impl Category {
    /// Index into a hand-rank distribution table.
    pub fn index(self) -> usize {
        self as usize
    }
}

pub fn category_name(category: Category) -> &'static str {
    match category {
        Category::HighCard => "high card",
        Category::OnePair => "one pair",
        Category::TwoPair => "two pair",
        Category::ThreeOfAKind => "three of a kind",
        Category::Straight => "straight",
        Category::Flush => "flush",
        Category::FullHouse => "full house",
        Category::FourOfAKind => "four of a kind",
        Category::StraightFlush => "straight flush",
        Category::RoyalFlush => "royal flush",
    }
}

/// Evaluated strength of a 5-card hand.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HandStrength {
    pub category: Category,
    // kickers: ordered high -> low for tiebreaks
    pub kickers: [u8; 5],
}

/// Evaluate a complete 5-card hand.
///
/// Pure function: the same five cards (in any order) always produce the
/// same strength. Malformed input (duplicate cards) is a caller
/// contract violation, not a handled failure mode.
pub fn evaluate_hand(cards: &[Card; 5]) -> HandStrength {
    let mut rank_counts = [0u8; 15]; // 2..14 used
    for &c in cards.iter() {
        rank_counts[c.rank.value() as usize] += 1;
    }

    let is_flush = cards.iter().all(|c| c.suit == cards[0].suit);

    let mut uniq: Vec<u8> = Vec::with_capacity(5);
    for r in 2..=14u8 {
        if rank_counts[r as usize] > 0 {
            uniq.push(r);
        }
    }
    let straight_high = if uniq.len() == 5 {
        detect_straight_high(&uniq)
    } else {
        None
    };

    if is_flush {
        if let Some(high) = straight_high {
            let category = if high == Rank::Ace.value() {
                Category::RoyalFlush
            } else {
                Category::StraightFlush
            };
            return HandStrength {
                category,
                kickers: [high, 0, 0, 0, 0],
            };
        }
    }

    if let Some((quad, kicker)) = detect_quads(&rank_counts) {
        return HandStrength {
            category: Category::FourOfAKind,
            kickers: [quad, kicker, 0, 0, 0],
        };
    }

    if let Some((trip, pair)) = detect_full_house(&rank_counts) {
        return HandStrength {
            category: Category::FullHouse,
            kickers: [trip, pair, 0, 0, 0],
        };
    }

    if is_flush {
        let mut ranks: Vec<u8> = cards.iter().map(|c| c.rank.value()).collect();
        ranks.sort_unstable_by(|a, b| b.cmp(a));
        let mut k = [0u8; 5];
        k.copy_from_slice(&ranks);
        return HandStrength {
            category: Category::Flush,
            kickers: k,
        };
    }

    if let Some(high) = straight_high {
        return HandStrength {
            category: Category::Straight,
            kickers: [high, 0, 0, 0, 0],
        };
    }

    let (trip_ranks, pair_ranks, singles) = classify_multiples(&rank_counts);
    if let Some(t) = trip_ranks.first().copied() {
        let mut k = [t, 0, 0, 0, 0];
        let mut rest = singles.clone();
        rest.sort_unstable_by(|a, b| b.cmp(a));
        k[1] = *rest.first().unwrap_or(&0);
        k[2] = *rest.get(1).unwrap_or(&0);
        return HandStrength {
            category: Category::ThreeOfAKind,
            kickers: k,
        };
    }
    if pair_ranks.len() >= 2 {
        let mut prs = pair_ranks.clone();
        prs.sort_unstable();
        prs.reverse();
        let mut k = [prs[0], prs[1], 0, 0, 0];
        k[2] = *singles.first().unwrap_or(&0);
        return HandStrength {
            category: Category::TwoPair,
            kickers: k,
        };
    }
    if let Some(p) = pair_ranks.first().copied() {
        let mut k = [p, 0, 0, 0, 0];
        let mut rest = singles.clone();
        rest.sort_unstable_by(|a, b| b.cmp(a));
        for i in 0..3 {
            k[i + 1] = *rest.get(i).unwrap_or(&0);
        }
        return HandStrength {
            category: Category::OnePair,
            kickers: k,
        };
    }

    let mut highs = singles;
    highs.sort_unstable_by(|a, b| b.cmp(a));
    let mut k = [0u8; 5];
    for (i, item) in k.iter_mut().enumerate() {
        *item = *highs.get(i).unwrap_or(&0);
    }
    HandStrength {
        category: Category::HighCard,
        kickers: k,
    }
}

/// Compare two evaluated hands: category first, then kickers.
pub fn compare_hands(a: &HandStrength, b: &HandStrength) -> Ordering {
    match a.category.cmp(&b.category) {
        Ordering::Equal => a.kickers.cmp(&b.kickers),
        ord => ord,
    }
}

fn detect_straight_high(sorted_unique_ranks: &[u8]) -> Option<u8> {
    debug_assert_eq!(sorted_unique_ranks.len(), 5);
    let v = sorted_unique_ranks;
    if v.windows(2).all(|w| w[1] == w[0] + 1) {
        return Some(v[4]);
    }
    // Wheel: A-2-3-4-5 plays with the five as the high card
    if v == [2, 3, 4, 5, 14] {
        return Some(5);
    }
    None
}

fn detect_quads(rank_counts: &[u8; 15]) -> Option<(u8, u8)> {
    let mut quad = 0u8;
    let mut kicker = 0u8;
    for r in (2..=14u8).rev() {
        match rank_counts[r as usize] {
            4 => quad = r,
            1 if kicker == 0 => kicker = r,
            _ => {}
        }
    }
    if quad == 0 {
        None
    } else {
        Some((quad, kicker))
    }
}

fn detect_full_house(rank_counts: &[u8; 15]) -> Option<(u8, u8)> {
    let mut trip = 0u8;
    let mut pair = 0u8;
    for r in (2..=14u8).rev() {
        match rank_counts[r as usize] {
            3 if trip == 0 => trip = r,
            2 if pair == 0 => pair = r,
            _ => {}
        }
    }
    if trip != 0 && pair != 0 {
        Some((trip, pair))
    } else {
        None
    }
}

fn classify_multiples(rank_counts: &[u8; 15]) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    let mut trips = vec![];
    let mut pairs = vec![];
    let mut singles = vec![];
    for r in 2..=14u8 {
        match rank_counts[r as usize] {
            3 => trips.push(r),
            2 => pairs.push(r),
            1 => singles.push(r),
            _ => {}
        }
    }
    (trips, pairs, singles)
}

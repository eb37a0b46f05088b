//! Deal command: inspect one hand and its hold decision.
//!
//! A debugging surface for the resolver. Deals five cards from a
//! seeded deck, evaluates them, and prints the decision the strategy
//! would take.

use crate::error::CliError;
use crate::formatters::{format_hand, format_holds};
use crate::validation;
use std::io::Write;
use tubesim_engine::cards::Card;
use tubesim_engine::deck::Deck;
use tubesim_engine::hand::{category_name, evaluate_hand};
use tubesim_strategy::create_resolver;

/// Handle the deal command: show one dealt hand and its resolution.
pub fn handle_deal_command(
    seed: Option<u64>,
    strategy: &str,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    validation::validate_strategy(strategy).map_err(CliError::InvalidInput)?;

    let seed = seed.unwrap_or_else(rand::random);
    let mut deck = Deck::new_with_seed(seed);
    deck.shuffle();
    let hand: [Card; 5] = deck
        .deal_n(5)
        .try_into()
        .map_err(|_| CliError::Engine("deck underflow".to_string()))?;

    let strength = evaluate_hand(&hand);
    let resolver = create_resolver(strategy);
    let decision = resolver.resolve(&hand);

    writeln!(out, "Seed: {}", seed)?;
    writeln!(out, "Hand: {}", format_hand(&hand))?;
    writeln!(out, "Rank: {}", category_name(strength.category))?;
    writeln!(
        out,
        "Hold: {} ({})",
        format_holds(&hand, &decision.keep),
        decision.id
    )?;
    writeln!(
        out,
        "EV estimate: {:+.2} antes{}",
        decision.ev_estimate,
        if decision.bust_possible {
            ", tube-backed"
        } else {
            ""
        }
    )?;
    Ok(())
}

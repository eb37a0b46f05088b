//! Card and hand formatters for terminal display.
//!
//! Pure functions for rendering cards, hands, and hold masks in command
//! output. Unicode suit symbols are used where the terminal supports
//! them, with an ASCII fallback otherwise.

use tubesim_engine::cards::{Card, Rank, Suit};

/// Check if the terminal supports Unicode card symbols by detecting
/// modern terminal environments. On Windows, checks for Windows
/// Terminal (WT_SESSION), modern terminals (TERM_PROGRAM), or VS Code
/// (VSCODE_INJECTION). On Unix-like systems, assumes Unicode support.
pub fn supports_unicode() -> bool {
    if cfg!(windows) {
        std::env::var("WT_SESSION").is_ok()
            || std::env::var("TERM_PROGRAM").is_ok()
            || std::env::var("VSCODE_INJECTION").is_ok()
    } else {
        true
    }
}

/// Format a Suit using Unicode symbols with ASCII fallback
/// (♥ ♦ ♣ ♠ vs h d c s).
pub fn format_suit(suit: &Suit) -> String {
    if supports_unicode() {
        match suit {
            Suit::Hearts => "♥",
            Suit::Diamonds => "♦",
            Suit::Clubs => "♣",
            Suit::Spades => "♠",
        }
        .to_string()
    } else {
        match suit {
            Suit::Hearts => "h",
            Suit::Diamonds => "d",
            Suit::Clubs => "c",
            Suit::Spades => "s",
        }
        .to_string()
    }
}

/// Format a Rank as a string (2-9, T, J, Q, K, A).
pub fn format_rank(rank: &Rank) -> String {
    match rank {
        Rank::Two => "2",
        Rank::Three => "3",
        Rank::Four => "4",
        Rank::Five => "5",
        Rank::Six => "6",
        Rank::Seven => "7",
        Rank::Eight => "8",
        Rank::Nine => "9",
        Rank::Ten => "T",
        Rank::Jack => "J",
        Rank::Queen => "Q",
        Rank::King => "K",
        Rank::Ace => "A",
    }
    .to_string()
}

/// Format a Card as rank plus suit, like "A♠" (Unicode) or "As" (ASCII).
pub fn format_card(card: &Card) -> String {
    format!("{}{}", format_rank(&card.rank), format_suit(&card.suit))
}

/// Format a 5-card hand in bracket notation, like "[A♠ K♥ Q♦ 7♣ 2♠]".
pub fn format_hand(cards: &[Card]) -> String {
    if cards.is_empty() {
        "[]".to_string()
    } else {
        let formatted: Vec<String> = cards.iter().map(format_card).collect();
        format!("[{}]", formatted.join(" "))
    }
}

/// Format a hold mask alongside a hand: kept positions show the card,
/// discarded positions show "--".
pub fn format_holds(cards: &[Card], keep: &[bool; 5]) -> String {
    let formatted: Vec<String> = cards
        .iter()
        .zip(keep.iter())
        .map(|(c, &k)| {
            if k {
                format_card(c)
            } else {
                "--".to_string()
            }
        })
        .collect();
    format!("[{}]", formatted.join(" "))
}

//! Input parsing and validation for CLI arguments.
//!
//! Strategy names and sweep seed lists arrive as free-form strings;
//! these helpers turn them into validated values with clear error
//! messages before anything reaches the engine.

use tubesim_strategy::RESOLVER_NAMES;

/// True when `name` is an accepted resolver name.
pub fn is_known_strategy(name: &str) -> bool {
    RESOLVER_NAMES.contains(&name)
}

/// Validate a resolver name, returning a user-facing error otherwise.
pub fn validate_strategy(name: &str) -> Result<(), String> {
    if is_known_strategy(name) {
        Ok(())
    } else {
        Err(format!(
            "unknown strategy '{}' (expected one of: {})",
            name,
            RESOLVER_NAMES.join(", ")
        ))
    }
}

/// Parse a comma-separated seed list, e.g. "1,2,42".
///
/// Empty segments are rejected rather than skipped so a typo like
/// "1,,3" fails loudly.
pub fn parse_seed_list(input: &str) -> Result<Vec<u64>, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("seed list is empty".to_string());
    }
    trimmed
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<u64>()
                .map_err(|_| format!("invalid seed '{}'", part.trim()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_strategies_accepted() {
        assert!(validate_strategy("rulebook").is_ok());
        assert!(validate_strategy("pat").is_ok());
    }

    #[test]
    fn unknown_strategy_rejected_with_choices() {
        let err = validate_strategy("martingale").unwrap_err();
        assert!(err.contains("martingale"));
        assert!(err.contains("rulebook"));
    }

    #[test]
    fn seed_list_parses_and_trims() {
        assert_eq!(parse_seed_list("1, 2,42"), Ok(vec![1, 2, 42]));
    }

    #[test]
    fn seed_list_rejects_garbage() {
        assert!(parse_seed_list("").is_err());
        assert!(parse_seed_list("1,,3").is_err());
        assert!(parse_seed_list("1,x").is_err());
    }
}

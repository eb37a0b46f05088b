//! Statistics aggregation command for round-history analysis.
//!
//! Re-aggregates totals from JSONL round-history files produced by the
//! sim command, validating each record's settlement identity (house
//! net must equal pot minus payouts minus penalties) along the way.

use crate::error::CliError;
use crate::io_utils::read_text_auto;
use crate::ui;
use std::io::Write;
use std::path::Path;
use tubesim_engine::logger::RoundRecord;
use tubesim_engine::round::OutcomeKind;

/// Aggregates statistics from JSONL round-history files.
///
/// Reads round histories (JSONL or .jsonl.zst, single file or a
/// directory tree) and computes summary totals: rounds, outcome
/// distribution, pot collected, payouts, and house net.
///
/// # Validation
///
/// - Detects corrupted or incomplete records
/// - Verifies the settlement identity of every record
/// - Reports warnings for skipped records
pub fn handle_stats_command(
    input: String,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    run_stats(&input, out, err)
}

struct StatsState {
    rounds: u64,
    wins: u64,
    losses: u64,
    busts: u64,
    ties: u64,
    pot_collected: u64,
    payouts: u64,
    bust_penalties: u64,
    house_net: i64,
    skipped: u64,
    corrupted: u64,
    stats_ok: bool,
}

fn consume_stats_content(
    content: String,
    state: &mut StatsState,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let has_trailing_nl = content.ends_with('\n');
    let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
    for (i, line) in lines.iter().enumerate() {
        let rec: RoundRecord = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(_) => {
                if i == lines.len() - 1 && !has_trailing_nl {
                    state.skipped += 1;
                } else {
                    state.corrupted += 1;
                }
                continue;
            }
        };

        let payouts: u64 = rec.outcomes.iter().map(|o| o.payout).sum();
        let penalties: u64 = rec.outcomes.iter().map(|o| o.bust_penalty).sum();
        if rec.house_net != rec.pot_collected as i64 - payouts as i64 - penalties as i64 {
            state.stats_ok = false;
            ui::write_error(
                err,
                &format!("Settlement identity violated at round {}", rec.round_index),
            )?;
            continue;
        }

        state.rounds += 1;
        state.pot_collected += rec.pot_collected;
        state.payouts += payouts;
        state.bust_penalties += penalties;
        state.house_net += rec.house_net;
        for o in &rec.outcomes {
            match o.outcome {
                OutcomeKind::Win => state.wins += 1,
                OutcomeKind::Loss => state.losses += 1,
                OutcomeKind::Bust => state.busts += 1,
                OutcomeKind::Tie => state.ties += 1,
            }
        }
    }
    Ok(())
}

fn run_stats(input: &str, out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let path = Path::new(input);
    let mut state = StatsState {
        rounds: 0,
        wins: 0,
        losses: 0,
        busts: 0,
        ties: 0,
        pot_collected: 0,
        payouts: 0,
        bust_penalties: 0,
        house_net: 0,
        skipped: 0,
        corrupted: 0,
        stats_ok: true,
    };

    if path.is_dir() {
        let mut stack = vec![path.to_path_buf()];
        while let Some(d) = stack.pop() {
            let rd = match std::fs::read_dir(&d) {
                Ok(v) => v,
                Err(_) => continue,
            };
            for e in rd.filter_map(Result::ok) {
                let p = e.path();
                if p.is_dir() {
                    stack.push(p);
                    continue;
                }
                let is_history = p
                    .file_name()
                    .and_then(|f| f.to_str())
                    .map(|f| f.ends_with(".jsonl") || f.ends_with(".jsonl.zst"))
                    .unwrap_or(false);
                if is_history {
                    match read_text_auto(&p.to_string_lossy()) {
                        Ok(content) => {
                            consume_stats_content(content, &mut state, err)?;
                        }
                        Err(_) => {
                            state.corrupted += 1;
                        }
                    }
                }
            }
        }
    } else {
        match read_text_auto(input) {
            Ok(s) => consume_stats_content(s, &mut state, err)?,
            Err(e) => {
                ui::write_error(err, &format!("Failed to read {}: {}", input, e))?;
                return Err(CliError::Config(format!("Failed to read {}: {}", input, e)));
            }
        }
    }

    if state.corrupted > 0 {
        ui::write_error(
            err,
            &format!("Skipped {} corrupted record(s)", state.corrupted),
        )?;
    }
    if state.skipped > 0 {
        ui::write_error(
            err,
            &format!("Discarded {} incomplete final line(s)", state.skipped),
        )?;
    }
    if !path.is_dir() && state.rounds == 0 && (state.corrupted > 0 || state.skipped > 0) {
        ui::write_error(err, "Invalid record")?;
        return Err(CliError::InvalidInput("Invalid record".to_string()));
    }

    let summary = serde_json::json!({
        "rounds": state.rounds,
        "outcomes": {
            "wins": state.wins,
            "losses": state.losses,
            "busts": state.busts,
            "ties": state.ties,
        },
        "pot_collected": state.pot_collected,
        "payouts": state.payouts,
        "bust_penalties": state.bust_penalties,
        "house_net": state.house_net,
    });
    let json_output = serde_json::to_string_pretty(&summary)
        .map_err(|e| CliError::InvalidInput(format!("Failed to serialize stats: {}", e)))?;
    writeln!(out, "{}", json_output)?;
    if state.stats_ok {
        Ok(())
    } else {
        Err(CliError::InvalidInput(
            "Statistics validation failed".to_string(),
        ))
    }
}

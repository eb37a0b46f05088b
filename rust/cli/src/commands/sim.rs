//! Simulation command handler for full economy runs.
//!
//! Runs the configured number of rounds, optionally streaming round
//! history to a JSONL file, then emits the economic report (house
//! edge, volatility, exploit alerts) as JSON.
//!
//! # Environment Variables
//!
//! - `TUBESIM_SIM_FAST`: suppress progress output (batch runs)
//! - `TUBESIM_SIM_BREAK_AFTER`: stop after N rounds (for testing)

use crate::error::CliError;
use crate::io_utils::ensure_parent_dir;
use crate::ui;
use crate::validation;
use chrono::{SecondsFormat, Utc};
use std::io::Write;
use std::path::PathBuf;
use tubesim_engine::config::SimConfig;
use tubesim_engine::driver::Simulation;
use tubesim_engine::logger::{RoundLogger, RoundRecord};
use tubesim_engine::stats::EdgeStatus;
use tubesim_strategy::create_resolver;

/// Handle the sim command: run one full simulation to completion.
///
/// # Arguments
///
/// * `rounds` - Rounds to simulate
/// * `players` - Players at the table, dealer excluded
/// * `ante` - Ante per participant per round
/// * `seed` - Base RNG seed (random when `None`)
/// * `strategy` - Resolver name (`rulebook` or `pat`)
/// * `output` - Optional JSONL round-history path
/// * `report` - Optional JSON report path (stdout when `None`)
/// * `progress` - Print a progress line every N rounds
/// * `out` - Output stream for normal messages
/// * `err` - Output stream for error messages
///
/// # Returns
///
/// `Ok(())` on success, or `CliError` on failure. An interruption via
/// `TUBESIM_SIM_BREAK_AFTER` maps to exit code 130.
#[allow(clippy::too_many_arguments)]
pub fn handle_sim_command(
    rounds: u64,
    players: usize,
    ante: u64,
    seed: Option<u64>,
    strategy: &str,
    output: Option<String>,
    report: Option<String>,
    progress: Option<u64>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if rounds == 0 {
        ui::write_error(err, "rounds must be >= 1")?;
        return Err(CliError::InvalidInput("rounds must be >= 1".to_string()));
    }
    if let Err(msg) = validation::validate_strategy(strategy) {
        ui::write_error(err, &msg)?;
        return Err(CliError::InvalidInput(msg));
    }

    let config = SimConfig {
        rounds,
        players,
        ante,
        seed,
        ..SimConfig::default()
    };
    let mut sim = Simulation::new(config, create_resolver(strategy))?;
    let run_seed = sim.seed();

    let mut logger = match &output {
        Some(p) => {
            let path = PathBuf::from(p);
            if let Err(e) = ensure_parent_dir(&path) {
                ui::write_error(err, &e)?;
                return Err(CliError::Io(std::io::Error::other(e)));
            }
            Some(RoundLogger::create(&path)?)
        }
        None => None,
    };

    let break_after = std::env::var("TUBESIM_SIM_BREAK_AFTER")
        .ok()
        .and_then(|v| v.parse::<u64>().ok());
    let fast_mode = std::env::var("TUBESIM_SIM_FAST")
        .map(|v| {
            matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
        .unwrap_or(false);
    let progress_every = progress.filter(|&n| n > 0);

    let mut completed = 0u64;
    while !sim.is_complete() {
        let outcome = sim.advance_round()?;
        if let Some(lg) = logger.as_mut() {
            lg.write(&RoundRecord::from_outcome(run_seed, &outcome))?;
        }
        completed += 1;

        if !fast_mode {
            if let Some(n) = progress_every {
                if completed % n == 0 {
                    writeln!(
                        out,
                        "round {}/{}: house net {}, volatility {:.3}",
                        completed,
                        rounds,
                        sim.stats().totals().house_net,
                        sim.stats().volatility_index()
                    )?;
                }
            }
        }

        if let Some(b) = break_after {
            if completed == b {
                writeln!(out, "Interrupted: saved {}/{}", completed, rounds)?;
                return Err(CliError::Interrupted(format!(
                    "Interrupted: saved {}/{}",
                    completed, rounds
                )));
            }
        }
    }

    let run = sim.into_report();
    // per-round history goes to --output; the report document carries
    // the aggregate product only
    let doc = serde_json::json!({
        "generated_at": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        "seed": run.seed,
        "config": run.config,
        "tube_balances": run.tube_balances,
        "analysis": run.analysis,
    });
    let json = serde_json::to_string_pretty(&doc)
        .map_err(|e| CliError::Engine(format!("Failed to serialize report: {}", e)))?;

    match &report {
        Some(p) => {
            let path = PathBuf::from(p);
            if let Err(e) = ensure_parent_dir(&path) {
                ui::write_error(err, &e)?;
                return Err(CliError::Io(std::io::Error::other(e)));
            }
            std::fs::write(&path, format!("{}\n", json))?;
            writeln!(out, "Report written to {}", path.display())?;
        }
        None => writeln!(out, "{}", json)?,
    }

    writeln!(out, "Simulated: {} rounds", completed)?;
    writeln!(
        out,
        "House edge: {:.2}% ({})",
        run.analysis.house_edge * 100.0,
        edge_status_label(run.analysis.edge_status)
    )?;
    writeln!(
        out,
        "Volatility index: {:.3} ({:?} risk)",
        run.analysis.volatility_index, run.analysis.risk_tier
    )?;
    if run.analysis.exploit_alerts.is_empty() {
        writeln!(out, "Exploit alerts: none")?;
    } else {
        for alert in &run.analysis.exploit_alerts {
            writeln!(
                out,
                "Exploit alert: {} EV {:+.2} over {} uses ({:?})",
                alert.strategy, alert.expected_value, alert.uses, alert.severity
            )?;
        }
    }
    Ok(())
}

fn edge_status_label(status: EdgeStatus) -> &'static str {
    match status {
        EdgeStatus::BelowTarget => "below target",
        EdgeStatus::WithinTarget => "within target",
        EdgeStatus::AboveTarget => "above target",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_sim(rounds: u64, out: &mut Vec<u8>, err: &mut Vec<u8>) -> Result<(), CliError> {
        handle_sim_command(
            rounds,
            2,
            5,
            Some(42),
            "rulebook",
            None,
            None,
            None,
            out,
            err,
        )
    }

    #[test]
    fn test_sim_command_basic_execution() {
        let mut out = Vec::new();
        let mut err = Vec::new();

        let result = run_sim(20, &mut out, &mut err);
        assert!(result.is_ok());

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("Simulated: 20 rounds"));
        assert!(output.contains("House edge"));
    }

    #[test]
    fn test_sim_command_zero_rounds() {
        let mut out = Vec::new();
        let mut err = Vec::new();

        let result = run_sim(0, &mut out, &mut err);
        assert!(result.is_err());

        let error_output = String::from_utf8(err).unwrap();
        assert!(error_output.contains("rounds must be >= 1"));
    }

    #[test]
    fn test_sim_command_unknown_strategy() {
        let mut out = Vec::new();
        let mut err = Vec::new();

        let result = handle_sim_command(
            10,
            2,
            5,
            Some(1),
            "martingale",
            None,
            None,
            None,
            &mut out,
            &mut err,
        );
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_sim_command_writes_round_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rounds.jsonl");
        let mut out = Vec::new();
        let mut err = Vec::new();

        let result = handle_sim_command(
            15,
            3,
            5,
            Some(7),
            "rulebook",
            Some(path.to_str().unwrap().to_string()),
            None,
            None,
            &mut out,
            &mut err,
        );
        assert!(result.is_ok());

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 15);
    }

    #[test]
    fn test_sim_command_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let mut out = Vec::new();
        let mut err = Vec::new();

        let result = handle_sim_command(
            25,
            4,
            5,
            Some(9),
            "rulebook",
            None,
            Some(path.to_str().unwrap().to_string()),
            None,
            &mut out,
            &mut err,
        );
        assert!(result.is_ok());

        let contents = std::fs::read_to_string(&path).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(doc["seed"], 9);
        assert_eq!(doc["analysis"]["totals"]["rounds"], 25);
        assert!(doc["generated_at"].is_string());
    }
}

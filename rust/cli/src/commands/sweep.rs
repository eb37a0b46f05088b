//! Parameter-sweep command: independent runs on separate threads.
//!
//! Each seed gets its own `Simulation` with its own tubes, participants,
//! and statistics, so the runs share no mutable state and need no
//! synchronization; the sweep just joins the threads and tabulates.

use crate::error::CliError;
use crate::ui;
use crate::validation;
use std::io::Write;
use tubesim_engine::config::SimConfig;
use tubesim_engine::driver::{RunReport, Simulation};
use tubesim_strategy::create_resolver;

/// Handle the sweep command: one run per seed, tabulated side by side.
pub fn handle_sweep_command(
    seeds: &str,
    rounds: u64,
    players: usize,
    ante: u64,
    strategy: &str,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if let Err(msg) = validation::validate_strategy(strategy) {
        ui::write_error(err, &msg)?;
        return Err(CliError::InvalidInput(msg));
    }
    let seeds = match validation::parse_seed_list(seeds) {
        Ok(v) => v,
        Err(msg) => {
            ui::write_error(err, &msg)?;
            return Err(CliError::InvalidInput(msg));
        }
    };

    let handles: Vec<_> = seeds
        .iter()
        .map(|&seed| {
            let strategy = strategy.to_string();
            std::thread::spawn(move || -> Result<RunReport, String> {
                let config = SimConfig {
                    rounds,
                    players,
                    ante,
                    seed: Some(seed),
                    ..SimConfig::default()
                };
                let mut sim =
                    Simulation::new(config, create_resolver(&strategy)).map_err(|e| e.to_string())?;
                sim.run().map_err(|e| e.to_string())?;
                Ok(sim.into_report())
            })
        })
        .collect();

    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.join() {
            Ok(Ok(report)) => reports.push(report),
            Ok(Err(msg)) => {
                ui::write_error(err, &msg)?;
                return Err(CliError::Engine(msg));
            }
            Err(_) => {
                ui::write_error(err, "worker thread panicked")?;
                return Err(CliError::Engine("worker thread panicked".to_string()));
            }
        }
    }

    for report in &reports {
        writeln!(
            out,
            "seed {:>10}: edge {:+.2}%, volatility {:.3}, busts {}",
            report.seed,
            report.analysis.house_edge * 100.0,
            report.analysis.volatility_index,
            report.analysis.totals.busts
        )?;
    }

    let edges: Vec<f64> = reports.iter().map(|r| r.analysis.house_edge).collect();
    let mean = edges.iter().sum::<f64>() / edges.len() as f64;
    let min = edges.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = edges.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    writeln!(
        out,
        "edge across {} runs: mean {:+.2}%, min {:+.2}%, max {:+.2}%, spread {:.2}pp",
        reports.len(),
        mean * 100.0,
        min * 100.0,
        max * 100.0,
        (max - min) * 100.0
    )?;
    writeln!(out, "Swept: {} runs", reports.len())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_runs_each_seed() {
        let mut out = Vec::new();
        let mut err = Vec::new();

        let result = handle_sweep_command("1,2,3", 30, 2, 5, "rulebook", &mut out, &mut err);
        assert!(result.is_ok());

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("Swept: 3 runs"));
        assert!(output.contains("seed"));
        assert!(output.contains("spread"));
    }

    #[test]
    fn test_sweep_same_seed_twice_is_consistent() {
        let mut out = Vec::new();
        let mut err = Vec::new();

        let result = handle_sweep_command("9,9", 40, 2, 5, "rulebook", &mut out, &mut err);
        assert!(result.is_ok());

        // identical seeds must produce identical edges: spread is zero
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("spread 0.00pp"));
    }

    #[test]
    fn test_sweep_rejects_bad_seed_list() {
        let mut out = Vec::new();
        let mut err = Vec::new();

        let result = handle_sweep_command("1,oops", 10, 2, 5, "rulebook", &mut out, &mut err);
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }
}

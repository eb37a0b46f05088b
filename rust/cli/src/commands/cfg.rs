//! Configuration display command.
//!
//! Prints the resolved simulation defaults together with where each
//! value came from (built-in default, `TUBESIM_CONFIG` file, or
//! `TUBESIM_*` environment override).

use crate::config::{load_with_sources, ValueSource};
use crate::error::CliError;
use crate::ui;
use std::io::Write;

pub fn handle_cfg_command(out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let resolved = match load_with_sources() {
        Ok(r) => r,
        Err(e) => {
            ui::write_error(err, &e.to_string())?;
            return Err(CliError::Config(e.to_string()));
        }
    };

    let cfg = &resolved.config;
    let sources = &resolved.sources;
    writeln!(out, "Configuration:")?;
    writeln!(out, "  rounds = {} ({})", cfg.rounds, label(sources.rounds))?;
    writeln!(
        out,
        "  players = {} ({})",
        cfg.players,
        label(sources.players)
    )?;
    writeln!(out, "  ante = {} ({})", cfg.ante, label(sources.ante))?;
    match cfg.seed {
        Some(seed) => writeln!(out, "  seed = {} ({})", seed, label(sources.seed))?,
        None => writeln!(out, "  seed = random ({})", label(sources.seed))?,
    }
    writeln!(
        out,
        "  strategy = {} ({})",
        cfg.strategy,
        label(sources.strategy)
    )?;
    Ok(())
}

fn label(source: ValueSource) -> &'static str {
    match source {
        ValueSource::Default => "default",
        ValueSource::File => "file",
        ValueSource::Env => "env",
    }
}

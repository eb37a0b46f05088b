//! JSONL round-history logging.
//!
//! Each completed round serializes to one line, timestamped on write.
//! The format is append-friendly so long simulations can stream their
//! history to disk instead of holding it in memory.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::round::{ParticipantOutcome, RoundOutcome};
use crate::tube::TubeKind;

/// On-disk form of one round, one JSONL line per record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round_index: u64,
    /// Base RNG seed of the run this round belongs to.
    pub run_seed: u64,
    pub pot_collected: u64,
    pub dealer_ante: u64,
    pub outcomes: Vec<ParticipantOutcome>,
    pub tube_balances_after: [u64; 5],
    pub triggered_tubes: Vec<TubeKind>,
    pub house_net: i64,
    pub net_delta: i64,
    /// Timestamp when the record was written (RFC3339).
    #[serde(default)]
    pub ts: Option<String>,
}

impl RoundRecord {
    pub fn from_outcome(run_seed: u64, outcome: &RoundOutcome) -> Self {
        Self {
            round_index: outcome.round_index,
            run_seed,
            pot_collected: outcome.pot_collected,
            dealer_ante: outcome.dealer_ante,
            outcomes: outcome.outcomes.clone(),
            tube_balances_after: outcome.tube_balances_after,
            triggered_tubes: outcome.triggered_tubes.clone(),
            house_net: outcome.house_net,
            net_delta: outcome.net_delta,
            ts: None,
        }
    }
}

/// Buffered JSONL writer for round records.
pub struct RoundLogger {
    writer: Option<BufWriter<File>>,
}

impl RoundLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                let _ = create_dir_all(parent);
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
        })
    }

    /// A logger that swallows writes; useful in tests.
    pub fn disabled() -> Self {
        Self { writer: None }
    }

    pub fn write(&mut self, record: &RoundRecord) -> std::io::Result<()> {
        // inject timestamp if missing
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}

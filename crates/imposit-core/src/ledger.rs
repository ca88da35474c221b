//! Append-only ledger of completed publishes
//!
//! One `Uploaded <date> <time>` stamp line per run, one
//! `filename,submission_id,doi` line per successfully published
//! deposition. Failures are never recorded; the ledger is the durable
//! record of successes only.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono::Local;
use thiserror::Error;

use crate::deposit::PublishReceipt;

#[derive(Debug, Error)]
#[error("ledger {path}: {source}")]
pub struct LedgerError {
    path: PathBuf,
    #[source]
    source: std::io::Error,
}

pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    /// Open (creating if needed) and stamp the ledger for this run.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let ledger = Self { path: path.into() };
        let stamp = Local::now().format("Uploaded %Y-%m-%d %H:%M").to_string();
        ledger.append(&stamp)?;
        Ok(ledger)
    }

    /// Append one completed publish.
    pub fn record(&self, receipt: &PublishReceipt) -> Result<(), LedgerError> {
        self.append(&format!(
            "{},{},{}",
            receipt.filename, receipt.submission_id, receipt.doi
        ))
    }

    fn append(&self, line: &str) -> Result<(), LedgerError> {
        let io = |source| LedgerError {
            path: self.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io)?;
        writeln!(file, "{line}").map_err(io)
    }
}

//! Batch orchestration
//!
//! One entry is mapped and published to completion before the next
//! begins. A service rejection abandons that entry and the loop goes on;
//! mapping failures abort the whole batch (data-quality problems surface
//! loudly instead of being skipped), as do transport failures and
//! ledger write failures.

use thiserror::Error;

use crate::bibtex::BibEntry;
use crate::deposit::{self, DepositService, PublishError, PublishReceipt};
use crate::ledger::{Ledger, LedgerError};
use crate::mapping::{MappedEntry, Mapper, MappingError};

#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Outcome of a publish run.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub receipts: Vec<PublishReceipt>,
    /// Entries the service rejected, with the rejection that stopped
    /// each one.
    pub rejected: Vec<(String, PublishError)>,
}

/// Map every entry without contacting anything. The dry-run path takes
/// no service and no ledger, so it cannot touch either.
pub fn check_entries(
    entries: &[BibEntry],
    mapper: &Mapper<'_>,
) -> Result<Vec<MappedEntry>, MappingError> {
    entries.iter().map(|entry| mapper.map(entry)).collect()
}

/// Map and publish every entry in order, recording each success in the
/// ledger.
pub async fn publish_entries<S: DepositService>(
    entries: &[BibEntry],
    mapper: &Mapper<'_>,
    service: &S,
    ledger: &Ledger,
) -> Result<BatchOutcome, BatchError> {
    let mut outcome = BatchOutcome::default();

    for entry in entries {
        let mapped = mapper.map(entry)?;
        tracing::info!(entry = %mapped.key, file = %mapped.primary_file, "starting upload");

        match deposit::publish(service, &mapped.metadata, &mapped.primary_file, mapper.root())
            .await
        {
            Ok(receipt) => {
                ledger.record(&receipt)?;
                outcome.receipts.push(receipt);
            }
            Err(rejection @ PublishError::ServiceRejected { .. }) => {
                tracing::error!(entry = %mapped.key, error = %rejection, "upload rejected, skipping entry");
                outcome.rejected.push((mapped.key, rejection));
            }
            Err(other) => return Err(other.into()),
        }
    }

    Ok(outcome)
}

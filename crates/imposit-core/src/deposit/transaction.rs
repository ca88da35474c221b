//! The five-step publish transaction
//!
//! Strictly sequential: create the deposition, attach the primary
//! document, attach any supplementary documents, publish, confirm the
//! assigned identifier. No step is retried. A rejected step abandons the
//! transaction where it stands; files already attached stay attached on
//! the remote deposition (no compensation).

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use super::service::{DepositService, ServiceError, ServiceReply};
use crate::docroot::DocumentRoot;
use crate::metadata::DepositionMetadata;

/// Any status above this is a rejection. The service answers some 2xx
/// codes above 210 that are not successes for deposit operations, so the
/// boundary is deliberately not the conventional 2xx/4xx split.
pub const REJECTION_THRESHOLD: u16 = 210;

pub fn accepted(status: u16) -> bool {
    status <= REJECTION_THRESHOLD
}

/// The step a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStep {
    Create,
    AttachPrimary,
    AttachSupplementary,
    Publish,
    Confirm,
}

impl fmt::Display for TransactionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransactionStep::Create => "create",
            TransactionStep::AttachPrimary => "attach primary file",
            TransactionStep::AttachSupplementary => "attach supplementary file",
            TransactionStep::Publish => "publish",
            TransactionStep::Confirm => "confirm identifier",
        })
    }
}

/// Progress of one publish attempt, advanced as steps complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionState {
    Created,
    PrimaryAttached,
    SupplementaryAttached(usize),
    Published,
    Confirmed,
}

#[derive(Debug, Error)]
pub enum PublishError {
    /// The service refused a step. The entry is abandoned but the batch
    /// goes on.
    #[error("{step} rejected with status {status}: {body}")]
    ServiceRejected {
        step: TransactionStep,
        status: u16,
        body: String,
    },

    /// The transport itself failed; nothing useful can follow.
    #[error("transport failure during {step}: {source}")]
    Service {
        step: TransactionStep,
        #[source]
        source: ServiceError,
    },

    #[error("cannot read {filename}: {source}")]
    File {
        filename: String,
        #[source]
        source: std::io::Error,
    },

    #[error("document root scan failed: {0}")]
    Scan(#[source] std::io::Error),

    #[error("malformed response during {step}: {message}")]
    MalformedResponse {
        step: TransactionStep,
        message: String,
    },
}

/// What a completed transaction leaves behind; the caller writes it to
/// the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub filename: String,
    pub submission_id: u64,
    pub doi: String,
}

#[derive(Debug, Deserialize)]
struct CreatedDeposition {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct FetchedDeposition {
    doi: Option<String>,
}

/// Run the whole transaction for one mapped entry.
pub async fn publish<S: DepositService>(
    service: &S,
    metadata: &DepositionMetadata,
    primary_file: &str,
    root: &DocumentRoot,
) -> Result<PublishReceipt, PublishError> {
    // Non-gating connectivity probe, logged and otherwise ignored.
    match service.list_depositions().await {
        Ok(reply) => tracing::debug!(status = reply.status, "deposition listing probe"),
        Err(err) => tracing::debug!(error = %err, "deposition listing probe failed"),
    }

    // Step 1: create the deposition and learn the submission id.
    let reply = checked(
        service.create_deposition(&metadata.payload()).await,
        TransactionStep::Create,
    )?;
    let submission_id = parse_submission_id(&reply.body)?;
    let mut state = TransactionState::Created;
    log_state(&state);
    tracing::info!(submission_id, "deposition created");

    // Step 2: attach the primary document.
    let content = read_document(root, primary_file)?;
    checked(
        service.attach_file(submission_id, primary_file, content).await,
        TransactionStep::AttachPrimary,
    )?;
    advance(&mut state, TransactionState::PrimaryAttached);

    // Step 3: attach supplementary documents in listing order. On a
    // rejection mid-list, earlier files stay attached remotely.
    let mut attached = 0usize;
    for name in root
        .supplementary_files(primary_file)
        .map_err(PublishError::Scan)?
    {
        tracing::info!(file = %name, submission_id, "attaching supplementary file");
        let content = read_document(root, &name)?;
        checked(
            service.attach_file(submission_id, &name, content).await,
            TransactionStep::AttachSupplementary,
        )?;
        attached += 1;
        advance(&mut state, TransactionState::SupplementaryAttached(attached));
    }

    // Step 4: publish.
    checked(
        service.publish_deposition(submission_id).await,
        TransactionStep::Publish,
    )?;
    advance(&mut state, TransactionState::Published);
    tracing::info!(submission_id, "deposition published");

    // Step 5: re-fetch and read the assigned identifier. The identifier
    // in the fetched body is authoritative; the status code of this GET
    // is not consulted.
    let reply = service
        .fetch_deposition(submission_id)
        .await
        .map_err(|source| PublishError::Service {
            step: TransactionStep::Confirm,
            source,
        })?;
    let doi = parse_confirmed_doi(&reply.body)?;
    advance(&mut state, TransactionState::Confirmed);
    tracing::info!(submission_id, %doi, "identifier confirmed");

    Ok(PublishReceipt {
        filename: primary_file.to_string(),
        submission_id,
        doi,
    })
}

fn advance(state: &mut TransactionState, next: TransactionState) {
    *state = next;
    log_state(state);
}

fn log_state(state: &TransactionState) {
    tracing::debug!(state = ?state, "transaction state");
}

/// Map a service result into the step's failure classes and apply the
/// rejection threshold.
fn checked(
    result: Result<ServiceReply, ServiceError>,
    step: TransactionStep,
) -> Result<ServiceReply, PublishError> {
    let reply = result.map_err(|source| PublishError::Service { step, source })?;
    if !accepted(reply.status) {
        return Err(PublishError::ServiceRejected {
            step,
            status: reply.status,
            body: reply.body,
        });
    }
    Ok(reply)
}

fn read_document(root: &DocumentRoot, name: &str) -> Result<Vec<u8>, PublishError> {
    std::fs::read(root.path_of(name)).map_err(|source| PublishError::File {
        filename: name.to_string(),
        source,
    })
}

fn parse_submission_id(body: &str) -> Result<u64, PublishError> {
    let created: CreatedDeposition =
        serde_json::from_str(body).map_err(|e| PublishError::MalformedResponse {
            step: TransactionStep::Create,
            message: e.to_string(),
        })?;
    Ok(created.id)
}

fn parse_confirmed_doi(body: &str) -> Result<String, PublishError> {
    let fetched: FetchedDeposition =
        serde_json::from_str(body).map_err(|e| PublishError::MalformedResponse {
            step: TransactionStep::Confirm,
            message: e.to_string(),
        })?;
    fetched.doi.ok_or_else(|| PublishError::MalformedResponse {
        step: TransactionStep::Confirm,
        message: "no doi in deposition".to_string(),
    })
}

//! imposit-core: batch deposition publishing for conference proceedings
//!
//! This library takes the entries of a BibTeX archive file, maps each one
//! to a deposition-metadata document for a Zenodo-compatible archive
//! service, drives the five-step publish transaction (create, attach the
//! primary document, attach supplementary documents, publish, confirm the
//! assigned identifier), and records completed publishes in a local
//! append-only ledger.
//!
//! The pieces:
//! - BibTeX record source (`bibtex`)
//! - Metadata mapping (`mapping`, `metadata`)
//! - Document root scanning (`docroot`)
//! - Deposition service client and publish transaction (`deposit`)
//! - Upload ledger (`ledger`)
//! - Batch orchestration (`run`)
//! - Environment, credentials, and conference profile (`config`)

pub mod bibtex;
pub mod config;
pub mod deposit;
pub mod docroot;
pub mod ledger;
pub mod mapping;
pub mod metadata;
pub mod run;

// Re-export main types for convenience
pub use bibtex::{BibEntry, BibError};
pub use config::{ConferenceProfile, ConfigError, Credentials, Environment};
pub use deposit::{
    DepositService, PublishError, PublishReceipt, ServiceError, ServiceReply, ZenodoService,
    REJECTION_THRESHOLD,
};
pub use docroot::DocumentRoot;
pub use ledger::{Ledger, LedgerError};
pub use mapping::{MappedEntry, Mapper, MappingError};
pub use metadata::{Community, Creator, DepositionMetadata};
pub use run::{BatchError, BatchOutcome};

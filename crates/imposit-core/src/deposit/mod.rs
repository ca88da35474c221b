//! Deposition service client and the publish transaction
//!
//! `service` defines the five REST operations the publisher needs behind
//! a trait (with the reqwest-backed implementation); `transaction` drives
//! the strictly sequential five-step publish flow over any service.

mod service;
mod transaction;

#[cfg(test)]
pub(crate) mod testing;

pub use service::{DepositService, ServiceError, ServiceReply, ZenodoService};
pub use transaction::{
    accepted, publish, PublishError, PublishReceipt, TransactionState, TransactionStep,
    REJECTION_THRESHOLD,
};

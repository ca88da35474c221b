//! Scripted deposit service for tests

use std::cell::RefCell;
use std::collections::VecDeque;

use serde_json::Value;

use super::service::{DepositService, ServiceError, ServiceReply};

pub(crate) fn reply(status: u16, body: &str) -> ServiceReply {
    ServiceReply {
        status,
        body: body.to_string(),
    }
}

/// Replays a fixed sequence of replies and records every call. Running
/// out of script is a test bug and reported as a transport error.
pub(crate) struct ScriptedService {
    replies: RefCell<VecDeque<ServiceReply>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedService {
    pub(crate) fn new(replies: Vec<ServiceReply>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn next(&self, call: String) -> Result<ServiceReply, ServiceError> {
        self.calls.borrow_mut().push(call.clone());
        self.replies
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| ServiceError::Request(format!("script exhausted at {call}")))
    }
}

impl DepositService for ScriptedService {
    async fn list_depositions(&self) -> Result<ServiceReply, ServiceError> {
        self.next("list".to_string())
    }

    async fn create_deposition(&self, _payload: &Value) -> Result<ServiceReply, ServiceError> {
        self.next("create".to_string())
    }

    async fn attach_file(
        &self,
        submission: u64,
        filename: &str,
        _content: Vec<u8>,
    ) -> Result<ServiceReply, ServiceError> {
        self.next(format!("attach {submission} {filename}"))
    }

    async fn publish_deposition(&self, submission: u64) -> Result<ServiceReply, ServiceError> {
        self.next(format!("publish {submission}"))
    }

    async fn fetch_deposition(&self, submission: u64) -> Result<ServiceReply, ServiceError> {
        self.next(format!("fetch {submission}"))
    }
}

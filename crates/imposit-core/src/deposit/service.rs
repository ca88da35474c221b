//! Deposition service operations
//!
//! The REST surface of a Zenodo-compatible deposit API: list, create,
//! attach file, publish, fetch. Behind a trait so the transaction can be
//! driven against a scripted service in tests; the real implementation
//! speaks reqwest with the access token as a query parameter, which is
//! how this service authenticates deposit operations.

use serde_json::Value;
use thiserror::Error;

use crate::config::{Credentials, Environment};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Request(String),
}

/// Status and body of one service reply.
#[derive(Debug, Clone)]
pub struct ServiceReply {
    pub status: u16,
    pub body: String,
}

#[allow(async_fn_in_trait)]
pub trait DepositService {
    async fn list_depositions(&self) -> Result<ServiceReply, ServiceError>;
    async fn create_deposition(&self, payload: &Value) -> Result<ServiceReply, ServiceError>;
    async fn attach_file(
        &self,
        submission: u64,
        filename: &str,
        content: Vec<u8>,
    ) -> Result<ServiceReply, ServiceError>;
    async fn publish_deposition(&self, submission: u64) -> Result<ServiceReply, ServiceError>;
    async fn fetch_deposition(&self, submission: u64) -> Result<ServiceReply, ServiceError>;
}

/// reqwest-backed client for one environment of the deposit API.
pub struct ZenodoService {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl ZenodoService {
    pub fn new(environment: Environment, credentials: &Credentials) -> Self {
        Self::with_base_url(
            environment.base_url(),
            credentials.token_for(environment),
        )
    }

    /// Client against an explicit base URL (the environment selection
    /// already resolved, or a local stand-in).
    pub fn with_base_url(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    fn depositions_url(&self) -> String {
        format!("{}/api/deposit/depositions", self.base_url)
    }

    fn auth(&self) -> [(&'static str, &str); 1] {
        [("access_token", self.token.as_str())]
    }

    async fn reply(response: reqwest::Response) -> Result<ServiceReply, ServiceError> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::Request(e.to_string()))?;
        Ok(ServiceReply { status, body })
    }

    fn send_error(e: reqwest::Error) -> ServiceError {
        ServiceError::Request(e.to_string())
    }
}

impl DepositService for ZenodoService {
    async fn list_depositions(&self) -> Result<ServiceReply, ServiceError> {
        let response = self
            .client
            .get(self.depositions_url())
            .query(&self.auth())
            .send()
            .await
            .map_err(Self::send_error)?;
        Self::reply(response).await
    }

    async fn create_deposition(&self, payload: &Value) -> Result<ServiceReply, ServiceError> {
        let response = self
            .client
            .post(self.depositions_url())
            .query(&self.auth())
            .json(payload)
            .send()
            .await
            .map_err(Self::send_error)?;
        Self::reply(response).await
    }

    async fn attach_file(
        &self,
        submission: u64,
        filename: &str,
        content: Vec<u8>,
    ) -> Result<ServiceReply, ServiceError> {
        let form = reqwest::multipart::Form::new()
            .text("filename", filename.to_string())
            .part(
                "file",
                reqwest::multipart::Part::bytes(content).file_name(filename.to_string()),
            );
        let response = self
            .client
            .post(format!("{}/{}/files", self.depositions_url(), submission))
            .query(&self.auth())
            .multipart(form)
            .send()
            .await
            .map_err(Self::send_error)?;
        Self::reply(response).await
    }

    async fn publish_deposition(&self, submission: u64) -> Result<ServiceReply, ServiceError> {
        let response = self
            .client
            .post(format!(
                "{}/{}/actions/publish",
                self.depositions_url(),
                submission
            ))
            .query(&self.auth())
            .send()
            .await
            .map_err(Self::send_error)?;
        Self::reply(response).await
    }

    async fn fetch_deposition(&self, submission: u64) -> Result<ServiceReply, ServiceError> {
        let response = self
            .client
            .get(format!("{}/{}", self.depositions_url(), submission))
            .query(&self.auth())
            .send()
            .await
            .map_err(Self::send_error)?;
        Self::reply(response).await
    }
}

//! Environment, credentials, and conference profile configuration
//!
//! Conference descriptors and access tokens are explicit values loaded
//! from TOML at process start and passed into the mapper and the service
//! constructor; nothing publishes against ambient state.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Which service the publisher talks to. One per run, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Sandbox,
    Production,
}

impl Environment {
    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Sandbox => "https://sandbox.zenodo.org",
            Environment::Production => "https://zenodo.org",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Environment::Sandbox => "sandbox",
            Environment::Production => "production",
        }
    }
}

/// Access tokens for both environments, from a local TOML store.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub sandbox_token: String,
    pub production_token: String,
}

impl Credentials {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        read_toml(path)
    }

    pub fn token_for(&self, environment: Environment) -> &str {
        match environment {
            Environment::Sandbox => &self.sandbox_token,
            Environment::Production => &self.production_token,
        }
    }
}

/// Fixed descriptors stamped into every deposition of a batch, plus the
/// local paths the batch works with.
#[derive(Debug, Clone, Deserialize)]
pub struct ConferenceProfile {
    pub conference_title: String,
    pub conference_acronym: String,
    pub conference_dates: String,
    pub conference_url: String,
    /// Publication date stamped into every document. The year embedded
    /// in entry URLs is never used here.
    pub publication_date: String,
    /// Community the depositions are filed under, if any.
    #[serde(default)]
    pub community: Option<String>,
    #[serde(default = "default_document_root")]
    pub document_root: PathBuf,
    #[serde(default = "default_ledger_path")]
    pub ledger_path: PathBuf,
}

fn default_document_root() -> PathBuf {
    PathBuf::from("upload")
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from("dois.txt")
}

impl ConferenceProfile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        read_toml(path)
    }
}

fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

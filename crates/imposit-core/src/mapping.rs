//! Bibliographic entry to deposition metadata mapping
//!
//! One entry in, one service-ready document out. The mapping is
//! deterministic given the entry and the document root; the presence
//! check against the root is its only side effect.

use thiserror::Error;

use crate::bibtex::BibEntry;
use crate::config::ConferenceProfile;
use crate::docroot::DocumentRoot;
use crate::metadata::{Community, Creator, DepositionMetadata};

/// Description used when an entry carries no abstract.
const MISSING_ABSTRACT: &str = "---";
/// Conference place used when an entry carries no address.
const MISSING_ADDRESS: &str = "Address";

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("entry {key}: missing required field '{field}'")]
    MissingRequiredField { key: String, field: &'static str },

    #[error("entry {key}: {filename} not found in the document root")]
    FileNotFound { key: String, filename: String },
}

/// A mapped entry, ready to publish.
#[derive(Debug, Clone)]
pub struct MappedEntry {
    pub key: String,
    pub metadata: DepositionMetadata,
    pub primary_file: String,
}

pub struct Mapper<'a> {
    profile: &'a ConferenceProfile,
    root: &'a DocumentRoot,
}

impl<'a> Mapper<'a> {
    pub fn new(profile: &'a ConferenceProfile, root: &'a DocumentRoot) -> Self {
        Self { profile, root }
    }

    pub fn root(&self) -> &DocumentRoot {
        self.root
    }

    pub fn map(&self, entry: &BibEntry) -> Result<MappedEntry, MappingError> {
        let url = self.required(entry, "url")?;
        let primary_file = filename_from_url(url).to_string();
        if !self.root.contains(&primary_file) {
            return Err(MappingError::FileNotFound {
                key: entry.key.clone(),
                filename: primary_file,
            });
        }
        let title = self.required(entry, "title")?.to_string();

        // The year encoded in the archive URL is informative only; the
        // published document always carries the profile's publication
        // date.
        if let Some(year) = year_from_url(url) {
            tracing::debug!(entry = %entry.key, year, "publication year per archive URL");
        }

        let creators = entry
            .authors()
            .iter()
            .map(|name| Creator {
                name: clean_author_name(name),
            })
            .collect();

        let metadata = DepositionMetadata {
            title,
            upload_type: "publication".to_string(),
            publication_type: "conferencepaper".to_string(),
            description: entry
                .field("abstract")
                .unwrap_or(MISSING_ABSTRACT)
                .to_string(),
            conference_title: self.profile.conference_title.clone(),
            conference_acronym: self.profile.conference_acronym.clone(),
            conference_dates: self.profile.conference_dates.clone(),
            conference_place: entry
                .field("address")
                .unwrap_or(MISSING_ADDRESS)
                .to_string(),
            conference_url: self.profile.conference_url.clone(),
            publication_date: self.profile.publication_date.clone(),
            creators,
            communities: self
                .profile
                .community
                .iter()
                .map(|identifier| Community {
                    identifier: identifier.clone(),
                })
                .collect(),
            partof_title: entry.field("booktitle").map(str::to_string),
            partof_pages: entry.field("pages").map(str::to_string),
            conference_session: entry.field("note").map(str::to_string),
            imprint_isbn: entry.field("isbn").map(str::to_string),
            journal_issn: entry.field("issn").map(str::to_string),
        };

        Ok(MappedEntry {
            key: entry.key.clone(),
            metadata,
            primary_file,
        })
    }

    fn required<'e>(
        &self,
        entry: &'e BibEntry,
        field: &'static str,
    ) -> Result<&'e str, MappingError> {
        entry
            .field(field)
            .ok_or_else(|| MappingError::MissingRequiredField {
                key: entry.key.clone(),
                field,
            })
    }
}

/// The substring after the final `/` of `url`.
///
/// Query strings are not stripped (`.../p.pdf?v=1` keeps the query) and a
/// trailing slash yields an empty name; both then fail the document-root
/// presence check rather than being repaired here.
pub fn filename_from_url(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Second-to-last path segment of `url`, where archive URLs carry the
/// publication year.
pub fn year_from_url(url: &str) -> Option<&str> {
    let mut segments = url.rsplit('/');
    segments.next()?;
    segments.next()
}

/// Strip structural BibTeX markup from an author name: every `}`, then
/// every `{`, then every two-character `\"` escape, in that order.
/// Anything else passes through unchanged.
pub fn clean_author_name(raw: &str) -> String {
    raw.replace('}', "").replace('{', "").replace("\\\"", "")
}

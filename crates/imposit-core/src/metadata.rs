//! Deposition metadata document
//!
//! The wire form the archive service accepts when a deposition is
//! created: a `metadata` object with the required fields always present
//! and every optional field omitted entirely when the source entry lacks
//! it. The service treats a `null` value differently from a missing key,
//! so optional fields are skip-serialized, never serialized as `null`.

use serde::Serialize;

/// One creator record, `{"name": "..."}` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Creator {
    pub name: String,
}

/// Community membership, `{"identifier": "..."}` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Community {
    pub identifier: String,
}

/// The mapped, service-ready document for one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepositionMetadata {
    pub title: String,
    pub upload_type: String,
    pub publication_type: String,
    pub description: String,
    pub conference_title: String,
    pub conference_acronym: String,
    pub conference_dates: String,
    pub conference_place: String,
    pub conference_url: String,
    pub publication_date: String,
    pub creators: Vec<Creator>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub communities: Vec<Community>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partof_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partof_pages: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conference_session: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imprint_isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal_issn: Option<String>,
}

impl DepositionMetadata {
    /// Wrap into the `{"metadata": {...}}` payload the create operation
    /// expects.
    pub fn payload(&self) -> serde_json::Value {
        serde_json::json!({ "metadata": self })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> DepositionMetadata {
        DepositionMetadata {
            title: "A Paper".to_string(),
            upload_type: "publication".to_string(),
            publication_type: "conferencepaper".to_string(),
            description: "---".to_string(),
            conference_title: "Conference on Things".to_string(),
            conference_acronym: "COT".to_string(),
            conference_dates: "1 June - 3 June, 2024".to_string(),
            conference_place: "Utrecht, Netherlands".to_string(),
            conference_url: "https://cot.example.org".to_string(),
            publication_date: "2024-06-01".to_string(),
            creators: vec![Creator {
                name: "Wallace, Benedikte".to_string(),
            }],
            communities: Vec::new(),
            partof_title: None,
            partof_pages: None,
            conference_session: None,
            imprint_isbn: None,
            journal_issn: None,
        }
    }

    #[test]
    fn test_absent_optionals_are_missing_keys_not_null() {
        let value = serde_json::to_value(minimal()).unwrap();
        let object = value.as_object().unwrap();

        for key in [
            "partof_title",
            "partof_pages",
            "conference_session",
            "imprint_isbn",
            "journal_issn",
            "communities",
        ] {
            assert!(!object.contains_key(key), "{key} should be omitted");
        }
        assert_eq!(object["title"], "A Paper");
        assert_eq!(object["creators"][0]["name"], "Wallace, Benedikte");
    }

    #[test]
    fn test_present_optionals_are_serialized() {
        let mut metadata = minimal();
        metadata.partof_pages = Some("101-108".to_string());
        metadata.imprint_isbn = Some("978-3-00-000000-0".to_string());

        let value = serde_json::to_value(&metadata).unwrap();
        assert_eq!(value["partof_pages"], "101-108");
        assert_eq!(value["imprint_isbn"], "978-3-00-000000-0");
        assert!(value.get("journal_issn").is_none());
    }

    #[test]
    fn test_payload_wraps_in_metadata_object() {
        let payload = minimal().payload();
        assert_eq!(payload["metadata"]["upload_type"], "publication");
        assert_eq!(payload["metadata"]["publication_type"], "conferencepaper");
    }
}

//! Batch flow integration tests
//!
//! Drive the public API the way the CLI does: parse a .bib file, map the
//! entries against a document root, and publish them through a fake
//! deposit service.

use std::cell::RefCell;
use std::collections::VecDeque;

use serde_json::Value;

use imposit_core::bibtex;
use imposit_core::config::ConferenceProfile;
use imposit_core::deposit::{DepositService, ServiceError, ServiceReply};
use imposit_core::docroot::DocumentRoot;
use imposit_core::ledger::Ledger;
use imposit_core::mapping::Mapper;
use imposit_core::run;

fn profile(dir: &std::path::Path) -> ConferenceProfile {
    ConferenceProfile {
        conference_title: "International Conference on Musical Things".to_string(),
        conference_acronym: "ICMT".to_string(),
        conference_dates: "4 September - 6 September, 2024".to_string(),
        conference_url: "https://icmt.example.org".to_string(),
        publication_date: "2025-03-14".to_string(),
        community: Some("icmt_conference".to_string()),
        document_root: dir.to_path_buf(),
        ledger_path: dir.join("dois.txt"),
    }
}

/// Replays a fixed sequence of replies, like a deposit API would.
struct FakeService {
    replies: RefCell<VecDeque<ServiceReply>>,
}

impl FakeService {
    fn new(replies: Vec<(u16, &str)>) -> Self {
        Self {
            replies: RefCell::new(
                replies
                    .into_iter()
                    .map(|(status, body)| ServiceReply {
                        status,
                        body: body.to_string(),
                    })
                    .collect(),
            ),
        }
    }

    fn next(&self) -> Result<ServiceReply, ServiceError> {
        self.replies
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| ServiceError::Request("no reply scripted".to_string()))
    }
}

impl DepositService for FakeService {
    async fn list_depositions(&self) -> Result<ServiceReply, ServiceError> {
        self.next()
    }

    async fn create_deposition(&self, _payload: &Value) -> Result<ServiceReply, ServiceError> {
        self.next()
    }

    async fn attach_file(
        &self,
        _submission: u64,
        _filename: &str,
        _content: Vec<u8>,
    ) -> Result<ServiceReply, ServiceError> {
        self.next()
    }

    async fn publish_deposition(&self, _submission: u64) -> Result<ServiceReply, ServiceError> {
        self.next()
    }

    async fn fetch_deposition(&self, _submission: u64) -> Result<ServiceReply, ServiceError> {
        self.next()
    }
}

#[test]
fn test_check_flow_maps_every_entry() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("paper07.pdf"), b"x").unwrap();
    std::fs::write(dir.path().join("paper08.pdf"), b"x").unwrap();
    let profile = profile(dir.path());
    let root = DocumentRoot::new(&profile.document_root);
    let mapper = Mapper::new(&profile, &root);

    let entries = bibtex::parse_str(
        r#"
@inproceedings{Mueller2024,
    author = {M{\"u}ller, Anna and Berg, Jonas},
    title = {Gesture Mapping for Augmented Instruments},
    url = {https://icmt.example.org/proceedings/2024/paper07.pdf},
    pages = {45-52},
    booktitle = {Proceedings of ICMT 2024},
}
@inproceedings{Berg2024,
    author = {Berg, Jonas},
    title = {A Second Paper},
    url = {https://icmt.example.org/proceedings/2024/paper08.pdf},
}
"#,
    );
    assert_eq!(entries.len(), 2);

    let mapped = run::check_entries(&entries, &mapper).unwrap();

    // markup is cleaned on the way through
    assert_eq!(mapped[0].metadata.creators[0].name, "Muller, Anna");
    assert_eq!(mapped[0].primary_file, "paper07.pdf");

    // optional fields present iff the entry provided them
    let first = serde_json::to_value(&mapped[0].metadata).unwrap();
    assert_eq!(first["partof_pages"], "45-52");
    assert_eq!(first["partof_title"], "Proceedings of ICMT 2024");
    let second = serde_json::to_value(&mapped[1].metadata).unwrap();
    assert!(second.get("partof_pages").is_none());
    assert!(second.get("partof_title").is_none());
    assert_eq!(second["description"], "---");
    assert_eq!(second["publication_date"], "2025-03-14");

    // the dry run opened no ledger
    assert!(!profile.ledger_path.exists());
}

#[tokio::test]
async fn test_publish_flow_records_successes_and_skips_rejections() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("paper07.pdf"), b"x").unwrap();
    std::fs::write(dir.path().join("paper08.pdf"), b"x").unwrap();
    let profile = profile(dir.path());
    let root = DocumentRoot::new(&profile.document_root);
    let mapper = Mapper::new(&profile, &root);
    let ledger = Ledger::open(&profile.ledger_path).unwrap();

    let service = FakeService::new(vec![
        // first entry: the service refuses to create the deposition
        (200, "[]"),
        (403, r#"{"message": "quota exceeded"}"#),
        // second entry: full five-step success
        (200, "[]"),
        (201, r#"{"id": 1205}"#),
        (201, "{}"),
        (202, "{}"),
        (200, r#"{"doi": "10.5281/zenodo.1205"}"#),
    ]);

    let entries = bibtex::parse_str(
        r#"
@inproceedings{a, title = {First}, url = {https://x.org/2024/paper07.pdf}, author = {Doe, Jane}, }
@inproceedings{b, title = {Second}, url = {https://x.org/2024/paper08.pdf}, author = {Doe, Jane}, }
"#,
    );

    let outcome = run::publish_entries(&entries, &mapper, &service, &ledger)
        .await
        .unwrap();

    assert_eq!(outcome.rejected.len(), 1);
    assert_eq!(outcome.rejected[0].0, "a");
    assert_eq!(outcome.receipts.len(), 1);
    assert_eq!(outcome.receipts[0].doi, "10.5281/zenodo.1205");

    let text = std::fs::read_to_string(&profile.ledger_path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Uploaded "));
    assert_eq!(lines[1], "paper08.pdf,1205,10.5281/zenodo.1205");
}

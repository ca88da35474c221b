//! Bibliographic entry model

/// One parsed entry from a `.bib` file.
///
/// Fields keep their source order; lookup is case-insensitive, since
/// archive files mix `Url`, `URL`, and `url` freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibEntry {
    /// Cite key, unique within one source file.
    pub key: String,
    /// Entry type as written, lowercased (`inproceedings`, `article`, ...).
    pub entry_type: String,
    fields: Vec<(String, String)>,
}

impl BibEntry {
    pub fn new(key: impl Into<String>, entry_type: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entry_type: entry_type.into(),
            fields: Vec::new(),
        }
    }

    pub fn push_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Field value by name, case-insensitive.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Author names from the `author` field, in source order.
    ///
    /// Splits on the BibTeX ` and ` separator (and `;`, which some files
    /// use instead). Empty segments are dropped.
    pub fn authors(&self) -> Vec<String> {
        self.field("author")
            .map(|field| {
                field
                    .split(" and ")
                    .flat_map(|part| part.split(';'))
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

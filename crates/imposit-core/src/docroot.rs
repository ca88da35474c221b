//! Document root scanning
//!
//! The local directory holding the documents to upload. The primary
//! document is found by exact filename; supplementary documents share the
//! primary's stem with an `_` suffix (`paper07.pdf` travels with
//! `paper07_file01.mov`, `paper07_file02.pdf`, ...).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct DocumentRoot {
    dir: PathBuf,
}

impl DocumentRoot {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether `name` exists (as a file) under the root.
    pub fn contains(&self, name: &str) -> bool {
        self.dir.join(name).is_file()
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Files that travel with `primary`: same stem plus an `_` suffix,
    /// in directory listing order, the primary itself excluded.
    pub fn supplementary_files(&self, primary: &str) -> io::Result<Vec<String>> {
        let prefix = format!("{}_", stem(primary));
        let mut names = Vec::new();
        for dirent in fs::read_dir(&self.dir)? {
            let name = dirent?.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.starts_with(&prefix) && name != primary {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }
}

/// Filename without its final extension (`paper07.pdf` -> `paper07`).
fn stem(name: &str) -> &str {
    name.rsplit_once('.').map(|(s, _)| s).unwrap_or(name)
}

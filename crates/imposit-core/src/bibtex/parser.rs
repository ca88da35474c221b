//! BibTeX parser implementation using nom
//!
//! Covers what archive batch files actually contain: entries with braced
//! values (nested braces allowed), quoted values, and bare words or
//! numbers. `@comment`, `@preamble`, and `@string` blocks are skipped
//! whole, and a segment that fails to parse is skipped with a scan to the
//! next `@` so one broken record does not hide the rest of the file.

use std::fs;
use std::path::Path;

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    IResult,
};
use thiserror::Error;

use super::entry::BibEntry;

#[derive(Debug, Error)]
pub enum BibError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Parse a `.bib` file from disk.
pub fn parse_file(path: &Path) -> Result<Vec<BibEntry>, BibError> {
    let text = fs::read_to_string(path).map_err(|source| BibError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_str(&text))
}

/// Parse every entry in `input`. Malformed segments are logged and
/// skipped.
pub fn parse_str(input: &str) -> Vec<BibEntry> {
    let mut entries = Vec::new();
    let mut rest = input;

    while let Some(pos) = rest.find('@') {
        rest = &rest[pos..];
        match record(rest) {
            Ok((tail, Some(entry))) => {
                entries.push(entry);
                rest = tail;
            }
            Ok((tail, None)) => rest = tail,
            Err(_) => {
                tracing::warn!(
                    offset = input.len() - rest.len(),
                    "skipping malformed bibtex segment"
                );
                rest = &rest[1..];
            }
        }
    }

    entries
}

/// One `@...` record. Returns `None` for skipped block kinds.
fn record(input: &str) -> IResult<&str, Option<BibEntry>> {
    let (rest, _) = char('@')(input)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, kind) = take_while1(|c: char| c.is_ascii_alphabetic())(rest)?;
    let kind = kind.to_ascii_lowercase();

    if matches!(kind.as_str(), "comment" | "preamble" | "string") {
        let (rest, _) = multispace0(rest)?;
        let (rest, _) = braced_block(rest)?;
        return Ok((rest, None));
    }

    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('{')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, key) =
        take_while1(|c: char| c.is_ascii_alphanumeric() || "_-:./+".contains(c))(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (mut rest, _) = char(',')(rest)?;

    let mut entry = BibEntry::new(key, kind);
    loop {
        let (r, _) = multispace0(rest)?;
        if let Some(tail) = r.strip_prefix('}') {
            return Ok((tail, Some(entry)));
        }
        let (r, (name, value)) = field(r)?;
        entry.push_field(name, value);
        let (r, _) = multispace0(r)?;
        rest = r.strip_prefix(',').unwrap_or(r);
    }
}

/// `name = value`
fn field(input: &str) -> IResult<&str, (String, String)> {
    let (rest, name) =
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-')(input)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('=')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, value) = alt((braced_value, quoted_value, bare_value))(rest)?;
    Ok((rest, (name.to_ascii_lowercase(), value)))
}

/// `{content}` with nested braces; outer braces stripped.
fn braced_value(input: &str) -> IResult<&str, String> {
    let (rest, content) = braced_block(input)?;
    Ok((rest, content[1..content.len() - 1].to_string()))
}

/// `"content"`, braces tracked so a quote inside `{...}` does not end
/// the value. Backslash escapes are kept verbatim.
fn quoted_value(input: &str) -> IResult<&str, String> {
    if !input.starts_with('"') {
        return Err(fail(input));
    }

    let bytes = input.as_bytes();
    let mut depth = 0i32;
    let mut pos = 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'"' if depth == 0 => return Ok((&input[pos + 1..], input[1..pos].to_string())),
            b'{' => depth += 1,
            b'}' => depth -= 1,
            b'\\' => pos += 1,
            _ => {}
        }
        pos += 1;
    }
    Err(fail(input))
}

/// A bare word or number (possibly an unresolved macro name; kept as-is).
fn bare_value(input: &str) -> IResult<&str, String> {
    let (rest, word) =
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-')(input)?;
    Ok((rest, word.to_string()))
}

/// Whole `{...}` block including the outer braces.
fn braced_block(input: &str) -> IResult<&str, &str> {
    if !input.starts_with('{') {
        return Err(fail(input));
    }

    let bytes = input.as_bytes();
    let mut depth = 0i32;
    let mut pos = 0;
    while pos < bytes.len() {
        match bytes[pos] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[pos + 1..], &input[..pos + 1]));
                }
            }
            b'\\' => pos += 1,
            _ => {}
        }
        pos += 1;
    }
    Err(fail(input))
}

fn fail(input: &str) -> nom::Err<nom::error::Error<&str>> {
    nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Char))
}

//! Parsing for `jj workspace list` output.
//!
//! Each line looks like:
//!
//! ```text
//! default: sqpuoqvx 3a5e4c1d (no description set)
//! feature-x: kmkuslsw 9f2b7a10 add login form
//! ```

use serde::Serialize;

/// One workspace line: the name and everything after the first `:`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    pub name: String,
    pub rest: String,
}

impl ListingEntry {
    /// First whitespace-separated token after the colon (the change id).
    #[must_use]
    pub fn revision_id(&self) -> Option<&str> {
        self.rest.split_whitespace().next()
    }
}

fn parse_line(line: &str) -> Option<ListingEntry> {
    let line = line.trim();
    let idx = line.find(':')?;
    if idx == 0 {
        return None;
    }
    let name = line[..idx].trim();
    if name.is_empty() {
        return None;
    }
    Some(ListingEntry {
        name: name.to_owned(),
        rest: line[idx + 1..].trim().to_owned(),
    })
}

/// Parse listing text into entries, in order. Lines without a name are dropped.
#[must_use]
pub fn parse_listing(output: &str) -> Vec<ListingEntry> {
    output.lines().filter_map(parse_line).collect()
}

/// Revision id of workspace `target`, if it is listed with one.
#[must_use]
pub fn extract_revision_id(output: &str, target: &str) -> Option<String> {
    output
        .lines()
        .filter_map(parse_line)
        .find(|entry| entry.name == target)
        .and_then(|entry| entry.revision_id().map(ToOwned::to_owned))
}

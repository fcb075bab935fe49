//! Directory-listing pages.
//!
//! The remote index is an HTML table where every row is a `<td valign="top">`
//! cell holding a single anchor. Directory links end in `/` and the first row
//! is a parent-directory link (`./../`). That layout is the only contract the
//! tool has with the site; all knowledge of it lives here.

mod parse;

use crate::error::{AosdError, FetchError, Result};
use crate::fetch::Fetcher;

/// Link of the parent-directory row present on every listing page.
pub const PARENT_LINK: &str = "./../";

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    name: String,
    link: String,
}

impl ListingEntry {
    pub fn new(name: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            link: link.into(),
        }
    }

    /// Anchor text as shown on the page.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Relative `href` of the row.
    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn is_parent(&self) -> bool {
        self.link == PARENT_LINK
    }

    pub fn is_dir(&self) -> bool {
        self.link.ends_with('/')
    }

    /// Link with its trailing separator removed; the name keywords are matched against.
    pub fn candidate_name(&self) -> &str {
        self.link.trim_end_matches('/')
    }
}

/// Parses a listing page. Zero rows means the page is not a listing we understand.
pub fn parse_listing(url: &str, html: &str) -> Result<Vec<ListingEntry>> {
    let entries = parse::parse_entries(html);
    if entries.is_empty() {
        return Err(AosdError::Parse {
            url: url.to_string(),
        });
    }
    Ok(entries)
}

/// GETs `url` and parses it as a listing.
///
/// Fails with a fetch error when the status is not 2xx or the body is shorter
/// than `min_body_len` characters, and with a parse error when no rows are found.
pub fn fetch_listing(
    fetcher: &dyn Fetcher,
    url: &str,
    min_body_len: usize,
) -> Result<Vec<ListingEntry>> {
    let response = fetcher.get(url)?;
    if !response.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: response.status,
        }
        .into());
    }

    let html = String::from_utf8_lossy(&response.body);
    let len = html.chars().count();
    if len < min_body_len {
        return Err(FetchError::ShortBody {
            url: url.to_string(),
            len,
            min: min_body_len,
        }
        .into());
    }

    let entries = parse_listing(url, &html)?;
    tracing::debug!(url, rows = entries.len(), "parsed listing");
    Ok(entries)
}

/// Rows of a listing without the parent-directory row, in document order.
pub fn without_parent(entries: &[ListingEntry]) -> impl Iterator<Item = &ListingEntry> {
    entries.iter().filter(|e| !e.is_parent())
}

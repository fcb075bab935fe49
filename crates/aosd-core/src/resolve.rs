//! Keyword -> resource name resolution against the top-level listing.
//!
//! `Keyword::new` applies the alias table, `Keyword::normalized` strips spaces
//! and lower-cases, and the first top-level entry whose candidate name
//! contains the normalized keyword wins. Document order decides, not match
//! quality: "cf" against `CFNetwork/, CF/` resolves to `CFNetwork`.

use std::collections::BTreeMap;
use std::fmt;

use crate::config::AosdConfig;
use crate::error::{AosdError, Result};
use crate::fetch::Fetcher;
use crate::listing::{self, ListingEntry};

/// User keyword after alias rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    raw: String,
    effective: String,
}

impl Keyword {
    /// Rewrites `raw` when its lower-cased form is exactly an alias key.
    pub fn new(raw: &str, aliases: &BTreeMap<String, String>) -> Self {
        let effective = match aliases.get(&raw.to_lowercase()) {
            Some(target) => {
                tracing::debug!(raw, target = %target, "keyword alias applied");
                target.clone()
            }
            None => raw.to_string(),
        };
        Self {
            raw: raw.to_string(),
            effective,
        }
    }

    /// Keyword as the user typed it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Keyword after alias rewrite, before normalization.
    pub fn effective(&self) -> &str {
        &self.effective
    }

    /// Spaces removed, lower-cased; the form compared against entry names.
    pub fn normalized(&self) -> String {
        self.effective.replace(' ', "").to_lowercase()
    }
}

/// Name of the top-level directory a keyword resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedResource {
    name: String,
}

impl ResolvedResource {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Listing URL of this resource under `base_url` (which ends in `/`).
    pub fn listing_url(&self, base_url: &str) -> String {
        format!("{}{}/", base_url, self.name)
    }
}

impl fmt::Display for ResolvedResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn matches(entry: &ListingEntry, normalized: &str) -> bool {
    entry.candidate_name().to_lowercase().contains(normalized)
}

/// First non-parent entry whose candidate name contains `normalized`.
pub fn match_first<'a>(entries: &'a [ListingEntry], normalized: &str) -> Option<&'a ListingEntry> {
    listing::without_parent(entries).find(|e| matches(e, normalized))
}

/// Every non-parent entry whose candidate name contains `normalized`, in document order.
pub fn match_all<'a>(entries: &'a [ListingEntry], normalized: &str) -> Vec<&'a ListingEntry> {
    listing::without_parent(entries)
        .filter(|e| matches(e, normalized))
        .collect()
}

/// Fetches the top-level listing and resolves `raw_keyword` to a resource name.
///
/// Only the top-level page is requested; on no match nothing else is fetched.
pub fn resolve(fetcher: &dyn Fetcher, cfg: &AosdConfig, raw_keyword: &str) -> Result<ResolvedResource> {
    let keyword = Keyword::new(raw_keyword, &cfg.aliases);
    let entries = listing::fetch_listing(fetcher, &cfg.base_url, cfg.min_listing_body_len)?;
    resolve_in(&entries, &keyword)
}

/// Resolution against an already-fetched listing.
pub fn resolve_in(entries: &[ListingEntry], keyword: &Keyword) -> Result<ResolvedResource> {
    let normalized = keyword.normalized();
    match match_first(entries, &normalized) {
        Some(entry) => {
            let resolved = ResolvedResource::new(entry.candidate_name());
            tracing::info!(keyword = keyword.raw(), resource = %resolved, "keyword matched");
            Ok(resolved)
        }
        None => {
            tracing::info!(keyword = keyword.raw(), "no listing entry matched");
            Err(AosdError::NotFound {
                keyword: keyword.raw().to_string(),
            })
        }
    }
}

/// All top-level candidates for a keyword plus the one `resolve` would choose.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub keyword: Keyword,
    pub candidates: Vec<ResolvedResource>,
}

impl SearchResult {
    /// The resource `resolve` picks for the same keyword.
    pub fn chosen(&self) -> Option<&ResolvedResource> {
        self.candidates.first()
    }
}

/// Like [`resolve`] but reports every matching top-level entry. Never fails on "no match".
pub fn search(fetcher: &dyn Fetcher, cfg: &AosdConfig, raw_keyword: &str) -> Result<SearchResult> {
    let keyword = Keyword::new(raw_keyword, &cfg.aliases);
    let entries = listing::fetch_listing(fetcher, &cfg.base_url, cfg.min_listing_body_len)?;
    let candidates = match_all(&entries, &keyword.normalized())
        .into_iter()
        .map(|e| ResolvedResource::new(e.candidate_name()))
        .collect();
    Ok(SearchResult {
        keyword,
        candidates,
    })
}

//! Error types for the resolve/download pipeline.
//!
//! Every failure the pipeline can hit is a variant here so the CLI can print
//! a distinct diagnostic per kind. Nothing is retried.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// A listing or file request that did not produce a usable response.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Server answered with a non-2xx status.
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u32 },

    /// Listing body shorter than the plausibility threshold (site down or layout changed).
    #[error("GET {url} returned an implausibly short body ({len} bytes, expected at least {min})")]
    ShortBody { url: String, len: usize, min: usize },

    /// Per-request timeout elapsed.
    #[error("GET {url} timed out after {:.1}s", .elapsed.as_secs_f64())]
    Timeout { url: String, elapsed: Duration },

    /// DNS, connect, TLS or other libcurl-level failure.
    #[error("GET {url} failed after {:.1}s: {source}", .elapsed.as_secs_f64())]
    Transport {
        url: String,
        elapsed: Duration,
        #[source]
        source: curl::Error,
    },
}

impl FetchError {
    /// URL of the request that failed.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Status { url, .. }
            | FetchError::ShortBody { url, .. }
            | FetchError::Timeout { url, .. }
            | FetchError::Transport { url, .. } => url,
        }
    }
}

/// Top-level error for `resolve`, `prepare_output_directory` and `list_and_download`.
#[derive(Debug, Error)]
pub enum AosdError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Listing page parsed but yielded no rows.
    #[error("no listing rows found on {url}")]
    Parse { url: String },

    /// No top-level entry contains the keyword.
    #[error("no resource matches keyword '{keyword}'")]
    NotFound { keyword: String },

    /// Output directory could not be created, even relative to the working directory.
    #[error("cannot create output directory {}: {source}", .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Downloaded body could not be written to disk.
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AosdError {
    /// User-facing guidance for this failure, pointing at `support_url`.
    pub fn advice(&self, support_url: &str) -> String {
        match self {
            AosdError::Fetch(_) | AosdError::Parse { .. } => format!(
                "the listing page may have changed or be unreachable; \
                 if this persists please report it at {support_url}"
            ),
            AosdError::NotFound { .. } => format!(
                "please confirm that the keyword you entered is correct \
                 (try `aosdownload search <keyword>`); support: {support_url}"
            ),
            AosdError::Directory { .. } | AosdError::Write { .. } => format!(
                "check that the destination path is writable; support: {support_url}"
            ),
        }
    }
}

pub type Result<T, E = AosdError> = std::result::Result<T, E>;

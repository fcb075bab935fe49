//! CLI command handlers, one per file.

mod completions;
mod download;
mod search;

pub use completions::run_completions;
pub use download::run_download;
pub use search::run_search;

use aosd_core::AosdError;

/// Wraps a pipeline error with the guidance users need to act on it.
fn explain(err: AosdError, support_url: &str) -> anyhow::Error {
    tracing::error!(error = %err, "run aborted");
    let advice = err.advice(support_url);
    anyhow::anyhow!("{err}\n  {advice}")
}

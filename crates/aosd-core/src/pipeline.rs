//! The whole resolve -> prepare -> download run as one call.

use std::path::Path;

use crate::config::AosdConfig;
use crate::download::{list_and_download_with, DownloadReport, DownloadedFile};
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::output::prepare_output_directory;
use crate::resolve::{resolve, ResolvedResource};

/// Progress reported by [`run_with`].
#[derive(Debug, Clone, Copy)]
pub enum RunEvent<'a> {
    /// The keyword matched and the output directory is ready.
    Resolved {
        resource: &'a ResolvedResource,
        output_dir: &'a Path,
    },
    /// One file has been written.
    Downloaded(&'a DownloadedFile),
}

/// Resolves `keyword`, prepares `<base>/<resource>` and downloads every listed file into it.
///
/// Stops at the first failure; no directory is created if resolution fails.
pub fn run(fetcher: &dyn Fetcher, cfg: &AosdConfig, keyword: &str, base: &str) -> Result<DownloadReport> {
    run_with(fetcher, cfg, keyword, base, |_| {})
}

/// Like [`run`], calling `on_event` as the run progresses.
pub fn run_with<F>(
    fetcher: &dyn Fetcher,
    cfg: &AosdConfig,
    keyword: &str,
    base: &str,
    mut on_event: F,
) -> Result<DownloadReport>
where
    F: FnMut(RunEvent<'_>),
{
    let resource = resolve(fetcher, cfg, keyword)?;
    let output_dir = prepare_output_directory(base, &resource)?;
    on_event(RunEvent::Resolved {
        resource: &resource,
        output_dir: &output_dir,
    });
    list_and_download_with(fetcher, cfg, &resource, &output_dir, |file| {
        on_event(RunEvent::Downloaded(file))
    })
}

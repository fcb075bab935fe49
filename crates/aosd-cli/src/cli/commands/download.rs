//! `aosdownload download <keyword> [dest]` – resolve and download a resource.

use anyhow::Result;
use aosd_core::config::AosdConfig;
use aosd_core::fetch::CurlFetcher;
use aosd_core::pipeline::{self, RunEvent};

use super::explain;

pub fn run_download(cfg: &AosdConfig, keyword: &str, dest: Option<&str>) -> Result<()> {
    let fetcher = CurlFetcher::from_config(cfg);
    let base = dest
        .or(cfg.default_output_dir.as_deref())
        .unwrap_or(".");

    println!(">> Search keyword: {keyword}");
    let report = pipeline::run_with(&fetcher, cfg, keyword, base, |event| match event {
        RunEvent::Resolved { resource, .. } => {
            println!(">> Matched resource [{resource}], downloading")
        }
        RunEvent::Downloaded(f) => println!(">>> Downloaded {} ({} bytes)", f.link, f.bytes),
    })
    .map_err(|e| explain(e, &cfg.support_url))?;

    if report.files.is_empty() {
        println!("No files listed under {}.", report.resource);
    }
    for link in &report.skipped {
        println!("  skipped {link}");
    }
    println!("The files are saved in: {}", report.output_dir.display());
    tracing::info!(
        resource = %report.resource,
        files = report.files.len(),
        bytes = report.total_bytes(),
        "download command completed"
    );
    Ok(())
}

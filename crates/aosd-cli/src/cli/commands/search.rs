//! `aosdownload search <keyword>` – list matching resources without downloading.

use anyhow::Result;
use aosd_core::config::AosdConfig;
use aosd_core::fetch::CurlFetcher;
use aosd_core::resolve;

use super::explain;

pub fn run_search(cfg: &AosdConfig, keyword: &str) -> Result<()> {
    let fetcher = CurlFetcher::from_config(cfg);
    let result = resolve::search(&fetcher, cfg, keyword).map_err(|e| explain(e, &cfg.support_url))?;

    if result.keyword.effective() != result.keyword.raw() {
        println!("'{}' is an alias for '{}'", result.keyword.raw(), result.keyword.effective());
    }
    if result.candidates.is_empty() {
        println!("No resource matches '{keyword}'.");
        return Ok(());
    }
    for (i, candidate) in result.candidates.iter().enumerate() {
        let marker = if i == 0 { "*" } else { " " };
        println!("{marker} {candidate}");
    }
    println!("(* = resource `download` would pick)");
    Ok(())
}

//! Resource listing + sequential file download.
//!
//! Each listed file is fetched in full, then written with a single
//! `fs::write`; the next request starts only after the write returns.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::AosdConfig;
use crate::error::{AosdError, FetchError, Result};
use crate::fetch::Fetcher;
use crate::filename::local_file_name;
use crate::listing;
use crate::resolve::ResolvedResource;

/// One file written to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    /// Listing link the file came from.
    pub link: String,
    pub path: PathBuf,
    pub bytes: u64,
}

/// Outcome of [`list_and_download`].
#[derive(Debug, Clone)]
pub struct DownloadReport {
    pub resource: ResolvedResource,
    pub output_dir: PathBuf,
    pub files: Vec<DownloadedFile>,
    /// Rows that were listed but not downloaded (sub-directories, unusable names).
    pub skipped: Vec<String>,
}

impl DownloadReport {
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.bytes).sum()
    }
}

/// Lists `resource` under the configured base URL and downloads every file row into `output_dir`.
///
/// Existing files with the same name are overwritten. The first failing
/// request or write aborts the run; files written before it stay on disk.
pub fn list_and_download(
    fetcher: &dyn Fetcher,
    cfg: &AosdConfig,
    resource: &ResolvedResource,
    output_dir: &Path,
) -> Result<DownloadReport> {
    list_and_download_with(fetcher, cfg, resource, output_dir, |_| {})
}

/// Like [`list_and_download`], calling `on_file` after each file is written.
pub fn list_and_download_with<F>(
    fetcher: &dyn Fetcher,
    cfg: &AosdConfig,
    resource: &ResolvedResource,
    output_dir: &Path,
    mut on_file: F,
) -> Result<DownloadReport>
where
    F: FnMut(&DownloadedFile),
{
    let listing_url = resource.listing_url(&cfg.base_url);
    let entries = listing::fetch_listing(fetcher, &listing_url, cfg.min_listing_body_len)?;

    let mut files = Vec::new();
    let mut skipped = Vec::new();
    for entry in listing::without_parent(&entries) {
        if entry.is_dir() {
            tracing::warn!(link = entry.link(), "skipping sub-directory in resource listing");
            skipped.push(entry.link().to_string());
            continue;
        }
        let Some(name) = local_file_name(entry.link()) else {
            tracing::warn!(link = entry.link(), "skipping row without a usable file name");
            skipped.push(entry.link().to_string());
            continue;
        };

        let url = format!("{}{}", listing_url, entry.link());
        let path = output_dir.join(&name);
        let bytes = download_file(fetcher, &url, &path)?;
        let file = DownloadedFile {
            link: entry.link().to_string(),
            path,
            bytes,
        };
        on_file(&file);
        files.push(file);
    }

    tracing::info!(
        resource = %resource,
        files = files.len(),
        skipped = skipped.len(),
        dir = %output_dir.display(),
        "resource download finished"
    );
    Ok(DownloadReport {
        resource: resource.clone(),
        output_dir: output_dir.to_path_buf(),
        files,
        skipped,
    })
}

/// GETs `url` and writes the whole body to `path`. Returns the byte count.
fn download_file(fetcher: &dyn Fetcher, url: &str, path: &Path) -> Result<u64> {
    let response = fetcher.get(url)?;
    if !response.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: response.status,
        }
        .into());
    }
    fs::write(path, &response.body).map_err(|source| AosdError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(url, path = %path.display(), bytes = response.body.len(), "wrote file");
    Ok(response.body.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::HttpResponse;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use tempfile::tempdir;

    /// In-memory site; records every requested URL.
    struct FakeSite {
        pages: HashMap<String, HttpResponse>,
        requests: RefCell<Vec<String>>,
    }

    impl FakeSite {
        fn new() -> Self {
            Self {
                pages: HashMap::new(),
                requests: RefCell::new(Vec::new()),
            }
        }

        fn with(mut self, url: &str, status: u32, body: &[u8]) -> Self {
            self.pages.insert(
                url.to_string(),
                HttpResponse {
                    status,
                    body: body.to_vec(),
                },
            );
            self
        }
    }

    impl Fetcher for FakeSite {
        fn get(&self, url: &str) -> std::result::Result<HttpResponse, FetchError> {
            self.requests.borrow_mut().push(url.to_string());
            Ok(self.pages.get(url).cloned().unwrap_or(HttpResponse {
                status: 404,
                body: Vec::new(),
            }))
        }
    }

    fn listing_page(links: &[&str]) -> Vec<u8> {
        let mut html = String::from("<html><body><table>\n");
        html.push_str("<tr><td valign=\"top\"><a href=\"./../\">Parent Directory</a></td></tr>\n");
        for l in links {
            html.push_str(&format!("<tr><td valign=\"top\"><a href=\"{l}\">{l}</a></td></tr>\n"));
        }
        html.push_str("</table></body></html>\n");
        html.into_bytes()
    }

    fn cfg() -> AosdConfig {
        AosdConfig {
            base_url: "http://site/tarballs/".to_string(),
            ..AosdConfig::default()
        }
    }

    #[test]
    fn downloads_every_file_in_listing_order() {
        let site = FakeSite::new()
            .with("http://site/tarballs/CF/", 200, &listing_page(&["a.tar.gz", "b.tar.gz"]))
            .with("http://site/tarballs/CF/a.tar.gz", 200, b"\x1f\x8baaaa")
            .with("http://site/tarballs/CF/b.tar.gz", 200, b"\x1f\x8bbbbbbb");
        let out = tempdir().unwrap();

        let mut seen = Vec::new();
        let report = list_and_download_with(&site, &cfg(), &ResolvedResource::new("CF"), out.path(), |f| {
            seen.push(f.link.clone())
        })
        .unwrap();

        assert_eq!(
            *site.requests.borrow(),
            [
                "http://site/tarballs/CF/",
                "http://site/tarballs/CF/a.tar.gz",
                "http://site/tarballs/CF/b.tar.gz",
            ]
        );
        assert_eq!(seen, ["a.tar.gz", "b.tar.gz"]);
        assert_eq!(report.files.len(), 2);
        assert_eq!(report.total_bytes(), 6 + 8);
        assert_eq!(fs::read(out.path().join("a.tar.gz")).unwrap(), b"\x1f\x8baaaa");
        assert_eq!(fs::read(out.path().join("b.tar.gz")).unwrap(), b"\x1f\x8bbbbbbb");
    }

    #[test]
    fn existing_files_are_overwritten() {
        let site = FakeSite::new()
            .with("http://site/tarballs/dyld/", 200, &listing_page(&["dyld-1.tar.gz"]))
            .with("http://site/tarballs/dyld/dyld-1.tar.gz", 200, b"new");
        let out = tempdir().unwrap();
        fs::write(out.path().join("dyld-1.tar.gz"), b"old contents").unwrap();

        list_and_download(&site, &cfg(), &ResolvedResource::new("dyld"), out.path()).unwrap();
        assert_eq!(fs::read(out.path().join("dyld-1.tar.gz")).unwrap(), b"new");
    }

    #[test]
    fn subdirectories_are_skipped_and_parent_never_fetched() {
        let site = FakeSite::new()
            .with("http://site/tarballs/xnu/", 200, &listing_page(&["old/", "xnu-1.tar.gz"]))
            .with("http://site/tarballs/xnu/xnu-1.tar.gz", 200, b"x");
        let out = tempdir().unwrap();

        let report = list_and_download(&site, &cfg(), &ResolvedResource::new("xnu"), out.path()).unwrap();
        assert_eq!(report.skipped, ["old/"]);
        assert_eq!(report.files.len(), 1);
        assert!(!site.requests.borrow().iter().any(|u| u.contains("./../")));
    }

    #[test]
    fn listing_with_only_parent_downloads_nothing() {
        let site = FakeSite::new().with("http://site/tarballs/empty/", 200, &listing_page(&[]));
        let out = tempdir().unwrap();
        let report =
            list_and_download(&site, &cfg(), &ResolvedResource::new("empty"), out.path()).unwrap();
        assert!(report.files.is_empty());
        assert_eq!(site.requests.borrow().len(), 1);
    }

    #[test]
    fn failing_file_aborts_and_keeps_earlier_files() {
        let site = FakeSite::new()
            .with("http://site/tarballs/CF/", 200, &listing_page(&["a.tar.gz", "b.tar.gz", "c.tar.gz"]))
            .with("http://site/tarballs/CF/a.tar.gz", 200, b"a");
        let out = tempdir().unwrap();

        let err = list_and_download(&site, &cfg(), &ResolvedResource::new("CF"), out.path()).unwrap_err();
        assert!(matches!(err, AosdError::Fetch(FetchError::Status { status: 404, .. })));
        assert!(out.path().join("a.tar.gz").exists());
        assert!(!out.path().join("b.tar.gz").exists());
        assert_eq!(site.requests.borrow().len(), 3, "c.tar.gz is never requested");
    }

    #[test]
    fn resource_listing_failure_is_a_fetch_error() {
        let site = FakeSite::new();
        let out = tempdir().unwrap();
        let err = list_and_download(&site, &cfg(), &ResolvedResource::new("gone"), out.path()).unwrap_err();
        assert!(matches!(err, AosdError::Fetch(FetchError::Status { status: 404, .. })));
    }

    #[test]
    fn unwritable_output_dir_is_a_write_error() {
        let site = FakeSite::new()
            .with("http://site/tarballs/CF/", 200, &listing_page(&["a.tar.gz"]))
            .with("http://site/tarballs/CF/a.tar.gz", 200, b"a");
        let out = tempdir().unwrap();
        let missing = out.path().join("does-not-exist");
        let err = list_and_download(&site, &cfg(), &ResolvedResource::new("CF"), &missing).unwrap_err();
        assert!(matches!(err, AosdError::Write { .. }));
    }
}

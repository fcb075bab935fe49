//! Blocking HTTP GET.
//!
//! Uses the curl crate (libcurl) with one easy handle per request. The whole
//! body is buffered in memory; callers decide what a usable response is.
//! The configured timeout bounds how long a transfer may stall, not how long
//! it may take: a large tarball that keeps arriving is never cut off before
//! the much larger `max_transfer` ceiling.
//! Pipeline code only sees the [`Fetcher`] trait so it can be driven by an
//! in-memory fake in tests.

use crate::config::AosdConfig;
use crate::error::FetchError;
use std::time::{Duration, Instant};

/// Bytes per second below which a transfer counts as stalled.
const STALL_SPEED_LIMIT: u32 = 1;

/// Overall ceiling used by [`CurlFetcher::new`].
const DEFAULT_MAX_TRANSFER: Duration = Duration::from_secs(3600);

/// Status and fully buffered body of a GET.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can perform a GET and hand back the buffered response.
///
/// Implementations return `Err` only for transport-level failures; HTTP error
/// statuses come back as `Ok` with the status set.
pub trait Fetcher {
    fn get(&self, url: &str) -> Result<HttpResponse, FetchError>;
}

/// Production fetcher backed by libcurl.
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    stall_timeout: Duration,
    connect_timeout: Duration,
    max_transfer: Duration,
    user_agent: Option<String>,
}

impl CurlFetcher {
    /// `stall_timeout` is how long a request may go without data.
    pub fn new(stall_timeout: Duration, connect_timeout: Duration) -> Self {
        Self {
            stall_timeout,
            connect_timeout,
            max_transfer: DEFAULT_MAX_TRANSFER,
            user_agent: None,
        }
    }

    pub fn from_config(cfg: &AosdConfig) -> Self {
        Self {
            stall_timeout: cfg.timeout(),
            connect_timeout: cfg.connect_timeout(),
            max_transfer: cfg.max_transfer(),
            user_agent: cfg.user_agent.clone(),
        }
    }

    pub fn with_max_transfer(mut self, max_transfer: Duration) -> Self {
        self.max_transfer = max_transfer;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

impl Fetcher for CurlFetcher {
    fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let started = Instant::now();
        let fail = |source: curl::Error| classify_curl_error(url, started.elapsed(), source);
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url).map_err(fail)?;
        easy.follow_location(true).map_err(fail)?;
        easy.max_redirections(10).map_err(fail)?;
        easy.connect_timeout(self.connect_timeout).map_err(fail)?;
        easy.low_speed_limit(STALL_SPEED_LIMIT).map_err(fail)?;
        easy.low_speed_time(self.stall_timeout).map_err(fail)?;
        easy.timeout(self.max_transfer).map_err(fail)?;
        if let Some(ua) = &self.user_agent {
            easy.useragent(ua).map_err(fail)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(fail)?;
            transfer.perform().map_err(fail)?;
        }

        let status = easy.response_code().map_err(fail)?;
        tracing::debug!(
            url,
            status,
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "GET complete"
        );
        Ok(HttpResponse { status, body })
    }
}

/// Timeouts get their own variant; everything else is a transport failure.
/// libcurl reports both a stall and the overall ceiling as a timeout.
fn classify_curl_error(url: &str, elapsed: Duration, source: curl::Error) -> FetchError {
    if source.is_operation_timedout() {
        FetchError::Timeout {
            url: url.to_string(),
            elapsed,
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            elapsed,
            source,
        }
    }
}

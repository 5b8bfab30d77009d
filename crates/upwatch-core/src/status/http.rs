//! Status source backed by the site's JSON service over HTTP.
//!
//! Uses the curl crate (libcurl) for a plain GET of
//! `{base_url}{service_path}?upload_id={token}`. The transfer is blocking and
//! runs on tokio's blocking pool.

use anyhow::{Context, Result};
use std::time::Duration;
use url::Url;

use super::decode::{decode, StatusResponse};
use super::error::{DecodeError, FetchError};
use super::source::StatusSource;
use crate::config::UpwatchConfig;

/// Status bodies are a few dozen bytes; anything bigger is not a status.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Location of the status service for one site.
#[derive(Debug, Clone)]
pub struct StatusEndpoint {
    url: Url,
}

impl StatusEndpoint {
    /// Joins `service_path` onto `base_url`, keeping any path prefix the base has
    /// (a blog mounted at `/blog` serves its services below `/blog`).
    pub fn new(base_url: &str, service_path: &str) -> Result<Self> {
        let joined = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            service_path.trim_start_matches('/')
        );
        let url = Url::parse(&joined).with_context(|| format!("invalid status URL {joined}"))?;
        match url.scheme() {
            "http" | "https" => Ok(Self { url }),
            other => anyhow::bail!("unsupported scheme {other:?} in status URL {joined}"),
        }
    }

    /// URL that asks for the status of `transport_id`.
    pub fn url_for(&self, transport_id: &str) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut().append_pair("upload_id", transport_id);
        url
    }
}

#[derive(Debug, Clone, Copy)]
struct Timeouts {
    connect: Duration,
    total: Duration,
}

/// Curl-backed [`StatusSource`].
#[derive(Debug, Clone)]
pub struct HttpStatusSource {
    endpoint: StatusEndpoint,
    timeouts: Timeouts,
}

impl HttpStatusSource {
    pub fn new(endpoint: StatusEndpoint, connect_timeout: Duration, timeout: Duration) -> Self {
        Self {
            endpoint,
            timeouts: Timeouts {
                connect: connect_timeout,
                total: timeout,
            },
        }
    }

    pub fn from_config(cfg: &UpwatchConfig) -> Result<Self> {
        let endpoint = StatusEndpoint::new(&cfg.base_url, &cfg.service_path)?;
        Ok(Self::new(
            endpoint,
            Duration::from_secs(cfg.http.connect_timeout_secs),
            Duration::from_secs(cfg.http.timeout_secs),
        ))
    }

    pub fn endpoint(&self) -> &StatusEndpoint {
        &self.endpoint
    }
}

impl StatusSource for HttpStatusSource {
    async fn fetch(&self, transport_id: &str) -> Result<StatusResponse, FetchError> {
        let url = self.endpoint.url_for(transport_id);
        let timeouts = self.timeouts;
        tokio::task::spawn_blocking(move || fetch_blocking(url.as_str(), timeouts))
            .await
            .map_err(|e| FetchError::Worker(e.to_string()))?
    }
}

/// One GET of the status URL. Runs in the current thread.
fn fetch_blocking(url: &str, timeouts: Timeouts) -> Result<StatusResponse, FetchError> {
    let mut body: Vec<u8> = Vec::new();
    let mut overflowed = false;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(5)?;
    easy.connect_timeout(timeouts.connect)?;
    easy.timeout(timeouts.total)?;

    let mut list = curl::easy::List::new();
    list.append("Accept: application/json")?;
    easy.http_headers(list)?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            if body.len() + data.len() > MAX_BODY_BYTES {
                // Short write makes curl abort the transfer.
                overflowed = true;
                return Ok(0);
            }
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()
    };
    // An oversized body aborts curl with a write error; report it as the
    // bad body it is, not as a transport failure.
    if !overflowed {
        performed?;
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        tracing::debug!(url, code, "status service answered non-2xx");
        return Err(FetchError::Http(code));
    }
    if overflowed {
        return Err(DecodeError::TooLarge { limit: MAX_BODY_BYTES }.into());
    }

    Ok(decode(&body)?)
}

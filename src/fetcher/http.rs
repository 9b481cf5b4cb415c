use std::io::{self, Read};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::FetcherConfig;
use crate::errors::{IconError, Result};
use crate::parallel::ParallelRun;
use crate::reference::CharmRef;

use super::{unique_refs, IconFetcher, IconMap, DEFAULT_CONCURRENCY};

/// Response to a GET request: the status line plus an unread body.
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub body: Box<dyn Read>,
}

impl HttpResponse {
    pub fn new(status: u16, reason: impl Into<String>, body: impl Read + 'static) -> Self {
        Self {
            status,
            reason: reason.into(),
            body: Box::new(body),
        }
    }
}

/// Performs GET requests on behalf of [`HttpFetcher`].
///
/// A single client is shared by every concurrent fetch. Errors returned from
/// `get` are treated as transport failures; non-success statuses must be
/// returned as a response rather than an error.
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &str) -> io::Result<HttpResponse>;
}

/// [`HttpClient`] backed by a `ureq` agent.
#[derive(Debug, Clone)]
pub struct UreqClient {
    agent: ureq::Agent,
    user_agent: String,
    max_size: u64,
}

impl UreqClient {
    /// Creates a client whose every request is bounded by `timeout` and whose
    /// response bodies may not exceed `max_size` bytes.
    pub fn new(timeout: Duration, user_agent: impl Into<String>, max_size: u64) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        let agent: ureq::Agent = config.into();
        Self {
            agent,
            user_agent: user_agent.into(),
            max_size,
        }
    }

    pub fn from_config(config: &FetcherConfig) -> Self {
        Self::new(
            Duration::from_secs(config.timeout_secs),
            config.user_agent.clone(),
            config.max_icon_size,
        )
    }
}

impl Default for UreqClient {
    fn default() -> Self {
        Self::from_config(&FetcherConfig::default())
    }
}

impl HttpClient for UreqClient {
    fn get(&self, url: &str) -> io::Result<HttpResponse> {
        let response = self
            .agent
            .get(url)
            .header("User-Agent", &self.user_agent)
            .call()
            .map_err(io::Error::other)?;

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or_default();
        let body = response
            .into_body()
            .into_with_config()
            .limit(self.max_size)
            .reader();
        Ok(HttpResponse::new(status.as_u16(), reason, body))
    }
}

/// Downloads icon SVGs over HTTP from the URL generated for each charm.
///
/// Each distinct icon is fetched once, with up to `concurrency` downloads in
/// flight. The first failure fails the whole batch; downloads already running
/// at that point are not cancelled.
pub struct HttpFetcher {
    concurrency: usize,
    icon_url: Arc<dyn Fn(&CharmRef) -> String + Send + Sync>,
    client: Arc<dyn HttpClient>,
}

impl HttpFetcher {
    /// Creates a fetcher with the default concurrency and a default
    /// [`UreqClient`].
    pub fn new<F>(icon_url: F) -> Self
    where
        F: Fn(&CharmRef) -> String + Send + Sync + 'static,
    {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            icon_url: Arc::new(icon_url),
            client: Arc::new(UreqClient::default()),
        }
    }

    /// Creates a fetcher whose concurrency and client follow `config`.
    pub fn from_config<F>(config: &FetcherConfig, icon_url: F) -> Self
    where
        F: Fn(&CharmRef) -> String + Send + Sync + 'static,
    {
        Self::new(icon_url)
            .with_concurrency(config.concurrency)
            .with_client(Arc::new(UreqClient::from_config(config)))
    }

    /// Sets the number of icons fetched at once. Zero selects the default.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = if concurrency == 0 {
            DEFAULT_CONCURRENCY
        } else {
            concurrency
        };
        self
    }

    /// Replaces the HTTP client used for every request.
    pub fn with_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.client = client;
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }
}

impl IconFetcher for HttpFetcher {
    fn fetch_icons(&self, refs: &[&str]) -> Result<IconMap> {
        let unique = unique_refs(refs)?;
        info!(
            icons = unique.len(),
            concurrency = self.concurrency,
            "fetching charm icons"
        );

        let (tx, rx) = mpsc::channel();
        let mut run: ParallelRun<IconError> = ParallelRun::new(self.concurrency);
        for (path, charm) in unique {
            let icon_url = Arc::clone(&self.icon_url);
            let client = Arc::clone(&self.client);
            let tx = tx.clone();
            run.submit(move || {
                let url = icon_url(&charm);
                debug!(path = %path, url = %url, "fetching icon");
                let icon = fetch_icon(client.as_ref(), &url).inspect_err(|e| {
                    warn!(path = %path, error = %e, "icon fetch failed");
                })?;
                // The receiver outlives every task.
                let _ = tx.send((path, icon));
                Ok(())
            });
        }
        drop(tx);

        run.wait()?;
        Ok(rx.try_iter().collect())
    }
}

/// Retrieves a single icon, requiring a `200 OK` and a fully read body.
fn fetch_icon(client: &dyn HttpClient, url: &str) -> Result<Vec<u8>> {
    let response = client.get(url).map_err(|e| IconError::Transport {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    if response.status != 200 {
        return Err(IconError::HttpStatus {
            url: url.to_string(),
            status: response.status,
            reason: response.reason,
        });
    }

    let mut body = response.body;
    let mut icon = Vec::new();
    body.read_to_end(&mut icon).map_err(|source| IconError::Read {
        url: url.to_string(),
        source,
    })?;
    debug!(url = %url, bytes = icon.len(), "fetched icon");
    Ok(icon)
}

//! IndexNow notification fan-out.
//!
//! One payload is shared by every configured engine. Engine calls run
//! concurrently and independently; the overall ping succeeds when at least
//! one engine accepts the payload. Failures are recorded per engine and never
//! raised.

use std::{path::Path, sync::Arc};

use reqwest::{Client, Url};
use serde::Serialize;
use siteseo_core::{Config, site_pages};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::payload::IndexNowPayload;

/// Notifier construction errors.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// `siteUrl` has no usable host.
    #[error("invalid site URL {url}: {message}")]
    InvalidSiteUrl { url: String, message: String },

    /// HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Result type for notifier operations.
pub type Result<T> = std::result::Result<T, NotifyError>;

/// Why a ping was skipped without contacting any engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// IndexNow is turned off in the configuration.
    Disabled,
    /// The URL list was empty.
    NoUrls,
}

/// Outcome of one engine call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineResult {
    /// Engine host (e.g. `www.bing.com`).
    pub engine: String,

    /// Whether the engine answered with a 2xx status.
    pub success: bool,

    /// HTTP status, when a response arrived.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Transport error or non-2xx description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate outcome of a ping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PingOutcome {
    /// True when at least one engine accepted the payload.
    pub success: bool,

    /// Set when no engine was contacted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<SkipReason>,

    pub message: String,

    /// Absolute URLs that were submitted.
    pub urls: Vec<String>,

    /// One entry per configured engine, in configuration order.
    pub results: Vec<EngineResult>,
}

impl PingOutcome {
    fn skipped(reason: SkipReason) -> Self {
        let message = match reason {
            SkipReason::Disabled => "IndexNow is disabled",
            SkipReason::NoUrls => "no URLs to submit",
        };

        Self {
            success: false,
            reason: Some(reason),
            message: message.to_string(),
            urls: Vec::new(),
            results: Vec::new(),
        }
    }
}

/// IndexNow client.
#[derive(Debug, Clone)]
pub struct Notifier {
    config: Config,
    client: Client,
    host: String,
}

impl Notifier {
    /// Create a notifier with a default HTTP client.
    pub fn new(config: Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("siteseo/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_client(config, client)
    }

    /// Create a notifier using `client` for engine calls.
    pub fn with_client(config: Config, client: Client) -> Result<Self> {
        let host = site_host(&config.site_url)?;
        Ok(Self {
            config,
            client,
            host,
        })
    }

    /// Configuration this notifier was built from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Name of the key-verification file, `<key>.txt`.
    pub fn key_file_name(&self) -> String {
        format!("{}.txt", self.config.index_now.key)
    }

    /// Body of the key-verification file.
    pub fn key_file_contents(&self) -> &str {
        &self.config.index_now.key
    }

    /// Build the payload that [`Notifier::ping`] would send for `urls`.
    pub fn payload<S: AsRef<str>>(&self, urls: &[S]) -> IndexNowPayload {
        IndexNowPayload::new(&self.config, self.host.clone(), urls)
    }

    /// Submit `urls` to every configured engine.
    pub async fn ping<S: AsRef<str>>(&self, urls: &[S]) -> PingOutcome {
        if !self.config.index_now.enabled {
            debug!("IndexNow disabled, skipping ping");
            return PingOutcome::skipped(SkipReason::Disabled);
        }

        if urls.is_empty() {
            debug!("no URLs to submit, skipping ping");
            return PingOutcome::skipped(SkipReason::NoUrls);
        }

        let payload = Arc::new(self.payload(urls));
        info!(
            urls = payload.url_list.len(),
            engines = self.config.index_now.engines.len(),
            "submitting URLs to IndexNow"
        );

        let handles: Vec<_> = self
            .config
            .index_now
            .engines
            .iter()
            .map(|endpoint| {
                let client = self.client.clone();
                let payload = Arc::clone(&payload);
                let endpoint = endpoint.clone();
                tokio::spawn(async move { submit(&client, &endpoint, &payload).await })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (handle, endpoint) in handles.into_iter().zip(&self.config.index_now.engines) {
            let result = handle.await.unwrap_or_else(|e| EngineResult {
                engine: engine_name(endpoint),
                success: false,
                status: None,
                error: Some(format!("engine task failed: {e}")),
            });
            results.push(result);
        }

        let accepted = results.iter().filter(|r| r.success).count();
        let success = accepted > 0;
        let message = format!(
            "{accepted} of {} engines accepted {} URL(s)",
            results.len(),
            payload.url_list.len()
        );

        if success {
            info!(accepted, total = results.len(), "IndexNow ping complete");
        } else {
            warn!(total = results.len(), "IndexNow ping rejected by every engine");
        }

        PingOutcome {
            success,
            reason: None,
            message,
            urls: payload.url_list.clone(),
            results,
        }
    }

    /// Submit a single blog post.
    pub async fn ping_blog_post(&self, slug: &str) -> PingOutcome {
        self.ping(&[blog_path(slug)]).await
    }

    /// Submit a batch of blog posts.
    pub async fn ping_blog_posts<S: AsRef<str>>(&self, slugs: &[S]) -> PingOutcome {
        let urls: Vec<_> = slugs.iter().map(|s| blog_path(s.as_ref())).collect();
        self.ping(&urls).await
    }

    /// Submit the top-level site pages.
    pub async fn ping_site_pages(&self) -> PingOutcome {
        self.ping(&site_pages()).await
    }

    /// Submit the URLs listed in the changed-URL file written by a build,
    /// falling back to the site pages when the list is unavailable or empty.
    pub async fn ping_all_changed_urls(&self, changes_file: &Path) -> PingOutcome {
        match read_changed_urls(changes_file).await {
            Some(urls) if !urls.is_empty() => {
                info!(count = urls.len(), "pinging changed URLs");
                self.ping(&urls).await
            }
            Some(_) => {
                info!("changed-URL list is empty, pinging site pages");
                self.ping_site_pages().await
            }
            None => self.ping_site_pages().await,
        }
    }
}

async fn read_changed_urls(path: &Path) -> Option<Vec<String>> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "changed-URL list unavailable, pinging site pages");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(urls) => Some(urls),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "changed-URL list is malformed, pinging site pages");
            None
        }
    }
}

async fn submit(client: &Client, endpoint: &str, payload: &IndexNowPayload) -> EngineResult {
    let engine = engine_name(endpoint);

    match client.post(endpoint).json(payload).send().await {
        Ok(response) => {
            let status = response.status();
            let success = status.is_success();
            if success {
                debug!(engine = %engine, status = status.as_u16(), "engine accepted payload");
            } else {
                warn!(engine = %engine, status = status.as_u16(), "engine rejected payload");
            }
            EngineResult {
                engine,
                success,
                status: Some(status.as_u16()),
                error: (!success).then(|| format!("HTTP {status}")),
            }
        }
        Err(e) => {
            warn!(engine = %engine, error = %e, "engine request failed");
            EngineResult {
                engine,
                success: false,
                status: None,
                error: Some(e.to_string()),
            }
        }
    }
}

fn blog_path(slug: &str) -> String {
    format!("/blog/{}", slug.trim_matches('/'))
}

/// Host part of an endpoint URL, or the endpoint itself if it does not parse.
fn engine_name(endpoint: &str) -> String {
    Url::parse(endpoint)
        .ok()
        .and_then(|url| url.host_str().map(ToString::to_string))
        .unwrap_or_else(|| endpoint.to_string())
}

fn site_host(site_url: &str) -> Result<String> {
    let url = Url::parse(site_url).map_err(|e| NotifyError::InvalidSiteUrl {
        url: site_url.to_string(),
        message: e.to_string(),
    })?;

    url.host_str()
        .map(ToString::to_string)
        .ok_or_else(|| NotifyError::InvalidSiteUrl {
            url: site_url.to_string(),
            message: "missing host".to_string(),
        })
}

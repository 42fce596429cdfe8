//! IndexNow payload construction.

use serde::{Deserialize, Serialize};
use siteseo_core::Config;

/// Body POSTed to every engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexNowPayload {
    /// Site host, without scheme or path.
    pub host: String,

    /// Key shared with the engines.
    pub key: String,

    /// Absolute URL of the key-verification file.
    pub key_location: String,

    /// Absolute URLs that changed.
    pub url_list: Vec<String>,
}

impl IndexNowPayload {
    /// Build a payload for `urls`, making every URL absolute.
    pub fn new<S: AsRef<str>>(config: &Config, host: impl Into<String>, urls: &[S]) -> Self {
        Self {
            host: host.into(),
            key: config.index_now.key.clone(),
            key_location: config.key_location(),
            url_list: urls
                .iter()
                .map(|url| absolute_url(config, url.as_ref()))
                .collect(),
        }
    }
}

/// Make `url` absolute under the configured site origin.
///
/// URLs that already carry an http(s) scheme are returned unchanged.
pub fn absolute_url(config: &Config, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        config.url_for(url)
    }
}

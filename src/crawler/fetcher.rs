//! HTTP fetcher
//!
//! All network traffic goes through this module: building the HTTP client
//! with a proper user agent string, fetching catalog pages as text, and
//! fetching image bytes. Requests are issued one at a time by the caller;
//! there is no retry logic; a failed fetch simply ends the node it was
//! feeding.

use crate::config::UserAgentConfig;
use crate::FetchError;
use reqwest::Client;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    // Format: Name/Version (+ContactURL; ContactEmail), contacts optional
    let user_agent = if config.contact_url.is_empty() && config.contact_email.is_empty() {
        format!("{}/{}", config.name, config.version)
    } else {
        format!(
            "{}/{} (+{}; {})",
            config.name, config.version, config.contact_url, config.contact_email
        )
    };

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and returns its body as text.
///
/// Non-2xx statuses are reported as [`FetchError::Status`]; transport
/// failures as [`FetchError::Http`].
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, FetchError> {
    let response = client.get(url).send().await.map_err(|e| FetchError::Http {
        url: url.to_string(),
        source: e,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| FetchError::Http {
        url: url.to_string(),
        source: e,
    })
}

/// Fetches a resource and returns its raw bytes (used for image assets).
pub async fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>, FetchError> {
    let response = client.get(url).send().await.map_err(|e| FetchError::Http {
        url: url.to_string(),
        source: e,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response
        .bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|e| FetchError::Http {
            url: url.to_string(),
            source: e,
        })
}

//! HTTP reload webhook.

use crate::error::{ReloaderError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;

/// Default timeout for a single reload request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Something that can be told the configuration changed.
///
/// The watch loop calls [`notify`] once per detected change and treats any
/// error as a failed reload. Implementations must not retry internally; the
/// next watch tick is the retry.
///
/// [`notify`]: Notifier::notify
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Announce the change.
    ///
    /// # Errors
    ///
    /// Returns an error if the downstream service did not accept the reload.
    async fn notify(&self) -> Result<()>;

    /// Human-readable description of where notifications go (for logging).
    fn endpoint(&self) -> String;
}

/// Sends an empty `POST` to a reload URL.
///
/// Only a `200 OK` response counts as success; any other status or a
/// transport failure is reported as an error.
///
/// # Examples
///
/// ```rust,no_run
/// use config_reloader::notify::{HttpNotifier, Notifier};
/// use std::time::Duration;
///
/// # async fn example() -> config_reloader::error::Result<()> {
/// let notifier = HttpNotifier::new("http://localhost:9090/-/reload", Duration::from_secs(10))?;
/// notifier.notify().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    url: Url,
    client: Client,
}

impl HttpNotifier {
    /// Create a notifier for `url` with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The URL is not an absolute `http` or `https` URL
    /// - The timeout is zero
    /// - The HTTP client cannot be constructed
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let url = parse_reload_url(url)?;
        if timeout.is_zero() {
            return Err(ReloaderError::InvalidConfig(
                "request timeout must be greater than zero".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ReloaderError::HttpClient)?;

        Ok(Self { url, client })
    }

    /// The reload URL.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(&self) -> Result<()> {
        let response = self
            .client
            .post(self.url.clone())
            .send()
            .await
            .map_err(ReloaderError::ReloadRequest)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ReloaderError::ReloadStatus { status });
        }

        Ok(())
    }

    fn endpoint(&self) -> String {
        self.url.to_string()
    }
}

/// Parse and check a reload URL.
///
/// # Errors
///
/// Returns an error if the URL is relative, malformed, or not http(s).
pub fn parse_reload_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url)
        .map_err(|e| ReloaderError::InvalidConfig(format!("invalid reload URL '{}': {}", url, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(ReloaderError::InvalidConfig(format!(
            "unsupported reload URL scheme '{}'; expected http or https",
            scheme
        ))),
    }
}

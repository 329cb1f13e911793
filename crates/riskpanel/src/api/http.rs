//! `reqwest`-backed implementation of [`RiskIssueApi`].

use super::credentials::CredentialProvider;
use super::{RiskIssueApi, project_collection_path, record_path};
use crate::domain::{Draft, ProjectId, RiskIssue};
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default backend address
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Connection and request timeouts for [`HttpApi`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Time allowed to establish a connection
    pub connect: Duration,
    /// Time allowed for a whole request, including the body
    pub request: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(10),
            request: Duration::from_secs(30),
        }
    }
}

/// Error body shape used by the backend: `{"error": "..."}`
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<serde_json::Value>,
}

/// Pull the `error` message out of a failed response body.
///
/// Returns `None` for non-JSON bodies, bodies without an `error` string, and
/// blank messages.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.error? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}

/// Talks to the risk/issue REST endpoints over HTTP.
pub struct HttpApi {
    base: Url,
    client: Client,
    credentials: Arc<dyn CredentialProvider>,
}

impl std::fmt::Debug for HttpApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpApi")
            .field("base", &self.base.as_str())
            .field("credentials", &"<dyn CredentialProvider>")
            .finish_non_exhaustive()
    }
}

impl HttpApi {
    /// Create a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the URL cannot serve as a base for the
    /// endpoint paths, or `Error::Transport` if the HTTP client cannot be
    /// initialized.
    pub fn new(
        base_url: &str,
        credentials: Arc<dyn CredentialProvider>,
        timeouts: Timeouts,
    ) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("Invalid API URL '{base_url}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "Invalid API URL '{base_url}': not a base URL"
            )));
        }

        let client = Client::builder()
            .connect_timeout(timeouts.connect)
            .timeout(timeouts.request)
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(Self {
            base,
            client,
            credentials,
        })
    }

    /// The backend address requests are resolved against
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve path segments against the base URL.
    ///
    /// Segments are percent-encoded, so opaque IDs containing `/` or spaces
    /// stay within their own segment.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the base URL cannot take path segments.
    pub fn endpoint<I>(&self, segments: I) -> Result<Url>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Config(format!("API URL '{}' cannot take a path", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn request(&self, method: Method, url: Url) -> Result<RequestBuilder> {
        let token = self.credentials.bearer().await?;
        debug!(%method, %url, "Sending request");
        Ok(self
            .client
            .request(method, url)
            .bearer_auth(token.expose_secret()))
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), body = %body, "Request rejected");
        Err(Error::Api {
            status: status.as_u16(),
            message: extract_error_message(&body),
        })
    }
}

#[async_trait]
impl RiskIssueApi for HttpApi {
    async fn list(&self, project: &ProjectId) -> Result<Vec<RiskIssue>> {
        let url = self.endpoint(project_collection_path(project))?;
        let response = self.execute(self.request(Method::GET, url).await?).await?;
        let records: Vec<RiskIssue> = response.json().await?;
        debug!(project = %project, count = records.len(), "Fetched records");
        Ok(records)
    }

    async fn create(&self, project: &ProjectId, draft: &Draft) -> Result<RiskIssue> {
        let url = self.endpoint(project_collection_path(project))?;
        let builder = self.request(Method::POST, url).await?.json(draft);
        let record: RiskIssue = self.execute(builder).await?.json().await?;
        debug!(project = %project, id = %record.id, "Created record");
        Ok(record)
    }

    async fn update(&self, record: &RiskIssue) -> Result<()> {
        let url = self.endpoint(record_path(&record.id))?;
        let builder = self.request(Method::PUT, url).await?.json(record);
        self.execute(builder).await?;
        debug!(id = %record.id, status = %record.status, "Updated record");
        Ok(())
    }
}

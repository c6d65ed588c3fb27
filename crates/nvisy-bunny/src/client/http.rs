//! HTTP client for the Bunny storage and purge APIs.

use std::sync::Arc;

use bytes::Bytes;
use futures::{StreamExt, TryStreamExt};
use reqwest::header::{CONTENT_TYPE, RANGE};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};

use super::{BodyStream, ObjectClient, ObjectKey, UploadBody};
use crate::config::BunnyConfig;
use crate::error::{ClientError, ClientResult};
use crate::range::ByteRange;
use crate::{Error, Result, TRACING_TARGET_CLIENT};

/// Header carrying the storage zone password or the account API key.
pub const ACCESS_KEY_HEADER: &str = "AccessKey";

/// Content type Bunny storage expects for object uploads.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Endpoint of the pull-zone cache purge API.
const PURGE_ENDPOINT: &str = "https://api.bunny.net/purge";

/// Error bodies are truncated to this many characters.
const MAX_ERROR_BODY: usize = 512;

/// Inner client that holds the HTTP client and configuration.
struct BunnyClientInner {
    http: Client,
    config: BunnyConfig,
}

/// [`ObjectClient`] backed by the Bunny storage HTTP API.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct BunnyClient {
    inner: Arc<BunnyClientInner>,
}

impl std::fmt::Debug for BunnyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BunnyClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl BunnyClient {
    /// Creates a client for the configured storage zone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid or the HTTP
    /// client cannot be created.
    pub fn new(config: BunnyConfig) -> Result<Self> {
        config.validate()?;

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            storage_zone = %config.storage_zone,
            region = ?config.region(),
            access_key = %config.access_key_masked(),
            timeout_secs = config.timeout_secs,
            "Creating bunny storage client"
        );

        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.effective_user_agent())
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {e}")))?;

        let inner = BunnyClientInner { http, config };
        let client = Self {
            inner: Arc::new(inner),
        };

        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            "Bunny storage client created successfully"
        );

        Ok(client)
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &BunnyConfig {
        &self.inner.config
    }

    fn storage_request(&self, method: Method, key: &ObjectKey) -> RequestBuilder {
        let config = &self.inner.config;
        self.inner
            .http
            .request(method, config.storage_url(key.as_str()))
            .header(ACCESS_KEY_HEADER, &config.access_key)
    }

    fn get_request(&self, key: &ObjectKey, range: Option<ByteRange>) -> RequestBuilder {
        let request = self.storage_request(Method::GET, key);
        match range.and_then(|r| r.header_value()) {
            Some(value) => request.header(RANGE, value),
            None => request,
        }
    }

    fn purge_request(&self, key: &ObjectKey) -> RequestBuilder {
        let config = &self.inner.config;
        let public_url = config.public_url(key.as_str());
        self.inner
            .http
            .post(PURGE_ENDPOINT)
            .query(&[("url", public_url.as_str()), ("async", "false")])
            .header(ACCESS_KEY_HEADER, &config.api_key)
    }
}

#[async_trait::async_trait]
impl ObjectClient for BunnyClient {
    #[tracing::instrument(target = TRACING_TARGET_CLIENT, skip(self, key), fields(key = %key))]
    async fn get_body(&self, key: &ObjectKey, range: Option<ByteRange>) -> ClientResult<Bytes> {
        let response = self.get_request(key, range).send().await?;
        let response = error_for_status(response, key, range).await?;
        let partial = response.status() == StatusCode::PARTIAL_CONTENT;
        let body = response.bytes().await?;

        match range {
            Some(range) if !partial => slice_to_range(body, range, key),
            _ => Ok(body),
        }
    }

    #[tracing::instrument(target = TRACING_TARGET_CLIENT, skip(self, key), fields(key = %key))]
    async fn get_stream(&self, key: &ObjectKey) -> ClientResult<BodyStream> {
        let response = self.get_request(key, None).send().await?;
        let response = error_for_status(response, key, None).await?;

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            content_length = ?response.content_length(),
            "Opened object body stream"
        );

        Ok(response.bytes_stream().map_err(ClientError::from).boxed())
    }

    #[tracing::instrument(target = TRACING_TARGET_CLIENT, skip(self, key, body), fields(key = %key))]
    async fn upload_body(&self, key: &ObjectKey, body: UploadBody) -> ClientResult<()> {
        let response = self
            .storage_request(Method::PUT, key)
            .header(CONTENT_TYPE, OCTET_STREAM)
            .body(reqwest::Body::from(body))
            .send()
            .await?;
        error_for_status(response, key, None).await?;
        Ok(())
    }

    #[tracing::instrument(target = TRACING_TARGET_CLIENT, skip(self, key), fields(key = %key))]
    async fn purge_cache(&self, key: &ObjectKey) -> ClientResult<()> {
        let response = self.purge_request(key).send().await?;
        error_for_status(response, key, None).await?;
        Ok(())
    }

    #[tracing::instrument(target = TRACING_TARGET_CLIENT, skip(self, key), fields(key = %key))]
    async fn delete_object(&self, key: &ObjectKey) -> ClientResult<()> {
        let response = self.storage_request(Method::DELETE, key).send().await?;
        error_for_status(response, key, None).await?;
        Ok(())
    }

    #[tracing::instrument(target = TRACING_TARGET_CLIENT, skip(self, key), fields(key = %key))]
    async fn exists(&self, key: &ObjectKey) -> ClientResult<bool> {
        let response = self.storage_request(Method::HEAD, key).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        error_for_status(response, key, None).await?;
        Ok(true)
    }
}

/// Maps a non-success response onto a [`ClientError`].
async fn error_for_status(
    response: Response,
    key: &ObjectKey,
    range: Option<ByteRange>,
) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let key = key.to_string();
    let err = match (status, range) {
        (StatusCode::NOT_FOUND, _) => ClientError::NotFound { key },
        (StatusCode::RANGE_NOT_SATISFIABLE, Some(range)) => {
            ClientError::RangeNotSatisfiable { key, range }
        }
        (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, _) => ClientError::Unauthorized { key },
        _ => {
            let message = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY)
                .collect();
            ClientError::Status {
                key,
                status: status.as_u16(),
                message,
            }
        }
    };

    tracing::debug!(
        target: TRACING_TARGET_CLIENT,
        status = status.as_u16(),
        error = %err,
        "Storage request failed"
    );

    Err(err)
}

/// Cuts `range` out of a full body returned by a backend that ignored the
/// `Range` header.
fn slice_to_range(body: Bytes, range: ByteRange, key: &ObjectKey) -> ClientResult<Bytes> {
    let len = body.len() as u64;
    let Some(last) = range.last() else {
        return Ok(Bytes::new());
    };
    if range.start() >= len {
        return Err(ClientError::RangeNotSatisfiable {
            key: key.to_string(),
            range,
        });
    }

    let end = last.min(len - 1) + 1;
    Ok(body.slice(range.start() as usize..end as usize))
}

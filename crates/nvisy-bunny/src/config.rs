//! Bunny storage adapter configuration.

use std::fmt;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result};

/// Default timeout for storage requests: 5 minutes for large uploads.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Host of the default (Falkenstein) storage region.
const STORAGE_HOST: &str = "storage.bunnycdn.com";

/// Domain suffix of the pull zone attached to a storage zone.
const CDN_HOST_SUFFIX: &str = "b-cdn.net";

/// Configuration for the Bunny storage adapter.
///
/// Created once and never mutated afterwards; the adapter and its client
/// share it read-only.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct BunnyConfig {
    /// Storage zone password, sent as `AccessKey` on storage requests.
    #[cfg_attr(
        feature = "config",
        arg(long = "bunny-access-key", env = "BUNNY_ACCESS_KEY")
    )]
    #[serde(skip_serializing)]
    pub access_key: String,

    /// Account API key, used for cache purges.
    #[cfg_attr(feature = "config", arg(long = "bunny-api-key", env = "BUNNY_API_KEY"))]
    #[serde(skip_serializing)]
    pub api_key: String,

    /// Name of the storage zone holding every object.
    #[cfg_attr(
        feature = "config",
        arg(long = "bunny-storage-zone", env = "BUNNY_STORAGE_ZONE")
    )]
    pub storage_zone: String,

    /// Storage region prefix (e.g. "ny", "la", "sg"); the default region
    /// has none.
    #[cfg_attr(feature = "config", arg(long = "bunny-region", env = "BUNNY_REGION"))]
    #[serde(default)]
    pub region: Option<String>,

    /// Public CDN base URL replacing `https://{zone}.b-cdn.net`.
    #[cfg_attr(feature = "config", arg(long = "bunny-cdn-url", env = "BUNNY_CDN_URL"))]
    #[serde(default)]
    pub cdn_base_url: Option<String>,

    /// Request timeout in seconds.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "bunny-timeout-secs",
            env = "BUNNY_TIMEOUT_SECS",
            default_value_t = DEFAULT_TIMEOUT_SECS
        )
    )]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request.
    #[cfg_attr(feature = "config", arg(long = "bunny-user-agent", env = "BUNNY_USER_AGENT"))]
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Reject inputs the backend cannot honor instead of ignoring them.
    #[cfg_attr(
        feature = "config",
        arg(long = "bunny-strict-capabilities", env = "BUNNY_STRICT_CAPABILITIES")
    )]
    #[serde(default)]
    pub strict_capabilities: bool,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl BunnyConfig {
    /// Creates a configuration for the default region without a CDN override.
    pub fn new(
        access_key: impl Into<String>,
        api_key: impl Into<String>,
        storage_zone: impl Into<String>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            api_key: api_key.into(),
            storage_zone: storage_zone.into(),
            region: None,
            cdn_base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            strict_capabilities: false,
        }
    }

    /// Set the storage region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the public CDN base URL.
    #[must_use]
    pub fn with_cdn_base_url(mut self, url: impl Into<String>) -> Self {
        self.cdn_base_url = Some(url.into());
        self
    }

    /// Set the request timeout, rounded up to whole seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
        self
    }

    /// Set the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Enable or disable strict capability checking.
    #[must_use]
    pub fn with_strict_capabilities(mut self, strict: bool) -> Self {
        self.strict_capabilities = strict;
        self
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the effective user agent.
    pub fn effective_user_agent(&self) -> String {
        match self.user_agent.as_deref() {
            Some(ua) if !ua.is_empty() => ua.to_string(),
            _ => format!("nvisy/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Returns the configured region, treating a blank value as absent.
    pub fn region(&self) -> Option<&str> {
        self.region
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }

    /// Base URL for public retrieval, without a trailing slash.
    pub fn public_base_url(&self) -> String {
        match self.cdn_base_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
            _ => format!("https://{}.{CDN_HOST_SUFFIX}", self.storage_zone),
        }
    }

    /// Public retrieval URL of `key`.
    ///
    /// Each `/`-separated part of the key is percent-encoded as one path
    /// segment, so `#`, `?` and spaces stay part of the object name.
    pub fn public_url(&self, key: &str) -> String {
        join_segments(&self.public_base_url(), key.split('/'))
    }

    /// Base URL of the storage API for the configured region.
    pub fn storage_base_url(&self) -> String {
        match self.region() {
            Some(region) => format!("https://{region}.{STORAGE_HOST}"),
            None => format!("https://{STORAGE_HOST}"),
        }
    }

    /// Storage API URL of `key` within the zone.
    ///
    /// The key is encoded the same way as in [`public_url`](Self::public_url).
    pub fn storage_url(&self, key: &str) -> String {
        let segments = std::iter::once(self.storage_zone.as_str()).chain(key.split('/'));
        join_segments(&self.storage_base_url(), segments)
    }

    /// Returns a masked version of the access key for logging.
    pub fn access_key_masked(&self) -> String {
        mask(&self.access_key)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a credential or the zone is empty, the
    /// timeout is zero, or the CDN base URL is not an absolute http(s) URL.
    pub fn validate(&self) -> Result<()> {
        if self.access_key.is_empty() {
            return Err(Error::Config("Access key cannot be empty".to_string()));
        }

        if self.api_key.is_empty() {
            return Err(Error::Config("API key cannot be empty".to_string()));
        }

        if self.storage_zone.trim().is_empty() {
            return Err(Error::Config("Storage zone cannot be empty".to_string()));
        }

        if self.timeout_secs == 0 {
            return Err(Error::Config(
                "Request timeout must be greater than zero".to_string(),
            ));
        }

        if let Some(cdn) = self.cdn_base_url.as_deref().filter(|u| !u.trim().is_empty()) {
            let url = Url::parse(cdn.trim())
                .map_err(|e| Error::Config(format!("Invalid CDN base URL '{cdn}': {e}")))?;
            if !matches!(url.scheme(), "http" | "https") || url.host().is_none() {
                return Err(Error::Config(format!(
                    "CDN base URL '{cdn}' must be an absolute http(s) URL"
                )));
            }
        }

        Ok(())
    }
}

/// Appends percent-encoded path segments to `base`.
///
/// Falls back to plain concatenation when `base` is not a valid base URL,
/// which [`BunnyConfig::validate`] rejects up front.
fn join_segments<'a>(base: &str, segments: impl Iterator<Item = &'a str> + Clone) -> String {
    if let Ok(mut url) = Url::parse(base) {
        let joined = match url.path_segments_mut() {
            Ok(mut path) => {
                path.pop_if_empty().extend(segments.clone());
                true
            }
            Err(()) => false,
        };
        if joined {
            return url.into();
        }
    }

    let mut joined = base.to_string();
    for segment in segments {
        joined.push('/');
        joined.push_str(segment);
    }
    joined
}

fn mask(secret: &str) -> String {
    let visible = secret.chars().count();
    if visible <= 4 {
        "*".repeat(visible)
    } else {
        format!("{}***", secret.chars().take(4).collect::<String>())
    }
}

impl fmt::Debug for BunnyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BunnyConfig")
            .field("access_key", &self.access_key_masked())
            .field("api_key", &mask(&self.api_key))
            .field("storage_zone", &self.storage_zone)
            .field("region", &self.region)
            .field("cdn_base_url", &self.cdn_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("strict_capabilities", &self.strict_capabilities)
            .finish()
    }
}

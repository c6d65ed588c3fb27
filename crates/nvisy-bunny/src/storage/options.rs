//! Optional inputs of the storage operations.
//!
//! Most of these are accepted for parity with backends that honor them and
//! are ignored by Bunny storage; see [`Capability`](crate::Capability).

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

/// How a browser should present a retrieved object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    /// Display in place.
    Inline,
    /// Offer as a download.
    Attachment,
}

/// Options of [`upload`](super::BunnyStorage::upload) and
/// [`headers_for_direct_upload`](super::BunnyStorage::headers_for_direct_upload).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOptions {
    /// Expected checksum of the payload.
    pub checksum: Option<String>,
    /// Original filename.
    pub filename: Option<String>,
    /// Media type of the payload.
    pub content_type: Option<String>,
    /// Presentation hint.
    pub disposition: Option<Disposition>,
    /// Caller-defined metadata.
    pub custom_metadata: HashMap<String, String>,
}

impl UploadOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the expected checksum.
    #[must_use]
    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checksum = Some(checksum.into());
        self
    }

    /// Set the original filename.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Set the media type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the presentation hint.
    #[must_use]
    pub fn with_disposition(mut self, disposition: Disposition) -> Self {
        self.disposition = Some(disposition);
        self
    }

    /// Add one metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_metadata.insert(key.into(), value.into());
        self
    }
}

/// Options of [`url_for`](super::BunnyStorage::url_for).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlOptions {
    /// Requested lifetime of the URL.
    pub expires_in: Option<Duration>,
    /// Presentation hint.
    pub disposition: Option<Disposition>,
    /// Filename to present.
    pub filename: Option<String>,
}

impl UrlOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the requested lifetime.
    #[must_use]
    pub fn with_expires_in(mut self, expires_in: Duration) -> Self {
        self.expires_in = Some(expires_in);
        self
    }

    /// Set the presentation hint.
    #[must_use]
    pub fn with_disposition(mut self, disposition: Disposition) -> Self {
        self.disposition = Some(disposition);
        self
    }

    /// Set the filename to present.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Options of [`url_for_direct_upload`](super::BunnyStorage::url_for_direct_upload).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectUploadOptions {
    /// Requested lifetime of the URL.
    pub expires_in: Option<Duration>,
    /// Media type the client will send.
    pub content_type: Option<String>,
    /// Payload length the client will send.
    pub content_length: Option<u64>,
    /// Expected checksum of the payload.
    pub checksum: Option<String>,
    /// Caller-defined metadata.
    pub custom_metadata: HashMap<String, String>,
}

impl DirectUploadOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the requested lifetime.
    #[must_use]
    pub fn with_expires_in(mut self, expires_in: Duration) -> Self {
        self.expires_in = Some(expires_in);
        self
    }

    /// Set the media type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the payload length.
    #[must_use]
    pub fn with_content_length(mut self, content_length: u64) -> Self {
        self.content_length = Some(content_length);
        self
    }

    /// Set the expected checksum.
    #[must_use]
    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checksum = Some(checksum.into());
        self
    }

    /// Add one metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_metadata.insert(key.into(), value.into());
        self
    }
}

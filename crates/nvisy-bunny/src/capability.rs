//! Backend capability flags.
//!
//! Bunny storage lacks several features the generic storage contract can
//! express. Each gap is named here so callers and tests can tell "not
//! supported" apart from "supported but misbehaving".

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

/// A storage feature that may or may not be available on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumIter, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Custom metadata is transmitted and stored alongside the object.
    #[strum(to_string = "custom metadata")]
    CustomMetadata,
    /// Checksums supplied with an upload are verified.
    #[strum(to_string = "checksum verification")]
    ChecksumVerification,
    /// Generated URLs are signed and expire.
    #[strum(to_string = "signed urls")]
    SignedUrls,
    /// Filename and content-disposition are encoded into retrieval URLs.
    #[strum(to_string = "content disposition")]
    ContentDisposition,
    /// Deleting a prefix removes every object below it.
    #[strum(to_string = "recursive prefix delete")]
    RecursivePrefixDelete,
    /// Direct uploads honor the caller's content type.
    #[strum(to_string = "direct upload content type")]
    DirectUploadContentType,
}

/// The set of capabilities a backend provides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// See [`Capability::CustomMetadata`].
    pub custom_metadata: bool,
    /// See [`Capability::ChecksumVerification`].
    pub checksum_verification: bool,
    /// See [`Capability::SignedUrls`].
    pub signed_urls: bool,
    /// See [`Capability::ContentDisposition`].
    pub content_disposition: bool,
    /// See [`Capability::RecursivePrefixDelete`].
    pub recursive_prefix_delete: bool,
    /// See [`Capability::DirectUploadContentType`].
    pub direct_upload_content_type: bool,
}

impl Capabilities {
    /// Capabilities of the Bunny storage backend: none of the optional ones.
    pub const fn bunny() -> Self {
        Self {
            custom_metadata: false,
            checksum_verification: false,
            signed_urls: false,
            content_disposition: false,
            recursive_prefix_delete: false,
            direct_upload_content_type: false,
        }
    }

    /// Returns whether `capability` is available.
    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::CustomMetadata => self.custom_metadata,
            Capability::ChecksumVerification => self.checksum_verification,
            Capability::SignedUrls => self.signed_urls,
            Capability::ContentDisposition => self.content_disposition,
            Capability::RecursivePrefixDelete => self.recursive_prefix_delete,
            Capability::DirectUploadContentType => self.direct_upload_content_type,
        }
    }

    /// Lists every capability that is not available.
    pub fn missing(&self) -> Vec<Capability> {
        Capability::iter().filter(|c| !self.supports(*c)).collect()
    }
}

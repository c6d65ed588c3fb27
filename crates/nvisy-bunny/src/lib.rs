#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

// Tracing target constants for consistent logging
pub const TRACING_TARGET_STORAGE: &str = "nvisy_bunny::storage";
pub const TRACING_TARGET_CLIENT: &str = "nvisy_bunny::client";

mod capability;
mod chunk;
/// Remote object client seam and its HTTP and in-memory implementations.
pub mod client;
mod config;
mod error;
mod range;
mod storage;

pub use crate::capability::{Capabilities, Capability};
pub use crate::chunk::{DOWNLOAD_CHUNK_SIZE, rechunk};
pub use crate::client::{BunnyClient, ObjectClient, ObjectKey, UploadBody};
pub use crate::config::BunnyConfig;
pub use crate::error::{ClientError, ClientResult, Error, Result};
pub use crate::range::ByteRange;
pub use crate::storage::{
    BunnyStorage, DirectUploadOptions, Disposition, UploadOptions, UrlOptions,
};

#[doc(hidden)]
pub mod prelude;

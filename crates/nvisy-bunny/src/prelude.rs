//! Convenience re-exports.

pub use crate::client::{ObjectClient, ObjectKey, UploadBody};
pub use crate::{
    BunnyConfig, BunnyStorage, ByteRange, Capability, DirectUploadOptions, Disposition, Error,
    Result, UploadOptions, UrlOptions,
};

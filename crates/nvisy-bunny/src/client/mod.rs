//! Remote object client seam.
//!
//! [`ObjectClient`] is the leaf dependency of the adapter: given a key it
//! fetches, streams, uploads, purges, deletes, or probes a single object.
//! [`BunnyClient`] talks to the Bunny storage and purge APIs over HTTP;
//! [`MemoryClient`] keeps objects in process for tests.

use bytes::Bytes;
use futures::stream::BoxStream;

use crate::error::ClientResult;
use crate::range::ByteRange;

mod body;
mod handle;
mod http;
mod key;
#[cfg(any(test, feature = "test-utils"))]
mod memory;

pub use body::{UploadBody, UploadStream};
pub use handle::ObjectHandle;
pub use http::{ACCESS_KEY_HEADER, BunnyClient, OCTET_STREAM};
pub use key::ObjectKey;
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use memory::MemoryClient;

/// Incremental object body as delivered by the backend.
pub type BodyStream = BoxStream<'static, ClientResult<Bytes>>;

/// Per-key operations offered by a remote object store.
///
/// Errors are reported as [`ClientError`](crate::ClientError) and are not
/// retried by the caller.
#[async_trait::async_trait]
pub trait ObjectClient: Send + Sync + 'static {
    /// Fetches the object body, or only `range` of it.
    async fn get_body(&self, key: &ObjectKey, range: Option<ByteRange>) -> ClientResult<Bytes>;

    /// Opens the object body as a stream of network-sized pieces.
    async fn get_stream(&self, key: &ObjectKey) -> ClientResult<BodyStream>;

    /// Stores `body` under the key, replacing any existing object.
    async fn upload_body(&self, key: &ObjectKey, body: UploadBody) -> ClientResult<()>;

    /// Invalidates any CDN-cached copy of the object.
    async fn purge_cache(&self, key: &ObjectKey) -> ClientResult<()>;

    /// Removes the object.
    async fn delete_object(&self, key: &ObjectKey) -> ClientResult<()>;

    /// Returns whether an object is stored under the key.
    async fn exists(&self, key: &ObjectKey) -> ClientResult<bool>;
}

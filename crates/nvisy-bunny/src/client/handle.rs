//! Transient binding of a key to a client.

use bytes::Bytes;

use super::{BodyStream, ObjectClient, ObjectKey, UploadBody};
use crate::error::ClientResult;
use crate::range::ByteRange;

/// A key bound to the client that serves it.
///
/// Handles are built fresh for every operation and hold nothing beyond the
/// borrowed client and the key.
#[derive(Clone)]
pub struct ObjectHandle<'a> {
    client: &'a dyn ObjectClient,
    key: ObjectKey,
}

impl<'a> ObjectHandle<'a> {
    /// Binds `key` to `client`.
    pub fn new(client: &'a dyn ObjectClient, key: ObjectKey) -> Self {
        Self { client, key }
    }

    /// Returns the bound key.
    pub fn key(&self) -> &ObjectKey {
        &self.key
    }

    /// Fetches the body, optionally restricted to `range`.
    pub async fn get_body(&self, range: Option<ByteRange>) -> ClientResult<Bytes> {
        self.client.get_body(&self.key, range).await
    }

    /// Opens the body as a stream.
    pub async fn get_stream(&self) -> ClientResult<BodyStream> {
        self.client.get_stream(&self.key).await
    }

    /// Uploads `body`.
    pub async fn upload(&self, body: UploadBody) -> ClientResult<()> {
        self.client.upload_body(&self.key, body).await
    }

    /// Purges the cached copy.
    pub async fn purge(&self) -> ClientResult<()> {
        self.client.purge_cache(&self.key).await
    }

    /// Deletes the object.
    pub async fn delete(&self) -> ClientResult<()> {
        self.client.delete_object(&self.key).await
    }

    /// Probes for the object.
    pub async fn exists(&self) -> ClientResult<bool> {
        self.client.exists(&self.key).await
    }
}

impl std::fmt::Debug for ObjectHandle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectHandle")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

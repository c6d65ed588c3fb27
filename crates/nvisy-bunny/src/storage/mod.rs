//! Generic storage-service operations on top of an [`ObjectClient`].
//!
//! [`BunnyStorage`] is a stateless call-through: each operation binds the
//! key to the client, awaits the remote call(s), and translates the result.
//! Nothing is retried and nothing runs in the background.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use tokio::sync::mpsc;

use crate::capability::{Capabilities, Capability};
use crate::chunk::{DOWNLOAD_CHUNK_SIZE, rechunk};
use crate::client::{
    ACCESS_KEY_HEADER, BunnyClient, OCTET_STREAM, ObjectClient, ObjectHandle, ObjectKey, UploadBody,
};
use crate::config::BunnyConfig;
use crate::range::ByteRange;
use crate::{Error, Result, TRACING_TARGET_STORAGE};

mod options;

pub use options::{DirectUploadOptions, Disposition, UploadOptions, UrlOptions};

/// Inner state shared between clones.
struct BunnyStorageInner {
    config: BunnyConfig,
    client: Box<dyn ObjectClient>,
    capabilities: Capabilities,
}

/// Storage adapter for a single Bunny storage zone.
///
/// Holds only read-only configuration, so clones may be used from any
/// number of tasks at once.
///
/// # Examples
///
/// ```rust,ignore
/// use nvisy_bunny::{BunnyConfig, BunnyStorage, UploadOptions};
///
/// let config = BunnyConfig::new("zone-password", "api-key", "assets").with_region("ny");
/// let storage = BunnyStorage::new(config)?;
///
/// storage.upload("avatars/1.png", bytes, &UploadOptions::new()).await?;
/// let url = storage.url_for("avatars/1.png", &Default::default())?;
/// ```
#[derive(Clone)]
pub struct BunnyStorage {
    inner: Arc<BunnyStorageInner>,
}

impl std::fmt::Debug for BunnyStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BunnyStorage")
            .field("config", &self.inner.config)
            .field("capabilities", &self.inner.capabilities)
            .finish_non_exhaustive()
    }
}

impl BunnyStorage {
    /// Creates an adapter talking to Bunny storage over HTTP.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn new(config: BunnyConfig) -> Result<Self> {
        let client = BunnyClient::new(config.clone())?;
        Ok(Self::with_client(config, client))
    }

    /// Creates an adapter on top of any [`ObjectClient`].
    pub fn with_client(config: BunnyConfig, client: impl ObjectClient) -> Self {
        tracing::debug!(
            target: TRACING_TARGET_STORAGE,
            storage_zone = %config.storage_zone,
            strict_capabilities = config.strict_capabilities,
            "Creating bunny storage adapter"
        );

        let inner = BunnyStorageInner {
            config,
            client: Box::new(client),
            capabilities: Capabilities::bunny(),
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    /// Gets the adapter configuration.
    pub fn config(&self) -> &BunnyConfig {
        &self.inner.config
    }

    /// Returns the capabilities of the backend.
    pub fn capabilities(&self) -> Capabilities {
        self.inner.capabilities
    }

    /// Binds `key` to the client for a single operation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKey`] if `key` is empty.
    pub fn object(&self, key: &str) -> Result<ObjectHandle<'_>> {
        let key = ObjectKey::new(key)?;
        Ok(ObjectHandle::new(self.inner.client.as_ref(), key))
    }

    /// Uploads `body` under `key` and purges the CDN-cached copy.
    ///
    /// `checksum` is accepted but not verified.
    ///
    /// # Errors
    ///
    /// Any failure of the upload or of the purge is reported as
    /// [`Error::Integrity`].
    #[tracing::instrument(
        target = TRACING_TARGET_STORAGE,
        name = "bunny.upload",
        skip(self, key, body, options),
        fields(key = %key)
    )]
    pub async fn upload(
        &self,
        key: &str,
        body: impl Into<UploadBody> + Send,
        options: &UploadOptions,
    ) -> Result<()> {
        self.check_upload_options(options)?;
        let object = self.object(key)?;
        let body = body.into();

        tracing::debug!(
            target: TRACING_TARGET_STORAGE,
            size = ?body.len_hint(),
            "Uploading object"
        );

        if let Err(err) = object.upload(body).await {
            tracing::warn!(
                target: TRACING_TARGET_STORAGE,
                error = %err,
                "Object upload failed"
            );
            return Err(Error::integrity(key, err));
        }

        if let Err(err) = object.purge().await {
            tracing::warn!(
                target: TRACING_TARGET_STORAGE,
                error = %err,
                "Cache purge after upload failed"
            );
            return Err(Error::integrity(key, err));
        }

        tracing::debug!(target: TRACING_TARGET_STORAGE, "Object uploaded");
        Ok(())
    }

    /// Downloads the whole object.
    ///
    /// # Errors
    ///
    /// Client failures, including a missing object, are returned unchanged
    /// as [`Error::Client`].
    #[tracing::instrument(
        target = TRACING_TARGET_STORAGE,
        name = "bunny.download",
        skip(self, key),
        fields(key = %key)
    )]
    pub async fn download(&self, key: &str) -> Result<Bytes> {
        let data = self.object(key)?.get_body(None).await?;

        tracing::debug!(
            target: TRACING_TARGET_STORAGE,
            size = data.len(),
            "Object downloaded"
        );

        Ok(data)
    }

    /// Streams the object in [`DOWNLOAD_CHUNK_SIZE`] chunks.
    ///
    /// The body is read from the network incrementally, so at most one
    /// chunk is held in memory by the adapter. Every chunk but the last is
    /// exactly [`DOWNLOAD_CHUNK_SIZE`] bytes long.
    #[tracing::instrument(
        target = TRACING_TARGET_STORAGE,
        name = "bunny.download_stream",
        skip(self, key),
        fields(key = %key)
    )]
    pub async fn download_stream(&self, key: &str) -> Result<BoxStream<'static, Result<Bytes>>> {
        let body = self.object(key)?.get_stream().await?;
        Ok(rechunk(body, DOWNLOAD_CHUNK_SIZE)
            .map_err(Error::from)
            .boxed())
    }

    /// Streams the object into `output`, chunk by chunk, in offset order.
    ///
    /// Stops early without error if the receiving side is dropped. Returns
    /// the number of bytes delivered.
    #[tracing::instrument(
        target = TRACING_TARGET_STORAGE,
        name = "bunny.download_into",
        skip(self, key, output),
        fields(key = %key, bytes = tracing::field::Empty)
    )]
    pub async fn download_into(&self, key: &str, output: mpsc::Sender<Bytes>) -> Result<u64> {
        let mut chunks = self.download_stream(key).await?;
        let mut total = 0u64;

        while let Some(chunk) = chunks.next().await {
            let chunk = chunk?;
            let len = chunk.len() as u64;
            if output.send(chunk).await.is_err() {
                tracing::debug!(
                    target: TRACING_TARGET_STORAGE,
                    delivered = total,
                    "Receiver dropped, stopping download"
                );
                break;
            }
            total += len;
        }

        tracing::Span::current().record("bytes", total);
        Ok(total)
    }

    /// Downloads exactly the bytes covered by `range`.
    ///
    /// An empty half-open range is answered locally.
    ///
    /// # Errors
    ///
    /// A range the backend rejects surfaces unchanged as
    /// [`ClientError::RangeNotSatisfiable`](crate::ClientError::RangeNotSatisfiable).
    #[tracing::instrument(
        target = TRACING_TARGET_STORAGE,
        name = "bunny.download_chunk",
        skip(self, key),
        fields(key = %key)
    )]
    pub async fn download_chunk(&self, key: &str, range: ByteRange) -> Result<Bytes> {
        let object = self.object(key)?;
        if range.is_empty() {
            return Ok(Bytes::new());
        }

        let data = object.get_body(Some(range)).await?;

        tracing::debug!(
            target: TRACING_TARGET_STORAGE,
            size = data.len(),
            "Object range downloaded"
        );

        Ok(data)
    }

    /// Deletes the object.
    #[tracing::instrument(
        target = TRACING_TARGET_STORAGE,
        name = "bunny.delete",
        skip(self, key),
        fields(key = %key)
    )]
    pub async fn delete(&self, key: &str) -> Result<()> {
        self.object(key)?.delete().await?;
        tracing::debug!(target: TRACING_TARGET_STORAGE, "Object deleted");
        Ok(())
    }

    /// Deletes the single object whose key equals `prefix`.
    ///
    /// This is not recursive: objects such as `{prefix}/child` or
    /// `{prefix}suffix` are left untouched, since the backend offers no
    /// prefix delete.
    ///
    /// # Errors
    ///
    /// With strict capabilities enabled, returns
    /// [`Error::Unsupported`] without deleting anything.
    #[tracing::instrument(
        target = TRACING_TARGET_STORAGE,
        name = "bunny.delete_prefixed",
        skip(self, prefix),
        fields(prefix = %prefix)
    )]
    pub async fn delete_prefixed(&self, prefix: &str) -> Result<()> {
        self.check(Capability::RecursivePrefixDelete, true)?;

        tracing::debug!(
            target: TRACING_TARGET_STORAGE,
            "Deleting only the object keyed by the prefix itself"
        );

        self.object(prefix)?.delete().await?;
        Ok(())
    }

    /// Returns whether an object is stored under `key`.
    #[tracing::instrument(
        target = TRACING_TARGET_STORAGE,
        name = "bunny.exists",
        skip(self, key),
        fields(key = %key)
    )]
    pub async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.object(key)?.exists().await?)
    }

    /// Returns the public retrieval URL of `key`.
    ///
    /// URLs are neither signed nor time-limited, and the filename and
    /// disposition are not encoded. Each `/`-separated part of the key is
    /// percent-encoded.
    pub fn url_for(&self, key: &str, options: &UrlOptions) -> Result<String> {
        let key = ObjectKey::new(key)?;
        self.check(Capability::SignedUrls, options.expires_in.is_some())?;
        self.check(
            Capability::ContentDisposition,
            options.disposition.is_some() || options.filename.is_some(),
        )?;

        Ok(self.inner.config.public_url(key.as_str()))
    }

    /// Returns the storage endpoint a client uploads `key` to directly.
    ///
    /// Use together with [`headers_for_direct_upload`](Self::headers_for_direct_upload).
    pub fn url_for_direct_upload(&self, key: &str, options: &DirectUploadOptions) -> Result<String> {
        let key = ObjectKey::new(key)?;
        self.check(Capability::SignedUrls, options.expires_in.is_some())?;
        self.check(
            Capability::DirectUploadContentType,
            is_custom_content_type(options.content_type.as_deref()),
        )?;
        self.check(Capability::ChecksumVerification, options.checksum.is_some())?;
        self.check(
            Capability::CustomMetadata,
            !options.custom_metadata.is_empty(),
        )?;

        Ok(self.inner.config.storage_url(key.as_str()))
    }

    /// Returns the headers a client sends with a direct upload of `key`.
    ///
    /// Always exactly the access key and an `application/octet-stream`
    /// content type; the caller's content type is not forwarded.
    pub fn headers_for_direct_upload(
        &self,
        key: &str,
        options: &UploadOptions,
    ) -> Result<HashMap<String, String>> {
        ObjectKey::new(key)?;
        self.check(
            Capability::DirectUploadContentType,
            is_custom_content_type(options.content_type.as_deref()),
        )?;
        self.check_upload_options(options)?;

        Ok(HashMap::from([
            (
                ACCESS_KEY_HEADER.to_string(),
                self.inner.config.access_key.clone(),
            ),
            ("Content-Type".to_string(), OCTET_STREAM.to_string()),
        ]))
    }

    fn check_upload_options(&self, options: &UploadOptions) -> Result<()> {
        self.check(Capability::ChecksumVerification, options.checksum.is_some())?;
        self.check(
            Capability::CustomMetadata,
            !options.custom_metadata.is_empty(),
        )?;
        self.check(
            Capability::ContentDisposition,
            options.disposition.is_some() || options.filename.is_some(),
        )
    }

    /// Accepts a request for `capability` if the backend has it, ignores it
    /// in lenient mode, and rejects it in strict mode.
    fn check(&self, capability: Capability, requested: bool) -> Result<()> {
        if !requested || self.inner.capabilities.supports(capability) {
            return Ok(());
        }

        if self.inner.config.strict_capabilities {
            return Err(Error::Unsupported(capability));
        }

        tracing::debug!(
            target: TRACING_TARGET_STORAGE,
            %capability,
            "Ignoring option the backend does not support"
        );
        Ok(())
    }
}

fn is_custom_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| !ct.eq_ignore_ascii_case(OCTET_STREAM))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::ClientError;
    use crate::client::MemoryClient;

    const MIB: usize = 1024 * 1024;

    fn config() -> BunnyConfig {
        BunnyConfig::new("zone-password", "account-api-key", "z1")
    }

    fn storage() -> (BunnyStorage, MemoryClient) {
        let client = MemoryClient::new();
        (BunnyStorage::with_client(config(), client.clone()), client)
    }

    fn strict_storage() -> (BunnyStorage, MemoryClient) {
        let client = MemoryClient::new();
        let config = config().with_strict_capabilities(true);
        (BunnyStorage::with_client(config, client.clone()), client)
    }

    fn payload(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn new_validates_config() {
        assert!(BunnyStorage::new(config()).is_ok());
        let err = BunnyStorage::new(BunnyConfig::new("key", "api", "")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn upload_then_download_round_trips() {
        let (storage, _) = storage();
        let data = payload(4096);

        storage
            .upload("docs/a.bin", data.clone(), &UploadOptions::new())
            .await
            .unwrap();

        let downloaded = storage.download("docs/a.bin").await.unwrap();
        assert_eq!(downloaded, data);
    }

    #[tokio::test]
    async fn upload_streams_reader_body() {
        let (storage, client) = storage();
        let body = UploadBody::from_reader(&b"streamed payload"[..]);

        storage
            .upload("s.txt", body, &UploadOptions::new())
            .await
            .unwrap();
        assert_eq!(client.get("s.txt").unwrap(), "streamed payload");
    }

    #[tokio::test]
    async fn upload_purges_cached_copy() {
        let (storage, client) = storage();
        storage
            .upload("img/1.png", b"png".to_vec(), &UploadOptions::new())
            .await
            .unwrap();
        assert_eq!(client.purged(), vec!["img/1.png".to_string()]);
    }

    #[tokio::test]
    async fn upload_failure_is_integrity_error() {
        let (storage, client) = storage();
        client.fail_uploads(true);

        let err = storage
            .upload("a.bin", b"data".to_vec(), &UploadOptions::new())
            .await
            .unwrap_err();

        assert!(err.is_integrity());
        assert!(matches!(
            err,
            Error::Integrity {
                source: ClientError::Io(_),
                ..
            }
        ));
        assert!(client.purged().is_empty());
    }

    #[tokio::test]
    async fn purge_failure_is_integrity_error() {
        let (storage, client) = storage();
        client.fail_purges(true);

        let err = storage
            .upload("a.bin", b"data".to_vec(), &UploadOptions::new())
            .await
            .unwrap_err();
        assert!(err.is_integrity());
    }

    #[tokio::test]
    async fn upload_ignores_unsupported_options_by_default() {
        let (storage, client) = storage();
        let options = UploadOptions::new()
            .with_checksum("deadbeef")
            .with_filename("a.bin")
            .with_disposition(Disposition::Attachment)
            .with_metadata("owner", "42");

        storage
            .upload("a.bin", b"data".to_vec(), &options)
            .await
            .unwrap();
        assert_eq!(client.get("a.bin").unwrap(), "data");
    }

    #[tokio::test]
    async fn strict_upload_rejects_metadata_before_remote_call() {
        let (storage, client) = strict_storage();
        let options = UploadOptions::new().with_metadata("owner", "42");

        let err = storage
            .upload("a.bin", b"data".to_vec(), &options)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Unsupported(Capability::CustomMetadata)));
        assert!(client.get("a.bin").is_none());
    }

    #[tokio::test]
    async fn download_missing_passes_client_error_through() {
        let (storage, _) = storage();
        let err = storage.download("missing").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(!err.is_integrity());
    }

    #[tokio::test]
    async fn empty_key_is_rejected() {
        let (storage, _) = storage();
        assert!(matches!(
            storage.download("").await,
            Err(Error::InvalidKey(_))
        ));
        assert!(matches!(
            storage.url_for("", &UrlOptions::new()),
            Err(Error::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn download_chunk_returns_exact_slice() {
        let (storage, client) = storage();
        let data = payload(1000);
        client.insert("r.bin", data.clone());

        for (start, end) in [(0u64, 1u64), (0, 1000), (10, 20), (999, 1000), (250, 751)] {
            let range = ByteRange::try_from(start..end).unwrap();
            let chunk = storage.download_chunk("r.bin", range).await.unwrap();
            assert_eq!(chunk, data[start as usize..end as usize]);
        }

        let range = ByteRange::try_from(10u64..=20).unwrap();
        let chunk = storage.download_chunk("r.bin", range).await.unwrap();
        assert_eq!(chunk, data[10..=20]);
    }

    #[tokio::test]
    async fn download_chunk_empty_range_skips_backend() {
        let (storage, _) = storage();
        let range = ByteRange::new(5, 5).unwrap();
        let chunk = storage.download_chunk("never-uploaded", range).await.unwrap();
        assert!(chunk.is_empty());
    }

    #[tokio::test]
    async fn download_chunk_open_ended_range_reads_to_end() {
        let (storage, client) = storage();
        client.insert("r.bin", Bytes::from_static(b"0123456789"));

        let range = ByteRange::inclusive(0, u64::MAX).unwrap();
        let chunk = storage.download_chunk("r.bin", range).await.unwrap();
        assert_eq!(chunk, "0123456789");

        let range = ByteRange::inclusive(6, u64::MAX).unwrap();
        let chunk = storage.download_chunk("r.bin", range).await.unwrap();
        assert_eq!(chunk, "6789");
    }

    #[tokio::test]
    async fn download_chunk_unsatisfiable_range_passes_through() {
        let (storage, client) = storage();
        client.insert("r.bin", payload(10));

        let range = ByteRange::new(20, 30).unwrap();
        let err = storage.download_chunk("r.bin", range).await.unwrap_err();
        assert!(err.is_range_not_satisfiable());
    }

    #[tokio::test]
    async fn download_stream_delivers_fixed_size_chunks() {
        let (storage, client) = storage();
        let data = payload(11 * MIB + 123);
        client.insert("big.bin", data.clone());

        let chunks: Vec<Bytes> = storage
            .download_stream("big.bin")
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        let sizes: Vec<usize> = chunks.iter().map(Bytes::len).collect();
        assert_eq!(sizes, vec![5 * MIB, 5 * MIB, MIB + 123]);
        assert_eq!(chunks.concat(), data);
    }

    #[tokio::test]
    async fn download_stream_exact_multiple_has_no_short_tail() {
        let (storage, client) = storage();
        client.insert("even.bin", payload(2 * DOWNLOAD_CHUNK_SIZE));

        let chunks: Vec<Bytes> = storage
            .download_stream("even.bin")
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.len() == DOWNLOAD_CHUNK_SIZE));
    }

    #[tokio::test]
    async fn download_stream_missing_object() {
        let (storage, _) = storage();
        let err = storage.download_stream("missing").await.err().unwrap();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn download_into_sends_chunks_in_order() {
        let (storage, client) = storage();
        let data = payload(6 * MIB);
        client.insert("into.bin", data.clone());

        let (tx, mut rx) = mpsc::channel(4);
        let total = storage.download_into("into.bin", tx).await.unwrap();
        assert_eq!(total, data.len() as u64);

        let mut received = Vec::new();
        while let Some(chunk) = rx.recv().await {
            received.push(chunk);
        }
        assert_eq!(received.len(), 2);
        assert_eq!(received[0].len(), DOWNLOAD_CHUNK_SIZE);
        assert_eq!(received.concat(), data);
    }

    #[tokio::test]
    async fn download_into_stops_when_receiver_dropped() {
        let (storage, client) = storage();
        client.insert("into.bin", payload(3 * MIB));

        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let total = storage.download_into("into.bin", tx).await.unwrap();
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn exists_tracks_lifecycle() {
        let (storage, _) = storage();
        assert!(!storage.exists("life.txt").await.unwrap());

        storage
            .upload("life.txt", b"x".to_vec(), &UploadOptions::new())
            .await
            .unwrap();
        assert!(storage.exists("life.txt").await.unwrap());

        storage.delete("life.txt").await.unwrap();
        assert!(!storage.exists("life.txt").await.unwrap());
    }

    #[tokio::test]
    async fn delete_prefixed_is_not_recursive() {
        let (storage, client) = storage();
        for key in ["foo", "foo/bar", "foobar"] {
            client.insert(key, Bytes::from_static(b"x"));
        }

        storage.delete_prefixed("foo").await.unwrap();

        assert_eq!(client.keys(), vec!["foo/bar".to_string(), "foobar".to_string()]);
        assert!(client.was_deleted("foo"));
        assert!(!client.was_deleted("foo/bar"));
    }

    #[tokio::test]
    async fn strict_delete_prefixed_is_unsupported() {
        let (storage, client) = strict_storage();
        client.insert("foo", Bytes::from_static(b"x"));

        let err = storage.delete_prefixed("foo").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Unsupported(Capability::RecursivePrefixDelete)
        ));
        assert!(client.get("foo").is_some());
    }

    #[test]
    fn url_for_uses_zone_cdn() {
        let (storage, _) = storage();
        let options = UrlOptions::new()
            .with_expires_in(Duration::from_secs(300))
            .with_disposition(Disposition::Inline)
            .with_filename("a.png");

        assert_eq!(
            storage.url_for("img/a.png", &options).unwrap(),
            "https://z1.b-cdn.net/img/a.png"
        );
    }

    #[test]
    fn url_for_uses_cdn_override() {
        let config = config().with_cdn_base_url("https://cdn.example.com");
        let storage = BunnyStorage::with_client(config, MemoryClient::new());

        assert_eq!(
            storage.url_for("img/a.png", &UrlOptions::new()).unwrap(),
            "https://cdn.example.com/img/a.png"
        );
    }

    #[test]
    fn strict_url_for_rejects_expiry_and_disposition() {
        let (storage, _) = strict_storage();

        let options = UrlOptions::new().with_expires_in(Duration::from_secs(60));
        let err = storage.url_for("a", &options).unwrap_err();
        assert!(matches!(err, Error::Unsupported(Capability::SignedUrls)));

        let options = UrlOptions::new().with_filename("a.txt");
        let err = storage.url_for("a", &options).unwrap_err();
        assert!(matches!(
            err,
            Error::Unsupported(Capability::ContentDisposition)
        ));

        assert!(storage.url_for("a", &UrlOptions::new()).is_ok());
    }

    #[test]
    fn direct_upload_url_with_region() {
        let config = config().with_region("ny");
        let storage = BunnyStorage::with_client(config, MemoryClient::new());
        let options = DirectUploadOptions::new()
            .with_content_type("image/png")
            .with_content_length(42)
            .with_checksum("abc");

        assert_eq!(
            storage.url_for_direct_upload("up/a.png", &options).unwrap(),
            "https://ny.storage.bunnycdn.com/z1/up/a.png"
        );
    }

    #[test]
    fn direct_upload_url_without_region() {
        let (storage, _) = storage();
        assert_eq!(
            storage
                .url_for_direct_upload("up/a.png", &DirectUploadOptions::new())
                .unwrap(),
            "https://storage.bunnycdn.com/z1/up/a.png"
        );
    }

    #[test]
    fn direct_upload_headers_are_fixed() {
        let (storage, _) = storage();
        let options = UploadOptions::new().with_content_type("image/png");

        let headers = storage.headers_for_direct_upload("a.png", &options).unwrap();

        assert_eq!(headers.len(), 2);
        assert_eq!(headers["AccessKey"], "zone-password");
        assert_eq!(headers["Content-Type"], "application/octet-stream");
    }

    #[test]
    fn strict_direct_upload_rejects_custom_content_type() {
        let (storage, _) = strict_storage();

        let options = UploadOptions::new().with_content_type("image/png");
        let err = storage.headers_for_direct_upload("a", &options).unwrap_err();
        assert!(matches!(
            err,
            Error::Unsupported(Capability::DirectUploadContentType)
        ));

        let options = UploadOptions::new().with_content_type("application/octet-stream");
        assert!(storage.headers_for_direct_upload("a", &options).is_ok());

        let options = DirectUploadOptions::new().with_metadata("k", "v");
        let err = storage.url_for_direct_upload("a", &options).unwrap_err();
        assert!(matches!(err, Error::Unsupported(Capability::CustomMetadata)));
    }

    #[test]
    fn capabilities_report_every_gap() {
        let (storage, _) = storage();
        assert_eq!(storage.capabilities(), Capabilities::bunny());
        assert!(!storage.capabilities().supports(Capability::ChecksumVerification));
    }

    #[tokio::test]
    async fn clones_share_the_client() {
        let (storage, _) = storage();
        let other = storage.clone();

        let upload = tokio::spawn(async move {
            other
                .upload("shared.txt", b"shared".to_vec(), &UploadOptions::new())
                .await
        });
        upload.await.unwrap().unwrap();

        assert_eq!(storage.download("shared.txt").await.unwrap(), "shared");
    }
}

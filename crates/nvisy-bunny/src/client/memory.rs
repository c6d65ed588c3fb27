//! In-memory object client for testing.
//!
//! # Feature Flag
//!
//! Outside of this crate's own tests the client is only available when the
//! `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! nvisy-bunny = { version = "...", features = ["test-utils"] }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;
use futures::StreamExt;
use futures::stream;

use super::{BodyStream, ObjectClient, ObjectKey, UploadBody};
use crate::error::{ClientError, ClientResult};
use crate::range::ByteRange;

/// Default size of the pieces a stored body is streamed in.
const DEFAULT_PIECE_SIZE: usize = 64 * 1024;

#[derive(Debug, Default)]
struct MemoryState {
    objects: BTreeMap<String, Bytes>,
    purged: Vec<String>,
    deleted: BTreeSet<String>,
}

/// Cloneable in-process [`ObjectClient`].
///
/// Ranges follow HTTP semantics: a start offset at or past the end of the
/// object is not satisfiable, an end past the object is clamped. Uploads and
/// purges can be made to fail with a simulated transport error.
#[derive(Debug, Clone)]
pub struct MemoryClient {
    state: Arc<Mutex<MemoryState>>,
    piece_size: usize,
    fail_uploads: Arc<AtomicBool>,
    fail_purges: Arc<AtomicBool>,
}

impl Default for MemoryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryClient {
    /// Creates an empty client.
    pub fn new() -> Self {
        Self {
            state: Arc::default(),
            piece_size: DEFAULT_PIECE_SIZE,
            fail_uploads: Arc::default(),
            fail_purges: Arc::default(),
        }
    }

    /// Sets the size of the pieces [`get_stream`](ObjectClient::get_stream)
    /// yields.
    #[must_use]
    pub fn with_piece_size(mut self, piece_size: usize) -> Self {
        self.piece_size = piece_size.max(1);
        self
    }

    /// Makes every subsequent upload fail (or succeed again).
    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent purge fail (or succeed again).
    pub fn fail_purges(&self, fail: bool) {
        self.fail_purges.store(fail, Ordering::SeqCst);
    }

    /// Stores an object directly, bypassing upload failure injection.
    pub fn insert(&self, key: impl Into<String>, data: impl Into<Bytes>) {
        self.lock().objects.insert(key.into(), data.into());
    }

    /// Returns the stored bytes of `key`.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.lock().objects.get(key).cloned()
    }

    /// Returns every stored key in order.
    pub fn keys(&self) -> Vec<String> {
        self.lock().objects.keys().cloned().collect()
    }

    /// Returns the keys purged so far, in call order.
    pub fn purged(&self) -> Vec<String> {
        self.lock().purged.clone()
    }

    /// Returns whether `key` was ever passed to a delete.
    pub fn was_deleted(&self, key: &str) -> bool {
        self.lock().deleted.contains(key)
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn object(&self, key: &ObjectKey) -> ClientResult<Bytes> {
        self.lock()
            .objects
            .get(key.as_str())
            .cloned()
            .ok_or_else(|| ClientError::NotFound {
                key: key.to_string(),
            })
    }
}

fn simulated_transport_error(operation: &str) -> ClientError {
    ClientError::Io(io::Error::new(
        io::ErrorKind::ConnectionReset,
        format!("simulated {operation} failure"),
    ))
}

#[async_trait::async_trait]
impl ObjectClient for MemoryClient {
    async fn get_body(&self, key: &ObjectKey, range: Option<ByteRange>) -> ClientResult<Bytes> {
        let data = self.object(key)?;
        let Some(range) = range else {
            return Ok(data);
        };

        let len = data.len() as u64;
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
        Ok(data.slice(range.start() as usize..end as usize))
    }

    async fn get_stream(&self, key: &ObjectKey) -> ClientResult<BodyStream> {
        let data = self.object(key)?;
        let piece_size = self.piece_size;
        let pieces: Vec<ClientResult<Bytes>> = (0..data.len())
            .step_by(piece_size)
            .map(|start| Ok(data.slice(start..(start + piece_size).min(data.len()))))
            .collect();
        Ok(stream::iter(pieces).boxed())
    }

    async fn upload_body(&self, key: &ObjectKey, body: UploadBody) -> ClientResult<()> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(simulated_transport_error("upload"));
        }

        let data = body.into_bytes().await?;
        self.lock().objects.insert(key.to_string(), data);
        Ok(())
    }

    async fn purge_cache(&self, key: &ObjectKey) -> ClientResult<()> {
        if self.fail_purges.load(Ordering::SeqCst) {
            return Err(simulated_transport_error("purge"));
        }

        self.lock().purged.push(key.to_string());
        Ok(())
    }

    async fn delete_object(&self, key: &ObjectKey) -> ClientResult<()> {
        let mut state = self.lock();
        state.objects.remove(key.as_str());
        state.deleted.insert(key.to_string());
        Ok(())
    }

    async fn exists(&self, key: &ObjectKey) -> ClientResult<bool> {
        Ok(self.lock().objects.contains_key(key.as_str()))
    }
}

//! Upload bodies.

use std::fmt;
use std::io;
use std::pin::Pin;

use bytes::{Bytes, BytesMut};
use futures::{Stream, TryStreamExt};
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

/// Boxed byte stream used as an upload source.
pub type UploadStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send + Sync>>;

/// Payload of an upload.
///
/// Whether a streamed body is sent incrementally or buffered first is up to
/// the [`ObjectClient`](super::ObjectClient).
pub enum UploadBody {
    /// Fully materialized payload.
    Bytes(Bytes),
    /// Payload produced incrementally.
    Stream(UploadStream),
}

impl UploadBody {
    /// Wraps a byte stream.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = io::Result<Bytes>> + Send + Sync + 'static,
    {
        Self::Stream(Box::pin(stream))
    }

    /// Streams the contents of an [`AsyncRead`] until EOF.
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + Sync + 'static,
    {
        Self::from_stream(ReaderStream::new(reader))
    }

    /// Returns the payload length when it is known up front.
    pub fn len_hint(&self) -> Option<usize> {
        match self {
            Self::Bytes(bytes) => Some(bytes.len()),
            Self::Stream(_) => None,
        }
    }

    /// Reads the whole payload into memory.
    pub async fn into_bytes(self) -> io::Result<Bytes> {
        match self {
            Self::Bytes(bytes) => Ok(bytes),
            Self::Stream(stream) => {
                let buffer = stream
                    .try_fold(BytesMut::new(), |mut buffer, piece| async move {
                        buffer.extend_from_slice(&piece);
                        Ok(buffer)
                    })
                    .await?;
                Ok(buffer.freeze())
            }
        }
    }
}

impl From<UploadBody> for reqwest::Body {
    fn from(body: UploadBody) -> Self {
        match body {
            UploadBody::Bytes(bytes) => reqwest::Body::from(bytes),
            UploadBody::Stream(stream) => reqwest::Body::wrap_stream(stream),
        }
    }
}

impl From<Bytes> for UploadBody {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Vec<u8>> for UploadBody {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(bytes))
    }
}

impl From<&'static [u8]> for UploadBody {
    fn from(bytes: &'static [u8]) -> Self {
        Self::Bytes(Bytes::from_static(bytes))
    }
}

impl From<String> for UploadBody {
    fn from(text: String) -> Self {
        Self::Bytes(Bytes::from(text))
    }
}

impl fmt::Debug for UploadBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

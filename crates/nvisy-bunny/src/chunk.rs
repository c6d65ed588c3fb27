//! Fixed-size rechunking of object body streams.

use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};

/// Size of every chunk a streaming download delivers, except the last.
pub const DOWNLOAD_CHUNK_SIZE: usize = 5 * 1024 * 1024;

/// Regroups an arbitrary byte stream into chunks of exactly `chunk_size`
/// bytes, followed by one shorter chunk if bytes remain.
///
/// Pieces are consumed as they arrive: at most one partial chunk is
/// buffered, so a chunk is emitted as soon as enough bytes have been read
/// from `source`. The first error from `source` ends the stream. A
/// `chunk_size` of zero is treated as one.
pub fn rechunk<S, E>(source: S, chunk_size: usize) -> impl Stream<Item = Result<Bytes, E>>
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Send + 'static,
{
    let chunk_size = chunk_size.max(1);

    async_stream::try_stream! {
        let mut source = Box::pin(source);
        let mut buffer = BytesMut::new();

        while let Some(piece) = source.next().await {
            let mut piece = piece?;

            while !piece.is_empty() {
                if buffer.is_empty() && piece.len() >= chunk_size {
                    yield piece.split_to(chunk_size);
                    continue;
                }

                let take = (chunk_size - buffer.len()).min(piece.len());
                buffer.extend_from_slice(&piece.split_to(take));
                if buffer.len() == chunk_size {
                    yield buffer.split().freeze();
                }
            }
        }

        if !buffer.is_empty() {
            yield buffer.freeze();
        }
    }
}

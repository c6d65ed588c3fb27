//! Byte ranges for partial object reads.

use std::fmt;
use std::ops::{Range, RangeInclusive};

use crate::{Error, Result};

/// A validated interval of byte offsets within an object.
///
/// Ranges are either half-open (`start..end`) or closed (`start..=end`).
/// The distinction only matters when translating into the backend's
/// inclusive `Range` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRange {
    start: u64,
    end: u64,
    end_inclusive: bool,
}

impl ByteRange {
    /// Creates a half-open range `[start, end)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRange`] if `start > end`.
    pub fn new(start: u64, end: u64) -> Result<Self> {
        Self::checked(start, end, false)
    }

    /// Creates a closed range `[start, end]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRange`] if `start > end`.
    pub fn inclusive(start: u64, end: u64) -> Result<Self> {
        Self::checked(start, end, true)
    }

    fn checked(start: u64, end: u64, end_inclusive: bool) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidRange { start, end });
        }

        Ok(Self {
            start,
            end,
            end_inclusive,
        })
    }

    /// Returns the first byte offset.
    #[inline]
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Returns the end offset as it was given.
    #[inline]
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Whether the end offset is part of the range.
    #[inline]
    pub fn is_end_inclusive(&self) -> bool {
        self.end_inclusive
    }

    /// Number of bytes covered by the range.
    ///
    /// Saturates at `u64::MAX` for `0..=u64::MAX`.
    pub fn len(&self) -> u64 {
        let span = self.end - self.start;
        if self.end_inclusive {
            span.saturating_add(1)
        } else {
            span
        }
    }

    /// Whether the range covers no bytes (only possible for `a..a`).
    pub fn is_empty(&self) -> bool {
        !self.end_inclusive && self.start == self.end
    }

    /// Returns the inclusive offset of the last byte, or `None` for an
    /// empty range.
    pub fn last(&self) -> Option<u64> {
        if self.end_inclusive {
            Some(self.end)
        } else {
            self.end.checked_sub(1).filter(|last| *last >= self.start)
        }
    }

    /// Renders the range in HTTP `Range` header syntax (`bytes=a-b`).
    ///
    /// Returns `None` for an empty range, which the header cannot express.
    pub fn header_value(&self) -> Option<String> {
        self.last()
            .map(|last| format!("bytes={}-{}", self.start, last))
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.end_inclusive {
            write!(f, "{}..={}", self.start, self.end)
        } else {
            write!(f, "{}..{}", self.start, self.end)
        }
    }
}

impl TryFrom<Range<u64>> for ByteRange {
    type Error = Error;

    fn try_from(range: Range<u64>) -> Result<Self> {
        Self::new(range.start, range.end)
    }
}

impl TryFrom<RangeInclusive<u64>> for ByteRange {
    type Error = Error;

    fn try_from(range: RangeInclusive<u64>) -> Result<Self> {
        let (start, end) = range.into_inner();
        Self::inclusive(start, end)
    }
}

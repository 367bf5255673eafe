use core::{cmp::Ordering, fmt, num::NonZeroUsize};

/// A location in the logical element stream, addressed both as a single
/// absolute index and as a `(chunk, offset)` pair for a fixed chunk size.
///
/// The absolute index is the stored representation; chunk and offset are
/// derived from it, so two positions with the same chunk size and index are
/// always equal.
///
/// ```text
/// chunk size 10:  chunk 0, offset 0 => 0
///                 chunk 0, offset 5 => 5
///                 chunk 2, offset 8 => 28
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    chunk_size: NonZeroUsize,
    absolute: usize,
}

impl Position {
    /// The logical origin for the given chunk size.
    #[must_use]
    pub const fn origin(chunk_size: NonZeroUsize) -> Self {
        Self {
            chunk_size,
            absolute: 0,
        }
    }

    /// A position at an absolute index.
    #[must_use]
    pub const fn at(chunk_size: NonZeroUsize, absolute: usize) -> Self {
        Self {
            chunk_size,
            absolute,
        }
    }

    /// Returns this position moved by `steps`, forward when positive and
    /// backward when negative. Never moves before the origin: moving `0:3` by
    /// `-5` yields `0:0`. There is no upper bound.
    #[must_use]
    pub const fn moved(self, steps: isize) -> Self {
        let absolute = if steps < 0 {
            self.absolute.saturating_sub(steps.unsigned_abs())
        } else {
            self.absolute.saturating_add(steps.unsigned_abs())
        };
        Self { absolute, ..self }
    }

    /// The one-dimensional index, starting at 0.
    #[inline]
    #[must_use]
    pub const fn absolute(&self) -> usize {
        self.absolute
    }

    /// Index of the chunk holding this position.
    #[inline]
    #[must_use]
    pub const fn chunk(&self) -> usize {
        self.absolute / self.chunk_size.get()
    }

    /// Offset within the chunk, always below the chunk size.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.absolute % self.chunk_size.get()
    }

    /// Chunk size shared by every position of one buffer.
    #[inline]
    #[must_use]
    pub const fn chunk_size(&self) -> NonZeroUsize {
        self.chunk_size
    }

    /// The first position of the chunk containing `self`.
    #[must_use]
    pub const fn chunk_start(&self) -> Self {
        Self {
            absolute: self.chunk() * self.chunk_size.get(),
            ..*self
        }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.absolute
            .cmp(&other.absolute)
            .then(self.chunk_size.cmp(&other.chunk_size))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chunk(), self.offset())
    }
}

use core::num::NonZeroUsize;

use crate::error::ConfigError;

/// Storage layout for a [`Buffer`](crate::Buffer).
///
/// ```rust
/// use chunkbuf::{Buffer, BufferOptions};
///
/// let buf = Buffer::<char>::with_options(BufferOptions {
///     chunk_size: 64,
///     ..Default::default()
/// })
/// .unwrap();
/// assert_eq!(buf.chunk_size(), 64);
/// ```
///
/// # Default
///
/// Chunks of 10 elements, 5 of them pre-allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BufferOptions {
    /// Number of element slots per chunk. Chunks are the unit of allocation
    /// and of reclamation by [`Buffer::commit`](crate::Buffer::commit).
    ///
    /// # Default
    ///
    /// `10`
    pub chunk_size: usize,

    /// Number of chunks allocated up front.
    ///
    /// # Default
    ///
    /// `5`
    pub initial_chunks: usize,
}

impl BufferOptions {
    pub(crate) const DEFAULT_CHUNK_SIZE: NonZeroUsize = NonZeroUsize::new(10).unwrap();
    pub(crate) const DEFAULT_INITIAL_CHUNKS: usize = 5;

    /// Checks that both parameters are positive.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ChunkSize`] for a zero chunk size, otherwise
    /// [`ConfigError::InitialChunks`] for a zero chunk count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.chunk_size_checked().map(|_| ())
    }

    pub(crate) fn chunk_size_checked(&self) -> Result<NonZeroUsize, ConfigError> {
        let size =
            NonZeroUsize::new(self.chunk_size).ok_or(ConfigError::ChunkSize(self.chunk_size))?;
        if self.initial_chunks == 0 {
            return Err(ConfigError::InitialChunks(self.initial_chunks));
        }
        Ok(size)
    }
}

impl Default for BufferOptions {
    fn default() -> Self {
        Self {
            chunk_size: Self::DEFAULT_CHUNK_SIZE.get(),
            initial_chunks: Self::DEFAULT_INITIAL_CHUNKS,
        }
    }
}

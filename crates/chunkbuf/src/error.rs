use thiserror::Error;

use crate::position::Position;

/// Rejected construction parameters.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The chunk size must be at least one slot.
    #[error("illegal non-positive chunk size {0}")]
    ChunkSize(usize),
    /// At least one chunk must be pre-allocated.
    #[error("illegal non-positive initial chunk count {0}")]
    InitialChunks(usize),
}

/// Reasons a [`Buffer::rollback`](crate::Buffer::rollback) was refused. The
/// read position is left untouched in both cases.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RollbackError {
    /// The checkpoint was default-constructed rather than captured.
    #[error("illegal non-initialized checkpoint")]
    ZeroState,
    /// The checkpoint's read position is not readable in this buffer: its
    /// chunk was reclaimed by a commit, or the checkpoint was captured by a
    /// different buffer (another chunk size, or a position past the write
    /// position).
    #[error(
        "rollback position {read} is not readable: reclaimed by a commit or from another buffer (first retained chunk is {base_chunk})"
    )]
    IllegalState {
        /// Read position recorded in the checkpoint.
        read: Position,
        /// First chunk still retained by the buffer.
        base_chunk: usize,
    },
}

use alloc::{collections::VecDeque, vec::Vec};
use core::{iter, num::NonZeroUsize};

use crate::{
    checkpoint::Checkpoint,
    error::{ConfigError, RollbackError},
    options::BufferOptions,
    position::Position,
};

/// A growable FIFO buffer with unread, checkpoint and rollback support.
///
/// Elements are stored in fixed-size chunks. Writing past the allocated
/// chunks appends new ones; existing chunks are never resized or moved, and
/// only [`commit`](Self::commit) removes them (from the front). Between
/// commits the read position may be moved back arbitrarily far, either one
/// element at a time with [`unread`](Self::unread) or in one jump with
/// [`rollback`](Self::rollback).
///
/// Two read styles share the same read position:
///
/// - [`peek`](Self::peek) / [`advance`](Self::advance) for "current, then
///   consume" lookahead;
/// - [`read_next`](Self::read_next) / [`unread`](Self::unread) for
///   consuming reads with push-back.
///
/// ```rust
/// use chunkbuf::Buffer;
///
/// let mut buf = Buffer::new();
/// buf.extend("let".chars());
///
/// let start = buf.checkpoint();
/// assert_eq!(buf.read_next(), Some(&'l'));
/// assert_eq!(buf.read_next(), Some(&'e'));
/// buf.rollback(start).unwrap();
/// assert_eq!(buf.peek(), Some(&'l'));
/// ```
///
/// Without periodic commits the buffer keeps every element ever written.
/// The buffer is meant for one producer and one consumer in the same
/// thread.
#[derive(Debug, Clone)]
pub struct Buffer<T> {
    chunk_size: NonZeroUsize,
    /// Chunks discarded so far; `chunks[i]` holds logical chunk
    /// `base_chunk + i`.
    base_chunk: usize,
    /// Every chunk before the one holding `write` is full; that chunk holds
    /// exactly `write.offset()` elements.
    chunks: VecDeque<Vec<T>>,
    /// Next element to read.
    read: Position,
    /// Slot the next write fills.
    write: Position,
}

impl<T> Buffer<T> {
    /// Creates a buffer with chunks of 10 elements, 5 of them pre-allocated.
    #[must_use]
    pub fn new() -> Self {
        Self::allocate(
            BufferOptions::DEFAULT_CHUNK_SIZE,
            BufferOptions::DEFAULT_INITIAL_CHUNKS,
        )
    }

    /// Creates a buffer with `initial_chunks` pre-allocated chunks of
    /// `chunk_size` elements each.
    ///
    /// # Errors
    ///
    /// Fails when either parameter is zero; see
    /// [`BufferOptions::validate`].
    pub fn with_size(chunk_size: usize, initial_chunks: usize) -> Result<Self, ConfigError> {
        Self::with_options(BufferOptions {
            chunk_size,
            initial_chunks,
        })
    }

    /// Creates a buffer from validated options.
    ///
    /// # Errors
    ///
    /// Fails when either parameter is zero; see
    /// [`BufferOptions::validate`].
    pub fn with_options(options: BufferOptions) -> Result<Self, ConfigError> {
        let chunk_size = options.chunk_size_checked()?;
        Ok(Self::allocate(chunk_size, options.initial_chunks))
    }

    fn allocate(chunk_size: NonZeroUsize, initial_chunks: usize) -> Self {
        let mut buf = Self {
            chunk_size,
            base_chunk: 0,
            chunks: VecDeque::with_capacity(initial_chunks),
            read: Position::origin(chunk_size),
            write: Position::origin(chunk_size),
        };
        buf.grow(initial_chunks.saturating_mul(chunk_size.get()));
        buf
    }

    // ── writing ───────────────────────────────────────────────────────────

    /// Appends an element, growing the storage if needed.
    pub fn write(&mut self, element: T) {
        let index = self.write.chunk() - self.base_chunk;
        self.reserve_chunks(index + 1);
        let chunk = &mut self.chunks[index];
        debug_assert_eq!(chunk.len(), self.write.offset());
        chunk.push(element);
        self.write = self.write.moved(1);
    }

    /// Makes sure the chunks currently held have room for at least
    /// `min_capacity` elements, appending chunks as needed. Does nothing when
    /// [`capacity`](Self::capacity) already suffices.
    pub fn grow(&mut self, min_capacity: usize) {
        self.reserve_chunks(min_capacity.div_ceil(self.chunk_size.get()));
    }

    fn reserve_chunks(&mut self, needed: usize) {
        if needed <= self.chunks.len() {
            return;
        }

        let added = needed - self.chunks.len();
        let chunk_size = self.chunk_size.get();
        self.chunks
            .extend(iter::repeat_with(|| Vec::with_capacity(chunk_size)).take(added));
        trace!(
            added,
            chunks = self.chunks.len(),
            base_chunk = self.base_chunk,
            "allocated chunks"
        );
    }

    // ── reading ───────────────────────────────────────────────────────────

    /// The element at the read position, without consuming it. Returns
    /// `None` when every written element has been read.
    #[inline]
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.peek_nth(0)
    }

    /// The element `n` places after the read position, without consuming
    /// anything. Returns `None` when fewer than `n + 1` elements are
    /// buffered.
    #[must_use]
    pub fn peek_nth(&self, n: usize) -> Option<&T> {
        if n >= self.buffered() {
            return None;
        }
        self.slot(Position::at(self.chunk_size, self.read.absolute() + n))
    }

    /// Consumes the element at the read position. Returns `false`, and stays
    /// put, when nothing is buffered.
    pub fn advance(&mut self) -> bool {
        self.move_read(1) == 1
    }

    /// Consumes up to `n` elements and returns how many were passed.
    pub fn consume(&mut self, n: usize) -> usize {
        self.move_read(isize::try_from(n).unwrap_or(isize::MAX))
    }

    /// Returns the element at the read position and consumes it, or `None`
    /// when nothing is buffered.
    pub fn read_next(&mut self) -> Option<&T> {
        let at = self.read;
        if self.move_read(1) == 0 {
            return None;
        }
        self.slot(at)
    }

    /// Steps the read position back by one, so the previously read element
    /// is read again. Returns `false` at the start of the stream or at the
    /// start of the first chunk kept by the last commit.
    pub fn unread(&mut self) -> bool {
        self.move_read(-1) == 1
    }

    /// Number of elements written but not yet read.
    #[inline]
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.write.absolute() - self.read.absolute()
    }

    /// `true` when there is nothing left to read.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffered() == 0
    }

    /// Moves the read position by `steps`, clamped to the readable range
    /// from the first retained slot up to the write position. Returns the
    /// distance actually moved.
    fn move_read(&mut self, steps: isize) -> usize {
        let target = self.read.moved(steps).clamp(self.retained_start(), self.write);
        let moved = target.absolute().abs_diff(self.read.absolute());
        self.read = target;
        moved
    }

    fn slot(&self, pos: Position) -> Option<&T> {
        let index = pos.chunk().checked_sub(self.base_chunk)?;
        self.chunks.get(index)?.get(pos.offset())
    }

    fn retained_start(&self) -> Position {
        Position::at(self.chunk_size, self.base_chunk * self.chunk_size.get())
    }

    // ── checkpoints ───────────────────────────────────────────────────────

    /// Captures the current read and write positions.
    #[must_use]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint::new(self.read, self.write)
    }

    /// Moves the read position back (or forward) to where it was when
    /// `checkpoint` was captured.
    ///
    /// Only the read position is restored. Elements written after the
    /// checkpoint stay in the buffer and are read again, in order, after the
    /// ones the checkpoint rewinds over.
    ///
    /// # Errors
    ///
    /// - [`RollbackError::ZeroState`] for an empty (default) checkpoint.
    /// - [`RollbackError::IllegalState`] when a commit has since reclaimed
    ///   the chunk holding the checkpoint's read position, or when the
    ///   checkpoint was not taken from this buffer (different chunk size, or
    ///   a read position beyond anything written here).
    pub fn rollback(&mut self, checkpoint: Checkpoint) -> Result<(), RollbackError> {
        let read = checkpoint.read_position().ok_or(RollbackError::ZeroState)?;
        if read.chunk_size() != self.chunk_size
            || read.chunk() < self.base_chunk
            || read.absolute() > self.write.absolute()
        {
            return Err(RollbackError::IllegalState {
                read,
                base_chunk: self.base_chunk,
            });
        }
        self.read = read;
        Ok(())
    }

    /// Discards every chunk before the one holding the read position and
    /// returns how many were discarded.
    ///
    /// Afterwards [`unread`](Self::unread) can reach back only to the start
    /// of the current chunk, and rolling back to any checkpoint taken
    /// before that point fails with [`RollbackError::IllegalState`].
    /// Outstanding checkpoints are not inspected here.
    pub fn commit(&mut self) -> usize {
        let discard = self.read.chunk() - self.base_chunk;
        if discard > 0 {
            self.chunks.drain(..discard);
            self.base_chunk += discard;
            trace!(
                discard,
                base_chunk = self.base_chunk,
                chunks = self.chunks.len(),
                "reclaimed chunks"
            );
        }
        discard
    }

    // ── introspection ─────────────────────────────────────────────────────

    /// Number of element slots per chunk.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size.get()
    }

    /// Position of the next element to read.
    #[must_use]
    pub fn read_position(&self) -> Position {
        self.read
    }

    /// Position the next write fills.
    #[must_use]
    pub fn write_position(&self) -> Position {
        self.write
    }

    /// Index of the first chunk still held, i.e. the number of chunks
    /// reclaimed so far.
    #[must_use]
    pub fn base_chunk(&self) -> usize {
        self.base_chunk
    }

    /// Number of chunks currently held.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of element slots currently held.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.chunks.len() * self.chunk_size.get()
    }

    /// Panics if any internal invariant is violated.
    #[cfg(any(test, feature = "fuzzing"))]
    pub fn check_invariants(&self) {
        assert!(self.read <= self.write, "read {} past write {}", self.read, self.write);
        assert!(
            self.read.chunk() >= self.base_chunk,
            "read {} in reclaimed chunk (base {})",
            self.read,
            self.base_chunk
        );
        for (i, chunk) in self.chunks.iter().enumerate() {
            let logical = self.base_chunk + i;
            let expected = match logical.cmp(&self.write.chunk()) {
                core::cmp::Ordering::Less => self.chunk_size.get(),
                core::cmp::Ordering::Equal => self.write.offset(),
                core::cmp::Ordering::Greater => 0,
            };
            assert_eq!(chunk.len(), expected, "chunk {logical} fill level");
        }
    }
}

impl<T> Default for Buffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for Buffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.write(element);
        }
    }
}

/// Consuming reads, cloning each element out of the buffer. The iterator
/// ends when the buffer is drained but resumes after further writes.
impl<T: Clone> Iterator for Buffer<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_next().cloned()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.buffered(), None)
    }
}

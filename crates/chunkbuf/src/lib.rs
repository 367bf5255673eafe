//! A growable, checkpointable FIFO buffer for tokenizer and parser
//! lookahead.
//!
//! A producer [`write`](Buffer::write)s elements; a consumer reads them back
//! in order with one-element lookahead ([`peek`](Buffer::peek) /
//! [`advance`](Buffer::advance)), consuming reads with push-back
//! ([`read_next`](Buffer::read_next) / [`unread`](Buffer::unread)), or
//! unbounded lookahead by saving a [`Checkpoint`] and
//! [`rollback`](Buffer::rollback)ing to it. Periodic
//! [`commit`](Buffer::commit)s release storage the reader will not revisit.
//!
//! ```rust
//! use chunkbuf::{Buffer, RollbackError};
//!
//! let mut buf = Buffer::with_size(4, 1).unwrap();
//! buf.extend("abc".chars());
//!
//! assert_eq!(buf.read_next(), Some(&'a'));
//! let cp = buf.checkpoint();
//! assert_eq!(buf.read_next(), Some(&'b'));
//! buf.write('d');
//! buf.rollback(cp).unwrap();
//! assert_eq!(buf.by_ref().collect::<String>(), "bcd");
//!
//! // rolling back a checkpoint that was never captured is an error
//! assert_eq!(
//!     buf.rollback(Default::default()),
//!     Err(RollbackError::ZeroState)
//! );
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

/// Emits a `tracing` event when the `tracing` feature is enabled; compiles to
/// nothing otherwise.
macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::trace!($($arg)*);
    };
}

mod buffer;
mod checkpoint;
mod error;
mod options;
mod position;

#[cfg(test)]
mod tests;

pub use buffer::Buffer;
pub use checkpoint::Checkpoint;
pub use error::{ConfigError, RollbackError};
pub use options::BufferOptions;
pub use position::Position;

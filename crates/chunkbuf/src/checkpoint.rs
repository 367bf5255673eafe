use crate::position::Position;

/// A snapshot of a buffer's read and write positions, used to backtrack with
/// [`Buffer::rollback`](crate::Buffer::rollback).
///
/// Only [`Buffer::checkpoint`](crate::Buffer::checkpoint) produces a real
/// checkpoint. [`Checkpoint::default`] is the empty value, which every
/// rollback rejects, so a parser can keep a `Checkpoint` field around before
/// it has anything to return to.
///
/// A checkpoint stores coordinates only; it keeps no chunk alive and goes
/// stale once a commit reclaims the chunk holding its read position.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Checkpoint {
    captured: Option<Captured>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct Captured {
    read: Position,
    write: Position,
}

impl Checkpoint {
    pub(crate) const fn new(read: Position, write: Position) -> Self {
        Self {
            captured: Some(Captured { read, write }),
        }
    }

    /// `false` for the empty (default) checkpoint.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.captured.is_some()
    }

    /// Read position at capture time.
    #[must_use]
    pub fn read_position(&self) -> Option<Position> {
        self.captured.map(|c| c.read)
    }

    /// Write position at capture time. Rollback does not restore it.
    #[must_use]
    pub fn write_position(&self) -> Option<Position> {
        self.captured.map(|c| c.write)
    }
}

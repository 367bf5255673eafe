use alloc::vec::Vec;

use quickcheck::{Arbitrary, Gen, QuickCheck};
use quickcheck_macros::quickcheck;

use crate::{Buffer, RollbackError};

#[derive(Debug, Clone)]
enum Action {
    Write(u8),
    Read,
    Peek,
    Advance,
    Unread,
    Checkpoint,
    Rollback,
    Commit,
    Grow(u8),
}

impl Arbitrary for Action {
    fn arbitrary(g: &mut Gen) -> Self {
        // writes dominate so the buffer actually spans several chunks
        match u8::arbitrary(g) % 16 {
            0..=5 => Action::Write(u8::arbitrary(g)),
            6..=7 => Action::Read,
            8 => Action::Peek,
            9 => Action::Advance,
            10 => Action::Unread,
            11 => Action::Checkpoint,
            12 => Action::Rollback,
            13 => Action::Commit,
            _ => Action::Grow(u8::arbitrary(g)),
        }
    }
}

/// Reference model: every element ever written, a read index, and the first
/// readable index after the last commit.
#[derive(Default)]
struct Model {
    written: Vec<u8>,
    read: usize,
    retained: usize,
    checkpoint: Option<usize>,
}

fn check(chunk_size: usize, actions: &[Action]) -> bool {
    let mut buf = Buffer::<u8>::with_size(chunk_size, 1).unwrap();
    let mut model = Model::default();
    let mut checkpoint = crate::Checkpoint::default();

    for action in actions {
        match *action {
            Action::Write(v) => {
                buf.write(v);
                model.written.push(v);
            }
            Action::Read => {
                let expected = model.written.get(model.read).copied();
                if buf.read_next().copied() != expected {
                    return false;
                }
                if expected.is_some() {
                    model.read += 1;
                }
            }
            Action::Peek => {
                if buf.peek() != model.written.get(model.read) {
                    return false;
                }
            }
            Action::Advance => {
                let moved = buf.advance();
                if moved != (model.read < model.written.len()) {
                    return false;
                }
                model.read = (model.read + 1).min(model.written.len());
            }
            Action::Unread => {
                let moved = buf.unread();
                if moved != (model.read > model.retained) {
                    return false;
                }
                if moved {
                    model.read -= 1;
                }
            }
            Action::Checkpoint => {
                checkpoint = buf.checkpoint();
                model.checkpoint = Some(model.read);
            }
            Action::Rollback => {
                let result = buf.rollback(checkpoint);
                match model.checkpoint {
                    None => {
                        if result != Err(RollbackError::ZeroState) {
                            return false;
                        }
                    }
                    Some(read) if read < model.retained => {
                        if !matches!(result, Err(RollbackError::IllegalState { .. })) {
                            return false;
                        }
                    }
                    Some(read) => {
                        if result.is_err() {
                            return false;
                        }
                        model.read = read;
                    }
                }
            }
            Action::Commit => {
                buf.commit();
                model.retained = model.read / chunk_size * chunk_size;
            }
            Action::Grow(n) => {
                buf.grow(usize::from(n));
                if buf.capacity() < usize::from(n) {
                    return false;
                }
            }
        }

        buf.check_invariants();
        if buf.buffered() != model.written.len() - model.read {
            return false;
        }
    }
    true
}

/// Property: any sequence of operations behaves like reading from a plain
/// vector with a cursor.
#[test]
fn matches_reference_model_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(chunk_size: u8, actions: Vec<Action>) -> bool {
        check(usize::from(chunk_size % 8) + 1, &actions)
    }

    #[cfg(not(miri))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(miri)]
    let tests = 10;

    QuickCheck::new()
        .tests(tests)
        .quickcheck(prop as fn(u8, Vec<Action>) -> bool);
}

#[allow(clippy::needless_pass_by_value)]
#[quickcheck]
fn reads_observe_writes_in_order(chunk_size: u8, elements: Vec<u32>) -> bool {
    let mut buf = Buffer::with_size(usize::from(chunk_size % 16) + 1, 1).unwrap();
    buf.extend(elements.iter().copied());
    let out: Vec<u32> = buf.by_ref().collect();
    out == elements && buf.read_next().is_none() && buf.buffered() == 0
}

#[allow(clippy::needless_pass_by_value)]
#[quickcheck]
fn rollback_replays_later_writes(head: Vec<u8>, tail: Vec<u8>, consumed: usize) -> bool {
    let mut buf = Buffer::with_size(3, 1).unwrap();
    buf.extend(head.iter().copied());
    buf.consume(consumed % (head.len() + 1));

    let checkpoint = buf.checkpoint();
    let next = buf.peek().copied();
    let remaining = buf.buffered();

    buf.consume(remaining);
    buf.extend(tail.iter().copied());
    buf.rollback(checkpoint).unwrap();

    let replayed: Vec<u8> = buf.by_ref().collect();
    let mut expected = head[head.len() - remaining..].to_vec();
    expected.extend_from_slice(&tail);
    replayed.first().copied() == next.or(tail.first().copied()) && replayed == expected
}

#[quickcheck]
fn grow_and_commit_are_idempotent(chunk_size: u8, capacity: u8, reads: u8) -> bool {
    let mut buf = Buffer::with_size(usize::from(chunk_size % 8) + 1, 1).unwrap();
    buf.grow(usize::from(capacity));
    let chunks = buf.chunk_count();
    buf.grow(usize::from(capacity));
    buf.grow(usize::from(capacity) / 2);
    if buf.chunk_count() != chunks {
        return false;
    }

    buf.extend(0..u16::from(reads));
    buf.consume(usize::from(reads));
    buf.commit();
    let base = buf.base_chunk();
    buf.commit() == 0 && buf.base_chunk() == base
}

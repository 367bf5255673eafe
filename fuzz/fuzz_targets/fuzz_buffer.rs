#![no_main]
use std::collections::VecDeque;

use arbitrary::Arbitrary;
use chunkbuf::{Buffer, Checkpoint, RollbackError};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    chunk_size: u8,
    initial_chunks: u8,
    ops: Vec<Op>,
}

#[derive(Debug, Arbitrary)]
enum Op {
    Write(u8),
    WriteMany(u8, u8),
    Read,
    Peek,
    PeekNth(u8),
    Advance,
    Consume(u8),
    Unread,
    Checkpoint,
    Rollback,
    Commit,
    Grow(u16),
}

/// Mirror of the buffer: the retained elements, the index of the first one in
/// the stream, and the read cursor relative to the stream start.
struct Model {
    retained: VecDeque<u8>,
    first: usize,
    read: usize,
}

impl Model {
    fn len(&self) -> usize {
        self.first + self.retained.len()
    }

    fn get(&self, absolute: usize) -> Option<u8> {
        self.retained.get(absolute.checked_sub(self.first)?).copied()
    }
}

fn run(input: Input) {
    let chunk_size = usize::from(input.chunk_size);
    let mut buf = match Buffer::with_size(chunk_size, usize::from(input.initial_chunks)) {
        Ok(buf) => buf,
        Err(_) => {
            assert!(input.chunk_size == 0 || input.initial_chunks == 0);
            return;
        }
    };
    let mut model = Model {
        retained: VecDeque::new(),
        first: 0,
        read: 0,
    };
    let mut checkpoint = Checkpoint::default();
    let mut saved: Option<usize> = None;

    for op in input.ops {
        match op {
            Op::Write(v) => {
                buf.write(v);
                model.retained.push_back(v);
            }
            Op::WriteMany(v, n) => {
                buf.extend(std::iter::repeat_n(v, usize::from(n)));
                model.retained.extend(std::iter::repeat_n(v, usize::from(n)));
            }
            Op::Read => {
                let expected = model.get(model.read);
                assert_eq!(buf.read_next().copied(), expected);
                if expected.is_some() {
                    model.read += 1;
                }
            }
            Op::Peek => assert_eq!(buf.peek().copied(), model.get(model.read)),
            Op::PeekNth(n) => {
                let n = usize::from(n);
                assert_eq!(buf.peek_nth(n).copied(), model.get(model.read + n));
            }
            Op::Advance => {
                let moved = buf.advance();
                assert_eq!(moved, model.read < model.len());
                model.read = (model.read + 1).min(model.len());
            }
            Op::Consume(n) => {
                let consumed = buf.consume(usize::from(n));
                let expected = usize::from(n).min(model.len() - model.read);
                assert_eq!(consumed, expected);
                model.read += expected;
            }
            Op::Unread => {
                let moved = buf.unread();
                assert_eq!(moved, model.read > model.first);
                if moved {
                    model.read -= 1;
                }
            }
            Op::Checkpoint => {
                checkpoint = buf.checkpoint();
                saved = Some(model.read);
            }
            Op::Rollback => match (buf.rollback(checkpoint), saved) {
                (Err(RollbackError::ZeroState), None) => {}
                (Err(RollbackError::IllegalState { .. }), Some(read)) => {
                    assert!(read < model.first);
                }
                (Ok(()), Some(read)) => {
                    assert!(read >= model.first);
                    model.read = read;
                }
                (result, saved) => panic!("rollback {result:?} with saved {saved:?}"),
            },
            Op::Commit => {
                let first = model.read / chunk_size * chunk_size;
                let discarded = buf.commit();
                assert_eq!(discarded * chunk_size, first - model.first);
                model.retained.drain(..first - model.first);
                model.first = first;
            }
            Op::Grow(n) => {
                buf.grow(usize::from(n));
                assert!(buf.capacity() >= usize::from(n));
            }
        }

        buf.check_invariants();
        assert_eq!(buf.buffered(), model.len() - model.read);
        assert_eq!(buf.read_position().absolute(), model.read);
    }
}

fuzz_target!(|input: Input| run(input));

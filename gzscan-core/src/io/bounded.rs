use super::positioned::ReadAt;
use std::io::Read;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Published read offset of one bounded reader.
///
/// Single writer (the reader that owns it), any number of observers. The value
/// is a progress snapshot only; it orders nothing else.
#[derive(Clone, Debug, Default)]
pub struct ReadCursor(Arc<AtomicU64>);

impl ReadCursor {
    pub fn new(position: u64) -> Self {
        Self(Arc::new(AtomicU64::new(position)))
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    /// Moves forward to `position`; never backwards.
    fn advance_to(&self, position: u64) {
        self.0.fetch_max(position, Ordering::Relaxed);
    }
}

/// `Read` over `[start, end)` of a positioned source.
///
/// Returns `Ok(0)` once `end` is reached even when the source has more data,
/// and truncates the last read instead of crossing `end`.
pub struct BoundedReader<'a, S: ReadAt + ?Sized> {
    src: &'a S,
    pos: u64,
    end: u64,
    cursor: ReadCursor,
}

impl<'a, S: ReadAt + ?Sized> BoundedReader<'a, S> {
    /// `cursor` should start at `start` (see `ReadCursor::new`).
    pub fn new(src: &'a S, start: u64, end: u64, cursor: ReadCursor) -> Self {
        Self {
            src,
            pos: start,
            end: end.max(start),
            cursor,
        }
    }

    pub fn position(&self) -> u64 {
        self.pos
    }

    pub fn remaining(&self) -> u64 {
        self.end - self.pos
    }
}

impl<'a, S: ReadAt + ?Sized> Read for BoundedReader<'a, S> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let remain = self.remaining();
        if remain == 0 || buf.is_empty() {
            return Ok(0);
        }
        let cap = std::cmp::min(remain, buf.len() as u64) as usize;
        let n = self.src.read_at(&mut buf[..cap], self.pos)?;
        self.pos += n as u64;
        self.cursor.advance_to(self.pos);
        Ok(n)
    }
}

use std::io::{ErrorKind, Read};

/// Fixed-capacity read-ahead buffer with non-consuming `peek`.
pub struct PeekReader<R: Read> {
    inner: R,
    buf: Box<[u8]>,
    head: usize,
    tail: usize,
    eof: bool,
}

impl<R: Read> PeekReader<R> {
    pub fn with_capacity(capacity: usize, inner: R) -> Self {
        Self {
            inner,
            buf: vec![0u8; capacity.max(1)].into_boxed_slice(),
            head: 0,
            tail: 0,
            eof: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn buffered(&self) -> usize {
        self.tail - self.head
    }

    /// Up to `n` bytes (clamped to capacity) without consuming them. A short
    /// slice means the inner reader is exhausted.
    pub fn peek(&mut self, n: usize) -> std::io::Result<&[u8]> {
        let n = n.min(self.buf.len());
        if self.buffered() < n && !self.eof {
            if self.head + n > self.buf.len() {
                self.buf.copy_within(self.head..self.tail, 0);
                self.tail -= self.head;
                self.head = 0;
            }
            while self.buffered() < n {
                match self.inner.read(&mut self.buf[self.tail..]) {
                    Ok(0) => {
                        self.eof = true;
                        break;
                    }
                    Ok(k) => self.tail += k,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            }
        }
        let avail = self.buffered().min(n);
        Ok(&self.buf[self.head..self.head + avail])
    }

    /// Drops up to `n` buffered bytes; returns how many were dropped.
    pub fn discard(&mut self, n: usize) -> usize {
        let k = n.min(self.buffered());
        self.head += k;
        if self.head == self.tail {
            self.head = 0;
            self.tail = 0;
        }
        k
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }
}

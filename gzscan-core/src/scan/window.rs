use super::range::ScanRange;
use crate::finding::Finding;
use crate::gzip::header::{self, MAGIC, MIN_HEADER_LEN, OS_OFFSET};
use crate::io::bounded::{BoundedReader, ReadCursor};
use crate::io::peek::PeekReader;
use crate::io::positioned::ReadAt;
use crate::sink::FindingSink;
use memchr::memmem;

pub const BUFFER_LEN: usize = 2 * 1024 * 1024;
/// Large enough for any header plus its optional fields.
pub const WINDOW_LEN: usize = 1024 * 1024 + 1024;
/// Skipped when the window holds no magic; the last `WINDOW_LEN - SKIP_LEN`
/// bytes are searched again on the next peek.
pub const SKIP_LEN: usize = 1024 * 1024;
/// Advance after a reported header: only past the magic, so a stream that
/// starts inside the one just reported is still found.
pub const RESYNC_LEN: usize = MAGIC.len();

enum Step {
    Skip(usize),
    Found(Finding),
    Reject,
    Done,
}

/// Slides a window over one range and reports every plausible gzip header.
pub struct WindowScanner<'a, S: ReadAt + ?Sized> {
    reader: PeekReader<BoundedReader<'a, S>>,
    range: ScanRange,
    pos: u64,
}

impl<'a, S: ReadAt + ?Sized> WindowScanner<'a, S> {
    pub fn new(src: &'a S, range: ScanRange, cursor: ReadCursor) -> Self {
        let bounded = BoundedReader::new(src, range.start, range.end, cursor);
        // never larger than the range itself; nothing to buffer for an empty one
        let capacity = if range.is_empty() {
            1
        } else {
            BUFFER_LEN.min(range.len() as usize)
        };
        Self {
            reader: PeekReader::with_capacity(capacity, bounded),
            range,
            pos: range.start,
        }
    }

    /// Runs to the end of the range. Returns the number of findings emitted.
    pub fn run(mut self, sink: &dyn FindingSink) -> std::io::Result<u64> {
        let mut found = 0u64;
        loop {
            match self.step()? {
                Step::Done => break,
                Step::Skip(n) => self.advance(n),
                Step::Reject => self.advance(1),
                Step::Found(finding) => {
                    sink.emit(finding);
                    found += 1;
                    self.advance(RESYNC_LEN);
                }
            }
        }
        tracing::debug!(
            worker = self.range.index,
            found,
            read = self.reader.get_ref().position() - self.range.start,
            "range done"
        );
        Ok(found)
    }

    fn step(&mut self) -> std::io::Result<Step> {
        if self.pos >= self.range.nominal_end {
            return Ok(Step::Done);
        }
        let window = self.reader.peek(WINDOW_LEN)?;
        if window.len() < MIN_HEADER_LEN {
            return Ok(Step::Done);
        }

        let step = match find_magic(window) {
            None => Step::Skip(SKIP_LEN.min(window.len())),
            Some(0) => match inspect(window) {
                Ok(h) => Step::Found(Finding::from_header(self.pos, self.range.index, &h)),
                Err(reason) => {
                    tracing::trace!(worker = self.range.index, pos = self.pos, %reason, "candidate rejected");
                    Step::Reject
                }
            },
            Some(p) => Step::Skip(p),
        };
        Ok(step)
    }

    fn advance(&mut self, n: usize) {
        self.pos += self.reader.discard(n) as u64;
    }
}

fn inspect(window: &[u8]) -> Result<header::GzipHeader<'_>, header::HeaderError> {
    let prefix = header::check_prefix(window)?;
    header::parse_fields(prefix, &window[OS_OFFSET..])
}

fn find_magic(window: &[u8]) -> Option<usize> {
    memmem::find(window, &MAGIC)
}

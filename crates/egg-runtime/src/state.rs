//! Stream-backed parser state with bounded retention.
//!
//! The buffer reads the underlying stream lazily and keeps every byte from
//! the retention floor onward. Clients that are done with a prefix may call
//! [`State::forget_to`]; newline counts for the discarded prefix are kept so
//! that line numbers stay correct in failure reports.

use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

const CHUNK: usize = 4096;

/// Access to an input region the buffer has already discarded.
///
/// Only code that scans backward past its own position (the failure
/// reporter) can provoke this; parsers only ever move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("index {requested} is below the retention floor {available}")]
pub struct ForgottenRange {
    /// Stream index the caller asked for.
    pub requested: usize,
    /// Lowest stream index still retained.
    pub available: usize,
    /// Number of newlines in the discarded prefix.
    pub newlines_discarded: usize,
}

/// Random-access view over an input stream.
///
/// Indices are absolute stream offsets and stay valid across reads; only
/// [`State::forget_to`] invalidates them, and only below the new floor.
/// End of input is the sentinel byte `0`; real NUL bytes in the input are
/// not distinguished from it.
pub struct State<'a> {
    /// Current read head. Matchers advance it on success and leave it
    /// untouched on failure.
    pub pos: usize,
    input: &'a mut dyn Read,
    buf: VecDeque<u8>,
    off: usize,
    newlines_off: usize,
    eof: bool,
}

impl<'a> State<'a> {
    /// Creates a state reading from `input`. The stream is borrowed, not owned.
    pub fn new(input: &'a mut dyn Read) -> Self {
        Self {
            pos: 0,
            input,
            buf: VecDeque::new(),
            off: 0,
            newlines_off: 0,
            eof: false,
        }
    }

    /// Byte at stream index `i`, reading more input as needed. Returns `0`
    /// at and past end of input without extending the buffer.
    ///
    /// Panics if `i` is below the retention floor; parsers never discard,
    /// so they cannot trip this. Use [`State::try_at`] when scanning
    /// backward over possibly-forgotten input.
    pub fn at(&mut self, i: usize) -> u8 {
        self.try_at(i).expect("read below the retention floor")
    }

    /// Fallible form of [`State::at`].
    pub fn try_at(&mut self, i: usize) -> Result<u8, ForgottenRange> {
        if i < self.off {
            return Err(self.forgotten(i));
        }
        self.fill_to(i);
        Ok(self.buf.get(i - self.off).copied().unwrap_or(0))
    }

    /// Iterator over up to `n` bytes starting at `i`, clamped to available
    /// input. Valid only until the next mutating call.
    pub fn range(
        &mut self,
        i: usize,
        n: usize,
    ) -> Result<impl Iterator<Item = u8> + '_, ForgottenRange> {
        if i < self.off {
            return Err(self.forgotten(i));
        }
        if n > 0 {
            self.fill_to(i + n - 1);
        }
        let start = (i - self.off).min(self.buf.len());
        let end = (start + n).min(self.buf.len());
        Ok(self.buf.range(start..end).copied())
    }

    /// Materialized form of [`State::range`]. Lossy on invalid UTF-8.
    ///
    /// Panics below the retention floor, like [`State::at`].
    pub fn string(&mut self, i: usize, n: usize) -> String {
        let bytes: Vec<u8> = self
            .range(i, n)
            .expect("read below the retention floor")
            .collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Discards everything before stream index `i`, counting discarded
    /// newlines. Idempotent for `i` at or below the current floor; never
    /// discards past what has been read.
    pub fn forget_to(&mut self, i: usize) {
        if i <= self.off {
            return;
        }
        let cut = (i - self.off).min(self.buf.len());
        self.newlines_off += self.buf.range(..cut).filter(|&&c| c == b'\n').count();
        self.buf.drain(..cut);
        self.off += cut;
    }

    /// One past the furthest stream index read so far.
    pub fn max_read(&self) -> usize {
        self.off + self.buf.len()
    }

    /// Newlines contained in the discarded prefix.
    pub fn newlines_discarded(&self) -> usize {
        self.newlines_off
    }

    fn forgotten(&self, requested: usize) -> ForgottenRange {
        ForgottenRange {
            requested,
            available: self.off,
            newlines_discarded: self.newlines_off,
        }
    }

    /// Reads exactly up to index `i`, never further: `max_read` doubles as
    /// the failure position in reports, so the buffer must not overshoot
    /// what was actually asked for. Callers wanting throughput hand in a
    /// buffered reader.
    fn fill_to(&mut self, i: usize) {
        let mut chunk = [0u8; CHUNK];
        while !self.eof && i >= self.off + self.buf.len() {
            let need = (i + 1 - (self.off + self.buf.len())).min(CHUNK);
            match self.input.read(&mut chunk[..need]) {
                Ok(0) => self.eof = true,
                Ok(n) => self.buf.extend(&chunk[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                // A broken stream ends the input; the parser reports a
                // failure at this position rather than aborting mid-run.
                Err(_) => self.eof = true,
            }
        }
    }
}

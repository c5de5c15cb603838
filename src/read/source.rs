//! Byte sources feeding the tokenizer.
//!
//! The tokenizer is written against [`ByteSource`] so the streaming reader
//! and the memory-mapped reader share one state machine: a source exposes
//! the unread bytes it currently has without copying, and the tokenizer
//! consumes what it has accepted.

use std::io::{self, Read};

/// Default refill buffer size for streaming sources
pub(crate) const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Chunked byte input consumed by the tokenizer.
pub(crate) trait ByteSource {
    /// Current unread bytes, refilling from the underlying input if the
    /// previous chunk was fully consumed. An empty slice means end of
    /// input.
    fn chunk(&mut self) -> io::Result<&[u8]>;

    /// Advance past `n` bytes of the current chunk.
    fn consume(&mut self, n: usize);
}

/// Buffered source over any [`Read`] implementation.
pub(crate) struct StreamSource<R> {
    reader: R,
    buffer: Vec<u8>,
    pos: usize,
    len: usize,
}

impl<R: Read> StreamSource<R> {
    pub(crate) fn new(reader: R) -> Self {
        StreamSource {
            reader,
            buffer: vec![0; DEFAULT_BUFFER_SIZE],
            pos: 0,
            len: 0,
        }
    }
}

impl<R: Read> ByteSource for StreamSource<R> {
    fn chunk(&mut self) -> io::Result<&[u8]> {
        if self.pos >= self.len {
            self.len = self.reader.read(&mut self.buffer)?;
            self.pos = 0;
        }
        Ok(&self.buffer[self.pos..self.len])
    }

    fn consume(&mut self, n: usize) {
        self.pos += n;
    }
}

/// Borrowed source over an in-memory byte range, used by the memory-mapped
/// reader. The cursor lives outside the slice so the owner can persist it
/// across calls.
pub(crate) struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub(crate) fn at(data: &'a [u8], pos: usize) -> Self {
        SliceSource { data, pos }
    }

    /// Cursor position within the underlying slice.
    pub(crate) fn position(&self) -> usize {
        self.pos
    }
}

impl ByteSource for SliceSource<'_> {
    fn chunk(&mut self) -> io::Result<&[u8]> {
        Ok(&self.data[self.pos.min(self.data.len())..])
    }

    fn consume(&mut self, n: usize) {
        self.pos += n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_source_refills() {
        let data = b"abc".repeat(4000);
        let mut source = StreamSource::new(&data[..]);
        let mut collected = Vec::new();
        loop {
            let chunk = source.chunk().unwrap();
            if chunk.is_empty() {
                break;
            }
            collected.extend_from_slice(chunk);
            let n = chunk.len();
            source.consume(n);
        }
        assert_eq!(collected, data);
    }

    #[test]
    fn test_slice_source_cursor() {
        let data = b"hello";
        let mut source = SliceSource::at(data, 2);
        assert_eq!(source.chunk().unwrap(), b"llo");
        source.consume(3);
        assert_eq!(source.position(), 5);
        assert!(source.chunk().unwrap().is_empty());
    }
}

//! Pattern buffer with tail-search optimization.
//!
//! Only the last N bytes of the buffer are searched for prompt patterns,
//! so a long `show running-config` does not turn every read into a full
//! rescan of everything received so far.

use std::fmt;
use std::ops::Range;

use bytes::BytesMut;
use memchr::memmem;
use regex::bytes::Regex;
use vte::{Parser, Perform};

/// Buffer for accumulating output and efficiently searching for patterns.
///
/// Incoming bytes are fed through a VT parser so colour codes, cursor
/// movement and backspaces never reach the buffer. The parser keeps its
/// state between calls, so an escape sequence split across two reads is
/// still removed.
pub struct PatternBuffer {
    /// The accumulated, escape-free output.
    buffer: BytesMut,

    /// VT parser state carried across reads.
    parser: Parser,

    /// How many bytes from the end to search for patterns.
    search_depth: usize,
}

/// Collects printable text and line control characters.
struct Printable<'a>(&'a mut BytesMut);

impl Perform for Printable<'_> {
    fn print(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.0.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
    }

    fn execute(&mut self, byte: u8) {
        if matches!(byte, b'\n' | b'\r' | b'\t') {
            self.0.extend_from_slice(&[byte]);
        }
    }
}

impl PatternBuffer {
    /// Create a new pattern buffer with the specified search depth.
    pub fn new(search_depth: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
            parser: Parser::new(),
            search_depth,
        }
    }

    /// Extend the buffer with new data, stripping ANSI escape codes.
    pub fn extend(&mut self, data: &[u8]) {
        self.parser.advance(&mut Printable(&mut self.buffer), data);
    }

    fn tail_start(&self) -> usize {
        self.buffer.len().saturating_sub(self.search_depth)
    }

    /// Find `pattern` in the last `search_depth` bytes.
    ///
    /// The returned range is an offset into the whole buffer.
    pub fn find_tail(&self, pattern: &Regex) -> Option<Range<usize>> {
        let offset = self.tail_start();
        pattern
            .find(&self.buffer[offset..])
            .map(|m| offset + m.start()..offset + m.end())
    }

    /// Check if the tail contains a pattern match.
    pub fn tail_contains(&self, pattern: &Regex) -> bool {
        self.find_tail(pattern).is_some()
    }

    /// Offset of the first occurrence of `needle` anywhere in the buffer.
    pub fn find_literal(&self, needle: &[u8]) -> Option<usize> {
        memmem::find(&self.buffer, needle)
    }

    /// Remove the first match of `pattern` in the tail from the buffer.
    ///
    /// Returns whether anything was removed.
    pub fn erase_tail_match(&mut self, pattern: &Regex) -> bool {
        let Some(found) = self.find_tail(pattern) else {
            return false;
        };

        let rest = self.buffer.split_off(found.end);
        self.buffer.truncate(found.start);
        self.buffer.unsplit(rest);
        true
    }

    /// Drop the first `len` bytes.
    pub fn discard_front(&mut self, len: usize) {
        let _ = self.buffer.split_to(len.min(self.buffer.len()));
    }

    /// Take ownership of the buffer contents and reset.
    pub fn take(&mut self) -> Vec<u8> {
        self.buffer.split().to_vec()
    }

    /// Get a reference to the buffer contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Get the current buffer length.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for PatternBuffer {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl fmt::Debug for PatternBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternBuffer")
            .field("len", &self.buffer.len())
            .field("search_depth", &self.search_depth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_extend() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"Hello, world!");
        assert_eq!(buffer.as_slice(), b"Hello, world!");
    }

    #[test]
    fn test_ansi_stripping() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"\x1b[32mGreen text\x1b[0m\r\n");
        assert_eq!(buffer.as_slice(), b"Green text\r\n");
    }

    #[test]
    fn test_escape_split_across_reads() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"ap505\x1b[");
        buffer.extend(b"1;32m# ");
        assert_eq!(buffer.as_slice(), b"ap505# ");
    }

    #[test]
    fn test_backspace_and_nul_dropped() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"a\x08\x00b\tc");
        assert_eq!(buffer.as_slice(), b"ab\tc");
    }

    #[test]
    fn test_tail_search() {
        let mut buffer = PatternBuffer::new(20);
        buffer.extend(&[b'x'; 100]);
        buffer.extend(b"\nap505#");

        let pattern = Regex::new(r"ap505#").unwrap();
        assert_eq!(buffer.find_tail(&pattern), Some(101..107));
    }

    #[test]
    fn test_tail_search_not_in_tail() {
        let mut buffer = PatternBuffer::new(10);
        buffer.extend(b"ap505#");
        buffer.extend(&[b'x'; 100]);

        let pattern = Regex::new(r"ap505#").unwrap();
        assert!(buffer.find_tail(&pattern).is_none());
        assert_eq!(buffer.find_literal(b"ap505#"), Some(0));
    }

    #[test]
    fn test_erase_tail_match() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"line one\r\n--More--line two");

        let pager = Regex::new(r"--More--").unwrap();
        assert!(buffer.erase_tail_match(&pager));
        assert_eq!(buffer.as_slice(), b"line one\r\nline two");
        assert!(!buffer.erase_tail_match(&pager));
    }

    #[test]
    fn test_discard_front() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"\r\nap505# show clock\r\n");

        let echo = buffer.find_literal(b"show clock").unwrap();
        buffer.discard_front(echo);
        assert_eq!(buffer.as_slice(), b"show clock\r\n");

        buffer.discard_front(1000);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_take_clears_buffer() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"test data");
        assert_eq!(buffer.take(), b"test data");
        assert!(buffer.is_empty());
    }
}

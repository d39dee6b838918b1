//! Segmented input view.
//!
//! A network pipeline hands the parser its read buffer as an ordered run of
//! contiguous segments. [`SegmentedBuf`] is that view and [`Cursor`] a
//! position inside it. The parser never owns or mutates these bytes; it only
//! reports back how far the pipeline may release ([`Cursor`] pairs in
//! [`Progress`]).
//!
//! [`Progress`]: crate::parser::Progress
use bytes::{Bytes, BytesMut};
use std::cmp;

use crate::simd;

/// An immutable view over an ordered sequence of contiguous byte segments.
///
/// Empty segments are dropped on construction, so every [`Cursor`] has one
/// canonical form and cursor comparison is a plain lexicographic order.
#[derive(Debug, Default, Clone)]
pub struct SegmentedBuf {
    segments: Vec<Bytes>,
    len: usize,
}

/// Position within a [`SegmentedBuf`].
///
/// Cheap to copy, totally ordered within the buffer it was produced from.
/// A cursor never rests on an interior segment boundary; the position just
/// past a segment's last byte is the start of the next segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cursor {
    seg: usize,
    off: usize,
}

impl SegmentedBuf {
    /// Create an empty view.
    pub const fn new() -> Self {
        Self { segments: Vec::new(), len: 0 }
    }

    /// Append a segment to the view, skipping empty ones.
    pub fn push(&mut self, segment: impl Into<Bytes>) {
        let segment = segment.into();
        if !segment.is_empty() {
            self.len += segment.len();
            self.segments.push(segment);
        }
    }

    /// Total byte length across all segments.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the view contains no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if all bytes lie in at most one segment.
    #[inline]
    pub fn is_single_segment(&self) -> bool {
        self.segments.len() <= 1
    }

    /// The first segment, empty when the view is empty.
    pub fn first_segment(&self) -> &[u8] {
        self.segments.first().map(|s| s.as_ref()).unwrap_or(&[])
    }

    /// Cursor at the first byte.
    pub fn start(&self) -> Cursor {
        if self.segments.is_empty() {
            self.end()
        } else {
            Cursor { seg: 0, off: 0 }
        }
    }

    /// Cursor one past the last byte.
    pub fn end(&self) -> Cursor {
        Cursor { seg: self.segments.len(), off: 0 }
    }

    /// The remainder of `at`'s segment, empty when `at` is [`end`].
    ///
    /// [`end`]: Self::end
    #[inline]
    pub fn chunk(&self, at: Cursor) -> &[u8] {
        match self.segments.get(at.seg) {
            Some(segment) => &segment[at.off..],
            None => &[],
        }
    }

    /// The byte at `at`, `None` at the end of the view.
    #[inline]
    pub fn get(&self, at: Cursor) -> Option<u8> {
        self.chunk(at).first().copied()
    }

    /// The byte at `at` together with the following cursor.
    #[inline]
    pub fn next(&self, at: Cursor) -> Option<(u8, Cursor)> {
        let byte = self.get(at)?;
        Some((byte, self.advance(at, 1)))
    }

    /// Advance `at` by `n` bytes, crossing segment boundaries.
    ///
    /// # Panics
    ///
    /// Panics when `n` reaches past the end of the view.
    pub fn advance(&self, mut at: Cursor, mut n: usize) -> Cursor {
        while n > 0 {
            let segment = &self.segments[at.seg];
            let take = cmp::min(n, segment.len() - at.off);
            at.off += take;
            n -= take;
            if at.off == segment.len() {
                at = Cursor { seg: at.seg + 1, off: 0 };
            }
        }
        at
    }

    /// Byte distance of `at` from the start of the view.
    pub fn offset(&self, at: Cursor) -> usize {
        self.segments[..at.seg].iter().map(|s| s.len()).sum::<usize>() + at.off
    }

    /// Scan forward from `from` for the first occurrence of `byte`,
    /// returning its cursor and the distance travelled from `from`.
    pub fn seek(&self, from: Cursor, byte: u8) -> Option<(Cursor, usize)> {
        let mut at = from;
        let mut travelled = 0;

        while at.seg < self.segments.len() {
            let chunk = self.chunk(at);
            match simd::index_of(chunk, byte) {
                Some(nth) => {
                    return Some((Cursor { seg: at.seg, off: at.off + nth }, travelled + nth));
                }
                None => {
                    travelled += chunk.len();
                    at = Cursor { seg: at.seg + 1, off: 0 };
                }
            }
        }

        None
    }

    /// Borrow `len` bytes at `at` when they lie within one segment.
    pub fn contiguous(&self, at: Cursor, len: usize) -> Option<&[u8]> {
        let chunk = self.chunk(at);
        if chunk.len() >= len {
            Some(&chunk[..len])
        } else {
            None
        }
    }

    /// Copy `len` bytes starting at `at` into `out`, crossing segment
    /// boundaries.
    ///
    /// # Panics
    ///
    /// Panics when `len` reaches past the end of the view.
    pub fn copy_range(&self, mut at: Cursor, mut len: usize, out: &mut BytesMut) {
        out.reserve(len);
        while len > 0 {
            let chunk = self.chunk(at);
            let take = cmp::min(len, chunk.len());
            assert!(take > 0, "copy_range past the end of the buffer");
            out.extend_from_slice(&chunk[..take]);
            at = self.advance(at, take);
            len -= take;
        }
    }

    /// A sub-view of `[start, end)`. Segment contents are shared, not
    /// copied.
    pub fn slice(&self, start: Cursor, end: Cursor) -> SegmentedBuf {
        debug_assert!(start <= end);
        let mut out = SegmentedBuf::new();
        let mut at = start;

        while at < end {
            let segment = &self.segments[at.seg];
            let stop = if end.seg == at.seg { end.off } else { segment.len() };
            out.push(segment.slice(at.off..stop));
            at = Cursor { seg: at.seg + 1, off: 0 };
        }

        out
    }
}

impl From<Bytes> for SegmentedBuf {
    fn from(segment: Bytes) -> Self {
        let mut buf = Self::new();
        buf.push(segment);
        buf
    }
}

impl From<&'static [u8]> for SegmentedBuf {
    fn from(segment: &'static [u8]) -> Self {
        Self::from(Bytes::from_static(segment))
    }
}

impl From<Vec<Bytes>> for SegmentedBuf {
    fn from(segments: Vec<Bytes>) -> Self {
        segments.into_iter().collect()
    }
}

impl FromIterator<Bytes> for SegmentedBuf {
    fn from_iter<I: IntoIterator<Item = Bytes>>(iter: I) -> Self {
        let mut buf = Self::new();
        for segment in iter {
            buf.push(segment);
        }
        buf
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn buf(segments: &[&'static [u8]]) -> SegmentedBuf {
        segments.iter().copied().map(Bytes::from_static).collect()
    }

    #[test]
    fn test_advance() {
        let b = buf(&[b"abc", b"de", b"f"]);
        assert_eq!(b.len(), 6);
        assert!(!b.is_single_segment());

        let mut at = b.start();
        for expected in *b"abcdef" {
            assert_eq!(b.get(at), Some(expected));
            at = b.advance(at, 1);
        }
        assert_eq!(at, b.end());
        assert_eq!(b.get(at), None);

        // boundary crossing in one step, and cursor order
        let mid = b.advance(b.start(), 4);
        assert_eq!(b.get(mid), Some(b'e'));
        assert!(b.start() < mid && mid < b.end());
        assert_eq!(b.offset(mid), 4);
    }

    #[test]
    fn test_empty_segments_are_dropped() {
        let b = buf(&[b"", b"ab", b"", b"c"]);
        assert_eq!(b.len(), 3);
        assert_eq!(b.first_segment(), b"ab");
        assert_eq!(b.advance(b.start(), 3), b.end());

        let empty = buf(&[]);
        assert_eq!(empty.start(), empty.end());
        assert!(empty.is_single_segment());
        assert_eq!(empty.first_segment(), b"");
    }

    #[test]
    fn test_seek() {
        let b = buf(&[b"Host", b": x", b"\r\n"]);
        let (at, travelled) = b.seek(b.start(), b'\n').unwrap();
        assert_eq!(travelled, 8);
        assert_eq!(b.get(at), Some(b'\n'));
        assert_eq!(b.advance(b.start(), travelled), at);

        let from = b.advance(b.start(), 5);
        let (_, travelled) = b.seek(from, b'\n').unwrap();
        assert_eq!(travelled, 3);

        assert!(b.seek(b.start(), b'?').is_none());
    }

    #[test]
    fn test_contiguous_and_copy() {
        let b = buf(&[b"abc", b"def"]);
        assert_eq!(b.contiguous(b.start(), 3), Some(&b"abc"[..]));
        assert_eq!(b.contiguous(b.start(), 4), None);

        let mut out = BytesMut::new();
        b.copy_range(b.start(), 5, &mut out);
        assert_eq!(&out[..], b"abcde");
    }

    #[test]
    fn test_slice() {
        let b = buf(&[b"abc", b"def", b"ghi"]);
        let start = b.advance(b.start(), 2);
        let end = b.advance(b.start(), 7);

        let sub = b.slice(start, end);
        assert_eq!(sub.len(), 5);
        let mut collected = BytesMut::new();
        sub.copy_range(sub.start(), sub.len(), &mut collected);
        assert_eq!(&collected[..], b"cdefg");

        // shared storage, not copied
        assert_eq!(sub.first_segment().as_ptr(), b.chunk(start).as_ptr());

        let empty = b.slice(start, start);
        assert!(empty.is_empty());
    }
}

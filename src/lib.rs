//! Incremental, zero-copy HTTP/1.x message head parsing.
//!
//! [`HttpParser`] recognises the request line and header block of an HTTP
//! request out of a [`SegmentedBuf`], a view over the possibly
//! non-contiguous read buffer of a network pipeline. Recognised tokens are
//! emitted to a caller supplied [`RequestHandler`] as borrowed byte slices;
//! nothing is copied out of the input except a line that happens to
//! straddle a segment boundary, which is materialised into a reused scratch
//! region first.
//!
//! The parser is strict per [RFC 7230]: single-space separators, CRLF line
//! terminators, no obsolete line folding. Malformed input fails with a
//! [`Rejection`]; an incomplete head returns [`Parsed::Pending`] and is
//! retried by the caller once more bytes arrive.
//!
//! # Example
//!
//! ```rust
//! use hari::{HttpParser, Reqline, RequestHandler, SegmentedBuf};
//!
//! struct Sink {
//!     headers: Vec<(Vec<u8>, Vec<u8>)>,
//! }
//!
//! impl RequestHandler for Sink {
//!     fn on_request_line(&mut self, line: Reqline<'_>) {
//!         assert_eq!(line.path, b"/plaintext");
//!     }
//!     fn on_header(&mut self, name: &[u8], value: &[u8]) {
//!         self.headers.push((name.to_vec(), value.to_vec()));
//!     }
//! }
//!
//! let buf = SegmentedBuf::from(&b"GET /plaintext HTTP/1.1\r\nHost: x\r\n\r\n"[..]);
//! let mut parser = HttpParser::new();
//! let mut sink = Sink { headers: Vec::new() };
//!
//! let line = parser.parse_request_line(&mut sink, &buf)?.progress();
//! let rest = buf.slice(line.consumed, buf.end());
//! assert!(parser.parse_headers(&mut sink, &rest)?.is_complete());
//! assert_eq!(sink.headers, [(b"Host".to_vec(), b"x".to_vec())]);
//! # Ok::<_, hari::Rejection>(())
//! ```
//!
//! [RFC 7230]: <https://httpwg.org/specs/rfc7230.html>
#![warn(missing_debug_implementations)]

mod matches;
mod simd;

pub mod buffer;
pub mod http;
pub mod parser;

// ===== Reexports =====

pub use buffer::{Cursor, SegmentedBuf};
pub use http::{Method, Version};
pub use parser::{HttpParser, Parsed, Progress, Reason, Rejection, Reqline, RequestHandler};

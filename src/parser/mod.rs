//! HTTP/1.x message head parsing.
//!
//! [`HttpParser`] recognises a request line and a header block out of a
//! [`SegmentedBuf`], emitting each token to a caller supplied
//! [`RequestHandler`] without copying bytes out of the input.
//!
//! # Driving the parser
//!
//! The frame driver calls [`parse_request_line`] until it returns
//! [`Parsed::Complete`], then [`parse_headers`] the same way, re-invoking
//! after the next buffer fill whenever a call returns [`Parsed::Pending`].
//! Every call reports a [`Progress`]: `consumed` is what the pipeline may
//! release, `examined` how far the parser looked before giving up. The
//! parser itself keeps no position between calls; on a retry the caller
//! passes a view starting at the last `consumed`.
//!
//! Malformed input fails with a [`Rejection`] instead; rejection is fatal
//! for the connection.
//!
//! [`parse_request_line`]: HttpParser::parse_request_line
//! [`parse_headers`]: HttpParser::parse_headers
mod request;
mod header;
mod error;


use bytes::BytesMut;

use crate::{
    buffer::{Cursor, SegmentedBuf},
    http::{Method, Version},
};

pub use error::{Reason, Rejection};

// ===== Handler =====

/// Receives tokens as the parser recognises them.
///
/// Token slices borrow from the input buffer, or from a transient scratch
/// region when a line straddles segments; either way they are only valid
/// for the duration of the call. Within one request, [`on_request_line`]
/// fires exactly once and before any [`on_header`]; headers arrive in wire
/// order.
///
/// [`on_request_line`]: RequestHandler::on_request_line
/// [`on_header`]: RequestHandler::on_header
pub trait RequestHandler {
    /// A complete request line was recognised.
    fn on_request_line(&mut self, line: Reqline<'_>);

    /// A complete header field was recognised.
    fn on_header(&mut self, name: &[u8], value: &[u8]);
}

/// A recognised request line.
#[derive(Debug, Clone, Copy)]
pub struct Reqline<'a> {
    pub method: Method,
    pub version: Version,
    /// Bytes between the two separating spaces, `path` extended through
    /// `query`.
    pub target: &'a [u8],
    /// Target up to the first `?`.
    pub path: &'a [u8],
    /// From the `?` through the end of the target; empty, anchored at the
    /// end of the path, when no query is present.
    pub query: &'a [u8],
    /// Raw method token when `method` is [`Method::CUSTOM`], empty
    /// otherwise.
    pub custom_method: &'a [u8],
}

// ===== Outcome =====

/// Cursor bookkeeping returned from every parser call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Position up to which the pipeline may release bytes.
    pub consumed: Cursor,
    /// How far the parser looked. When this reaches the buffer end the
    /// parser must not be re-invoked until more bytes arrive.
    pub examined: Cursor,
    /// Byte distance `consumed` advanced from the start of the view.
    pub consumed_bytes: usize,
}

/// Outcome of a parser call that did not reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parsed {
    /// The element was fully recognised and emitted.
    Complete(Progress),
    /// A valid but incomplete prefix was seen; call again once more bytes
    /// arrive.
    Pending(Progress),
}

impl Parsed {
    /// Returns `true` if the element was fully recognised.
    #[inline]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(..))
    }

    /// Returns `true` if more bytes are required.
    #[inline]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(..))
    }

    /// Cursor bookkeeping of either outcome.
    #[inline]
    pub const fn progress(&self) -> Progress {
        match self {
            Self::Complete(progress) | Self::Pending(progress) => *progress,
        }
    }
}

// ===== Parser =====

/// Incremental HTTP/1.x message head parser.
///
/// One value serves one connection. It owns only the scratch region used to
/// materialise lines that straddle segments, grown to the worst observed
/// line and reused across calls, plus the error-detail flag captured at
/// construction. All parsing progress lives in the returned cursors, so the
/// same value carries across requests and teardown is constant time.
///
/// The parser is synchronous and never suspends; it is confined to one
/// thread at a time by the caller.
#[derive(Debug)]
pub struct HttpParser {
    scratch: BytesMut,
    show_detail: bool,
}

impl HttpParser {
    /// Create a parser, capturing rejection detail only when informational
    /// logging is enabled.
    pub fn new() -> HttpParser {
        #[cfg(feature = "log")]
        let show_detail = ::log::log_enabled!(::log::Level::Info);
        #[cfg(not(feature = "log"))]
        let show_detail = false;

        HttpParser::with_error_details(show_detail)
    }

    /// Create a parser with rejection detail capture set explicitly.
    pub fn with_error_details(show_detail: bool) -> HttpParser {
        HttpParser {
            scratch: BytesMut::new(),
            show_detail,
        }
    }

    /// Recognise the request line at the start of `buf` and emit it to
    /// `handler`.
    ///
    /// On [`Parsed::Complete`], `consumed == examined ==` the position just
    /// past the request line's LF. On [`Parsed::Pending`], `consumed` is the
    /// start of the view and `examined` its end.
    pub fn parse_request_line<H>(
        &mut self,
        handler: &mut H,
        buf: &SegmentedBuf,
    ) -> Result<Parsed, Rejection>
    where
        H: RequestHandler,
    {
        request::parse_request_line(self, handler, buf)
    }

    /// Recognise header fields from the start of `buf`, emitting each to
    /// `handler`, until the empty line ends the block.
    ///
    /// On [`Parsed::Complete`], `consumed == examined ==` the position just
    /// past the final empty line's LF. On [`Parsed::Pending`], `consumed`
    /// is the start of the first line not yet fully seen (fields before it
    /// were emitted and are never re-emitted) and `examined` is the end of
    /// the view.
    pub fn parse_headers<H>(
        &mut self,
        handler: &mut H,
        buf: &SegmentedBuf,
    ) -> Result<Parsed, Rejection>
    where
        H: RequestHandler,
    {
        header::parse_headers(self, handler, buf)
    }

    /// Prepare for the next request on the connection.
    ///
    /// Progress lives entirely in the returned cursors, so there is nothing
    /// to clear; provided for the per-request lifecycle.
    #[inline]
    pub fn reset(&mut self) {}
}

impl Default for HttpParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Contiguous view of `len` bytes at `start`: a borrow of the segment when
/// the range does not straddle, otherwise a copy into `scratch`.
fn line_view<'a>(
    buf: &'a SegmentedBuf,
    start: Cursor,
    len: usize,
    scratch: &'a mut BytesMut,
) -> &'a [u8] {
    match buf.contiguous(start, len) {
        Some(line) => line,
        None => {
            #[cfg(feature = "log")]
            ::log::trace!("line straddles segments, materialising {len} bytes");
            scratch.clear();
            buf.copy_range(start, len, scratch);
            &scratch[..]
        }
    }
}

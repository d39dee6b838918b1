use super::{
    error::{self, Reason},
    line_view, HttpParser, Parsed, Progress, Rejection, Reqline, RequestHandler,
};
use crate::{
    buffer::SegmentedBuf,
    http::{Method, Version},
    matches, simd,
};

macro_rules! err {
    ($variant:ident, $bytes:expr, $show:expr) => {
        Err(error::reject(Reason::$variant, $bytes, $show))
    };
}

pub(super) fn parse_request_line<H: RequestHandler>(
    parser: &mut HttpParser,
    handler: &mut H,
    buf: &SegmentedBuf,
) -> Result<Parsed, Rejection> {
    let show = parser.show_detail;
    let start = buf.start();

    // establish a contiguous view of the request line
    let first = buf.first_segment();
    let (line, line_len) = match simd::index_of(first, b'\n') {
        Some(lf) => (&first[..=lf], lf + 1),
        None if buf.is_single_segment() => return Ok(pending(buf)),
        None => match buf.seek(buf.advance(start, first.len()), b'\n') {
            Some((_, travelled)) => {
                let len = first.len() + travelled + 1;
                (line_view(buf, start, len, &mut parser.scratch), len)
            }
            None => return Ok(pending(buf)),
        },
    };

    take_start_line(line, handler, show)?;

    let consumed = buf.advance(start, line_len);
    Ok(Parsed::Complete(Progress {
        consumed,
        examined: consumed,
        consumed_bytes: line_len,
    }))
}

fn pending(buf: &SegmentedBuf) -> Parsed {
    Parsed::Pending(Progress {
        consumed: buf.start(),
        examined: buf.end(),
        consumed_bytes: 0,
    })
}

/// Recognise one full request line, terminated by the LF at the end of
/// `line`, and emit it.
fn take_start_line<H: RequestHandler>(
    line: &[u8],
    handler: &mut H,
    show: bool,
) -> Result<(), Rejection> {
    debug_assert!(matches!(line.last(), Some(&b'\n')));
    let mut i;

    // ===== Method =====

    let (method, custom_method) = match Method::from_prefix(line) {
        Some((method, len)) => {
            i = len + 1;
            (method, &line[..0])
        }
        None => {
            i = 0;
            loop {
                match line.get(i).copied() {
                    Some(b' ') if i != 0 => break,
                    Some(b) if matches::is_token(b) => i += 1,
                    _ => return err!(InvalidRequestLine, line, show),
                }
            }
            let custom = &line[..i];
            i += 1;
            (Method::CUSTOM, custom)
        }
    };

    // ===== Target =====

    let mut path_start = None;
    let (path_start, path_end, query_start, query_end) = loop {
        match line.get(i).copied() {
            Some(b' ') => {
                let Some(path_start) = path_start else {
                    return err!(InvalidRequestLine, line, show);
                };
                let sep = i;
                i += 1;
                break (path_start, sep, sep, sep);
            }
            Some(b'?') => {
                let Some(path_start) = path_start else {
                    return err!(InvalidRequestLine, line, show);
                };
                let path_end = i;
                let query_start = i;
                // the query is not inspected beyond its terminating space
                loop {
                    i += 1;
                    match line.get(i).copied() {
                        Some(b' ') => break,
                        Some(_) => {}
                        None => return err!(InvalidRequestLine, line, show),
                    }
                }
                let query_end = i;
                i += 1;
                break (path_start, path_end, query_start, query_end);
            }
            // a target may not begin with an escape
            Some(b'%') if path_start.is_none() => {
                return err!(InvalidRequestLine, line, show);
            }
            Some(_) => {
                if path_start.is_none() {
                    path_start = Some(i);
                }
                i += 1;
            }
            None => return err!(InvalidRequestLine, line, show),
        }
    };

    // ===== Version =====

    let version = match Version::from_prefix(&line[i..]) {
        Some((version, len)) => {
            i += len + 1;
            version
        }
        None => {
            let version_start = i;
            loop {
                match line.get(i).copied() {
                    Some(b'\r') => break,
                    Some(_) => i += 1,
                    None => return err!(InvalidRequestLine, line, show),
                }
            }
            if i == version_start {
                return err!(InvalidRequestLine, line, show);
            }
            return err!(UnrecognizedHttpVersion, &line[version_start..i], show);
        }
    };

    // ===== LF =====

    match line.get(i).copied() {
        Some(b'\n') => i += 1,
        _ => return err!(InvalidRequestLine, line, show),
    }
    debug_assert_eq!(i, line.len());

    handler.on_request_line(Reqline {
        method,
        version,
        target: &line[path_start..query_end],
        path: &line[path_start..path_end],
        query: &line[query_start..query_end],
        custom_method,
    });

    Ok(())
}

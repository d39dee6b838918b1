use super::{
    error::{self, Reason},
    line_view, HttpParser, Parsed, Progress, Rejection, RequestHandler,
};
use crate::{
    buffer::{Cursor, SegmentedBuf},
    simd,
};

macro_rules! err {
    ($variant:ident, $bytes:expr, $show:expr) => {
        Err(error::reject(Reason::$variant, $bytes, $show))
    };
}

pub(super) fn parse_headers<H: RequestHandler>(
    parser: &mut HttpParser,
    handler: &mut H,
    buf: &SegmentedBuf,
) -> Result<Parsed, Rejection> {
    let show = parser.show_detail;
    let scratch = &mut parser.scratch;

    let mut consumed = buf.start();
    let mut consumed_bytes = 0;

    loop {
        // look at up to two bytes before committing to a line: the block
        // terminator is exactly CRLF, and a CR that is last in the buffer
        // stays unconsumed until its LF arrives
        match buf.next(consumed) {
            None => return Ok(pending(consumed, consumed_bytes, buf)),
            Some((b'\r', after_cr)) => match buf.get(after_cr) {
                None => return Ok(pending(consumed, consumed_bytes, buf)),
                Some(b'\n') => {
                    let consumed = buf.advance(consumed, 2);
                    return Ok(Parsed::Complete(Progress {
                        consumed,
                        examined: consumed,
                        consumed_bytes: consumed_bytes + 2,
                    }));
                }
                Some(_) => {
                    return err!(
                        HeadersCorruptedInvalidHeaderSequence,
                        buf.chunk(consumed),
                        show
                    );
                }
            },
            Some((b' ' | b'\t', _)) => {
                return err!(WhitespaceIsNotAllowedInHeaderName, buf.chunk(consumed), show);
            }
            Some(_) => {}
        }

        // locate the line terminator: in-segment fast path first, then
        // across the remaining segments
        let chunk = buf.chunk(consumed);
        let (line, line_len) = match simd::index_of(chunk, b'\n') {
            Some(lf) => (&chunk[..=lf], lf + 1),
            None if buf.is_single_segment() => {
                return Ok(pending(consumed, consumed_bytes, buf));
            }
            None => match buf.seek(buf.advance(consumed, chunk.len()), b'\n') {
                Some((_, travelled)) => {
                    let len = chunk.len() + travelled + 1;
                    (line_view(buf, consumed, len, &mut *scratch), len)
                }
                None => return Ok(pending(consumed, consumed_bytes, buf)),
            },
        };

        take_single_header(line, handler, show)?;

        consumed = buf.advance(consumed, line_len);
        consumed_bytes += line_len;
    }
}

fn pending(consumed: Cursor, consumed_bytes: usize, buf: &SegmentedBuf) -> Parsed {
    Parsed::Pending(Progress {
        consumed,
        examined: buf.end(),
        consumed_bytes,
    })
}

/// Parse one header field line, terminated by the LF at the end of `line`,
/// and emit it.
fn take_single_header<H: RequestHandler>(
    line: &[u8],
    handler: &mut H,
    show: bool,
) -> Result<(), Rejection> {
    let n = line.len();
    debug_assert!(matches!(line.last(), Some(&b'\n')));

    // ===== field-name =====

    let mut whitespace = false;
    let mut name_end = None;
    for (i, &b) in line.iter().enumerate() {
        match b {
            b':' => {
                name_end = Some(i);
                break;
            }
            b' ' | b'\t' | b'\r' => whitespace = true,
            _ => {}
        }
    }
    let Some(name_end) = name_end else {
        return err!(NoColonCharacterFoundInHeaderLine, line, show);
    };
    if whitespace {
        return err!(WhitespaceIsNotAllowedInHeaderName, line, show);
    }

    // the colon guarantees n >= 2
    if line[n - 2] != b'\r' {
        return err!(MissingCrInHeaderLine, line, show);
    }

    // ===== field-value =====

    // `value_last` is the last byte before the CRLF; the CR check passed
    // with the colon before it, so n >= 3
    let value_last = n - 3;
    let mut value_start = name_end + 1;

    // leading OWS; a CR short of the terminator belongs to no value
    while value_start <= value_last {
        match line[value_start] {
            b' ' | b'\t' => value_start += 1,
            b'\r' => return err!(HeaderValueMustNotContainCr, line, show),
            _ => break,
        }
    }

    if simd::contains(&line[value_start..value_last + 1], b'\r') {
        return err!(HeaderValueMustNotContainCr, line, show);
    }

    // trailing OWS
    let mut value_end = value_last;
    while value_end >= value_start && matches!(line[value_end], b' ' | b'\t') {
        value_end -= 1;
    }

    handler.on_header(&line[..name_end], &line[value_start..value_end + 1]);
    Ok(())
}

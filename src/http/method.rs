/// HTTP [Method][rfc].
///
/// Well-known methods are recognised without allocation. A request whose
/// method token is valid but not well-known is represented as
/// [`Method::CUSTOM`], with the raw token bytes reported alongside.
///
/// [rfc]: <https://datatracker.ietf.org/doc/html/rfc9110#name-methods>
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Method(Inner);

#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
enum Inner {
    #[default]
    Get,
    Put,
    Post,
    Head,
    Trace,
    Patch,
    Delete,
    Connect,
    Options,
    Custom,
}

impl Method {
    forward! {
        /// The `GET` method requests a representation of the specified resource.
        pub const GET: Get = "GET";
        /// The `PUT` method replaces all current representations of the target
        /// resource with the request content.
        pub const PUT: Put = "PUT";
        /// The `POST` method submits an entity to the specified resource.
        pub const POST: Post = "POST";
        /// The `HEAD` method asks for a response identical to a GET request,
        /// but without a response body.
        pub const HEAD: Head = "HEAD";
        /// The `TRACE` method performs a message loop-back test along the path
        /// to the target resource.
        pub const TRACE: Trace = "TRACE";
        /// The `PATCH` method applies partial modifications to a resource.
        pub const PATCH: Patch = "PATCH";
        /// The `DELETE` method deletes the specified resource.
        pub const DELETE: Delete = "DELETE";
        /// The `CONNECT` method establishes a tunnel to the server identified
        /// by the target resource.
        pub const CONNECT: Connect = "CONNECT";
        /// The `OPTIONS` method describes the communication options for the
        /// target resource.
        pub const OPTIONS: Options = "OPTIONS";
    }

    /// A method token outside the well-known set.
    pub const CUSTOM: Method = Method(Inner::Custom);

    /// Match a well-known method at the start of `span`.
    ///
    /// Recognition requires the byte after the method name to be a space, so
    /// a hit is always a complete token. Returns the method and the length of
    /// its name; the caller steps over `len + 1` bytes to pass the space as
    /// well.
    pub fn from_prefix(span: &[u8]) -> Option<(Method, usize)> {
        if let Some(chunk) = span.first_chunk::<4>() {
            match u32::from_le_bytes(*chunk) {
                GET_WORD => return Some((Method::GET, 3)),
                PUT_WORD => return Some((Method::PUT, 3)),
                _ => {}
            }
        }

        let chunk = span.first_chunk::<8>()?;
        let block = u64::from_le_bytes(*chunk);

        for (word, mask, method, len) in LONG {
            if block & mask == word {
                return Some((method, len));
            }
        }

        None
    }
}

impl std::fmt::Debug for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Debug::fmt(self.as_str(), f)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ===== Macros =====

macro_rules! forward {
    ($($(#[$doc:meta])* pub const $name:ident: $variant:ident = $val:literal;)*) => {
        $(
            $(#[$doc])*
            pub const $name: Method = Method(Inner::$variant);
        )*

        /// Returns string representation.
        #[inline]
        pub const fn as_str(&self) -> &'static str {
            match self.0 {
                $(
                    Inner::$variant => $val,
                )*
                Inner::Custom => "<custom>",
            }
        }
    };
}

use forward;

// ===== Prefix table =====

const GET_WORD: u32 = u32::from_le_bytes(*b"GET ");
const PUT_WORD: u32 = u32::from_le_bytes(*b"PUT ");

// name plus trailing space, zero padded into one prefix-masked 64-bit compare
const LONG: [(u64, u64, Method, usize); 7] = [
    (padded(b"POST "), mask(5), Method::POST, 4),
    (padded(b"HEAD "), mask(5), Method::HEAD, 4),
    (padded(b"TRACE "), mask(6), Method::TRACE, 5),
    (padded(b"PATCH "), mask(6), Method::PATCH, 5),
    (padded(b"DELETE "), mask(7), Method::DELETE, 6),
    (padded(b"CONNECT "), mask(8), Method::CONNECT, 7),
    (padded(b"OPTIONS "), mask(8), Method::OPTIONS, 7),
];

const fn padded(src: &[u8]) -> u64 {
    let mut bytes = [0u8; 8];
    let mut i = 0;
    while i < src.len() {
        bytes[i] = src[i];
        i += 1;
    }
    u64::from_le_bytes(bytes)
}

const fn mask(len: usize) -> u64 {
    if len == 8 {
        u64::MAX
    } else {
        (1u64 << (len * 8)) - 1
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_prefix() {
        let cases: [(&[u8], Method); 9] = [
            (b"GET / HTTP/1.1\r\n", Method::GET),
            (b"PUT / HTTP/1.1\r\n", Method::PUT),
            (b"POST / HTTP/1.1\r\n", Method::POST),
            (b"HEAD / HTTP/1.1\r\n", Method::HEAD),
            (b"TRACE / HTTP/1.1\r\n", Method::TRACE),
            (b"PATCH / HTTP/1.1\r\n", Method::PATCH),
            (b"DELETE / HTTP/1.1\r\n", Method::DELETE),
            (b"CONNECT host:80 HTTP/1.1\r\n", Method::CONNECT),
            (b"OPTIONS * HTTP/1.1\r\n", Method::OPTIONS),
        ];

        for (span, expected) in cases {
            let (method, len) = Method::from_prefix(span).unwrap();
            assert_eq!(method, expected);
            assert_eq!(len, expected.as_str().len());
            assert_eq!(&span[..len], expected.as_str().as_bytes());
            assert_eq!(span[len], b' ');
        }
    }

    #[test]
    fn test_from_prefix_requires_space() {
        assert_eq!(Method::from_prefix(b"GETX / HTTP/1.1\r\n"), None);
        assert_eq!(Method::from_prefix(b"POSTING / HTTP/1.1\r\n"), None);
        assert_eq!(Method::from_prefix(b"NOTIFY / HTTP/1.1\r\n"), None);
        // method name alone, no following space in the span
        assert_eq!(Method::from_prefix(b"GET"), None);
        assert_eq!(Method::from_prefix(b""), None);
    }
}

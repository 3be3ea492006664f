//! Error taxonomy for the core (spec §7).
//!
//! Mirrors the teacher's style: plain enums, hand-written `Display`/`Error`
//! impls, and `From` conversions for the I/O errors that leak in from a
//! transport. No error-handling crate is pulled in for this, since the
//! teacher never reaches for one either.

use std::fmt;
use std::io;

/// A body-communicator operation that needed a live reference (`rdbuf`,
/// `seekg`, `tellg`, stream insertion/extraction) was invoked while the
/// active variant could not serve it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossTalk {
    op: &'static str,
    active: &'static str,
}

impl CrossTalk {
    pub(crate) fn new(op: &'static str, active: &'static str) -> Self {
        Self { op, active }
    }

    /// Name of the operation that was rejected (`"<<"`, `"rdbuf"`, ...).
    pub fn operation(&self) -> &'static str {
        self.op
    }

    /// The variant that was active when the operation was attempted.
    pub fn active_variant(&self) -> &'static str {
        self.active
    }
}

impl fmt::Display for CrossTalk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cross-talk: `{}` is not valid while the body is in `{}` mode",
            self.op, self.active
        )
    }
}

impl std::error::Error for CrossTalk {}

/// A header value rejected by [`crate::headers::HeaderContainer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// The value contained a bare `\r` or `\n`, which would let a caller
    /// split an extra header line into the wire output (CRLF injection).
    CrlfInValue(String),
}

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderError::CrlfInValue(value) => {
                write!(f, "header value contains a bare CR or LF: {value:?}")
            }
        }
    }
}

impl std::error::Error for HeaderError {}

/// Errors a transport adapter can hit while reading a request off the wire
/// or handing the response back, before or after the router ever runs.
#[derive(Debug)]
pub enum TransportError {
    /// The connection closed, or the first line could not be parsed at all.
    NotHttpConform,
    /// `SERVER_PROTOCOL`/the request line named a version we don't speak.
    UnsupportedVersion(String),
    /// A header line had no `:` separator.
    BadHeader(String),
    /// `Content-Length` was present but not a valid unsigned integer.
    InvalidLength,
    /// Chunked transfer-encoding framing was malformed.
    BrokenChunk,
    /// Underlying I/O failure (socket reset, etc).
    Io(io::Error),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::NotHttpConform => write!(f, "not an HTTP-conformant request"),
            TransportError::UnsupportedVersion(v) => write!(f, "unsupported version: {v}"),
            TransportError::BadHeader(line) => write!(f, "malformed header line: {line:?}"),
            TransportError::InvalidLength => write!(f, "invalid Content-Length"),
            TransportError::BrokenChunk => write!(f, "invalid chunked encoding"),
            TransportError::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransportError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for TransportError {
    fn from(err: io::Error) -> Self {
        TransportError::Io(err)
    }
}

/// Errors from setting up or running a [`crate::router`] / transport pair.
#[derive(Debug)]
pub enum HttpError {
    /// A route was registered twice under a way that the router forbids.
    RouteExists,
    Transport(TransportError),
    Io(io::Error),
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpError::RouteExists => write!(f, "route already registered"),
            HttpError::Transport(err) => write!(f, "{err}"),
            HttpError::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for HttpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HttpError::Transport(err) => Some(err),
            HttpError::Io(err) => Some(err),
            HttpError::RouteExists => None,
        }
    }
}

impl From<io::Error> for HttpError {
    fn from(err: io::Error) -> Self {
        HttpError::Io(err)
    }
}

impl From<TransportError> for HttpError {
    fn from(err: TransportError) -> Self {
        HttpError::Transport(err)
    }
}

/// Failure of a body-communicator operation that forwards to an underlying
/// stream object (`>>`, `rdbuf`, `seekg`, `tellg`): either the active
/// variant couldn't serve the call, or the stream itself failed.
#[derive(Debug)]
pub enum StreamOpError {
    CrossTalk(CrossTalk),
    Io(io::Error),
}

impl fmt::Display for StreamOpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamOpError::CrossTalk(err) => write!(f, "{err}"),
            StreamOpError::Io(err) => write!(f, "stream io error: {err}"),
        }
    }
}

impl std::error::Error for StreamOpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StreamOpError::CrossTalk(err) => Some(err),
            StreamOpError::Io(err) => Some(err),
        }
    }
}

impl From<CrossTalk> for StreamOpError {
    fn from(err: CrossTalk) -> Self {
        StreamOpError::CrossTalk(err)
    }
}

impl From<io::Error> for StreamOpError {
    fn from(err: io::Error) -> Self {
        StreamOpError::Io(err)
    }
}

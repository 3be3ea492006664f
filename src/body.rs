//! The tri-modal body communicator (spec §3, §4.1).
//!
//! A body is one of `Empty`, `Text(String)`, `CStream(Vec<u8>)` addressed
//! through a cursor, or a shared `Stream`. The active variant is decided by
//! whichever write-family call touches the body first; after that, using an
//! operation that the active variant cannot serve is a cross-talk: ops that
//! must hand back a live reference (`rdbuf`, `>>`, `seekg`, `tellg`) raise
//! [`StreamOpError`]/[`CrossTalk`], ops with a natural zero value (`read`,
//! `write`) fail closed instead.

use std::fmt;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::sync::{Arc, Mutex};

use crate::error::{CrossTalk, StreamOpError};

/// Anything a shared `Stream` body can hold: readable, writable, seekable,
/// and safe to move across the thread a transport dispatches a request on.
pub trait StreamBody: Read + Write + Seek + Send {}
impl<T: Read + Write + Seek + Send> StreamBody for T {}

/// Shared ownership handle to a stream-backed body, as returned by
/// [`BodyCommunicator::rdbuf`].
pub type SharedStream = Arc<Mutex<dyn StreamBody>>;

/// Which variant a [`BodyCommunicator`] is currently holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Empty,
    Text,
    CStream,
    Stream,
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BodyKind::Empty => "empty",
            BodyKind::Text => "text",
            BodyKind::CStream => "cstream",
            BodyKind::Stream => "stream",
        };
        f.write_str(name)
    }
}

enum BodyState {
    Empty,
    Text(String),
    CStream(Cursor<Vec<u8>>),
    Stream(SharedStream),
}

impl BodyState {
    fn kind(&self) -> BodyKind {
        match self {
            BodyState::Empty => BodyKind::Empty,
            BodyState::Text(_) => BodyKind::Text,
            BodyState::CStream(_) => BodyKind::CStream,
            BodyState::Stream(_) => BodyKind::Stream,
        }
    }
}

/// The read/write storage and I/O boundary shared by requests and responses.
pub struct BodyCommunicator {
    state: BodyState,
}

impl Default for BodyCommunicator {
    fn default() -> Self {
        Self {
            state: BodyState::Empty,
        }
    }
}

impl BodyCommunicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            state: BodyState::Text(text.into()),
        }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            state: BodyState::CStream(Cursor::new(bytes)),
        }
    }

    pub fn from_stream(stream: SharedStream) -> Self {
        Self {
            state: BodyState::Stream(stream),
        }
    }

    pub fn which(&self) -> BodyKind {
        self.state.kind()
    }

    /// Byte count, or `None` for a `Stream` that can't report its length
    /// (the spec's "unknown" sentinel).
    pub fn size(&self) -> Option<usize> {
        match &self.state {
            BodyState::Empty => Some(0),
            BodyState::Text(s) => Some(s.len()),
            BodyState::CStream(c) => Some(c.get_ref().len()),
            BodyState::Stream(s) => stream_len(s),
        }
    }

    /// True iff there are no bytes left to read. Stream EOF counts as empty.
    pub fn empty(&self) -> bool {
        match &self.state {
            BodyState::Empty => true,
            BodyState::Text(s) => s.is_empty(),
            BodyState::CStream(c) => c.position() >= c.get_ref().len() as u64,
            BodyState::Stream(s) => stream_remaining(s).map(|n| n == 0).unwrap_or(false),
        }
    }

    /// The text, iff the active variant is `Text`.
    pub fn data(&self) -> Option<&str> {
        match &self.state {
            BodyState::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Appends bytes. The first call on a fresh body allocates `Text`;
    /// `Stream`/`CStream` bodies get the bytes written through instead.
    /// Non-UTF-8 bytes against a `Text` body are a no-op (the variant can't
    /// hold them).
    pub fn append(&mut self, bytes: &[u8]) {
        match &mut self.state {
            BodyState::Empty => {
                self.state = BodyState::Text(String::from_utf8_lossy(bytes).into_owned());
            }
            BodyState::Text(s) => s.push_str(&String::from_utf8_lossy(bytes)),
            BodyState::CStream(c) => {
                c.get_mut().extend_from_slice(bytes);
            }
            BodyState::Stream(s) => {
                if let Ok(mut guard) = s.lock() {
                    let _ = guard.write_all(bytes);
                }
            }
        }
    }

    /// Writes bytes at the current cursor, returning how many were
    /// accepted. The first call on a fresh body allocates `CStream`.
    pub fn write(&mut self, bytes: &[u8]) -> usize {
        match &mut self.state {
            BodyState::Empty => {
                let mut cursor = Cursor::new(Vec::new());
                let n = cursor.write(bytes).unwrap_or(0);
                self.state = BodyState::CStream(cursor);
                n
            }
            BodyState::Text(s) => match std::str::from_utf8(bytes) {
                Ok(text) => {
                    s.push_str(text);
                    bytes.len()
                }
                Err(_) => 0,
            },
            BodyState::CStream(c) => c.write(bytes).unwrap_or(0),
            BodyState::Stream(s) => s
                .lock()
                .ok()
                .and_then(|mut guard| guard.write(bytes).ok())
                .unwrap_or(0),
        }
    }

    /// Reads into `buf`, returning the number of bytes actually read. `0`
    /// on a variant this operation cannot serve (`Empty`, `Text`) — it
    /// fails closed rather than raising.
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        match &mut self.state {
            BodyState::Empty | BodyState::Text(_) => 0,
            BodyState::CStream(c) => c.read(buf).unwrap_or(0),
            BodyState::Stream(s) => s
                .lock()
                .ok()
                .and_then(|mut guard| guard.read(buf).ok())
                .unwrap_or(0),
        }
    }

    /// `readsome`: best-effort, non-blocking-in-spirit read. Like `read`,
    /// fails closed; only meaningful on `Stream`/`CStream`.
    pub fn readsome(&mut self, buf: &mut [u8]) -> Result<usize, StreamOpError> {
        match &mut self.state {
            BodyState::Stream(s) => {
                let mut guard = s.lock().map_err(|_| poison("readsome"))?;
                Ok(guard.read(buf)?)
            }
            BodyState::CStream(c) => Ok(c.read(buf).unwrap_or(0)),
            other => Err(StreamOpError::CrossTalk(CrossTalk::new(
                "readsome",
                kind_name(other),
            ))),
        }
    }

    /// The `<<` operator: copies `source` into the body's stream, turning
    /// an `Empty` body into a freshly allocated in-memory `Stream`.
    pub fn insert_stream(&mut self, mut source: impl Read) -> Result<u64, StreamOpError> {
        match &mut self.state {
            BodyState::Empty => {
                let mut buf = Vec::new();
                source.read_to_end(&mut buf)?;
                let n = buf.len() as u64;
                self.state = BodyState::Stream(Arc::new(Mutex::new(Cursor::new(buf))));
                Ok(n)
            }
            BodyState::Stream(s) => {
                let mut guard = s.lock().map_err(|_| poison("<<"))?;
                Ok(io::copy(&mut source, &mut *guard)?)
            }
            other => Err(StreamOpError::CrossTalk(CrossTalk::new(
                "<<",
                kind_name(other),
            ))),
        }
    }

    /// The `>>` operator: copies from the body's stream into `sink`. Only
    /// the `Stream` variant can serve this — there's no stream object to
    /// read from otherwise.
    pub fn extract_stream(&mut self, mut sink: impl Write) -> Result<u64, StreamOpError> {
        match &mut self.state {
            BodyState::Stream(s) => {
                let mut guard = s.lock().map_err(|_| poison(">>"))?;
                Ok(io::copy(&mut *guard, &mut sink)?)
            }
            other => Err(StreamOpError::CrossTalk(CrossTalk::new(
                ">>",
                kind_name(other),
            ))),
        }
    }

    /// A clone of the shared stream handle, iff the active variant is `Stream`.
    pub fn rdbuf(&self) -> Result<SharedStream, CrossTalk> {
        match &self.state {
            BodyState::Stream(s) => Ok(Arc::clone(s)),
            other => Err(CrossTalk::new("rdbuf", kind_name(other))),
        }
    }

    pub fn tellg(&self) -> Result<u64, StreamOpError> {
        match &self.state {
            BodyState::Stream(s) => {
                let mut guard = s.lock().map_err(|_| poison("tellg"))?;
                Ok(guard.stream_position()?)
            }
            other => Err(StreamOpError::CrossTalk(CrossTalk::new(
                "tellg",
                kind_name(other),
            ))),
        }
    }

    pub fn seekg(&mut self, pos: SeekFrom) -> Result<u64, StreamOpError> {
        match &mut self.state {
            BodyState::Stream(s) => {
                let mut guard = s.lock().map_err(|_| poison("seekg"))?;
                Ok(guard.seek(pos)?)
            }
            other => Err(StreamOpError::CrossTalk(CrossTalk::new(
                "seekg",
                kind_name(other),
            ))),
        }
    }

    /// Resets the active variant's contents without changing which variant
    /// is active. Best-effort on `Stream`: seeks to the start, since an
    /// arbitrary `Read + Write + Seek` object has no generic truncate.
    pub fn clear(&mut self) {
        match &mut self.state {
            BodyState::Empty => {}
            BodyState::Text(s) => s.clear(),
            BodyState::CStream(c) => {
                c.get_mut().clear();
                c.set_position(0);
            }
            BodyState::Stream(s) => {
                if let Ok(mut guard) = s.lock() {
                    let _ = guard.seek(SeekFrom::Start(0));
                }
            }
        }
    }

    /// Returns to `Empty`, discarding whatever variant was active.
    pub fn reset(&mut self) {
        self.state = BodyState::Empty;
    }

    /// Collects the whole body as a `String` regardless of variant —
    /// `Text` is cloned, `CStream`/`Stream` are drained from the current
    /// position to the end and lossily decoded.
    pub fn read_to_end_string(&mut self) -> String {
        String::from_utf8_lossy(&self.read_to_end_bytes()).into_owned()
    }

    /// Collects the whole body as bytes regardless of variant.
    pub fn read_to_end_bytes(&mut self) -> Vec<u8> {
        match &mut self.state {
            BodyState::Empty => Vec::new(),
            BodyState::Text(s) => s.as_bytes().to_vec(),
            BodyState::CStream(c) => {
                let mut buf = Vec::new();
                let _ = c.read_to_end(&mut buf);
                buf
            }
            BodyState::Stream(s) => {
                let mut buf = Vec::new();
                if let Ok(mut guard) = s.lock() {
                    let _ = guard.read_to_end(&mut buf);
                }
                buf
            }
        }
    }
}

fn kind_name(state: &BodyState) -> &'static str {
    match state.kind() {
        BodyKind::Empty => "empty",
        BodyKind::Text => "text",
        BodyKind::CStream => "cstream",
        BodyKind::Stream => "stream",
    }
}

fn poison(op: &'static str) -> StreamOpError {
    StreamOpError::Io(io::Error::new(
        io::ErrorKind::Other,
        format!("stream lock poisoned during `{op}`"),
    ))
}

fn stream_len(stream: &SharedStream) -> Option<usize> {
    let mut guard = stream.lock().ok()?;
    let cur = guard.stream_position().ok()?;
    let end = guard.seek(SeekFrom::End(0)).ok()?;
    let _ = guard.seek(SeekFrom::Start(cur));
    Some(end as usize)
}

fn stream_remaining(stream: &SharedStream) -> Option<u64> {
    let mut guard = stream.lock().ok()?;
    let cur = guard.stream_position().ok()?;
    let end = guard.seek(SeekFrom::End(0)).ok()?;
    let _ = guard.seek(SeekFrom::Start(cur));
    Some(end.saturating_sub(cur))
}

/// Extension point for reading a typed value out of a body (spec §9's
/// `deserialize_body<T>`). Implement this for application-defined types;
/// `String` and `Vec<u8>` are covered out of the box.
pub trait FromBody: Sized {
    fn from_body(body: &mut BodyCommunicator) -> Self;
}

impl FromBody for String {
    fn from_body(body: &mut BodyCommunicator) -> Self {
        body.read_to_end_string()
    }
}

impl FromBody for Vec<u8> {
    fn from_body(body: &mut BodyCommunicator) -> Self {
        body.read_to_end_bytes()
    }
}

/// Extension point for writing a typed value into a body (spec §9's
/// `serialize_body<T>`).
pub trait IntoBody {
    fn into_body(self) -> BodyCommunicator;
}

impl IntoBody for String {
    fn into_body(self) -> BodyCommunicator {
        BodyCommunicator::from_text(self)
    }
}

impl IntoBody for &str {
    fn into_body(self) -> BodyCommunicator {
        BodyCommunicator::from_text(self)
    }
}

impl IntoBody for Vec<u8> {
    fn into_body(self) -> BodyCommunicator {
        BodyCommunicator::from_bytes(self)
    }
}

impl IntoBody for BodyCommunicator {
    fn into_body(self) -> BodyCommunicator {
        self
    }
}

/// A JSON-tagged value, for the `json` feature's `FromBody`/`IntoBody`
/// hooks — mirrors the `Json<T>` extractor/responder pattern used across
/// the Rust web ecosystem so it composes the same way a handler author
/// already expects.
#[cfg(feature = "json")]
pub struct Json<T>(pub T);

#[cfg(feature = "json")]
impl<T: serde::de::DeserializeOwned> FromBody for Json<T> {
    fn from_body(body: &mut BodyCommunicator) -> Self {
        let bytes = body.read_to_end_bytes();
        Json(serde_json::from_slice(&bytes).unwrap_or_else(|err| {
            panic!("invalid JSON body: {err}");
        }))
    }
}

#[cfg(feature = "json")]
impl<T: serde::Serialize> IntoBody for Json<T> {
    fn into_body(self) -> BodyCommunicator {
        match serde_json::to_string(&self.0) {
            Ok(text) => BodyCommunicator::from_text(text),
            Err(_) => BodyCommunicator::new(),
        }
    }
}

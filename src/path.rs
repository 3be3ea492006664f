//! Path traverser over decoded URI path segments (spec §4.5).
//!
//! Percent-decoding covers the pchar set (unreserved + sub-delims + `:`
//! and `@`); in practice we decode every `%XY` escape we find, the same way
//! `percent_decode_str` does, since a byte that was legitimately escaped is
//! indistinguishable from one that wasn't once it's been unescaped. Empty
//! segments between consecutive slashes are collapsed, and a leading slash
//! never produces a leading empty segment. `.` and `..` are left alone —
//! that's a caller/middleware concern, not the traverser's.

use percent_encoding::percent_decode_str;

fn decode_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned())
        .collect()
}

/// An advancing iterator over a request URI's decoded path segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTraverser {
    segments: Vec<String>,
    pos: usize,
}

impl PathTraverser {
    /// Builds a traverser from a request URI (path only; a query string, if
    /// present, is ignored).
    pub fn new(uri: &str) -> Self {
        let path = uri.split('?').next().unwrap_or(uri);
        Self {
            segments: decode_segments(path),
            pos: 0,
        }
    }

    pub fn at_beginning(&self) -> bool {
        self.pos == 0
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.segments.len()
    }

    /// The segment at the current position, without advancing.
    pub fn peek(&self) -> Option<&str> {
        self.segments.get(self.pos).map(String::as_str)
    }

    /// If the current segment equals `slug`, advances and returns `true`;
    /// otherwise leaves the position untouched and returns `false`. Never
    /// panics at the end — just returns `false`.
    pub fn check_segment(&mut self, slug: &str) -> bool {
        if self.peek() == Some(slug) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Advances unconditionally, returning the segment that was current.
    pub fn next(&mut self) -> Option<&str> {
        let segment = self.segments.get(self.pos).map(String::as_str);
        if segment.is_some() {
            self.pos += 1;
        }
        segment
    }

    /// Moves the position back one segment, saturating at the beginning.
    pub fn prev(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        self.pos = 0;
    }

    /// An independent copy at the same position, for speculative matching
    /// a valve can discard instead of committing.
    pub fn branch(&self) -> Self {
        self.clone()
    }

    /// Remaining, not-yet-consumed segments.
    pub fn remaining(&self) -> &[String] {
        &self.segments[self.pos.min(self.segments.len())..]
    }
}

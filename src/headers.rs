//! Header field containers (spec §3, §4.2).
//!
//! Lookup is case-insensitive ASCII; iteration order equals insertion
//! order; multi-valued headers are kept as separate entries.

use std::fmt;

use crate::error::HeaderError;
use crate::status::StatusCode;

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

fn reject_crlf(value: &str) -> Result<(), HeaderError> {
    if value.bytes().any(|b| b == b'\r' || b == b'\n') {
        Err(HeaderError::CrlfInValue(value.to_string()))
    } else {
        Ok(())
    }
}

/// A single `(name, value)` header entry. Name equality is case-insensitive.
#[derive(Debug, Clone)]
pub struct HeaderField {
    name: String,
    value: String,
}

impl HeaderField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl PartialEq for HeaderField {
    fn eq(&self, other: &Self) -> bool {
        eq_ignore_case(&self.name, &other.name) && self.value == other.value
    }
}

impl Eq for HeaderField {}

/// An insertion-ordered sequence of [`HeaderField`]s with case-insensitive
/// lookup by name.
#[derive(Debug, Clone, Default)]
pub struct HeaderContainer {
    fields: Vec<HeaderField>,
}

impl HeaderContainer {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Number of fields stored (multi-valued headers count once per entry).
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First field whose name matches `name`, case-insensitively.
    pub fn find(&self, name: &str) -> Option<&HeaderField> {
        self.fields.iter().find(|f| eq_ignore_case(&f.name, name))
    }

    /// Value of the first field named `name`, or `""` if absent.
    pub fn get(&self, name: &str) -> &str {
        self.find(name).map(HeaderField::value).unwrap_or("")
    }

    /// All values of fields named `name`, in insertion order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .filter(move |f| eq_ignore_case(&f.name, name))
            .map(HeaderField::value)
    }

    pub fn has(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Convenience for checking several names at once, in the order given.
    pub fn has_all(&self, names: &[&str]) -> Vec<bool> {
        names.iter().map(|n| self.has(n)).collect()
    }

    /// Append a new field. Does **not** replace an existing field with the
    /// same name — callers that want replace semantics must
    /// [`erase_if`](Self::erase_if) first.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<(), HeaderError> {
        let name = name.into();
        let value = value.into();
        reject_crlf(&name)?;
        reject_crlf(&value)?;
        self.fields.push(HeaderField { name, value });
        Ok(())
    }

    /// Alias for [`set`](Self::set); matches the source's `emplace` naming.
    pub fn emplace(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<(), HeaderError> {
        self.set(name, value)
    }

    /// Remove every field for which `predicate` returns true.
    pub fn erase_if(&mut self, mut predicate: impl FnMut(&HeaderField) -> bool) {
        self.fields.retain(|f| !predicate(f));
    }

    /// Remove every field named `name` then insert a single field with
    /// `value` — the "replace" semantics `set` deliberately doesn't give you.
    pub fn replace(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<(), HeaderError> {
        let name = name.into();
        self.erase_if(|f| eq_ignore_case(&f.name, &name));
        self.set(name, value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeaderField> {
        self.fields.iter()
    }

    /// Serialize each field as `"Name: Value\r\n"`, insertion order, no
    /// merging of duplicate names.
    pub fn write_to(&self, out: &mut String) {
        for field in &self.fields {
            out.push_str(&field.name);
            out.push_str(": ");
            out.push_str(&field.value);
            out.push_str("\r\n");
        }
    }
}

impl PartialEq for HeaderContainer {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Eq for HeaderContainer {}

impl<'a> IntoIterator for &'a HeaderContainer {
    type Item = &'a HeaderField;
    type IntoIter = std::slice::Iter<'a, HeaderField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Headers as seen by an inbound [`crate::request::Request`].
#[derive(Debug, Clone, Default)]
pub struct RequestHeaders {
    inner: HeaderContainer,
}

impl RequestHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<(), HeaderError> {
        self.inner.set(name, value)
    }

    /// Parses the `content-length` header as an unsigned integer. Returns
    /// `0` if the header is absent or fails to parse — the header is
    /// authoritative for what the client *claims*, not necessarily what was
    /// buffered (see [`crate::body::BodyCommunicator::size`]).
    pub fn content_length(&self) -> usize {
        self.inner.get("content-length").parse().unwrap_or(0)
    }
}

impl std::ops::Deref for RequestHeaders {
    type Target = HeaderContainer;
    fn deref(&self) -> &HeaderContainer {
        &self.inner
    }
}

impl std::ops::DerefMut for RequestHeaders {
    fn deref_mut(&mut self) -> &mut HeaderContainer {
        &mut self.inner
    }
}

/// Headers plus status code on an outbound [`crate::response::Response`].
#[derive(Debug, Clone)]
pub struct ResponseHeaders {
    inner: HeaderContainer,
    status_code: StatusCode,
}

impl Default for ResponseHeaders {
    fn default() -> Self {
        Self {
            inner: HeaderContainer::new(),
            status_code: StatusCode::default(),
        }
    }
}

impl ResponseHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }

    pub fn set_status_code(&mut self, status: StatusCode) {
        self.status_code = status;
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<(), HeaderError> {
        self.inner.set(name, value)
    }

    /// Writes each field as `"Name: Value\r\n"`. Does **not** write the
    /// status line — that's the transport's job (spec §3, §6).
    pub fn to_string(&self, out: &mut String) {
        self.inner.write_to(out);
    }
}

impl std::ops::Deref for ResponseHeaders {
    type Target = HeaderContainer;
    fn deref(&self) -> &HeaderContainer {
        &self.inner
    }
}

impl std::ops::DerefMut for ResponseHeaders {
    fn deref_mut(&mut self) -> &mut HeaderContainer {
        &mut self.inner
    }
}

impl fmt::Display for ResponseHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.to_string(&mut out);
        f.write_str(&out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_lookup() {
        let mut h = HeaderContainer::new();
        h.set("Content-Type", "text/plain").unwrap();
        for variant in ["content-type", "CONTENT-TYPE", "Content-Type", "cOnTeNt-TyPe"] {
            assert_eq!(h.get(variant), "text/plain");
        }
    }

    #[test]
    fn insertion_order_preserved() {
        let mut h = HeaderContainer::new();
        h.set("a", "1").unwrap();
        h.set("b", "2").unwrap();
        h.set("a", "3").unwrap();
        let names: Vec<_> = h.iter().map(HeaderField::name).collect();
        assert_eq!(names, vec!["a", "b", "a"]);
        let values: Vec<_> = h.get_all("a").collect();
        assert_eq!(values, vec!["1", "3"]);
    }

    #[test]
    fn set_does_not_replace() {
        let mut h = HeaderContainer::new();
        h.set("x", "1").unwrap();
        h.set("x", "2").unwrap();
        assert_eq!(h.len(), 2);
        assert_eq!(h.get("x"), "1");
    }

    #[test]
    fn replace_dedupes() {
        let mut h = HeaderContainer::new();
        h.set("x", "1").unwrap();
        h.set("x", "2").unwrap();
        h.replace("x", "3").unwrap();
        assert_eq!(h.len(), 1);
        assert_eq!(h.get("x"), "3");
    }

    #[test]
    fn rejects_crlf_in_value() {
        let mut h = HeaderContainer::new();
        let err = h.set("x", "evil\r\nSet-Cookie: hacked=1").unwrap_err();
        assert!(matches!(err, HeaderError::CrlfInValue(_)));
    }

    #[test]
    fn content_length_parses_or_defaults() {
        let mut h = RequestHeaders::new();
        assert_eq!(h.content_length(), 0);
        h.set("Content-Length", "42").unwrap();
        assert_eq!(h.content_length(), 42);
        let mut bad = RequestHeaders::new();
        bad.set("Content-Length", "not-a-number").unwrap();
        assert_eq!(bad.content_length(), 0);
    }

    #[test]
    fn equality_is_case_insensitive_on_name() {
        let mut a = HeaderContainer::new();
        a.set("Host", "x").unwrap();
        let mut b = HeaderContainer::new();
        b.set("HOST", "x").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn response_headers_default_status_is_200() {
        let headers = ResponseHeaders::new();
        assert_eq!(headers.status_code(), StatusCode::OK);
    }

    #[test]
    fn response_headers_serialize() {
        let mut headers = ResponseHeaders::new();
        headers.set("Content-Type", "text/html").unwrap();
        let mut out = String::new();
        headers.to_string(&mut out);
        assert_eq!(out, "Content-Type: text/html\r\n");
    }
}

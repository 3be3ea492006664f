//! Request-line/header parsing and response serialization shared by every
//! transport. Grounded on the source's `ParsedFirstLine`/`parse_headers`
//! and the fixed/chunked response writers from its connection handler.

use std::io::{self, BufRead, Read, Write};

use crate::body::BodyCommunicator;
use crate::error::TransportError;
use crate::headers::RequestHeaders;
use crate::request::{HttpVersion, Request};
use crate::response::Response;

/// The parsed `METHOD URI VERSION` request line.
pub struct RequestLine {
    pub method: String,
    pub uri: String,
    pub version: HttpVersion,
}

/// Parses a single CRLF-terminated request line. Fails with
/// [`TransportError::NotHttpConform`] if it isn't exactly three
/// space-separated tokens.
pub fn parse_request_line(line: &str) -> Result<RequestLine, TransportError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut parts = line.split(' ');
    let (method, uri, version) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(m), Some(u), Some(v), None) if !m.is_empty() && !u.is_empty() => (m, u, v),
        _ => return Err(TransportError::NotHttpConform),
    };
    Ok(RequestLine {
        method: method.to_string(),
        uri: uri.to_string(),
        version: HttpVersion::parse(version),
    })
}

/// Reads header lines from `reader` until the blank line that terminates
/// them. Lowercases nothing — [`RequestHeaders`] does case-insensitive
/// lookup itself, the same way the container in [`crate::headers`] does.
pub fn parse_headers<R: BufRead>(reader: &mut R) -> Result<RequestHeaders, TransportError> {
    let mut headers = RequestHeaders::new();
    loop {
        let mut line = String::new();
        let len = reader.read_line(&mut line).map_err(TransportError::from)?;
        if len == 0 || line == "\r\n" || line == "\n" {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);
        match line.split_once(':') {
            Some((name, value)) => {
                let _ = headers.set(name.trim(), value.trim());
            }
            None => return Err(TransportError::BadHeader(line.to_string())),
        }
    }
    Ok(headers)
}

/// How the body's length was signaled on the wire.
pub enum Framing {
    Fixed(usize),
    Chunked,
    None,
}

pub fn extract_framing(headers: &RequestHeaders) -> Result<Framing, TransportError> {
    if headers.has("content-length") {
        return headers
            .get("content-length")
            .parse()
            .map(Framing::Fixed)
            .map_err(|_| TransportError::InvalidLength);
    }
    if headers.get("transfer-encoding").eq_ignore_ascii_case("chunked") {
        return Ok(Framing::Chunked);
    }
    Ok(Framing::None)
}

/// Reads exactly `len` bytes into a fresh [`BodyCommunicator`].
pub fn read_fixed_body<R: Read>(reader: &mut R, len: usize) -> io::Result<BodyCommunicator> {
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    Ok(BodyCommunicator::from_bytes(buf))
}

/// Reads a chunked-encoded body to completion.
pub fn read_chunked_body<R: BufRead>(reader: &mut R) -> Result<BodyCommunicator, TransportError> {
    let mut body = Vec::new();
    loop {
        let mut len_line = String::new();
        let count = reader.read_line(&mut len_line).map_err(TransportError::from)?;
        if count == 0 {
            return Err(TransportError::BrokenChunk);
        }
        let len_line = len_line.trim_end_matches(['\r', '\n']);
        if len_line.is_empty() {
            return Err(TransportError::BrokenChunk);
        }
        let len = usize::from_str_radix(len_line, 16).map_err(|_| TransportError::BrokenChunk)?;
        if len == 0 {
            break;
        }
        let mut chunk = vec![0u8; len];
        reader.read_exact(&mut chunk).map_err(TransportError::from)?;
        body.extend_from_slice(&chunk);
        let mut trailer = [0u8; 2];
        reader.read_exact(&mut trailer).map_err(TransportError::from)?;
        if trailer != *b"\r\n" {
            return Err(TransportError::BrokenChunk);
        }
    }
    Ok(BodyCommunicator::from_bytes(body))
}

/// Builds the [`Request`] a router will dispatch on, once the request
/// line, headers and body have all been read off the wire.
pub fn build_request(
    line: RequestLine,
    headers: RequestHeaders,
    body: BodyCommunicator,
) -> Request {
    Request {
        method: line.method,
        uri: line.uri,
        version: line.version,
        headers,
        body,
    }
}

/// Writes a complete fixed-length response: status line, headers
/// (with `content-length` filled in if [`Response::calculate_default_headers`]
/// hasn't already), then the body.
pub fn write_fixed_response<W: Write>(stream: &mut W, mut response: Response) -> io::Result<()> {
    response.calculate_default_headers();
    let status = response.status_code();
    write!(stream, "HTTP/1.1 {} {}\r\n", status.as_u16(), status.reason_phrase())?;
    let mut header_text = String::new();
    response.headers.to_string(&mut header_text);
    stream.write_all(header_text.as_bytes())?;
    stream.write_all(b"\r\n")?;
    let bytes = response.body.read_to_end_bytes();
    stream.write_all(&bytes)?;
    stream.flush()
}

/// Writes a response whose body is streamed out as chunked
/// transfer-encoding instead of a known `content-length`.
pub fn write_chunked_response<W: Write>(stream: &mut W, mut response: Response) -> io::Result<()> {
    let status = response.status_code();
    write!(
        stream,
        "HTTP/1.1 {} {}\r\nTransfer-Encoding: chunked\r\n",
        status.as_u16(),
        status.reason_phrase()
    )?;
    let mut header_text = String::new();
    response.headers.to_string(&mut header_text);
    stream.write_all(header_text.as_bytes())?;
    stream.write_all(b"\r\n")?;
    stream.flush()?;

    let mut buf = [0u8; 8192];
    loop {
        let n = response.body.read(&mut buf);
        if n == 0 {
            break;
        }
        write!(stream, "{:x}\r\n", n)?;
        stream.write_all(&buf[..n])?;
        stream.write_all(b"\r\n")?;
        stream.flush()?;
    }
    stream.write_all(b"0\r\n\r\n")?;
    stream.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    #[test]
    fn parses_simple_request_line() {
        let line = parse_request_line("GET /path HTTP/1.1\r\n").unwrap();
        assert_eq!(line.method, "GET");
        assert_eq!(line.uri, "/path");
        assert_eq!(line.version, HttpVersion::Http11);
    }

    #[test]
    fn rejects_malformed_request_line() {
        assert!(parse_request_line("GET /path\r\n").is_err());
    }

    #[test]
    fn parses_headers_until_blank_line() {
        let raw = "Host: localhost\r\nContent-Length: 4\r\n\r\n";
        let mut reader = BufReader::new(raw.as_bytes());
        let headers = parse_headers(&mut reader).unwrap();
        assert_eq!(headers.get("host"), "localhost");
        assert_eq!(headers.content_length(), 4);
    }

    #[test]
    fn bad_header_line_is_rejected() {
        let raw = "Hostlocalhost\r\n\r\n";
        let mut reader = BufReader::new(raw.as_bytes());
        assert!(parse_headers(&mut reader).is_err());
    }

    #[test]
    fn reads_chunked_body() {
        let raw = "4\r\nwiki\r\n5\r\npedia\r\n0\r\n\r\n";
        let mut reader = BufReader::new(raw.as_bytes());
        let mut body = read_chunked_body(&mut reader).unwrap();
        assert_eq!(body.read_to_end_string(), "wikipedia");
    }

    #[test]
    fn writes_fixed_response() {
        let response = Response::text(crate::status::StatusCode::OK, "hi");
        let mut out = Vec::new();
        write_fixed_response(&mut out, response).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("content-length: 2\r\n"));
        assert!(text.ends_with("hi"));
    }
}

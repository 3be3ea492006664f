//! A plain, synchronous TCP transport: one thread per connection, a
//! shutdown flag polled between `accept` calls. Grounded on the source's
//! `RestServer`/`SpawnedRestServer` — nonblocking listener plus a
//! sleep-and-poll loop, but each connection gets its own thread instead of
//! being handled inline, since a router's handlers may block.

use std::io::BufReader;
use std::net::{TcpListener, TcpStream, ToSocketAddrs};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, error, warn};

use crate::error::{HttpError, TransportError};
use crate::response::Response;
use crate::router::Application;
use crate::status::StatusCode;
use crate::transport::wire::{
    build_request, extract_framing, parse_headers, parse_request_line, read_chunked_body,
    read_fixed_body, write_fixed_response, Framing,
};

const DEFAULT_BUF_SIZE: usize = 8192;
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A synchronous REST server bound to a socket, serving a single
/// [`Application`] until [`SpawnedRestServer::stop`] is called.
pub struct RestServer<A> {
    listener: TcpListener,
    application: Arc<A>,
    shutdown: Arc<Mutex<bool>>,
    max_payload: usize,
}

impl<A: Application + Send + Sync + 'static> RestServer<A> {
    pub fn new<S: ToSocketAddrs>(addr: S, application: A) -> Result<Self, HttpError> {
        Self::with_max_payload(addr, application, DEFAULT_BUF_SIZE)
    }

    pub fn with_max_payload<S: ToSocketAddrs>(
        addr: S,
        application: A,
        max_payload: usize,
    ) -> Result<Self, HttpError> {
        let listener = TcpListener::bind(addr)?;
        listener.set_nonblocking(true)?;
        Ok(Self {
            listener,
            application: Arc::new(application),
            shutdown: Arc::new(Mutex::new(false)),
            max_payload,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop on the calling thread until stopped. Each
    /// accepted connection is handled on its own spawned thread.
    pub fn start(&self) -> Result<(), HttpError> {
        for incoming in self.listener.incoming() {
            match incoming {
                Ok(stream) => {
                    let application = Arc::clone(&self.application);
                    let max_payload = self.max_payload;
                    thread::spawn(move || {
                        if let Err(err) = handle_connection(&stream, application.as_ref(), max_payload) {
                            warn!("connection handling failed: {err}");
                        }
                    });
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {}
                Err(err) => error!("accept failed: {err}"),
            }

            if *self.shutdown.lock().unwrap() {
                debug!("rest server shutting down");
                break;
            }
            thread::sleep(POLL_INTERVAL);
        }
        Ok(())
    }
}

fn handle_connection<A: Application>(
    stream: &TcpStream,
    application: &A,
    max_payload: usize,
) -> Result<(), TransportError> {
    let mut reader = BufReader::with_capacity(max_payload, stream);
    let mut start_line = String::new();
    let len = std::io::BufRead::read_line(&mut reader, &mut start_line)?;
    if len == 0 {
        return Err(TransportError::NotHttpConform);
    }

    let line = match parse_request_line(&start_line) {
        Ok(line) => line,
        Err(err) => return respond_error(stream, err),
    };

    let headers = match parse_headers(&mut reader) {
        Ok(h) => h,
        Err(err) => return respond_error(stream, err),
    };

    let framing = match extract_framing(&headers) {
        Ok(f) => f,
        Err(err) => return respond_error(stream, err),
    };

    let body = match framing {
        Framing::Fixed(n) if n > max_payload => {
            return respond(stream, Response::text(StatusCode::PAYLOAD_TOO_LARGE, "payload too large\r\n"));
        }
        Framing::Fixed(n) => read_fixed_body(&mut reader, n)?,
        Framing::Chunked => read_chunked_body(&mut reader)?,
        Framing::None => crate::body::BodyCommunicator::new(),
    };

    let request = build_request(line, headers, body);
    let response = match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| application.serve(&request))) {
        Ok(response) => response,
        Err(_) => Response::text(StatusCode::INTERNAL_SERVER_ERROR, "<html><body>500 Internal Server Error</body></html>"),
    };
    respond(stream, response)
}

fn respond(mut stream: &TcpStream, response: Response) -> Result<(), TransportError> {
    write_fixed_response(&mut stream, response).map_err(TransportError::from)
}

fn respond_error(stream: &TcpStream, err: TransportError) -> Result<(), TransportError> {
    let response = match &err {
        TransportError::NotHttpConform => Response::text(StatusCode::BAD_REQUEST, "not an HTTP conformant request\r\n"),
        TransportError::UnsupportedVersion(v) => {
            Response::text(StatusCode::HTTP_VERSION_NOT_SUPPORTED, format!("version {v} not supported\r\n"))
        }
        TransportError::BadHeader(line) => Response::text(StatusCode::BAD_REQUEST, format!("malformed header: {line}\r\n")),
        TransportError::InvalidLength => Response::text(StatusCode::LENGTH_REQUIRED, "invalid content-length\r\n"),
        TransportError::BrokenChunk => Response::text(StatusCode::BAD_REQUEST, "invalid chunked encoding\r\n"),
        TransportError::Io(io_err) => Response::text(StatusCode::INTERNAL_SERVER_ERROR, format!("io error: {io_err}\r\n")),
    };
    respond(stream, response)
}

/// A [`RestServer`] running on a dedicated thread, stoppable from the
/// owning thread.
pub struct SpawnedRestServer {
    handle: Option<JoinHandle<Result<(), HttpError>>>,
    stop: Arc<Mutex<bool>>,
}

impl SpawnedRestServer {
    pub fn spawn<A: Application + Send + Sync + 'static>(
        server: RestServer<A>,
        stack_size: usize,
    ) -> Result<Self, HttpError> {
        let stop = Arc::clone(&server.shutdown);
        let handle = thread::Builder::new()
            .stack_size(stack_size)
            .spawn(move || server.start())?;
        Ok(Self {
            handle: Some(handle),
            stop,
        })
    }

    pub fn stop(&self) {
        *self.stop.lock().unwrap() = true;
    }

    pub fn is_stopped(&self) -> bool {
        *self.stop.lock().unwrap()
    }
}

impl Drop for SpawnedRestServer {
    fn drop(&mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

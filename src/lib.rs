//! A small, synchronous HTTP toolkit: a tri-modal body, case-insensitive
//! headers, a URI path traverser, and a composable valve algebra for
//! routing — plus a plain-socket transport to drive it all.
//!
//! The pieces compose the way the module names suggest: a [`Request`]
//! carries a [`body::BodyCommunicator`] and [`headers::RequestHeaders`];
//! routing walks a [`context::Context`]'s [`path::PathTraverser`] through
//! a tree of [`valve::Valve`]s; a [`router::Application`] turns that into
//! a full [`Response`].

pub mod body;
pub mod context;
pub mod error;
pub mod handler;
pub mod headers;
pub mod path;
pub mod request;
pub mod response;
pub mod router;
pub mod status;
pub mod transport;
pub mod valve;

pub use body::BodyCommunicator;
pub use context::Context;
pub use error::HttpError;
pub use request::Request;
pub use response::Response;
pub use router::{Application, DynamicRouter, StaticRouter};
pub use status::StatusCode;
pub use transport::{RestServer, SpawnedRestServer};
pub use valve::Valve;

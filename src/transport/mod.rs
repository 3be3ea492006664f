//! Transport adapters: turning bytes from some outside world into a
//! [`Request`](crate::request::Request) and a router's [`Response`](crate::response::Response)
//! back into bytes (spec §6).

pub mod cgi;
pub mod socket;
pub mod wire;

pub use socket::{RestServer, SpawnedRestServer};

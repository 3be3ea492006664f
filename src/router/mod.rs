//! Routers: things that take a request, try a sequence of routes in
//! order, and stop at the first one that matches (spec §4.8, §4.9).
//!
//! A router can be used two ways: as a **valve** nested inside a larger
//! chain (a sub-router — if nothing inside it matches, control falls
//! through to whatever comes next, no 404 is raised), or as the top-level
//! **application** driving a transport (nothing matching *is* the final
//! answer, so a 404 is synthesized).

pub mod dynamic;
pub mod static_router;

pub use dynamic::DynamicRouter;
pub use static_router::StaticRouter;

use crate::context::Context;
use crate::handler::{into_dyn_handler, DynHandler};
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::status::StatusCode;
use crate::valve::Valve;

/// A single `valve + handler` pair: matching the valve runs the handler.
pub struct Route<V> {
    valve: V,
    handler: DynHandler,
}

impl<V: Valve> Route<V> {
    pub fn new<F, R>(valve: V, handler: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> R + Send + Sync + 'static,
        R: IntoResponse + 'static,
    {
        Self {
            valve,
            handler: into_dyn_handler(handler),
        }
    }
}

impl<V: Valve> Valve for Route<V> {
    fn evaluate(&self, ctx: &mut Context<'_>) -> bool {
        if self.valve.evaluate(ctx) {
            ctx.current_route = Some(self.valve.describe());
            (self.handler)(ctx);
            true
        } else {
            false
        }
    }

    fn describe(&self) -> String {
        self.valve.describe()
    }
}

/// Drives a top-level router against a freshly parsed [`Request`],
/// producing a complete [`Response`] — including synthesizing a `404` if
/// nothing matched. Implemented by both router flavors.
pub trait Application {
    fn serve(&self, request: &Request) -> Response;
}

impl<T: Valve> Application for T {
    fn serve(&self, request: &Request) -> Response {
        let mut ctx = Context::new(request);
        if !self.evaluate(&mut ctx) || ctx.unhandled() {
            return Response::text(StatusCode::NOT_FOUND, "404 Not Found\r\n");
        }
        ctx.response
    }
}

//! Runtime route dispatch: routes are type-erased and stored in a `Vec`,
//! tried in registration order (spec §4.9) — the same linear-scan,
//! first-match shape as the source's route table, generalized from
//! literal path segments to arbitrary valves.

use crate::context::Context;
use crate::response::IntoResponse;
use crate::router::Route;
use crate::valve::{DynValve, Valve};

/// A router built up at runtime via [`DynamicRouter::route`]. Used as a
/// sub-router (a [`Valve`]) it falls through silently when nothing
/// matches; used as the top-level [`crate::router::Application`] it
/// raises `404` instead, same as [`crate::router::static_router::StaticRouter`].
#[derive(Clone, Default)]
pub struct DynamicRouter {
    routes: Vec<DynValve>,
}

impl DynamicRouter {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registers a route, matched by `valve` and served by `handler`.
    /// Returns `self` so routes can be chained fluently, mirroring the
    /// builder style the rest of the crate uses for setup.
    pub fn route<F, R>(mut self, valve: impl Valve + 'static, handler: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> R + Send + Sync + 'static,
        R: IntoResponse + 'static,
    {
        self.routes.push(DynValve::new(Route::new(valve, handler)));
        self
    }

    /// Mounts another valve (often a [`StaticRouter`](crate::router::StaticRouter)
    /// or nested `DynamicRouter`) as one of this router's routes, tried in
    /// the position it was added.
    pub fn mount(mut self, valve: impl Valve + 'static) -> Self {
        self.routes.push(DynValve::new(valve));
        self
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Valve for DynamicRouter {
    fn evaluate(&self, ctx: &mut Context<'_>) -> bool {
        for route in &self.routes {
            let before = ctx.path.branch();
            route.evaluate(ctx);
            if !ctx.response.empty() {
                return true;
            }
            ctx.path = before;
        }
        false
    }

    fn describe(&self) -> String {
        let parts: Vec<String> = self.routes.iter().map(Valve::describe).collect();
        format!("dynamic[{}]", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{HttpVersion, Request};
    use crate::router::Application;
    use crate::status::StatusCode;
    use crate::valve::{root, segment, GET, POST};

    #[test]
    fn empty_router_is_404_as_application() {
        let router = DynamicRouter::new();
        let req = Request::new("GET", "/", HttpVersion::Http11);
        let response = router.serve(&req);
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn empty_router_does_not_match_as_sub_valve() {
        let router = DynamicRouter::new();
        let req = Request::new("GET", "/", HttpVersion::Http11);
        let mut ctx = Context::new(&req);
        assert!(!router.evaluate(&mut ctx));
        assert!(ctx.unhandled());
    }

    #[test]
    fn dispatches_to_matching_route() {
        let router = DynamicRouter::new()
            .route(GET.and(root()).and(segment("hi")), |_ctx: &mut Context<'_>| "hi".to_string())
            .route(POST.and(root()).and(segment("echo")), |ctx: &mut Context<'_>| {
                ctx.request.body.data().unwrap_or("").to_string()
            });

        let req = Request::new("GET", "/hi", HttpVersion::Http11);
        let response = router.serve(&req);
        assert_eq!(response.body.data(), Some("hi"));
    }

    #[test]
    fn first_registered_route_wins_on_overlap() {
        let router = DynamicRouter::new()
            .route(GET.and(root()), |_ctx: &mut Context<'_>| "first".to_string())
            .route(GET.and(root()), |_ctx: &mut Context<'_>| "second".to_string());

        let req = Request::new("GET", "/", HttpVersion::Http11);
        let response = router.serve(&req);
        assert_eq!(response.body.data(), Some("first"));
    }
}

//! Adapting a route's callback into something a router can call uniformly
//! (spec §4.7). A handler sees the mutable [`Context`] and may either
//! return a value that converts into a [`Response`](crate::response::Response)
//! or mutate `ctx.response` directly and return `()`.

use std::sync::Arc;

use crate::context::Context;
use crate::response::IntoResponse;

/// Type-erased handler, ready to be stored in a router.
pub type DynHandler = Arc<dyn Fn(&mut Context<'_>) + Send + Sync>;

/// Wraps a typed handler function into a [`DynHandler`], applying its
/// return value to `ctx.response` when it produced one.
pub fn into_dyn_handler<F, R>(f: F) -> DynHandler
where
    F: Fn(&mut Context<'_>) -> R + Send + Sync + 'static,
    R: IntoResponse + 'static,
{
    Arc::new(move |ctx| {
        if let Some(response) = f(ctx).into_response_opt() {
            ctx.response = response;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{HttpVersion, Request};
    use crate::status::StatusCode;

    #[test]
    fn handler_returning_value_sets_response() {
        let handler = into_dyn_handler(|_ctx: &mut Context<'_>| "hi".to_string());
        let req = Request::new("GET", "/", HttpVersion::Http11);
        let mut ctx = Context::new(&req);
        handler(&mut ctx);
        assert_eq!(ctx.response.body.data(), Some("hi"));
        assert_eq!(ctx.response.status_code(), StatusCode::OK);
    }

    #[test]
    fn handler_returning_unit_leaves_response_alone() {
        let handler = into_dyn_handler(|ctx: &mut Context<'_>| {
            ctx.response.set_status_code(StatusCode::ACCEPTED);
        });
        let req = Request::new("GET", "/", HttpVersion::Http11);
        let mut ctx = Context::new(&req);
        handler(&mut ctx);
        assert_eq!(ctx.response.status_code(), StatusCode::ACCEPTED);
    }
}

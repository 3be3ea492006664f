//! The mutable context threaded through a valve chain (spec §4.5, §4.6).

use crate::path::PathTraverser;
use crate::request::Request;
use crate::response::Response;

/// Everything a valve or handler can see and mutate while a request is
/// being routed: the immutable request, the response being built up, the
/// path traverser recording how much of the URI has been consumed, and a
/// description of whichever route is currently being tried (introspection
/// only — never dereferenced, just a label for logging/error messages).
pub struct Context<'r> {
    pub request: &'r Request,
    pub response: Response,
    pub path: PathTraverser,
    pub current_route: Option<String>,
}

impl<'r> Context<'r> {
    pub fn new(request: &'r Request) -> Self {
        Self {
            path: PathTraverser::new(&request.uri),
            request,
            response: Response::new(),
            current_route: None,
        }
    }

    /// True iff no valve or handler has produced a response yet.
    pub fn unhandled(&self) -> bool {
        self.response.empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::HttpVersion;

    #[test]
    fn fresh_context_is_unhandled_and_at_beginning() {
        let req = Request::new("GET", "/a/b", HttpVersion::Http11);
        let ctx = Context::new(&req);
        assert!(ctx.unhandled());
        assert!(ctx.path.at_beginning());
    }
}

//! Composable routing predicates (spec §4.6), modeled on the source's
//! valve algebra: a valve inspects and may advance the context's path
//! traverser, returning whether it matched. `And`/`Or`/`Xor` combine two
//! valves into a third, generic over the concrete valve types so the
//! whole chain can be built at compile time with no indirection — the
//! same shape as a static route tree. [`DynValve`] gives up that
//! monomorphization for a `Vec`/`Box`-friendly type when routes are
//! assembled at runtime instead.

use std::ops::{BitAnd, BitOr, BitXor};
use std::sync::Arc;

use crate::context::Context;

/// A single routing predicate. `evaluate` may consume path segments (via
/// `ctx.path`) and/or write into `ctx.response`; returning `false` means
/// "this valve doesn't match," and a well-behaved valve leaves the path
/// traverser exactly where it found it when it returns `false`.
pub trait Valve: Send + Sync {
    fn evaluate(&self, ctx: &mut Context<'_>) -> bool;

    /// Short human label for introspection/logging. Default falls back to
    /// the type name, which is rarely useful — named valves override it.
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }

    fn and<R: Valve>(self, rhs: R) -> And<Self, R>
    where
        Self: Sized,
    {
        And(self, rhs)
    }

    fn or<R: Valve>(self, rhs: R) -> Or<Self, R>
    where
        Self: Sized,
    {
        Or(self, rhs)
    }

    fn xor<R: Valve>(self, rhs: R) -> Xor<Self, R>
    where
        Self: Sized,
    {
        Xor(self, rhs)
    }
}

impl<F> Valve for F
where
    F: Fn(&mut Context<'_>) -> bool + Send + Sync,
{
    fn evaluate(&self, ctx: &mut Context<'_>) -> bool {
        self(ctx)
    }
}

/// Both sides must match, left to right. `R` only runs if `L` matched, and
/// since `L` already committed its traversal on success there's nothing to
/// roll back.
pub struct And<L, R>(pub L, pub R);

impl<L: Valve, R: Valve> Valve for And<L, R> {
    fn evaluate(&self, ctx: &mut Context<'_>) -> bool {
        self.0.evaluate(ctx) && self.1.evaluate(ctx)
    }

    fn describe(&self) -> String {
        format!("({} && {})", self.0.describe(), self.1.describe())
    }
}

/// Either side may match. `L` runs against a branch of the path traverser
/// so that, if it fails, none of its partial progress leaks into the
/// attempt at `R` — only a successful branch's position is committed back.
pub struct Or<L, R>(pub L, pub R);

impl<L: Valve, R: Valve> Valve for Or<L, R> {
    fn evaluate(&self, ctx: &mut Context<'_>) -> bool {
        let saved = ctx.path.branch();
        if self.0.evaluate(ctx) {
            return true;
        }
        ctx.path = saved;
        self.1.evaluate(ctx)
    }

    fn describe(&self) -> String {
        format!("({} || {})", self.0.describe(), self.1.describe())
    }
}

/// Exactly one side matches. Both sides always run, each against its own
/// branch of the traverser; the winning side's position is committed.
pub struct Xor<L, R>(pub L, pub R);

impl<L: Valve, R: Valve> Valve for Xor<L, R> {
    fn evaluate(&self, ctx: &mut Context<'_>) -> bool {
        let start = ctx.path.branch();

        let left = self.0.evaluate(ctx);
        let left_path = ctx.path.branch();

        ctx.path = start.clone();
        let right = self.1.evaluate(ctx);
        let right_path = ctx.path.branch();

        match (left, right) {
            (true, false) => {
                ctx.path = left_path;
                true
            }
            (false, true) => {
                ctx.path = right_path;
                true
            }
            _ => {
                ctx.path = start;
                false
            }
        }
    }

    fn describe(&self) -> String {
        format!("({} ^ {})", self.0.describe(), self.1.describe())
    }
}

/// Type-erased valve, for routes assembled at runtime (the dynamic
/// router). Cheap to clone: it's just a reference-counted trait object.
#[derive(Clone)]
pub struct DynValve(Arc<dyn Valve>);

impl DynValve {
    pub fn new(valve: impl Valve + 'static) -> Self {
        Self(Arc::new(valve))
    }
}

impl Valve for DynValve {
    fn evaluate(&self, ctx: &mut Context<'_>) -> bool {
        self.0.evaluate(ctx)
    }

    fn describe(&self) -> String {
        self.0.describe()
    }
}

impl BitAnd for DynValve {
    type Output = DynValve;
    fn bitand(self, rhs: DynValve) -> DynValve {
        DynValve::new(And(self, rhs))
    }
}

impl BitOr for DynValve {
    type Output = DynValve;
    fn bitor(self, rhs: DynValve) -> DynValve {
        DynValve::new(Or(self, rhs))
    }
}

impl BitXor for DynValve {
    type Output = DynValve;
    fn bitxor(self, rhs: DynValve) -> DynValve {
        DynValve::new(Xor(self, rhs))
    }
}

/// Matches only at the root of the path (no segments consumed yet).
pub struct Root;

impl Valve for Root {
    fn evaluate(&self, ctx: &mut Context<'_>) -> bool {
        ctx.path.at_beginning()
    }

    fn describe(&self) -> String {
        "root".to_string()
    }
}

pub fn root() -> Root {
    Root
}

/// Matches requests whose method equals `name`, case-sensitively — HTTP
/// methods are uppercase by convention and a lowercase token is a
/// distinct (and likely malformed) method, not an alias.
pub struct Method(pub &'static str);

impl Valve for Method {
    fn evaluate(&self, ctx: &mut Context<'_>) -> bool {
        ctx.request.method == self.0
    }

    fn describe(&self) -> String {
        format!("method({})", self.0)
    }
}

pub fn method(name: &'static str) -> Method {
    Method(name)
}

pub const GET: Method = Method("GET");
pub const POST: Method = Method("POST");
pub const PUT: Method = Method("PUT");
pub const PATCH: Method = Method("PATCH");
pub const DELETE: Method = Method("DELETE");
/// Alias for [`DELETE`].
pub const DEL: Method = Method("DELETE");
pub const HEAD: Method = Method("HEAD");
pub const OPTIONS: Method = Method("OPTIONS");

/// Matches and consumes a single, literal path segment.
pub struct Segment(pub &'static str);

impl Valve for Segment {
    fn evaluate(&self, ctx: &mut Context<'_>) -> bool {
        ctx.path.check_segment(self.0)
    }

    fn describe(&self) -> String {
        format!("segment({})", self.0)
    }
}

pub fn segment(slug: &'static str) -> Segment {
    Segment(slug)
}

/// Matches only once every path segment has been consumed.
pub struct End;

impl Valve for End {
    fn evaluate(&self, ctx: &mut Context<'_>) -> bool {
        ctx.path.at_end()
    }

    fn describe(&self) -> String {
        "end".to_string()
    }
}

pub fn end() -> End {
    End
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{HttpVersion, Request};

    fn ctx(req: &Request) -> Context<'_> {
        Context::new(req)
    }

    #[test]
    fn and_requires_both() {
        let req = Request::new("GET", "/a", HttpVersion::Http11);
        let mut c = ctx(&req);
        assert!(GET.and(segment("a")).evaluate(&mut c));
    }

    #[test]
    fn and_short_circuits_on_method_mismatch() {
        let req = Request::new("POST", "/a", HttpVersion::Http11);
        let mut c = ctx(&req);
        assert!(!GET.and(segment("a")).evaluate(&mut c));
        assert!(c.path.at_beginning());
    }

    #[test]
    fn or_does_not_leak_failed_left_progress() {
        let req = Request::new("GET", "/b", HttpVersion::Http11);
        let mut c = ctx(&req);
        assert!(segment("a").or(segment("b")).evaluate(&mut c));
        assert!(c.path.at_end());
    }

    #[test]
    fn or_first_match_wins_without_running_second() {
        let req = Request::new("GET", "/a", HttpVersion::Http11);
        let mut c = ctx(&req);
        assert!(segment("a").or(segment("a")).evaluate(&mut c));
        assert_eq!(c.path.remaining().len(), 0);
    }

    #[test]
    fn xor_true_when_exactly_one_matches() {
        let req = Request::new("GET", "/a", HttpVersion::Http11);
        let mut c = ctx(&req);
        assert!(segment("a").xor(segment("z")).evaluate(&mut c));
    }

    #[test]
    fn xor_false_when_both_match() {
        struct AlwaysTrue;
        impl Valve for AlwaysTrue {
            fn evaluate(&self, _ctx: &mut Context<'_>) -> bool {
                true
            }
        }
        let req = Request::new("GET", "/a", HttpVersion::Http11);
        let mut c = ctx(&req);
        assert!(!AlwaysTrue.xor(AlwaysTrue).evaluate(&mut c));
    }

    #[test]
    fn xor_false_when_neither_matches() {
        let req = Request::new("GET", "/a", HttpVersion::Http11);
        let mut c = ctx(&req);
        assert!(!segment("x").xor(segment("y")).evaluate(&mut c));
    }

    #[test]
    fn dyn_valve_operators_compose() {
        let req = Request::new("GET", "/a", HttpVersion::Http11);
        let mut c = ctx(&req);
        let v = DynValve::new(GET) & DynValve::new(segment("a"));
        assert!(v.evaluate(&mut c));
    }

    #[test]
    fn root_matches_only_at_start() {
        let req = Request::new("GET", "/a", HttpVersion::Http11);
        let mut c = ctx(&req);
        assert!(root().evaluate(&mut c));
        c.path.next();
        assert!(!root().evaluate(&mut c));
    }
}

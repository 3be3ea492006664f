//! Compile-time route dispatch: a tuple of routes, tried in declaration
//! order, each a distinct generic type so the whole chain monomorphizes
//! with no virtual dispatch (spec §4.8).

use crate::context::Context;
use crate::valve::Valve;

/// Thin wrapper so `StaticRouter((a, b, c))` reads the same way
/// [`crate::router::DynamicRouter`] does, even though the real dispatch
/// lives in the `Valve` impls generated below for the tuple itself.
pub struct StaticRouter<T>(pub T);

impl<T: Valve> Valve for StaticRouter<T> {
    fn evaluate(&self, ctx: &mut Context<'_>) -> bool {
        self.0.evaluate(ctx)
    }

    fn describe(&self) -> String {
        self.0.describe()
    }
}

macro_rules! impl_valve_for_tuple {
    ($($name:ident),+) => {
        impl<$($name: Valve),+> Valve for ($($name,)+) {
            #[allow(non_snake_case)]
            fn evaluate(&self, ctx: &mut Context<'_>) -> bool {
                let ($($name,)+) = self;
                $(
                    let before = ctx.path.branch();
                    $name.evaluate(ctx);
                    if !ctx.response.empty() {
                        return true;
                    }
                    ctx.path = before;
                )+
                false
            }

            #[allow(non_snake_case)]
            fn describe(&self) -> String {
                let ($($name,)+) = self;
                let parts: Vec<String> = vec![$($name.describe()),+];
                format!("static[{}]", parts.join(", "))
            }
        }
    };
}

impl_valve_for_tuple!(A);
impl_valve_for_tuple!(A, B);
impl_valve_for_tuple!(A, B, C);
impl_valve_for_tuple!(A, B, C, D);
impl_valve_for_tuple!(A, B, C, D, E);
impl_valve_for_tuple!(A, B, C, D, E, F);
impl_valve_for_tuple!(A, B, C, D, E, F, G);
impl_valve_for_tuple!(A, B, C, D, E, F, G, H);
impl_valve_for_tuple!(A, B, C, D, E, F, G, H, I);
impl_valve_for_tuple!(A, B, C, D, E, F, G, H, I, J);
impl_valve_for_tuple!(A, B, C, D, E, F, G, H, I, J, K);
impl_valve_for_tuple!(A, B, C, D, E, F, G, H, I, J, K, L);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{HttpVersion, Request};
    use crate::router::Route;
    use crate::router::Application;
    use crate::valve::{root, segment, GET};

    #[test]
    fn first_matching_route_wins() {
        let router = StaticRouter((
            Route::new(GET.and(root()).and(segment("a")), |_ctx: &mut Context<'_>| "page a".to_string()),
            Route::new(GET.and(root()).and(segment("b")), |_ctx: &mut Context<'_>| "page b".to_string()),
        ));

        let req = Request::new("GET", "/b", HttpVersion::Http11);
        let response = router.serve(&req);
        assert_eq!(response.body.data(), Some("page b"));
    }

    #[test]
    fn no_match_yields_404() {
        let router = StaticRouter((Route::new(
            GET.and(root()).and(segment("a")),
            |_ctx: &mut Context<'_>| "page a".to_string(),
        ),));

        let req = Request::new("GET", "/missing", HttpVersion::Http11);
        let response = router.serve(&req);
        assert_eq!(response.status_code(), crate::status::StatusCode::NOT_FOUND);
    }
}

mod common;

use common::{body_of, get, post, start_server};
use valve_http::context::Context;
use valve_http::router::DynamicRouter;
use valve_http::status::StatusCode;
use valve_http::valve::{end, root, segment, Valve, GET, POST};

#[test]
fn static_route_matches() {
    let router = DynamicRouter::new().route(
        GET.and(root()).and(segment("page")).and(segment("1")).and(end()),
        |_ctx: &mut Context<'_>| "page 1".to_string(),
    );
    let (port, _server) = start_server(router);

    let mut response = get(port, "/page/1");
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(body_of(&mut response), "page 1");
}

#[test]
fn unmatched_route_is_404() {
    let router = DynamicRouter::new().route(
        GET.and(root()).and(segment("page")),
        |_ctx: &mut Context<'_>| "page".to_string(),
    );
    let (port, _server) = start_server(router);

    let response = get(port, "/nowhere");
    assert_eq!(response.status().as_u16(), 404);
}

#[test]
fn dynamic_route_matches() {
    let router = DynamicRouter::new().route(
        GET.and(root()).and(segment("hi")).and(end()),
        |_ctx: &mut Context<'_>| "hi".to_string(),
    );
    let (port, _server) = start_server(router);

    let mut response = get(port, "/hi");
    assert_eq!(body_of(&mut response), "hi");
}

#[test]
fn post_body_is_echoed() {
    let router = DynamicRouter::new().route(
        POST.and(root()).and(segment("echo")).and(end()),
        |ctx: &mut Context<'_>| ctx.request.body.data().unwrap_or("").to_string(),
    );
    let (port, _server) = start_server(router);

    let mut response = post(port, "/echo", "abc");
    assert_eq!(body_of(&mut response), "abc");
}

#[test]
fn handler_panic_becomes_500() {
    let router = DynamicRouter::new().route(
        GET.and(root()).and(segment("boom")).and(end()),
        |_ctx: &mut Context<'_>| -> String { panic!("boom") },
    );
    let (port, _server) = start_server(router);

    let mut response = get(port, "/boom");
    assert_eq!(response.status().as_u16(), 500);
    assert!(body_of(&mut response).contains("500"));

    // the connection's thread panicked independently; the listener keeps
    // serving later connections regardless.
    let mut follow_up = get(port, "/boom");
    assert_eq!(follow_up.status().as_u16(), 500);
}

#[test]
fn response_gets_default_headers() {
    let router = DynamicRouter::new().route(
        GET.and(root()).and(segment("headers")).and(end()),
        |_ctx: &mut Context<'_>| "hi".to_string(),
    );
    let (port, _server) = start_server(router);

    let response = get(port, "/headers");
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/html; charset=utf-8"
    );
    assert_eq!(response.headers().get("content-length").unwrap(), "2");
}

#[test]
fn teapot_status_has_correct_phrase() {
    assert_eq!(StatusCode::IM_A_TEAPOT.reason_phrase(), "I'm a teapot");
}

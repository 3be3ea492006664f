use std::io::Cursor;
use std::sync::{Arc, Mutex};

use valve_http::context::Context;
use valve_http::router::{Application, DynamicRouter};
use valve_http::status::StatusCode;
use valve_http::valve::{end, root, segment, Valve, GET};
use valve_http::{BodyCommunicator, HttpError, RestServer};

fn empty(_ctx: &mut Context<'_>) -> StatusCode {
    StatusCode::NO_CONTENT
}

fn greeting(ctx: &mut Context<'_>) {
    let stream = Arc::new(Mutex::new(Cursor::new(b"Hello\r\nWorld\r\n".to_vec())));
    ctx.response.body = BodyCommunicator::from_stream(stream);
}

fn bad(_ctx: &mut Context<'_>) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, "This was bad\r\n".to_string())
}

fn slow(ctx: &mut Context<'_>) -> String {
    let count: usize = ctx.request.query().unwrap_or("10").parse().unwrap_or(10);
    let mut out = String::new();
    for i in 1..=count {
        out.push_str(&format!("Call number {i}\r\n"));
    }
    out
}

fn main() -> Result<(), HttpError> {
    env_logger::init();

    let router = DynamicRouter::new()
        .route(GET.and(root()).and(end()), empty)
        .route(GET.and(root()).and(segment("bad")), bad)
        .route(GET.and(root()).and(segment("greeting")), greeting)
        .route(GET.and(root()).and(segment("slow")), slow);

    let server = RestServer::new("0.0.0.0:8080", router)?;
    server.start()
}

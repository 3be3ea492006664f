use isahc::{ReadResponseExt, Request, RequestExt, Response};
use valve_http::router::DynamicRouter;
use valve_http::transport::RestServer;
use valve_http::SpawnedRestServer;

#[allow(dead_code)]
pub fn start_server(router: DynamicRouter) -> (u16, SpawnedRestServer) {
    let port = portpicker::pick_unused_port().expect("no free port");
    let server = RestServer::new(format!("0.0.0.0:{port}"), router).unwrap();
    let spawned = SpawnedRestServer::spawn(server, 2 * 1024 * 1024).unwrap();
    // give the accept loop a moment to bind before the first request lands.
    std::thread::sleep(std::time::Duration::from_millis(150));
    (port, spawned)
}

#[allow(dead_code)]
pub fn get(port: u16, path: &str) -> Response<isahc::Body> {
    isahc::get(format!("http://localhost:{port}{path}")).unwrap()
}

#[allow(dead_code)]
pub fn post(port: u16, path: &str, body: &str) -> Response<isahc::Body> {
    isahc::post(format!("http://localhost:{port}{path}"), body.to_string()).unwrap()
}

#[allow(dead_code)]
pub fn body_of(response: &mut Response<isahc::Body>) -> String {
    response.text().unwrap()
}

#[allow(dead_code)]
pub fn get_with_header(port: u16, path: &str, name: &str, value: &str) -> Response<isahc::Body> {
    Request::get(format!("http://localhost:{port}{path}"))
        .header(name, value)
        .body(())
        .unwrap()
        .send()
        .unwrap()
}

#![allow(missing_docs, unused_crate_dependencies)]

use brick::{Request, Response, Server};

fn hello(_rq: &Request) -> Response {
    Response::from_string("Hello, World!")
        .with_header("Content-Length", "13")
        .with_header("Content-Type", "text/plain")
}

fn mirror(rq: &Request) -> Response {
    let body = String::from_utf8_lossy(rq.body()).into_owned();
    Response::from_string(body.clone())
        .with_header("Content-Length", body.len().to_string())
        .with_header("Content-Type", "text/plain")
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut server = Server::new();
    let _ = server.route("/", "GET", hello).route("/mirror", "POST", mirror);

    println!("Now listening on http://localhost:3000/");
    server.start(3000);
}

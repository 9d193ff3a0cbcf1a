use std::io::{ErrorKind, Read, Write};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use brick::{Request, Response, Server, ServerConfig, ShutdownHandle};

/// A served [`Server`] on a random localhost port, stopped on drop
pub(crate) struct TestServer {
    addr: SocketAddr,
    handle: ShutdownHandle,
    serve: Option<JoinHandle<std::io::Result<()>>>,
}

impl TestServer {
    pub(crate) fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub(crate) fn handle(&self) -> &ShutdownHandle {
        &self.handle
    }

    /// Shuts down and waits for `serve()` to return
    pub(crate) fn stop(mut self) -> std::io::Result<()> {
        self.handle.shutdown();
        self.serve
            .take()
            .map_or(Ok(()), |jh| jh.join().expect("serve thread panicked"))
    }

    /// Waits up to 5 seconds for the open connection count to reach `nb`
    pub(crate) fn wait_for_connections(&self, nb: usize) -> bool {
        let now = Instant::now();
        while now.elapsed() < Duration::from_secs(5) {
            if self.handle.num_connections() == nb {
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
        false
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.shutdown();
        if let Some(jh) = self.serve.take() {
            let _ = jh.join();
        }
    }
}

/// Config for tests: localhost, few workers, short wait timeout
pub(crate) fn config() -> ServerConfig {
    ServerConfig {
        ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
        worker_thread_nr: 4,
        wait_timeout: Duration::from_millis(50),
        ..ServerConfig::default()
    }
}

/// Listens on port `0` and serves in a background thread
pub(crate) fn spawn_server<F>(config: ServerConfig, setup: F) -> TestServer
where
    F: FnOnce(&mut Server),
{
    let _ = env_logger::builder().is_test(true).try_init();

    let mut server = Server::with_config(config);
    setup(&mut server);

    let server = server.listen(0).unwrap();
    let addr = server.local_addr();
    let handle = server.shutdown_handle();
    let serve = thread::spawn(move || server.serve());

    TestServer {
        addr,
        handle,
        serve: Some(serve),
    }
}

/// Server with `GET /` answering "hello world" and `POST /mirror` answering the request body
pub(crate) fn hello_world_server() -> TestServer {
    hello_world_server_with(config())
}

pub(crate) fn hello_world_server_with(config: ServerConfig) -> TestServer {
    spawn_server(config, |server| {
        let _ = server
            .route("/", "GET", |_: &Request| Response::from_string("hello world"))
            .route("/mirror", "POST", |rq: &Request| {
                Response::from_string(String::from_utf8_lossy(rq.body()))
            });
    })
}

/// Creates a [`TcpStream`] Client for `addr`
pub(crate) fn create_client(addr: SocketAddr, timeout: Option<Duration>) -> TcpStream {
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(addr),
        socket2::Type::STREAM,
        None,
    )
    .unwrap();

    let timeout = timeout.or(Some(Duration::from_secs(5)));
    socket.set_read_timeout(timeout).unwrap();
    socket.set_write_timeout(timeout).unwrap();
    socket.set_nodelay(true).unwrap();
    socket.connect(&addr.into()).unwrap();
    socket.into()
}

/// Reads until the server closes. A reset after the response still returns the bytes read.
pub(crate) fn read_response(stream: &mut TcpStream) -> String {
    let mut content = Vec::new();
    let mut buf = [0; 1024];
    loop {
        match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(size) => content.extend_from_slice(&buf[..size]),
            Err(err) if err.kind() == ErrorKind::Interrupted => {}
            Err(_) => break,
        }
    }
    String::from_utf8_lossy(&content).into_owned()
}

/// Sends `raw` on a fresh connection and returns the complete answer
pub(crate) fn send(addr: SocketAddr, raw: &[u8]) -> String {
    let mut client = create_client(addr, None);
    client.write_all(raw).unwrap();
    read_response(&mut client)
}

/// Splits a response into status code and body
pub(crate) fn status_and_body(response: &str) -> (u16, &str) {
    let (head, body) = response
        .split_once("\r\n\r\n")
        .unwrap_or_else(|| panic!("no header end in {response:?}"));
    let code = head
        .strip_prefix("HTTP/1.1 ")
        .and_then(|status| status.get(..3))
        .and_then(|code| code.parse().ok())
        .unwrap_or_else(|| panic!("no status line in {response:?}"));
    (code, body)
}

//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed route table keyed by request path and records every path it
//! was asked for. Each connection gets one response and is then closed.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub struct Route {
    /// Status line tail, e.g. "200 OK".
    pub status: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// Content-Length to announce; defaults to the body length. A larger value
    /// makes the server hang up mid-body.
    pub declared_len: Option<usize>,
}

impl Route {
    pub fn ok(content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status: "200 OK".to_string(),
            headers: vec![("Content-Type".to_string(), content_type.to_string())],
            body,
            declared_len: None,
        }
    }

    pub fn status(status: &str, body: &[u8]) -> Self {
        Self {
            status: status.to_string(),
            headers: Vec::new(),
            body: body.to_vec(),
            declared_len: None,
        }
    }

    pub fn redirect(location: &str) -> Self {
        Self {
            status: "302 Found".to_string(),
            headers: vec![("Location".to_string(), location.to_string())],
            body: b"moved".to_vec(),
            declared_len: None,
        }
    }

    pub fn truncated(body: Vec<u8>, declared_len: usize) -> Self {
        Self {
            declared_len: Some(declared_len),
            ..Self::ok("image/png", body)
        }
    }
}

pub struct TestServer {
    port: u16,
    hits: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    /// Starts the server on 127.0.0.1 in a background thread. It runs until the process exits.
    pub fn start(routes: Vec<(&str, Route)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let routes: Arc<HashMap<String, Route>> = Arc::new(
            routes
                .into_iter()
                .map(|(p, r)| (p.to_string(), r))
                .collect(),
        );
        let hits = Arc::new(Mutex::new(Vec::new()));
        let hits_srv = Arc::clone(&hits);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let routes = Arc::clone(&routes);
                let hits = Arc::clone(&hits_srv);
                thread::spawn(move || handle(stream, &routes, &hits));
            }
        });
        Self { port, hits }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Absolute URL for `path` on this server.
    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }

    /// Paths requested so far, in arrival order.
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Route>, hits: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let path = request
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    hits.lock().unwrap().push(path.clone());

    let not_found = Route::status("404 Not Found", b"not found");
    let route = routes.get(&path).unwrap_or(&not_found);
    let declared = route.declared_len.unwrap_or(route.body.len());
    let mut head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        route.status, declared
    );
    for (k, v) in &route.headers {
        head.push_str(&format!("{k}: {v}\r\n"));
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&route.body);
    let _ = stream.flush();
}

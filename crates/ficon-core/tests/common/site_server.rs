//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a mutable table of canned routes keyed by path (query ignored) and
//! records the path and `Cookie` header of every request it receives. Unknown
//! paths answer `404 Not Found` with a text body.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub reason: &'static str,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// Time to wait before answering.
    pub delay: Option<Duration>,
}

impl Route {
    pub fn new(status: u16, reason: &'static str) -> Self {
        Self {
            status,
            reason,
            headers: Vec::new(),
            body: Vec::new(),
            delay: None,
        }
    }

    pub fn image(content_type: &str, body: &[u8]) -> Self {
        Self::new(200, "OK")
            .header("Content-Type", content_type)
            .body(body)
    }

    pub fn html(body: &str) -> Self {
        Self::new(200, "OK")
            .header("Content-Type", "text/html; charset=utf-8")
            .body(body.as_bytes())
    }

    pub fn redirect(status: u16, location: &str) -> Self {
        Self::new(status, "Found").header("Location", location)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: &[u8]) -> Self {
        self.body = body.to_vec();
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// One request as seen by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub path: String,
    pub cookie: Option<String>,
}

#[derive(Clone)]
pub struct SiteServer {
    /// `http://127.0.0.1:<port>/`
    pub base: String,
    /// `127.0.0.1:<port>`, the cache key for this site.
    pub host: String,
    routes: Arc<Mutex<HashMap<String, Route>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl SiteServer {
    /// Absolute URL for `path` (leading slash optional).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }

    pub fn set_route(&self, path: &str, route: Route) {
        self.routes.lock().unwrap().insert(path.to_string(), route);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }

    pub fn cookie_for(&self, path: &str) -> Option<String> {
        self.requests()
            .into_iter()
            .rev()
            .find(|r| r.path == path)
            .and_then(|r| r.cookie)
    }
}

/// Starts a server in a background thread with the given routes. The server
/// runs until the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> SiteServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let table: HashMap<String, Route> = routes
        .into_iter()
        .map(|(p, r)| (p.to_string(), r))
        .collect();
    let server = SiteServer {
        base: format!("http://127.0.0.1:{}/", port),
        host: format!("127.0.0.1:{}", port),
        routes: Arc::new(Mutex::new(table)),
        requests: Arc::new(Mutex::new(Vec::new())),
    };

    let routes = Arc::clone(&server.routes);
    let requests = Arc::clone(&server.requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let requests = Arc::clone(&requests);
            thread::spawn(move || handle(stream, &routes, &requests));
        }
    });
    server
}

fn read_request_head(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.len() > 64 * 1024 {
            return None;
        }
    }
    String::from_utf8(buf).ok()
}

fn handle(
    mut stream: TcpStream,
    routes: &Mutex<HashMap<String, Route>>,
    requests: &Mutex<Vec<Recorded>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let Some(request) = read_request_head(&mut stream) else {
        return;
    };

    let (path, cookie) = parse_request(&request);
    requests.lock().unwrap().push(Recorded {
        path: path.clone(),
        cookie,
    });

    let route = routes
        .lock()
        .unwrap()
        .get(&path)
        .cloned()
        .unwrap_or_else(|| {
            Route::new(404, "Not Found")
                .header("Content-Type", "text/plain")
                .body(b"not found")
        });

    if let Some(delay) = route.delay {
        thread::sleep(delay);
    }

    let mut head = format!("HTTP/1.1 {} {}\r\n", route.status, route.reason);
    for (name, value) in &route.headers {
        head.push_str(&format!("{}: {}\r\n", name, value));
    }
    head.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n",
        route.body.len()
    ));
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&route.body);
    let _ = stream.flush();
}

/// Returns (path without query, optional Cookie header value).
fn parse_request(request: &str) -> (String, Option<String>) {
    let mut lines = request.lines();
    let target = lines
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/");
    let path = target.split('?').next().unwrap_or("/").to_string();
    let mut cookie = None;
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("cookie") {
                cookie = Some(value.trim().to_string());
            }
        }
    }
    (path, cookie)
}

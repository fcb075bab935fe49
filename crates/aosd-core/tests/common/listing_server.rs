//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed table of paths and records every requested path in order,
//! so tests can assert exactly which URLs the pipeline touched.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
struct Route {
    status: u16,
    body: Vec<u8>,
    /// Send the body `chunk` bytes at a time, sleeping `delay` before each chunk.
    pace: Option<(usize, Duration)>,
}

/// Path -> response table plus the request log.
#[derive(Debug, Default)]
pub struct Site {
    routes: HashMap<String, Route>,
}

impl Site {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with status 200 at `path`.
    pub fn page(self, path: &str, body: impl Into<Vec<u8>>) -> Self {
        self.route(path, 200, body)
    }

    pub fn route(mut self, path: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.routes.insert(
            path.to_string(),
            Route {
                status,
                body: body.into(),
                pace: None,
            },
        );
        self
    }

    /// Serve `body` with status 200, sending `chunk` bytes every `delay`.
    pub fn trickle(mut self, path: &str, body: impl Into<Vec<u8>>, chunk: usize, delay: Duration) -> Self {
        self.routes.insert(
            path.to_string(),
            Route {
                status: 200,
                body: body.into(),
                pace: Some((chunk.max(1), delay)),
            },
        );
        self
    }
}

/// Running server handle.
pub struct Running {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Running {
    /// Paths requested so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Starts the server in a background thread. Unknown paths get 404.
/// The server runs until the process exits.
pub fn start(site: Site) -> Running {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes = Arc::new(site.routes);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let log = Arc::clone(&log);
            thread::spawn(move || handle(stream, &routes, &log));
        }
    });
    Running {
        base_url: format!("http://127.0.0.1:{}/", port),
        requests,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    routes: &HashMap<String, Route>,
    log: &Mutex<Vec<String>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("").to_string();
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        return;
    }
    log.lock().unwrap().push(path.clone());

    let (status, body, pace) = match routes.get(&path) {
        Some(r) => (r.status, r.body.as_slice(), r.pace),
        None => (404, &b"not found"[..], None),
    };
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    };
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n",
        status,
        reason,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    match pace {
        None => {
            let _ = stream.write_all(body);
        }
        Some((chunk, delay)) => {
            for piece in body.chunks(chunk) {
                thread::sleep(delay);
                if stream.write_all(piece).and_then(|_| stream.flush()).is_err() {
                    return;
                }
            }
        }
    }
}

/// Directory-index page in the remote site's layout, parent row first.
pub fn listing_page(links: &[&str]) -> String {
    let mut html = String::from(
        "<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 3.2 Final//EN\">\n<html><head><title>Index</title></head><body>\n<table>\n",
    );
    html.push_str("<tr><td valign=\"top\"><a href=\"./../\">Parent Directory</a></td><td>&nbsp;</td></tr>\n");
    for l in links {
        html.push_str(&format!(
            "<tr><td valign=\"top\"><a href=\"{l}\">{l}</a></td><td align=\"right\">2019-08-01 12:00</td></tr>\n"
        ));
    }
    html.push_str("</table>\n</body></html>\n");
    html
}

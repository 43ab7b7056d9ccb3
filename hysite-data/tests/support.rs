//! A single-shot HTTP server for exercising the adapters over loopback.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

/// Server answering exactly one request with a canned response.
#[derive(Debug)]
pub struct CannedServer {
    /// Base URL such as `http://127.0.0.1:PORT`.
    pub base_url: String,
    handle: JoinHandle<String>,
}

impl CannedServer {
    /// Bind an ephemeral loopback port and answer with `status` and a JSON
    /// `body`.
    pub fn respond(status: &str, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
        let addr = listener.local_addr().expect("listener address");
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept connection");
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
            let mut request = String::new();
            let mut content_length = 0_usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).expect("read request line");
                if let Some(value) = line
                    .to_ascii_lowercase()
                    .strip_prefix("content-length:")
                    .map(str::trim)
                {
                    content_length = value.parse().expect("numeric content length");
                }
                let finished = line == "\r\n" || line.is_empty();
                request.push_str(&line);
                if finished {
                    break;
                }
            }
            let mut body = vec![0_u8; content_length];
            reader.read_exact(&mut body).expect("read request body");
            request.push_str(&String::from_utf8_lossy(&body));
            stream
                .write_all(response.as_bytes())
                .expect("write response");
            stream.flush().expect("flush response");
            request
        });
        Self {
            base_url: format!("http://{addr}"),
            handle,
        }
    }

    /// Wait for the request to be served and return its raw text.
    pub fn received(self) -> String {
        self.handle.join().expect("server thread panicked")
    }
}

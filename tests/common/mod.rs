//! Shared test doubles: an in-memory catalog source and a minimal HTTP server

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use coincache::{CatalogEntry, CatalogError, CatalogSource};

pub const SAMPLE_PAYLOAD: &str = r#"[
    {"id":"bitcoin","symbol":"btc","name":"Bitcoin","current_price":50000},
    {"id":"ethereum","symbol":"eth","name":"Ethereum","current_price":3000}
]"#;

pub fn sample_entries() -> Vec<CatalogEntry> {
    serde_json::from_str(SAMPLE_PAYLOAD).expect("sample payload should decode")
}

/// Catalog source that counts calls and can be told to fail
pub struct CountingSource {
    entries: Vec<CatalogEntry>,
    delay: Duration,
    fail: Mutex<bool>,
    calls: AtomicUsize,
}

impl CountingSource {
    pub fn new(entries: Vec<CatalogEntry>, delay: Duration) -> Self {
        Self {
            entries,
            delay,
            fail: Mutex::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for CountingSource {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;

        let fail = *self.fail.lock().unwrap();
        if fail {
            return Err(CatalogError::UpstreamStatus {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                body: "upstream down".to_string(),
            });
        }
        Ok(self.entries.clone())
    }
}

/// Serves one canned HTTP response to every connection
pub struct StubServer {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    last_request_line: Arc<Mutex<Option<String>>>,
}

impl StubServer {
    pub fn start(status_line: &str, body: &str) -> Self {
        Self::start_with_delay(status_line, body, Duration::ZERO)
    }

    pub fn start_with_delay(status_line: &str, body: &str, delay: Duration) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind stub server");
        let addr = listener.local_addr().expect("stub server address");
        let hits = Arc::new(AtomicUsize::new(0));
        let last_request_line = Arc::new(Mutex::new(None));

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );

        let counter = Arc::clone(&hits);
        let request_line = Arc::clone(&last_request_line);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                counter.fetch_add(1, Ordering::SeqCst);
                let head = read_request_head(&mut stream);
                if let Some(line) = head.lines().next() {
                    *request_line.lock().unwrap() = Some(line.to_string());
                }
                thread::sleep(delay);
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });

        Self {
            addr,
            hits,
            last_request_line,
        }
    }

    /// Markets endpoint on this server, without query string
    pub fn url(&self) -> String {
        format!("http://{}/api/v3/coins/markets", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_request_line(&self) -> Option<String> {
        self.last_request_line.lock().unwrap().clone()
    }
}

fn read_request_head(stream: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        let n = stream.read(&mut buf).unwrap_or(0);
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
        if data.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    String::from_utf8_lossy(&data).into_owned()
}

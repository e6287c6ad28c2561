//! Test fixtures and fake page sources for integration testing

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tier_cutoffs::error::Result;
use tier_cutoffs::fetch::{Cursor, PageSource};
use tier_cutoffs::types::{Entry, LeagueRecord};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Page source that replays scripted pages and records requested cursors
#[derive(Default)]
pub struct ScriptedPageSource {
    pages: Mutex<VecDeque<Result<Vec<Entry>>>>,
    cursors: Mutex<Vec<Option<Cursor>>>,
}

impl ScriptedPageSource {
    pub fn new(pages: Vec<Result<Vec<Entry>>>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            cursors: Mutex::new(Vec::new()),
        }
    }

    /// Split a population into pages of `size` followed by an empty page
    pub fn paged(population: Vec<Entry>, size: usize) -> Self {
        let mut pages: Vec<Result<Vec<Entry>>> = population
            .chunks(size)
            .map(|chunk| Ok(chunk.to_vec()))
            .collect();
        pages.push(Ok(Vec::new()));
        Self::new(pages)
    }

    pub fn requested_cursors(&self) -> Vec<Option<Cursor>> {
        self.cursors
            .lock()
            .map(|cursors| cursors.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PageSource for ScriptedPageSource {
    async fn fetch_page(&self, cursor: Option<Cursor>) -> Result<Vec<Entry>> {
        if let Ok(mut cursors) = self.cursors.lock() {
            cursors.push(cursor);
        }
        self.pages
            .lock()
            .ok()
            .and_then(|mut pages| pages.pop_front())
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Descending population where every `unsettled_every`-th player has a high rd
pub fn population(len: usize, unsettled_every: usize) -> Vec<Entry> {
    (0..len)
        .map(|i| {
            let rd = if unsettled_every > 0 && i % unsettled_every == unsettled_every - 1 {
                110.0
            } else {
                55.0
            };
            let mut league =
                LeagueRecord::new(25000.0 - i as f64 * 10.0, "a", 3000.0 - i as f64, rd);
            league.gxe = Some(99.0 - i as f64 * 0.01);
            league.apm = Some(100.0);
            league.pps = Some(2.0);
            league.vs = Some(200.0);
            Entry::new(format!("player_{}", i), league)
        })
        .collect()
}

/// Fresh scratch directory under the system temp dir
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "tier-cutoffs-it-{}-{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

/// Minimal HTTP/1.1 responder: one scripted response per connection
pub struct StubServer {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    /// Serve `(status line, body)` pairs in order, then stop accepting
    pub async fn start(responses: Vec<(&'static str, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
        let addr = listener.local_addr().expect("stub addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();

        tokio::spawn(async move {
            for (status, body) in responses {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };

                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                if let Ok(mut seen) = seen.lock() {
                    seen.push(String::from_utf8_lossy(&buf).to_string());
                }

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self { addr, requests }
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}/api/users/by/league", self.addr)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

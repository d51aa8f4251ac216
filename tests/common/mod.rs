//! In-process reload endpoint for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Status value that makes the endpoint accept the request but never answer.
pub const STALL: u16 = 0;

/// Minimal HTTP responder that counts reload requests.
///
/// Every request is answered with the currently configured status and an
/// empty body; the connection is then closed.
#[derive(Clone)]
pub struct ReloadEndpoint {
    addr: SocketAddr,
    status: Arc<AtomicU16>,
    posts: Arc<AtomicUsize>,
    requests: Arc<AtomicUsize>,
}

impl ReloadEndpoint {
    /// Start listening on an ephemeral local port.
    pub async fn start(status: u16) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = Self {
            addr: listener.local_addr().unwrap(),
            status: Arc::new(AtomicU16::new(status)),
            posts: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(AtomicUsize::new(0)),
        };

        let server = endpoint.clone();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                let server = server.clone();
                tokio::spawn(async move {
                    let _ = server.handle(socket).await;
                });
            }
        });

        endpoint
    }

    /// URL to hand to the reloader.
    pub fn url(&self) -> String {
        format!("http://{}/-/reload", self.addr)
    }

    /// Change the status returned to subsequent requests.
    pub fn set_status(&self, status: u16) {
        self.status.store(status, Ordering::SeqCst);
    }

    /// Number of `POST` requests received.
    pub fn posts(&self) -> usize {
        self.posts.load(Ordering::SeqCst)
    }

    /// Number of requests of any method received.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Wait until at least `count` posts arrived, or panic after `limit`.
    pub async fn wait_for_posts(&self, count: usize, limit: Duration) {
        let deadline = tokio::time::Instant::now() + limit;
        while self.posts() < count {
            assert!(
                tokio::time::Instant::now() < deadline,
                "expected {} reload posts, saw {}",
                count,
                self.posts()
            );
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }

    async fn handle(&self, mut socket: TcpStream) -> std::io::Result<()> {
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut chunk).await?;
            if n == 0 {
                return Ok(());
            }
            request.extend_from_slice(&chunk[..n]);
        }

        self.requests.fetch_add(1, Ordering::SeqCst);
        if request.starts_with(b"POST ") {
            self.posts.fetch_add(1, Ordering::SeqCst);
        }

        let status = self.status.load(Ordering::SeqCst);
        if status == STALL {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            return Ok(());
        }

        let reason = if status == 200 { "OK" } else { "Error" };
        let response = format!(
            "HTTP/1.1 {} {}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
            status, reason
        );
        socket.write_all(response.as_bytes()).await?;
        socket.shutdown().await
    }
}

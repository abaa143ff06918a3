//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use proxy_selector::candidate::{Addressable, Candidate, Markable, Metadatable};
use proxy_selector::{Marker, Metadata};

/// Start a mock HTTP backend on an ephemeral port that always answers
/// `status`.
pub async fn start_mock_backend(status: u16) -> SocketAddr {
    start_programmable_backend(move || async move { status }).await
}

/// Start a mock HTTP backend whose status comes from `f` per request.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = u16> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                let status = f().await;
                respond(socket, status).await;
            });
        }
    });

    addr
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

async fn respond(mut socket: TcpStream, status: u16) {
    // drain the request head so closing does not reset the connection
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => {
                head.extend_from_slice(&buf[..n]);
                if head.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }

    let reason = match status {
        200 => "OK",
        204 => "No Content",
        302 => "Found",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        status, reason
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// Candidate with a marker, metadata and an address.
#[derive(Debug, Default)]
pub struct Peer {
    pub name: &'static str,
    pub address: String,
    pub marker: Marker,
    pub metadata: Metadata,
}

impl Peer {
    pub fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            ..Default::default()
        })
    }

    pub fn at(name: &'static str, address: impl ToString) -> Arc<Self> {
        Arc::new(Self {
            name,
            address: address.to_string(),
            ..Default::default()
        })
    }

    pub fn backup(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            metadata: Metadata::new().with("backup", true),
            ..Default::default()
        })
    }
}

impl Markable for Peer {
    fn marker(&self) -> Option<&Marker> {
        Some(&self.marker)
    }
}

impl Metadatable for Peer {
    fn metadata(&self) -> Option<&Metadata> {
        Some(&self.metadata)
    }
}

impl Addressable for Peer {
    fn address(&self) -> &str {
        &self.address
    }
}

impl Candidate for Peer {
    fn as_markable(&self) -> Option<&dyn Markable> {
        Some(self)
    }

    fn as_metadatable(&self) -> Option<&dyn Metadatable> {
        Some(self)
    }

    fn as_addressable(&self) -> Option<&dyn Addressable> {
        Some(self)
    }
}

/// Candidate with an address but no marker.
#[derive(Debug, Clone)]
pub struct Unmarked(pub String);

impl Addressable for Unmarked {
    fn address(&self) -> &str {
        &self.0
    }
}

impl Candidate for Unmarked {
    fn as_addressable(&self) -> Option<&dyn Addressable> {
        Some(self)
    }
}

pub fn names(picks: &[Arc<Peer>]) -> Vec<&'static str> {
    picks.iter().map(|p| p.name).collect()
}

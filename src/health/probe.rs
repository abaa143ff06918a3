//! Single-shot liveness probes.

use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time;

/// Why a probe failed.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("connect failed: {0}")]
    Connect(#[from] std::io::Error),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("unexpected status code: {0}")]
    UnexpectedStatus(u16),

    #[error("http client unavailable")]
    ClientUnavailable,
}

/// Connect to `address` and close the connection right away.
pub async fn probe_tcp(address: &str, timeout: Duration) -> Result<(), ProbeError> {
    match time::timeout(timeout, TcpStream::connect(address)).await {
        Ok(Ok(stream)) => {
            drop(stream);
            Ok(())
        }
        Ok(Err(e)) => Err(ProbeError::Connect(e)),
        Err(_) => Err(ProbeError::Timeout(timeout)),
    }
}

/// `GET http://<address><path>` and judge the status code.
///
/// With `expect_status` set the status must match it exactly, otherwise any
/// 2xx or 3xx passes. The client carries the timeout.
pub async fn probe_http(
    client: &reqwest::Client,
    address: &str,
    path: &str,
    expect_status: Option<u16>,
    timeout: Duration,
) -> Result<(), ProbeError> {
    let url = probe_url(address, path);
    let response = client.get(&url).send().await.map_err(|e| {
        if e.is_timeout() {
            ProbeError::Timeout(timeout)
        } else {
            ProbeError::Request(e)
        }
    })?;

    let status = response.status().as_u16();
    if status_passes(status, expect_status) {
        Ok(())
    } else {
        Err(ProbeError::UnexpectedStatus(status))
    }
}

/// Probe URL for `address`; an empty path becomes `/`.
pub fn probe_url(address: &str, path: &str) -> String {
    match path {
        "" => format!("http://{}/", address),
        p if p.starts_with('/') => format!("http://{}{}", address, p),
        p => format!("http://{}/{}", address, p),
    }
}

/// Whether `status` counts as healthy.
///
/// A set `expect_status` is matched exactly and is not also required to be
/// 2xx/3xx, so an expected `503` passes on a `503`. Without one, any 2xx or
/// 3xx passes.
pub fn status_passes(status: u16, expect_status: Option<u16>) -> bool {
    match expect_status {
        Some(expected) => status == expected,
        None => (200..400).contains(&status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_url() {
        assert_eq!(probe_url("127.0.0.1:80", ""), "http://127.0.0.1:80/");
        assert_eq!(probe_url("127.0.0.1:80", "/health"), "http://127.0.0.1:80/health");
        assert_eq!(probe_url("host:8080", "ready"), "http://host:8080/ready");
    }

    #[test]
    fn test_status_passes() {
        assert!(status_passes(200, Some(200)));
        assert!(!status_passes(204, Some(200)));
        assert!(status_passes(503, Some(503)));

        assert!(status_passes(204, None));
        assert!(status_passes(302, None));
        assert!(!status_passes(404, None));
        assert!(!status_passes(500, None));
    }

    #[tokio::test]
    async fn test_tcp_probe_against_closed_port() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = probe_tcp(&addr.to_string(), Duration::from_secs(2)).await;
        assert!(matches!(result, Err(ProbeError::Connect(_))), "{:?}", result);
    }

    #[tokio::test]
    async fn test_tcp_probe_against_listener() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        assert!(probe_tcp(&addr.to_string(), Duration::from_secs(2)).await.is_ok());
    }
}

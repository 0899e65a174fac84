//! Status Client - `mntr` four-letter command exchange
//!
//! One short-lived TCP connection per call: connect, send the 4-byte
//! command, read the reply in a single bounded read, close. Retry policy
//! belongs to the caller.

use std::io;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, instrument};

use crate::error::{Error, Result};

/// The four-letter command requesting the monitoring statistics report.
const STATUS_COMMAND: &[u8] = b"mntr";

/// Reply size cap. The server terminates the report by closing the
/// connection; we take whatever a single read returns, up to this cap.
const MAX_REPLY_BYTES: usize = 2048;

/// Fetches raw `mntr` output from a ZooKeeper status port.
#[derive(Debug, Clone)]
pub struct StatusClient {
    addr: String,
    timeout: Duration,
}

impl StatusClient {
    /// Create a client for the given target. No connection is made until
    /// [`fetch`](Self::fetch).
    pub fn new(host: &str, port: u16, timeout: Duration) -> Self {
        Self {
            addr: format!("{}:{}", host, port),
            timeout,
        }
    }

    /// Target address in `host:port` form.
    pub fn address(&self) -> &str {
        &self.addr
    }

    /// Perform one status exchange and return the raw reply bytes.
    ///
    /// The configured timeout bounds the connect and, separately, the
    /// write+read exchange. The connection is closed unconditionally when
    /// this returns.
    ///
    /// # Errors
    ///
    /// [`Error::Connect`] when the target refuses, cannot be resolved, or
    /// the connect times out; [`Error::Read`] when the exchange fails or
    /// times out.
    #[instrument(skip(self), fields(addr = %self.addr))]
    pub async fn fetch(&self) -> Result<Vec<u8>> {
        let stream = timeout(self.timeout, TcpStream::connect(self.addr.as_str()))
            .await
            .map_err(|_| Error::Connect {
                addr: self.addr.clone(),
                source: io::Error::new(io::ErrorKind::TimedOut, "connect timed out"),
            })?
            .map_err(|e| Error::Connect {
                addr: self.addr.clone(),
                source: e,
            })?;

        let reply = timeout(self.timeout, exchange(stream))
            .await
            .map_err(|_| Error::Read {
                addr: self.addr.clone(),
                source: io::Error::new(io::ErrorKind::TimedOut, "status exchange timed out"),
            })?
            .map_err(|e| Error::Read {
                addr: self.addr.clone(),
                source: e,
            })?;

        debug!(bytes = reply.len(), "fetched status report");
        Ok(reply)
    }
}

/// Send the command and take one read's worth of reply. The stream drops
/// (and closes) on return, success or failure.
async fn exchange(mut stream: TcpStream) -> io::Result<Vec<u8>> {
    stream.write_all(STATUS_COMMAND).await?;

    let mut buf = vec![0u8; MAX_REPLY_BYTES];
    let n = stream.read(&mut buf).await?;
    buf.truncate(n);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use assert_matches::assert_matches;
    use tokio::net::TcpListener;
    use tokio::sync::Mutex;

    async fn refused_addr() -> (String, u16) {
        // Bind then drop to find a port nothing is listening on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        ("127.0.0.1".to_string(), port)
    }

    #[tokio::test]
    async fn test_fetch_sends_mntr_command() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut cmd = [0u8; 4];
            stream.read_exact(&mut cmd).await.unwrap();
            sink.lock().await.extend_from_slice(&cmd);
            stream.write_all(b"zk_znode_count\t4\n").await.unwrap();
        });

        let client = StatusClient::new("127.0.0.1", port, Duration::from_secs(1));
        let reply = client.fetch().await.unwrap();

        assert_eq!(reply, b"zk_znode_count\t4\n");
        assert_eq!(received.lock().await.as_slice(), b"mntr");
    }

    #[tokio::test]
    async fn test_fetch_caps_reply_size() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut cmd = [0u8; 4];
            stream.read_exact(&mut cmd).await.unwrap();
            // Oversized report; the client must not drain past its cap
            stream.write_all(&vec![b'a'; 8192]).await.ok();
        });

        let client = StatusClient::new("127.0.0.1", port, Duration::from_secs(1));
        let reply = client.fetch().await.unwrap();

        assert!(!reply.is_empty());
        assert!(reply.len() <= 2048);
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let (host, port) = refused_addr().await;

        let client = StatusClient::new(&host, port, Duration::from_secs(1));
        let err = client.fetch().await.unwrap_err();

        assert_matches!(err, Error::Connect { .. });
    }

    #[tokio::test]
    async fn test_fetch_connect_timeout() {
        // Non-routable IP (RFC 5737)
        let client = StatusClient::new("192.0.2.1", 2181, Duration::from_millis(100));
        let err = client.fetch().await.unwrap_err();

        assert_matches!(err, Error::Connect { .. });
    }

    #[tokio::test]
    async fn test_fetch_read_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            // Accept but never reply
            let (_stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let client = StatusClient::new("127.0.0.1", port, Duration::from_millis(100));
        let err = client.fetch().await.unwrap_err();

        assert_matches!(err, Error::Read { .. });
    }
}

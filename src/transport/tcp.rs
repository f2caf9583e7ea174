//! TCP transport implementation.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use bytes::Bytes;
use futures::future::BoxFuture;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::protocol::{FrameDecoder, encode_frame};
use crate::transport::Transport;

/// Default game server port.
pub const DEFAULT_PORT: u16 = 8078;

/// Default connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for TCP transport.
#[derive(Debug, Clone)]
pub struct TcpConfig {
    /// Server host name or address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// How long to wait for the connection to open.
    pub connect_timeout: Duration,
}

impl TcpConfig {
    /// Creates a new TCP configuration with default settings.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Sets the port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// TCP transport.
///
/// The socket is split: the write half stays here behind a mutex, the read
/// half is owned by a background task that decodes frames. The read task
/// clears `connected` when the stream ends or loses sync.
pub struct TcpTransport {
    config: TcpConfig,
    writer: Option<Arc<Mutex<OwnedWriteHalf>>>,
    connected: Arc<AtomicBool>,
    read_task: Option<JoinHandle<()>>,
    packet_tx: Option<mpsc::Sender<Bytes>>,
}

impl TcpTransport {
    /// Creates a new TCP transport with the given configuration.
    #[must_use]
    pub fn new(config: TcpConfig) -> Self {
        Self {
            config,
            writer: None,
            connected: Arc::new(AtomicBool::new(false)),
            read_task: None,
            packet_tx: None,
        }
    }

    /// Creates a transport for `host:port` with default settings.
    #[must_use]
    pub fn with_address(host: impl Into<String>, port: u16) -> Self {
        Self::new(TcpConfig::new(host).port(port))
    }

    #[must_use]
    pub const fn config(&self) -> &TcpConfig {
        &self.config
    }

    /// Reads from `reader` until it closes, forwarding each decoded packet.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails, the connection is reset, or a length
    /// prefix is invalid. Nothing after a bad prefix can be framed reliably,
    /// so the loop stops there.
    pub async fn run_read_loop<R>(
        mut reader: R,
        mut decoder: FrameDecoder,
        packet_tx: mpsc::Sender<Bytes>,
    ) -> Result<()>
    where
        R: AsyncRead + Unpin,
    {
        let mut buf = [0u8; 4096];

        loop {
            let n = match reader.read(&mut buf).await {
                Ok(0) => {
                    tracing::debug!("server closed the connection");
                    return Err(Error::Io(io::Error::new(
                        io::ErrorKind::ConnectionReset,
                        "connection closed",
                    )));
                }
                Ok(n) => n,
                Err(e) => {
                    tracing::error!("socket read error: {}", e);
                    return Err(Error::Io(e));
                }
            };

            tracing::trace!("received {} bytes", n);
            decoder.feed(&buf[..n]);

            loop {
                match decoder.decode() {
                    Ok(Some(packet)) => {
                        tracing::trace!("decoded packet: {} bytes", packet.len());
                        if packet_tx.send(packet).await.is_err() {
                            tracing::debug!("packet receiver dropped");
                            return Ok(());
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!("frame decode error, dropping connection: {}", e);
                        return Err(Error::Frame(e));
                    }
                }
            }
        }
    }
}

impl Transport for TcpTransport {
    fn connect(&mut self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            if self.is_connected() {
                return Ok(());
            }
            if self.writer.take().is_some() {
                tracing::debug!("discarding closed connection before redialing");
            }
            if let Some(task) = self.read_task.take() {
                task.abort();
            }

            let address = format!("{}:{}", self.config.host, self.config.port);
            tracing::info!("connecting to {}", address);

            let timeout = self.config.connect_timeout;
            let stream = tokio::time::timeout(timeout, TcpStream::connect(&address))
                .await
                .map_err(|_| Error::Timeout {
                    timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                })??;
            stream.set_nodelay(true)?;

            let (reader, writer) = stream.into_split();
            // a task left over from an earlier connection keeps the old flag
            self.connected = Arc::new(AtomicBool::new(true));
            if let Some(tx) = self.packet_tx.take() {
                let connected = Arc::clone(&self.connected);
                self.read_task = Some(tokio::spawn(async move {
                    if let Err(e) = Self::run_read_loop(reader, FrameDecoder::new(), tx).await {
                        tracing::error!("read loop error: {}", e);
                    }
                    connected.store(false, Ordering::Release);
                }));
            } else {
                tracing::warn!("no packet sender set, inbound packets will be dropped");
            }
            self.writer = Some(Arc::new(Mutex::new(writer)));

            tracing::info!("connected to {}", address);
            Ok(())
        })
    }

    fn disconnect(&mut self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.connected.store(false, Ordering::Release);
            if let Some(task) = self.read_task.take() {
                task.abort();
            }
            if let Some(writer) = self.writer.take() {
                tracing::info!("disconnecting from {}:{}", self.config.host, self.config.port);
                let mut writer = writer.lock().await;
                if let Err(e) = writer.shutdown().await {
                    tracing::debug!("shutdown error: {}", e);
                }
            }
            Ok(())
        })
    }

    fn send(&mut self, packet: Bytes) -> BoxFuture<'_, Result<()>> {
        let writer = self.writer.clone().filter(|_| self.is_connected());
        Box::pin(async move {
            let writer = writer.ok_or(Error::NotConnected)?;
            let mut writer = writer.lock().await;

            let frame = encode_frame(&packet);
            tracing::trace!("sending frame: {} bytes", frame.len());

            writer.write_all(&frame).await?;
            writer.flush().await?;

            Ok(())
        })
    }

    fn is_connected(&self) -> bool {
        self.writer.is_some() && self.connected.load(Ordering::Acquire)
    }

    fn set_packet_sender(&mut self, tx: mpsc::Sender<Bytes>) {
        self.packet_tx = Some(tx);
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        if let Some(task) = self.read_task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[test]
    fn test_tcp_config_defaults() {
        let config = TcpConfig::new("game.example.net");
        assert_eq!(config.host, "game.example.net");
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
    }

    #[test]
    fn test_tcp_config_builder() {
        let config = TcpConfig::new("localhost")
            .port(9000)
            .connect_timeout(Duration::from_secs(1));
        assert_eq!(config.port, 9000);
        assert_eq!(config.connect_timeout, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_send_without_connect() {
        let mut transport = TcpTransport::with_address("localhost", 1);
        let result = transport.send(Bytes::from_static(b"\x07\x09")).await;
        assert!(matches!(result, Err(Error::NotConnected)));
    }

    #[tokio::test]
    async fn test_read_loop_splits_frames() {
        let mut data = encode_frame(b"\x07\x09ab").to_vec();
        data.extend_from_slice(&encode_frame(b"\x08\x09"));
        let (tx, mut rx) = mpsc::channel(4);

        let result = TcpTransport::run_read_loop(&data[..], FrameDecoder::new(), tx).await;
        assert!(matches!(result, Err(Error::Io(_))));

        assert_eq!(rx.recv().await, Some(Bytes::from_static(b"\x07\x09ab")));
        assert_eq!(rx.recv().await, Some(Bytes::from_static(b"\x08\x09")));
    }

    #[tokio::test]
    async fn test_read_loop_stops_on_bad_prefix() {
        let mut data = encode_frame(b"\x07\x09").to_vec();
        data.extend_from_slice(&[0, 3]);
        data.extend_from_slice(&encode_frame(b"\x13\x09\x01\x02"));
        let (tx, mut rx) = mpsc::channel(4);

        let result = TcpTransport::run_read_loop(&data[..], FrameDecoder::new(), tx).await;
        assert!(matches!(result, Err(Error::Frame(_))));

        assert_eq!(rx.recv().await, Some(Bytes::from_static(b"\x07\x09")));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_loopback_round_trip() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4];
            socket.read_exact(&mut buf).await.unwrap();
            // echo the frame back unchanged
            socket.write_all(&buf).await.unwrap();
            buf
        });

        let (tx, mut rx) = mpsc::channel(4);
        let mut transport = TcpTransport::with_address("127.0.0.1", port);
        transport.set_packet_sender(tx);
        transport.connect().await.unwrap();
        assert!(transport.is_connected());

        transport.send(Bytes::from_static(b"\x07\x09")).await.unwrap();
        let sent = server.await.unwrap();
        assert_eq!(sent, [1, 3, 7, 9]);

        let echoed = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap();
        assert_eq!(echoed, Some(Bytes::from_static(b"\x07\x09")));

        transport.disconnect().await.unwrap();
        assert!(!transport.is_connected());
    }

    #[tokio::test]
    async fn test_remote_close_then_reconnect() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            // first connection is dropped straight away
            let (socket, _) = listener.accept().await.unwrap();
            drop(socket);
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(&encode_frame(b"\x08\x09")).await.unwrap();
            socket
        });

        let mut transport = TcpTransport::with_address("127.0.0.1", port);
        let (tx, mut rx) = mpsc::channel(4);
        transport.set_packet_sender(tx);
        transport.connect().await.unwrap();

        let closed = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap();
        assert_eq!(closed, None);
        // the read task clears the flag after dropping its sender
        for _ in 0..100 {
            if !transport.is_connected() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(!transport.is_connected());
        assert!(matches!(
            transport.send(Bytes::from_static(b"\x07\x09")).await,
            Err(Error::NotConnected)
        ));

        let (tx, mut rx) = mpsc::channel(4);
        transport.set_packet_sender(tx);
        transport.connect().await.unwrap();
        assert!(transport.is_connected());

        let packet = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap();
        assert_eq!(packet, Some(Bytes::from_static(b"\x08\x09")));

        transport.disconnect().await.unwrap();
        drop(server.await.unwrap());
    }
}

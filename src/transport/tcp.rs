//! Plain TCP transport framed by [`LineFramer`].

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use somewhere_proto::LineFramer;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tracing::{debug, warn};

use super::{LineStream, Transport};
use crate::error::{ConnectError, ReadError, WriteError};

/// Connects to IRC servers over TCP.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    max_line_len: usize,
    connect_timeout: Option<Duration>,
}

impl TcpTransport {
    pub fn new(max_line_len: usize, connect_timeout: Option<Duration>) -> Self {
        Self {
            max_line_len,
            connect_timeout,
        }
    }

    fn enable_keepalive(stream: &TcpStream) -> Result<()> {
        use socket2::{SockRef, TcpKeepalive};

        let sock = SockRef::from(stream);
        let keepalive = TcpKeepalive::new()
            .with_time(Duration::from_secs(120))
            .with_interval(Duration::from_secs(30));

        sock.set_tcp_keepalive(&keepalive)?;
        Ok(())
    }
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new(somewhere_proto::DEFAULT_MAX_LINE_LEN, None)
    }
}

#[async_trait]
impl Transport for TcpTransport {
    type Stream = TcpLineStream;

    async fn connect(&self, host: &str, port: u16) -> Result<TcpLineStream, ConnectError> {
        let attempt = TcpStream::connect((host, port));
        let stream = match self.connect_timeout {
            Some(limit) => match tokio::time::timeout(limit, attempt).await {
                Ok(result) => result,
                Err(_) => {
                    return Err(ConnectError::new(
                        host,
                        port,
                        format!("timed out after {}s", limit.as_secs()),
                    ));
                }
            },
            None => attempt.await,
        }
        .map_err(|e| ConnectError::new(host, port, e.to_string()))?;

        if let Err(e) = Self::enable_keepalive(&stream) {
            warn!("failed to enable TCP keepalive: {}", e);
        }
        debug!(host, port, "TCP connection established");

        Ok(TcpLineStream {
            framed: Some(Framed::new(
                stream,
                LineFramer::with_max_len(self.max_line_len),
            )),
        })
    }
}

/// A connected TCP socket exchanging lines.
pub struct TcpLineStream {
    framed: Option<Framed<TcpStream, LineFramer>>,
}

#[async_trait]
impl LineStream for TcpLineStream {
    async fn read_line(&mut self) -> Result<String, ReadError> {
        let framed = self.framed.as_mut().ok_or(ReadError::Closed)?;
        match framed.next().await {
            Some(Ok(line)) => Ok(line),
            Some(Err(e)) => Err(e.into()),
            None => Err(ReadError::Closed),
        }
    }

    fn has_pending_line(&self) -> bool {
        self.framed
            .as_ref()
            .is_some_and(|framed| LineFramer::has_complete_line(framed.read_buffer()))
    }

    async fn write_line(&mut self, line: &str) -> Result<(), WriteError> {
        let framed = self.framed.as_mut().ok_or(WriteError::Closed)?;
        // Framed::send flushes after encoding
        framed.send(line).await?;
        Ok(())
    }

    async fn close(&mut self) {
        if let Some(framed) = self.framed.take() {
            let mut stream = framed.into_inner();
            if let Err(e) = stream.shutdown().await {
                debug!(error = %e, "socket shutdown failed");
            }
        }
    }
}

#![allow(dead_code)]

//! Minimal IRC server on a real socket.
//!
//! Accepts connections on an ephemeral loopback port and lets the test read
//! and write raw lines.

use std::net::SocketAddr;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpListener;

use super::WAIT;

pub struct FakeServer {
    listener: TcpListener,
}

#[allow(dead_code)]
impl FakeServer {
    pub async fn bind() -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        Ok(Self { listener })
    }

    pub fn addr(&self) -> SocketAddr {
        self.listener.local_addr().expect("listener has an address")
    }

    pub fn port(&self) -> u16 {
        self.addr().port()
    }

    pub async fn accept(&self) -> anyhow::Result<FakePeer> {
        let (socket, _) = tokio::time::timeout(WAIT, self.listener.accept()).await??;
        let (read, write) = socket.into_split();
        Ok(FakePeer {
            lines: BufReader::new(read).lines(),
            write,
        })
    }
}

/// One client connected to a [`FakeServer`].
pub struct FakePeer {
    lines: Lines<BufReader<OwnedReadHalf>>,
    write: OwnedWriteHalf,
}

#[allow(dead_code)]
impl FakePeer {
    /// Send raw text; the caller supplies line endings.
    pub async fn send_raw(&mut self, data: &str) -> anyhow::Result<()> {
        self.send_raw_bytes(data.as_bytes()).await
    }

    /// Send bytes that need not be valid UTF-8.
    pub async fn send_raw_bytes(&mut self, data: &[u8]) -> anyhow::Result<()> {
        self.write.write_all(data).await?;
        self.write.flush().await?;
        Ok(())
    }

    pub async fn send(&mut self, line: &str) -> anyhow::Result<()> {
        self.send_raw(&format!("{}\r\n", line)).await
    }

    /// Next line from the client, `None` once it hangs up.
    pub async fn recv(&mut self) -> anyhow::Result<Option<String>> {
        Ok(tokio::time::timeout(WAIT, self.lines.next_line()).await??)
    }

    pub async fn hang_up(mut self) -> anyhow::Result<()> {
        self.write.shutdown().await?;
        Ok(())
    }
}

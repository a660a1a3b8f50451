//! Where the engine sends text meant for the user.
//!
//! Every call carries one complete line. Implementations must keep lines
//! whole when several engines share one output.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Output side of an engine.
pub trait DisplaySink: Send + Sync {
    /// A line to show in the connection's status view.
    fn display(&self, line: &str);

    /// A connection or I/O fault.
    fn error(&self, message: &str);
}

impl<T: DisplaySink + ?Sized> DisplaySink for Arc<T> {
    fn display(&self, line: &str) {
        (**self).display(line)
    }

    fn error(&self, message: &str) {
        (**self).error(message)
    }
}

/// One item emitted through a [`ChannelSink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayEvent {
    Line(String),
    Error(String),
}

impl DisplayEvent {
    pub fn text(&self) -> &str {
        match self {
            Self::Line(text) | Self::Error(text) => text,
        }
    }
}

/// Forwards display output over an unbounded channel.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<DisplayEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DisplayEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl DisplaySink for ChannelSink {
    fn display(&self, line: &str) {
        // Receiver gone means nobody is watching; the engine keeps running
        let _ = self.tx.send(DisplayEvent::Line(line.to_string()));
    }

    fn error(&self, message: &str) {
        let _ = self.tx.send(DisplayEvent::Error(message.to_string()));
    }
}

/// Writes lines to a shared writer (usually stdout).
///
/// Each line is formatted first and written under the lock in one call, so
/// output from several engines never interleaves mid-line.
pub struct WriterSink<W: Write + Send> {
    out: Arc<Mutex<W>>,
    label: Option<String>,
    timestamps: bool,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(out: Arc<Mutex<W>>) -> Self {
        Self {
            out,
            label: None,
            timestamps: false,
        }
    }

    /// Tag every line with the connection it came from.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }

    fn format(&self, indent: &str, text: &str) -> String {
        let mut line = String::with_capacity(text.len() + 32);
        line.push_str(indent);
        if self.timestamps {
            line.push_str(&chrono::Local::now().format("[%H:%M:%S] ").to_string());
        }
        if let Some(label) = &self.label {
            line.push('[');
            line.push_str(label);
            line.push_str("] ");
        }
        line.push_str(text);
        line.push('\n');
        line
    }

    fn write(&self, line: String) {
        let mut out = self.out.lock();
        if out.write_all(line.as_bytes()).and_then(|_| out.flush()).is_err() {
            tracing::warn!("display output is no longer writable");
        }
    }
}

impl<W: Write + Send> DisplaySink for WriterSink<W> {
    fn display(&self, line: &str) {
        self.write(self.format("", line));
    }

    fn error(&self, message: &str) {
        self.write(self.format("\t", message));
    }
}

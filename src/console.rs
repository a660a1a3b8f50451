//! Terminal front end: routes typed lines to one of several engines.
//!
//! The front end owns every engine handle explicitly; there is no global
//! connection list. Two commands are handled here and never reach a server:
//! `/focus <n>` switches which connection receives input and `/list` prints
//! the connections.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::display::DisplaySink;
use crate::engine::EngineHandle;

/// Read one typed line, without its terminator. `None` at end of input.
///
/// Bytes that are not UTF-8 are replaced rather than rejected. A partial line
/// stays in `buf` if the future is dropped, so keep `buf` across calls when
/// racing this in `select!`.
pub async fn read_input_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let read = reader.read_until(b'\n', buf).await?;
    if read == 0 && buf.is_empty() {
        return Ok(None);
    }

    let mut line: &[u8] = buf;
    if let Some(rest) = line.strip_suffix(b"\n") {
        line = rest.strip_suffix(b"\r").unwrap_or(rest);
    }
    let text = String::from_utf8_lossy(line).into_owned();
    buf.clear();
    Ok(Some(text))
}

/// A typed line, classified.
#[derive(Debug, PartialEq, Eq)]
pub enum ConsoleCommand<'a> {
    Focus(usize),
    List,
    /// Belongs to the focused engine.
    Forward(&'a str),
    Invalid(&'static str),
}

pub fn parse(line: &str) -> ConsoleCommand<'_> {
    let mut words = line.split_whitespace();
    match words.next() {
        Some(word) if word.eq_ignore_ascii_case("/focus") => {
            match words.next().map(str::parse::<usize>) {
                Some(Ok(index)) => ConsoleCommand::Focus(index),
                _ => ConsoleCommand::Invalid("usage: /focus <connection number>"),
            }
        }
        Some(word) if word.eq_ignore_ascii_case("/list") => ConsoleCommand::List,
        _ => ConsoleCommand::Forward(line),
    }
}

struct Entry {
    label: String,
    handle: EngineHandle,
}

/// The connections started by this process.
#[derive(Default)]
pub struct Connections {
    entries: Vec<Entry>,
    focused: usize,
}

impl Connections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection; returns its number.
    pub fn push(&mut self, label: impl Into<String>, handle: EngineHandle) -> usize {
        self.entries.push(Entry {
            label: label.into(),
            handle,
        });
        self.entries.len() - 1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    /// Act on one typed line. Local output goes to `console`.
    pub fn handle_input<S: DisplaySink + ?Sized>(&mut self, line: &str, console: &S) {
        match parse(line) {
            ConsoleCommand::Focus(index) if index < self.entries.len() => {
                self.focused = index;
                console.display(&format!("Input now goes to [{}] {}", index, self.entries[index].label));
            }
            ConsoleCommand::Focus(index) => {
                console.error(&format!("ERROR: No connection number {}.", index));
            }
            ConsoleCommand::List => {
                for line in self.describe() {
                    console.display(&line);
                }
            }
            ConsoleCommand::Invalid(usage) => console.error(usage),
            ConsoleCommand::Forward(text) => match self.entries.get(self.focused) {
                Some(entry) => {
                    if entry.handle.submit_user_line(text).is_err() {
                        console.error(&format!("ERROR: {} is no longer running.", entry.label));
                    }
                }
                None => console.error("ERROR: No connections."),
            },
        }
    }

    /// One line per connection: number, focus marker, label, status, identity.
    pub fn describe(&self) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let marker = if index == self.focused { '*' } else { ' ' };
                let mut line = format!("{}[{}] {} {}", marker, index, entry.label, entry.handle.status());
                if let Some(identity) = entry.handle.identity() {
                    line.push_str(" as ");
                    line.push_str(&identity);
                }
                line
            })
            .collect()
    }

    pub fn shutdown_all(&self) {
        for entry in &self.entries {
            entry.handle.shutdown();
        }
    }
}

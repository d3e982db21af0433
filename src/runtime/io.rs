//! Input sources and output sinks the interpreter talks to for `red`, `r3d`,
//! `prn` and `pr1`.

use std::future::Future;
use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::{broadcast, mpsc};
use tracing::debug;

pub trait InputSource {
    /// Next line of input, without its line terminator. `None` once the
    /// source is exhausted.
    fn read_line(&mut self) -> impl Future<Output = io::Result<Option<String>>>;

    /// Rewinds so the same program can run again from the first line.
    fn reset(&mut self);
}

pub trait OutputSink {
    fn write(&mut self, text: &str) -> io::Result<()>;
}

// =============================================================================
// In-memory
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct BufferInput {
    lines: Vec<String>,
    next: usize,
}

impl BufferInput {
    pub fn new<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            next: 0,
        }
    }
}

impl InputSource for BufferInput {
    async fn read_line(&mut self) -> io::Result<Option<String>> {
        let line = self.lines.get(self.next).cloned();
        if line.is_some() {
            self.next += 1;
        }
        Ok(line)
    }

    fn reset(&mut self) {
        self.next = 0;
    }
}

#[derive(Debug, Clone, Default)]
pub struct BufferOutput {
    buffer: String,
}

impl BufferOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> &str {
        &self.buffer
    }

    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }
}

impl OutputSink for BufferOutput {
    fn write(&mut self, text: &str) -> io::Result<()> {
        self.buffer.push_str(text);
        Ok(())
    }
}

// =============================================================================
// Interactive
// =============================================================================

/// Notifications an interactive source sends around each suspension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// The program is blocked until a line is delivered.
    Waiting,
    /// A line arrived and the program continues.
    Resumed,
}

/// Input delivered by a host (UI, another task) through a channel.
pub struct ChannelInput {
    lines: mpsc::Receiver<String>,
    events: broadcast::Sender<InputEvent>,
}

/// Host side of a [`ChannelInput`].
#[derive(Clone)]
pub struct InputHandle {
    lines: mpsc::Sender<String>,
    events: broadcast::Sender<InputEvent>,
}

impl ChannelInput {
    pub fn new(capacity: usize) -> (Self, InputHandle) {
        let (line_tx, line_rx) = mpsc::channel(capacity);
        let (event_tx, _) = broadcast::channel(16);

        let input = ChannelInput {
            lines: line_rx,
            events: event_tx.clone(),
        };
        let handle = InputHandle {
            lines: line_tx,
            events: event_tx,
        };
        (input, handle)
    }

    fn notify(&self, event: InputEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }
}

impl InputHandle {
    pub async fn send(&self, line: impl Into<String>) -> io::Result<()> {
        self.lines
            .send(line.into())
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "input source dropped"))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<InputEvent> {
        self.events.subscribe()
    }
}

impl InputSource for ChannelInput {
    async fn read_line(&mut self) -> io::Result<Option<String>> {
        self.notify(InputEvent::Waiting);
        let line = self.lines.recv().await;
        self.notify(InputEvent::Resumed);
        Ok(line)
    }

    fn reset(&mut self) {
        let mut dropped = 0;
        while self.lines.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            debug!(dropped, "discarded queued input on reset");
        }
    }
}

// =============================================================================
// Process stdio
// =============================================================================

pub struct StdinInput {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinInput {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for StdinInput {
    async fn read_line(&mut self) -> io::Result<Option<String>> {
        self.lines.next_line().await
    }

    fn reset(&mut self) {}
}

#[derive(Debug, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write(&mut self, text: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(text.as_bytes())?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_buffer_input_reset_rewinds() {
        let mut input = BufferInput::new(["one", "two"]);
        assert_eq!(input.read_line().await.unwrap(), Some("one".to_string()));
        assert_eq!(input.read_line().await.unwrap(), Some("two".to_string()));
        assert_eq!(input.read_line().await.unwrap(), None);

        input.reset();
        assert_eq!(input.read_line().await.unwrap(), Some("one".to_string()));
    }

    #[test]
    fn test_buffer_output_accumulates() {
        let mut out = BufferOutput::new();
        out.write("a").unwrap();
        out.write("b").unwrap();
        assert_eq!(out.contents(), "ab");
        assert_eq!(out.take(), "ab");
        assert_eq!(out.contents(), "");
    }

    #[tokio::test]
    async fn test_channel_input_notifies_around_suspension() {
        let (mut input, handle) = ChannelInput::new(4);
        let mut events = handle.subscribe();

        handle.send("hi").await.unwrap();
        assert_eq!(input.read_line().await.unwrap(), Some("hi".to_string()));

        assert_eq!(events.recv().await.unwrap(), InputEvent::Waiting);
        assert_eq!(events.recv().await.unwrap(), InputEvent::Resumed);
    }

    #[tokio::test]
    async fn test_channel_input_reset_drops_queued_lines() {
        let (mut input, handle) = ChannelInput::new(4);
        handle.send("stale").await.unwrap();
        input.reset();
        handle.send("fresh").await.unwrap();
        assert_eq!(input.read_line().await.unwrap(), Some("fresh".to_string()));
    }

    #[tokio::test]
    async fn test_channel_input_ends_when_host_drops() {
        let (mut input, handle) = ChannelInput::new(1);
        drop(handle);
        assert_eq!(input.read_line().await.unwrap(), None);
    }
}

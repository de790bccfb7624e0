// THEORY:
// A sink is wherever debounced gestures go once they leave the engine. The engine only
// promises a push-based stream of labels (never `NONE`); what the consumer does with them
// is outside its concern. Two sinks cover the common cases:
// - `LineSink` writes one label name per line and flushes immediately, so a consumer on
//   the other end of a pipe sees each gesture as soon as it happens.
// - `ChannelSink` hands events to an async consumer over a tokio channel.

use crate::core_modules::gesture::GestureEvent;
use crate::error::{Result, VisionError};
use std::io::Write;
use tokio::sync::mpsc;

pub trait GestureSink {
    fn emit(&mut self, event: &GestureEvent) -> Result<()>;
}

/// Writes `LABEL\n` per event and flushes after each one.
pub struct LineSink<W: Write> {
    writer: W,
}

impl<W: Write> LineSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl LineSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> GestureSink for LineSink<W> {
    fn emit(&mut self, event: &GestureEvent) -> Result<()> {
        writeln!(self.writer, "{}", event.label)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Forwards events to an async receiver.
#[derive(Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<GestureEvent>,
}

impl ChannelSink {
    pub fn new(sender: mpsc::UnboundedSender<GestureEvent>) -> Self {
        Self { sender }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<GestureEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl GestureSink for ChannelSink {
    fn emit(&mut self, event: &GestureEvent) -> Result<()> {
        self.sender.send(*event).map_err(|_| VisionError::SinkClosed)
    }
}

//! Incremental parsing of a byte stream into messages.

use std::sync::Arc;

use bsl_engine::{
    ByteStream, Engine, EngineConfig, EngineError, Outcome, Program, Value, ValueBuilder,
};
use thiserror::Error;

/// An engine error that aborted a session.
///
/// `parsed` holds the messages completed by the same call before the
/// failure; they are complete and valid.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("parse session aborted after {} new messages: {error}", .parsed.len())]
pub struct SessionError {
    pub parsed: Vec<Value>,
    pub error: EngineError,
}

/// One parse session: an engine, its input buffer and a shared program.
///
/// Feed input as it arrives; every message completed by the new bytes is
/// returned. Consumed input is released after each message, so memory stays
/// bounded by the largest message. An engine error aborts the session,
/// discarding buffered input but not the messages already completed.
pub struct ParseSession {
    program: Arc<Program>,
    engine: Engine,
    stream: ByteStream,
    sink: ValueBuilder,
    /// Offset just past the last completed message.
    boundary: u64,
    messages: u64,
}

impl ParseSession {
    pub fn new(program: Arc<Program>, config: EngineConfig) -> Self {
        ParseSession {
            program,
            engine: Engine::new(config),
            stream: ByteStream::new(),
            sink: ValueBuilder::new(),
            boundary: 0,
            messages: 0,
        }
    }

    /// Append input and parse every message it completes.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<Vec<Value>, SessionError> {
        self.stream.extend(bytes);
        self.drive()
    }

    /// Mark end of input.
    ///
    /// Fails with [`EngineError::UnexpectedEof`] if a message was cut off.
    pub fn finish(&mut self) -> Result<Vec<Value>, SessionError> {
        self.stream.finish();
        self.drive()
    }

    /// Abandon the current session and start over with empty input.
    pub fn abort(&mut self) {
        tracing::debug!(messages = self.messages, "session aborted");
        self.engine.reset();
        self.stream = ByteStream::new();
        self.sink.clear_partial();
        self.sink.take_messages();
        self.boundary = 0;
    }

    /// Messages completed since the session started.
    pub fn messages_parsed(&self) -> u64 {
        self.messages
    }

    /// Bytes received but not yet part of a completed message.
    pub fn pending(&self) -> u64 {
        self.stream.end() - self.boundary
    }

    fn drive(&mut self) -> Result<Vec<Value>, SessionError> {
        loop {
            // A finished stream that ends exactly on a message boundary.
            if self.stream.is_finished() && self.boundary == self.stream.end() {
                break;
            }
            let outcome = self.engine.run(&self.program, &self.stream, &mut self.sink);
            match outcome {
                Ok(Outcome::Complete { position }) => {
                    let advanced = position > self.boundary;
                    self.messages += 1;
                    self.boundary = position;
                    self.stream.release(position);
                    if !advanced {
                        // A message that consumes nothing would repeat forever.
                        break;
                    }
                }
                Ok(Outcome::NeedMore { .. }) => break,
                Err(error) => {
                    tracing::debug!(%error, "session failed");
                    let parsed = self.sink.take_messages();
                    self.abort();
                    return Err(SessionError { parsed, error });
                }
            }
        }
        Ok(self.sink.take_messages())
    }
}

#[cfg(test)]
mod tests;

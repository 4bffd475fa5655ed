//! The interpreter loop.
//!
//! Every instruction first checks that all the input it needs is buffered
//! and only then changes state, so suspending for more input never leaves
//! an instruction half done. Resuming re-executes the suspended instruction
//! from scratch.

use crate::sink::{FieldSink, Value};
use crate::stream::ByteStream;
use crate::{Engine, EngineError, Instr, InstrId, Length, Program, Scalar};

/// How a call to [`Engine::run`] ended.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Outcome {
    /// A message was parsed; `position` is the offset just past it.
    Complete { position: u64 },
    /// Input ran out. At least `needed` more bytes are required before
    /// running again.
    NeedMore { needed: usize },
}

enum Flow {
    Continue,
    Suspend(usize),
    Halt(u64),
}

enum Input<'s> {
    Ready(&'s [u8]),
    Short(usize),
}

impl Engine {
    /// Execute `program` from the saved instruction pointer until a message
    /// completes, input runs out, or an error aborts the session.
    ///
    /// An idle engine starts at the program's entry point; an unset cursor
    /// starts at the beginning of the buffered stream.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(ip = ?self.ip, position = ?self.stream_position)
    )]
    pub fn run<S: FieldSink + ?Sized>(
        &mut self,
        program: &Program,
        stream: &ByteStream,
        sink: &mut S,
    ) -> Result<Outcome, EngineError> {
        if self.ip.is_none() {
            self.ip = Some(program.entry());
        }
        if self.stream_position.is_none() {
            self.stream_position = Some(stream.start());
        }

        loop {
            let Some(ip) = self.ip else {
                return Err(EngineError::InvalidInstruction { ip: None });
            };
            let instr = program
                .get(ip)
                .ok_or(EngineError::InvalidInstruction { ip: Some(ip) })?;
            tracing::trace!(%ip, ?instr, depth = self.depth(), "exec");

            match self.step(program, stream, sink, ip, instr)? {
                Flow::Continue => {}
                Flow::Suspend(needed) => {
                    tracing::debug!(%ip, needed, "suspended for input");
                    return Ok(Outcome::NeedMore { needed });
                }
                Flow::Halt(position) => {
                    tracing::debug!(position, "message complete");
                    return Ok(Outcome::Complete { position });
                }
            }
        }
    }

    fn step<S: FieldSink + ?Sized>(
        &mut self,
        program: &Program,
        stream: &ByteStream,
        sink: &mut S,
        ip: InstrId,
        instr: &Instr,
    ) -> Result<Flow, EngineError> {
        let next = ip
            .raw()
            .checked_add(1)
            .map(InstrId::new)
            .ok_or(EngineError::InvalidInstruction { ip: Some(ip) })?;

        match instr {
            Instr::Read {
                scalar,
                field,
                keep,
            } => {
                let raw = match self.read_scalar(stream, *scalar)? {
                    Ok(raw) => raw,
                    Err(needed) => return Ok(Flow::Suspend(needed)),
                };
                if *keep {
                    self.push(raw)?;
                }
                if let Some(field) = field {
                    let value = if scalar.signed {
                        Value::SInt(scalar.sign_extend(raw))
                    } else {
                        Value::UInt(raw)
                    };
                    sink.field(program.field_name(*field), value);
                }
                self.consume(scalar.byte_len());
            }
            Instr::ReadBytes { len, field } => {
                let n = self.length(*len)?;
                let bytes = match self.input(stream, n)? {
                    Input::Ready(bytes) => bytes,
                    Input::Short(needed) => return Ok(Flow::Suspend(needed)),
                };
                if *len == Length::FromStack {
                    self.pop::<u64>()?;
                }
                if let Some(field) = field {
                    sink.field(program.field_name(*field), Value::Bytes(bytes.to_vec()));
                }
                self.consume(n);
            }
            Instr::ReadBitset {
                scalar,
                layout,
                field,
            } => {
                let layout = program
                    .layout(*layout)
                    .ok_or(EngineError::InvalidInstruction { ip: Some(ip) })?;
                let bits = match self.read_scalar(stream, *scalar)? {
                    Ok(raw) => raw,
                    Err(needed) => return Ok(Flow::Suspend(needed)),
                };
                if let Some(field) = field {
                    let labels = layout.decode(bits);
                    sink.field(program.field_name(*field), Value::Bitset { bits, labels });
                }
                self.consume(scalar.byte_len());
            }
            Instr::Expect { scalar, value } => {
                let raw = match self.read_scalar(stream, *scalar)? {
                    Ok(raw) => raw,
                    Err(needed) => return Ok(Flow::Suspend(needed)),
                };
                if raw != *value {
                    return Err(self.malformed(format!("expected {value:#x}, found {raw:#x}")));
                }
                self.consume(scalar.byte_len());
            }
            Instr::Skip { len } => {
                let n = self.length(*len)?;
                if let Input::Short(needed) = self.input(stream, n)? {
                    return Ok(Flow::Suspend(needed));
                }
                if *len == Length::FromStack {
                    self.pop::<u64>()?;
                }
                self.consume(n);
            }
            Instr::Push(value) => self.push(*value)?,
            Instr::Drop => self.pop::<u64>()?,
            Instr::Dup => {
                let top = self.peek::<u64>()?;
                self.push(top)?;
            }
            Instr::Decrement => self.update_top::<u64>(|v| v.saturating_sub(1))?,
            Instr::Jump(target) => {
                self.advance_to_instruction(*target);
                return Ok(Flow::Continue);
            }
            Instr::JumpIfZero(target) => {
                if self.pop_and_get::<u64>()? == 0 {
                    self.advance_to_instruction(*target);
                    return Ok(Flow::Continue);
                }
            }
            Instr::Call(target) => {
                self.call_instruction(*target, next)?;
                return Ok(Flow::Continue);
            }
            Instr::Return => {
                self.return_to_instruction()?;
                return Ok(Flow::Continue);
            }
            Instr::Enter(field) => sink.enter(program.field_name(*field)),
            Instr::Leave => sink.leave(),
            Instr::Halt => {
                if !self.stack.is_empty() {
                    return Err(EngineError::UnbalancedStack {
                        ip: Some(ip),
                        depth: self.depth(),
                    });
                }
                sink.end_message();
                self.ip = None;
                return Ok(Flow::Halt(self.position()));
            }
        }

        self.advance_to_instruction(next);
        Ok(Flow::Continue)
    }

    #[inline]
    fn position(&self) -> u64 {
        self.stream_position.unwrap_or_default()
    }

    fn consume(&mut self, len: usize) {
        self.stream_position = Some(self.position() + len as u64);
    }

    fn malformed(&self, reason: String) -> EngineError {
        EngineError::MalformedStream {
            ip: self.ip,
            position: self.position(),
            reason,
        }
    }

    /// Byte count of a read, checked against the configured limit.
    fn length(&self, len: Length) -> Result<usize, EngineError> {
        match len {
            Length::Fixed(n) => Ok(n as usize),
            Length::FromStack => {
                let declared = self.peek::<u64>()?;
                let max = self.config.max_field_len;
                if declared > max {
                    return Err(self.malformed(format!(
                        "declared length {declared} exceeds the {max}-byte limit"
                    )));
                }
                usize::try_from(declared)
                    .map_err(|_| self.malformed(format!("declared length {declared} is too large")))
            }
        }
    }

    /// The next `len` bytes, or how many more are needed.
    ///
    /// Running short of a finished stream is an error rather than a
    /// suspension.
    fn input<'s>(&self, stream: &'s ByteStream, len: usize) -> Result<Input<'s>, EngineError> {
        let pos = self.position();
        let Some(available) = stream.available_from(pos) else {
            return Err(self.malformed(format!(
                "cursor is outside the buffered input {}..{}",
                stream.start(),
                stream.end()
            )));
        };
        if let Some(bytes) = stream.slice(pos, len) {
            return Ok(Input::Ready(bytes));
        }
        let needed = len - available;
        if stream.is_finished() {
            return Err(EngineError::UnexpectedEof {
                ip: self.ip,
                position: pos,
                needed,
            });
        }
        Ok(Input::Short(needed))
    }

    /// Raw integer value, or `Err(needed)` when input is short.
    fn read_scalar(
        &self,
        stream: &ByteStream,
        scalar: Scalar,
    ) -> Result<Result<u64, usize>, EngineError> {
        Ok(match self.input(stream, scalar.byte_len())? {
            Input::Ready(bytes) => Ok(scalar.decode(bytes)),
            Input::Short(needed) => Err(needed),
        })
    }
}

#[cfg(test)]
mod tests;

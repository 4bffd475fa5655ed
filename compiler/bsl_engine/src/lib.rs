//! Resumable parser stack engine.
//!
//! Compiled specifications run as a flat [`Program`] of [`Instr`] steps on
//! an [`Engine`] whose whole state (a fixed-capacity typed [`Stack`], the
//! instruction pointer and the stream cursor) is explicit. When the
//! [`ByteStream`] runs dry the engine returns [`Outcome::NeedMore`]; feeding
//! more bytes and calling [`Engine::run`] again continues at the same
//! instruction.
//!
//! ```text
//! let mut engine = Engine::new(EngineConfig::from_env());
//! let mut sink = ValueBuilder::new();
//! stream.extend(chunk);
//! match engine.run(&program, &stream, &mut sink)? {
//!     Outcome::Complete { position } => stream.release(position),
//!     Outcome::NeedMore { .. } => { /* wait for the next chunk */ }
//! }
//! ```

mod builder;
mod config;
mod engine;
mod error;
mod exec;
mod instr;
mod program;
pub mod sink;
pub mod stack;
mod stream;

pub use builder::{Label, ProgramBuilder};
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{EngineError, ProgramError};
pub use exec::Outcome;
pub use instr::{BitsetLayout, Endian, FieldId, Instr, InstrId, LayoutId, Length, Scalar};
pub use program::Program;
pub use sink::{FieldSink, Value, ValueBuilder};
pub use stack::{Slot, Stack, StackValue};
pub use stream::ByteStream;

/// Convert a table length to a `u32` index.
///
/// # Panics
/// Panics if a program grows past `u32::MAX` entries.
#[inline]
pub(crate) fn to_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("program table exceeds u32::MAX entries"))
}

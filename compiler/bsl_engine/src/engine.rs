//! Parser engine state and its primitive operations.
//!
//! Everything needed to resume a parse lives here: the stack (including
//! return addresses of nested sub-parsers), the instruction pointer and the
//! stream cursor. Nothing is kept on the native call stack between
//! [`Engine::run`](crate::Engine::run) calls, so a parse can stop whenever
//! input runs out and pick up later at the same instruction.

use crate::stack::{Slot, Stack, StackValue};
use crate::{EngineConfig, EngineError, InstrId};

/// A resumable parser engine.
///
/// One engine serves one parse session at a time. [`Engine::reset`]
/// recycles it for the next session without reallocating the stack.
#[derive(Clone, Debug)]
pub struct Engine {
    pub(crate) stack: Stack,
    pub(crate) ip: Option<InstrId>,
    pub(crate) stream_position: Option<u64>,
    pub(crate) config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Engine {
            stack: Stack::with_capacity(config.stack_capacity),
            ip: None,
            stream_position: None,
            config,
        }
    }

    /// An engine with a stack of `capacity` bytes and default limits.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(EngineConfig::default().with_stack_capacity(capacity))
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current instruction, `None` between messages.
    #[inline]
    pub fn ip(&self) -> Option<InstrId> {
        self.ip
    }

    /// Absolute stream offset of the next unread byte, `None` before the
    /// first read.
    #[inline]
    pub fn stream_position(&self) -> Option<u64> {
        self.stream_position
    }

    /// Free stack bytes.
    #[inline]
    pub fn space(&self) -> usize {
        self.stack.space()
    }

    /// Stack bytes in use.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn push<T: StackValue>(&mut self, value: T) -> Result<(), EngineError> {
        self.stack.push(value).map_err(|f| f.at(self.ip))
    }

    pub fn push_default<T: StackValue + Default>(&mut self) -> Result<Slot<T>, EngineError> {
        self.stack.push_default().map_err(|f| f.at(self.ip))
    }

    pub fn load<T: StackValue>(&self, slot: Slot<T>) -> Result<T, EngineError> {
        self.stack.load(slot).map_err(|f| f.at(self.ip))
    }

    pub fn store<T: StackValue>(&mut self, slot: Slot<T>, value: T) -> Result<(), EngineError> {
        self.stack.store(slot, value).map_err(|f| f.at(self.ip))
    }

    pub fn peek<T: StackValue>(&self) -> Result<T, EngineError> {
        self.stack.peek().map_err(|f| f.at(self.ip))
    }

    pub fn update_top<T: StackValue>(&mut self, f: impl FnOnce(T) -> T) -> Result<(), EngineError> {
        self.stack.update_top(f).map_err(|fault| fault.at(self.ip))
    }

    pub fn pop<T: StackValue>(&mut self) -> Result<(), EngineError> {
        self.stack.pop::<T>().map_err(|f| f.at(self.ip))
    }

    pub fn pop_and_get<T: StackValue>(&mut self) -> Result<T, EngineError> {
        self.stack.pop_and_get().map_err(|f| f.at(self.ip))
    }

    /// Save `return_to` on the stack and continue at `target`.
    ///
    /// When the stack is full the instruction pointer is left unchanged.
    pub fn call_instruction(
        &mut self,
        target: InstrId,
        return_to: InstrId,
    ) -> Result<(), EngineError> {
        self.push(return_to)?;
        tracing::trace!(%target, %return_to, depth = self.depth(), "call");
        self.ip = Some(target);
        Ok(())
    }

    /// Continue at the most recently saved return location.
    pub fn return_to_instruction(&mut self) -> Result<(), EngineError> {
        let return_to = self.pop_and_get::<InstrId>()?;
        tracing::trace!(%return_to, depth = self.depth(), "return");
        self.ip = Some(return_to);
        Ok(())
    }

    #[inline]
    pub fn advance_to_instruction(&mut self, target: InstrId) {
        self.ip = Some(target);
    }

    /// Abandon any parse in progress: empty stack, no instruction, no
    /// cursor. The stack region is kept.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.ip = None;
        self.stream_position = None;
    }
}

#[cfg(test)]
mod tests;

//! Engine and program-assembly errors.
//!
//! Engine errors abort only the parse session that raised them. Each one
//! records the instruction pointer current when it happened.

use bsl_diagnostic::{Diagnostic, ErrorCode};
use bsl_ir::Location;
use thiserror::Error;

use crate::stack::StackFault;
use crate::InstrId;

fn at(ip: &Option<InstrId>) -> String {
    ip.map_or_else(|| "<idle>".to_owned(), |ip| ip.to_string())
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum EngineError {
    #[error("stack exhausted at {}: slot of {requested} bytes, {available} free", at(.ip))]
    StackExhausted {
        ip: Option<InstrId>,
        requested: usize,
        available: usize,
    },

    #[error("stack underflow at {}: need {requested} bytes, {depth} on stack", at(.ip))]
    StackUnderflow {
        ip: Option<InstrId>,
        requested: usize,
        depth: usize,
    },

    #[error("slot type mismatch at {}: expected `{expected}`, found `{found}`", at(.ip))]
    SlotTypeMismatch {
        ip: Option<InstrId>,
        expected: &'static str,
        found: &'static str,
    },

    #[error("malformed stream at {} (offset {position}): {reason}", at(.ip))]
    MalformedStream {
        ip: Option<InstrId>,
        position: u64,
        reason: String,
    },

    #[error("unexpected end of input at {} (offset {position}): {needed} more bytes needed", at(.ip))]
    UnexpectedEof {
        ip: Option<InstrId>,
        position: u64,
        needed: usize,
    },

    #[error("invalid instruction pointer {}", at(.ip))]
    InvalidInstruction { ip: Option<InstrId> },

    #[error("message ended at {} with {depth} bytes left on the stack", at(.ip))]
    UnbalancedStack { ip: Option<InstrId>, depth: usize },
}

impl EngineError {
    /// Instruction pointer at the time of failure.
    pub fn ip(&self) -> Option<InstrId> {
        match self {
            EngineError::StackExhausted { ip, .. }
            | EngineError::StackUnderflow { ip, .. }
            | EngineError::SlotTypeMismatch { ip, .. }
            | EngineError::MalformedStream { ip, .. }
            | EngineError::UnexpectedEof { ip, .. }
            | EngineError::InvalidInstruction { ip }
            | EngineError::UnbalancedStack { ip, .. } => *ip,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            EngineError::StackExhausted { .. } => ErrorCode::E2001,
            EngineError::StackUnderflow { .. } => ErrorCode::E2002,
            EngineError::SlotTypeMismatch { .. } => ErrorCode::E2003,
            EngineError::MalformedStream { .. } => ErrorCode::E2004,
            EngineError::UnexpectedEof { .. } => ErrorCode::E2005,
            EngineError::InvalidInstruction { .. } => ErrorCode::E2006,
            EngineError::UnbalancedStack { .. } => ErrorCode::E2007,
        }
    }

    /// Whether a larger stack could have avoided the error.
    pub fn is_capacity_problem(&self) -> bool {
        matches!(self, EngineError::StackExhausted { .. })
    }
}

impl StackFault {
    pub(crate) fn at(self, ip: Option<InstrId>) -> EngineError {
        match self {
            StackFault::Exhausted {
                requested,
                available,
            } => EngineError::StackExhausted {
                ip,
                requested,
                available,
            },
            StackFault::Underflow { requested, depth } => EngineError::StackUnderflow {
                ip,
                requested,
                depth,
            },
            StackFault::TypeMismatch { expected, found } => EngineError::SlotTypeMismatch {
                ip,
                expected,
                found,
            },
        }
    }
}

impl From<EngineError> for Diagnostic {
    fn from(err: EngineError) -> Self {
        let diag = Diagnostic::error(err.code()).with_message(err.to_string());
        if err.is_capacity_problem() {
            diag.with_note("raise BSL_STACK_CAPACITY and restart the session")
        } else {
            diag
        }
    }
}

/// Errors found while assembling or validating a [`Program`](crate::Program).
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ProgramError {
    #[error("undefined label: `{0}`")]
    UndefinedLabel(String),

    #[error("re-defined label: `{0}`")]
    RedefinedLabel(String),

    #[error("invalid reference at {at}: {reason}")]
    InvalidTarget { at: InstrId, reason: String },
}

impl ProgramError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ProgramError::UndefinedLabel(_) => ErrorCode::E3001,
            ProgramError::RedefinedLabel(_) => ErrorCode::E3002,
            ProgramError::InvalidTarget { .. } => ErrorCode::E3003,
        }
    }

    /// Convert to a diagnostic pointing at the specification that was
    /// compiled into the program.
    pub fn into_diagnostic(self, location: Location) -> Diagnostic {
        Diagnostic::error(self.code())
            .with_message(self.to_string())
            .with_label(location, "while compiling this specification")
    }
}

#[cfg(test)]
mod tests;

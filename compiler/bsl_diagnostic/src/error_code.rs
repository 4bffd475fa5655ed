//! Error codes for all compiler and runtime diagnostics.
//!
//! Each code is a unique identifier (e.g. `E1001`) whose first digit names
//! the layer that raised it.

use std::fmt;

/// Error codes.
///
/// Format: E#### where the first digit indicates the layer:
/// - E1xxx: Specification model (semantic) errors
/// - E2xxx: Parser engine errors
/// - E3xxx: Compiled program assembly errors
/// - E9xxx: Internal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Semantic Errors (E1xxx)
    /// Bitset literal names an undeclared label
    E1001,
    /// Integer literal does not fit its type
    E1002,
    /// Literal kind does not match its type
    E1003,
    /// Bitset label declared twice
    E1004,
    /// Bit position assigned to two labels
    E1005,
    /// Bit position outside the bitset's width
    E1006,
    /// Unsupported integer width
    E1007,
    /// Struct field declared twice
    E1008,
    /// Duplicate declaration in a module
    E1009,

    // Engine Errors (E2xxx)
    /// Parser stack exhausted
    E2001,
    /// Parser stack underflow
    E2002,
    /// Popped slot has a different type than pushed
    E2003,
    /// Malformed input stream
    E2004,
    /// Input ended in the middle of a message
    E2005,
    /// Instruction pointer outside the program
    E2006,
    /// Stack not empty at end of message
    E2007,

    // Program Errors (E3xxx)
    /// Jump or call to an undefined label
    E3001,
    /// Label defined twice
    E3002,
    /// Instruction refers to a missing target or table entry
    E3003,

    // Internal Errors (E9xxx)
    /// Internal compiler error
    E9001,
    /// Too many errors
    E9002,
}

impl ErrorCode {
    /// All error codes, in declaration order.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E1005,
        ErrorCode::E1006,
        ErrorCode::E1007,
        ErrorCode::E1008,
        ErrorCode::E1009,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        ErrorCode::E2007,
        ErrorCode::E3001,
        ErrorCode::E3002,
        ErrorCode::E3003,
        ErrorCode::E9001,
        ErrorCode::E9002,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E1008 => "E1008",
            ErrorCode::E1009 => "E1009",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// Short description, used by `--explain` style lookups.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "bitset literal names an undeclared label",
            ErrorCode::E1002 => "integer literal does not fit its type",
            ErrorCode::E1003 => "literal kind does not match its type",
            ErrorCode::E1004 => "bitset label declared more than once",
            ErrorCode::E1005 => "bit position assigned to more than one label",
            ErrorCode::E1006 => "bit position outside the bitset's width",
            ErrorCode::E1007 => "unsupported integer width",
            ErrorCode::E1008 => "struct field declared more than once",
            ErrorCode::E1009 => "duplicate declaration",
            ErrorCode::E2001 => "parser stack exhausted",
            ErrorCode::E2002 => "parser stack underflow",
            ErrorCode::E2003 => "stack slot popped with the wrong type",
            ErrorCode::E2004 => "malformed input stream",
            ErrorCode::E2005 => "unexpected end of input",
            ErrorCode::E2006 => "instruction pointer outside the program",
            ErrorCode::E2007 => "parser stack not empty at end of message",
            ErrorCode::E3001 => "undefined label",
            ErrorCode::E3002 => "label defined more than once",
            ErrorCode::E3003 => "invalid instruction target",
            ErrorCode::E9001 => "internal error",
            ErrorCode::E9002 => "too many errors",
        }
    }

    /// Raised while building the specification model.
    pub fn is_semantic_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    /// Raised by the parser engine at run time.
    pub fn is_engine_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    /// Raised while assembling a compiled program.
    pub fn is_program_error(&self) -> bool {
        self.as_str().starts_with("E3")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse an error code string like `"E2001"`. Case-insensitive.
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

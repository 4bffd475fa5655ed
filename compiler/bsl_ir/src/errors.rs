//! Semantic errors raised while building the specification model.
//!
//! Every check happens when a node is constructed, so a node that exists
//! is already known to be well formed. Errors carry a rendering of the
//! offending node, a formatted message and the source location; loaders
//! collect them per compilation unit instead of stopping at the first.

use std::fmt;

use crate::Location;

/// Structured category of a [`SemanticError`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SemanticErrorKind {
    // Constants
    /// A bitset literal names a label its type does not declare.
    UnknownBitsetLabel {
        /// Fully qualified path of the offending label.
        label: String,
    },
    /// An integer literal does not fit the declared width.
    LiteralOutOfRange { value: String, ty: String },
    /// The literal's kind does not match the declared type.
    LiteralKindMismatch { literal: &'static str, ty: String },

    // Types
    DuplicateBitsetLabel { label: String },
    DuplicateBitPosition { position: u32 },
    BitPositionOutOfRange { position: u32, width: u32 },
    InvalidWidth { bits: u32 },
    DuplicateField { field: String },

    // Declarations
    DuplicateDeclaration { id: String },
}

impl fmt::Display for SemanticErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticErrorKind::UnknownBitsetLabel { label } => {
                write!(f, "unknown bitset label '{label}'")
            }
            SemanticErrorKind::LiteralOutOfRange { value, ty } => {
                write!(f, "value {value} does not fit type '{ty}'")
            }
            SemanticErrorKind::LiteralKindMismatch { literal, ty } => {
                write!(f, "{literal} literal cannot have type '{ty}'")
            }
            SemanticErrorKind::DuplicateBitsetLabel { label } => {
                write!(f, "bitset label '{label}' declared more than once")
            }
            SemanticErrorKind::DuplicateBitPosition { position } => {
                write!(f, "bit {position} assigned to more than one label")
            }
            SemanticErrorKind::BitPositionOutOfRange { position, width } => {
                write!(f, "bit {position} is outside a {width}-bit bitset")
            }
            SemanticErrorKind::InvalidWidth { bits } => {
                write!(f, "invalid integer width {bits}, expected 8, 16, 32 or 64")
            }
            SemanticErrorKind::DuplicateField { field } => {
                write!(f, "field '{field}' declared more than once")
            }
            SemanticErrorKind::DuplicateDeclaration { id } => {
                write!(f, "'{id}' is already declared")
            }
        }
    }
}

/// A construction-time error in the specification model.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SemanticError {
    pub kind: SemanticErrorKind,
    /// Rendering of the node that failed to build.
    pub node: String,
    /// Human-readable message, equal to `kind.to_string()`.
    pub message: String,
    pub location: Location,
}

impl SemanticError {
    pub fn new(kind: SemanticErrorKind, node: impl Into<String>, location: Location) -> Self {
        let message = kind.to_string();
        tracing::debug!(%location, %message, "semantic error");
        SemanticError {
            kind,
            node: node.into(),
            message,
            location,
        }
    }

    /// Qualified path of the offending label, for unknown-label errors.
    pub fn label_path(&self) -> Option<&str> {
        match &self.kind {
            SemanticErrorKind::UnknownBitsetLabel { label } => Some(label),
            _ => None,
        }
    }
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.location, self.message, self.node)
    }
}

impl std::error::Error for SemanticError {}

pub type SemanticResult<T> = Result<T, SemanticError>;

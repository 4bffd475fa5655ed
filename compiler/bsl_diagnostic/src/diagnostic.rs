use std::fmt;

use bsl_ir::{Location, SemanticError, SemanticErrorKind};

use crate::ErrorCode;

/// How serious a diagnostic is.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A labeled location with a message.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub location: Location,
    pub message: String,
    pub is_primary: bool,
}

impl Label {
    /// The location the diagnostic is about.
    pub fn primary(location: Location, message: impl Into<String>) -> Self {
        Label {
            location,
            message: message.into(),
            is_primary: true,
        }
    }

    /// A related location, shown for context.
    pub fn secondary(location: Location, message: impl Into<String>) -> Self {
        Label {
            location,
            message: message.into(),
            is_primary: false,
        }
    }
}

/// A structured diagnostic.
///
/// Turning this into user-facing text is left to the caller; `Display`
/// gives a single-line summary for logs.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "a diagnostic that is never queued is never seen"]
pub struct Diagnostic {
    /// Stable code, see [`ErrorCode::description`].
    pub code: ErrorCode,
    pub severity: Severity,
    /// Main error message.
    pub message: String,
    /// Labelled locations in the order added.
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    fn new_with_severity(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    #[cold]
    pub fn error(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Error)
    }

    #[cold]
    pub fn warning(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Warning)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Point at `location` as the cause.
    pub fn with_label(mut self, location: Location, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(location, message));
        self
    }

    pub fn with_secondary_label(mut self, location: Location, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(location, message));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Location of the first primary label.
    pub fn primary_location(&self) -> Option<&Location> {
        self.labels
            .iter()
            .find(|l| l.is_primary)
            .map(|l| &l.location)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
        if let Some(location) = self.primary_location() {
            write!(f, " at {location}")?;
        }
        Ok(())
    }
}

/// Error code for a semantic error kind.
pub fn semantic_error_code(kind: &SemanticErrorKind) -> ErrorCode {
    match kind {
        SemanticErrorKind::UnknownBitsetLabel { .. } => ErrorCode::E1001,
        SemanticErrorKind::LiteralOutOfRange { .. } => ErrorCode::E1002,
        SemanticErrorKind::LiteralKindMismatch { .. } => ErrorCode::E1003,
        SemanticErrorKind::DuplicateBitsetLabel { .. } => ErrorCode::E1004,
        SemanticErrorKind::DuplicateBitPosition { .. } => ErrorCode::E1005,
        SemanticErrorKind::BitPositionOutOfRange { .. } => ErrorCode::E1006,
        SemanticErrorKind::InvalidWidth { .. } => ErrorCode::E1007,
        SemanticErrorKind::DuplicateField { .. } => ErrorCode::E1008,
        SemanticErrorKind::DuplicateDeclaration { .. } => ErrorCode::E1009,
    }
}

impl From<SemanticError> for Diagnostic {
    fn from(err: SemanticError) -> Self {
        let diag = Diagnostic::error(semantic_error_code(&err.kind))
            .with_message(err.message)
            .with_label(err.location, format!("in `{}`", err.node));
        match err.kind {
            SemanticErrorKind::UnknownBitsetLabel { label } => {
                diag.with_note(format!("`{label}` is not declared on the bitset type"))
            }
            _ => diag,
        }
    }
}

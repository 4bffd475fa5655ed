//! Diagnostics shared by the specification model and the parser engine.
//!
//!
//! A [`Diagnostic`] is a stable [`ErrorCode`], a message, labelled
//! locations and notes. Rendering it for a terminal is the caller's job.
//! Loaders gather diagnostics in a [`DiagnosticQueue`] and fail with an
//! [`ErrorGuaranteed`], which can only exist once an error was queued:
//!
//! ```text
//! let proof = queue.emit_error(Diagnostic::from(err));
//! return Err(proof);
//! ```

mod diagnostic;
mod error_code;
mod guarantee;
pub mod queue;

pub use diagnostic::{semantic_error_code, Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticConfig, DiagnosticQueue};

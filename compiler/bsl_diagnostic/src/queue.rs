//! Per-unit collection of diagnostics.
//!
//! Loading a specification keeps going after a node fails to build, so one
//! unit can produce many errors. The queue caps how many are kept, drops a
//! repeat of the error just reported and hands them back ordered by file
//! and line.

use bsl_ir::Location;

use crate::{Diagnostic, ErrorCode, ErrorGuaranteed};

/// Limits applied by a [`DiagnosticQueue`].
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Errors kept before further ones are dropped. 0 keeps all of them.
    pub error_limit: usize,
    /// Drop an error identical to the previous one at the same location.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 20,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Keep every diagnostic, repeats included.
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// Sort key: unknown locations last, then file, then first line.
type SortKey = (bool, String, i32);

fn sort_key(diag: &Diagnostic) -> SortKey {
    match diag.primary_location() {
        Some(loc) if loc.is_known() => (false, loc.file().to_owned(), loc.from_line()),
        _ => (true, String::new(), 0),
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
struct QueuedDiagnostic {
    diagnostic: Diagnostic,
    key: SortKey,
}

/// Diagnostics of one compilation unit, in report order until flushed.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticQueue {
    diagnostics: Vec<QueuedDiagnostic>,
    /// Accepted diagnostics with error severity.
    error_count: usize,
    /// Key and message of the last accepted error, for dedup.
    last_error: Option<(SortKey, String)>,
    config: DiagnosticConfig,
}

impl Default for DiagnosticQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::with_config(DiagnosticConfig::default())
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            diagnostics: Vec::new(),
            error_count: 0,
            last_error: None,
            config,
        }
    }

    /// Queue `diag` unless the limit is reached or it repeats the previous
    /// error. Reports whether it was kept.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        if self.limit_reached() {
            tracing::trace!(code = %diag.code, "error limit reached, diagnostic dropped");
            return false;
        }

        let key = sort_key(&diag);
        let is_error = diag.is_error();

        if is_error && self.config.deduplicate {
            if let Some((last_key, last_message)) = &self.last_error {
                if *last_key == key && *last_message == diag.message {
                    tracing::trace!(code = %diag.code, "duplicate diagnostic dropped");
                    return false;
                }
            }
        }

        if is_error {
            self.last_error = Some((key.clone(), diag.message.clone()));
            self.error_count += 1;
        }
        self.diagnostics.push(QueuedDiagnostic {
            diagnostic: diag,
            key,
        });
        true
    }

    /// Queue an error and return the proof of it.
    ///
    /// A diagnostic dropped by the limit still yields the proof; the limit
    /// is reported separately through [`too_many_errors`].
    pub fn emit_error(&mut self, diag: Diagnostic) -> ErrorGuaranteed {
        self.add(diag);
        ErrorGuaranteed::new()
    }

    /// Whether further errors would be dropped.
    pub fn limit_reached(&self) -> bool {
        match self.config.error_limit {
            0 => false,
            limit => self.error_count >= limit,
        }
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// `Some` proof if at least one error was emitted.
    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Sort diagnostics by location and return them, clearing the queue.
    ///
    /// The sort is stable, so diagnostics at the same line keep the order
    /// they were reported in.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let already_sorted = self.diagnostics.windows(2).all(|w| w[0].key <= w[1].key);
        if !already_sorted {
            self.diagnostics.sort_by(|a, b| a.key.cmp(&b.key));
        }

        let result = self.diagnostics.drain(..).map(|d| d.diagnostic).collect();
        self.error_count = 0;
        self.last_error = None;
        result
    }

    /// Queued diagnostics in report order.
    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().map(|queued| &queued.diagnostic)
    }
}

/// The diagnostic closing a unit whose errors were cut off at `limit`.
#[cold]
pub fn too_many_errors(limit: usize, location: Location) -> Diagnostic {
    Diagnostic::error(ErrorCode::E9002)
        .with_message(format!("stopped after {limit} errors"))
        .with_label(location, "error limit reached here")
        .with_note("set BSL_ERROR_LIMIT to raise the limit")
}

#[cfg(test)]
mod tests;

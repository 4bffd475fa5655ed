//! Building an [`Ast`] while collecting every construction error.
//!
//! Construction fails node by node; the loader records each failure as a
//! diagnostic and keeps going, so one pass over a specification reports
//! all of its errors instead of only the first.

use bsl_diagnostic::queue::too_many_errors;
use bsl_diagnostic::{Diagnostic, DiagnosticConfig, DiagnosticQueue, ErrorGuaranteed};
use bsl_ir::{
    Ast, ConstId, Constant, Function, FunctionId, Id, Location, ModuleId, SemanticResult, Type,
    TypeId,
};

/// Diagnostics of a compilation unit that failed to load.
#[derive(Clone, Debug)]
pub struct LoadFailure {
    /// Sorted by location.
    pub diagnostics: Vec<Diagnostic>,
    pub guaranteed: ErrorGuaranteed,
}

/// Loader for one compilation unit.
pub struct SpecLoader {
    unit: String,
    ast: Ast,
    queue: DiagnosticQueue,
    /// Set once an error was dropped because the limit was reached.
    truncated: bool,
}

impl SpecLoader {
    pub fn new(unit: impl Into<String>) -> Self {
        Self::with_config(unit, DiagnosticConfig::default())
    }

    pub fn with_config(unit: impl Into<String>, config: DiagnosticConfig) -> Self {
        SpecLoader {
            unit: unit.into(),
            ast: Ast::new(),
            queue: DiagnosticQueue::with_config(config),
            truncated: false,
        }
    }

    /// The tree built so far.
    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn error_count(&self) -> usize {
        self.queue.error_count()
    }

    /// Keep a successful construction, or record its error and return
    /// `None`.
    pub fn check<T>(&mut self, result: SemanticResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::debug!(unit = %self.unit, %err, "construction failed");
                if !self.queue.add(Diagnostic::from(err)) && self.queue.limit_reached() {
                    self.truncated = true;
                }
                None
            }
        }
    }

    pub fn add_module(&mut self, id: Id, location: Location) -> Option<ModuleId> {
        let result = self.ast.add_module(id, location);
        self.check(result)
    }

    /// Add an anonymous type.
    pub fn add_type(&mut self, ty: SemanticResult<Type>) -> Option<TypeId> {
        let ty = self.check(ty)?;
        Some(self.ast.add_type(ty))
    }

    pub fn declare_type(
        &mut self,
        module: ModuleId,
        id: Id,
        ty: SemanticResult<Type>,
    ) -> Option<TypeId> {
        let ty = self.check(ty)?;
        let result = self.ast.declare_type(module, id, ty);
        self.check(result)
    }

    /// Add an anonymous constant built against the current tree.
    pub fn add_constant(
        &mut self,
        build: impl FnOnce(&Ast) -> SemanticResult<Constant>,
    ) -> Option<ConstId> {
        let constant = build(&self.ast);
        let constant = self.check(constant)?;
        Some(self.ast.add_constant(constant))
    }

    pub fn declare_constant(
        &mut self,
        module: ModuleId,
        id: Id,
        build: impl FnOnce(&Ast) -> SemanticResult<Constant>,
    ) -> Option<ConstId> {
        let constant = build(&self.ast);
        let constant = self.check(constant)?;
        let result = self.ast.declare_constant(module, id, constant);
        self.check(result)
    }

    pub fn add_function(&mut self, function: Function) -> Option<FunctionId> {
        let result = self.ast.add_function(function);
        self.check(result)
    }

    /// The finished tree, or every diagnostic sorted by location.
    #[tracing::instrument(level = "debug", skip_all, fields(unit = %self.unit))]
    pub fn finish(mut self) -> Result<Ast, LoadFailure> {
        let limit = self.queue.error_count();
        let Some(guaranteed) = self.queue.has_errors() else {
            tracing::debug!(nodes = self.ast.node_count(), "loaded");
            return Ok(self.ast);
        };

        let mut diagnostics = self.queue.flush();
        if self.truncated {
            diagnostics.push(too_many_errors(limit, Location::NONE));
        }
        tracing::debug!(errors = diagnostics.len(), "load failed");
        Err(LoadFailure {
            diagnostics,
            guaranteed,
        })
    }
}

//! Focused node capabilities.
//!
//! Each trait covers one capability so consumers only depend on what
//! they use.

use crate::{Ast, Location};

/// Nodes that carry a source location.
pub trait Located {
    fn location(&self) -> &Location;
}

/// Nodes that render a one-line human-readable summary.
///
/// Rendering needs the arena because nodes reference each other by index.
pub trait Render {
    fn render(&self, ast: &Ast) -> String;
}

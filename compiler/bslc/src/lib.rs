//! Binspec front end.
//!
//! Ties the specification model, diagnostics and parser engine together:
//!
//! - [`SpecLoader`] builds an [`Ast`](bsl_ir::Ast) for one compilation
//!   unit and reports all construction errors at once
//! - [`ParseSession`] parses a stream that arrives in pieces
//! - [`parse_documents`] parses many complete documents in parallel

mod config;
mod loader;
mod session;
mod tracing_setup;

use std::sync::Arc;

use bsl_engine::{EngineConfig, Program, Value};
use rayon::prelude::*;

pub use config::Config;
pub use loader::{LoadFailure, SpecLoader};
pub use session::{ParseSession, SessionError};
pub use tracing_setup::init_tracing;

/// Parse each complete document on its own engine, in parallel.
///
/// Results are in document order. A failing document does not affect the
/// others; its error carries the messages parsed before the failure.
#[tracing::instrument(level = "debug", skip_all, fields(documents = documents.len()))]
pub fn parse_documents<D>(
    program: &Arc<Program>,
    documents: &[D],
    config: &EngineConfig,
) -> Vec<Result<Vec<Value>, SessionError>>
where
    D: AsRef<[u8]> + Sync,
{
    documents
        .par_iter()
        .map(|document| {
            let mut session = ParseSession::new(Arc::clone(program), config.clone());
            let mut messages = session.feed(document.as_ref())?;
            match session.finish() {
                Ok(rest) => {
                    messages.extend(rest);
                    Ok(messages)
                }
                Err(mut err) => {
                    messages.append(&mut err.parsed);
                    err.parsed = messages;
                    Err(err)
                }
            }
        })
        .collect()
}

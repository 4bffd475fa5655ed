//! Front-end configuration.

use bsl_diagnostic::DiagnosticConfig;
use bsl_engine::EngineConfig;

/// Settings for loading specifications and running parse sessions.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Config {
    pub engine: EngineConfig,
    pub diagnostics: DiagnosticConfig,
}

impl Config {
    /// Defaults overridden from the environment:
    ///
    /// - `BSL_STACK_CAPACITY`, `BSL_MAX_FIELD_LEN`: engine limits
    /// - `BSL_ERROR_LIMIT`: errors kept per compilation unit (0 = unlimited)
    pub fn from_env() -> Self {
        let mut diagnostics = DiagnosticConfig::default();
        if let Ok(raw) = std::env::var("BSL_ERROR_LIMIT") {
            match raw.trim().parse() {
                Ok(limit) => diagnostics.error_limit = limit,
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid BSL_ERROR_LIMIT"),
            }
        }
        Config {
            engine: EngineConfig::from_env(),
            diagnostics,
        }
    }
}

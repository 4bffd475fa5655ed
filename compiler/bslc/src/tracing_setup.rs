use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times. Filtering comes
/// from `BSL_LOG` (falling back to `RUST_LOG`), e.g.
/// `BSL_LOG=bsl_engine=trace`. Nothing is installed when neither is set.
/// Setting `BSL_LOG_TREE` switches to an indented span tree.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let Ok(directives) = std::env::var("BSL_LOG").or_else(|_| std::env::var("RUST_LOG"))
        else {
            return;
        };
        let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("warn"));

        let tree = std::env::var_os("BSL_LOG_TREE").map(|_| {
            tracing_tree::HierarchicalLayer::new(2)
                .with_targets(true)
                .with_bracketed_fields(true)
        });
        let flat = tree
            .is_none()
            .then(|| fmt::layer().with_target(true).with_level(true));

        // Another subscriber may already be installed by the host.
        let installed = tracing_subscriber::registry()
            .with(filter)
            .with(tree)
            .with(flat)
            .try_init();
        if installed.is_err() {
            tracing::debug!("global subscriber already set");
        }
    });
}

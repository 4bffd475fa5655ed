//! Engine limits.

/// Limits applied to one engine.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct EngineConfig {
    /// Size of the stack region in bytes.
    pub stack_capacity: usize,
    /// Largest length a stream may declare for a single field.
    pub max_field_len: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            stack_capacity: 4096,
            max_field_len: 16 * 1024 * 1024,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `BSL_STACK_CAPACITY` and `BSL_MAX_FIELD_LEN`.
    ///
    /// Unparsable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(capacity) = parse_var(&lookup, "BSL_STACK_CAPACITY") {
            config.stack_capacity = capacity;
        }
        if let Some(max) = parse_var(&lookup, "BSL_MAX_FIELD_LEN") {
            config.max_field_len = max;
        }
        config
    }

    #[must_use]
    pub fn with_stack_capacity(mut self, stack_capacity: usize) -> Self {
        self.stack_capacity = stack_capacity;
        self
    }

    #[must_use]
    pub fn with_max_field_len(mut self, max_field_len: u64) -> Self {
        self.max_field_len = max_field_len;
        self
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring invalid engine setting");
            None
        }
    }
}

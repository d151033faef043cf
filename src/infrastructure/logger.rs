use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

pub struct Logger;

impl Logger {
    /// Initialize the global tracing subscriber once. `RUST_LOG` wins over
    /// the configured level.
    pub fn init(level: &str) {
        let level = level.to_string();
        INIT.call_once(move || {
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(level));

            fmt()
                .with_env_filter(filter)
                .with_target(false)
                .init();
        });
    }
}

//! Logging setup for the xvert binary.
//!
//! Library code logs through `tracing`. The binary installs a compact
//! formatter on stderr; `RUST_LOG` overrides the default filter.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset: per-function warnings only.
pub const DEFAULT_FILTER: &str = "xvert=warn";

/// Initialize the global tracing subscriber. Call once, before any logging.
pub fn init_logger(no_color: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

/// Whether colored output should be used, honoring `NO_COLOR`.
pub fn should_use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

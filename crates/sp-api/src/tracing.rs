//! Log initialization.
//!
//! One global filter, two output formats: pretty human-readable logs with
//! source locations in development, flattened JSON for log aggregation in
//! production. `RUST_LOG` overrides the per-environment default directives.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Environment;

/// Development default: chatty for this workspace, quiet for the noisy deps.
const DEV_DIRECTIVES: &str = "debug,hyper=info,tower_http=debug,sqlx=warn";
/// Production default.
const PROD_DIRECTIVES: &str = "info,sqlx=warn";

pub fn init_tracing(env: &Environment) {
    let directives = if env.is_development() {
        DEV_DIRECTIVES
    } else {
        PROD_DIRECTIVES
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    if env.is_development() {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .init();
    }

    tracing::debug!(environment = ?env, "logging initialized");
}

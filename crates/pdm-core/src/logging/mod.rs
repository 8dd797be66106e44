//! Structured logging.
//!
//! Two output modes on stderr:
//! - human-readable console lines for interactive use
//! - JSONL for scripted runs (`PDM_LOG_FORMAT=jsonl`)
//!
//! stdout is reserved for command payloads.

pub mod config;
pub mod events;
pub mod layer;

pub use config::{LogConfig, LogFormat, LogLevel};
pub use events::{event_names, Level, LogContext, LogEvent, Stage};
pub use layer::JsonlLayer;

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// Call once at startup. An already-installed subscriber is left in place.
pub fn init_logging(config: &LogConfig) {
    // Event names are used as targets, so filter on level alone.
    let filter = EnvFilter::new(config.level.to_string());

    let result = match config.format {
        LogFormat::Human => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal());
            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .try_init()
            }
        }
        LogFormat::Jsonl => tracing_subscriber::registry()
            .with(filter)
            .with(JsonlLayer::stderr())
            .try_init(),
    };
    if result.is_err() {
        tracing::debug!("logging already initialized");
    }
}

/// Unique id for this invocation: `run-` plus 12 hex chars.
pub fn generate_run_id() -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("run-{}", &uuid[..12])
}

/// Emit a structured event through `tracing`, tagged with the context.
///
/// ```ignore
/// log_event!(ctx, INFO, event_names::IMPORT_STARTED, Stage::Import,
///     "Connecting to historian...", ticket = 3u64);
/// ```
#[macro_export]
macro_rules! log_event {
    ($ctx:expr, $level:ident, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)* $(,)?) => {
        tracing::event!(
            target: $event,
            tracing::Level::$level,
            run_id = %$ctx.run_id,
            asset = $ctx.asset.as_deref().unwrap_or(""),
            stage = %$stage,
            $($key = $val,)*
            "{}",
            $msg
        )
    };
}

//! Logging for the solver library and the `lp-core` binary.
//!
//! The library only emits `tracing` events whose target is one of the
//! [`event_names`]; the binary picks a subscriber with [`init_logging`]:
//! `tracing_subscriber::fmt` for terminals or [`JsonlLayer`] for pipelines.
//! Either way stdout stays reserved for command payloads.
//!
//! ```ignore
//! use lp_core::logging::{event_names, init_logging, LogConfig, LogContext, Stage};
//!
//! init_logging(&LogConfig::from_env(None, None));
//! let ctx = LogContext::new("run-0123456789ab").with_model("tiger");
//! lp_core::log_event!(ctx, INFO, event_names::RUN_STARTED, Stage::Init, "Starting solve");
//! ```

pub mod config;
pub mod events;
pub mod layer;

pub use config::{LogConfig, LogFormat, LogLevel};
pub use events::{event_names, Level, LogContext, LogEvent, Stage};
pub use layer::JsonlLayer;

use std::io::IsTerminal;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber described by `config`.
///
/// `RUST_LOG` is folded into `config.level` by [`LogConfig::from_env`], so
/// the filter here is a single level and CLI flags always win. Human output
/// shows the event name (the tracing target) on every line. A second call
/// leaves the first subscriber in place.
pub fn init_logging(config: &LogConfig) {
    let level: LevelFilter = config.level.into();
    let filter = EnvFilter::default().add_directive(level.into());
    let registry = tracing_subscriber::registry().with(filter);

    let _ = match config.format {
        LogFormat::Jsonl => registry.with(JsonlLayer::stderr()).try_init(),
        LogFormat::Human => {
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(std::io::stderr().is_terminal());
            if config.timestamps {
                registry.with(layer).try_init()
            } else {
                registry.with(layer.without_time()).try_init()
            }
        }
    };
}

/// Emit an event stamped with the context's `run_id`, `model` and a stage.
///
/// `$level` is a `tracing::Level` constant name (`INFO`, `DEBUG`, ...).
/// Extra fields take the `key = value` form only; bind display strings to a
/// local first.
#[macro_export]
macro_rules! log_event {
    ($ctx:expr, $level:ident, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)* $(,)?) => {
        tracing::event!(
            target: $event,
            tracing::Level::$level,
            run_id = %$ctx.run_id,
            model = $ctx.model.as_deref().unwrap_or("-"),
            stage = %$stage,
            message = $msg,
            $($key = $val,)*
        )
    };
}

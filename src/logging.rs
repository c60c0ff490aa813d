use std::env;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding an explicit `EnvFilter` directive.
pub const LOG_ENV: &str = "SRCSYNC_LOG";

/// Install the stderr subscriber.
///
/// `SRCSYNC_LOG` wins when set; otherwise the level follows the `-v` count
/// (0 = warn, 1 = info, 2 = debug, 3+ = trace). Calling this twice is a no-op.
pub fn init_logger(verbosity: u8) {
    let directive = env::var(LOG_ENV).unwrap_or_else(|_| default_directive(verbosity).to_string());
    let filter_layer = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter_layer)
        .try_init();
}

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

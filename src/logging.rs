use tracing_subscriber::{fmt, EnvFilter};

/// Sets up the tracing subscriber on stderr.
/// `RUST_LOG` wins when set; otherwise the level follows the `-v` count.
pub fn init_logging(verbosity: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity, quiet)));

    // A subscriber may already be installed when running under a test harness.
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    tracing::debug!("Logging setup complete.");
}

fn default_directive(verbosity: u8, quiet: bool) -> String {
    let level = if quiet {
        "error"
    } else {
        match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    format!("point_sampler={}", level)
}

// Logging setup. Logs go to stderr so they never mix with tables and
// prompts on stdout. `RUST_LOG` overrides the flag-derived level.

use tracing_subscriber::{fmt, EnvFilter};

/// Map `-q` / `-v` counts to a filter directive.
pub fn derive_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

pub fn init_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(derive_level(verbose, quiet)));
    // A second init (e.g. in tests) is harmless; keep the first subscriber.
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

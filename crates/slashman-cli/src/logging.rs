//! Log output for the CLI

use tracing_subscriber::EnvFilter;

/// Environment variable with the log filter, checked before `RUST_LOG`
pub const LOG_ENV: &str = "SLASH_MAN_LOG";

/// Install the stderr subscriber. The filter comes from `SLASH_MAN_LOG`,
/// then `RUST_LOG`, then `warn` (`debug` with `--verbose`).
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = [LOG_ENV, "RUST_LOG"]
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default));

    // A second init (e.g. in tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

use anyhow::{anyhow, Result};
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber, writing to stderr.
///
/// The filter is read from `RUST_LOG`, falling back to `info`. Fails if a global subscriber has
/// already been installed.
pub fn init() -> Result<()> {
    let timer = OffsetTime::new(
        time::UtcOffset::UTC,
        time::macros::format_description!("[hour]:[minute]:[second].[subsecond digits:6]"),
    );
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .event_format(
            tracing_subscriber::fmt::format()
                .with_target(false)
                .with_source_location(true)
                .with_timer(timer),
        )
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_fails() {
        // Another test may have installed a subscriber already, so only the second call is
        // guaranteed to fail.
        let _ = init();
        assert!(init().is_err());
    }
}

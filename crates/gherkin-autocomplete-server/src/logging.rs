//! Logging setup for the language server.
//!
//! stdout belongs to the JSON-RPC stream; a single stray line there
//! corrupts the protocol framing, so every log line goes to stderr.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use crate::config::ServerConfig;

fn level_filter(config: &ServerConfig) -> EnvFilter {
    EnvFilter::new(config.log_level.as_filter_str())
}

/// Initialise the tracing subscriber from the server configuration.
///
/// Verbosity comes from `config.log_level`, which in turn reflects the
/// `--log-level` flag or `GHERKIN_AUTOCOMPLETE_LSP_LOG_LEVEL` (flag wins;
/// see [`crate::config::ServerConfig::apply_overrides`]).
///
/// Calling this more than once keeps the first subscriber: the error from
/// `set_global_default` is ignored so tests and embedding hosts can
/// install their own.
pub fn init_logging(config: &ServerConfig) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(level_filter(config))
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;

    #[test]
    fn repeated_initialisation_keeps_the_first_subscriber() {
        let config = ServerConfig::default();
        init_logging(&config);
        init_logging(&config.clone().with_log_level(LogLevel::Trace));
    }

    #[test]
    fn filter_tracks_the_configured_level() {
        let config = ServerConfig::default().with_log_level(LogLevel::Debug);
        assert_eq!(level_filter(&config).to_string(), "debug");

        let config = ServerConfig::default().with_log_level(LogLevel::Error);
        assert_eq!(level_filter(&config).to_string(), "error");
    }
}

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,snowdrift=debug,drift_core=debug";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Initialize logging.
/// - RUST_LOG respected; default to "info,snowdrift=debug,drift_core=debug"
/// - JSON lines for collectors, human-readable otherwise
/// - Writes to stderr so stdout stays free for period output
pub fn init(service_name: &str, format: LogFormat) {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    let registry = tracing_subscriber::registry().with(EnvFilter::new(env_filter));

    let result = match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    if result.is_ok() {
        tracing::info!(service = %service_name, "Logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_covers_binary_and_core() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
        let directives: Vec<&str> = DEFAULT_FILTER.split(',').collect();
        assert!(directives.contains(&"snowdrift=debug"));
        assert!(directives.contains(&"drift_core=debug"));
    }

    #[test]
    fn init_twice_is_harmless() {
        init("snowdrift-test", LogFormat::Pretty);
        init("snowdrift-test", LogFormat::Json);
    }
}

use eyre::{Result, WrapErr};
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging with JSON output on stderr
pub fn init_tracing() -> Result<()> {
    Registry::default()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(true)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init()
        .wrap_err("Failed to install JSON subscriber")?;

    tracing::info!("Switchyard structured logging initialized");
    Ok(())
}

/// Initialize console-friendly logging, written to stderr so CLI output stays clean
pub fn init_console_tracing() -> Result<()> {
    Registry::default()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .try_init()
        .wrap_err("Failed to install console subscriber")?;

    tracing::debug!("Switchyard console logging initialized");
    Ok(())
}

/// Initialize tracing with custom configuration
pub fn init_tracing_with_config(level: &str, json_format: bool, include_spans: bool) -> Result<()> {
    let env_filter =
        EnvFilter::try_new(level).wrap_err_with(|| format!("Invalid log level: {level}"))?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let installed = if json_format {
        Registry::default()
            .with(env_filter)
            .with(
                fmt_layer
                    .json()
                    .with_current_span(include_spans)
                    .with_span_list(include_spans),
            )
            .try_init()
    } else {
        Registry::default()
            .with(env_filter)
            .with(fmt_layer.pretty().with_ansi(true))
            .try_init()
    };
    installed.wrap_err("Failed to install subscriber")?;

    tracing::info!(
        level,
        json = json_format,
        spans = include_spans,
        "Switchyard logging initialized"
    );
    Ok(())
}

/// Configure tracing for a router component (guards, matcher, resolver, watcher)
pub fn configure_component_tracing(component: &str) -> tracing::Span {
    tracing::info_span!("component", name = component)
}

/// Create a request-scoped span; outcome fields are recorded once dispatch finishes
pub fn create_request_span(method: &str, uri: &str) -> tracing::Span {
    tracing::info_span!(
        "request",
        http.method = method,
        http.uri = uri,
        route.outcome = tracing::field::Empty,
        route.handler = tracing::field::Empty,
        http.status_code = tracing::field::Empty,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_with_config() {
        let result = init_tracing_with_config("debug", true, true);
        assert!(result.is_ok());
    }

    #[test]
    fn test_create_request_span() {
        tracing::subscriber::with_default(Registry::default(), || {
            let span = create_request_span("get", "/shop/widgets");
            assert_eq!(span.metadata().map(|m| m.name()), Some("request"));
        });
    }

    #[test]
    fn test_configure_component_tracing() {
        tracing::subscriber::with_default(Registry::default(), || {
            let span = configure_component_tracing("guards");
            assert_eq!(span.metadata().map(|m| m.name()), Some("component"));
        });
    }

    #[tokio::test]
    async fn test_component_span_instruments_spawned_task() {
        use tracing::Instrument;

        let _guard = tracing::subscriber::set_default(Registry::default());
        let span = configure_component_tracing("config_watcher");
        let task = async {
            tokio::task::yield_now().await;
            tracing::Span::current().metadata().map(|m| m.name())
        };

        let name = tokio::spawn(task.instrument(span)).await.unwrap();
        assert_eq!(name, Some("component"));
    }
}

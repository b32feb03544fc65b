use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::protocol::canonical::Usage;

/// Map a config log level to an `EnvFilter` directive.
///
/// Returns `None` for `DISABLED`. `WARNING` and `CRITICAL` map to `WARN` and
/// `ERROR`; anything else is passed through.
fn filter_directive(log_level: &str) -> Option<String> {
    let level = log_level.to_uppercase();
    match level.as_str() {
        "DISABLED" => None,
        "WARNING" => Some("WARN".to_string()),
        "CRITICAL" => Some("ERROR".to_string()),
        _ => Some(level),
    }
}

/// Initialize the tracing subscriber with the given log level.
///
/// A second call, or a call after another subscriber was installed, is a
/// no-op.
pub fn init_tracing(log_level: &str) {
    let Some(directive) = filter_directive(log_level) else {
        return;
    };

    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("INFO"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

/// Log token usage for a completed request at INFO level.
pub fn log_request_complete(model: &str, usage: &Usage, elapsed: Duration) {
    tracing::info!(
        model = model,
        prompt_tokens = usage.prompt_tokens,
        completion_tokens = usage.completion_tokens,
        total_tokens = usage.total_tokens,
        duration_seconds = elapsed.as_secs_f64(),
        "request completed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive_mapping() {
        assert_eq!(filter_directive("warning").as_deref(), Some("WARN"));
        assert_eq!(filter_directive("CRITICAL").as_deref(), Some("ERROR"));
        assert_eq!(filter_directive("debug").as_deref(), Some("DEBUG"));
        assert_eq!(filter_directive("Disabled"), None);
    }

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing("DEBUG");
        init_tracing("INFO");
        log_request_complete("gpt-4o", &Usage::new(10, 5), Duration::from_millis(12));
    }
}

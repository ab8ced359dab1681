pub fn init() {
    // Initialize tracing subscriber once, honoring RUST_LOG if set.
    // Logs go to stderr: in stdio mode stdout carries MCP frames.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Record a backend call outcome through the `metrics` facade and as a log line.
pub fn log_backend_call(route: &'static str, outcome: &'static str, elapsed_ms: f64) {
    metrics::counter!("emi_backend_requests_total", "route" => route, "outcome" => outcome)
        .increment(1);
    metrics::histogram!("emi_backend_latency_ms", "route" => route).record(elapsed_ms);
    tracing::info!(route = route, outcome = outcome, elapsed_ms = elapsed_ms, "metric");
}

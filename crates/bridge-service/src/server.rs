//! The metrics HTTP endpoint (§5, §6): a background task that shares no
//! mutable state with the scheduler loop beyond the `Registry` the gauges
//! and counters are already registered against.

use axum::{routing::get, Router};
use prometheus::{Encoder, Registry, TextEncoder};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Default bind address for the Prometheus exposition endpoint (§6).
pub const DEFAULT_METRICS_ADDR: &str = "0.0.0.0:9811";

#[derive(Clone)]
struct AppState {
	registry: Arc<Registry>,
}

/// Serves `GET /` with the Prometheus text exposition format of every metric
/// registered on `registry`. Runs until the process exits; a bind failure is
/// the caller's to report.
pub async fn serve_metrics(registry: Arc<Registry>, addr: &str) -> std::io::Result<()> {
	let app = Router::new()
		.route("/", get(handle_metrics))
		.layer(TraceLayer::new_for_http())
		.with_state(AppState { registry });

	let listener = TcpListener::bind(addr).await?;
	tracing::info!(%addr, "metrics endpoint listening");
	axum::serve(listener, app).await
}

async fn handle_metrics(axum::extract::State(state): axum::extract::State<AppState>) -> String {
	let metric_families = state.registry.gather();
	let mut buf = Vec::new();
	if let Err(err) = TextEncoder::new().encode(&metric_families, &mut buf) {
		tracing::warn!(error = %err, "failed to encode metrics");
		return String::new();
	}
	String::from_utf8(buf).unwrap_or_default()
}

#[cfg(test)]
mod tests {
	use super::*;
	use bridge_core::Metrics;

	#[tokio::test]
	async fn metrics_text_contains_the_registered_gauge_names() {
		let registry = Arc::new(Registry::new());
		let _metrics = Metrics::new(&registry).unwrap();
		let families = registry.gather();
		let mut buf = Vec::new();
		TextEncoder::new().encode(&families, &mut buf).unwrap();
		let text = String::from_utf8(buf).unwrap();
		assert!(text.contains("sync_block_height"));
		assert!(text.contains("fx_key_balance"));
	}
}

//! Router composition.

use super::{
	handlers::{error_404, healthz, list_charts, metrics, render_tile, serve_tile},
	metrics::TileMetrics,
};
use crate::{Palette, TileService};
use anyhow::Result;
use axum::{Router, routing::get};
use std::sync::Arc;

/// Shared state of all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
	pub service: Arc<TileService>,
	/// Palette used when a render request does not name one.
	pub palette: Palette,
	pub metrics: Arc<TileMetrics>,
}

impl AppState {
	pub fn new(service: Arc<TileService>) -> Result<AppState> {
		Ok(AppState {
			service,
			palette: Palette::default(),
			metrics: Arc::new(TileMetrics::new()?),
		})
	}
}

pub fn build_router(state: AppState) -> Router {
	Router::new()
		.route("/tiles/{handle}/{z}/{x}/{y}", get(serve_tile))
		.route("/render/{z}/{x}/{y}", get(render_tile))
		.route("/charts", get(list_charts))
		.route("/healthz", get(healthz))
		.route("/metrics", get(metrics))
		.fallback(|| async { error_404() })
		.with_state(state)
}

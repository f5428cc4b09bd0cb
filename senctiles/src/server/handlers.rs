//! HTTP handlers and small response helpers.
//!
//! The tile service is synchronous; every handler runs it on tokio's blocking pool.

use super::{metrics::MIME_METRICS, routes::AppState};
use crate::{ChartError, TileFormat, TileOptions};
use axum::{
	body::Body,
	extract::{Path, Query, State},
	http::{StatusCode, header},
	response::{IntoResponse, Response},
};
use senctiles_core::{Blob, TileCoord};
use serde::{Deserialize, Serialize};
use std::time::Instant;

pub const MIME_MVT: &str = "application/x-protobuf";
pub const MIME_PNG: &str = "image/png";
pub const CACHE_CONTROL: &str = "public, max-age=3600";
/// Metrics label of tiles requested for handles nobody registered.
pub const UNKNOWN_KIND: &str = "unknown";

/// `GET /tiles/{handle}/{z}/{x}/{y}.pbf`
pub async fn serve_tile(
	Path((handle, z, x, y)): Path<(String, String, String, String)>,
	State(state): State<AppState>,
) -> Response<Body> {
	log::debug!("handle tile request: {handle}/{z}/{x}/{y}");

	let coord = match TileCoord::parse(&z, &x, strip_extension(&y)) {
		Ok(coord) => coord,
		Err(err) => return error_400(&format!("{err:#}")),
	};

	let kind = state
		.service
		.registry()
		.resolve(&handle)
		.map_or_else(|| UNKNOWN_KIND.to_string(), |chart| chart.kind);

	let started = Instant::now();
	let service = state.service.clone();
	let result = tokio::task::spawn_blocking(move || {
		service.query_tile_mvt(&handle, coord.level, coord.x, coord.y)
	})
	.await;

	match result {
		Ok(Ok(blob)) => {
			state
				.metrics
				.observe_tile(&kind, started.elapsed().as_secs_f64(), blob.len());
			ok_data(blob, MIME_MVT, true)
		}
		Ok(Err(err)) => error_from(&err),
		Err(err) => {
			log::error!("tile task failed: {err}");
			error_500()
		}
	}
}

#[derive(Debug, Default, Deserialize)]
pub struct RenderQuery {
	pub fmt: Option<String>,
	pub pal: Option<String>,
	pub safety: Option<String>,
}

/// `GET /render/{z}/{x}/{y}?fmt=png|mvt&pal=day|dusk|night&safety=<metres>`
pub async fn render_tile(
	Path((z, x, y)): Path<(String, String, String)>,
	Query(query): Query<RenderQuery>,
	State(state): State<AppState>,
) -> Response<Body> {
	log::debug!("handle render request: {z}/{x}/{y} {query:?}");

	let coord = match TileCoord::parse(&z, &x, strip_extension(&y)) {
		Ok(coord) => coord,
		Err(err) => return error_400(&format!("{err:#}")),
	};
	let mut options = match TileOptions::parse(query.fmt.as_deref(), query.pal.as_deref(), query.safety.as_deref()) {
		Ok(options) => options,
		Err(err) => return error_from(&err),
	};
	if query.pal.is_none() {
		options.palette = state.palette;
	}
	if query.safety.is_none() {
		options.safety_contour = state.service.safety_contour();
	}

	let service = state.service.clone();
	let result = tokio::task::spawn_blocking(move || {
		let tile = service.generate_tile(&coord.to_geo_bbox(), coord.level, &options)?;
		match options.format {
			TileFormat::Png => Ok(tile),
			TileFormat::Mvt => service.compress(&tile),
		}
	})
	.await;

	match (result, options.format) {
		(Ok(Ok(blob)), TileFormat::Png) => ok_data(blob, MIME_PNG, false),
		(Ok(Ok(blob)), TileFormat::Mvt) => ok_data(blob, MIME_MVT, true),
		(Ok(Err(err)), _) => error_from(&err),
		(Err(err), _) => {
			log::error!("render task failed: {err}");
			error_500()
		}
	}
}

#[derive(Serialize)]
struct ChartEntry {
	handle: String,
	path: String,
	kind: String,
}

#[derive(Serialize)]
struct ChartList {
	charts: Vec<ChartEntry>,
}

/// `GET /charts`
pub async fn list_charts(State(state): State<AppState>) -> Response<Body> {
	let charts = state
		.service
		.registry()
		.entries()
		.into_iter()
		.map(|(handle, info)| ChartEntry {
			handle: handle.to_string(),
			path: info.path,
			kind: info.kind,
		})
		.collect();

	match serde_json::to_string(&ChartList { charts }) {
		Ok(json) => ok_json(&json),
		Err(err) => {
			log::error!("failed to serialize chart list: {err}");
			error_500()
		}
	}
}

/// `GET /metrics`
pub async fn metrics(State(state): State<AppState>) -> Response<Body> {
	match state.metrics.render() {
		Ok(text) => ([(header::CONTENT_TYPE, MIME_METRICS)], text).into_response(),
		Err(err) => {
			log::error!("failed to render metrics: {err:#}");
			error_500()
		}
	}
}

/// `GET /healthz`
pub async fn healthz() -> Response<Body> {
	ok_json(r#"{"ok":true}"#)
}

// --- small helpers -----------------------------------------------------------

fn strip_extension(y: &str) -> &str {
	y.split_once('.').map_or(y, |(stem, _)| stem)
}

/// Strong ETag derived from the CRC-32 of the payload.
pub fn etag(blob: &Blob) -> String {
	let mut crc = flate2::Crc::new();
	crc.update(blob.as_slice());
	format!("\"{:08x}\"", crc.sum())
}

fn ok_data(blob: Blob, mime: &'static str, gzipped: bool) -> Response<Body> {
	let etag = etag(&blob);
	let body = Body::from(blob.into_vec());
	let headers = [
		(header::CONTENT_TYPE, mime),
		(header::CACHE_CONTROL, CACHE_CONTROL),
	];
	if gzipped {
		(headers, [(header::CONTENT_ENCODING, "gzip")], [(header::ETAG, etag)], body).into_response()
	} else {
		(headers, [(header::ETAG, etag)], body).into_response()
	}
}

pub fn ok_json(message: &str) -> Response<Body> {
	(
		[(header::CONTENT_TYPE, "application/json")],
		message.to_string(),
	)
		.into_response()
}

fn error_with(status: StatusCode, message: &str) -> Response<Body> {
	(
		status,
		[(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
		message.to_string(),
	)
		.into_response()
}

fn error_400(message: &str) -> Response<Body> {
	log::debug!("send 400: {message}");
	error_with(StatusCode::BAD_REQUEST, message)
}

pub fn error_404() -> Response<Body> {
	error_with(StatusCode::NOT_FOUND, "Not Found")
}

fn error_500() -> Response<Body> {
	error_with(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

fn error_from(err: &ChartError) -> Response<Body> {
	if err.is_client_error() {
		error_400(&err.to_string())
	} else {
		log::warn!("send 500: {err:#}");
		error_500()
	}
}

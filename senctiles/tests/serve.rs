
use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use rstest::rstest;
use senctiles_core::{Blob, compression::decompress_gzip};
use senctiles_geometry::{GeoValue, vector_tile::VectorTile};
use test_utilities::*;

fn decode(body: &[u8]) -> VectorTile {
	let raw = decompress_gzip(&Blob::from(body)).unwrap();
	VectorTile::from_blob(&raw).unwrap()
}

#[tokio::test]
async fn serve_known_chart_tile() {
	let app = app(service_with(&["charts/US5MA22M.000"], 10.0));
	let response = get(&app, "/tiles/senc_1/14/4953/6060.pbf").await;

	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.header("content-type"), Some("application/x-protobuf"));
	assert_eq!(response.header("content-encoding"), Some("gzip"));
	assert_eq!(response.header("cache-control"), Some("public, max-age=3600"));
	assert_eq!(
		response.header("etag").map(str::to_string),
		Some(senctiles::server::etag(&Blob::from(response.body.as_slice())))
	);

	let tile = decode(&response.body);
	assert_eq!(tile.layers.len(), 1);
	assert_eq!(tile.layers[0].name, "SOUNDG");
	let features = tile.layers[0].to_features().unwrap();
	assert_eq!(features.len(), 1);
	assert_eq!(features[0].properties.get("isShallow"), Some(&GeoValue::Bool(true)));
}

#[rstest]
#[case("/tiles/senc_1/3/1/2.pbf")]
#[case("/tiles/senc_1/3/1/2.mvt")]
#[case("/tiles/senc_1/3/1/2")]
#[tokio::test]
async fn serve_tile_extensions(#[case] path: &str) {
	let app = app(service_with(&["a.000"], 0.0));
	let response = get(&app, path).await;
	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(decode(&response.body).layers.len(), 1);
}

#[tokio::test]
async fn serve_unknown_chart_as_empty_tile() {
	let app = app(service_with(&[], 0.0));
	let response = get(&app, "/tiles/senc_42/3/1/2.pbf").await;
	assert_eq!(response.status, StatusCode::OK);
	assert!(!response.body.is_empty());
	assert_eq!(decode(&response.body).layers.len(), 0);
}

#[rstest]
#[case::bad_zoom("/tiles/senc_1/z/1/2.pbf")]
#[case::x_out_of_range("/tiles/senc_1/3/8/2.pbf")]
#[case::level_too_high("/tiles/senc_1/32/0/0.pbf")]
#[case::negative_y("/tiles/senc_1/3/1/-2.pbf")]
#[tokio::test]
async fn serve_malformed_coordinates(#[case] path: &str) {
	let app = app(service_with(&["a.000"], 0.0));
	assert_eq!(get(&app, path).await.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn render_png_and_mvt() {
	let app = app(service_with(&["a.000"], 0.0));

	let png = get(&app, "/render/3/4/2?pal=night").await;
	assert_eq!(png.status, StatusCode::OK);
	assert_eq!(png.header("content-type"), Some("image/png"));
	assert_eq!(png.header("content-encoding"), None);
	assert_eq!(&png.body[1..4], b"PNG");

	let mvt = get(&app, "/render/3/4/2?fmt=mvt&safety=2").await;
	assert_eq!(mvt.status, StatusCode::OK);
	assert_eq!(mvt.header("content-type"), Some("application/x-protobuf"));
	let features = decode(&mvt.body).layers[0].to_features().unwrap();
	assert_eq!(features[0].properties.get("isShallow"), Some(&GeoValue::Bool(false)));
}

#[rstest]
#[case("/render/3/4/2?fmt=jpg", "invalid format: must be 'png' or 'mvt', got 'jpg'")]
#[case("/render/3/4/2?pal=noon", "invalid palette: must be 'day', 'dusk' or 'night', got 'noon'")]
#[case("/render/3/4/2?safety=deep", "invalid safety_contour: must be a number, got 'deep'")]
#[tokio::test]
async fn render_rejects_bad_options(#[case] path: &str, #[case] message: &str) {
	let app = app(service_with(&[], 0.0));
	let response = get(&app, path).await;
	assert_eq!(response.status, StatusCode::BAD_REQUEST);
	assert_eq!(response.text(), message);
}

#[tokio::test]
async fn list_registered_charts() {
	let app = app(service_with(&["a.000", "b.000"], 0.0));
	let response = get(&app, "/charts").await;
	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.header("content-type"), Some("application/json"));
	assert_eq!(
		response.text(),
		r#"{"charts":[{"handle":"senc_1","path":"a.000","kind":"senc"},{"handle":"senc_2","path":"b.000","kind":"senc"}]}"#
	);
}

#[tokio::test]
async fn health_check() {
	let app = app(service_with(&[], 0.0));
	let response = get(&app, "/healthz").await;
	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.text(), r#"{"ok":true}"#);
}

fn metric_value(text: &str, series: &str) -> Option<f64> {
	text
		.lines()
		.find_map(|line| line.strip_prefix(series)?.strip_prefix(' ')?.parse().ok())
}

#[tokio::test]
async fn tile_requests_are_counted_per_kind() {
	let app = app(service_with(&["a.000"], 10.0));

	let first = get(&app, "/tiles/senc_1/14/4953/6060.pbf").await;
	let second = get(&app, "/tiles/senc_1/14/4953/6061.pbf").await;
	get(&app, "/tiles/senc_9/14/4953/6060.pbf").await;
	assert_eq!(first.status, StatusCode::OK);
	assert_eq!(second.status, StatusCode::OK);

	let response = get(&app, "/metrics").await;
	assert_eq!(response.status, StatusCode::OK);
	assert!(response.header("content-type").unwrap().starts_with("text/plain"));

	let text = response.text();
	let bytes = (first.body.len() + second.body.len()) as f64;
	assert_eq!(metric_value(&text, r#"tile_render_seconds_count{kind="senc"}"#), Some(2.0));
	assert_eq!(metric_value(&text, r#"tile_bytes_total{kind="senc"}"#), Some(bytes));
	assert_eq!(metric_value(&text, r#"tile_render_seconds_count{kind="unknown"}"#), Some(1.0));
}

#[tokio::test]
async fn failed_tile_requests_are_not_counted() {
	let app = app(service_with(&["a.000"], 0.0));
	assert_eq!(get(&app, "/tiles/senc_1/3/8/2.pbf").await.status, StatusCode::BAD_REQUEST);
	let text = get(&app, "/metrics").await.text();
	assert_eq!(metric_value(&text, r#"tile_render_seconds_count{kind="senc"}"#), None);
}

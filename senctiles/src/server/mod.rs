//! HTTP server for chart tiles.

mod handlers;
mod metrics;
mod routes;
mod tile_server;

pub use handlers::etag;
pub use metrics::TileMetrics;
pub use routes::{AppState, build_router};
pub use tile_server::TileServer;

mod tile_service;

pub use tile_service::TileService;

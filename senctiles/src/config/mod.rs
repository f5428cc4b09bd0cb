//! Server configuration, read from YAML.
//!
//! ```yaml
//! server:
//!   ip: 127.0.0.1
//!   port: 8080
//! charts:
//!   - path: charts/US5MA22M.000
//!   - path: charts/cm93
//!     kind: cm93
//! tiles:
//!   safety_contour: 10
//!   palette: dusk
//!   accept_missing: false
//! ```
//!
//! Command line arguments override values from the file.

mod chart;
mod main;
mod server;
mod tiles;

pub use chart::ChartConfig;
pub use main::Config;
pub use server::ServerConfig;
pub use tiles::TilesConfig;

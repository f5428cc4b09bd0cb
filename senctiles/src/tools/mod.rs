pub mod inspect;
pub mod render;
pub mod serve;
pub mod tile;

use anyhow::{Context, Result};
use senctiles::{
	TileService,
	chart::{ChartSource, StubChartSource},
	config::ChartConfig,
};
use senctiles_core::Blob;
use std::{
	io::Write,
	path::{Path, PathBuf},
	sync::Arc,
};

/// A service with every chart argument (`path` or `kind:path`) registered.
fn service_with_charts(charts: &[String], accept_missing: bool, safety_contour: f64) -> Result<TileService> {
	let source: Arc<dyn ChartSource> = if accept_missing {
		Arc::new(StubChartSource::accept_missing())
	} else {
		Arc::new(StubChartSource::new())
	};
	let service = TileService::new(source).with_safety_contour(safety_contour)?;
	for argument in charts {
		let chart = ChartConfig::parse_argument(argument);
		service
			.build_senc(&chart.path, chart.kind())
			.with_context(|| format!("Failed to register chart '{argument}'"))?;
	}
	Ok(service)
}

/// Writes to `output`, or to stdout if none is given.
fn write_output(blob: &Blob, output: Option<&PathBuf>) -> Result<()> {
	match output {
		Some(path) => blob.save_to_file(Path::new(path)),
		None => {
			let mut stdout = std::io::stdout().lock();
			stdout.write_all(blob.as_slice())?;
			stdout.flush()?;
			Ok(())
		}
	}
}

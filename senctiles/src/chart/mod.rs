//! Chart handles, the registry that issues them and the collaborators that read chart data.

mod raster;
mod registry;
mod source;

pub use raster::{RasterRenderer, SolidRasterRenderer, TILE_SIZE};
pub use registry::{ChartHandle, ChartInfo, ChartRegistry};
pub use source::{ChartSource, ChartSourceHandle, StubChartSource};

//! Raster rendering.

use crate::Palette;
use anyhow::{Context, Result};
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage, codecs::png};
use senctiles_core::{Blob, GeoBBox};

/// Edge length of rendered tiles in pixels.
pub const TILE_SIZE: u32 = 256;

pub trait RasterRenderer: Send + Sync {
	fn render_png(&self, bbox: &GeoBBox, level: u8, palette: Palette) -> Result<Blob>;
}

/// Fills the tile with the palette's background colour.
#[derive(Clone, Copy, Debug, Default)]
pub struct SolidRasterRenderer;

impl RasterRenderer for SolidRasterRenderer {
	fn render_png(&self, bbox: &GeoBBox, level: u8, palette: Palette) -> Result<Blob> {
		log::trace!("render {palette} tile for {bbox:?} at level {level}");
		let image = RgbImage::from_pixel(TILE_SIZE, TILE_SIZE, Rgb(palette.background()));

		let mut buffer: Vec<u8> = Vec::new();
		png::PngEncoder::new_with_quality(&mut buffer, png::CompressionType::Best, png::FilterType::Adaptive)
			.write_image(image.as_raw(), image.width(), image.height(), ExtendedColorType::Rgb8)
			.context("Failed to encode PNG tile")?;

		Ok(Blob::from(buffer))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use image::{ImageFormat, load_from_memory_with_format};
	use rstest::rstest;

	#[rstest]
	#[case(Palette::Day)]
	#[case(Palette::Dusk)]
	#[case(Palette::Night)]
	fn renders_background(#[case] palette: Palette) -> Result<()> {
		let bbox = GeoBBox::new(0.0, 0.0, 1.0, 1.0)?;
		let blob = SolidRasterRenderer.render_png(&bbox, 8, palette)?;
		assert_eq!(&blob.as_slice()[0..8], b"\x89PNG\r\n\x1a\n");

		let image = load_from_memory_with_format(blob.as_slice(), ImageFormat::Png)?.to_rgb8();
		assert_eq!(image.dimensions(), (TILE_SIZE, TILE_SIZE));
		assert_eq!(image.get_pixel(17, 200).0, palette.background());
		Ok(())
	}
}

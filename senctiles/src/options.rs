//! Per-request tile options: output format, colour palette and safety contour.

use crate::ChartError;
use serde::Deserialize;
use std::{fmt, str::FromStr};

/// Output format of a generated tile.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TileFormat {
	#[default]
	Png,
	Mvt,
}

impl FromStr for TileFormat {
	type Err = ChartError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value {
			"png" => Ok(TileFormat::Png),
			"mvt" => Ok(TileFormat::Mvt),
			_ => Err(ChartError::invalid(
				"format",
				format!("must be 'png' or 'mvt', got '{value}'"),
			)),
		}
	}
}

impl fmt::Display for TileFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			TileFormat::Png => "png",
			TileFormat::Mvt => "mvt",
		})
	}
}

/// S-52 colour scheme used for raster output.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
	#[default]
	Day,
	Dusk,
	Night,
}

impl Palette {
	/// Background (deep water) colour as RGB.
	pub fn background(self) -> [u8; 3] {
		match self {
			Palette::Day => [212, 234, 238],
			Palette::Dusk => [82, 101, 119],
			Palette::Night => [10, 14, 20],
		}
	}
}

impl FromStr for Palette {
	type Err = ChartError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value {
			"day" => Ok(Palette::Day),
			"dusk" => Ok(Palette::Dusk),
			"night" => Ok(Palette::Night),
			_ => Err(ChartError::invalid(
				"palette",
				format!("must be 'day', 'dusk' or 'night', got '{value}'"),
			)),
		}
	}
}

impl fmt::Display for Palette {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Palette::Day => "day",
			Palette::Dusk => "dusk",
			Palette::Night => "night",
		})
	}
}

/// Options for [`TileService::generate_tile`](crate::TileService::generate_tile).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TileOptions {
	pub format: TileFormat,
	pub palette: Palette,
	/// Depth in metres below which soundings count as safe.
	pub safety_contour: f64,
}

impl TileOptions {
	pub fn new(format: TileFormat, palette: Palette, safety_contour: f64) -> Result<TileOptions, ChartError> {
		let options = TileOptions {
			format,
			palette,
			safety_contour,
		};
		options.validate()?;
		Ok(options)
	}

	/// Parses raw string options, e.g. from a query string. Missing values take their defaults.
	pub fn parse(
		format: Option<&str>,
		palette: Option<&str>,
		safety_contour: Option<&str>,
	) -> Result<TileOptions, ChartError> {
		let format: TileFormat = format.map(str::parse).transpose()?.unwrap_or_default();
		let palette: Palette = palette.map(str::parse).transpose()?.unwrap_or_default();
		let safety_contour = match safety_contour {
			None => 0.0,
			Some(text) => text.trim().parse::<f64>().map_err(|_| {
				ChartError::invalid("safety_contour", format!("must be a number, got '{text}'"))
			})?,
		};
		TileOptions::new(format, palette, safety_contour)
	}

	pub fn validate(&self) -> Result<(), ChartError> {
		if !self.safety_contour.is_finite() {
			return Err(ChartError::invalid(
				"safety_contour",
				format!("must be a finite number, got {}", self.safety_contour),
			));
		}
		Ok(())
	}
}

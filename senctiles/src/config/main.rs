use super::{ChartConfig, ServerConfig, TilesConfig};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
	fs::File,
	io::{BufReader, Read},
	path::Path,
};

#[derive(Default, Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
	/// HTTP server configuration
	#[serde(default)]
	pub server: ServerConfig,

	/// Charts registered at startup
	#[serde(default)]
	pub charts: Vec<ChartConfig>,

	/// Tile rendering defaults
	#[serde(default)]
	pub tiles: TilesConfig,
}

impl Config {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		Ok(serde_yaml_ng::from_reader(reader)?)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		Ok(serde_yaml_ng::from_str(text)?)
	}

	/// Parses a file. Relative chart paths are resolved against the file's directory.
	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("Failed to open config file {path:?}"))?;
		let mut config =
			Config::from_reader(BufReader::new(file)).with_context(|| format!("Failed to parse config file {path:?}"))?;

		if let Some(base) = path.parent() {
			config.resolve_paths(base);
		}
		Ok(config)
	}

	pub fn resolve_paths(&mut self, base: &Path) {
		for chart in &mut self.charts {
			chart.resolve_path(base);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Palette;
	use pretty_assertions::assert_eq;
	use std::io::Write;

	const EXAMPLE: &str = "
server:
  ip: 127.0.0.1
  port: 51234
charts:
  - path: charts/US5MA22M.000
  - path: /data/cm93
    kind: cm93
tiles:
  safety_contour: 10
  palette: dusk
  accept_missing: true
";

	#[test]
	fn parse_example_config() {
		assert_eq!(
			Config::from_string(EXAMPLE).unwrap(),
			Config {
				server: ServerConfig {
					ip: Some("127.0.0.1".to_string()),
					port: Some(51234),
				},
				charts: vec![
					ChartConfig::from("charts/US5MA22M.000"),
					ChartConfig::from(("cm93", "/data/cm93")),
				],
				tiles: TilesConfig {
					safety_contour: Some(10.0),
					palette: Some(Palette::Dusk),
					accept_missing: Some(true),
				},
			}
		);
	}

	#[test]
	fn parse_empty_config() {
		assert_eq!(Config::from_string("").unwrap(), Config::default());
	}

	#[test]
	fn parse_invalid_config() {
		assert!(Config::from_string("server:\n  pi: 3.14.15.9").is_err());
		assert!(Config::from_string("tiles:\n  palette: noon").is_err());
		assert!(Config::from_string("charts:\n  - kind: senc").is_err());
	}

	#[test]
	fn from_path_resolves_relative_charts() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("server.yml");
		let mut file = File::create(&path).unwrap();
		file.write_all(EXAMPLE.as_bytes()).unwrap();
		drop(file);

		let config = Config::from_path(&path).unwrap();
		assert_eq!(
			config.charts[0].path,
			dir.path().join("charts/US5MA22M.000").to_string_lossy()
		);
		assert_eq!(config.charts[1].path, "/data/cm93");
	}

	#[test]
	fn missing_file() {
		let error = Config::from_path(Path::new("/no/such/server.yml")).unwrap_err();
		assert!(error.to_string().starts_with("Failed to open config file"));
	}
}

use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_KIND: &str = "senc";

/// A chart to register at startup.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ChartConfig {
	/// Path to the chart file or directory.
	pub path: String,

	/// Chart kind, used as handle prefix. Default: `senc`
	pub kind: Option<String>,
}

impl ChartConfig {
	pub fn kind(&self) -> &str {
		self.kind.as_deref().unwrap_or(DEFAULT_KIND)
	}

	pub fn resolve_path(&mut self, base: &Path) {
		let path = Path::new(&self.path);
		if path.is_relative() {
			self.path = base.join(path).to_string_lossy().into_owned();
		}
	}

	/// Parses a command line argument, either `path` or `kind:path`.
	pub fn parse_argument(argument: &str) -> ChartConfig {
		match argument.split_once(':') {
			Some((kind, path)) if is_kind(kind) && !path.is_empty() => ChartConfig::from((kind, path)),
			_ => ChartConfig::from(argument),
		}
	}
}

// Windows drive letters (`C:\...`) are not kinds.
fn is_kind(text: &str) -> bool {
	text.len() > 1 && text.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

impl From<&str> for ChartConfig {
	fn from(path: &str) -> Self {
		ChartConfig {
			path: path.to_string(),
			kind: None,
		}
	}
}

impl From<(&str, &str)> for ChartConfig {
	fn from((kind, path): (&str, &str)) -> Self {
		ChartConfig {
			path: path.to_string(),
			kind: Some(kind.to_string()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("charts/a.000", "senc", "charts/a.000")]
	#[case("cm93:charts/cm93", "cm93", "charts/cm93")]
	#[case("C:\\charts\\a.000", "senc", "C:\\charts\\a.000")]
	#[case("cm93:", "senc", "cm93:")]
	#[case("s-57:x.000", "s-57", "x.000")]
	fn parse_argument(#[case] argument: &str, #[case] kind: &str, #[case] path: &str) {
		let config = ChartConfig::parse_argument(argument);
		assert_eq!(config.kind(), kind);
		assert_eq!(config.path, path);
	}

	#[test]
	fn resolve_path() {
		let mut relative = ChartConfig::from("a.000");
		relative.resolve_path(Path::new("/etc/senctiles"));
		assert_eq!(relative.path, "/etc/senctiles/a.000");

		let mut absolute = ChartConfig::from("/data/a.000");
		absolute.resolve_path(Path::new("/etc/senctiles"));
		assert_eq!(absolute.path, "/data/a.000");
	}
}

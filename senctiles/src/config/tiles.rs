use crate::Palette;
use serde::Deserialize;

#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TilesConfig {
	/// Depth in metres separating safe from shallow soundings. Default: 0
	pub safety_contour: Option<f64>,

	/// Default palette for rendered tiles. Default: day
	pub palette: Option<Palette>,

	/// Register charts even if their path does not exist.
	pub accept_missing: Option<bool>,
}

impl TilesConfig {
	pub fn override_optional_safety_contour(&mut self, safety_contour: Option<f64>) {
		if safety_contour.is_some() {
			self.safety_contour = safety_contour;
		}
	}

	pub fn override_optional_accept_missing(&mut self, accept_missing: Option<bool>) {
		if accept_missing.is_some() {
			self.accept_missing = accept_missing;
		}
	}
}

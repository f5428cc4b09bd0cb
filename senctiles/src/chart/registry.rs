//! Thread-safe registry of loaded charts.
//!
//! Every registered chart gets a handle `"<kind>_<n>"`, where `n` counts registrations
//! starting at 1. Handles are never reused.

use super::ChartSourceHandle;
use crate::ChartError;
use parking_lot::Mutex;
use std::{collections::HashMap, fmt};

/// Opaque identifier of a registered chart, e.g. `senc_3`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChartHandle(String);

impl ChartHandle {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ChartHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// What the registry knows about a chart. Immutable once registered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartInfo {
	pub path: String,
	pub kind: String,
	pub source: ChartSourceHandle,
}

#[derive(Default)]
struct RegistryState {
	counter: u64,
	charts: HashMap<String, ChartInfo>,
	order: Vec<ChartHandle>,
}

#[derive(Default)]
pub struct ChartRegistry {
	state: Mutex<RegistryState>,
}

impl ChartRegistry {
	pub fn new() -> ChartRegistry {
		ChartRegistry::default()
	}

	/// Stores a chart and issues its handle.
	pub fn register(&self, path: &str, kind: &str, source: ChartSourceHandle) -> Result<ChartHandle, ChartError> {
		if path.is_empty() {
			return Err(ChartError::invalid("path", "must not be empty"));
		}
		if kind.is_empty() {
			return Err(ChartError::invalid("kind", "must not be empty"));
		}
		if kind.contains('/') {
			return Err(ChartError::invalid("kind", format!("must not contain '/', got '{kind}'")));
		}

		let info = ChartInfo {
			path: path.to_string(),
			kind: kind.to_string(),
			source,
		};

		let mut state = self.state.lock();
		state.counter += 1;
		let handle = ChartHandle(format!("{kind}_{}", state.counter));
		state.charts.insert(handle.0.clone(), info);
		state.order.push(handle.clone());
		drop(state);

		log::info!("registered chart '{path}' as {handle}");
		Ok(handle)
	}

	/// Looks a handle up. Unknown handles are not an error.
	pub fn resolve(&self, handle: &str) -> Option<ChartInfo> {
		self.state.lock().charts.get(handle).cloned()
	}

	/// All issued handles in issue order.
	pub fn handles(&self) -> Vec<ChartHandle> {
		self.state.lock().order.clone()
	}

	/// Handles with their chart info, in issue order.
	pub fn entries(&self) -> Vec<(ChartHandle, ChartInfo)> {
		let state = self.state.lock();
		state
			.order
			.iter()
			.filter_map(|handle| state.charts.get(&handle.0).map(|info| (handle.clone(), info.clone())))
			.collect()
	}

	pub fn len(&self) -> usize {
		self.state.lock().charts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl fmt::Debug for ChartRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ChartRegistry")
			.field("len", &self.len())
			.finish_non_exhaustive()
	}
}

use thiserror::Error;

/// Errors callers of the tile service need to tell apart.
#[derive(Debug, Error)]
pub enum ChartError {
	#[error("chart not found: {0}")]
	NotFound(String),

	#[error("invalid {field}: {message}")]
	InvalidArgument { field: &'static str, message: String },

	#[error("compression failed: {0}")]
	Compression(String),

	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl ChartError {
	pub fn invalid(field: &'static str, message: impl Into<String>) -> ChartError {
		ChartError::InvalidArgument {
			field,
			message: message.into(),
		}
	}

	/// `true` if the caller supplied bad input.
	pub fn is_client_error(&self) -> bool {
		matches!(self, ChartError::InvalidArgument { .. } | ChartError::NotFound(_))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages_name_the_field() {
		let error = ChartError::invalid("format", "must be 'png' or 'mvt', got 'jpg'");
		assert_eq!(error.to_string(), "invalid format: must be 'png' or 'mvt', got 'jpg'");
		assert!(error.is_client_error());
	}

	#[test]
	fn wraps_anyhow() {
		let error = ChartError::from(anyhow::anyhow!("boom"));
		assert_eq!(error.to_string(), "boom");
		assert!(!error.is_client_error());
	}
}

//! Error taxonomy for a single tile job.
//!
//! Every variant aborts the current job attempt. The scheduler does not
//! distinguish between them when deciding whether to retry; the distinction
//! exists for logging and for tests.

use std::{io, path::PathBuf, time::Duration};

/// Convenience alias used across the pipeline.
pub type TileResult<T> = Result<T, TileError>;

#[derive(Debug, thiserror::Error)]
pub enum TileError {
	/// A tile coordinate outside the pyramid bounds for its zoom level.
	#[error("invalid tile {level}/{x}/{y}: {reason}")]
	InvalidTile { level: u32, x: u32, y: u32, reason: String },

	/// A feature record that violates the transformer's preconditions.
	#[error("malformed record: {0}")]
	MalformedRecord(String),

	/// The inbound byte stream violates the record-separator framing.
	#[error("parse error in record {record}: {reason}")]
	Parse { record: u64, reason: String },

	/// An external process exited unsuccessfully.
	#[error("{program} failed: {status}")]
	ProcessFailure { program: String, status: String },

	/// An external process could not be started.
	#[error("failed to spawn {program}")]
	Spawn {
		program: String,
		#[source]
		source: io::Error,
	},

	/// The atomic rename of the finished archive failed.
	#[error("failed to publish {from:?} as {to:?}")]
	PublishFailure {
		from: PathBuf,
		to: PathBuf,
		#[source]
		source: io::Error,
	},

	/// The attempt exceeded its wall-clock budget.
	#[error("job timed out after {0:?}")]
	Timeout(Duration),

	#[error(transparent)]
	Io(#[from] io::Error),
}

impl TileError {
	/// Short, stable name of the error kind, used in log lines and reports.
	pub fn kind(&self) -> &'static str {
		match self {
			TileError::InvalidTile { .. } => "InvalidTile",
			TileError::MalformedRecord(_) => "MalformedRecord",
			TileError::Parse { .. } => "ParseError",
			TileError::ProcessFailure { .. } | TileError::Spawn { .. } => "ProcessFailure",
			TileError::PublishFailure { .. } => "PublishFailure",
			TileError::Timeout(_) => "Timeout",
			TileError::Io(_) => "Io",
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_and_kind() {
		let err = TileError::Parse {
			record: 3,
			reason: "missing record separator".into(),
		};
		assert_eq!(err.to_string(), "parse error in record 3: missing record separator");
		assert_eq!(err.kind(), "ParseError");

		let err = TileError::ProcessFailure {
			program: "tippecanoe".into(),
			status: "exit status: 1".into(),
		};
		assert_eq!(err.to_string(), "tippecanoe failed: exit status: 1");
		assert_eq!(err.kind(), "ProcessFailure");
	}

	#[test]
	fn io_errors_convert() {
		let err: TileError = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed").into();
		assert_eq!(err.kind(), "Io");
		assert_eq!(err.to_string(), "pipe closed");
	}
}

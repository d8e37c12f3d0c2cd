use async_trait::async_trait;
use std::fmt::{self, Display};
use tilebaker_core::{Tile, TileResult};

/// Lifecycle of a job: `queued → running → {done | retrying → running | failed}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JobState {
	Queued,
	Running,
	Retrying,
	Done,
	Failed,
}

impl JobState {
	pub fn is_terminal(self) -> bool {
		matches!(self, JobState::Done | JobState::Failed)
	}
}

impl Display for JobState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			JobState::Queued => "queued",
			JobState::Running => "running",
			JobState::Retrying => "retrying",
			JobState::Done => "done",
			JobState::Failed => "failed",
		})
	}
}

/// One tile's unit of work as tracked by the scheduler.
#[derive(Clone, Debug, PartialEq)]
pub struct Job {
	pub key: String,
	pub tile: Tile,
	pub state: JobState,
	/// Attempts started so far.
	pub attempts: u32,
	/// Message of the most recent failure.
	pub last_error: Option<String>,
}

impl Job {
	pub fn new(tile: Tile) -> Self {
		Self {
			key: tile.key(),
			tile,
			state: JobState::Queued,
			attempts: 0,
			last_error: None,
		}
	}
}

/// Runs a single attempt of a job.
///
/// Any error fails the attempt; the scheduler decides whether to retry.
#[async_trait]
pub trait JobExecutor: Send + Sync {
	async fn execute(&self, tile: &Tile) -> TileResult<()>;
}

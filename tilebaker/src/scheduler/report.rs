use super::{Job, JobState};
use std::fmt::{self, Display};

/// Final state of every job once the queue has drained, in submission order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrainReport {
	pub jobs: Vec<Job>,
}

impl DrainReport {
	pub fn done(&self) -> impl Iterator<Item = &Job> {
		self.jobs.iter().filter(|job| job.state == JobState::Done)
	}

	pub fn failed(&self) -> impl Iterator<Item = &Job> {
		self.jobs.iter().filter(|job| job.state == JobState::Failed)
	}

	pub fn is_success(&self) -> bool {
		self.failed().next().is_none()
	}

	/// Attempts beyond the first, summed over all jobs.
	pub fn retries(&self) -> u32 {
		self.jobs.iter().map(|job| job.attempts.saturating_sub(1)).sum()
	}
}

impl Display for DrainReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} jobs: {} done, {} failed, {} retries",
			self.jobs.len(),
			self.done().count(),
			self.failed().count(),
			self.retries()
		)
	}
}

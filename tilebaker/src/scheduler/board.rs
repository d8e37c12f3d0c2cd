use super::{Job, JobState};
use parking_lot::Mutex;
use std::{collections::HashMap, sync::Arc};
use tilebaker_core::Tile;

/// Shared view of every job's state, owned by the scheduler.
#[derive(Clone, Debug, Default)]
pub struct JobBoard {
	jobs: Arc<Mutex<HashMap<String, Job>>>,
}

impl JobBoard {
	pub fn enqueue(&self, tile: Tile) {
		let job = Job::new(tile);
		self.jobs.lock().insert(job.key.clone(), job);
	}

	/// Mark `key` as running and count the attempt. Returns the attempt number.
	pub fn start_attempt(&self, key: &str) -> u32 {
		let mut jobs = self.jobs.lock();
		match jobs.get_mut(key) {
			Some(job) => {
				job.state = JobState::Running;
				job.attempts += 1;
				job.attempts
			}
			None => 0,
		}
	}

	pub fn set_state(&self, key: &str, state: JobState) {
		if let Some(job) = self.jobs.lock().get_mut(key) {
			job.state = state;
		}
	}

	pub fn record_error(&self, key: &str, state: JobState, error: String) {
		if let Some(job) = self.jobs.lock().get_mut(key) {
			job.state = state;
			job.last_error = Some(error);
		}
	}

	pub fn get(&self, key: &str) -> Option<Job> {
		self.jobs.lock().get(key).cloned()
	}

	pub fn count(&self, state: JobState) -> usize {
		self.jobs.lock().values().filter(|job| job.state == state).count()
	}

	pub fn is_drained(&self) -> bool {
		self.jobs.lock().values().all(|job| job.state.is_terminal())
	}
}

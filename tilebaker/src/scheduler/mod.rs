//! Bounded-concurrency queue with per-job retry.
//!
//! Every tile gets its own task, but a task only calls the executor while it
//! holds one of `concurrency` semaphore permits. A failed attempt releases its
//! permit before sleeping the retry delay, so waiting retries never block
//! queued jobs.

mod board;
mod job;
mod report;

pub use board::JobBoard;
pub use job::{Job, JobExecutor, JobState};
pub use report::DrainReport;

use std::{collections::HashSet, sync::Arc, time::Duration};
use tilebaker_core::{Config, Tile};
use tokio::sync::Semaphore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
	pub concurrency: usize,
	pub max_retries: u32,
	pub retry_delay: Duration,
}

impl RetryPolicy {
	pub fn from_config(config: &Config) -> Self {
		Self {
			concurrency: config.concurrency,
			max_retries: config.max_retries,
			retry_delay: config.retry_delay(),
		}
	}
}

pub struct Scheduler<E> {
	executor: Arc<E>,
	policy: RetryPolicy,
	board: JobBoard,
}

impl<E: JobExecutor + 'static> Scheduler<E> {
	pub fn new(executor: Arc<E>, policy: RetryPolicy) -> Self {
		Self {
			executor,
			policy,
			board: JobBoard::default(),
		}
	}

	pub fn board(&self) -> &JobBoard {
		&self.board
	}

	/// Run every tile to a terminal state and report the outcome.
	///
	/// A job that keeps failing is given up after `1 + max_retries` attempts;
	/// it never holds up the others. Repeated tiles are scheduled once.
	pub async fn run(&self, tiles: Vec<Tile>) -> DrainReport {
		let slots = Arc::new(Semaphore::new(self.policy.concurrency.max(1)));
		log::info!(
			"scheduling {} tiles, {} at a time",
			tiles.len(),
			self.policy.concurrency.max(1)
		);

		let mut seen = HashSet::new();
		let mut handles = Vec::with_capacity(tiles.len());
		for tile in tiles {
			if !seen.insert(tile) {
				log::warn!("{}: listed more than once, scheduling it once", tile.key());
				continue;
			}
			self.board.enqueue(tile);
			let executor = self.executor.clone();
			let slots = slots.clone();
			let board = self.board.clone();
			let policy = self.policy;
			handles.push((
				tile,
				tokio::spawn(async move { drive(tile, executor.as_ref(), &slots, &board, policy).await }),
			));
		}

		let mut jobs = Vec::with_capacity(handles.len());
		for (tile, handle) in handles {
			if let Err(e) = handle.await {
				log::error!("{}: job task ended abnormally: {e}", tile.key());
				self.board.record_error(&tile.key(), JobState::Failed, e.to_string());
			}
			jobs.push(self.board.get(&tile.key()).unwrap_or_else(|| Job::new(tile)));
		}

		let report = DrainReport { jobs };
		log::info!("drained: {report}");
		report
	}
}

async fn drive<E: JobExecutor + ?Sized>(
	tile: Tile,
	executor: &E,
	slots: &Semaphore,
	board: &JobBoard,
	policy: RetryPolicy,
) {
	let key = tile.key();
	loop {
		let result = {
			let Ok(_permit) = slots.acquire().await else {
				board.record_error(&key, JobState::Failed, "scheduler closed".to_string());
				return;
			};
			let attempt = board.start_attempt(&key);
			log::debug!("{key}: attempt {attempt} started");
			executor.execute(&tile).await.map_err(|e| (attempt, e))
		};

		match result {
			Ok(()) => {
				board.set_state(&key, JobState::Done);
				return;
			}
			Err((attempt, e)) if attempt <= policy.max_retries => {
				log::warn!(
					"{key}: attempt {attempt} failed with {}: {e}, retrying in {:?}",
					e.kind(),
					policy.retry_delay
				);
				board.record_error(&key, JobState::Retrying, e.to_string());
				tokio::time::sleep(policy.retry_delay).await;
			}
			Err((attempt, e)) => {
				log::error!("{key}: giving up after {attempt} attempts, last error {}: {e}", e.kind());
				board.record_error(&key, JobState::Failed, e.to_string());
				return;
			}
		}
	}
}

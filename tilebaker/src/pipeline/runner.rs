//! One attempt at baking one tile.
//!
//! The runner spawns the extractor and the packager, waits for the idle gate,
//! bridges the two processes, waits for both to exit and finally publishes the
//! archive by renaming `part-{key}.{ext}` to `{key}.{ext}`. The rename is the
//! only place a final archive is ever created.

use super::{InProgress, IdleGate, StreamingBridge, ToolCommand};
use crate::scheduler::JobExecutor;
use async_trait::async_trait;
use std::{
	io,
	path::{Path, PathBuf},
	process::ExitStatus,
	sync::Arc,
	time::Instant,
};
use tilebaker_core::{Config, RecordTransformer, Tile, TileError, TileResult};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tokio::process::Child;

pub struct TileJobRunner {
	config: Arc<Config>,
	bridge: StreamingBridge,
	gate: IdleGate,
	in_progress: InProgress,
}

impl TileJobRunner {
	pub fn new(config: Arc<Config>) -> Self {
		let transformer = Arc::new(RecordTransformer::from_source(&config.source));
		Self {
			config,
			bridge: StreamingBridge::new(transformer),
			gate: IdleGate::default(),
			in_progress: InProgress::default(),
		}
	}

	#[must_use]
	pub fn with_gate(mut self, gate: IdleGate) -> Self {
		self.gate = gate;
		self
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn gate(&self) -> &IdleGate {
		&self.gate
	}

	pub fn in_progress(&self) -> &InProgress {
		&self.in_progress
	}

	/// Run one attempt for `tile` and publish its archive. Returns the number of
	/// records that went through the bridge.
	pub async fn run(&self, tile: &Tile) -> TileResult<u64> {
		let key = tile.key();
		let _guard = self.in_progress.enter(&key);
		let started = OffsetDateTime::now_utc();
		let clock = Instant::now();

		let config = &self.config;
		let (part, archive) = job_paths(config, tile);

		tokio::fs::create_dir_all(&config.output_dir).await?;
		remove_stale(&part).await?;

		let records = self.stream(tile, &part).await?;
		log::info!("{key}: {records} records bridged in {:.1?}", clock.elapsed());

		publish(&part, &archive).await?;
		log::info!(
			"{key}: {} --> {}",
			timestamp(started),
			timestamp(OffsetDateTime::now_utc())
		);
		Ok(records)
	}

	async fn stream(&self, tile: &Tile, part: &Path) -> TileResult<u64> {
		let key = tile.key();
		let extractor = ToolCommand::extractor(&self.config, tile);
		let packager = ToolCommand::packager(&self.config, tile, part);

		let producer = extractor.spawn_producer()?;
		let consumer = packager.spawn_consumer()?;

		self.gate.wait_open(&key, self.config.idle_poll()).await;

		// dropping `pump` on timeout drops both children, which kills them
		let pump = self.pump(&key, (&extractor, producer), (&packager, consumer));
		match self.config.job_timeout() {
			Some(limit) => tokio::time::timeout(limit, pump)
				.await
				.map_err(|_| TileError::Timeout(limit))?,
			None => pump.await,
		}
	}

	/// Bridge the two processes and wait for both to exit.
	async fn pump(
		&self,
		key: &str,
		(extractor, mut producer): (&ToolCommand, Child),
		(packager, mut consumer): (&ToolCommand, Child),
	) -> TileResult<u64> {
		let stdout = producer.stdout.take().ok_or_else(|| missing_pipe(extractor, "stdout"))?;
		let mut stdin = consumer.stdin.take().ok_or_else(|| missing_pipe(packager, "stdin"))?;

		let bridged = self.bridge.run(stdout, &mut stdin).await;
		if let Err(e) = &bridged {
			log::debug!("{key}: bridge failed, stopping {}: {e}", extractor.name());
			producer.start_kill().ok();
			if !is_broken_pipe(e) {
				// kill before closing stdin, so the packager never reads a clean end of input
				consumer.start_kill().ok();
			}
		}
		drop(stdin);

		let (producer_status, consumer_status) = tokio::join!(producer.wait(), consumer.wait());

		let records = match bridged {
			Ok(records) => records,
			// the packager went away; its exit status says why
			Err(e) if is_broken_pipe(&e) => {
				check_status(packager, consumer_status?)?;
				return Err(e);
			}
			Err(e) => return Err(e),
		};

		check_status(extractor, producer_status?)?;
		check_status(packager, consumer_status?)?;
		Ok(records)
	}
}

#[async_trait]
impl JobExecutor for TileJobRunner {
	async fn execute(&self, tile: &Tile) -> TileResult<()> {
		self.run(tile).await.map(|_| ())
	}
}

fn check_status(command: &ToolCommand, status: ExitStatus) -> TileResult<()> {
	if status.success() {
		Ok(())
	} else {
		Err(TileError::ProcessFailure {
			program: command.name(),
			status: status.to_string(),
		})
	}
}

fn is_broken_pipe(error: &TileError) -> bool {
	matches!(error, TileError::Io(e) if e.kind() == io::ErrorKind::BrokenPipe)
}

fn missing_pipe(command: &ToolCommand, pipe: &str) -> TileError {
	TileError::Io(io::Error::other(format!("{} has no {pipe} pipe", command.name())))
}

async fn remove_stale(part: &Path) -> TileResult<()> {
	match tokio::fs::remove_file(part).await {
		Ok(()) => {
			log::debug!("removed stale {part:?}");
			Ok(())
		}
		Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
		Err(e) => Err(e.into()),
	}
}

async fn publish(part: &Path, archive: &Path) -> TileResult<()> {
	tokio::fs::rename(part, archive)
		.await
		.map_err(|source| TileError::PublishFailure {
			from: part.to_path_buf(),
			to: archive.to_path_buf(),
			source,
		})
}

fn timestamp(time: OffsetDateTime) -> String {
	time.format(&Rfc3339).unwrap_or_else(|_| time.to_string())
}

/// The part file a job writes to and the archive it publishes.
pub fn job_paths(config: &Config, tile: &Tile) -> (PathBuf, PathBuf) {
	let extension = &config.packager.extension;
	(
		tile.part_path(&config.output_dir, extension),
		tile.archive_path(&config.output_dir, extension),
	)
}

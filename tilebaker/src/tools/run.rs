use anyhow::{Result, bail, ensure};
use clap::Args;
use std::{path::PathBuf, sync::Arc};
use tilebaker::{
	pipeline::TileJobRunner,
	scheduler::{RetryPolicy, Scheduler},
};
use tilebaker_core::{Config, Tile};

#[derive(Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// pipeline configuration (YAML)
	#[arg(required = true)]
	config: PathBuf,

	/// number of tiles baked at the same time
	#[arg(long, short = 'j', value_name = "int")]
	concurrency: Option<usize>,

	/// how often a failed tile is retried
	#[arg(long, value_name = "int")]
	max_retries: Option<u32>,

	/// directory for the finished archives
	#[arg(long, short, value_name = "dir")]
	output_dir: Option<PathBuf>,

	/// only bake these tiles (z/x/y), can be repeated
	#[arg(long = "tile", short, value_name = "Z/X/Y")]
	tiles: Vec<Tile>,
}

impl Subcommand {
	fn apply(&self, config: &mut Config) -> Result<()> {
		if let Some(concurrency) = self.concurrency {
			config.concurrency = concurrency;
		}
		if let Some(max_retries) = self.max_retries {
			config.max_retries = max_retries;
		}
		if let Some(output_dir) = &self.output_dir {
			config.output_dir.clone_from(output_dir);
		}
		config.validate()
	}
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let mut config = Config::from_path(&arguments.config)?;
	arguments.apply(&mut config)?;

	let tiles = super::select_tiles(&config, &arguments.tiles);
	ensure!(!tiles.is_empty(), "no tiles to bake in {:?}", arguments.config);

	let policy = RetryPolicy::from_config(&config);
	let runner = Arc::new(TileJobRunner::new(Arc::new(config)));
	let scheduler = Scheduler::new(runner, policy);

	let report = tokio::select! {
		report = scheduler.run(tiles) => report,
		_ = tokio::signal::ctrl_c() => {
			log::warn!("interrupted, stopping running jobs");
			bail!("interrupted before all tiles were baked");
		}
	};
	log::info!("shutdown");

	if !report.is_success() {
		let failed: Vec<String> = report.failed().map(|job| job.key.clone()).collect();
		bail!("{} of {} tiles failed: {}", failed.len(), report.jobs.len(), failed.join(", "));
	}
	Ok(())
}

#[cfg(all(test, unix))]
mod tests {
	use crate::tests::run_command;
	use std::{fs, os::unix::fs::PermissionsExt, path::Path};
	use tempfile::TempDir;

	fn script(dir: &Path, name: &str, body: &str) {
		let path = dir.join(name);
		fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
		fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
	}

	fn setup(extractor: &str) -> TempDir {
		let dir = TempDir::new().unwrap();
		script(dir.path(), "extractor", extractor);
		script(dir.path(), "packager", "for arg; do case \"$arg\" in --output=*) out=\"${arg#--output=}\";; esac; done\ncat > \"$out\"");
		fs::write(
			dir.path().join("pipeline.yml"),
			"source:\n  url: source.geojsons\n  layer: contour\n  minzoom: 2\n  maxzoom: 14\n  tiles: [[5, 10, 12], [6, 20, 24]]\nextractor:\n  path: ./extractor\npackager:\n  path: ./packager\noutput_dir: out\nretry_delay_ms: 0\nmax_retries: 1\n",
		)
		.unwrap();
		dir
	}

	#[test]
	fn bakes_all_tiles() {
		let dir = setup("printf '\\036{\"properties\":{\"contour\":40}}\\n'");
		let config = dir.path().join("pipeline.yml");
		run_command(vec!["tilebaker", "run", "-q", config.to_str().unwrap()]).unwrap();

		assert!(dir.path().join("out/5-10-12.mbtiles").exists());
		assert!(dir.path().join("out/6-20-24.mbtiles").exists());
	}

	#[test]
	fn fails_when_a_tile_fails() {
		let dir = setup("exit 1");
		let config = dir.path().join("pipeline.yml");
		let err = run_command(vec!["tilebaker", "run", "-q", "--tile", "5/10/12", config.to_str().unwrap()])
			.unwrap_err()
			.to_string();

		assert_eq!(err, "1 of 1 tiles failed: 5-10-12");
		assert!(!dir.path().join("out/5-10-12.mbtiles").exists());
	}

	#[test]
	fn command_line_overrides() {
		let dir = setup("printf '\\036{\"properties\":{\"contour\":100}}\\n'");
		let config = dir.path().join("pipeline.yml");
		let elsewhere = dir.path().join("elsewhere");
		run_command(vec![
			"tilebaker",
			"run",
			"-q",
			"-j",
			"1",
			"--output-dir",
			elsewhere.to_str().unwrap(),
			"--tile",
			"6/20/24",
			config.to_str().unwrap(),
		])
		.unwrap();

		assert!(elsewhere.join("6-20-24.mbtiles").exists());
		assert!(!elsewhere.join("5-10-12.mbtiles").exists());
	}
}

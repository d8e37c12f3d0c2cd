//! Command lines for the two external tools of a tile job.

use std::{
	fmt::{self, Display},
	path::{Path, PathBuf},
	process::Stdio,
};
use tilebaker_core::{Config, Tile, TileError, TileResult};
use tokio::process::{Child, Command};

/// Program plus arguments, built from the configuration for one tile.
#[derive(Clone, Debug, PartialEq)]
pub struct ToolCommand {
	program: PathBuf,
	args: Vec<String>,
}

impl ToolCommand {
	/// `ogr2ogr -f GeoJSONSeq -lco RS=YES [extra] /vsistdout/ [-clipdst w s e n] <source>`
	pub fn extractor(config: &Config, tile: &Tile) -> Self {
		let extractor = &config.extractor;
		let mut args: Vec<String> = ["-f", "GeoJSONSeq", "-lco", "RS=YES"].map(String::from).to_vec();
		args.extend(extractor.extra_args.iter().cloned());
		args.push("/vsistdout/".to_string());
		if extractor.clip {
			args.push("-clipdst".to_string());
			args.extend(tile.geo_bbox().to_string_vec());
		}
		args.push(config.source.url.clone());

		Self {
			program: extractor.path.clone(),
			args,
		}
	}

	/// `tippecanoe --output=<part> --force --minimum-zoom=.. --maximum-zoom=.. [..] [extra]`
	pub fn packager(config: &Config, tile: &Tile, output: &Path) -> Self {
		let packager = &config.packager;
		let mut args = vec![
			format!("--output={}", output.display()),
			"--force".to_string(),
			format!("--minimum-zoom={}", config.minzoom),
			format!("--maximum-zoom={}", config.maxzoom),
		];
		if let Some(simplification) = packager.simplification {
			args.push(format!("--simplification={simplification}"));
		}
		if packager.clip {
			args.push(format!("--clip-bounding-box={}", tile.geo_bbox()));
		}
		args.extend(packager.extra_args.iter().cloned());

		Self {
			program: packager.path.clone(),
			args,
		}
	}

	pub fn program(&self) -> &Path {
		&self.program
	}

	pub fn args(&self) -> &[String] {
		&self.args
	}

	/// File name of the program, for log lines and error messages.
	pub fn name(&self) -> String {
		self.program.file_name().map_or_else(
			|| self.program.display().to_string(),
			|name| name.to_string_lossy().into_owned(),
		)
	}

	fn command(&self) -> Command {
		let mut command = Command::new(&self.program);
		command.args(&self.args).kill_on_drop(true);
		command
	}

	/// Start the extractor: stdout is piped back to us, stderr is inherited.
	pub fn spawn_producer(&self) -> TileResult<Child> {
		self.spawn(self.command().stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::inherit()))
	}

	/// Start the packager: stdin is fed by us, stdout and stderr are inherited.
	pub fn spawn_consumer(&self) -> TileResult<Child> {
		self.spawn(self.command().stdin(Stdio::piped()).stdout(Stdio::inherit()).stderr(Stdio::inherit()))
	}

	fn spawn(&self, command: &mut Command) -> TileResult<Child> {
		log::debug!("spawning {self}");
		command.spawn().map_err(|source| TileError::Spawn {
			program: self.name(),
			source,
		})
	}
}

/// Renders a shell-like command line; arguments with whitespace or quotes are
/// single-quoted.
impl Display for ToolCommand {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", quote(&self.program.display().to_string()))?;
		for arg in &self.args {
			write!(f, " {}", quote(arg))?;
		}
		Ok(())
	}
}

fn quote(arg: &str) -> String {
	if arg.is_empty() || arg.contains(|c: char| c.is_whitespace() || c == '\'' || c == '"') {
		format!("'{}'", arg.replace('\'', r"'\''"))
	} else {
		arg.to_string()
	}
}

use super::{ExtractorConfig, PackagerConfig, SourceConfig};
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::{
	collections::HashSet,
	fs::File,
	io::{BufReader, Read},
	path::{Path, PathBuf},
	time::Duration,
};

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
	/// Source dataset, feature defaults and the list of tiles to bake
	pub source: SourceConfig,

	/// External feature extractor (GDAL `ogr2ogr`)
	#[serde(default)]
	pub extractor: ExtractorConfig,

	/// External tile packager (`tippecanoe`)
	#[serde(default)]
	pub packager: PackagerConfig,

	/// Directory receiving `part-{z}-{x}-{y}.{ext}` while a job runs and
	/// `{z}-{x}-{y}.{ext}` once published
	#[serde(default = "default_output_dir")]
	pub output_dir: PathBuf,

	/// Zoom range passed to the packager
	#[serde(default)]
	pub minzoom: u8,
	#[serde(default = "default_maxzoom")]
	pub maxzoom: u8,

	/// Maximum number of tiles processed at the same time
	#[serde(default = "num_cpus::get")]
	pub concurrency: usize,

	/// How often a failed tile is retried before it is given up
	#[serde(default = "default_max_retries")]
	pub max_retries: u32,

	#[serde(default = "default_retry_delay_ms")]
	pub retry_delay_ms: u64,

	/// Re-check interval while a job waits for the idle gate
	#[serde(default = "default_idle_poll_ms")]
	pub idle_poll_ms: u64,

	/// Wall-clock limit for one attempt; unlimited when absent
	#[serde(default)]
	pub job_timeout_secs: Option<u64>,
}

fn default_output_dir() -> PathBuf {
	PathBuf::from(".")
}

fn default_maxzoom() -> u8 {
	14
}

fn default_max_retries() -> u32 {
	3
}

fn default_retry_delay_ms() -> u64 {
	5000
}

fn default_idle_poll_ms() -> u64 {
	5000
}

impl Config {
	/// A configuration with all defaults around the given source.
	pub fn new(source: SourceConfig) -> Self {
		Self {
			source,
			extractor: ExtractorConfig::default(),
			packager: PackagerConfig::default(),
			output_dir: default_output_dir(),
			minzoom: 0,
			maxzoom: default_maxzoom(),
			concurrency: num_cpus::get(),
			max_retries: default_max_retries(),
			retry_delay_ms: default_retry_delay_ms(),
			idle_poll_ms: default_idle_poll_ms(),
			job_timeout_secs: None,
		}
	}

	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		Ok(serde_yaml_ng::from_reader(reader)?)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		Ok(serde_yaml_ng::from_str(text)?)
	}

	/// Parse from a file path, resolve relative paths against the file's directory
	/// and validate the result.
	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("Failed to open config file {path:?}"))?;
		let mut cfg =
			Config::from_reader(BufReader::new(file)).with_context(|| format!("Failed to parse config file {path:?}"))?;

		if let Some(base) = path.parent() {
			cfg.resolve_paths(base);
		}
		cfg.validate().with_context(|| format!("Invalid config file {path:?}"))?;
		log::debug!("loaded config {path:?} with {} tiles", cfg.source.tiles.len());
		Ok(cfg)
	}

	pub fn resolve_paths(&mut self, base: &Path) {
		if self.output_dir.is_relative() {
			self.output_dir = base.join(&self.output_dir);
		}
		self.extractor.path = resolve_tool(base, &self.extractor.path);
		self.packager.path = resolve_tool(base, &self.packager.path);
	}

	pub fn validate(&self) -> Result<()> {
		ensure!(
			self.minzoom <= self.maxzoom,
			"minzoom ({}) must be <= maxzoom ({})",
			self.minzoom,
			self.maxzoom
		);
		ensure!(
			self.source.minzoom <= self.source.maxzoom,
			"source.minzoom ({}) must be <= source.maxzoom ({})",
			self.source.minzoom,
			self.source.maxzoom
		);
		ensure!(self.concurrency >= 1, "concurrency must be at least 1");

		let extension = &self.packager.extension;
		ensure!(
			!extension.is_empty() && !extension.contains(['/', '\\']),
			"packager.extension ({extension:?}) must be a plain file extension"
		);

		let mut seen = HashSet::new();
		for tile in &self.source.tiles {
			ensure!(seen.insert(tile), "tile {tile} is listed more than once");
		}
		Ok(())
	}

	pub fn retry_delay(&self) -> Duration {
		Duration::from_millis(self.retry_delay_ms)
	}

	pub fn idle_poll(&self) -> Duration {
		Duration::from_millis(self.idle_poll_ms.max(1))
	}

	pub fn job_timeout(&self) -> Option<Duration> {
		self.job_timeout_secs.map(Duration::from_secs)
	}
}

/// Bare program names are left for `PATH` lookup; relative paths with a
/// directory component are taken relative to the config file.
fn resolve_tool(base: &Path, tool: &Path) -> PathBuf {
	if tool.is_relative() && tool.components().count() > 1 {
		base.join(tool)
	} else {
		tool.to_path_buf()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Tile;
	use pretty_assertions::assert_eq;

	const MINIMAL: &str = "
source:
  url: contours.gpkg
  layer: contour
  minzoom: 10
  maxzoom: 15
";

	#[test]
	fn parse_example_config() {
		let path = Path::new("../testdata/pipeline.yml");
		let cfg = Config::from_path(path).unwrap();
		let base = Path::new("../testdata");

		assert_eq!(
			cfg,
			Config {
				source: SourceConfig {
					url: "https://example.org/contours.gdb".to_string(),
					layer: "contour".to_string(),
					minzoom: 10,
					maxzoom: 15,
					tiles: vec![Tile::new(5, 10, 12).unwrap(), Tile::new(6, 20, 24).unwrap()],
					zoom_attribute: "contour".to_string(),
					strip_properties: vec!["SHAPE_Length".to_string()],
					tiling_key: "tippecanoe".to_string(),
				},
				extractor: ExtractorConfig {
					path: PathBuf::from("ogr2ogr"),
					clip: true,
					extra_args: vec![],
				},
				packager: PackagerConfig {
					path: base.join("bin/tippecanoe"),
					extension: "mbtiles".to_string(),
					simplification: Some(2),
					clip: true,
					extra_args: vec![
						"--no-feature-limit".to_string(),
						"--no-tile-size-limit".to_string(),
						"--quiet".to_string()
					],
				},
				output_dir: base.join("mbtiles"),
				minzoom: 10,
				maxzoom: 15,
				concurrency: 2,
				max_retries: 3,
				retry_delay_ms: 5000,
				idle_poll_ms: 5000,
				job_timeout_secs: Some(3600),
			}
		);
	}

	#[test]
	fn parse_minimal_config() {
		let cfg = Config::from_string(MINIMAL).unwrap();
		let expected = Config::new(SourceConfig::new("contours.gpkg", "contour", 10, 15));
		assert_eq!(cfg, expected);
		assert_eq!(cfg.retry_delay(), Duration::from_secs(5));
		assert_eq!(cfg.job_timeout(), None);
		assert!(cfg.validate().is_ok());
	}

	#[test]
	fn reject_unknown_fields() {
		let err = Config::from_string(&format!("{MINIMAL}retries: 3\n")).unwrap_err();
		assert!(err.to_string().contains("unknown field `retries`"), "{err}");
	}

	#[test]
	fn reject_invalid_tile() {
		let err = Config::from_string(&format!("{MINIMAL}  tiles: [[1, 2, 0]]\n")).unwrap_err();
		assert!(err.to_string().contains("invalid tile 1/2/0"), "{err}");
	}

	#[test]
	fn validate_rejects_bad_values() {
		let check = |edit: fn(&mut Config), message: &str| {
			let mut cfg = Config::from_string(MINIMAL).unwrap();
			edit(&mut cfg);
			let err = cfg.validate().unwrap_err().to_string();
			assert!(err.contains(message), "{err:?} does not contain {message:?}");
		};

		check(|c| c.minzoom = 16, "minzoom (16) must be <= maxzoom (14)");
		check(|c| c.source.minzoom = 16, "source.minzoom (16) must be <= source.maxzoom (15)");
		check(|c| c.concurrency = 0, "concurrency must be at least 1");
		check(|c| c.packager.extension = "a/b".into(), "must be a plain file extension");
		check(|c| c.packager.extension = String::new(), "must be a plain file extension");
		check(
			|c| c.source.tiles = vec![Tile::new(1, 1, 1).unwrap(), Tile::new(1, 1, 1).unwrap()],
			"tile 1/1/1 is listed more than once",
		);
	}

	#[test]
	fn resolve_paths_keeps_bare_programs_and_absolute_paths() {
		let mut cfg = Config::from_string(MINIMAL).unwrap();
		cfg.extractor.path = PathBuf::from("/usr/bin/ogr2ogr");
		cfg.output_dir = PathBuf::from("out");
		cfg.resolve_paths(Path::new("/etc/tiles"));

		assert_eq!(cfg.extractor.path, PathBuf::from("/usr/bin/ogr2ogr"));
		assert_eq!(cfg.packager.path, PathBuf::from("tippecanoe"));
		assert_eq!(cfg.output_dir, PathBuf::from("/etc/tiles/out"));
	}
}

use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExtractorConfig {
	/// Program name or path of `ogr2ogr`
	#[serde(default = "default_extractor_path")]
	pub path: PathBuf,

	/// Clip the source to the tile's bounding box (`-clipdst`)
	#[serde(default = "default_true")]
	pub clip: bool,

	/// Extra arguments inserted before the source reference
	#[serde(default)]
	pub extra_args: Vec<String>,
}

impl Default for ExtractorConfig {
	fn default() -> Self {
		Self {
			path: default_extractor_path(),
			clip: true,
			extra_args: Vec::new(),
		}
	}
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PackagerConfig {
	/// Program name or path of `tippecanoe`
	#[serde(default = "default_packager_path")]
	pub path: PathBuf,

	/// File extension of the produced archives
	#[serde(default = "default_extension")]
	pub extension: String,

	/// Optional `--simplification` level
	#[serde(default)]
	pub simplification: Option<u32>,

	/// Clip the output to the tile's bounding box (`--clip-bounding-box`)
	#[serde(default = "default_true")]
	pub clip: bool,

	/// Extra arguments appended to the command line
	#[serde(default = "default_packager_args")]
	pub extra_args: Vec<String>,
}

impl Default for PackagerConfig {
	fn default() -> Self {
		Self {
			path: default_packager_path(),
			extension: default_extension(),
			simplification: None,
			clip: true,
			extra_args: default_packager_args(),
		}
	}
}

fn default_true() -> bool {
	true
}

fn default_extractor_path() -> PathBuf {
	PathBuf::from("ogr2ogr")
}

fn default_packager_path() -> PathBuf {
	PathBuf::from("tippecanoe")
}

fn default_extension() -> String {
	"mbtiles".to_string()
}

fn default_packager_args() -> Vec<String> {
	["--no-feature-limit", "--no-tile-size-limit", "--quiet"]
		.iter()
		.map(|s| s.to_string())
		.collect()
}

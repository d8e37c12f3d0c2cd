use crate::{DEFAULT_STRIP_PROPERTIES, DEFAULT_TILING_KEY, DEFAULT_ZOOM_ATTRIBUTE, Tile};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
	/// Dataset handed to the extractor: a path, a URL or any GDAL source string.
	pub url: String,

	/// Layer name written into every feature's tiling metadata.
	pub layer: String,

	/// Base minzoom of every feature; the zoom attribute may raise it by up to 2.
	pub minzoom: u8,

	/// Maxzoom of every feature.
	pub maxzoom: u8,

	/// Tiles to bake, each as `[z, x, y]`.
	#[serde(default)]
	pub tiles: Vec<Tile>,

	/// Integer property that drives the minzoom rule.
	#[serde(default = "default_zoom_attribute")]
	pub zoom_attribute: String,

	/// Properties removed from every feature before packaging.
	#[serde(default = "default_strip_properties")]
	pub strip_properties: Vec<String>,

	/// Name of the per-feature tiling sub-document.
	#[serde(default = "default_tiling_key")]
	pub tiling_key: String,
}

fn default_zoom_attribute() -> String {
	DEFAULT_ZOOM_ATTRIBUTE.to_string()
}

fn default_strip_properties() -> Vec<String> {
	DEFAULT_STRIP_PROPERTIES.iter().map(|s| s.to_string()).collect()
}

fn default_tiling_key() -> String {
	DEFAULT_TILING_KEY.to_string()
}

impl SourceConfig {
	pub fn new(url: &str, layer: &str, minzoom: u8, maxzoom: u8) -> Self {
		Self {
			url: url.to_string(),
			layer: layer.to_string(),
			minzoom,
			maxzoom,
			tiles: Vec::new(),
			zoom_attribute: default_zoom_attribute(),
			strip_properties: default_strip_properties(),
			tiling_key: default_tiling_key(),
		}
	}
}

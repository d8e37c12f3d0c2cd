//! Per-feature tiling metadata.
//!
//! Each feature gets a tiling sub-document (`layer`, `minzoom`, `maxzoom`) that the
//! packager honours. The minzoom is derived from an integer attribute, so round
//! contour values show up at lower zoom levels than fine ones:
//!
//! | attribute value               | minzoom     |
//! |-------------------------------|-------------|
//! | multiple of 100               | base        |
//! | multiple of 40, not of 100    | base + 1    |
//! | anything else                 | base + 2    |

use crate::{SourceConfig, TileError, TileResult};
use serde_json::{Map, Value, json};

pub const DEFAULT_ZOOM_ATTRIBUTE: &str = "contour";
pub const DEFAULT_TILING_KEY: &str = "tiling";
pub const DEFAULT_STRIP_PROPERTIES: [&str; 1] = ["SHAPE_Length"];

#[derive(Clone, Debug, PartialEq)]
pub struct RecordTransformer {
	layer: String,
	minzoom: u8,
	maxzoom: u8,
	zoom_attribute: String,
	strip_properties: Vec<String>,
	tiling_key: String,
}

impl RecordTransformer {
	pub fn new(layer: &str, minzoom: u8, maxzoom: u8) -> Self {
		Self {
			layer: layer.to_string(),
			minzoom,
			maxzoom,
			zoom_attribute: DEFAULT_ZOOM_ATTRIBUTE.to_string(),
			strip_properties: DEFAULT_STRIP_PROPERTIES.iter().map(|s| s.to_string()).collect(),
			tiling_key: DEFAULT_TILING_KEY.to_string(),
		}
	}

	pub fn from_source(source: &SourceConfig) -> Self {
		Self::new(&source.layer, source.minzoom, source.maxzoom)
			.with_zoom_attribute(&source.zoom_attribute)
			.with_strip_properties(source.strip_properties.clone())
			.with_tiling_key(&source.tiling_key)
	}

	#[must_use]
	pub fn with_zoom_attribute(mut self, name: &str) -> Self {
		self.zoom_attribute = name.to_string();
		self
	}

	#[must_use]
	pub fn with_strip_properties(mut self, names: Vec<String>) -> Self {
		self.strip_properties = names;
		self
	}

	#[must_use]
	pub fn with_tiling_key(mut self, key: &str) -> Self {
		self.tiling_key = key.to_string();
		self
	}

	/// The minzoom for a feature whose zoom attribute is `value`.
	pub fn minzoom_for(&self, value: i64) -> u8 {
		if value % 100 == 0 {
			self.minzoom
		} else if value % 40 == 0 {
			self.minzoom.saturating_add(1)
		} else {
			self.minzoom.saturating_add(2)
		}
	}

	/// Enrich one feature record.
	///
	/// The record is validated before anything is modified.
	///
	/// # Errors
	/// [`TileError::MalformedRecord`] if the record is not an object, has no
	/// `properties` object, or its zoom attribute is missing or not an integer.
	pub fn transform(&self, mut record: Value) -> TileResult<Value> {
		let object = record
			.as_object_mut()
			.ok_or_else(|| TileError::MalformedRecord("record is not a JSON object".to_string()))?;

		let properties = object
			.get_mut("properties")
			.and_then(Value::as_object_mut)
			.ok_or_else(|| TileError::MalformedRecord("record has no properties object".to_string()))?;

		let value = self.zoom_value(properties)?;

		for name in &self.strip_properties {
			properties.shift_remove(name);
		}

		object.insert(
			self.tiling_key.clone(),
			json!({
				"layer": self.layer,
				"minzoom": self.minzoom_for(value),
				"maxzoom": self.maxzoom,
			}),
		);

		Ok(record)
	}

	fn zoom_value(&self, properties: &Map<String, Value>) -> TileResult<i64> {
		let name = &self.zoom_attribute;
		let value = properties
			.get(name)
			.ok_or_else(|| TileError::MalformedRecord(format!("properties.{name} is missing")))?;

		if let Some(v) = value.as_i64() {
			return Ok(v);
		}
		match value.as_f64() {
			Some(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 9.0e15 => Ok(v as i64),
			_ => Err(TileError::MalformedRecord(format!(
				"properties.{name} must be an integer, found {value}"
			))),
		}
	}
}

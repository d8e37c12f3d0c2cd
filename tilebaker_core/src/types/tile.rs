//! Tile addresses in a Web Mercator tile pyramid
//!
//! A [`Tile`] identifies one unit of work. From it the pipeline derives the job key
//! (`"{z}-{x}-{y}"`), the clip bounding box and the output paths.
//!
//! # Examples
//!
//! ```
//! use tilebaker_core::Tile;
//!
//! let tile = Tile::new(5, 10, 12).unwrap();
//! assert_eq!(tile.key(), "5-10-12");
//!
//! let bbox = tile.geo_bbox();
//! assert_eq!(bbox.x_min, -67.5);
//! assert_eq!(bbox.x_max, -56.25);
//! ```

use crate::{GeoBBox, TileError, TileResult};
use serde::Deserialize;
use std::{
	f64::consts::PI,
	fmt::{self, Debug, Display},
	path::{Path, PathBuf},
	str::FromStr,
};

/// Deepest zoom level whose x/y indices still fit into a `u32`.
pub const MAX_LEVEL: u8 = 31;

/// A tile coordinate: zoom level plus x and y indices.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Deserialize)]
#[serde(try_from = "[u32; 3]")]
pub struct Tile {
	/// The zoom level of the tile.
	pub level: u8,
	/// The x index of the tile.
	pub x: u32,
	/// The y index of the tile.
	pub y: u32,
}

impl Tile {
	/// Create a new `Tile` at zoom `level` with indices `x`, `y`.
	///
	/// # Errors
	/// Returns [`TileError::InvalidTile`] if `level` > 31 or if `x`/`y` are not in `[0, 2^level)`.
	pub fn new(level: u32, x: u32, y: u32) -> TileResult<Tile> {
		let invalid = |reason: String| TileError::InvalidTile { level, x, y, reason };

		if level > u32::from(MAX_LEVEL) {
			return Err(invalid(format!("level must be <= {MAX_LEVEL}")));
		}
		let size = 1u64 << level;
		if u64::from(x) >= size {
			return Err(invalid(format!("x must be < {size}")));
		}
		if u64::from(y) >= size {
			return Err(invalid(format!("y must be < {size}")));
		}

		Ok(Tile {
			level: level as u8,
			x,
			y,
		})
	}

	/// The job key, `"{z}-{x}-{y}"`.
	pub fn key(&self) -> String {
		format!("{}-{}-{}", self.level, self.x, self.y)
	}

	/// Convert a tile corner to geographic `[longitude, latitude]` in degrees.
	///
	/// `x` and `y` may equal `2^level` to address the far edge of the last tile.
	pub fn coord_to_geo(level: u8, x: u64, y: u64) -> [f64; 2] {
		let zoom = 2.0f64.powi(i32::from(level));
		[
			(x as f64 / zoom - 0.5) * 360.0,
			((PI * (1.0 - 2.0 * y as f64 / zoom)).exp().atan() / PI - 0.25) * 360.0,
		]
	}

	/// The geographic extent of this tile.
	pub fn geo_bbox(&self) -> GeoBBox {
		let [west, north] = Tile::coord_to_geo(self.level, u64::from(self.x), u64::from(self.y));
		let [east, south] = Tile::coord_to_geo(self.level, u64::from(self.x) + 1, u64::from(self.y) + 1);
		GeoBBox {
			x_min: west,
			y_min: south,
			x_max: east,
			y_max: north,
		}
	}

	/// Final, published archive path: `{dir}/{z}-{x}-{y}.{ext}`.
	pub fn archive_path(&self, dir: &Path, extension: &str) -> PathBuf {
		dir.join(format!("{}.{extension}", self.key()))
	}

	/// In-flight archive path: `{dir}/part-{z}-{x}-{y}.{ext}`.
	pub fn part_path(&self, dir: &Path, extension: &str) -> PathBuf {
		dir.join(format!("part-{}.{extension}", self.key()))
	}
}

impl TryFrom<[u32; 3]> for Tile {
	type Error = TileError;

	fn try_from([level, x, y]: [u32; 3]) -> TileResult<Tile> {
		Tile::new(level, x, y)
	}
}

/// Parses `z/x/y` or `z-x-y`.
impl FromStr for Tile {
	type Err = TileError;

	fn from_str(s: &str) -> TileResult<Tile> {
		let malformed = || TileError::InvalidTile {
			level: 0,
			x: 0,
			y: 0,
			reason: format!("cannot parse {s:?}, expected z/x/y"),
		};

		let parts = s
			.trim()
			.split(['/', '-'])
			.map(|part| part.parse::<u32>().map_err(|_| malformed()))
			.collect::<TileResult<Vec<u32>>>()?;

		match parts.as_slice() {
			[level, x, y] => Tile::new(*level, *x, *y),
			_ => Err(malformed()),
		}
	}
}

impl Debug for Tile {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "Tile({}, {}, {})", self.level, self.x, self.y)
	}
}

impl Display for Tile {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}/{}/{}", self.level, self.x, self.y)
	}
}

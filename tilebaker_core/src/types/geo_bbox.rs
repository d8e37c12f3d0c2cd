use std::fmt::{self, Debug, Display};

/// A geographical bounding box in degrees.
///
/// - `x_min` (west): Minimum longitude.
/// - `y_min` (south): Minimum latitude.
/// - `x_max` (east): Maximum longitude.
/// - `y_max` (north): Maximum latitude.
///
/// `Display` renders `west,south,east,north`, the form external tools expect for
/// clip arguments.
///
/// ```
/// use tilebaker_core::GeoBBox;
///
/// let bbox = GeoBBox { x_min: -67.5, y_min: 31.5, x_max: -56.25, y_max: 41.0 };
/// assert_eq!(bbox.to_string(), "-67.5,31.5,-56.25,41");
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct GeoBBox {
	pub x_min: f64,
	pub y_min: f64,
	pub x_max: f64,
	pub y_max: f64,
}

impl GeoBBox {
	/// Returns `[west, south, east, north]`.
	pub fn as_array(&self) -> [f64; 4] {
		[self.x_min, self.y_min, self.x_max, self.y_max]
	}

	/// Each coordinate as a separate string, in `west, south, east, north` order.
	pub fn to_string_vec(&self) -> Vec<String> {
		self.as_array().iter().map(|v| v.to_string()).collect()
	}
}

impl Debug for GeoBBox {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "GeoBBox({}, {}, {}, {})", self.x_min, self.y_min, self.x_max, self.y_max)
	}
}

impl Display for GeoBBox {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{},{},{},{}", self.x_min, self.y_min, self.x_max, self.y_max)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn formatting() {
		let bbox = GeoBBox {
			x_min: -180.0,
			y_min: -85.5,
			x_max: 180.0,
			y_max: 85.5,
		};
		assert_eq!(bbox.to_string(), "-180,-85.5,180,85.5");
		assert_eq!(format!("{bbox:?}"), "GeoBBox(-180, -85.5, 180, 85.5)");
		assert_eq!(bbox.to_string_vec(), vec!["-180", "-85.5", "180", "85.5"]);
		assert_eq!(bbox.as_array(), [-180.0, -85.5, 180.0, 85.5]);
	}
}

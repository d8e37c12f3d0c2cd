mod geo_bbox;
mod tile;

pub use geo_bbox::GeoBBox;
pub use tile::{MAX_LEVEL, Tile};

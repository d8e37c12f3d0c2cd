pub mod bbox;
pub mod plan;
pub mod run;

use std::collections::HashSet;
use tilebaker_core::{Config, Tile};

/// Tiles selected on the command line, or all configured tiles. Tiles missing
/// from the config are baked as well.
fn select_tiles(config: &Config, requested: &[Tile]) -> Vec<Tile> {
	if requested.is_empty() {
		return config.source.tiles.clone();
	}
	let mut seen = HashSet::new();
	requested
		.iter()
		.filter(|tile| seen.insert(**tile))
		.inspect(|tile| {
			if !config.source.tiles.contains(*tile) {
				log::debug!("tile {tile} is not listed in the config");
			}
		})
		.copied()
		.collect()
}

use anyhow::{Result, ensure};
use clap::Args;
use std::{
	io::{Write, stdout},
	path::PathBuf,
};
use tilebaker::pipeline::{ToolCommand, job_paths};
use tilebaker_core::{Config, Tile};

#[derive(Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// pipeline configuration (YAML)
	#[arg(required = true)]
	config: PathBuf,

	/// only show these tiles (z/x/y), can be repeated
	#[arg(long = "tile", short, value_name = "Z/X/Y")]
	tiles: Vec<Tile>,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let config = Config::from_path(&arguments.config)?;
	let tiles = super::select_tiles(&config, &arguments.tiles);
	ensure!(!tiles.is_empty(), "no tiles to bake in {:?}", arguments.config);

	let mut out = stdout().lock();
	for tile in &tiles {
		write_plan(&mut out, &config, tile)?;
	}
	Ok(())
}

fn write_plan(out: &mut impl Write, config: &Config, tile: &Tile) -> Result<()> {
	let (part, archive) = job_paths(config, tile);
	writeln!(out, "{}", tile.key())?;
	writeln!(out, "  bbox:    {}", tile.geo_bbox())?;
	writeln!(out, "  part:    {}", part.display())?;
	writeln!(out, "  archive: {}", archive.display())?;
	writeln!(out, "  extract: {}", ToolCommand::extractor(config, tile))?;
	writeln!(out, "  package: {}", ToolCommand::packager(config, tile, &part))?;
	Ok(())
}

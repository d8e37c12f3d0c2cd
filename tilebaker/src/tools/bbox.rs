use anyhow::Result;
use clap::Args;
use tilebaker_core::Tile;

#[derive(Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// tile coordinate as z/x/y
	#[arg(value_name = "Z/X/Y")]
	tile: Tile,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	println!("{}", arguments.tile.geo_bbox());
	Ok(())
}

mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about,
	long_about = None,
	propagate_version = true,
	disable_help_subcommand = true,
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[command(flatten)]
	verbose: Verbosity<InfoLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Bake every configured tile
	Run(tools::run::Subcommand),

	/// Print what a run would do, without running anything
	Plan(tools::plan::Subcommand),

	/// Print the bounding box of a tile
	Bbox(tools::bbox::Subcommand),
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_target(false)
		.init();

	run(cli)
}

fn run(cli: Cli) -> Result<()> {
	match &cli.command {
		Commands::Run(arguments) => tools::run::run(arguments),
		Commands::Plan(arguments) => tools::plan::run(arguments),
		Commands::Bbox(arguments) => tools::bbox::run(arguments),
	}
}

#[cfg(test)]
mod tests {
	use crate::{Cli, run};
	use anyhow::Result;
	use clap::Parser;

	pub fn run_command(arg_vec: Vec<&str>) -> Result<String> {
		let cli = Cli::try_parse_from(arg_vec)?;
		let msg = format!("{cli:?}");
		run(cli)?;
		Ok(msg)
	}

	#[test]
	fn help() {
		let err = run_command(vec!["tilebaker"]).unwrap_err().to_string();
		assert!(err.starts_with("Bakes vector tile archives, one per map tile"));
		assert!(err.contains("\nUsage: tilebaker [OPTIONS] <COMMAND>"));
	}

	#[test]
	fn version() {
		let err = run_command(vec!["tilebaker", "-V"]).unwrap_err().to_string();
		assert!(err.starts_with("tilebaker "));
	}

	#[test]
	fn run_subcommand() {
		let output = run_command(vec!["tilebaker", "run"]).unwrap_err().to_string();
		assert!(output.starts_with("Bake every configured tile"));
	}

	#[test]
	fn plan_subcommand() {
		let output = run_command(vec!["tilebaker", "plan"]).unwrap_err().to_string();
		assert!(output.starts_with("Print what a run would do"));
	}

	#[test]
	fn bbox_subcommand() {
		let output = run_command(vec!["tilebaker", "bbox"]).unwrap_err().to_string();
		assert!(output.starts_with("Print the bounding box of a tile"));
	}
}

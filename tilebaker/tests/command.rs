use predicates::str;
use rstest::rstest;
use test_utilities::*;

#[test]
fn command() -> Result<(), Box<dyn std::error::Error>> {
	tilebaker_cmd()
		.assert()
		.failure()
		.code(2)
		.stdout(str::is_empty())
		.stderr(str::contains(format!("Usage: {BINARY_NAME} [OPTIONS] <COMMAND>")));
	Ok(())
}

#[rstest]
#[case("run", "[OPTIONS] <CONFIG>")]
#[case("plan", "[OPTIONS] <CONFIG>")]
#[case("bbox", "[OPTIONS] <Z/X/Y>")]
fn subcommand(#[case] sub_command: &str, #[case] usage: &str) -> Result<(), Box<dyn std::error::Error>> {
	tilebaker_cmd()
		.arg(sub_command)
		.assert()
		.failure()
		.code(2)
		.stdout(str::is_empty())
		.stderr(str::contains(format!("Usage: {BINARY_NAME} {sub_command} {usage}")));
	Ok(())
}

#[test]
fn bbox() {
	tilebaker_cmd()
		.args(["bbox", "5/10/12"])
		.assert()
		.success()
		.stdout("-67.5,31.952162238024965,-56.25,40.97989806962013\n");
}

#[test]
fn bbox_rejects_out_of_range_tile() {
	tilebaker_cmd()
		.args(["bbox", "3/8/0"])
		.assert()
		.failure()
		.code(2)
		.stderr(str::contains("invalid tile 3/8/0: x must be < 8"));
}

#[test]
fn plan_lists_every_configured_tile() {
	let config = get_testdata("pipeline.yml");
	tilebaker_cmd()
		.args(["plan", config.to_str().unwrap()])
		.assert()
		.success()
		.stdout(str::contains("5-10-12\n"))
		.stdout(str::contains("6-20-24\n"))
		.stdout(str::contains("part-6-20-24.mbtiles"))
		.stdout(str::contains(
			"extract: ogr2ogr -f GeoJSONSeq -lco RS=YES /vsistdout/ -clipdst -67.5 31.952162238024965 -56.25 40.97989806962013 https://example.org/contours.gdb",
		))
		.stdout(str::contains("--simplification=2"));
}

#[test]
fn run_rejects_missing_config() {
	tilebaker_cmd()
		.args(["run", "does-not-exist.yml"])
		.assert()
		.failure()
		.code(1)
		.stderr(str::contains("Failed to open config file"));
}

//! Fake extractor and packager scripts for job tests.

use serde_json::json;
use std::{
	fs,
	os::unix::fs::PermissionsExt,
	path::{Path, PathBuf},
};
use tilebaker_core::{Config, SourceConfig, encode_record};

/// Prints the file named by its last argument, like `ogr2ogr` writing the source to stdout.
pub const CAT_SOURCE: &str = r#"for last; do :; done
cat "$last""#;

/// Copies stdin to the `--output=` argument, like `tippecanoe` writing an archive.
pub const WRITE_OUTPUT: &str = r#"out=""
for arg; do
	case "$arg" in --output=*) out="${arg#--output=}";; esac
done
cat > "$out""#;

pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
	let path = dir.join(name);
	fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
	fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
	path
}

/// A record-separated source file with one feature per contour value.
pub fn write_source(dir: &Path, contours: &[i64]) -> PathBuf {
	let mut buf = Vec::new();
	for (i, contour) in contours.iter().enumerate() {
		let record = json!({
			"type": "Feature",
			"properties": { "contour": contour, "SHAPE_Length": 3.25, "id": i },
			"geometry": { "type": "LineString", "coordinates": [[-60.0, 35.0], [-59.5, 35.5]] }
		});
		encode_record(&record, &mut buf).unwrap();
	}
	let path = dir.join("source.geojsons");
	fs::write(&path, buf).unwrap();
	path
}

/// Config wired to the fake tools in `dir`, with base minzoom 2 and no retry delay.
pub fn config(dir: &Path, source: &Path) -> Config {
	let mut config = Config::new(SourceConfig::new(&source.to_string_lossy(), "contour", 2, 14));
	config.extractor.path = write_script(dir, "extractor", CAT_SOURCE);
	config.packager.path = write_script(dir, "packager", WRITE_OUTPUT);
	config.output_dir = dir.join("out");
	config.retry_delay_ms = 0;
	config.idle_poll_ms = 50;
	config
}

//! # tilebaker
//!
//! Bakes one vector tile archive per map tile. For every tile an extractor
//! (`ogr2ogr`) streams the features inside the tile's bounding box, each feature
//! gets its tiling metadata rewritten, and a packager (`tippecanoe`) turns the
//! stream into an archive that is published with an atomic rename.
//!
//! ```no_run
//! use std::{path::Path, sync::Arc};
//! use tilebaker::{pipeline::TileJobRunner, scheduler::{RetryPolicy, Scheduler}};
//! use tilebaker_core::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_path(Path::new("pipeline.yml"))?;
//!     let policy = RetryPolicy::from_config(&config);
//!     let tiles = config.source.tiles.clone();
//!
//!     let runner = Arc::new(TileJobRunner::new(Arc::new(config)));
//!     let report = Scheduler::new(runner, policy).run(tiles).await;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

pub mod pipeline;
pub mod scheduler;

pub use tilebaker_core as core;

#[cfg(all(test, unix))]
pub(crate) mod testing;

//! Pipeline configuration.
//!
//! A single YAML file describes the source dataset, the two external tools, the
//! output directory and the scheduling policy:
//! - [`Config`]: top-level loader, path resolution and validation
//! - [`SourceConfig`]: source reference, feature defaults and the tile list
//! - [`ExtractorConfig`] / [`PackagerConfig`]: external tool settings

mod main;
mod source;
mod tools;

pub use main::Config;
pub use source::SourceConfig;
pub use tools::{ExtractorConfig, PackagerConfig};

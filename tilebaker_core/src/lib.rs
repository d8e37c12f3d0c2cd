//! Building blocks of the tilebaker pipeline: tile addresses, the record
//! protocol spoken between extractor and packager, the feature transformer, the
//! error taxonomy and the configuration model.

pub mod config;
mod error;
pub mod record;
pub mod types;

pub use config::*;
pub use error::{TileError, TileResult};
pub use record::*;
pub use types::*;

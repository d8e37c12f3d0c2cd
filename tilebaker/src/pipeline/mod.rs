//! Everything that happens inside a single tile job.

mod bridge;
mod command;
mod gate;
mod progress;
mod runner;

pub use bridge::StreamingBridge;
pub use command::ToolCommand;
pub use gate::IdleGate;
pub use progress::{InProgress, InProgressGuard};
pub use runner::{TileJobRunner, job_paths};

//! Gate that holds jobs back before they start streaming.
//!
//! Jobs call [`IdleGate::wait_open`] after spawning their processes and before
//! forwarding the first record. Whoever owns the gate can close it to throttle
//! the pipeline and reopen it later; waiting jobs wake up on the change.

use std::{sync::Arc, time::Duration};
use tokio::sync::watch;

#[derive(Clone, Debug)]
pub struct IdleGate {
	state: Arc<watch::Sender<bool>>,
}

impl IdleGate {
	/// A gate that lets jobs through immediately.
	pub fn open() -> Self {
		Self::new(true)
	}

	/// A gate that holds jobs until [`set_idle(true)`](Self::set_idle) is called.
	pub fn closed() -> Self {
		Self::new(false)
	}

	fn new(idle: bool) -> Self {
		let (state, _) = watch::channel(idle);
		Self { state: Arc::new(state) }
	}

	pub fn set_idle(&self, idle: bool) {
		let previous = self.state.send_replace(idle);
		if previous != idle {
			log::debug!("idle gate {}", if idle { "opened" } else { "closed" });
		}
	}

	pub fn is_idle(&self) -> bool {
		*self.state.borrow()
	}

	/// Resolve once the gate is open.
	///
	/// Wakes on every state change; `poll` bounds how long a single wait lasts and
	/// doubles as the interval of the "still waiting" log line.
	pub async fn wait_open(&self, key: &str, poll: Duration) {
		let mut state = self.state.subscribe();
		loop {
			if *state.borrow_and_update() {
				return;
			}
			log::info!("{key}: waiting for the pipeline to become idle");
			// the sender lives in `self`, so `changed` can only time out or succeed
			let _ = tokio::time::timeout(poll, state.changed()).await;
		}
	}
}

impl Default for IdleGate {
	fn default() -> Self {
		Self::open()
	}
}

use parking_lot::Mutex;
use std::sync::Arc;

/// Keys of the jobs that are currently running, for progress logging only.
///
/// All mutations go through one mutex, so concurrent jobs never lose each
/// other's updates.
#[derive(Clone, Debug, Default)]
pub struct InProgress {
	keys: Arc<Mutex<Vec<String>>>,
}

impl InProgress {
	/// Register `key` and log the current set. The key is removed again when the
	/// returned guard is dropped.
	pub fn enter(&self, key: &str) -> InProgressGuard {
		let line = {
			let mut keys = self.keys.lock();
			if !keys.iter().any(|k| k == key) {
				keys.push(key.to_string());
			}
			keys.join(",")
		};
		log::info!("[{line}] in progress");

		InProgressGuard {
			keys: self.keys.clone(),
			key: key.to_string(),
		}
	}

	pub fn snapshot(&self) -> Vec<String> {
		self.keys.lock().clone()
	}

	pub fn len(&self) -> usize {
		self.keys.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.keys.lock().is_empty()
	}
}

#[must_use = "the key leaves the in-progress set when the guard is dropped"]
pub struct InProgressGuard {
	keys: Arc<Mutex<Vec<String>>>,
	key: String,
}

impl Drop for InProgressGuard {
	fn drop(&mut self) {
		self.keys.lock().retain(|k| *k != self.key);
	}
}

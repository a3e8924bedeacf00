//! Local per-minute request budget consulted before every outbound API call.
//!
//! The window is best-effort and process-local: it never coordinates across processes,
//! and a slight overshoot under concurrent callers is acceptable.

// self
use crate::{_prelude::*, error::RateLimitError};

/// Length of one budgeting window.
pub const WINDOW: Duration = Duration::from_secs(60);

#[derive(Clone, Copy, Debug)]
struct WindowState {
	started_at: Instant,
	count: u32,
}

/// Rolling one-minute request counter.
#[derive(Debug)]
pub struct RateWindow {
	limit: u32,
	state: Mutex<WindowState>,
}
impl RateWindow {
	/// Creates a window allowing `limit` calls per minute, starting now.
	pub fn new(limit: u32) -> Self {
		Self::starting_at(limit, Instant::now())
	}

	/// Creates a window whose first period starts at `instant`.
	pub fn starting_at(limit: u32, instant: Instant) -> Self {
		Self { limit, state: Mutex::new(WindowState { started_at: instant, count: 0 }) }
	}

	/// Configured per-minute ceiling.
	pub fn limit(&self) -> u32 {
		self.limit
	}

	/// Consumes one slot using the current clock.
	pub fn check(&self) -> Result<(), RateLimitError> {
		self.check_at(Instant::now())
	}

	/// Consumes one slot as of `now`.
	///
	/// A window older than [`WINDOW`] is reset first. When the ceiling is already reached the
	/// call fails without consuming anything.
	pub fn check_at(&self, now: Instant) -> Result<(), RateLimitError> {
		let mut state = self.state.lock();
		let age = now.saturating_duration_since(state.started_at);

		if age > WINDOW {
			*state = WindowState { started_at: now, count: 0 };
		}
		if state.count >= self.limit {
			let retry_in = WINDOW.saturating_sub(now.saturating_duration_since(state.started_at));

			return Err(RateLimitError { limit: self.limit, retry_in });
		}

		state.count += 1;

		Ok(())
	}

	/// Calls consumed in the current window as of `now` (zero once the window elapsed).
	pub fn used_at(&self, now: Instant) -> u32 {
		let state = self.state.lock();

		if now.saturating_duration_since(state.started_at) > WINDOW { 0 } else { state.count }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn ceiling_is_enforced_within_one_window() {
		let start = Instant::now();
		let window = RateWindow::starting_at(3, start);

		for offset in 0..3 {
			window
				.check_at(start + Duration::from_secs(offset))
				.expect("Calls under the ceiling should pass.");
		}

		let err = window
			.check_at(start + Duration::from_secs(10))
			.expect_err("The call past the ceiling should be rejected.");

		assert_eq!(err.limit, 3);
		assert_eq!(err.retry_in, Duration::from_secs(50));
		assert_eq!(window.used_at(start + Duration::from_secs(10)), 3);
	}

	#[test]
	fn counter_resets_after_window_elapses() {
		let start = Instant::now();
		let window = RateWindow::starting_at(1, start);

		window.check_at(start).expect("First call should pass.");

		assert!(window.check_at(start + Duration::from_secs(60)).is_err());

		let later = start + Duration::from_secs(61);

		assert_eq!(window.used_at(later), 0);

		window.check_at(later).expect("A fresh window should accept calls again.");

		assert_eq!(window.used_at(later), 1);
	}
}

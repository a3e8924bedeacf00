//! Bounded retry policy with exponential backoff.

// self
use crate::{_prelude::*, error::ApiError};

/// Retry ceiling plus the backoff schedule applied between attempts.
///
/// Attempt `n` (zero-based) waits `base_delay * 2^n` before the next try, so the default
/// schedule is 1 s, 2 s, 4 s.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
	/// Maximum number of retries after the first attempt.
	pub max_retries: u32,
	/// Delay before the first retry.
	pub base_delay: Duration,
}
impl RetryPolicy {
	/// Default retry ceiling.
	pub const DEFAULT_MAX_RETRIES: u32 = 3;
	/// Default first backoff interval.
	pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

	/// Creates a policy with the provided ceiling and first delay.
	pub const fn new(max_retries: u32, base_delay: Duration) -> Self {
		Self { max_retries, base_delay }
	}

	/// Policy that never retries.
	pub const fn disabled() -> Self {
		Self::new(0, Duration::ZERO)
	}

	/// Backoff to wait after the zero-based `attempt` fails.
	pub fn delay_for(&self, attempt: u32) -> Duration {
		let factor = 1_u32.checked_shl(attempt).unwrap_or(u32::MAX);

		self.base_delay.saturating_mul(factor)
	}

	/// Full schedule of waits this policy can produce.
	pub fn schedule(&self) -> Vec<Duration> {
		(0..self.max_retries).map(|attempt| self.delay_for(attempt)).collect()
	}

	/// Returns `true` when `error` after the zero-based `attempt` should be retried.
	///
	/// Authentication failures and any 5xx response are transient; everything else
	/// propagates immediately.
	pub fn should_retry(&self, error: &ApiError, attempt: u32) -> bool {
		attempt < self.max_retries && is_transient(error)
	}
}
impl Default for RetryPolicy {
	fn default() -> Self {
		Self::new(Self::DEFAULT_MAX_RETRIES, Self::DEFAULT_BASE_DELAY)
	}
}

fn is_transient(error: &ApiError) -> bool {
	use crate::error::ApiErrorKind;

	matches!(error.kind, ApiErrorKind::AuthenticationFailure | ApiErrorKind::InternalServerError)
		|| error.status.is_some_and(|status| (500..600).contains(&status))
}

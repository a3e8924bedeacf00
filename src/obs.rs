//! Optional observability helpers for gateway calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `paypal_gateway.call` with the `call`
//!   (operation kind), `stage` (call site) and, for API calls, `correlation_id` fields, plus
//!   events for retries and token refreshes.
//! - Enable `metrics` to increment the `paypal_gateway_call_total` counter for every
//!   attempt/success/failure/retry/throttle, labeled by `call` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operation kinds observed by the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// Client-credentials exchange against the token endpoint.
	TokenExchange,
	/// Authenticated REST call.
	Dispatch,
	/// Remote webhook signature verification.
	WebhookVerification,
}
impl CallKind {
	/// Label used for the `call` span field and metric label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::TokenExchange => "token_exchange",
			Self::Dispatch => "dispatch",
			Self::WebhookVerification => "webhook_verification",
		}
	}
}

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a gateway operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
	/// Transient failure that is about to be retried.
	Retry,
	/// Rejected locally by the per-minute budget.
	Throttled,
}
impl CallOutcome {
	/// Terminal outcome for a finished call.
	///
	/// Local budget rejections are reported as [`Throttled`](Self::Throttled) so they can be
	/// told apart from remote failures.
	pub fn of<T>(result: &Result<T>) -> Self {
		match result {
			Ok(_) => Self::Success,
			Err(Error::RateLimited(_)) => Self::Throttled,
			Err(_) => Self::Failure,
		}
	}

	/// Label used for the `outcome` metric label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Attempt => "attempt",
			Self::Success => "success",
			Self::Failure => "failure",
			Self::Retry => "retry",
			Self::Throttled => "throttled",
		}
	}
}

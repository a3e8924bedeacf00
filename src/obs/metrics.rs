// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::obs::{CallKind, CallOutcome};

/// Records a call outcome via the global metrics recorder (when enabled).
pub fn record_call_outcome(kind: CallKind, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"paypal_gateway_call_total",
			"call" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Per-gateway counters, always available regardless of the `metrics` feature.
#[derive(Debug, Default)]
pub struct GatewayMetrics {
	token_exchanges: AtomicU64,
	attempts: AtomicU64,
	retries: AtomicU64,
	throttled: AtomicU64,
}
impl GatewayMetrics {
	/// Number of client-credentials exchanges performed.
	pub fn token_exchanges(&self) -> u64 {
		self.token_exchanges.load(Ordering::Relaxed)
	}

	/// Number of API requests handed to the transport (retries included).
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Number of retries scheduled after transient failures.
	pub fn retries(&self) -> u64 {
		self.retries.load(Ordering::Relaxed)
	}

	/// Number of calls rejected by the local budget.
	pub fn throttled(&self) -> u64 {
		self.throttled.load(Ordering::Relaxed)
	}

	pub(crate) fn record_token_exchange(&self) {
		self.token_exchanges.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_retry(&self) {
		self.retries.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_throttled(&self) {
		self.throttled.fetch_add(1, Ordering::Relaxed);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_call_outcome_noop_without_metrics() {
		record_call_outcome(CallKind::TokenExchange, CallOutcome::Failure);
	}

	#[test]
	fn counters_accumulate() {
		let metrics = GatewayMetrics::default();

		metrics.record_attempt();
		metrics.record_attempt();
		metrics.record_retry();

		assert_eq!(metrics.attempts(), 2);
		assert_eq!(metrics.retries(), 1);
		assert_eq!(metrics.token_exchanges(), 0);
		assert_eq!(metrics.throttled(), 0);
	}
}

// self
use crate::{_prelude::*, error::ApiError, obs::CallKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder used by gateway operations.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the provided call kind + stage.
	pub fn new(kind: CallKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"paypal_gateway.call",
				call = kind.as_str(),
				stage,
				correlation_id = tracing::field::Empty
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Records the correlation id of the request the span covers.
	pub fn with_correlation_id(self, correlation_id: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			self.span.record("correlation_id", correlation_id);
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = correlation_id;
		}

		self
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a warning before a transient failure is retried.
pub fn trace_retry(error: &ApiError, attempt: u32, delay: Duration) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			correlation_id = %error.correlation_id,
			kind = error.kind.as_str(),
			status = error.status,
			attempt,
			delay_ms = delay.as_millis() as u64,
			"retrying transient API failure"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (error, attempt, delay);
	}
}

/// Emits a warning when a webhook delivery could not be verified because of an error.
pub fn trace_webhook_verification_error(error: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			correlation_id = error.correlation_id(),
			error = %error,
			"webhook signature verification failed"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = error;
	}
}

/// Emits a debug event when the token cache is refilled.
pub fn trace_token_refresh(expires_in: Duration) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(expires_in_secs = expires_in.as_secs(), "access token refreshed");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = expires_in;
	}
}

//! Token acquisition with caching and a single-flight refresh guard.
//!
//! [`Gateway::access_token`] reuses the cached token until it is within the configured margin
//! of expiry. Refreshes are serialized through the cache's async guard so concurrent callers
//! piggy-back on one in-flight exchange; a caller that loses the race re-reads the cache after
//! acquiring the guard instead of exchanging again.

// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	gateway::Gateway,
	http::GatewayHttpClient,
	obs::{self, CallKind, CallOutcome, CallSpan},
};

impl<C> Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Returns a valid bearer token, exchanging the client credentials when needed.
	pub async fn access_token(&self) -> Result<AccessToken> {
		const KIND: CallKind = CallKind::TokenExchange;

		let margin = self.config.token_margin;

		if let Some(token) = self.tokens.current_at(Instant::now(), margin) {
			return Ok(token);
		}

		let _singleflight = self.tokens.refresh_guard().lock().await;

		if let Some(token) = self.tokens.current_at(Instant::now(), margin) {
			return Ok(token);
		}

		let span = CallSpan::new(KIND, "access_token");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);
		self.metrics.record_token_exchange();

		let result = span
			.instrument(self.exchange.exchange(self.http_client.as_ref(), self.config.timeout))
			.await;

		let result = result.map_err(Error::from);

		obs::record_call_outcome(KIND, CallOutcome::of(&result));

		let token = result?;

		obs::trace_token_refresh(token.remaining_at(token.issued_at));
		self.tokens.store(token.clone());

		Ok(token)
	}

	/// Discards the cached token so the next call performs a fresh exchange.
	///
	/// Returns `true` when a token was cached.
	pub fn invalidate_token(&self) -> bool {
		self.tokens.invalidate()
	}
}

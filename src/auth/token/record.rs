//! Bearer token issued by the client-credentials exchange, with freshness helpers.

// self
use crate::{_prelude::*, auth::Secret};

/// Access token issued by the token endpoint.
///
/// Expiry is tracked on the monotonic clock, so wall-clock adjustments never extend or
/// shorten a token's lifetime.
#[derive(Clone)]
pub struct AccessToken {
	/// Bearer secret; callers must avoid logging it.
	pub secret: Secret,
	/// Token type reported by the provider (normally `Bearer`).
	pub token_type: String,
	/// Space-delimited scopes granted to the app, when reported.
	pub scope: Option<String>,
	/// Instant the exchange completed.
	pub issued_at: Instant,
	/// Instant after which the provider no longer accepts the token.
	pub expires_at: Instant,
}
impl AccessToken {
	/// Creates a bearer token that expires `expires_in` after `issued_at`.
	pub fn new(secret: impl Into<String>, issued_at: Instant, expires_in: Duration) -> Self {
		Self {
			secret: Secret::new(secret),
			token_type: "Bearer".into(),
			scope: None,
			issued_at,
			expires_at: issued_at + expires_in,
		}
	}

	/// Overrides the reported token type.
	pub fn with_token_type(mut self, token_type: impl Into<String>) -> Self {
		self.token_type = token_type.into();

		self
	}

	/// Records the scopes granted by the provider.
	pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(scope.into());

		self
	}

	/// Returns `true` while `now` is earlier than the expiry minus `margin`.
	pub fn is_valid_at(&self, now: Instant, margin: Duration) -> bool {
		now.checked_add(margin).is_some_and(|horizon| horizon < self.expires_at)
	}

	/// Time left before the provider expiry (zero once expired).
	pub fn remaining_at(&self, now: Instant) -> Duration {
		self.expires_at.saturating_duration_since(now)
	}

	/// `Authorization` header value for API calls.
	pub fn authorization_header(&self) -> String {
		format!("Bearer {}", self.secret.expose())
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("secret", &"<redacted>")
			.field("token_type", &self.token_type)
			.field("scope", &self.scope)
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

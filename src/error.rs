//! Gateway-level error types shared by the token cache, throttle, and dispatch pipeline.

// self
use crate::{_prelude::*, money::AmountError};

/// Gateway-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical gateway error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Client-credentials exchange failed.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Local request budget is exhausted; nothing was sent.
	#[error(transparent)]
	RateLimited(#[from] RateLimitError),
	/// Remote call failed after classification (and any retries).
	#[error(transparent)]
	Api(#[from] ApiError),
	/// Local configuration or request construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Amount rejected before it reached a payload.
	#[error(transparent)]
	Amount(#[from] AmountError),
	/// Inbound payload handed to the gateway is not valid JSON.
	#[error("Inbound payload is not valid JSON.")]
	InvalidPayload(#[source] serde_json::Error),
	/// Successful response body did not match the expected shape.
	#[error("Response body for request {correlation_id} could not be decoded.")]
	Decode {
		/// Correlation id of the request whose response failed to decode.
		correlation_id: String,
		/// Path-aware decoding failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl Error {
	/// Returns the classified API error kind, if this is a remote failure.
	pub fn api_kind(&self) -> Option<ApiErrorKind> {
		match self {
			Self::Api(e) => Some(e.kind),
			_ => None,
		}
	}

	/// Returns the correlation id of the failed request, when one was assigned.
	pub fn correlation_id(&self) -> Option<&str> {
		match self {
			Self::Api(e) => Some(&e.correlation_id),
			Self::Decode { correlation_id, .. } => Some(correlation_id),
			_ => None,
		}
	}
}

/// Client-credentials exchange failures.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Token endpoint rejected the credential pair.
	#[error("Token endpoint rejected the client credentials: {reason}.")]
	Rejected {
		/// Provider-supplied reason string.
		reason: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Transport failure (DNS, TCP, TLS) while calling the token endpoint.
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Token endpoint did not answer within the configured timeout.
	#[error("Token endpoint did not respond within {timeout:?}.")]
	TimedOut {
		/// Timeout that elapsed.
		timeout: Duration,
	},
	/// Token endpoint responded with JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	Parse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint returned a well-formed but unusable response.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	InvalidResponse {
		/// Description of the problem.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}
impl AuthError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// HTTP status reported by the token endpoint, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Rejected { status, .. }
			| Self::Parse { status, .. }
			| Self::InvalidResponse { status, .. } => *status,
			Self::Network { .. } | Self::TimedOut { .. } => None,
		}
	}
}

/// Raised before dispatch when the local per-minute budget is spent.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Local budget of {limit} requests per minute is exhausted; the window resets in {retry_in:?}.")]
pub struct RateLimitError {
	/// Configured per-minute ceiling.
	pub limit: u32,
	/// Time left until the current window elapses.
	pub retry_in: Duration,
}

/// Classified failure kinds for remote calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
	/// No HTTP response was received (connect failure, timeout, reset).
	NetworkError,
	/// HTTP 400.
	BadRequest,
	/// HTTP 401; the cached token is discarded.
	AuthenticationFailure,
	/// HTTP 403.
	AuthorizationFailure,
	/// HTTP 404.
	NotFound,
	/// HTTP 422.
	ValidationError,
	/// HTTP 429 reported by the remote service.
	RateLimitExceeded,
	/// HTTP 500.
	InternalServerError,
	/// Any other status.
	UnknownError,
}
impl ApiErrorKind {
	/// Maps an optional HTTP status into the taxonomy; `None` means no response arrived.
	pub const fn classify(status: Option<u16>) -> Self {
		match status {
			None => Self::NetworkError,
			Some(400) => Self::BadRequest,
			Some(401) => Self::AuthenticationFailure,
			Some(403) => Self::AuthorizationFailure,
			Some(404) => Self::NotFound,
			Some(422) => Self::ValidationError,
			Some(429) => Self::RateLimitExceeded,
			Some(500) => Self::InternalServerError,
			Some(_) => Self::UnknownError,
		}
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::NetworkError => "network_error",
			Self::BadRequest => "bad_request",
			Self::AuthenticationFailure => "authentication_failure",
			Self::AuthorizationFailure => "authorization_failure",
			Self::NotFound => "not_found",
			Self::ValidationError => "validation_error",
			Self::RateLimitExceeded => "rate_limit_exceeded",
			Self::InternalServerError => "internal_server_error",
			Self::UnknownError => "unknown_error",
		}
	}
}
impl Display for ApiErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Remote call failure with the full request context.
#[derive(Debug, ThisError)]
#[error("API request {correlation_id} failed with {kind}{}.", display_status(.status))]
pub struct ApiError {
	/// Classified failure kind.
	pub kind: ApiErrorKind,
	/// HTTP status code, when a response arrived.
	pub status: Option<u16>,
	/// Raw response payload (JSON when parseable, otherwise the body as a string).
	pub payload: Option<Value>,
	/// Correlation id sent as `PayPal-Request-Id`.
	pub correlation_id: String,
	/// Retry-After hint from upstream, if supplied.
	pub retry_after: Option<Duration>,
	/// Underlying transport failure, if any.
	#[source]
	pub source: Option<BoxError>,
}
impl ApiError {
	/// Builds an error for a response that arrived with a failing status.
	pub fn from_response(
		status: u16,
		payload: Option<Value>,
		correlation_id: impl Into<String>,
	) -> Self {
		Self {
			kind: ApiErrorKind::classify(Some(status)),
			status: Some(status),
			payload,
			correlation_id: correlation_id.into(),
			retry_after: None,
			source: None,
		}
	}

	/// Builds an error for a call that produced no response at all.
	pub fn network(correlation_id: impl Into<String>, source: Option<BoxError>) -> Self {
		Self {
			kind: ApiErrorKind::NetworkError,
			status: None,
			payload: None,
			correlation_id: correlation_id.into(),
			retry_after: None,
			source,
		}
	}

	/// Attaches an upstream Retry-After hint.
	pub fn with_retry_after(mut self, retry_after: Option<Duration>) -> Self {
		self.retry_after = retry_after;

		self
	}

	/// PayPal's error `name` field (e.g. `RESOURCE_NOT_FOUND`), if present.
	pub fn name(&self) -> Option<&str> {
		self.payload_str("name")
	}

	/// PayPal's human-readable `message` field, if present.
	pub fn message(&self) -> Option<&str> {
		self.payload_str("message")
	}

	/// PayPal's `debug_id`, useful when contacting support.
	pub fn debug_id(&self) -> Option<&str> {
		self.payload_str("debug_id")
	}

	fn payload_str(&self, field: &str) -> Option<&str> {
		self.payload.as_ref()?.get(field)?.as_str()
	}
}

fn display_status(status: &Option<u16>) -> String {
	match status {
		Some(code) => format!(" (HTTP {code})"),
		None => String::new(),
	}
}

/// Configuration and request-construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Base URL or request path cannot be turned into a valid URL.
	#[error("Endpoint URL is invalid.")]
	InvalidUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request body could not be encoded as JSON.
	#[error("Request body could not be encoded as JSON.")]
	EncodeBody(#[source] serde_json::Error),
	/// A credential component was empty.
	#[error("The {field} credential cannot be empty.")]
	EmptyCredential {
		/// Which credential component failed validation.
		field: &'static str,
	},
	/// Per-minute ceiling must allow at least one request.
	#[error("The per-minute request ceiling must be greater than zero.")]
	ZeroRequestCeiling,
	/// Timeout must be positive.
	#[error("The request timeout must be greater than zero.")]
	ZeroTimeout,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}
impl From<url::ParseError> for ConfigError {
	fn from(source: url::ParseError) -> Self {
		Self::InvalidUrl { source }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn classification_covers_documented_statuses() {
		assert_eq!(ApiErrorKind::classify(None), ApiErrorKind::NetworkError);
		assert_eq!(ApiErrorKind::classify(Some(400)), ApiErrorKind::BadRequest);
		assert_eq!(ApiErrorKind::classify(Some(401)), ApiErrorKind::AuthenticationFailure);
		assert_eq!(ApiErrorKind::classify(Some(403)), ApiErrorKind::AuthorizationFailure);
		assert_eq!(ApiErrorKind::classify(Some(404)), ApiErrorKind::NotFound);
		assert_eq!(ApiErrorKind::classify(Some(422)), ApiErrorKind::ValidationError);
		assert_eq!(ApiErrorKind::classify(Some(429)), ApiErrorKind::RateLimitExceeded);
		assert_eq!(ApiErrorKind::classify(Some(500)), ApiErrorKind::InternalServerError);
		assert_eq!(ApiErrorKind::classify(Some(502)), ApiErrorKind::UnknownError);
		assert_eq!(ApiErrorKind::classify(Some(418)), ApiErrorKind::UnknownError);
	}

	#[test]
	fn api_error_exposes_paypal_fields() {
		let payload = json!({
			"name": "RESOURCE_NOT_FOUND",
			"message": "The specified resource does not exist.",
			"debug_id": "f2d3c4b5a6"
		});
		let err = ApiError::from_response(404, Some(payload), "req-1");

		assert_eq!(err.kind, ApiErrorKind::NotFound);
		assert_eq!(err.name(), Some("RESOURCE_NOT_FOUND"));
		assert_eq!(err.debug_id(), Some("f2d3c4b5a6"));
		assert_eq!(err.to_string(), "API request req-1 failed with not_found (HTTP 404).");
	}

	#[test]
	fn network_errors_carry_no_status() {
		let err: Error = ApiError::network("req-2", None).into();

		assert_eq!(err.api_kind(), Some(ApiErrorKind::NetworkError));
		assert_eq!(err.correlation_id(), Some("req-2"));
		assert_eq!(err.to_string(), "API request req-2 failed with network_error.");
	}
}

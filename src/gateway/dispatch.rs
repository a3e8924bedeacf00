//! Request dispatch: throttle, authenticate, send, classify, and retry.
//!
//! Every logical call gets a [`RequestContext`] whose correlation id travels as the
//! `PayPal-Request-Id` header. The same id is reused by every retry of that call, so PayPal
//! treats the retries as one idempotent operation. Retries run in an explicit bounded loop;
//! the backoff schedule comes from [`RetryPolicy`](crate::retry::RetryPolicy).

// crates.io
use oauth2::{
	AsyncHttpClient, HttpRequest, HttpResponse,
	http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use rand::{Rng, distr::Alphanumeric};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	error::{ApiError, ApiErrorKind, BoxError, ConfigError},
	gateway::{Gateway, Method},
	http::{GatewayHttpClient, ResponseMetadataSlot, parse_retry_after},
	obs::{self, CallKind, CallOutcome, CallSpan},
};

/// Header carrying the per-call correlation (idempotency) id.
pub const REQUEST_ID_HEADER: &str = "PayPal-Request-Id";

const CORRELATION_ID_LEN: usize = 32;

/// Per-call request description, discarded after the final outcome.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestContext {
	/// Random id sent as `PayPal-Request-Id` and attached to every error.
	pub correlation_id: String,
	/// HTTP method.
	pub method: Method,
	/// Path relative to the environment root (e.g. `/v2/checkout/orders`).
	pub path: String,
	/// Optional JSON body.
	pub body: Option<Value>,
}
impl RequestContext {
	/// Creates a context with a fresh correlation id.
	pub fn new(method: Method, path: impl Into<String>, body: Option<Value>) -> Self {
		Self { correlation_id: generate_correlation_id(), method, path: path.into(), body }
	}

	/// Overrides the correlation id (e.g. to replay an idempotent call).
	pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
		self.correlation_id = correlation_id.into();

		self
	}
}

impl<C> Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Dispatches `method path` with an optional JSON body and returns the decoded response.
	pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
		self.dispatch(RequestContext::new(method, path, body)).await
	}

	/// Like [`request`](Self::request) but decodes the response into `T`.
	pub async fn request_json<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let ctx = RequestContext::new(method, path, body);
		let correlation_id = ctx.correlation_id.clone();
		let value = self.dispatch(ctx).await?;

		serde_path_to_error::deserialize(value)
			.map_err(|source| Error::Decode { correlation_id, source })
	}

	/// Runs the full pipeline for `ctx`.
	///
	/// Authentication failures and 5xx responses are retried up to the configured ceiling,
	/// dropping the cached token and waiting `base * 2^attempt` between tries. Every other
	/// failure is returned immediately.
	pub async fn dispatch(&self, ctx: RequestContext) -> Result<Value> {
		const KIND: CallKind = CallKind::Dispatch;

		let span = CallSpan::new(KIND, "dispatch").with_correlation_id(&ctx.correlation_id);

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async {
				let retry = self.config.retry;
				let mut attempt = 0;

				loop {
					match self.attempt(&ctx).await {
						Err(Error::Api(error)) => {
							if error.kind == ApiErrorKind::AuthenticationFailure {
								self.tokens.invalidate();
							}
							if !retry.should_retry(&error, attempt) {
								return Err(Error::Api(error));
							}

							let delay = retry.delay_for(attempt);

							self.tokens.invalidate();
							self.metrics.record_retry();
							obs::record_call_outcome(KIND, CallOutcome::Retry);
							obs::trace_retry(&error, attempt, delay);
							tokio::time::sleep(delay).await;

							attempt += 1;
						},
						other => return other,
					}
				}
			})
			.await;

		obs::record_call_outcome(KIND, CallOutcome::of(&result));

		result
	}

	async fn attempt(&self, ctx: &RequestContext) -> Result<Value> {
		if let Err(e) = self.rate_window.check() {
			self.metrics.record_throttled();

			return Err(e.into());
		}

		let token = self.access_token().await?;
		let request = self.build_request(ctx, &token)?;
		let slot = ResponseMetadataSlot::default();
		let handle = self.http_client.with_metadata(slot.clone());

		self.metrics.record_attempt();

		let response = match tokio::time::timeout(self.config.timeout, handle.call(request)).await {
			Ok(Ok(response)) => response,
			Ok(Err(e)) => {
				let failed_status = slot
					.take()
					.and_then(|meta| meta.status)
					.filter(|status| !(200..400).contains(status));
				let source: BoxError = Box::new(e);
				let mut error = ApiError::network(&ctx.correlation_id, Some(source));

				// A lost body only matters when the status line already reported a failure.
				if failed_status.is_some() {
					error.kind = ApiErrorKind::classify(failed_status);
					error.status = failed_status;
				}

				return Err(error.into());
			},
			Err(elapsed) => {
				let source: BoxError = Box::new(elapsed);

				return Err(ApiError::network(&ctx.correlation_id, Some(source)).into());
			},
		};

		into_result(response, &ctx.correlation_id)
	}

	fn build_request(&self, ctx: &RequestContext, token: &AccessToken) -> Result<HttpRequest> {
		let url = self.config.endpoint(&ctx.path)?;
		let body = match &ctx.body {
			Some(value) => serde_json::to_vec(value).map_err(ConfigError::EncodeBody)?,
			None => Vec::new(),
		};
		let request = oauth2::http::Request::builder()
			.method(ctx.method.clone())
			.uri(url.as_str())
			.header(AUTHORIZATION, token.authorization_header())
			.header(CONTENT_TYPE, "application/json")
			.header(ACCEPT, "application/json")
			.header(REQUEST_ID_HEADER, ctx.correlation_id.as_str())
			.body(body)
			.map_err(ConfigError::from)?;

		Ok(request)
	}
}

fn into_result(response: HttpResponse, correlation_id: &str) -> Result<Value> {
	let status = response.status();
	let payload = decode_body(response.body());

	if status.is_success() {
		return Ok(payload.unwrap_or(Value::Null));
	}

	let retry_after = parse_retry_after(response.headers());

	Err(ApiError::from_response(status.as_u16(), payload, correlation_id)
		.with_retry_after(retry_after)
		.into())
}

/// Decodes a response body: JSON when possible, otherwise the lossy UTF-8 text.
fn decode_body(body: &[u8]) -> Option<Value> {
	if body.iter().all(u8::is_ascii_whitespace) {
		return None;
	}

	Some(
		serde_json::from_slice(body)
			.unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned())),
	)
}

fn generate_correlation_id() -> String {
	rand::rng().sample_iter(Alphanumeric).take(CORRELATION_ID_LEN).map(char::from).collect()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn correlation_ids_are_unique_and_alphanumeric() {
		let first = RequestContext::new(Method::GET, "/v1/a", None);
		let second = RequestContext::new(Method::GET, "/v1/a", None);

		assert_eq!(first.correlation_id.len(), CORRELATION_ID_LEN);
		assert!(first.correlation_id.chars().all(|c| c.is_ascii_alphanumeric()));
		assert_ne!(first.correlation_id, second.correlation_id);
		assert_eq!(first.with_correlation_id("fixed").correlation_id, "fixed");
	}

	#[test]
	fn bodies_decode_as_json_text_or_nothing() {
		assert_eq!(decode_body(b""), None);
		assert_eq!(decode_body(b" \n"), None);
		assert_eq!(decode_body(br#"{"id":"X"}"#), Some(json!({ "id": "X" })));
		assert_eq!(decode_body(b"<html>bad gateway</html>"), Some(json!("<html>bad gateway</html>")));
	}

	#[test]
	fn failing_statuses_become_classified_errors() {
		let mut response = HttpResponse::new(br#"{"name":"UNPROCESSABLE_ENTITY"}"#.to_vec());

		*response.status_mut() = oauth2::http::StatusCode::UNPROCESSABLE_ENTITY;

		match into_result(response, "req-9") {
			Err(Error::Api(error)) => {
				assert_eq!(error.kind, ApiErrorKind::ValidationError);
				assert_eq!(error.status, Some(422));
				assert_eq!(error.name(), Some("UNPROCESSABLE_ENTITY"));
				assert_eq!(error.correlation_id, "req-9");
			},
			other => panic!("Unexpected dispatch result: {other:?}."),
		}
	}

	#[test]
	fn empty_success_bodies_become_null() {
		let mut response = HttpResponse::new(Vec::new());

		*response.status_mut() = oauth2::http::StatusCode::NO_CONTENT;

		assert!(matches!(into_result(response, "req-0"), Ok(Value::Null)));
	}
}

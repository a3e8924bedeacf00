//! HTTP transport seam used by both the token exchange and API dispatch.
//!
//! Everything the gateway sends goes through a [`GatewayHttpClient`]. The client hands out
//! `oauth2`-compatible [`AsyncHttpClient`] handles, so the `oauth2` crate can drive the
//! client-credentials exchange over the same transport that carries REST calls. Each handle is
//! bound to a [`ResponseMetadataSlot`] where it reports the HTTP status and `Retry-After` hint
//! of the last response; error mapping reads the slot after a failed call.

// crates.io
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
use reqwest::{
	header::{HeaderMap, RETRY_AFTER},
	redirect::Policy,
};
use time::{OffsetDateTime, format_description::well_known::Rfc2822};
// self
use crate::{_prelude::*, config::GatewayConfig, error::ConfigError};

/// Pluggable HTTP stack behind a [`Gateway`](crate::gateway::Gateway).
///
/// Implement this to route PayPal traffic through a custom client or a scripted fake. The
/// handle futures must be `Send` so gateway calls can run on multi-threaded executors.
pub trait GatewayHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Error produced when no HTTP response could be obtained.
	type TransportError: 'static + Send + Sync + StdError;

	/// Per-call handle reporting into a [`ResponseMetadataSlot`].
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Returns a handle bound to `slot`.
	///
	/// Handles clear the slot when a request starts and fill it as soon as a status line is
	/// received, whether or not the status is a success.
	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle;
}

/// Status line details of the last response seen by a handle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
	/// HTTP status code.
	pub status: Option<u16>,
	/// Parsed `Retry-After` header.
	pub retry_after: Option<Duration>,
}
impl ResponseMetadata {
	/// Captures the status and `Retry-After` hint of a response.
	pub fn from_parts(status: u16, headers: &HeaderMap) -> Self {
		Self { status: Some(status), retry_after: parse_retry_after(headers) }
	}
}

/// Shared cell a handle writes [`ResponseMetadata`] into.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadataSlot(Arc<Mutex<Option<ResponseMetadata>>>);
impl ResponseMetadataSlot {
	/// Records metadata, replacing anything left from an earlier response.
	pub fn store(&self, meta: ResponseMetadata) {
		*self.0.lock() = Some(meta);
	}

	/// Removes and returns the recorded metadata.
	pub fn take(&self) -> Option<ResponseMetadata> {
		self.0.lock().take()
	}
}

/// Default transport built on reqwest with rustls.
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Uses a preconfigured reqwest client as is.
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client for `config`: its timeout, no redirect following, and a crate user agent.
	pub fn for_config(config: &GatewayConfig) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.timeout(config.timeout)
			.redirect(Policy::none())
			.user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
			.build()?;

		Ok(Self(client))
	}
}
impl GatewayHttpClient for ReqwestHttpClient {
	type Handle = ReqwestHandle;
	type TransportError = ReqwestError;

	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
		ReqwestHandle { client: self.0.clone(), slot }
	}
}

/// [`AsyncHttpClient`] handle returned by [`ReqwestHttpClient`].
#[derive(Clone, Debug)]
pub struct ReqwestHandle {
	client: ReqwestClient,
	slot: ResponseMetadataSlot,
}
impl<'c> AsyncHttpClient<'c> for ReqwestHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		Box::pin(async move {
			self.slot.take();

			let request = reqwest::Request::try_from(request).map_err(Box::new)?;
			let upstream = self.client.execute(request).await.map_err(Box::new)?;
			let status = upstream.status();
			let headers = upstream.headers().clone();

			self.slot.store(ResponseMetadata::from_parts(status.as_u16(), &headers));

			let body = upstream.bytes().await.map_err(Box::new)?;
			let mut response = HttpResponse::new(body.to_vec());

			*response.status_mut() = status;
			*response.headers_mut() = headers;

			Ok(response)
		})
	}
}

/// Reads `Retry-After` as delta-seconds or as an RFC 2822 date in the future.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();

	match raw.parse::<u64>() {
		Ok(secs) => Some(Duration::from_secs(secs)),
		Err(_) => {
			let wait = OffsetDateTime::parse(raw, &Rfc2822).ok()? - OffsetDateTime::now_utc();

			Duration::try_from(wait).ok().filter(|wait| !wait.is_zero())
		},
	}
}

//! Webhook subscriptions and inbound signature verification (`/v1/notifications`).
//!
//! Verification is delegated to PayPal: the transmission headers, the webhook id, and the
//! parsed event are posted to `verify-webhook-signature`, and the event is trusted only when
//! PayPal answers `SUCCESS`. Every failure along the way reads as "not verified".

// crates.io
use oauth2::http::HeaderMap;
// self
use crate::{
	_prelude::*,
	gateway::{Gateway, Method},
	http::GatewayHttpClient,
	obs::{self, CallKind, CallOutcome, CallSpan},
	resources::{resource_path, to_body},
};

/// Base path of webhook subscriptions.
pub const WEBHOOKS_PATH: &str = "/v1/notifications/webhooks";
/// Path of the remote signature check.
pub const VERIFY_WEBHOOK_PATH: &str = "/v1/notifications/verify-webhook-signature";

const AUTH_ALGO_HEADER: &str = "paypal-auth-algo";
const CERT_URL_HEADER: &str = "paypal-cert-url";
const TRANSMISSION_ID_HEADER: &str = "paypal-transmission-id";
const TRANSMISSION_SIG_HEADER: &str = "paypal-transmission-sig";
const TRANSMISSION_TIME_HEADER: &str = "paypal-transmission-time";

/// Transmission headers PayPal attaches to every webhook delivery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookHeaders {
	/// `PAYPAL-AUTH-ALGO`.
	pub auth_algo: String,
	/// `PAYPAL-CERT-URL`.
	pub cert_url: String,
	/// `PAYPAL-TRANSMISSION-ID`.
	pub transmission_id: String,
	/// `PAYPAL-TRANSMISSION-SIG`.
	pub transmission_sig: String,
	/// `PAYPAL-TRANSMISSION-TIME`.
	pub transmission_time: String,
}
impl WebhookHeaders {
	/// Extracts the transmission headers from an inbound request.
	///
	/// Returns `None` when any header is missing or is not visible ASCII.
	pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
		let get = |name: &str| Some(headers.get(name)?.to_str().ok()?.to_owned());

		Some(Self {
			auth_algo: get(AUTH_ALGO_HEADER)?,
			cert_url: get(CERT_URL_HEADER)?,
			transmission_id: get(TRANSMISSION_ID_HEADER)?,
			transmission_sig: get(TRANSMISSION_SIG_HEADER)?,
			transmission_time: get(TRANSMISSION_TIME_HEADER)?,
		})
	}
}

#[derive(Serialize)]
struct VerifySignatureRequest<'a> {
	#[serde(flatten)]
	headers: &'a WebhookHeaders,
	webhook_id: &'a str,
	webhook_event: Value,
}

#[derive(Debug, Deserialize)]
struct VerifySignatureResponse {
	verification_status: String,
}

#[derive(Serialize)]
struct EventType<'a> {
	name: &'a str,
}

#[derive(Serialize)]
struct CreateWebhookRequest<'a> {
	url: &'a str,
	event_types: Vec<EventType<'a>>,
}

impl<C> Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Subscribes `url` to the given event types (`*` subscribes to everything).
	pub async fn create_webhook(&self, url: &str, event_types: &[&str]) -> Result<Value> {
		let request = CreateWebhookRequest {
			url,
			event_types: event_types.iter().map(|&name| EventType { name }).collect(),
		};

		self.request(Method::POST, WEBHOOKS_PATH, Some(to_body(&request)?)).await
	}

	/// Lists the webhooks registered for the application.
	pub async fn list_webhooks(&self) -> Result<Value> {
		self.request(Method::GET, WEBHOOKS_PATH, None).await
	}

	/// Deletes a webhook subscription.
	pub async fn delete_webhook(&self, webhook_id: &str) -> Result<()> {
		self.request(Method::DELETE, &resource_path(WEBHOOKS_PATH, webhook_id), None).await?;

		Ok(())
	}

	/// Asks PayPal whether an inbound delivery is authentic.
	///
	/// `event_body` is the raw request body as received. Returns `true` only when PayPal
	/// reports `SUCCESS`; a malformed body, a transport failure, or any other status yields
	/// `false`.
	pub async fn verify_webhook_signature(
		&self,
		headers: &WebhookHeaders,
		event_body: &str,
		webhook_id: &str,
	) -> bool {
		const KIND: CallKind = CallKind::WebhookVerification;

		let span = CallSpan::new(KIND, "verify_webhook_signature");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async {
				let webhook_event =
					serde_json::from_str::<Value>(event_body).map_err(Error::InvalidPayload)?;
				let request = VerifySignatureRequest { headers, webhook_id, webhook_event };
				let response = self
					.request_json::<VerifySignatureResponse>(
						Method::POST,
						VERIFY_WEBHOOK_PATH,
						Some(to_body(&request)?),
					)
					.await?;

				Ok::<_, Error>(response.verification_status == "SUCCESS")
			})
			.await;

		obs::record_call_outcome(KIND, CallOutcome::of(&result));

		result.unwrap_or_else(|e| {
			obs::trace_webhook_verification_error(&e);

			false
		})
	}
}

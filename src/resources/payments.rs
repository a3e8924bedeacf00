//! Captured payments and refunds (`/v2/payments`).

// self
use crate::{
	_prelude::*,
	gateway::{Gateway, Method},
	http::GatewayHttpClient,
	money::Money,
	resources::{resource_path, to_body},
};

/// Base path of captured payments.
pub const CAPTURES_PATH: &str = "/v2/payments/captures";
/// Base path of refunds.
pub const REFUNDS_PATH: &str = "/v2/payments/refunds";

/// Body of `POST /v2/payments/captures/{id}/refund`.
///
/// Leaving `amount` unset refunds the full captured amount.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RefundRequest {
	/// Partial refund amount.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub amount: Option<Money>,
	/// Merchant invoice number for the refund.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub invoice_id: Option<String>,
	/// Reason shown to the buyer.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub note_to_payer: Option<String>,
}
impl RefundRequest {
	/// Refunds everything that was captured.
	pub fn full() -> Self {
		Self::default()
	}

	/// Refunds only `amount`.
	pub fn partial(amount: Money) -> Self {
		Self { amount: Some(amount), ..Default::default() }
	}

	/// Sets the merchant invoice number.
	pub fn with_invoice_id(mut self, invoice_id: impl Into<String>) -> Self {
		self.invoice_id = Some(invoice_id.into());

		self
	}

	/// Sets the note shown to the buyer.
	pub fn with_note_to_payer(mut self, note: impl Into<String>) -> Self {
		self.note_to_payer = Some(note.into());

		self
	}
}

impl<C> Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Refunds a captured payment, fully or partially.
	pub async fn refund_capture(&self, capture_id: &str, request: &RefundRequest) -> Result<Value> {
		let path = format!("{}/refund", resource_path(CAPTURES_PATH, capture_id));

		self.request(Method::POST, &path, Some(to_body(request)?)).await
	}

	/// Fetches a captured payment by id.
	pub async fn get_capture(&self, capture_id: &str) -> Result<Value> {
		self.request(Method::GET, &resource_path(CAPTURES_PATH, capture_id), None).await
	}

	/// Fetches a refund by id.
	pub async fn get_refund(&self, refund_id: &str) -> Result<Value> {
		self.request(Method::GET, &resource_path(REFUNDS_PATH, refund_id), None).await
	}
}

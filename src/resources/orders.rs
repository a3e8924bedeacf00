//! Checkout orders (`/v2/checkout/orders`).

// self
use crate::{
	_prelude::*,
	gateway::{Gateway, Method},
	http::GatewayHttpClient,
	money::Money,
	resources::{resource_path, to_body},
};

/// Base path of the orders API.
pub const ORDERS_PATH: &str = "/v2/checkout/orders";

/// When the buyer's funds are taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderIntent {
	/// Capture immediately after approval.
	Capture,
	/// Authorize now, capture later.
	Authorize,
}

/// Label of the final button on the PayPal approval page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserAction {
	/// "Continue"; the merchant site finalizes the payment.
	Continue,
	/// "Pay Now"; the payment completes on PayPal.
	PayNow,
	/// "Subscribe Now"; only meaningful for subscriptions.
	SubscribeNow,
}

/// Where the shipping address comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShippingPreference {
	/// Use the address on the buyer's PayPal account.
	GetFromFile,
	/// No shipping address is collected.
	NoShipping,
	/// Use the address supplied by the merchant.
	SetProvidedAddress,
}

/// Body of `POST /v2/checkout/orders`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CreateOrderRequest {
	/// Capture or authorize.
	pub intent: OrderIntent,
	/// At least one purchase unit.
	pub purchase_units: Vec<PurchaseUnit>,
	/// Approval-page customization.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub application_context: Option<ApplicationContext>,
}
impl CreateOrderRequest {
	/// Creates an order request for the provided purchase units.
	pub fn new(intent: OrderIntent, purchase_units: Vec<PurchaseUnit>) -> Self {
		Self { intent, purchase_units, application_context: None }
	}

	/// Shorthand for a single purchase unit worth `amount`, captured on approval.
	pub fn capture(amount: Money) -> Self {
		Self::new(OrderIntent::Capture, vec![PurchaseUnit::new(amount)])
	}

	/// Sets the approval-page customization.
	pub fn with_application_context(mut self, context: ApplicationContext) -> Self {
		self.application_context = Some(context);

		self
	}
}

/// One purchase within an order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PurchaseUnit {
	/// Total amount of the unit.
	pub amount: Money,
	/// Identifier used to address the unit in later calls.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub reference_id: Option<String>,
	/// Description shown to the buyer.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Merchant-side identifier echoed in webhooks and reports.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub custom_id: Option<String>,
	/// Merchant invoice number.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub invoice_id: Option<String>,
}
impl PurchaseUnit {
	/// Creates a purchase unit worth `amount`.
	pub fn new(amount: Money) -> Self {
		Self { amount, reference_id: None, description: None, custom_id: None, invoice_id: None }
	}

	/// Sets the reference id used to address the unit in later calls.
	pub fn with_reference_id(mut self, reference_id: impl Into<String>) -> Self {
		self.reference_id = Some(reference_id.into());

		self
	}

	/// Sets the description shown to the buyer.
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());

		self
	}

	/// Sets the merchant-side custom id.
	pub fn with_custom_id(mut self, custom_id: impl Into<String>) -> Self {
		self.custom_id = Some(custom_id.into());

		self
	}

	/// Sets the merchant invoice id; PayPal rejects duplicates.
	pub fn with_invoice_id(mut self, invoice_id: impl Into<String>) -> Self {
		self.invoice_id = Some(invoice_id.into());

		self
	}
}

/// Approval-page customization shared by orders and subscriptions.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ApplicationContext {
	/// Brand label overriding the business name on PayPal's pages.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub brand_name: Option<String>,
	/// Where the buyer lands after approving.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub return_url: Option<String>,
	/// Where the buyer lands after cancelling.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub cancel_url: Option<String>,
	/// Label of the final approval button.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub user_action: Option<UserAction>,
	/// Shipping-address source.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub shipping_preference: Option<ShippingPreference>,
}
impl ApplicationContext {
	/// Creates a context with both redirect URLs set.
	pub fn with_redirects(return_url: impl Into<String>, cancel_url: impl Into<String>) -> Self {
		Self {
			return_url: Some(return_url.into()),
			cancel_url: Some(cancel_url.into()),
			..Default::default()
		}
	}

	/// Sets the brand name displayed on the approval page.
	pub fn with_brand_name(mut self, brand_name: impl Into<String>) -> Self {
		self.brand_name = Some(brand_name.into());

		self
	}

	/// Sets the label of the final approval button.
	pub fn with_user_action(mut self, user_action: UserAction) -> Self {
		self.user_action = Some(user_action);

		self
	}

	/// Sets the shipping-address source.
	pub fn with_shipping_preference(mut self, shipping_preference: ShippingPreference) -> Self {
		self.shipping_preference = Some(shipping_preference);

		self
	}
}

/// Returns the URL the buyer must visit to approve a created order or subscription.
///
/// Looks for the `approve` HATEOAS link and falls back to `payer-action`.
pub fn approval_url(resource: &Value) -> Option<&str> {
	let links = resource.get("links")?.as_array()?;

	link_href(links, "approve").or_else(|| link_href(links, "payer-action"))
}

fn link_href<'a>(links: &'a [Value], rel: &str) -> Option<&'a str> {
	links
		.iter()
		.find(|link| link.get("rel").and_then(Value::as_str) == Some(rel))?
		.get("href")?
		.as_str()
}

impl<C> Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Creates an order and returns PayPal's order resource.
	pub async fn create_order(&self, request: &CreateOrderRequest) -> Result<Value> {
		self.request(Method::POST, ORDERS_PATH, Some(to_body(request)?)).await
	}

	/// Fetches an order by id.
	pub async fn get_order(&self, order_id: &str) -> Result<Value> {
		self.request(Method::GET, &resource_path(ORDERS_PATH, order_id), None).await
	}

	/// Captures an approved order.
	pub async fn capture_order(&self, order_id: &str) -> Result<Value> {
		let path = format!("{}/capture", resource_path(ORDERS_PATH, order_id));

		self.request(Method::POST, &path, Some(json!({}))).await
	}

	/// Authorizes an approved order for later capture.
	pub async fn authorize_order(&self, order_id: &str) -> Result<Value> {
		let path = format!("{}/authorize", resource_path(ORDERS_PATH, order_id));

		self.request(Method::POST, &path, Some(json!({}))).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::money::format_amount;

	#[test]
	fn create_order_payload_omits_unset_fields() {
		let request = CreateOrderRequest::new(
			OrderIntent::Capture,
			vec![PurchaseUnit::new(format_amount(2500, "USD")).with_reference_id("default")],
		)
		.with_application_context(
			ApplicationContext::with_redirects("https://shop.test/ok", "https://shop.test/cancel")
				.with_user_action(UserAction::PayNow)
				.with_shipping_preference(ShippingPreference::NoShipping),
		);
		let body = to_body(&request).expect("Order request should encode.");

		assert_eq!(
			body,
			json!({
				"intent": "CAPTURE",
				"purchase_units": [{
					"amount": { "currency_code": "USD", "value": "25.00" },
					"reference_id": "default"
				}],
				"application_context": {
					"return_url": "https://shop.test/ok",
					"cancel_url": "https://shop.test/cancel",
					"user_action": "PAY_NOW",
					"shipping_preference": "NO_SHIPPING"
				}
			})
		);
	}

	#[test]
	fn approval_url_prefers_approve_then_payer_action() {
		let order = json!({
			"id": "5O190127TN364715T",
			"links": [
				{ "rel": "self", "href": "https://api/self" },
				{ "rel": "approve", "href": "https://paypal/approve" }
			]
		});

		assert_eq!(approval_url(&order), Some("https://paypal/approve"));

		let order = json!({ "links": [{ "rel": "payer-action", "href": "https://paypal/act" }] });

		assert_eq!(approval_url(&order), Some("https://paypal/act"));
		assert_eq!(approval_url(&json!({ "links": [] })), None);
		assert_eq!(approval_url(&Value::Null), None);
	}
}

//! Catalog products, billing plans, and subscriptions (`/v1/catalogs`, `/v1/billing`).
//!
//! Plans are built from an ordered list of [`BillingCycle`]s. Trial cycles must come before
//! the regular cycle; [`CreatePlanRequest::new`] numbers the cycles in the order given.

// crates.io
use time::OffsetDateTime;
// self
use crate::{
	_prelude::*,
	gateway::{Gateway, Method},
	http::GatewayHttpClient,
	money::Money,
	resources::{ApplicationContext, resource_path, to_body},
};

/// Base path of catalog products.
pub const PRODUCTS_PATH: &str = "/v1/catalogs/products";
/// Base path of billing plans.
pub const PLANS_PATH: &str = "/v1/billing/plans";
/// Base path of subscriptions.
pub const SUBSCRIPTIONS_PATH: &str = "/v1/billing/subscriptions";

/// Kind of catalog product.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductType {
	/// Shipped goods.
	Physical,
	/// Downloadable goods.
	Digital,
	/// Services and memberships.
	Service,
}

/// Body of `POST /v1/catalogs/products`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CreateProductRequest {
	/// Product name.
	pub name: String,
	/// Product kind.
	#[serde(rename = "type")]
	pub product_type: ProductType,
	/// Free-form description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// PayPal category code such as `SOFTWARE`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
	/// Product image.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub image_url: Option<String>,
	/// Product home page.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub home_url: Option<String>,
}
impl CreateProductRequest {
	/// Creates a product request with the required fields.
	pub fn new(name: impl Into<String>, product_type: ProductType) -> Self {
		Self {
			name: name.into(),
			product_type,
			description: None,
			category: None,
			image_url: None,
			home_url: None,
		}
	}

	/// Sets the description.
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());

		self
	}

	/// Sets the category code.
	pub fn with_category(mut self, category: impl Into<String>) -> Self {
		self.category = Some(category.into());

		self
	}

	/// Sets the image URL.
	pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
		self.image_url = Some(image_url.into());

		self
	}

	/// Sets the home page URL.
	pub fn with_home_url(mut self, home_url: impl Into<String>) -> Self {
		self.home_url = Some(home_url.into());

		self
	}
}

/// Calendar unit of a billing frequency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntervalUnit {
	/// Daily.
	Day,
	/// Weekly.
	Week,
	/// Monthly.
	Month,
	/// Yearly.
	Year,
}

/// How often a cycle bills.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frequency {
	/// Calendar unit.
	pub interval_unit: IntervalUnit,
	/// Number of units between charges.
	pub interval_count: u32,
}
impl Frequency {
	/// Bills every `interval_count` units.
	pub const fn new(interval_unit: IntervalUnit, interval_count: u32) -> Self {
		Self { interval_unit, interval_count }
	}

	/// Bills once a month.
	pub const fn monthly() -> Self {
		Self::new(IntervalUnit::Month, 1)
	}

	/// Bills once a year.
	pub const fn yearly() -> Self {
		Self::new(IntervalUnit::Year, 1)
	}
}

/// Whether a cycle is a trial or the regular price.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TenureType {
	/// Full-price cycle.
	Regular,
	/// Introductory cycle, possibly free.
	Trial,
}

/// Fixed price charged per cycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingScheme {
	/// Amount charged each time the cycle bills.
	pub fixed_price: Money,
}

/// One phase of a billing plan.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BillingCycle {
	/// Billing interval.
	pub frequency: Frequency,
	/// Trial or regular.
	pub tenure_type: TenureType,
	/// 1-based position in the plan; assigned by [`CreatePlanRequest::new`].
	pub sequence: u32,
	/// How many times the cycle runs; `0` means until cancelled.
	pub total_cycles: u32,
	/// Price per cycle.
	pub pricing_scheme: PricingScheme,
}
impl BillingCycle {
	/// Regular cycle charging `price` every `frequency` until cancelled.
	pub fn regular(frequency: Frequency, price: Money) -> Self {
		Self::with_tenure(TenureType::Regular, frequency, price, 0)
	}

	/// Trial cycle charging `price` (possibly zero) for `total_cycles` intervals.
	pub fn trial(frequency: Frequency, price: Money, total_cycles: u32) -> Self {
		Self::with_tenure(TenureType::Trial, frequency, price, total_cycles)
	}

	/// Limits how many times the cycle runs.
	pub fn with_total_cycles(mut self, total_cycles: u32) -> Self {
		self.total_cycles = total_cycles;

		self
	}

	fn with_tenure(
		tenure_type: TenureType,
		frequency: Frequency,
		price: Money,
		total_cycles: u32,
	) -> Self {
		Self {
			frequency,
			tenure_type,
			sequence: 1,
			total_cycles,
			pricing_scheme: PricingScheme { fixed_price: price },
		}
	}
}

/// What happens when the setup fee cannot be collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SetupFeeFailureAction {
	/// Activate the subscription anyway and bill the fee later.
	Continue,
	/// Cancel the subscription.
	Cancel,
}

/// Collection behavior of a plan.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PaymentPreferences {
	/// Bill outstanding amounts in the next cycle.
	pub auto_bill_outstanding: bool,
	/// One-time fee charged at activation.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub setup_fee: Option<Money>,
	/// Behavior when the setup fee fails.
	pub setup_fee_failure_action: SetupFeeFailureAction,
	/// Failed payments tolerated before suspension.
	pub payment_failure_threshold: u32,
}
impl PaymentPreferences {
	/// Sets a one-time setup fee.
	pub fn with_setup_fee(mut self, setup_fee: Money) -> Self {
		self.setup_fee = Some(setup_fee);

		self
	}
}
impl Default for PaymentPreferences {
	fn default() -> Self {
		Self {
			auto_bill_outstanding: true,
			setup_fee: None,
			setup_fee_failure_action: SetupFeeFailureAction::Continue,
			payment_failure_threshold: 3,
		}
	}
}

/// Body of `POST /v1/billing/plans`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CreatePlanRequest {
	/// Catalog product the plan sells.
	pub product_id: String,
	/// Plan name.
	pub name: String,
	/// Free-form description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Ordered cycles, trials first.
	pub billing_cycles: Vec<BillingCycle>,
	/// Collection behavior.
	pub payment_preferences: PaymentPreferences,
}
impl CreatePlanRequest {
	/// Creates a plan request, numbering `billing_cycles` from 1 in the order given.
	pub fn new(
		product_id: impl Into<String>,
		name: impl Into<String>,
		mut billing_cycles: Vec<BillingCycle>,
	) -> Self {
		for (sequence, cycle) in (1..).zip(billing_cycles.iter_mut()) {
			cycle.sequence = sequence;
		}

		Self {
			product_id: product_id.into(),
			name: name.into(),
			description: None,
			billing_cycles,
			payment_preferences: PaymentPreferences::default(),
		}
	}

	/// Sets the description.
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());

		self
	}

	/// Replaces the default collection behavior.
	pub fn with_payment_preferences(mut self, preferences: PaymentPreferences) -> Self {
		self.payment_preferences = preferences;

		self
	}
}

/// Subscriber's name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayerName {
	/// First name.
	pub given_name: String,
	/// Last name.
	pub surname: String,
}

/// Who is subscribing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Subscriber {
	/// Subscriber's name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<PayerName>,
	/// Subscriber's email.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email_address: Option<String>,
}

/// Body of `POST /v1/billing/subscriptions`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CreateSubscriptionRequest {
	/// Plan to subscribe to.
	pub plan_id: String,
	/// When billing starts; PayPal defaults to now.
	#[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
	pub start_time: Option<OffsetDateTime>,
	/// Quantity of the product, as a decimal string.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub quantity: Option<String>,
	/// Merchant-side identifier.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub custom_id: Option<String>,
	/// Subscriber details used to prefill the approval page.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub subscriber: Option<Subscriber>,
	/// Approval-page customization.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub application_context: Option<ApplicationContext>,
}
impl CreateSubscriptionRequest {
	/// Creates a subscription request for `plan_id`.
	pub fn new(plan_id: impl Into<String>) -> Self {
		Self {
			plan_id: plan_id.into(),
			start_time: None,
			quantity: None,
			custom_id: None,
			subscriber: None,
			application_context: None,
		}
	}

	/// Delays the first charge until `start_time`.
	pub fn with_start_time(mut self, start_time: OffsetDateTime) -> Self {
		self.start_time = Some(start_time);

		self
	}

	/// Sets the product quantity.
	pub fn with_quantity(mut self, quantity: u32) -> Self {
		self.quantity = Some(quantity.to_string());

		self
	}

	/// Sets the merchant-side identifier.
	pub fn with_custom_id(mut self, custom_id: impl Into<String>) -> Self {
		self.custom_id = Some(custom_id.into());

		self
	}

	/// Sets the subscriber details.
	pub fn with_subscriber(mut self, subscriber: Subscriber) -> Self {
		self.subscriber = Some(subscriber);

		self
	}

	/// Sets the approval-page customization.
	pub fn with_application_context(mut self, context: ApplicationContext) -> Self {
		self.application_context = Some(context);

		self
	}
}

#[derive(Serialize)]
struct Reason<'a> {
	reason: &'a str,
}

impl<C> Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Creates a catalog product.
	pub async fn create_product(&self, request: &CreateProductRequest) -> Result<Value> {
		self.request(Method::POST, PRODUCTS_PATH, Some(to_body(request)?)).await
	}

	/// Creates a billing plan.
	pub async fn create_plan(&self, request: &CreatePlanRequest) -> Result<Value> {
		self.request(Method::POST, PLANS_PATH, Some(to_body(request)?)).await
	}

	/// Fetches a billing plan by id.
	pub async fn get_plan(&self, plan_id: &str) -> Result<Value> {
		self.request(Method::GET, &resource_path(PLANS_PATH, plan_id), None).await
	}

	/// Creates a subscription; the response carries the buyer's approval link.
	pub async fn create_subscription(&self, request: &CreateSubscriptionRequest) -> Result<Value> {
		self.request(Method::POST, SUBSCRIPTIONS_PATH, Some(to_body(request)?)).await
	}

	/// Fetches a subscription by id.
	pub async fn get_subscription(&self, subscription_id: &str) -> Result<Value> {
		self.request(Method::GET, &resource_path(SUBSCRIPTIONS_PATH, subscription_id), None).await
	}

	/// Cancels a subscription permanently.
	pub async fn cancel_subscription(&self, subscription_id: &str, reason: &str) -> Result<()> {
		self.transition_subscription(subscription_id, "cancel", reason).await
	}

	/// Suspends a subscription until it is activated again.
	pub async fn suspend_subscription(&self, subscription_id: &str, reason: &str) -> Result<()> {
		self.transition_subscription(subscription_id, "suspend", reason).await
	}

	/// Activates a suspended or approved subscription.
	pub async fn activate_subscription(&self, subscription_id: &str, reason: &str) -> Result<()> {
		self.transition_subscription(subscription_id, "activate", reason).await
	}

	async fn transition_subscription(
		&self,
		subscription_id: &str,
		action: &str,
		reason: &str,
	) -> Result<()> {
		let path = format!("{}/{action}", resource_path(SUBSCRIPTIONS_PATH, subscription_id));

		self.request(Method::POST, &path, Some(to_body(&Reason { reason })?)).await?;

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;
	use crate::money::format_amount;

	#[test]
	fn plans_number_cycles_and_apply_default_preferences() {
		let request = CreatePlanRequest::new(
			"PROD-1",
			"Basic",
			vec![
				BillingCycle::trial(Frequency::monthly(), format_amount(0, "USD"), 1),
				BillingCycle::regular(Frequency::monthly(), format_amount(999, "USD")),
			],
		);
		let body = to_body(&request).expect("Plan should encode.");

		assert_eq!(body["billing_cycles"][0]["sequence"], 1);
		assert_eq!(body["billing_cycles"][0]["tenure_type"], "TRIAL");
		assert_eq!(body["billing_cycles"][0]["pricing_scheme"]["fixed_price"]["value"], "0.00");
		assert_eq!(body["billing_cycles"][1]["sequence"], 2);
		assert_eq!(body["billing_cycles"][1]["total_cycles"], 0);
		assert_eq!(
			body["billing_cycles"][1]["frequency"],
			json!({ "interval_unit": "MONTH", "interval_count": 1 })
		);
		assert_eq!(
			body["payment_preferences"],
			json!({
				"auto_bill_outstanding": true,
				"setup_fee_failure_action": "CONTINUE",
				"payment_failure_threshold": 3
			})
		);
		assert!(body.get("description").is_none());
	}

	#[test]
	fn products_rename_the_type_field() {
		let request = CreateProductRequest::new("Streaming", ProductType::Service)
			.with_category("SOFTWARE");
		let body = to_body(&request).expect("Product should encode.");

		assert_eq!(body, json!({ "name": "Streaming", "type": "SERVICE", "category": "SOFTWARE" }));
	}

	#[test]
	fn subscriptions_format_start_time_as_rfc3339() {
		let request = CreateSubscriptionRequest::new("P-5ML4271244454362WXNWU5NQ")
			.with_start_time(datetime!(2026-01-01 00:00:00 UTC))
			.with_quantity(2);
		let body = to_body(&request).expect("Subscription should encode.");

		assert_eq!(body["start_time"], "2026-01-01T00:00:00Z");
		assert_eq!(body["quantity"], "2");
		assert!(body.get("subscriber").is_none());
	}
}

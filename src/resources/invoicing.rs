//! Invoices (`/v2/invoicing/invoices`).

// self
use crate::{
	_prelude::*,
	gateway::{Gateway, Method},
	http::GatewayHttpClient,
	money::Money,
	resources::{PayerName, resource_path, to_body},
};

/// Base path of the invoicing API.
pub const INVOICES_PATH: &str = "/v2/invoicing/invoices";

/// Invoice-level details.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InvoiceDetail {
	/// Currency of every amount on the invoice.
	pub currency_code: String,
	/// Merchant invoice number; PayPal generates one when unset.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub invoice_number: Option<String>,
	/// Note shown to the recipient.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub note: Option<String>,
	/// Terms and conditions shown on the invoice.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub term: Option<String>,
}
impl InvoiceDetail {
	/// Creates details for an invoice in `currency_code`.
	pub fn new(currency_code: impl Into<String>) -> Self {
		Self { currency_code: currency_code.into(), invoice_number: None, note: None, term: None }
	}

	/// Sets the merchant invoice number.
	pub fn with_invoice_number(mut self, invoice_number: impl Into<String>) -> Self {
		self.invoice_number = Some(invoice_number.into());

		self
	}

	/// Sets the note shown to the recipient.
	pub fn with_note(mut self, note: impl Into<String>) -> Self {
		self.note = Some(note.into());

		self
	}

	/// Sets the terms and conditions.
	pub fn with_term(mut self, term: impl Into<String>) -> Self {
		self.term = Some(term.into());

		self
	}
}

/// Contact details of an invoice recipient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BillingInfo {
	/// Where the invoice is sent.
	pub email_address: String,
	/// Recipient's name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<PayerName>,
}

/// One invoice recipient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Recipient {
	/// Billing contact.
	pub billing_info: BillingInfo,
}
impl Recipient {
	/// Recipient identified by email only.
	pub fn email(email_address: impl Into<String>) -> Self {
		Self { billing_info: BillingInfo { email_address: email_address.into(), name: None } }
	}

	/// Sets the recipient's name.
	pub fn with_name(mut self, given_name: impl Into<String>, surname: impl Into<String>) -> Self {
		self.billing_info.name =
			Some(PayerName { given_name: given_name.into(), surname: surname.into() });

		self
	}
}

/// One line item.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InvoiceItem {
	/// Item name.
	pub name: String,
	/// Quantity, as a decimal string.
	pub quantity: String,
	/// Price of one unit.
	pub unit_amount: Money,
	/// Free-form description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}
impl InvoiceItem {
	/// Creates a line item of `quantity` units at `unit_amount` each.
	pub fn new(name: impl Into<String>, quantity: u32, unit_amount: Money) -> Self {
		Self { name: name.into(), quantity: quantity.to_string(), unit_amount, description: None }
	}

	/// Sets the description.
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());

		self
	}
}

/// Body of `POST /v2/invoicing/invoices`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CreateInvoiceRequest {
	/// Invoice-level details.
	pub detail: InvoiceDetail,
	/// Recipients of the invoice.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub primary_recipients: Vec<Recipient>,
	/// Line items.
	pub items: Vec<InvoiceItem>,
}
impl CreateInvoiceRequest {
	/// Creates an invoice with no recipients or items yet.
	pub fn new(detail: InvoiceDetail) -> Self {
		Self { detail, primary_recipients: Vec::new(), items: Vec::new() }
	}

	/// Adds a recipient.
	pub fn with_recipient(mut self, recipient: Recipient) -> Self {
		self.primary_recipients.push(recipient);

		self
	}

	/// Adds a line item.
	pub fn with_item(mut self, item: InvoiceItem) -> Self {
		self.items.push(item);

		self
	}
}

#[derive(Serialize)]
struct Notification {
	send_to_recipient: bool,
}

impl<C> Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Creates a draft invoice.
	pub async fn create_invoice(&self, request: &CreateInvoiceRequest) -> Result<Value> {
		self.request(Method::POST, INVOICES_PATH, Some(to_body(request)?)).await
	}

	/// Sends a draft invoice to its recipients.
	pub async fn send_invoice(&self, invoice_id: &str) -> Result<Value> {
		self.invoice_action(invoice_id, "send").await
	}

	/// Fetches an invoice by id.
	pub async fn get_invoice(&self, invoice_id: &str) -> Result<Value> {
		self.request(Method::GET, &resource_path(INVOICES_PATH, invoice_id), None).await
	}

	/// Cancels a sent invoice and notifies the recipients.
	pub async fn cancel_invoice(&self, invoice_id: &str) -> Result<Value> {
		self.invoice_action(invoice_id, "cancel").await
	}

	async fn invoice_action(&self, invoice_id: &str, action: &str) -> Result<Value> {
		let path = format!("{}/{action}", resource_path(INVOICES_PATH, invoice_id));
		let body = to_body(&Notification { send_to_recipient: true })?;

		self.request(Method::POST, &path, Some(body)).await
	}
}

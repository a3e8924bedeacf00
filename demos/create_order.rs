//! Demonstrates creating a checkout order against a mock PayPal API and printing the buyer's
//! approval link.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use paypal_gateway::{
	auth::Credentials,
	config::{Environment, GatewayConfig},
	gateway::Gateway,
	http::ReqwestHttpClient,
	reqwest::Client,
	resources::{ApplicationContext, CreateOrderRequest, approval_url},
	serde_json::json,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/oauth2/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"Bearer\",\"expires_in\":32400}",
			);
		})
		.await;
	let order_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v2/checkout/orders");
			then.status(201).json_body(json!({
				"id": "5O190127TN364715T",
				"status": "CREATED",
				"links": [{
					"rel": "approve",
					"href": "https://www.sandbox.paypal.com/checkoutnow?token=5O190127TN364715T"
				}]
			}));
		})
		.await;
	let config = GatewayConfig::builder(Credentials::new("demo-client", "demo-secret")?)
		.environment(Environment::Custom(Url::parse(&server.base_url())?))
		.build()?;
	let http_client = ReqwestHttpClient::with_client(Client::builder().build()?);
	let gateway: Gateway = Gateway::with_http_client(config, http_client)?;
	let amount = gateway.amount_policy().money(2500, "USD")?;
	let request = CreateOrderRequest::capture(amount).with_application_context(
		ApplicationContext::with_redirects("https://shop.test/ok", "https://shop.test/cancel"),
	);
	let order = gateway.create_order(&request).await?;

	println!("Order {} created.", order["id"]);

	if let Some(url) = approval_url(&order) {
		println!("Send the buyer to {url}.");
	}

	token_mock.assert_async().await;
	order_mock.assert_async().await;

	Ok(())
}

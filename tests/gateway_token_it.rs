// crates.io
use httpmock::prelude::*;
// self
use paypal_gateway::{
	_preludet::*,
	auth::TokenState,
	error::{ApiErrorKind, AuthError},
	gateway::Gateway,
};

fn token_body(access_token: &str, expires_in: u64) -> String {
	format!(
		"{{\"scope\":\"https://uri.paypal.com/services/invoicing\",\"access_token\":\"{access_token}\",\"token_type\":\"Bearer\",\"app_id\":\"APP-80W284485P519543T\",\"expires_in\":{expires_in},\"nonce\":\"2026-10-17T00:00:00Zabc\"}}"
	)
}

#[tokio::test]
async fn token_is_reused_until_the_margin() {
	let server = MockServer::start_async().await;
	let gateway = build_reqwest_test_gateway(&server.base_url());
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v1/oauth2/token")
				.header("authorization", TEST_BASIC_AUTH)
				.header("content-type", "application/x-www-form-urlencoded");
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("long-lived", 3_600));
		})
		.await;
	let order_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v2/checkout/orders/ORDER-1")
				.header("authorization", "Bearer long-lived")
				.header("accept", "application/json")
				.header_exists("paypal-request-id");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "id": "ORDER-1", "status": "CREATED" }));
		})
		.await;

	assert_eq!(gateway.token_state(), TokenState::Absent);

	let first = gateway.get_order("ORDER-1").await.expect("First order fetch should succeed.");
	let second = gateway.get_order("ORDER-1").await.expect("Second order fetch should succeed.");

	assert_eq!(first["status"], "CREATED");
	assert_eq!(second["id"], "ORDER-1");
	assert_eq!(gateway.token_state(), TokenState::Valid);
	assert_eq!(gateway.metrics().token_exchanges(), 1);

	token_mock.assert_calls_async(1).await;
	order_mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn token_inside_the_margin_is_exchanged_again() {
	let server = MockServer::start_async().await;
	let gateway = build_reqwest_test_gateway(&server.base_url());
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/oauth2/token");
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("short-lived", 30));
		})
		.await;
	let order_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/checkout/orders/ORDER-2");
			then.status(200).header("content-type", "application/json").json_body(json!({}));
		})
		.await;

	gateway.get_order("ORDER-2").await.expect("First order fetch should succeed.");

	assert_eq!(gateway.token_state(), TokenState::Expired);

	gateway.get_order("ORDER-2").await.expect("Second order fetch should succeed.");

	token_mock.assert_calls_async(2).await;
	order_mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn access_token_records_scope_and_type() {
	let server = MockServer::start_async().await;
	let gateway = build_reqwest_test_gateway(&server.base_url());
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/oauth2/token");
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("scoped", 32_400));
		})
		.await;
	let token = gateway.access_token().await.expect("Token exchange should succeed.");

	assert_eq!(token.secret.expose(), "scoped");
	assert_eq!(token.token_type, "bearer");
	assert_eq!(token.scope.as_deref(), Some("https://uri.paypal.com/services/invoicing"));
	assert_eq!(token.authorization_header(), "Bearer scoped");
	assert!(gateway.invalidate_token());
	assert_eq!(gateway.token_state(), TokenState::Absent);
	assert!(!gateway.invalidate_token());

	token_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn rejected_credentials_surface_as_auth_errors() {
	let server = MockServer::start_async().await;
	let gateway = build_reqwest_test_gateway(&server.base_url());
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/oauth2/token");
			then.status(401).header("content-type", "application/json").body(
				"{\"error\":\"invalid_client\",\"error_description\":\"Client Authentication failed\"}",
			);
		})
		.await;
	let order_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/checkout/orders/ORDER-3");
			then.status(200);
		})
		.await;
	let err = gateway.get_order("ORDER-3").await.expect_err("Rejected credentials should fail.");

	match err {
		Error::Auth(AuthError::Rejected { reason, status }) => {
			assert_eq!(status, Some(401));
			assert!(reason.contains("invalid_client"));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	assert_eq!(gateway.token_state(), TokenState::Absent);

	token_mock.assert_calls_async(1).await;
	order_mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn concurrent_callers_share_one_exchange() {
	let server = MockServer::start_async().await;
	let gateway = build_reqwest_test_gateway(&server.base_url());
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/oauth2/token");
			then.status(200)
				.header("content-type", "application/json")
				.delay(Duration::from_millis(100))
				.body(token_body("shared", 3_600));
		})
		.await;
	let tasks = (0..4)
		.map(|_| {
			let gateway = gateway.clone();

			tokio::spawn(async move { gateway.access_token().await })
		})
		.collect::<Vec<_>>();

	for task in tasks {
		let token = task
			.await
			.expect("Token task should not panic.")
			.expect("Token exchange should succeed.");

		assert_eq!(token.secret.expose(), "shared");
	}

	token_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn slow_responses_time_out_as_network_errors() {
	let server = MockServer::start_async().await;
	let mut config = test_config(&server.base_url());

	config.timeout = Duration::from_millis(100);

	let gateway: Gateway = Gateway::with_http_client(config, test_reqwest_http_client())
		.expect("Gateway should build with a short timeout.");
	let _token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/oauth2/token");
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("timeout-token", 3_600));
		})
		.await;
	let _order_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/checkout/orders/SLOW");
			then.status(200).delay(Duration::from_millis(500)).json_body(json!({}));
		})
		.await;
	let err = gateway.get_order("SLOW").await.expect_err("Slow response should time out.");

	assert_eq!(err.api_kind(), Some(ApiErrorKind::NetworkError));
	assert_eq!(gateway.metrics().retries(), 0);
}

#[tokio::test]
async fn custom_roots_route_through_their_prefix() {
	let server = MockServer::start_async().await;
	let gateway = build_reqwest_test_gateway(&server.url("/paypal"));
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/paypal/v1/oauth2/token");
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("proxied", 3_600));
		})
		.await;
	let order_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/paypal/v2/checkout/orders/ORDER-P")
				.header("authorization", "Bearer proxied");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "id": "ORDER-P" }));
		})
		.await;
	let order = gateway.get_order("ORDER-P").await.expect("Proxied order fetch should succeed.");

	assert_eq!(order["id"], "ORDER-P");

	token_mock.assert_calls_async(1).await;
	order_mock.assert_calls_async(1).await;
}

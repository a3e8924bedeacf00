//! Typed async client for PayPal's REST API.
//!
//! A single [`Gateway`](gateway::Gateway) caches client-credentials tokens, enforces a local
//! per-minute request budget, retries transient failures with exponential backoff, and
//! classifies every remote failure.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod money;
pub mod oauth;
pub mod obs;
pub mod rate_limit;
pub mod resources;
pub mod retry;
#[cfg(any(test, feature = "test"))]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests and demos; enabled via
	//! `cfg(test)` or the `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::Credentials,
		config::{Environment, GatewayConfig},
		gateway::Gateway,
		http::ReqwestHttpClient,
	};

	/// Client identifier used by test gateways.
	pub const TEST_CLIENT_ID: &str = "client-id";
	/// Client secret used by test gateways.
	pub const TEST_CLIENT_SECRET: &str = "client-secret";
	/// `Authorization` header value the token endpoint receives from test gateways.
	pub const TEST_BASIC_AUTH: &str = "Basic Y2xpZW50LWlkOmNsaWVudC1zZWNyZXQ=";

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Returns a config pointed at `base_url` with millisecond backoff so retry tests stay fast.
	pub fn test_config(base_url: &str) -> GatewayConfig {
		GatewayConfig::builder(
			Credentials::new(TEST_CLIENT_ID, TEST_CLIENT_SECRET)
				.expect("Test credentials should be valid."),
		)
		.environment(Environment::Custom(
			Url::parse(base_url).expect("Test base URL should parse successfully."),
		))
		.retry_base_delay(Duration::from_millis(10))
		.build()
		.expect("Test gateway config should build successfully.")
	}

	/// Constructs a reqwest-backed [`Gateway`] that talks to `base_url`.
	pub fn build_reqwest_test_gateway(base_url: &str) -> Gateway {
		Gateway::with_http_client(test_config(base_url), test_reqwest_http_client())
			.expect("Test gateway should build successfully.")
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
		time::{Duration, Instant},
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Value, json};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};

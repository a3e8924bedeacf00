//! Gateway configuration: credentials, target environment, and pipeline limits.
//!
//! Values are supplied once through [`GatewayConfigBuilder`] and never change afterwards.
//! The builder validates its inputs and resolves the base URL up front, so a built
//! [`GatewayConfig`] is always usable.

// self
use crate::{
	_prelude::*, auth::Credentials, error::ConfigError, money::AmountPolicy, retry::RetryPolicy,
};

/// PayPal environment the gateway talks to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
	/// `https://api-m.sandbox.paypal.com`.
	#[default]
	Sandbox,
	/// `https://api-m.paypal.com`.
	Live,
	/// Any other root (proxies, mock servers).
	Custom(Url),
}
impl Environment {
	/// Sandbox REST root.
	pub const SANDBOX_BASE: &'static str = "https://api-m.sandbox.paypal.com";
	/// Live REST root.
	pub const LIVE_BASE: &'static str = "https://api-m.paypal.com";

	/// Resolves the REST root for this environment.
	///
	/// The returned path always ends with `/`, so a custom root such as a proxy prefix is kept
	/// when endpoints are joined onto it.
	pub fn base_url(&self) -> Result<Url, ConfigError> {
		let mut url = match self {
			Self::Sandbox => Url::parse(Self::SANDBOX_BASE)?,
			Self::Live => Url::parse(Self::LIVE_BASE)?,
			Self::Custom(url) => url.clone(),
		};

		if !url.path().ends_with('/') {
			let path = format!("{}/", url.path());

			url.set_path(&path);
		}

		Ok(url)
	}

	/// Returns a stable label suitable for logs.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Sandbox => "sandbox",
			Self::Live => "live",
			Self::Custom(_) => "custom",
		}
	}
}
impl Display for Environment {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Immutable gateway configuration.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
	/// App credentials used for the client-credentials exchange.
	pub credentials: Credentials,
	/// Target environment.
	pub environment: Environment,
	/// Resolved REST root for [`environment`](Self::environment).
	pub base_url: Url,
	/// Per-call timeout applied to every transport call.
	pub timeout: Duration,
	/// Retry ceiling and backoff schedule.
	pub retry: RetryPolicy,
	/// Local ceiling of API calls per rolling minute.
	pub max_requests_per_minute: u32,
	/// Cached tokens are refreshed once they are this close to expiry.
	pub token_margin: Duration,
	/// Minimum-amount rules for [`Money`](crate::money::Money) validation.
	pub amount_policy: AmountPolicy,
}
impl GatewayConfig {
	/// Default per-call timeout.
	pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
	/// Default per-minute request ceiling.
	pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 100;
	/// Default token refresh margin.
	pub const DEFAULT_TOKEN_MARGIN: Duration = Duration::from_secs(60);

	/// Creates a builder seeded with defaults for the given credentials.
	pub fn builder(credentials: Credentials) -> GatewayConfigBuilder {
		GatewayConfigBuilder::new(credentials)
	}

	/// Resolves `path` beneath the base URL, keeping any path prefix of the root.
	pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		Ok(self.base_url.join(path.trim_start_matches('/'))?)
	}
}

/// Builder for [`GatewayConfig`] values.
#[derive(Debug)]
pub struct GatewayConfigBuilder {
	/// App credentials.
	pub credentials: Credentials,
	/// Target environment.
	pub environment: Environment,
	/// Per-call timeout.
	pub timeout: Duration,
	/// Retry ceiling and backoff schedule.
	pub retry: RetryPolicy,
	/// Local per-minute ceiling.
	pub max_requests_per_minute: u32,
	/// Token refresh margin.
	pub token_margin: Duration,
	/// Minimum-amount rules.
	pub amount_policy: AmountPolicy,
}
impl GatewayConfigBuilder {
	/// Creates a builder with sandbox defaults.
	pub fn new(credentials: Credentials) -> Self {
		Self {
			credentials,
			environment: Environment::default(),
			timeout: GatewayConfig::DEFAULT_TIMEOUT,
			retry: RetryPolicy::default(),
			max_requests_per_minute: GatewayConfig::DEFAULT_REQUESTS_PER_MINUTE,
			token_margin: GatewayConfig::DEFAULT_TOKEN_MARGIN,
			amount_policy: AmountPolicy::default(),
		}
	}

	/// Selects the target environment.
	pub fn environment(mut self, environment: Environment) -> Self {
		self.environment = environment;

		self
	}

	/// Overrides the per-call timeout.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Overrides the retry ceiling.
	pub fn max_retries(mut self, max_retries: u32) -> Self {
		self.retry.max_retries = max_retries;

		self
	}

	/// Overrides the first backoff interval (doubled per attempt).
	pub fn retry_base_delay(mut self, delay: Duration) -> Self {
		self.retry.base_delay = delay;

		self
	}

	/// Overrides the local per-minute request ceiling.
	pub fn max_requests_per_minute(mut self, ceiling: u32) -> Self {
		self.max_requests_per_minute = ceiling;

		self
	}

	/// Overrides the token refresh margin.
	pub fn token_margin(mut self, margin: Duration) -> Self {
		self.token_margin = margin;

		self
	}

	/// Overrides the minimum-amount rules.
	pub fn amount_policy(mut self, policy: AmountPolicy) -> Self {
		self.amount_policy = policy;

		self
	}

	/// Consumes the builder and validates the resulting config.
	pub fn build(self) -> Result<GatewayConfig, ConfigError> {
		if self.timeout.is_zero() {
			return Err(ConfigError::ZeroTimeout);
		}
		if self.max_requests_per_minute == 0 {
			return Err(ConfigError::ZeroRequestCeiling);
		}

		let base_url = self.environment.base_url()?;

		Ok(GatewayConfig {
			credentials: self.credentials,
			environment: self.environment,
			base_url,
			timeout: self.timeout,
			retry: self.retry,
			max_requests_per_minute: self.max_requests_per_minute,
			token_margin: self.token_margin,
			amount_policy: self.amount_policy,
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn credentials() -> Credentials {
		Credentials::new("id", "secret").expect("Credentials fixture should be valid.")
	}

	#[test]
	fn defaults_target_sandbox() {
		let config = GatewayConfig::builder(credentials()).build().expect("Defaults should build.");

		assert_eq!(config.base_url.as_str(), "https://api-m.sandbox.paypal.com/");
		assert_eq!(config.timeout, Duration::from_secs(30));
		assert_eq!(config.retry.max_retries, 3);
		assert_eq!(config.max_requests_per_minute, 100);
		assert_eq!(
			config.endpoint("/v2/checkout/orders").expect("Endpoint should resolve.").as_str(),
			"https://api-m.sandbox.paypal.com/v2/checkout/orders"
		);
	}

	#[test]
	fn live_environment_switches_root() {
		let config = GatewayConfig::builder(credentials())
			.environment(Environment::Live)
			.build()
			.expect("Live config should build.");

		assert_eq!(config.base_url.host_str(), Some("api-m.paypal.com"));
	}

	#[test]
	fn custom_roots_keep_their_path_prefix() {
		for root in ["https://proxy.example/paypal/", "https://proxy.example/paypal"] {
			let config = GatewayConfig::builder(credentials())
				.environment(Environment::Custom(
					Url::parse(root).expect("Proxy root should parse."),
				))
				.build()
				.expect("Custom config should build.");

			assert_eq!(
				config.endpoint("/v2/checkout/orders").expect("Endpoint should resolve.").as_str(),
				"https://proxy.example/paypal/v2/checkout/orders"
			);
			assert_eq!(
				config.endpoint("/v1/oauth2/token").expect("Endpoint should resolve.").as_str(),
				"https://proxy.example/paypal/v1/oauth2/token"
			);
		}
	}

	#[test]
	fn invalid_limits_are_rejected() {
		assert!(matches!(
			GatewayConfig::builder(credentials()).max_requests_per_minute(0).build(),
			Err(ConfigError::ZeroRequestCeiling)
		));
		assert!(matches!(
			GatewayConfig::builder(credentials()).timeout(Duration::ZERO).build(),
			Err(ConfigError::ZeroTimeout)
		));
	}

	#[test]
	fn environment_serializes_as_snake_case() {
		let payload =
			serde_json::to_string(&Environment::Live).expect("Environment should serialize.");

		assert_eq!(payload, "\"live\"");
	}
}

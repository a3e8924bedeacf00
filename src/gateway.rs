//! The API gateway client: authenticated, throttled, retrying access to PayPal's REST API.

pub mod dispatch;

mod token;

pub use dispatch::*;
pub use oauth2::http::Method;

// self
use crate::{
	_prelude::*,
	auth::{TokenCache, TokenState},
	config::GatewayConfig,
	http::{GatewayHttpClient, ReqwestHttpClient},
	money::AmountPolicy,
	oauth::TokenExchange,
	obs::GatewayMetrics,
	rate_limit::RateWindow,
};

/// Turns logical PayPal operations into authenticated HTTP calls.
///
/// The gateway owns the transport, the configuration, the bearer-token cache, and the
/// per-minute request window. Cloning is cheap and every clone shares the same token and
/// budget, so one instance can serve a whole process.
pub struct Gateway<C = ReqwestHttpClient>
where
	C: ?Sized + GatewayHttpClient,
{
	http_client: Arc<C>,
	config: Arc<GatewayConfig>,
	exchange: Arc<TokenExchange>,
	tokens: Arc<TokenCache>,
	rate_window: Arc<RateWindow>,
	metrics: Arc<GatewayMetrics>,
}
impl<C> Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Creates a gateway that reuses the caller-provided transport.
	pub fn with_http_client(
		config: GatewayConfig,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self> {
		let exchange = TokenExchange::from_config(&config)?;
		let rate_window = RateWindow::new(config.max_requests_per_minute);

		Ok(Self {
			http_client: http_client.into(),
			config: Arc::new(config),
			exchange: Arc::new(exchange),
			tokens: Default::default(),
			rate_window: Arc::new(rate_window),
			metrics: Default::default(),
		})
	}

	/// Immutable configuration the gateway was built with.
	pub fn config(&self) -> &GatewayConfig {
		&self.config
	}

	/// Minimum-amount rules from the configuration.
	pub fn amount_policy(&self) -> &AmountPolicy {
		&self.config.amount_policy
	}

	/// Per-gateway counters (token exchanges, attempts, retries, throttled calls).
	pub fn metrics(&self) -> &GatewayMetrics {
		&self.metrics
	}

	/// Local per-minute request window.
	pub fn rate_window(&self) -> &RateWindow {
		&self.rate_window
	}

	/// Current state of the cached bearer token.
	pub fn token_state(&self) -> TokenState {
		self.tokens.state_at(Instant::now(), self.config.token_margin)
	}
}
impl Gateway<ReqwestHttpClient> {
	/// Creates a gateway with its own reqwest transport.
	///
	/// The transport honors the configured timeout and never follows redirects.
	pub fn new(config: GatewayConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::for_config(&config)?;

		Self::with_http_client(config, http_client)
	}
}
impl<C> Clone for Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: Arc::clone(&self.http_client),
			config: Arc::clone(&self.config),
			exchange: Arc::clone(&self.exchange),
			tokens: Arc::clone(&self.tokens),
			rate_window: Arc::clone(&self.rate_window),
			metrics: Arc::clone(&self.metrics),
		}
	}
}
impl<C> Debug for Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Gateway")
			.field("environment", &self.config.environment)
			.field("client_id", &self.config.credentials.client_id())
			.field("token_state", &self.token_state())
			.finish()
	}
}

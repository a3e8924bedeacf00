//! Client-credentials exchange against PayPal's token endpoint.

pub use oauth2;

// crates.io
use oauth2::{
	ClientId, ClientSecret, EndpointNotSet, EndpointSet, HttpClientError, RequestTokenError,
	TokenResponse, TokenUrl,
	basic::{BasicClient, BasicRequestTokenError, BasicTokenResponse},
};
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	config::GatewayConfig,
	error::{AuthError, ConfigError},
	http::{GatewayHttpClient, ResponseMetadata, ResponseMetadataSlot},
};

/// Path of the OAuth 2.0 token endpoint relative to the REST root.
pub const TOKEN_PATH: &str = "/v1/oauth2/token";

type ConfiguredBasicClient =
	BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Performs `grant_type=client_credentials` exchanges with HTTP Basic client authentication.
#[derive(Clone, Debug)]
pub struct TokenExchange {
	oauth_client: ConfiguredBasicClient,
}
impl TokenExchange {
	/// Builds the exchange for the config's credentials and environment.
	pub fn from_config(config: &GatewayConfig) -> Result<Self, ConfigError> {
		let token_url = TokenUrl::new(config.endpoint(TOKEN_PATH)?.to_string())?;
		let credentials = &config.credentials;
		let oauth_client = BasicClient::new(ClientId::new(credentials.client_id().to_owned()))
			.set_client_secret(ClientSecret::new(credentials.client_secret().expose().to_owned()))
			.set_token_uri(token_url);

		Ok(Self { oauth_client })
	}

	/// Exchanges the credential pair for a fresh [`AccessToken`].
	///
	/// The call is bounded by `timeout`; expiry is computed from `expires_in` on the
	/// monotonic clock.
	pub async fn exchange<C>(
		&self,
		http_client: &C,
		timeout: Duration,
	) -> Result<AccessToken, AuthError>
	where
		C: ?Sized + GatewayHttpClient,
	{
		let meta = ResponseMetadataSlot::default();
		let handle = http_client.with_metadata(meta.clone());
		let request = self.oauth_client.exchange_client_credentials();
		let response = match tokio::time::timeout(timeout, request.request_async(&handle)).await {
			Ok(result) => result.map_err(|err| map_request_error(meta.take(), err))?,
			Err(_) => return Err(AuthError::TimedOut { timeout }),
		};

		map_token_response(response, Instant::now())
	}
}

fn map_token_response(
	response: BasicTokenResponse,
	issued_at: Instant,
) -> Result<AccessToken, AuthError> {
	let expires_in = response.expires_in().ok_or_else(|| AuthError::InvalidResponse {
		message: "missing expires_in".into(),
		status: Some(200),
	})?;

	if expires_in.is_zero() {
		return Err(AuthError::InvalidResponse {
			message: "expires_in must be positive".into(),
			status: Some(200),
		});
	}

	let secret = response.access_token().secret().to_owned();
	let mut token = AccessToken::new(secret, issued_at, expires_in)
		.with_token_type(response.token_type().as_ref());

	if let Some(scopes) = response.scopes() {
		let joined = scopes.iter().map(|scope| scope.as_str()).collect::<Vec<_>>().join(" ");

		token = token.with_scope(joined);
	}

	Ok(token)
}

fn map_request_error<E>(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<E>>,
) -> AuthError
where
	E: 'static + Send + Sync + StdError,
{
	let status = meta.and_then(|value| value.status);

	match err {
		RequestTokenError::ServerResponse(response) => {
			let reason = match response.error_description() {
				Some(description) => format!("{} ({description})", response.error().as_ref()),
				None => response.error().as_ref().to_owned(),
			};

			AuthError::Rejected { reason, status }
		},
		RequestTokenError::Request(error) => AuthError::network(error),
		RequestTokenError::Parse(source, _body) => AuthError::Parse { source, status },
		RequestTokenError::Other(message) => AuthError::InvalidResponse { message, status },
	}
}

//! Client-credentials pair supplied once at construction.

// self
use crate::{_prelude::*, auth::Secret, error::ConfigError};

/// PayPal REST app credentials (client id + secret).
///
/// Both components are validated once and never mutated afterwards. The secret is redacted
/// from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
	client_id: String,
	client_secret: Secret,
}
impl Credentials {
	/// Creates a credential pair, rejecting empty components.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> Result<Self, ConfigError> {
		let client_id = client_id.into();
		let client_secret = Secret::new(client_secret);

		if client_id.trim().is_empty() {
			return Err(ConfigError::EmptyCredential { field: "client_id" });
		}
		if client_secret.is_blank() {
			return Err(ConfigError::EmptyCredential { field: "client_secret" });
		}

		Ok(Self { client_id, client_secret })
	}

	/// OAuth 2.0 client identifier.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// OAuth 2.0 client secret.
	pub fn client_secret(&self) -> &Secret {
		&self.client_secret
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("client_id", &self.client_id)
			.field("client_secret", &self.client_secret)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn empty_components_are_rejected() {
		assert!(matches!(
			Credentials::new("", "secret"),
			Err(ConfigError::EmptyCredential { field: "client_id" })
		));
		assert!(matches!(
			Credentials::new("id", " "),
			Err(ConfigError::EmptyCredential { field: "client_secret" })
		));
	}

	#[test]
	fn debug_output_redacts_secret() {
		let credentials = Credentials::new("app-id", "hunter2").expect("Credentials should build.");
		let rendered = format!("{credentials:?}");

		assert!(rendered.contains("app-id"));
		assert!(!rendered.contains("hunter2"));
	}
}

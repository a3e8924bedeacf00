//! Thin per-resource helpers layered on [`Gateway::request`](crate::gateway::Gateway::request).
//!
//! Each resource module pairs typed, `Serialize` request builders (required fields in the
//! constructor, optional fields via `with_*` setters) with gateway methods that send them.
//! Responses are returned as raw [`Value`]s so callers keep every field PayPal adds.

pub mod billing;
pub mod invoicing;
pub mod orders;
pub mod payments;
pub mod webhooks;

pub use billing::*;
pub use invoicing::*;
pub use orders::*;
pub use payments::*;
pub use webhooks::*;

// crates.io
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
// self
use crate::{_prelude::*, error::ConfigError};

/// Everything outside RFC 3986 `unreserved` is escaped inside an id segment.
const ID_SEGMENT: &AsciiSet =
	&NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Encodes a request builder as a JSON body.
pub(crate) fn to_body<T>(request: &T) -> Result<Value>
where
	T: ?Sized + Serialize,
{
	Ok(serde_json::to_value(request).map_err(ConfigError::EncodeBody)?)
}

/// Joins `prefix` and a caller-supplied identifier, percent-encoding reserved characters.
pub(crate) fn resource_path(prefix: &str, id: &str) -> String {
	format!("{prefix}/{}", utf8_percent_encode(id, ID_SEGMENT))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn resource_paths_escape_identifiers() {
		assert_eq!(
			resource_path("/v2/checkout/orders", "5O190127TN364715T"),
			"/v2/checkout/orders/5O190127TN364715T"
		);
		assert_eq!(
			resource_path("/v1/billing/plans", "P-1/../x?y"),
			"/v1/billing/plans/P-1%2F..%2Fx%3Fy"
		);
		assert_eq!(
			resource_path("/v2/invoicing/invoices", "INV 1+2"),
			"/v2/invoicing/invoices/INV%201%2B2"
		);
	}

	#[test]
	fn bodies_encode_builders() {
		let body = to_body(&json!({ "reason": "Customer request" })).expect("Body should encode.");

		assert_eq!(body["reason"], "Customer request");
	}
}

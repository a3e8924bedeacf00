//! Bearer token model, redacted secret wrapper, and the shared token cache.

pub mod cache;
pub mod record;
pub mod secret;

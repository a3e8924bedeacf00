//! Credentials, redacted secrets, and the bearer-token cache.

pub mod credentials;
pub mod token;

pub use credentials::*;
pub use token::{cache::*, record::*, secret::*};

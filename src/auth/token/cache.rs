//! Process-local cache holding the gateway's single bearer token.

// self
use crate::{_prelude::*, auth::AccessToken};

/// Observable state of the cached token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenState {
	/// Nothing cached (never exchanged, or invalidated).
	Absent,
	/// Cached and usable.
	Valid,
	/// Cached but past `expires_at - margin`.
	Expired,
}

/// Thread-safe holder for the current [`AccessToken`].
///
/// Reads and writes are guarded by a short-lived lock that is never held across an
/// `.await`. The async refresh guard lets concurrent callers piggy-back on a single
/// in-flight exchange; a duplicate exchange under a race is harmless.
#[derive(Debug, Default)]
pub struct TokenCache {
	slot: RwLock<Option<AccessToken>>,
	refresh_guard: AsyncMutex<()>,
}
impl TokenCache {
	/// Returns a clone of the cached token when it is still valid at `now`.
	pub fn current_at(&self, now: Instant, margin: Duration) -> Option<AccessToken> {
		self.slot.read().as_ref().filter(|token| token.is_valid_at(now, margin)).cloned()
	}

	/// Reports the cache state at `now`.
	pub fn state_at(&self, now: Instant, margin: Duration) -> TokenState {
		match self.slot.read().as_ref() {
			None => TokenState::Absent,
			Some(token) if token.is_valid_at(now, margin) => TokenState::Valid,
			Some(_) => TokenState::Expired,
		}
	}

	/// Replaces the cached token.
	pub fn store(&self, token: AccessToken) {
		*self.slot.write() = Some(token);
	}

	/// Drops the cached token; returns `true` when something was cleared.
	pub fn invalidate(&self) -> bool {
		self.slot.write().take().is_some()
	}

	pub(crate) fn refresh_guard(&self) -> &AsyncMutex<()> {
		&self.refresh_guard
	}
}

//! # Token Cache
//!
//! In-memory OAuth token cache keyed by carrier.
//!
//! A cache is an explicit object handed to the client that owns it; there
//! is no process-wide token state. Each entry is replaced whole, so two
//! concurrent fetches on an empty cache both succeed and the later write
//! wins.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;

use crate::carrier::Carrier;
use crate::errors::ShippingError;
use crate::secret::SecretString;

/// Tokens are treated as expired this many seconds before the carrier says so.
pub const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

/// A cached bearer token.
#[derive(Clone)]
pub struct CachedToken {
    /// Bearer token.
    pub access_token: SecretString,
    /// Instant after which the token must not be used (margin applied).
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Usable at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

impl fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedToken")
            .field("access_token", &self.access_token)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Carrier-keyed token store.
#[derive(Debug, Default)]
pub struct TokenCache {
    entries: RwLock<HashMap<Carrier, CachedToken>>,
}

impl TokenCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for `carrier` if one is cached and still valid at `now`.
    pub fn get(&self, carrier: Carrier, now: DateTime<Utc>) -> Option<SecretString> {
        self.entries
            .read()
            .get(&carrier)
            .filter(|token| token.is_valid_at(now))
            .map(|token| token.access_token.clone())
    }

    /// Store a token that the carrier says lives `expires_in_secs` from `now`.
    ///
    /// Returns the effective expiry after the safety margin. A lifetime
    /// shorter than the margin yields an entry that is already expired; one
    /// that does not fit in a timestamp is an invalid auth response and
    /// leaves the cache untouched.
    pub fn store(
        &self,
        carrier: Carrier,
        access_token: SecretString,
        expires_in_secs: i64,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, ShippingError> {
        let lifetime = expires_in_secs.saturating_sub(TOKEN_EXPIRY_MARGIN_SECS).max(0);
        let expires_at = Duration::try_seconds(lifetime)
            .and_then(|d| now.checked_add_signed(d))
            .ok_or(ShippingError::InvalidAuthResponse { carrier })?;
        self.entries.write().insert(
            carrier,
            CachedToken {
                access_token,
                expires_at,
            },
        );
        Ok(expires_at)
    }

    /// Number of entries, valid or not.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

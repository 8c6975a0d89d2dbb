//! # Secret Strings
//!
//! Wrapper for carrier credentials that zeroizes memory on drop and never
//! prints its contents.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A credential value (client secret, password, bearer token).
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretString {
    inner: String,
}

impl SecretString {
    /// Wrap a secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            inner: value.into(),
        }
    }

    /// Expose the secret for building a request. Do not hold on to it.
    pub fn expose(&self) -> &str {
        &self.inner
    }

    /// True when the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString(***)")
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

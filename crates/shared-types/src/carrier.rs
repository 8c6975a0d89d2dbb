//! # Carrier Identifiers
//!
//! The closed set of carriers the gateway can talk to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ShippingError;

/// Supported shipping carriers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Carrier {
    /// DHL eCommerce (REST/JSON, OAuth client credentials).
    Dhl,
    /// Canada Post (XML, HTTP Basic).
    CanadaPost,
}

impl Carrier {
    /// All carriers with a client implementation.
    pub const ALL: [Carrier; 2] = [Carrier::Dhl, Carrier::CanadaPost];

    /// Stable machine name (`dhl`, `canada_post`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Carrier::Dhl => "dhl",
            Carrier::CanadaPost => "canada_post",
        }
    }

    /// Human-facing name used in error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Carrier::Dhl => "DHL",
            Carrier::CanadaPost => "Canada Post",
        }
    }
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Carrier {
    type Err = ShippingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect();

        match key.as_str() {
            "dhl" => Ok(Carrier::Dhl),
            "canadapost" => Ok(Carrier::CanadaPost),
            _ => Err(ShippingError::UnsupportedCarrier(s.to_string())),
        }
    }
}

//! # DHL Configuration
//!
//! Credentials and account settings, read once from the environment and
//! held for the lifetime of a client.

use serde::{Deserialize, Serialize};
use shared_types::{Carrier, SecretString, ShippingError};

/// Production API host.
pub const DEFAULT_DHL_API_URL: &str = "https://api.dhlecs.com";

/// Unit DHL expects weights (and matching dimensions) in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    /// Kilograms / centimetres.
    #[default]
    Kg,
    /// Pounds / inches.
    Lb,
}

impl WeightUnit {
    const KG_TO_LB: f64 = 2.204_622_621_8;
    const CM_TO_IN: f64 = 1.0 / 2.54;

    /// Wire code for weight.
    pub fn weight_code(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "KG",
            WeightUnit::Lb => "LB",
        }
    }

    /// Wire code for dimensions.
    pub fn dimension_code(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "CM",
            WeightUnit::Lb => "IN",
        }
    }

    /// Convert kilograms, rounded to 3 decimals.
    pub fn weight_from_kg(&self, kg: f64) -> f64 {
        let value = match self {
            WeightUnit::Kg => kg,
            WeightUnit::Lb => kg * Self::KG_TO_LB,
        };
        (value * 1000.0).round() / 1000.0
    }

    /// Convert centimetres, rounded to 1 decimal.
    pub fn length_from_cm(&self, cm: f64) -> f64 {
        let value = match self {
            WeightUnit::Kg => cm,
            WeightUnit::Lb => cm * Self::CM_TO_IN,
        };
        (value * 10.0).round() / 10.0
    }
}

/// DHL credentials and account settings.
#[derive(Clone, Debug)]
pub struct DhlConfig {
    /// OAuth client id.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: SecretString,
    /// Pickup account number.
    pub pickup_account: String,
    /// Distribution center code, when the account requires one.
    pub distribution_center: Option<String>,
    /// API base URL without trailing slash.
    pub base_url: String,
    /// Weight/dimension unit on the wire.
    pub weight_unit: WeightUnit,
}

impl DhlConfig {
    /// Read configuration from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `DHL_CLIENT_ID`, `DHL_CLIENT_SECRET`, `DHL_PICKUP_ACCOUNT` (required)
    /// - `DHL_DISTRIBUTION_CENTER` (optional)
    /// - `DHL_API_URL` (default: https://api.dhlecs.com)
    /// - `DHL_WEIGHT_UNIT`: `kg` or `lb` (default: kg)
    pub fn from_env() -> Result<Self, ShippingError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`DhlConfig::from_env`] over an arbitrary lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ShippingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &str| {
            optional(key).ok_or_else(|| ShippingError::MissingCredential {
                carrier: Carrier::Dhl,
                variable: key.to_string(),
            })
        };

        let weight_unit = match optional("DHL_WEIGHT_UNIT").map(|v| v.to_lowercase()) {
            None => WeightUnit::Kg,
            Some(unit) if unit == "kg" => WeightUnit::Kg,
            Some(unit) if unit == "lb" || unit == "lbs" => WeightUnit::Lb,
            Some(other) => {
                return Err(ShippingError::InvalidConfig(format!(
                    "DHL_WEIGHT_UNIT must be kg or lb, got {other}"
                )))
            }
        };

        Ok(Self {
            client_id: required("DHL_CLIENT_ID")?,
            client_secret: SecretString::new(required("DHL_CLIENT_SECRET")?),
            pickup_account: required("DHL_PICKUP_ACCOUNT")?,
            distribution_center: optional("DHL_DISTRIBUTION_CENTER"),
            base_url: optional("DHL_API_URL")
                .unwrap_or_else(|| DEFAULT_DHL_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            weight_unit,
        })
    }

    /// Configuration for tests pointing at a local base URL.
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            client_id: "test-client".to_string(),
            client_secret: SecretString::new("test-secret"),
            pickup_account: "5351244".to_string(),
            distribution_center: Some("USLAX1".to_string()),
            base_url: base_url.trim_end_matches('/').to_string(),
            weight_unit: WeightUnit::Kg,
        }
    }

    /// Token endpoint.
    pub fn token_url(&self) -> String {
        format!("{}/auth/v4/token", self.base_url)
    }

    /// Label endpoint (outbound or return).
    pub fn label_url(&self, is_return: bool) -> String {
        if is_return {
            format!("{}/returns/v4/label?format=PNG", self.base_url)
        } else {
            format!("{}/shipping/v1/labels/merchant?format=PNG", self.base_url)
        }
    }

    /// Tracking endpoint for one tracking number.
    pub fn tracking_url(&self, tracking_number: &str) -> Result<String, ShippingError> {
        let query = serde_urlencoded::to_string(&[("trackingId", tracking_number)])
            .map_err(|e| ShippingError::Serialization(e.to_string()))?;
        Ok(format!("{}/tracking/v4/package?{query}", self.base_url))
    }
}

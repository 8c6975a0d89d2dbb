//! # Canada Post Configuration

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use shared_types::{Carrier, SecretString, ShippingError};
use std::str::FromStr;

/// Media type for shipment-v8 documents.
pub const SHIPMENT_MEDIA_TYPE: &str = "application/vnd.cpc.shipment-v8+xml";

/// Media type for track-v2 documents.
pub const TRACKING_MEDIA_TYPE: &str = "application/vnd.cpc.track-v2+xml";

/// Canada Post API environment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanadaPostEnvironment {
    /// Customer test gateway.
    #[default]
    Staging,
    /// Live gateway.
    Production,
}

impl CanadaPostEnvironment {
    /// Gateway host for this environment.
    pub fn base_url(&self) -> &'static str {
        match self {
            CanadaPostEnvironment::Staging => "https://ct.soa-gw.canadapost.ca",
            CanadaPostEnvironment::Production => "https://soa-gw.canadapost.ca",
        }
    }
}

impl FromStr for CanadaPostEnvironment {
    type Err = ShippingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "staging" | "test" | "development" => Ok(CanadaPostEnvironment::Staging),
            "production" | "prod" | "live" => Ok(CanadaPostEnvironment::Production),
            other => Err(ShippingError::InvalidConfig(format!(
                "CANADAPOST_ENVIRONMENT must be staging or production, got {other}"
            ))),
        }
    }
}

/// Canada Post credentials and account settings.
#[derive(Clone, Debug)]
pub struct CanadaPostConfig {
    /// API key user name.
    pub username: String,
    /// API key password.
    pub password: SecretString,
    /// Customer number; also used as the mailed-by number.
    pub customer_number: String,
    /// Gateway environment.
    pub environment: CanadaPostEnvironment,
    /// Commercial contract, when the account has one.
    pub contract_id: Option<String>,
    /// Requested shipping point override.
    pub origin_postal_code: Option<String>,
    /// Base URL without trailing slash.
    pub base_url: String,
}

impl CanadaPostConfig {
    /// Read configuration from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `CANADAPOST_USERNAME`, `CANADAPOST_PASSWORD`,
    ///   `CANADAPOST_CUSTOMER_NUMBER` (required)
    /// - `CANADAPOST_ENVIRONMENT`: `staging` or `production` (default: staging)
    /// - `CANADAPOST_CONTRACT_ID`, `CANADAPOST_ORIGIN_POSTAL_CODE` (optional)
    /// - `CANADAPOST_API_URL` (optional, overrides the environment host)
    pub fn from_env() -> Result<Self, ShippingError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`CanadaPostConfig::from_env`] over an arbitrary lookup.
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
                carrier: Carrier::CanadaPost,
                variable: key.to_string(),
            })
        };

        let username = required("CANADAPOST_USERNAME")?;
        let password = SecretString::new(required("CANADAPOST_PASSWORD")?);
        let customer_number = required("CANADAPOST_CUSTOMER_NUMBER")?;
        let environment = optional("CANADAPOST_ENVIRONMENT")
            .map(|v| v.parse::<CanadaPostEnvironment>())
            .transpose()?
            .unwrap_or_default();
        let base_url = optional("CANADAPOST_API_URL")
            .unwrap_or_else(|| environment.base_url().to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            username,
            password,
            customer_number,
            environment,
            contract_id: optional("CANADAPOST_CONTRACT_ID"),
            origin_postal_code: optional("CANADAPOST_ORIGIN_POSTAL_CODE"),
            base_url,
        })
    }

    /// Configuration for tests pointing at a local base URL.
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            username: "cp-user".to_string(),
            password: SecretString::new("cp-pass"),
            customer_number: "0001234567".to_string(),
            environment: CanadaPostEnvironment::Staging,
            contract_id: Some("0040000000".to_string()),
            origin_postal_code: None,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `Authorization` header value.
    pub fn basic_auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.username, self.password.expose());
        format!("Basic {}", general_purpose::STANDARD.encode(credentials))
    }

    /// Contract shipment endpoint.
    pub fn shipment_url(&self) -> String {
        format!(
            "{base}/rs/{customer}/{customer}/shipment",
            base = self.base_url,
            customer = self.customer_number
        )
    }

    /// Tracking detail endpoint. PINs are alphanumeric; anything else is
    /// rejected rather than escaped into the path.
    pub fn tracking_url(&self, pin: &str) -> Result<String, ShippingError> {
        if !pin.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ShippingError::InvalidRequest(format!(
                "Canada Post PIN must be alphanumeric: {pin}"
            )));
        }
        Ok(format!("{}/vis/track/pin/{pin}/detail", self.base_url))
    }
}

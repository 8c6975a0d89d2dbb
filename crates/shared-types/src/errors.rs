//! # Error Types
//!
//! One coarse taxonomy for every carrier client:
//!
//! | Class | Variants | Raised |
//! |-------|----------|--------|
//! | Configuration | `MissingCredential`, `InvalidConfig`, `UnsupportedCarrier` | client construction |
//! | Transport | `Transport`, `CarrierRequestFailed` | network / non-2xx |
//! | Shape | `Invalid*Response`, `InvalidRequest`, `Serialization` | request or parse |
//!
//! Nothing here is retried or classified as transient. Carrier error bodies
//! are logged by the client and never carried inside an error value.

use std::fmt;
use thiserror::Error;

use crate::carrier::Carrier;

/// The carrier call that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CarrierOperation {
    /// OAuth token fetch.
    Authentication,
    /// Label purchase.
    ShipmentCreation,
    /// Tracking lookup.
    Tracking,
}

impl CarrierOperation {
    /// Lower-case label used in messages and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            CarrierOperation::Authentication => "authentication",
            CarrierOperation::ShipmentCreation => "shipment creation",
            CarrierOperation::Tracking => "tracking",
        }
    }
}

impl fmt::Display for CarrierOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by carrier clients and their configuration.
#[derive(Debug, Clone, Error)]
pub enum ShippingError {
    /// A required environment variable is absent or empty.
    #[error("Missing {carrier} credential: {variable} is not set")]
    MissingCredential {
        /// Carrier being configured
        carrier: Carrier,
        /// Name of the missing variable
        variable: String,
    },

    /// A configuration value is present but unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No client exists for this carrier name.
    #[error("Unsupported carrier: {0}")]
    UnsupportedCarrier(String),

    /// The request failed shape validation before any network call.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The HTTP exchange itself failed (DNS, connect, timeout, body read).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The carrier answered with a non-2xx status.
    #[error("{carrier} {operation} failed")]
    CarrierRequestFailed {
        /// Carrier that rejected the call
        carrier: Carrier,
        /// Call that was rejected
        operation: CarrierOperation,
        /// HTTP status code
        status: u16,
    },

    /// The token endpoint answered 2xx without a usable token.
    #[error("Invalid {carrier} authentication response")]
    InvalidAuthResponse {
        /// Carrier
        carrier: Carrier,
    },

    /// The label endpoint answered 2xx without tracking number or label.
    #[error("Invalid {carrier} shipment response")]
    InvalidShipmentResponse {
        /// Carrier
        carrier: Carrier,
    },

    /// The tracking endpoint answered with an unknown or empty shape.
    #[error("Invalid tracking response from {carrier}")]
    InvalidTrackingResponse {
        /// Carrier
        carrier: Carrier,
    },

    /// A request payload could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ShippingError {
    /// Convenience constructor for a non-2xx carrier response.
    pub fn request_failed(carrier: Carrier, operation: CarrierOperation, status: u16) -> Self {
        ShippingError::CarrierRequestFailed {
            carrier,
            operation,
            status,
        }
    }

    /// True for errors raised while building a client.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ShippingError::MissingCredential { .. }
                | ShippingError::InvalidConfig(_)
                | ShippingError::UnsupportedCarrier(_)
        )
    }
}

//! # Domain Entities
//!
//! Addresses, packages, requests and the records carrier clients return.
//!
//! Units are metric throughout (kilograms, centimetres). Carrier adapters
//! convert at the wire boundary.

use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::carrier::Carrier;
use crate::errors::ShippingError;
use crate::status::ShipmentStatus;

// =============================================================================
// Addresses and packages
// =============================================================================

/// Postal address in the storefront's own layout.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Contact name.
    pub name: String,
    /// Company, if any.
    #[serde(default)]
    pub company: Option<String>,
    /// Street line 1.
    pub line1: String,
    /// Street line 2.
    #[serde(default)]
    pub line2: Option<String>,
    /// City.
    pub city: String,
    /// State or province code.
    pub state_province: String,
    /// Postal or ZIP code.
    pub postal_code: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country_code: String,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
}

impl Address {
    /// Postal code upper-cased with internal spaces removed (`k1a 0b1` -> `K1A0B1`).
    pub fn compact_postal_code(&self) -> String {
        self.postal_code
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase()
    }

    /// Upper-cased country code.
    pub fn country(&self) -> String {
        self.country_code.trim().to_uppercase()
    }

    fn validate_shape(&self, role: &str) -> Result<(), ShippingError> {
        if self.postal_code.trim().is_empty() {
            return Err(ShippingError::InvalidRequest(format!(
                "{role} postal code is empty"
            )));
        }
        if self.country_code.trim().len() != 2 {
            return Err(ShippingError::InvalidRequest(format!(
                "{role} country code must be two letters"
            )));
        }
        Ok(())
    }
}

/// Parcel dimensions in centimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Length (cm).
    pub length_cm: f64,
    /// Width (cm).
    pub width_cm: f64,
    /// Height (cm).
    pub height_cm: f64,
}

/// A single parcel. Owned by its request, never persisted on its own.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Weight (kg).
    pub weight_kg: f64,
    /// Dimensions, when known.
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
    /// Declared customs/insurance value.
    #[serde(default)]
    pub declared_value: Decimal,
    /// Currency of `declared_value`.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Contents description.
    #[serde(default)]
    pub description: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Package {
    fn validate_shape(&self) -> Result<(), ShippingError> {
        if !self.weight_kg.is_finite() || self.weight_kg <= 0.0 {
            return Err(ShippingError::InvalidRequest(
                "package weight must be positive".to_string(),
            ));
        }
        if let Some(dims) = self.dimensions {
            let all_positive = [dims.length_cm, dims.width_cm, dims.height_cm]
                .iter()
                .all(|d| d.is_finite() && *d > 0.0);
            if !all_positive {
                return Err(ShippingError::InvalidRequest(
                    "package dimensions must be positive".to_string(),
                ));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Requests
// =============================================================================

/// Request to buy a label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShipmentRequest {
    /// Ship-from address.
    pub origin: Address,
    /// Ship-to address.
    pub destination: Address,
    /// Parcel.
    pub package: Package,
    /// Carrier service code (e.g. `DOM.EP`, `GND`).
    pub service_code: String,
    /// Buy a return label instead of an outbound one.
    #[serde(default)]
    pub is_return: bool,
    /// Caller reference (order number) passed through to the carrier.
    #[serde(default)]
    pub reference: Option<String>,
}

impl ShipmentRequest {
    /// Shape checks only; business rules belong to the caller.
    pub fn validate_shape(&self) -> Result<(), ShippingError> {
        self.origin.validate_shape("origin")?;
        self.destination.validate_shape("destination")?;
        self.package.validate_shape()?;
        if self.service_code.trim().is_empty() {
            return Err(ShippingError::InvalidRequest(
                "service code is empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Request for live rates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RateRequest {
    /// Ship-from address.
    pub origin: Address,
    /// Ship-to address.
    pub destination: Address,
    /// Parcel.
    pub package: Package,
}

impl RateRequest {
    /// Same country on both ends.
    pub fn is_domestic(&self) -> bool {
        self.origin.country() == self.destination.country()
    }
}

/// Request for the tracking history of one parcel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingRequest {
    /// Carrier tracking number / PIN.
    pub tracking_number: String,
}

impl TrackingRequest {
    /// Build a request for a tracking number.
    pub fn new(tracking_number: impl Into<String>) -> Self {
        Self {
            tracking_number: tracking_number.into(),
        }
    }

    /// Trimmed tracking number, rejecting empty input.
    pub fn validated_number(&self) -> Result<&str, ShippingError> {
        let number = self.tracking_number.trim();
        if number.is_empty() {
            return Err(ShippingError::InvalidRequest(
                "tracking number is empty".to_string(),
            ));
        }
        Ok(number)
    }
}

// =============================================================================
// Results
// =============================================================================

/// Carrier label payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Label {
    /// Label document delivered inline as base64.
    Inline {
        /// Document format (`PNG`, `PDF`, `ZPL`).
        format: String,
        /// Base64 content.
        content: String,
    },
    /// Label document to be fetched from the carrier.
    Url {
        /// Artifact URL.
        href: String,
        /// Media type advertised by the carrier.
        #[serde(default)]
        media_type: Option<String>,
    },
}

impl Label {
    /// Decode an inline label. URL labels have no bytes to decode.
    pub fn decode(&self) -> Result<Option<Vec<u8>>, ShippingError> {
        match self {
            Label::Inline { content, .. } => general_purpose::STANDARD
                .decode(content.trim())
                .map(Some)
                .map_err(|e| ShippingError::Serialization(format!("label content: {e}"))),
            Label::Url { .. } => Ok(None),
        }
    }
}

/// Raw carrier response body kept for audit.
///
/// Opaque on purpose: it can be stored and shown, not parsed again.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawResponse(String);

impl RawResponse {
    /// Wrap a body.
    pub fn new(body: impl Into<String>) -> Self {
        Self(body.into())
    }

    /// Stored text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Body length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when nothing was stored.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawResponse({} bytes)", self.0.len())
    }
}

/// A purchased label.
///
/// Everything except `status` and `updated_at` is fixed at creation; those
/// two move only through [`Shipment::apply_tracking`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    /// Internal identifier.
    pub id: Uuid,
    /// Carrier.
    pub carrier: Carrier,
    /// Carrier service code.
    pub service_code: String,
    /// Carrier service name, when reported.
    pub service_name: Option<String>,
    /// Tracking number / PIN.
    pub tracking_number: String,
    /// Label document.
    pub label: Label,
    /// Amount charged for the label.
    pub rate: Decimal,
    /// Currency of `rate`.
    pub currency: String,
    /// Ship-from address.
    pub origin: Address,
    /// Ship-to address.
    pub destination: Address,
    /// Normalized status.
    pub status: ShipmentStatus,
    /// Carrier-side identifier, opaque to us.
    pub carrier_shipment_id: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last status refresh.
    pub updated_at: DateTime<Utc>,
    /// Raw provider response.
    pub raw_response: RawResponse,
}

impl Shipment {
    /// Copy a fresh tracking status onto this shipment.
    ///
    /// The carrier and tracking number must match. Status changes are not
    /// validated against any state machine.
    pub fn apply_tracking(
        &mut self,
        info: &TrackingInfo,
        at: DateTime<Utc>,
    ) -> Result<bool, ShippingError> {
        if info.carrier != self.carrier || info.tracking_number != self.tracking_number {
            return Err(ShippingError::InvalidRequest(format!(
                "tracking info for {} {} does not belong to shipment {}",
                info.carrier, info.tracking_number, self.id
            )));
        }
        let changed = self.status != info.status;
        self.status = info.status;
        self.updated_at = at;
        Ok(changed)
    }
}

/// Where a rate came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// Quoted by the carrier.
    Live,
    /// Local fallback table.
    StaticTable,
}

/// One priced service option.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShippingRate {
    /// Carrier.
    pub carrier: Carrier,
    /// Carrier service code.
    pub service_code: String,
    /// Service name.
    pub service_name: String,
    /// Price.
    pub amount: Decimal,
    /// Currency of `amount`.
    pub currency: String,
    /// Estimated transit time.
    pub estimated_days: Option<u32>,
    /// Origin of the quote.
    pub source: RateSource,
}

/// One carrier scan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingEvent {
    /// Event time in UTC, when the carrier's timestamp could be read.
    pub timestamp: Option<DateTime<Utc>>,
    /// Carrier description.
    pub description: String,
    /// Location text.
    pub location: Option<String>,
}

/// Tracking snapshot. Rebuilt on every poll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingInfo {
    /// Carrier.
    pub carrier: Carrier,
    /// Tracking number / PIN.
    pub tracking_number: String,
    /// Normalized status.
    pub status: ShipmentStatus,
    /// Events, newest first.
    pub events: Vec<TrackingEvent>,
    /// Carrier's delivery estimate.
    pub estimated_delivery: Option<NaiveDate>,
    /// Actual delivery date.
    pub delivered_on: Option<NaiveDate>,
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn shipment() -> Shipment {
        let now = Utc::now();
        Shipment {
            id: Uuid::new_v4(),
            carrier: Carrier::Dhl,
            service_code: "GND".to_string(),
            service_name: None,
            tracking_number: "1Z999".to_string(),
            label: Label::Inline {
                format: "PNG".to_string(),
                content: "aGVsbG8=".to_string(),
            },
            rate: Decimal::new(1250, 2),
            currency: "USD".to_string(),
            origin: address("US", "10001"),
            destination: address("US", "94105"),
            status: ShipmentStatus::LabelCreated,
            carrier_shipment_id: None,
            created_at: now,
            updated_at: now,
            raw_response: RawResponse::new("{}"),
        }
    }

    fn tracking(carrier: Carrier, number: &str, status: ShipmentStatus) -> TrackingInfo {
        TrackingInfo {
            carrier,
            tracking_number: number.to_string(),
            status,
            events: vec![],
            estimated_delivery: None,
            delivered_on: None,
        }
    }

    #[test]
    fn test_valid_request_passes_shape_check() {
        assert!(shipment_request().validate_shape().is_ok());
    }

    #[test]
    fn test_zero_weight_rejected() {
        let mut request = shipment_request();
        request.package.weight_kg = 0.0;
        assert!(matches!(
            request.validate_shape(),
            Err(ShippingError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_missing_postal_code_rejected() {
        let mut request = shipment_request();
        request.destination.postal_code = "  ".to_string();
        let err = request.validate_shape().unwrap_err();
        assert!(err.to_string().contains("destination"));
    }

    #[test]
    fn test_compact_postal_code() {
        assert_eq!(address("CA", "k1a 0b1").compact_postal_code(), "K1A0B1");
    }

    #[test]
    fn test_empty_tracking_number_rejected() {
        assert!(TrackingRequest::new("   ").validated_number().is_err());
        assert_eq!(TrackingRequest::new(" 123 ").validated_number().unwrap(), "123");
    }

    #[test]
    fn test_inline_label_decodes() {
        let label = Label::Inline {
            format: "PNG".to_string(),
            content: "aGVsbG8=".to_string(),
        };
        assert_eq!(label.decode().unwrap(), Some(b"hello".to_vec()));

        let url = Label::Url {
            href: "https://example.test/label.pdf".to_string(),
            media_type: None,
        };
        assert_eq!(url.decode().unwrap(), None);
    }

    #[test]
    fn test_apply_tracking_updates_status_only() {
        let mut s = shipment();
        let before = s.clone();
        let later = before.created_at + chrono::Duration::hours(4);

        let changed = s
            .apply_tracking(&tracking(Carrier::Dhl, "1Z999", ShipmentStatus::Delivered), later)
            .unwrap();

        assert!(changed);
        assert_eq!(s.status, ShipmentStatus::Delivered);
        assert_eq!(s.updated_at, later);
        assert_eq!(s.tracking_number, before.tracking_number);
        assert_eq!(s.rate, before.rate);
    }

    #[test]
    fn test_apply_tracking_accepts_backwards_transition() {
        let mut s = shipment();
        s.status = ShipmentStatus::Delivered;
        s.apply_tracking(
            &tracking(Carrier::Dhl, "1Z999", ShipmentStatus::InTransit),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(s.status, ShipmentStatus::InTransit);
    }

    #[test]
    fn test_apply_tracking_rejects_foreign_info() {
        let mut s = shipment();
        let result = s.apply_tracking(
            &tracking(Carrier::CanadaPost, "1Z999", ShipmentStatus::Delivered),
            Utc::now(),
        );
        assert!(result.is_err());
        assert_eq!(s.status, ShipmentStatus::LabelCreated);
    }

    #[test]
    fn test_raw_response_debug_hides_body() {
        let raw = RawResponse::new("{\"secret\":true}");
        assert_eq!(format!("{raw:?}"), "RawResponse(15 bytes)");
        assert_eq!(raw.as_str(), "{\"secret\":true}");
    }

    #[test]
    fn test_domestic_detection() {
        let request = RateRequest {
            origin: address("ca", "K1A0B1"),
            destination: address("CA", "H2B1A0"),
            package: package(1.0),
        };
        assert!(request.is_domestic());
    }
}

//! # DHL Wire Types
//!
//! JSON request and response bodies. Response fields are all optional:
//! presence is checked by the parsers, not by serde, so a missing field
//! becomes an "invalid response" error rather than a decode error.

use serde::{Deserialize, Serialize};

// =============================================================================
// Auth
// =============================================================================

/// Client-credentials token response.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TokenResponse {
    /// Bearer token.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Usually `Bearer`.
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
}

// =============================================================================
// Labels
// =============================================================================

/// DHL address layout.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DhlAddress {
    /// Contact name.
    pub name: String,
    /// Company.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// Street line 1.
    pub address1: String,
    /// Street line 2.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    /// City.
    pub city: String,
    /// State / province.
    pub state: String,
    /// ISO country.
    pub country: String,
    /// Postal code.
    pub postal_code: String,
    /// Phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Weight with unit.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Measure {
    /// Amount.
    pub value: f64,
    /// `KG` or `LB`.
    pub unit_of_measure: String,
}

/// Dimensions with unit.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionDetail {
    /// Length.
    pub length: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
    /// `CM` or `IN`.
    pub unit_of_measure: String,
}

/// Package section of a label request.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDetail {
    /// Shipper-unique package id (max 30 chars).
    pub package_id: String,
    /// Contents.
    pub package_description: String,
    /// Weight.
    pub weight: Measure,
    /// Dimensions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<DimensionDetail>,
    /// Declared value.
    #[serde(with = "rust_decimal::serde::float")]
    pub declared_value: rust_decimal::Decimal,
    /// Currency of the declared value.
    pub currency_code: String,
    /// Caller reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_reference1: Option<String>,
}

/// Label request body.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelRequest {
    /// Pickup account.
    pub pickup: String,
    /// Distribution center.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution_center: Option<String>,
    /// Service / product code.
    pub ordered_product_id: String,
    /// Receiver.
    pub consignee_address: DhlAddress,
    /// Sender, also where undeliverable parcels go.
    pub return_address: DhlAddress,
    /// Parcel.
    pub package_detail: PackageDetail,
}

/// Inline label document.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LabelPayload {
    /// Base64 content.
    #[serde(default)]
    pub content: Option<String>,
    /// `PNG`, `ZPL`, ...
    #[serde(default)]
    pub format: Option<String>,
}

/// Price line.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PriceAmount {
    /// Amount as DHL sends it: string or number.
    #[serde(default)]
    pub amount: Option<serde_json::Value>,
    /// Currency.
    #[serde(default)]
    pub currency: Option<String>,
}

/// Pricing block.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Pricing {
    /// Total charge.
    #[serde(default)]
    pub total: Option<PriceAmount>,
}

/// Label response body.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelResponse {
    /// Tracking number.
    #[serde(default)]
    pub tracking_number: Option<String>,
    /// Label document.
    #[serde(default)]
    pub label: Option<LabelPayload>,
    /// Pricing.
    #[serde(default)]
    pub pricing: Option<Pricing>,
    /// DHL shipment id.
    #[serde(default)]
    pub shipment_id: Option<String>,
    /// Echoed package id.
    #[serde(default)]
    pub package_id: Option<String>,
    /// Product name.
    #[serde(default)]
    pub service_name: Option<String>,
}

// =============================================================================
// Tracking
// =============================================================================

/// One scan.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DhlEvent {
    /// ISO 8601 timestamp.
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Location text.
    #[serde(default)]
    pub location: Option<String>,
}

/// Tracking record for one package.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedPackage {
    /// Tracking number.
    #[serde(default)]
    pub tracking_id: Option<String>,
    /// Summary status text.
    #[serde(default)]
    pub status: Option<String>,
    /// Estimate (date or datetime).
    #[serde(default)]
    pub estimated_delivery_date: Option<String>,
    /// Delivery date (date or datetime).
    #[serde(default)]
    pub delivered_date: Option<String>,
    /// Scans, newest first.
    #[serde(default)]
    pub events: Vec<DhlEvent>,
}

/// Tracking response body.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TrackingResponse {
    /// Matched packages.
    #[serde(default)]
    pub packages: Vec<TrackedPackage>,
}

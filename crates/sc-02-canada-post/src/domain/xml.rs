//! # Canada Post XML Documents
//!
//! Serde shapes for `quick-xml`. Field names map to kebab-case elements;
//! fields renamed with a leading `@` are attributes. Response documents keep
//! every field optional so the parsers decide what "invalid" means.

use serde::{Deserialize, Serialize};

/// Namespace of shipment-v8 documents.
pub const SHIPMENT_NAMESPACE: &str = "http://www.canadapost.ca/ws/shipment-v8";

// =============================================================================
// Shipment request
// =============================================================================

/// `<shipment>` request document.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename = "shipment", rename_all = "kebab-case")]
pub struct ShipmentDocument {
    /// Default namespace.
    #[serde(rename = "@xmlns")]
    pub xmlns: &'static str,
    /// Transmit immediately instead of grouping for a manifest.
    pub transmit_shipment: bool,
    /// Postal code the parcel enters the network at.
    pub requested_shipping_point: String,
    /// What is shipped and how.
    pub delivery_spec: DeliverySpec,
}

/// `<delivery-spec>`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DeliverySpec {
    /// Product, e.g. `DOM.EP`.
    pub service_code: String,
    /// Ship-from party.
    pub sender: Sender,
    /// Ship-to party.
    pub destination: Destination,
    /// Weight and size.
    pub parcel_characteristics: ParcelCharacteristics,
    /// Label output.
    pub print_preferences: PrintPreferences,
    /// Label and invoice display flags.
    pub preferences: Preferences,
    /// Caller references printed on the label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<References>,
    /// Billing.
    pub settlement_info: SettlementInfo,
}

/// `<sender>`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Sender {
    /// Contact name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Company; Canada Post requires one for the sender.
    pub company: String,
    /// Contact phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    /// Address.
    pub address_details: AddressDetails,
}

/// `<destination>`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Destination {
    /// Recipient name.
    pub name: String,
    /// Company.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_voice_number: Option<String>,
    /// Address.
    pub address_details: AddressDetails,
}

/// `<address-details>`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AddressDetails {
    /// Street line 1.
    pub address_line_1: String,
    /// Street line 2.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line_2: Option<String>,
    /// City.
    pub city: String,
    /// Province or state.
    pub prov_state: String,
    /// ISO country.
    pub country_code: String,
    /// Postal or ZIP code.
    pub postal_zip_code: String,
}

/// `<parcel-characteristics>`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParcelCharacteristics {
    /// Kilograms, 3 decimals.
    pub weight: f64,
    /// Centimetres, 1 decimal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<ParcelDimensions>,
}

/// `<dimensions>`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParcelDimensions {
    /// Longest side.
    pub length: f64,
    /// Second longest side.
    pub width: f64,
    /// Shortest side.
    pub height: f64,
}

/// `<print-preferences>`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PrintPreferences {
    /// `8.5x11` or `4x6`.
    pub output_format: String,
}

/// `<preferences>`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Preferences {
    /// Print packing instructions.
    pub show_packing_instructions: bool,
    /// Print the postage rate.
    pub show_postage_rate: bool,
    /// Print declared value.
    pub show_insured_value: bool,
}

/// `<references>`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct References {
    /// First customer reference.
    pub customer_ref_1: String,
}

/// `<settlement-info>`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SettlementInfo {
    /// Commercial contract.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<String>,
    /// `Account` or `CreditCard`.
    pub intended_method_of_payment: String,
}

// =============================================================================
// Shipment response
// =============================================================================

/// `<shipment-info>` response document.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ShipmentInfo {
    /// Canada Post shipment id.
    #[serde(default)]
    pub shipment_id: Option<String>,
    /// `created`, `transmitted`, ...
    #[serde(default)]
    pub shipment_status: Option<String>,
    /// Tracking PIN.
    #[serde(default)]
    pub tracking_pin: Option<String>,
    /// Related resources.
    #[serde(default)]
    pub links: Option<Links>,
}

/// `<links>`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Links {
    /// Each `<link>`.
    #[serde(default)]
    pub link: Vec<Link>,
}

/// `<link rel=".." href=".." media-type=".."/>`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Link {
    /// Relation: `self`, `details`, `label`, ...
    #[serde(rename = "@rel", default)]
    pub rel: String,
    /// Absolute URL.
    #[serde(rename = "@href", default)]
    pub href: String,
    /// Media type of the target.
    #[serde(rename = "@media-type", default)]
    pub media_type: Option<String>,
}

// =============================================================================
// Tracking
// =============================================================================

/// `<tracking-detail>` response document.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TrackingDetail {
    /// Tracking PIN.
    #[serde(default)]
    pub pin: Option<String>,
    /// Estimate, `YYYY-MM-DD`.
    #[serde(default)]
    pub expected_delivery_date: Option<String>,
    /// Delivery, `YYYY-MM-DD`.
    #[serde(default)]
    pub actual_delivery_date: Option<String>,
    /// Product name.
    #[serde(default)]
    pub service_name: Option<String>,
    /// Scan history.
    #[serde(default)]
    pub significant_events: Option<SignificantEvents>,
}

/// `<significant-events>`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SignificantEvents {
    /// Scans, newest first.
    #[serde(default)]
    pub occurrence: Vec<Occurrence>,
}

/// `<occurrence>`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Occurrence {
    /// Scan code.
    #[serde(default)]
    pub event_identifier: Option<String>,
    /// `YYYY-MM-DD`.
    #[serde(default)]
    pub event_date: Option<String>,
    /// `HH:MM:SS`, local to the site.
    #[serde(default)]
    pub event_time: Option<String>,
    /// Abbreviation such as `EST` or `PDT`.
    #[serde(default)]
    pub event_time_zone: Option<String>,
    /// Description.
    #[serde(default)]
    pub event_description: Option<String>,
    /// Facility or city.
    #[serde(default)]
    pub event_site: Option<String>,
    /// Province.
    #[serde(default)]
    pub event_province: Option<String>,
}

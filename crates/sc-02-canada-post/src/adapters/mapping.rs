//! Shipment request mapping into the shipment-v8 document.

use shared_types::{Address, Dimensions, ShipmentRequest, ShippingError};

use crate::config::CanadaPostConfig;
use crate::domain::{
    AddressDetails, DeliverySpec, Destination, ParcelCharacteristics, ParcelDimensions,
    Preferences, PrintPreferences, References, Sender, SettlementInfo, ShipmentDocument,
    SHIPMENT_NAMESPACE,
};

/// Longest customer reference Canada Post accepts.
pub const MAX_REFERENCE_LEN: usize = 35;

const LABEL_OUTPUT_FORMAT: &str = "8.5x11";

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn postal_code(address: &Address) -> String {
    if address.country() == "CA" {
        address.compact_postal_code()
    } else {
        address.postal_code.trim().to_string()
    }
}

fn address_details(address: &Address) -> AddressDetails {
    AddressDetails {
        address_line_1: address.line1.trim().to_string(),
        address_line_2: non_blank(&address.line2),
        city: address.city.trim().to_string(),
        prov_state: address.state_province.trim().to_uppercase(),
        country_code: address.country(),
        postal_zip_code: postal_code(address),
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Canada Post wants length >= width >= height.
fn parcel_dimensions(dims: Dimensions) -> ParcelDimensions {
    let mut sides = [dims.length_cm, dims.width_cm, dims.height_cm];
    sides.sort_by(|a, b| b.total_cmp(a));
    ParcelDimensions {
        length: round_to(sides[0], 1),
        width: round_to(sides[1], 1),
        height: round_to(sides[2], 1),
    }
}

/// Assemble the shipment document.
pub fn build_shipment_document(
    config: &CanadaPostConfig,
    request: &ShipmentRequest,
) -> ShipmentDocument {
    let origin = &request.origin;
    let destination = &request.destination;

    let requested_shipping_point = config
        .origin_postal_code
        .as_deref()
        .map(|p| p.split_whitespace().collect::<String>().to_uppercase())
        .unwrap_or_else(|| origin.compact_postal_code());

    let sender_name = origin.name.trim().to_string();
    let sender = Sender {
        company: non_blank(&origin.company).unwrap_or_else(|| sender_name.clone()),
        name: Some(sender_name).filter(|n| !n.is_empty()),
        contact_phone: non_blank(&origin.phone),
        address_details: address_details(origin),
    };

    let references = request
        .reference
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(|r| References {
            customer_ref_1: r.chars().take(MAX_REFERENCE_LEN).collect(),
        });

    let intended_method_of_payment = if config.contract_id.is_some() {
        "Account"
    } else {
        "CreditCard"
    };

    ShipmentDocument {
        xmlns: SHIPMENT_NAMESPACE,
        transmit_shipment: true,
        requested_shipping_point,
        delivery_spec: DeliverySpec {
            service_code: request.service_code.trim().to_uppercase(),
            sender,
            destination: Destination {
                name: destination.name.trim().to_string(),
                company: non_blank(&destination.company),
                client_voice_number: non_blank(&destination.phone),
                address_details: address_details(destination),
            },
            parcel_characteristics: ParcelCharacteristics {
                weight: round_to(request.package.weight_kg, 3),
                dimensions: request.package.dimensions.map(parcel_dimensions),
            },
            print_preferences: PrintPreferences {
                output_format: LABEL_OUTPUT_FORMAT.to_string(),
            },
            preferences: Preferences {
                show_packing_instructions: true,
                show_postage_rate: false,
                show_insured_value: false,
            },
            references,
            settlement_info: SettlementInfo {
                contract_id: config.contract_id.clone(),
                intended_method_of_payment: intended_method_of_payment.to_string(),
            },
        },
    }
}

/// Serialize a shipment document to XML text.
pub fn render_shipment_document(document: &ShipmentDocument) -> Result<String, ShippingError> {
    let body = quick_xml::se::to_string(document)
        .map_err(|e| ShippingError::Serialization(format!("shipment document: {e}")))?;
    Ok(format!(r#"<?xml version="1.0" encoding="UTF-8"?>{body}"#))
}

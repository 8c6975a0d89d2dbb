//! Address and package mapping into DHL's label request layout.

use shared_types::{Address, ShipmentRequest};
use uuid::Uuid;

use crate::config::DhlConfig;
use crate::domain::{DhlAddress, DimensionDetail, LabelRequest, Measure, PackageDetail};

/// DHL rejects package ids longer than this.
pub const MAX_PACKAGE_ID_LEN: usize = 30;

/// Map an internal address.
pub fn map_address(address: &Address) -> DhlAddress {
    DhlAddress {
        name: address.name.trim().to_string(),
        company_name: non_blank(&address.company),
        address1: address.line1.trim().to_string(),
        address2: non_blank(&address.line2),
        city: address.city.trim().to_string(),
        state: address.state_province.trim().to_uppercase(),
        country: address.country(),
        postal_code: address.postal_code.trim().to_string(),
        phone: non_blank(&address.phone),
        email: non_blank(&address.email),
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Package id: the caller reference when it fits, otherwise a fresh id.
pub fn package_id_for(request: &ShipmentRequest) -> String {
    let reference: Option<String> = request
        .reference
        .as_deref()
        .map(|r| r.chars().filter(|c| c.is_ascii_alphanumeric()).collect());

    match reference {
        Some(r) if !r.is_empty() && r.len() <= MAX_PACKAGE_ID_LEN => r,
        _ => Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(MAX_PACKAGE_ID_LEN)
            .collect(),
    }
}

/// Assemble the label request body.
pub fn build_label_request(
    config: &DhlConfig,
    request: &ShipmentRequest,
    package_id: String,
) -> LabelRequest {
    let unit = config.weight_unit;
    let package = &request.package;

    let description = if package.description.trim().is_empty() {
        "Merchandise".to_string()
    } else {
        package.description.trim().to_string()
    };

    LabelRequest {
        pickup: config.pickup_account.clone(),
        distribution_center: config.distribution_center.clone(),
        ordered_product_id: request.service_code.trim().to_string(),
        consignee_address: map_address(&request.destination),
        return_address: map_address(&request.origin),
        package_detail: PackageDetail {
            package_id,
            package_description: description,
            weight: Measure {
                value: unit.weight_from_kg(package.weight_kg),
                unit_of_measure: unit.weight_code().to_string(),
            },
            dimension: package.dimensions.map(|d| DimensionDetail {
                length: unit.length_from_cm(d.length_cm),
                width: unit.length_from_cm(d.width_cm),
                height: unit.length_from_cm(d.height_cm),
                unit_of_measure: unit.dimension_code().to_string(),
            }),
            declared_value: package.declared_value,
            currency_code: package.currency.trim().to_uppercase(),
            billing_reference1: request.reference.clone(),
        },
    }
}

//! Label and tracking response parsing.
//!
//! Both parsers take the raw body so the caller can keep it for audit
//! regardless of the outcome.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use shared_types::{
    normalize_status, Carrier, Label, ShipmentStatus, ShippingError, TrackingEvent, TrackingInfo,
};
use std::str::FromStr;

use crate::domain::{DhlEvent, LabelResponse, PriceAmount, TrackingResponse};

/// The parts of a label response a shipment is built from.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedLabel {
    /// Tracking number.
    pub tracking_number: String,
    /// Inline label.
    pub label: Label,
    /// Charge, zero when DHL did not price the label.
    pub rate: Decimal,
    /// Currency of `rate`.
    pub currency: String,
    /// DHL shipment id, falling back to the echoed package id.
    pub carrier_shipment_id: Option<String>,
    /// Product name.
    pub service_name: Option<String>,
}

fn invalid_shipment() -> ShippingError {
    ShippingError::InvalidShipmentResponse {
        carrier: Carrier::Dhl,
    }
}

fn invalid_tracking() -> ShippingError {
    ShippingError::InvalidTrackingResponse {
        carrier: Carrier::Dhl,
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a label response.
///
/// `fallback_currency` is used when the pricing block carries an amount
/// without a currency.
pub fn parse_label_response(
    body: &str,
    fallback_currency: &str,
) -> Result<ParsedLabel, ShippingError> {
    let response: LabelResponse = serde_json::from_str(body).map_err(|_| invalid_shipment())?;

    let tracking_number = present(response.tracking_number).ok_or_else(invalid_shipment)?;
    let payload = response.label.unwrap_or_default();
    let content = present(payload.content).ok_or_else(invalid_shipment)?;
    let format = present(payload.format).unwrap_or_else(|| "PNG".to_string());

    let total = response.pricing.and_then(|p| p.total);
    let (rate, currency) = match total {
        Some(total) => price(total, fallback_currency)?,
        None => (Decimal::ZERO, fallback_currency.to_uppercase()),
    };

    Ok(ParsedLabel {
        tracking_number,
        label: Label::Inline { format, content },
        rate,
        currency,
        carrier_shipment_id: present(response.shipment_id).or(present(response.package_id)),
        service_name: present(response.service_name),
    })
}

fn price(total: PriceAmount, fallback_currency: &str) -> Result<(Decimal, String), ShippingError> {
    let amount = match total.amount {
        None | Some(Value::Null) => Decimal::ZERO,
        Some(Value::String(s)) => Decimal::from_str(s.trim()).map_err(|_| invalid_shipment())?,
        Some(Value::Number(n)) => {
            Decimal::from_str(&n.to_string()).map_err(|_| invalid_shipment())?
        }
        Some(_) => return Err(invalid_shipment()),
    };
    let currency = present(total.currency)
        .unwrap_or_else(|| fallback_currency.to_string())
        .to_uppercase();
    Ok((amount, currency))
}

/// Parse a tracking response for `tracking_number`.
///
/// The package whose `trackingId` matches is preferred; otherwise the first
/// package is used.
pub fn parse_tracking_response(
    body: &str,
    tracking_number: &str,
) -> Result<TrackingInfo, ShippingError> {
    let response: TrackingResponse = serde_json::from_str(body).map_err(|_| invalid_tracking())?;

    let mut packages = response.packages;
    if packages.is_empty() {
        return Err(invalid_tracking());
    }
    let index = packages
        .iter()
        .position(|p| p.tracking_id.as_deref().map(str::trim) == Some(tracking_number))
        .unwrap_or(0);
    let package = packages.swap_remove(index);

    let events: Vec<TrackingEvent> = package.events.iter().filter_map(to_event).collect();

    let status_text = present(package.status)
        .or_else(|| events.first().map(|e| e.description.clone()))
        .ok_or_else(invalid_tracking)?;
    let status = normalize_status(&status_text);

    let delivered_on = package
        .delivered_date
        .as_deref()
        .and_then(parse_date)
        .or_else(|| {
            if status == ShipmentStatus::Delivered {
                events
                    .first()
                    .and_then(|e| e.timestamp)
                    .map(|t| t.date_naive())
            } else {
                None
            }
        });

    Ok(TrackingInfo {
        carrier: Carrier::Dhl,
        tracking_number: present(package.tracking_id)
            .unwrap_or_else(|| tracking_number.to_string()),
        status,
        events,
        estimated_delivery: package.estimated_delivery_date.as_deref().and_then(parse_date),
        delivered_on,
    })
}

fn to_event(event: &DhlEvent) -> Option<TrackingEvent> {
    let description = event.description.as_deref()?.trim();
    if description.is_empty() {
        return None;
    }
    Some(TrackingEvent {
        timestamp: event.timestamp.as_deref().and_then(parse_timestamp),
        description: description.to_string(),
        location: present(event.location.clone()),
    })
}

/// `2024-03-01` or any timestamp starting with one.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    raw.get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}

/// RFC 3339, or a zone-less ISO datetime read as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

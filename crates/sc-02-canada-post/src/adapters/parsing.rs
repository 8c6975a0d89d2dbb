//! shipment-info and tracking-detail parsing.

use chrono::NaiveDate;
use shared_types::{
    normalize_status, Carrier, Label, ShipmentStatus, ShippingError, TrackingEvent, TrackingInfo,
};

use super::timezone::event_instant;
use crate::domain::{Occurrence, ShipmentInfo, TrackingDetail};

/// The parts of a shipment-info document a shipment is built from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedShipment {
    /// Tracking PIN.
    pub tracking_pin: String,
    /// Label artifact link.
    pub label: Label,
    /// Canada Post shipment id.
    pub shipment_id: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a `shipment-info` document.
///
/// Requires a tracking PIN and a `label` link.
pub fn parse_shipment_info(body: &str) -> Result<ParsedShipment, ShippingError> {
    let invalid = || ShippingError::InvalidShipmentResponse {
        carrier: Carrier::CanadaPost,
    };

    let info: ShipmentInfo = quick_xml::de::from_str(body).map_err(|_| invalid())?;
    let tracking_pin = present(info.tracking_pin).ok_or_else(invalid)?;
    let label_link = info
        .links
        .unwrap_or_default()
        .link
        .into_iter()
        .find(|l| l.rel.trim() == "label" && !l.href.trim().is_empty())
        .ok_or_else(invalid)?;

    Ok(ParsedShipment {
        tracking_pin,
        label: Label::Url {
            href: label_link.href.trim().to_string(),
            media_type: present(label_link.media_type),
        },
        shipment_id: present(info.shipment_id),
    })
}

fn parse_date(raw: Option<String>) -> Option<NaiveDate> {
    present(raw).and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok())
}

fn to_event(occurrence: Occurrence) -> Option<TrackingEvent> {
    let description = present(occurrence.event_description)?;

    let timestamp = match (
        occurrence.event_date.as_deref(),
        occurrence.event_time.as_deref(),
        occurrence.event_time_zone.as_deref(),
    ) {
        (Some(date), Some(time), Some(zone)) => event_instant(date, time, zone),
        _ => None,
    };

    let location = [occurrence.event_site, occurrence.event_province]
        .into_iter()
        .filter_map(present)
        .collect::<Vec<_>>()
        .join(", ");

    Some(TrackingEvent {
        timestamp,
        description,
        location: Some(location).filter(|l| !l.is_empty()),
    })
}

/// Parse a `tracking-detail` document for `pin`.
///
/// Status comes from the newest occurrence. A document with a PIN but no
/// scans yet is reported as in transit.
pub fn parse_tracking_detail(body: &str, pin: &str) -> Result<TrackingInfo, ShippingError> {
    let invalid = || ShippingError::InvalidTrackingResponse {
        carrier: Carrier::CanadaPost,
    };

    let detail: TrackingDetail = quick_xml::de::from_str(body).map_err(|_| invalid())?;
    let reported_pin = present(detail.pin);
    let occurrences = detail
        .significant_events
        .map(|e| e.occurrence)
        .unwrap_or_default();

    if reported_pin.is_none() && occurrences.is_empty() {
        return Err(invalid());
    }

    let newest_date = occurrences.first().and_then(|o| parse_date(o.event_date.clone()));
    let events: Vec<TrackingEvent> = occurrences.into_iter().filter_map(to_event).collect();
    let status = events
        .first()
        .map(|e| normalize_status(&e.description))
        .unwrap_or_default();

    let delivered_on = parse_date(detail.actual_delivery_date).or(
        if status == ShipmentStatus::Delivered {
            newest_date
        } else {
            None
        },
    );

    Ok(TrackingInfo {
        carrier: Carrier::CanadaPost,
        tracking_number: reported_pin.unwrap_or_else(|| pin.to_string()),
        status,
        events,
        estimated_delivery: parse_date(detail.expected_delivery_date),
        delivered_on,
    })
}

//! # Shipment Status
//!
//! The closed status set and the substring heuristic that maps carrier
//! status text into it.
//!
//! Matching runs in a fixed priority order so that text carrying several
//! signals always resolves the same way:
//!
//! ```text
//! delivered > out_for_delivery > returned > cancelled > exception > label_created > in_transit
//! ```
//!
//! No transition validation is performed; a `delivered` followed by an
//! `in_transit` report is accepted as-is.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized shipment status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    /// Label purchased, carrier has not scanned the parcel yet.
    LabelCreated,
    /// Moving through the carrier network. Also the fallback.
    #[default]
    InTransit,
    /// On the final delivery vehicle.
    OutForDelivery,
    /// Delivered to the recipient.
    Delivered,
    /// Delivery problem (failed attempt, damage, refusal, hold).
    Exception,
    /// Going or gone back to the sender.
    Returned,
    /// Label voided or shipment cancelled.
    Cancelled,
}

impl ShipmentStatus {
    /// Wire name (`label_created`, `in_transit`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::LabelCreated => "label_created",
            ShipmentStatus::InTransit => "in_transit",
            ShipmentStatus::OutForDelivery => "out_for_delivery",
            ShipmentStatus::Delivered => "delivered",
            ShipmentStatus::Exception => "exception",
            ShipmentStatus::Returned => "returned",
            ShipmentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered matching table. First rule with any matching needle wins.
const STATUS_RULES: &[(ShipmentStatus, &[&str])] = &[
    (ShipmentStatus::Delivered, &["delivered"]),
    (
        ShipmentStatus::OutForDelivery,
        &["out for delivery", "with delivery courier", "on vehicle for delivery"],
    ),
    (
        ShipmentStatus::Returned,
        &["return to sender", "returned", "returning to sender"],
    ),
    (ShipmentStatus::Cancelled, &["cancelled", "canceled", "voided"]),
    (
        ShipmentStatus::Exception,
        &[
            "exception",
            "attempt",
            "failed",
            "undeliverable",
            "refused",
            "damaged",
            "held",
            "delay",
        ],
    ),
    (
        ShipmentStatus::LabelCreated,
        &[
            "label created",
            "electronic information submitted",
            "information received",
            "pre transit",
        ],
    ),
    (
        ShipmentStatus::InTransit,
        &["in transit", "transit", "processed", "arrived", "departed", "picked up"],
    ),
];

/// Map free-form carrier status text into the closed status set.
///
/// Text is lower-cased and `_`/`-` are read as spaces. Anything that
/// matches no rule (including empty text) is `InTransit`.
pub fn normalize_status(raw: &str) -> ShipmentStatus {
    let text: String = raw
        .to_lowercase()
        .chars()
        .map(|c| if c == '_' || c == '-' { ' ' } else { c })
        .collect();

    STATUS_RULES
        .iter()
        .find(|(_, needles)| needles.iter().any(|needle| text.contains(needle)))
        .map(|(status, _)| *status)
        .unwrap_or_default()
}

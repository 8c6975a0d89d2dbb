//! # Adapters Layer
//!
//! Translation between the shared domain model and Canada Post's XML
//! documents.

pub mod mapping;
pub mod parsing;
pub mod timezone;

pub use mapping::{build_shipment_document, render_shipment_document};
pub use parsing::{parse_shipment_info, parse_tracking_detail, ParsedShipment};
pub use timezone::{event_instant, zone_offset};

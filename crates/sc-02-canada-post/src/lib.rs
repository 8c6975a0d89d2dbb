//! # SC-02 Canada Post
//!
//! Canada Post contract shipping and tracking behind the uniform
//! `ShippingCarrierClient` port.
//!
//! **Subsystem ID:** 02
//! **Architecture:** Hexagonal (domain wire types + adapters + service)
//!
//! ## Wire Contract
//!
//! | Call | Endpoint | Media type |
//! |------|----------|------------|
//! | Shipment | `POST /rs/{customer}/{customer}/shipment` | `application/vnd.cpc.shipment-v8+xml` |
//! | Tracking | `GET /vis/track/pin/{pin}/detail` | `application/vnd.cpc.track-v2+xml` |
//!
//! Every call carries HTTP Basic credentials and `Accept-language: en-CA`.
//! Labels come back as an artifact URL, not inline, and the shipment
//! response carries no price.
//!
//! ## Module Structure
//!
//! ```text
//! sc-02-canada-post/
//! ├── config.rs        # CanadaPostConfig from CANADAPOST_* variables
//! ├── domain/xml.rs    # shipment-v8 / track-v2 document shapes
//! ├── adapters/        # request mapping, response parsing, time zones
//! └── service.rs       # CanadaPostClient + create_canada_post_client()
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod service;

pub use config::{CanadaPostConfig, CanadaPostEnvironment};
pub use service::{create_canada_post_client, CanadaPostClient};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

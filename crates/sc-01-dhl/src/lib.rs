//! # SC-01 DHL
//!
//! DHL eCommerce client behind the uniform `ShippingCarrierClient` port.
//!
//! **Subsystem ID:** 01
//! **Architecture:** Hexagonal (domain wire types + adapters + service)
//!
//! ## Wire Contract
//!
//! | Call | Endpoint | Auth |
//! |------|----------|------|
//! | Token | `POST /auth/v4/token` (form) | client id / secret |
//! | Label | `POST /shipping/v1/labels/merchant` | bearer |
//! | Return label | `POST /returns/v4/label` | bearer |
//! | Tracking | `GET /tracking/v4/package?trackingId=` | bearer |
//!
//! Rates: DHL has no certified rate API here, so `get_rates` is always empty.
//!
//! ## Module Structure
//!
//! ```text
//! sc-01-dhl/
//! ├── config.rs        # DhlConfig from DHL_* variables
//! ├── domain/wire.rs   # JSON request/response shapes
//! ├── adapters/        # mapping, auth, response parsing
//! └── service.rs       # DhlClient + create_dhl_client()
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod service;

pub use config::{DhlConfig, WeightUnit, DEFAULT_DHL_API_URL};
pub use service::{create_dhl_client, DhlClient};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

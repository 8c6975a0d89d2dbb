//! # Shared Types Crate
//!
//! Domain entities, the error taxonomy, and the hexagonal ports shared by
//! every carrier client in the workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `Shipment`, `ShippingRate` and `TrackingInfo`
//!   are defined here and nowhere else.
//! - **Closed status set**: every carrier status string ends up as one of the
//!   seven `ShipmentStatus` variants (see [`status::normalize_status`]).
//! - **Injectable infrastructure**: HTTP, time and token caching are reached
//!   through ports so carrier clients can be exercised without a network.
//!
//! ## Module Structure
//!
//! ```text
//! shared-types/
//! ├── carrier.rs      # Carrier identifiers
//! ├── entities.rs     # Address, Package, Shipment, TrackingInfo, requests
//! ├── errors.rs       # ShippingError, CarrierOperation
//! ├── ports.rs        # ShippingCarrierClient, HttpTransport, TimeSource + mocks
//! ├── secret.rs       # SecretString (zeroized, redacted)
//! ├── status.rs       # ShipmentStatus + normalizer
//! ├── token_cache.rs  # OAuth token cache keyed by carrier
//! └── transport.rs    # reqwest-backed HttpTransport
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod carrier;
pub mod entities;
pub mod errors;
pub mod ports;
pub mod secret;
pub mod status;
pub mod token_cache;
pub mod transport;

pub use carrier::Carrier;
pub use entities::*;
pub use errors::*;
pub use ports::*;
pub use secret::SecretString;
pub use status::{normalize_status, ShipmentStatus};
pub use token_cache::{CachedToken, TokenCache, TOKEN_EXPIRY_MARGIN_SECS};
pub use transport::{ReqwestTransport, TransportConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

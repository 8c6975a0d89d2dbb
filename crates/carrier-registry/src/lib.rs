//! # Carrier Registry
//!
//! Composition root for carrier clients.
//!
//! - [`create_carrier_client`]: build one client from the environment.
//! - [`CarrierRegistry`]: constructed clients keyed by [`Carrier`].
//! - [`RateQuoter`]: live rates with a static table behind them.
//! - [`refresh_tracking`]: poll a carrier and move a shipment's status.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use carrier_registry::{CarrierRegistry, RateQuoter};
//!
//! let registry = CarrierRegistry::from_env()?;
//! let client = registry.get("canada_post".parse()?)?;
//! let rates = RateQuoter::default().quote(client.as_ref(), &request).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod factory;
pub mod rates;
pub mod registry;
pub mod tracking;

pub use factory::{
    create_canada_post_client, create_carrier_client, create_carrier_client_from_vars,
    create_dhl_client,
};
pub use rates::{DestinationClass, RateQuoter, StaticRate, StaticRateTable};
pub use registry::CarrierRegistry;
pub use shared_types::Carrier;
pub use tracking::{refresh_tracking, refresh_tracking_with_clock};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

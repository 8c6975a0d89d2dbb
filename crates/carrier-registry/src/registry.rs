//! # Carrier Registry
//!
//! Constructed clients keyed by carrier, shared behind `Arc`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use shared_types::{Carrier, ShippingCarrierClient, ShippingError};
use tracing::{info, warn};

use crate::factory::create_carrier_client;

/// Clients by carrier.
#[derive(Clone, Default)]
pub struct CarrierRegistry {
    clients: HashMap<Carrier, Arc<dyn ShippingCarrierClient>>,
}

impl CarrierRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every carrier whose credentials are present.
    ///
    /// A carrier with a missing credential is skipped with a warning; any
    /// other configuration error aborts.
    pub fn from_env() -> Result<Self, ShippingError> {
        let mut registry = Self::new();
        for carrier in Carrier::ALL {
            match create_carrier_client(carrier) {
                Ok(client) => {
                    registry.register(client);
                }
                Err(e @ ShippingError::MissingCredential { .. }) => {
                    warn!(carrier = %carrier, error = %e, "Carrier not configured; skipping");
                }
                Err(e) => return Err(e),
            }
        }
        info!(carriers = ?registry.carriers(), "Carrier registry ready");
        Ok(registry)
    }

    /// Add a client, replacing any previous one for the same carrier.
    pub fn register(
        &mut self,
        client: Arc<dyn ShippingCarrierClient>,
    ) -> Option<Arc<dyn ShippingCarrierClient>> {
        self.clients.insert(client.carrier(), client)
    }

    /// Client for `carrier`.
    pub fn get(&self, carrier: Carrier) -> Result<Arc<dyn ShippingCarrierClient>, ShippingError> {
        self.clients.get(&carrier).cloned().ok_or_else(|| {
            ShippingError::UnsupportedCarrier(format!("{} (not configured)", carrier.as_str()))
        })
    }

    /// Registered carriers in `Carrier::ALL` order.
    pub fn carriers(&self) -> Vec<Carrier> {
        Carrier::ALL
            .into_iter()
            .filter(|c| self.clients.contains_key(c))
            .collect()
    }

    /// Number of registered clients.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// True when no client is registered.
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl fmt::Debug for CarrierRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CarrierRegistry")
            .field("carriers", &self.carriers())
            .finish()
    }
}

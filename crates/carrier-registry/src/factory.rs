//! Client factories keyed by carrier.
//!
//! Every factory resolves its credentials up front, so a missing variable
//! fails here and never on the first carrier call.

use std::sync::Arc;

use sc_01_dhl::{DhlClient, DhlConfig};
use sc_02_canada_post::{CanadaPostClient, CanadaPostConfig};
use shared_types::{Carrier, ReqwestTransport, ShippingCarrierClient, ShippingError, TransportConfig};

pub use sc_01_dhl::create_dhl_client;
pub use sc_02_canada_post::create_canada_post_client;

/// Build the client for `carrier` from the process environment.
pub fn create_carrier_client(
    carrier: Carrier,
) -> Result<Arc<dyn ShippingCarrierClient>, ShippingError> {
    let client: Arc<dyn ShippingCarrierClient> = match carrier {
        Carrier::Dhl => Arc::new(create_dhl_client()?),
        Carrier::CanadaPost => Arc::new(create_canada_post_client()?),
    };
    tracing::debug!(carrier = %carrier, "Carrier client constructed");
    Ok(client)
}

/// Same as [`create_carrier_client`] over an arbitrary variable lookup.
pub fn create_carrier_client_from_vars<F>(
    carrier: Carrier,
    lookup: F,
) -> Result<Arc<dyn ShippingCarrierClient>, ShippingError>
where
    F: Fn(&str) -> Option<String>,
{
    let transport = Arc::new(ReqwestTransport::new(&TransportConfig::from_vars(&lookup))?);
    let client: Arc<dyn ShippingCarrierClient> = match carrier {
        Carrier::Dhl => Arc::new(DhlClient::new(DhlConfig::from_vars(&lookup)?, transport)),
        Carrier::CanadaPost => Arc::new(CanadaPostClient::new(
            CanadaPostConfig::from_vars(&lookup)?,
            transport,
        )),
    };
    Ok(client)
}

//! Tracking refresh for stored shipments.

use shared_types::{
    ShippingCarrierClient, Shipment, ShippingError, SystemTimeSource, TimeSource, TrackingInfo,
    TrackingRequest,
};
use tracing::info;

/// Track `shipment` with `client` and apply the normalized status.
///
/// Returns the fresh snapshot. Any status is accepted, including moves
/// away from a terminal status.
pub async fn refresh_tracking(
    client: &dyn ShippingCarrierClient,
    shipment: &mut Shipment,
) -> Result<TrackingInfo, ShippingError> {
    refresh_tracking_with_clock(client, shipment, &SystemTimeSource).await
}

/// [`refresh_tracking`] with an explicit clock for `updated_at`.
pub async fn refresh_tracking_with_clock(
    client: &dyn ShippingCarrierClient,
    shipment: &mut Shipment,
    clock: &dyn TimeSource,
) -> Result<TrackingInfo, ShippingError> {
    if client.carrier() != shipment.carrier {
        return Err(ShippingError::InvalidRequest(format!(
            "shipment {} belongs to {}, not {}",
            shipment.id,
            shipment.carrier,
            client.carrier()
        )));
    }

    let info = client
        .track_shipment(&TrackingRequest::new(shipment.tracking_number.clone()))
        .await?;
    let previous = shipment.status;
    let changed = shipment.apply_tracking(&info, clock.now())?;

    if changed {
        info!(
            shipment_id = %shipment.id,
            tracking_number = %shipment.tracking_number,
            from = %previous,
            to = %shipment.status,
            "Shipment status changed"
        );
    }
    Ok(info)
}

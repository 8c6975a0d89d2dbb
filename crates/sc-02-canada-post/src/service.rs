//! # Canada Post Service
//!
//! [`CanadaPostClient`] implements [`ShippingCarrierClient`] over the
//! contract shipping and tracking XML APIs.

use async_trait::async_trait;
use carrier_telemetry::{log_carrier_event, record_call, send_checked, CallOutcome};
use rust_decimal::Decimal;
use shared_types::{
    Carrier, CarrierOperation, HttpRequest, HttpTransport, RateRequest, RawResponse,
    ReqwestTransport, Shipment, ShipmentRequest, ShipmentStatus, ShippingCarrierClient,
    ShippingError, ShippingRate, SystemTimeSource, TimeSource, TrackingInfo, TrackingRequest,
    TransportConfig,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::adapters::{
    build_shipment_document, parse_shipment_info, parse_tracking_detail,
    render_shipment_document,
};
use crate::config::{CanadaPostConfig, SHIPMENT_MEDIA_TYPE, TRACKING_MEDIA_TYPE};

/// Canada Post never prices in the shipment response.
const SHIPMENT_CURRENCY: &str = "CAD";

/// Canada Post contract client.
pub struct CanadaPostClient {
    config: CanadaPostConfig,
    transport: Arc<dyn HttpTransport>,
    clock: Arc<dyn TimeSource>,
}

impl CanadaPostClient {
    /// Client using the system clock.
    pub fn new(config: CanadaPostConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config,
            transport,
            clock: Arc::new(SystemTimeSource),
        }
    }

    /// Use a caller-supplied clock.
    pub fn with_time_source(self, clock: Arc<dyn TimeSource>) -> Self {
        Self { clock, ..self }
    }

    /// Active configuration.
    pub fn config(&self) -> &CanadaPostConfig {
        &self.config
    }

    fn authorized(&self, request: HttpRequest) -> HttpRequest {
        request
            .header("Authorization", self.config.basic_auth_header())
            .header("Accept-language", "en-CA")
    }
}

#[async_trait]
impl ShippingCarrierClient for CanadaPostClient {
    fn carrier(&self) -> Carrier {
        Carrier::CanadaPost
    }

    #[instrument(skip_all, fields(carrier = "canada_post", service = %request.service_code))]
    async fn create_shipment(&self, request: &ShipmentRequest) -> Result<Shipment, ShippingError> {
        request.validate_shape()?;
        if request.is_return {
            debug!("Return shipments use the regular contract shipment endpoint");
        }

        let body = render_shipment_document(&build_shipment_document(&self.config, request))?;
        let http = self.authorized(
            HttpRequest::post(self.config.shipment_url())
                .header("Content-Type", SHIPMENT_MEDIA_TYPE)
                .header("Accept", SHIPMENT_MEDIA_TYPE)
                .body(body),
        );
        let response = send_checked(
            self.transport.as_ref(),
            Carrier::CanadaPost,
            CarrierOperation::ShipmentCreation,
            http,
        )
        .await?;

        let parsed = match parse_shipment_info(&response.body) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(bytes = response.body.len(), "shipment-info without PIN or label link");
                record_call(
                    Carrier::CanadaPost,
                    CarrierOperation::ShipmentCreation,
                    CallOutcome::InvalidResponse,
                );
                return Err(e);
            }
        };
        record_call(
            Carrier::CanadaPost,
            CarrierOperation::ShipmentCreation,
            CallOutcome::Success,
        );

        let now = self.clock.now();
        let shipment = Shipment {
            id: Uuid::new_v4(),
            carrier: Carrier::CanadaPost,
            service_code: request.service_code.trim().to_uppercase(),
            service_name: None,
            tracking_number: parsed.tracking_pin,
            label: parsed.label,
            rate: Decimal::ZERO,
            currency: SHIPMENT_CURRENCY.to_string(),
            origin: request.origin.clone(),
            destination: request.destination.clone(),
            status: ShipmentStatus::LabelCreated,
            carrier_shipment_id: parsed.shipment_id,
            created_at: now,
            updated_at: now,
            raw_response: RawResponse::new(response.body),
        };

        log_carrier_event!(
            info,
            Carrier::CanadaPost,
            CarrierOperation::ShipmentCreation,
            "Shipment created",
            shipment_id = %shipment.id,
            tracking_number = %shipment.tracking_number
        );
        Ok(shipment)
    }

    async fn get_rates(&self, _request: &RateRequest) -> Result<Vec<ShippingRate>, ShippingError> {
        debug!(carrier = "canada_post", "No live Canada Post rates; caller falls back to the static table");
        Ok(Vec::new())
    }

    #[instrument(skip_all, fields(carrier = "canada_post", tracking_number = %request.tracking_number.trim()))]
    async fn track_shipment(&self, request: &TrackingRequest) -> Result<TrackingInfo, ShippingError> {
        let pin = request.validated_number()?;
        let http = self.authorized(
            HttpRequest::get(self.config.tracking_url(pin)?).header("Accept", TRACKING_MEDIA_TYPE),
        );
        let response = send_checked(
            self.transport.as_ref(),
            Carrier::CanadaPost,
            CarrierOperation::Tracking,
            http,
        )
        .await?;

        let info = match parse_tracking_detail(&response.body, pin) {
            Ok(info) => info,
            Err(e) => {
                warn!(bytes = response.body.len(), "Unusable tracking-detail document");
                record_call(
                    Carrier::CanadaPost,
                    CarrierOperation::Tracking,
                    CallOutcome::InvalidResponse,
                );
                return Err(e);
            }
        };
        record_call(Carrier::CanadaPost, CarrierOperation::Tracking, CallOutcome::Success);

        info!(status = %info.status, events = info.events.len(), "Canada Post tracking refreshed");
        Ok(info)
    }
}

/// Build a Canada Post client from `CANADAPOST_*` and `CARRIER_HTTP_*`
/// environment variables.
pub fn create_canada_post_client() -> Result<CanadaPostClient, ShippingError> {
    let config = CanadaPostConfig::from_env()?;
    let transport = ReqwestTransport::new(&TransportConfig::from_env())?;
    Ok(CanadaPostClient::new(config, Arc::new(transport)))
}

//! # DHL Service
//!
//! [`DhlClient`] wires config, transport, token handling and the wire
//! adapters into the uniform [`ShippingCarrierClient`] port.

use async_trait::async_trait;
use carrier_telemetry::{log_carrier_event, record_call, send_checked, CallOutcome};
use shared_types::{
    Carrier, CarrierOperation, HttpRequest, HttpTransport, RateRequest, RawResponse,
    ReqwestTransport, Shipment, ShipmentRequest, ShipmentStatus, ShippingCarrierClient,
    ShippingError, ShippingRate, SystemTimeSource, TimeSource, TokenCache, TrackingInfo,
    TrackingRequest, TransportConfig,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::adapters::{
    build_label_request, package_id_for, parse_label_response, parse_tracking_response,
    DhlAuthenticator,
};
use crate::config::DhlConfig;

/// DHL eCommerce client.
pub struct DhlClient {
    config: DhlConfig,
    transport: Arc<dyn HttpTransport>,
    auth: DhlAuthenticator,
}

impl DhlClient {
    /// Client with its own empty token cache and the system clock.
    pub fn new(config: DhlConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config,
            transport,
            auth: DhlAuthenticator::new(Arc::new(TokenCache::new()), Arc::new(SystemTimeSource)),
        }
    }

    /// Use a caller-supplied token cache.
    pub fn with_token_cache(self, tokens: Arc<TokenCache>) -> Self {
        let clock = Arc::clone(self.auth.clock());
        Self {
            auth: DhlAuthenticator::new(tokens, clock),
            ..self
        }
    }

    /// Use a caller-supplied clock.
    pub fn with_time_source(self, clock: Arc<dyn TimeSource>) -> Self {
        let tokens = Arc::clone(self.auth.token_cache());
        Self {
            auth: DhlAuthenticator::new(tokens, clock),
            ..self
        }
    }

    /// Token cache this client reads and fills.
    pub fn token_cache(&self) -> Arc<TokenCache> {
        Arc::clone(self.auth.token_cache())
    }

    /// Active configuration.
    pub fn config(&self) -> &DhlConfig {
        &self.config
    }

    async fn bearer(&self) -> Result<String, ShippingError> {
        let token = self
            .auth
            .bearer_token(&self.config, self.transport.as_ref())
            .await?;
        Ok(format!("Bearer {}", token.expose()))
    }
}

#[async_trait]
impl ShippingCarrierClient for DhlClient {
    fn carrier(&self) -> Carrier {
        Carrier::Dhl
    }

    #[instrument(skip_all, fields(carrier = "dhl", service = %request.service_code, is_return = request.is_return))]
    async fn create_shipment(&self, request: &ShipmentRequest) -> Result<Shipment, ShippingError> {
        request.validate_shape()?;

        let package_id = package_id_for(request);
        let body = serde_json::to_string(&build_label_request(&self.config, request, package_id))
            .map_err(|e| ShippingError::Serialization(e.to_string()))?;
        let authorization = self.bearer().await?;

        let http = HttpRequest::post(self.config.label_url(request.is_return))
            .header("Authorization", authorization)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .body(body);
        let response = send_checked(
            self.transport.as_ref(),
            Carrier::Dhl,
            CarrierOperation::ShipmentCreation,
            http,
        )
        .await?;

        let parsed = match parse_label_response(&response.body, &request.package.currency) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(bytes = response.body.len(), "Unusable DHL label response");
                record_call(
                    Carrier::Dhl,
                    CarrierOperation::ShipmentCreation,
                    CallOutcome::InvalidResponse,
                );
                return Err(e);
            }
        };
        record_call(Carrier::Dhl, CarrierOperation::ShipmentCreation, CallOutcome::Success);

        let now = self.auth.clock().now();
        let shipment = Shipment {
            id: Uuid::new_v4(),
            carrier: Carrier::Dhl,
            service_code: request.service_code.trim().to_string(),
            service_name: parsed.service_name,
            tracking_number: parsed.tracking_number,
            label: parsed.label,
            rate: parsed.rate,
            currency: parsed.currency,
            origin: request.origin.clone(),
            destination: request.destination.clone(),
            status: ShipmentStatus::LabelCreated,
            carrier_shipment_id: parsed.carrier_shipment_id,
            created_at: now,
            updated_at: now,
            raw_response: RawResponse::new(response.body),
        };

        log_carrier_event!(
            info,
            Carrier::Dhl,
            CarrierOperation::ShipmentCreation,
            "Label created",
            shipment_id = %shipment.id,
            tracking_number = %shipment.tracking_number,
            rate = %shipment.rate,
            currency = %shipment.currency
        );
        Ok(shipment)
    }

    async fn get_rates(&self, _request: &RateRequest) -> Result<Vec<ShippingRate>, ShippingError> {
        debug!(carrier = "dhl", "No live DHL rates; caller falls back to the static table");
        Ok(Vec::new())
    }

    #[instrument(skip_all, fields(carrier = "dhl", tracking_number = %request.tracking_number.trim()))]
    async fn track_shipment(&self, request: &TrackingRequest) -> Result<TrackingInfo, ShippingError> {
        let number = request.validated_number()?;
        let url = self.config.tracking_url(number)?;
        let authorization = self.bearer().await?;

        let http = HttpRequest::get(url)
            .header("Authorization", authorization)
            .header("Accept", "application/json");
        let response = send_checked(
            self.transport.as_ref(),
            Carrier::Dhl,
            CarrierOperation::Tracking,
            http,
        )
        .await?;

        let info = match parse_tracking_response(&response.body, number) {
            Ok(info) => info,
            Err(e) => {
                warn!(bytes = response.body.len(), "DHL tracking response had no usable package");
                record_call(Carrier::Dhl, CarrierOperation::Tracking, CallOutcome::InvalidResponse);
                return Err(e);
            }
        };
        record_call(Carrier::Dhl, CarrierOperation::Tracking, CallOutcome::Success);

        info!(status = %info.status, events = info.events.len(), "DHL tracking refreshed");
        Ok(info)
    }
}

/// Build a DHL client from `DHL_*` and `CARRIER_HTTP_*` environment variables.
///
/// Fails immediately when a required credential is missing.
pub fn create_dhl_client() -> Result<DhlClient, ShippingError> {
    let config = DhlConfig::from_env()?;
    let transport = ReqwestTransport::new(&TransportConfig::from_env())?;
    Ok(DhlClient::new(config, Arc::new(transport)))
}

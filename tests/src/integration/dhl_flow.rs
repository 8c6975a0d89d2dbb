//! # DHL Flow
//!
//! Label purchase and tracking through `ReqwestTransport`, including token
//! reuse and re-authentication after expiry.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use sc_01_dhl::{DhlClient, DhlConfig};
    use shared_types::{
        Address, Carrier, MockTimeSource, Package, ReqwestTransport, ShipmentRequest,
        ShipmentStatus, ShippingCarrierClient, ShippingError, TrackingRequest, TransportConfig,
    };

    use crate::mock_carrier::{MockCarrier, DHL_LABEL_CONTENT, DHL_REJECTION_BODY};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn address(postal: &str, state: &str) -> Address {
        Address {
            name: "Alex Kim".to_string(),
            company: Some("Kim Supply".to_string()),
            line1: "200 W Madison St".to_string(),
            city: "Chicago".to_string(),
            state_province: state.to_string(),
            postal_code: postal.to_string(),
            country_code: "US".to_string(),
            ..Address::default()
        }
    }

    fn shipment_request(is_return: bool) -> ShipmentRequest {
        ShipmentRequest {
            origin: address("60606", "IL"),
            destination: address("10001", "NY"),
            package: Package {
                weight_kg: 0.8,
                dimensions: None,
                declared_value: Decimal::new(3500, 2),
                currency: "USD".to_string(),
                description: "T-shirts".to_string(),
            },
            service_code: "GND".to_string(),
            is_return,
            reference: Some("ORD-7001".to_string()),
        }
    }

    fn client(server: &MockCarrier, clock: Arc<MockTimeSource>) -> DhlClient {
        let transport = ReqwestTransport::new(&TransportConfig::default()).unwrap();
        DhlClient::new(DhlConfig::for_testing(&server.base_url()), Arc::new(transport))
            .with_time_source(clock)
    }

    // =============================================================================
    // TESTS
    // =============================================================================

    #[tokio::test]
    async fn test_label_purchase_over_http() {
        let server = MockCarrier::start().await;
        let dhl = client(&server, Arc::new(MockTimeSource::default()));

        let shipment = dhl.create_shipment(&shipment_request(false)).await.unwrap();

        assert_eq!(shipment.carrier, Carrier::Dhl);
        assert_eq!(shipment.tracking_number, "GM60511234500000001");
        assert_eq!(shipment.rate, Decimal::new(1250, 2));
        assert_eq!(shipment.currency, "USD");
        assert_eq!(shipment.status, ShipmentStatus::LabelCreated);
        assert_eq!(shipment.carrier_shipment_id.as_deref(), Some("ORD7001"));
        assert!(shipment.raw_response.as_str().contains(DHL_LABEL_CONTENT));
        assert_eq!(shipment.label.decode().unwrap(), Some(b"hello".to_vec()));
        assert_eq!(server.token_calls(), 1);
        assert_eq!(server.label_calls(), 1);
    }

    #[tokio::test]
    async fn test_return_label_endpoint() {
        let server = MockCarrier::start().await;
        let dhl = client(&server, Arc::new(MockTimeSource::default()));

        dhl.create_shipment(&shipment_request(true)).await.unwrap();

        assert_eq!(server.return_label_calls(), 1);
        assert_eq!(server.label_calls(), 0);
    }

    #[tokio::test]
    async fn test_token_reused_then_refreshed() {
        let server = MockCarrier::start().await;
        let clock = Arc::new(MockTimeSource::default());
        let dhl = client(&server, clock.clone());

        dhl.create_shipment(&shipment_request(false)).await.unwrap();
        dhl.track_shipment(&TrackingRequest::new("GM60511234500000001"))
            .await
            .unwrap();
        assert_eq!(server.token_calls(), 1);

        // 3600 s lifetime minus the 60 s margin.
        clock.advance_secs(3540);
        dhl.create_shipment(&shipment_request(false)).await.unwrap();
        dhl.create_shipment(&shipment_request(false)).await.unwrap();
        assert_eq!(server.token_calls(), 2);
    }

    #[tokio::test]
    async fn test_short_lived_token_fetched_every_call() {
        let server = MockCarrier::start().await;
        server.set_token_lifetime(30);
        let dhl = client(&server, Arc::new(MockTimeSource::default()));

        dhl.create_shipment(&shipment_request(false)).await.unwrap();
        dhl.create_shipment(&shipment_request(false)).await.unwrap();

        assert_eq!(server.token_calls(), 2);
    }

    #[tokio::test]
    async fn test_rejected_label_hides_carrier_body() {
        let server = MockCarrier::start().await;
        server.reject_labels(true);
        let dhl = client(&server, Arc::new(MockTimeSource::default()));

        let err = dhl
            .create_shipment(&shipment_request(false))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "DHL shipment creation failed");
        assert!(!err.to_string().contains("suspended"));
        assert!(DHL_REJECTION_BODY.contains("suspended"));
        assert!(matches!(
            err,
            ShippingError::CarrierRequestFailed { status: 400, .. }
        ));
        assert_eq!(server.label_calls(), 1);
    }

    #[tokio::test]
    async fn test_bad_credentials_fail_authentication() {
        let server = MockCarrier::start().await;
        let mut config = DhlConfig::for_testing(&server.base_url());
        config.client_secret = "wrong".into();
        let transport = ReqwestTransport::new(&TransportConfig::default()).unwrap();
        let dhl = DhlClient::new(config, Arc::new(transport));

        let err = dhl
            .create_shipment(&shipment_request(false))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "DHL authentication failed");
        assert_eq!(server.label_calls(), 0);
        assert!(dhl.token_cache().is_empty());
    }

    #[tokio::test]
    async fn test_tracking_over_http() {
        let server = MockCarrier::start().await;
        let dhl = client(&server, Arc::new(MockTimeSource::default()));

        let info = dhl
            .track_shipment(&TrackingRequest::new("GM60511234500000001"))
            .await
            .unwrap();

        assert_eq!(info.status, ShipmentStatus::OutForDelivery);
        assert_eq!(info.events.len(), 3);
        assert_eq!(info.events[0].location.as_deref(), Some("Chicago IL"));
        assert_eq!(
            info.estimated_delivery,
            chrono::NaiveDate::from_ymd_opt(2024, 6, 3)
        );
        assert_eq!(server.dhl_tracking_calls(), 1);
    }

    #[tokio::test]
    async fn test_unknown_package_is_invalid_tracking() {
        let server = MockCarrier::start().await;
        let dhl = client(&server, Arc::new(MockTimeSource::default()));

        let err = dhl
            .track_shipment(&TrackingRequest::new("UNKNOWN1"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid tracking response from DHL");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = ReqwestTransport::new(&TransportConfig::default()).unwrap();
        let dhl = DhlClient::new(
            DhlConfig::for_testing(&format!("http://{addr}")),
            Arc::new(transport),
        );

        let err = dhl
            .track_shipment(&TrackingRequest::new("GM1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ShippingError::Transport(_)));
    }
}

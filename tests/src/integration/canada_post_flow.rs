//! # Canada Post Flow
//!
//! XML shipment creation and tracking through `ReqwestTransport`.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use sc_02_canada_post::{CanadaPostClient, CanadaPostConfig};
    use shared_types::{
        Address, Carrier, Dimensions, Label, Package, ReqwestTransport, ShipmentRequest,
        ShipmentStatus, ShippingCarrierClient, ShippingError, TrackingRequest, TransportConfig,
    };

    use crate::mock_carrier::MockCarrier;

    fn address(name: &str, postal: &str) -> Address {
        Address {
            name: name.to_string(),
            line1: "2701 Riverside Dr".to_string(),
            city: "Ottawa".to_string(),
            state_province: "ON".to_string(),
            postal_code: postal.to_string(),
            country_code: "CA".to_string(),
            phone: Some("613-555-0100".to_string()),
            ..Address::default()
        }
    }

    fn shipment_request() -> ShipmentRequest {
        ShipmentRequest {
            origin: address("Maple Goods", "K1A 0B1"),
            destination: address("Sam Tremblay", "H2B 1A0"),
            package: Package {
                weight_kg: 2.5,
                dimensions: Some(Dimensions {
                    length_cm: 30.0,
                    width_cm: 20.0,
                    height_cm: 10.0,
                }),
                declared_value: Decimal::ZERO,
                currency: "CAD".to_string(),
                description: "Maple syrup".to_string(),
            },
            service_code: "DOM.EP".to_string(),
            is_return: false,
            reference: Some("ORD-88".to_string()),
        }
    }

    fn client_with(config: CanadaPostConfig) -> CanadaPostClient {
        let transport = ReqwestTransport::new(&TransportConfig::default()).unwrap();
        CanadaPostClient::new(config, Arc::new(transport))
    }

    #[tokio::test]
    async fn test_shipment_over_http() {
        let server = MockCarrier::start().await;
        let cp = client_with(CanadaPostConfig::for_testing(&server.base_url()));

        let shipment = cp.create_shipment(&shipment_request()).await.unwrap();

        assert_eq!(shipment.carrier, Carrier::CanadaPost);
        assert_eq!(shipment.tracking_number, "123456789012");
        assert_eq!(shipment.rate, Decimal::ZERO);
        assert_eq!(shipment.currency, "CAD");
        assert_eq!(
            shipment.carrier_shipment_id.as_deref(),
            Some("406951321983787352")
        );
        match &shipment.label {
            Label::Url { href, media_type } => {
                assert!(href.contains("/rs/artifact/"));
                assert_eq!(media_type.as_deref(), Some("application/pdf"));
            }
            other => panic!("expected a label link, got {other:?}"),
        }
        assert_eq!(server.cp_shipment_calls(), 1);
    }

    #[tokio::test]
    async fn test_wrong_password_is_generic_failure() {
        let server = MockCarrier::start().await;
        let mut config = CanadaPostConfig::for_testing(&server.base_url());
        config.password = "nope".into();

        let err = client_with(config)
            .create_shipment(&shipment_request())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Canada Post shipment creation failed");
        assert!(!err.to_string().contains("AAA"));
    }

    #[tokio::test]
    async fn test_tracking_out_for_delivery() {
        let server = MockCarrier::start().await;
        let cp = client_with(CanadaPostConfig::for_testing(&server.base_url()));

        let info = cp
            .track_shipment(&TrackingRequest::new("123456789012"))
            .await
            .unwrap();

        assert_eq!(info.status, ShipmentStatus::OutForDelivery);
        assert_eq!(info.tracking_number, "123456789012");
        assert_eq!(info.events.len(), 2);
        assert_eq!(info.events[0].description, "Item out for delivery");
        assert_eq!(info.events[0].location.as_deref(), Some("OTTAWA, ON"));
        assert_eq!(
            info.events[0].timestamp.map(|t| t.to_rfc3339()),
            Some("2024-06-03T12:05:12+00:00".to_string())
        );
        assert_eq!(server.cp_tracking_calls(), 1);
    }

    #[tokio::test]
    async fn test_unknown_pin_is_request_failure() {
        let server = MockCarrier::start().await;
        let cp = client_with(CanadaPostConfig::for_testing(&server.base_url()));

        let err = cp
            .track_shipment(&TrackingRequest::new("0000000000"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ShippingError::CarrierRequestFailed { status: 404, .. }
        ));
        assert_eq!(err.to_string(), "Canada Post tracking failed");
    }
}

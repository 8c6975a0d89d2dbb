//! # Registry Flow
//!
//! Clients resolved through `CarrierRegistry`, rates through `RateQuoter`
//! and status refresh through `refresh_tracking`.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use carrier_registry::{refresh_tracking, CarrierRegistry, RateQuoter};
    use rust_decimal::Decimal;
    use sc_01_dhl::{DhlClient, DhlConfig};
    use sc_02_canada_post::{CanadaPostClient, CanadaPostConfig};
    use shared_types::{
        Address, Carrier, HttpTransport, Package, RateRequest, RateSource, ReqwestTransport,
        ShipmentRequest, ShipmentStatus, ShippingCarrierClient, TransportConfig,
    };

    use crate::mock_carrier::MockCarrier;

    fn registry(server: &MockCarrier) -> CarrierRegistry {
        let transport: Arc<dyn HttpTransport> =
            Arc::new(ReqwestTransport::new(&TransportConfig::default()).unwrap());
        let mut registry = CarrierRegistry::new();
        registry.register(Arc::new(DhlClient::new(
            DhlConfig::for_testing(&server.base_url()),
            Arc::clone(&transport),
        )));
        registry.register(Arc::new(CanadaPostClient::new(
            CanadaPostConfig::for_testing(&server.base_url()),
            transport,
        )));
        registry
    }

    fn address(country: &str, postal: &str) -> Address {
        Address {
            name: "Robin Lee".to_string(),
            line1: "1 Yonge St".to_string(),
            city: "Toronto".to_string(),
            state_province: "ON".to_string(),
            postal_code: postal.to_string(),
            country_code: country.to_string(),
            ..Address::default()
        }
    }

    fn package() -> Package {
        Package {
            weight_kg: 1.0,
            dimensions: None,
            declared_value: Decimal::new(1000, 2),
            currency: "CAD".to_string(),
            description: "Books".to_string(),
        }
    }

    #[tokio::test]
    async fn test_static_rates_for_every_carrier() {
        let server = MockCarrier::start().await;
        let registry = registry(&server);
        let quoter = RateQuoter::default();
        let request = RateRequest {
            origin: address("CA", "M5E 1W7"),
            destination: address("US", "10001"),
            package: package(),
        };

        for carrier in Carrier::ALL {
            let client = registry.get(carrier).unwrap();
            let rates = quoter.quote(client.as_ref(), &request).await.unwrap();
            assert!(!rates.is_empty(), "no fallback rates for {carrier}");
            assert!(rates
                .iter()
                .all(|r| r.source == RateSource::StaticTable && r.carrier == carrier));
        }
        assert_eq!(server.token_calls(), 0);
    }

    #[tokio::test]
    async fn test_ship_then_refresh() {
        let server = MockCarrier::start().await;
        let registry = registry(&server);
        let client = registry.get("canada-post".parse().unwrap()).unwrap();

        let mut shipment = client
            .create_shipment(&ShipmentRequest {
                origin: address("CA", "M5E 1W7"),
                destination: address("CA", "K1A 0B1"),
                package: package(),
                service_code: "DOM.RP".to_string(),
                is_return: false,
                reference: None,
            })
            .await
            .unwrap();
        assert_eq!(shipment.status, ShipmentStatus::LabelCreated);

        let info = refresh_tracking(client.as_ref(), &mut shipment).await.unwrap();

        assert_eq!(info.status, ShipmentStatus::OutForDelivery);
        assert_eq!(shipment.status, ShipmentStatus::OutForDelivery);
        assert!(shipment.updated_at >= shipment.created_at);
        assert_eq!(server.cp_tracking_calls(), 1);
    }
}

//! # Rate Quoting
//!
//! Neither carrier client quotes live rates today, so every quote is
//! expected to come from the static table. The quoter still asks the
//! carrier first: a client that starts returning live rates takes over
//! without changes here.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared_types::{
    Carrier, RateRequest, RateSource, ShippingCarrierClient, ShippingError, ShippingRate,
};
use tracing::{debug, info};

/// Domestic or international, from the request's two country codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationClass {
    /// Same country.
    Domestic,
    /// Different countries.
    International,
}

impl DestinationClass {
    /// Classify a rate request.
    pub fn of(request: &RateRequest) -> Self {
        if request.is_domestic() {
            DestinationClass::Domestic
        } else {
            DestinationClass::International
        }
    }
}

/// One static table row: `base + per_kg * weight`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StaticRate {
    /// Carrier.
    pub carrier: Carrier,
    /// Destination class this row applies to.
    pub destination: DestinationClass,
    /// Carrier service code.
    pub service_code: String,
    /// Service name.
    pub service_name: String,
    /// Flat part.
    pub base: Decimal,
    /// Per-kilogram part.
    pub per_kg: Decimal,
    /// Currency of both amounts.
    pub currency: String,
    /// Typical transit time.
    #[serde(default)]
    pub estimated_days: Option<u32>,
}

impl StaticRate {
    fn price(&self, weight_kg: Decimal) -> Result<Decimal, ShippingError> {
        self.per_kg
            .checked_mul(weight_kg)
            .and_then(|variable| self.base.checked_add(variable))
            .map(|amount| amount.round_dp(2))
            .ok_or_else(|| ShippingError::InvalidRequest("package weight out of range".to_string()))
    }
}

/// Fallback price list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StaticRateTable {
    /// Rows in display order.
    pub rates: Vec<StaticRate>,
}

#[allow(clippy::too_many_arguments)]
fn row(
    carrier: Carrier,
    destination: DestinationClass,
    service_code: &str,
    service_name: &str,
    base: Decimal,
    per_kg: Decimal,
    currency: &str,
    estimated_days: u32,
) -> StaticRate {
    StaticRate {
        carrier,
        destination,
        service_code: service_code.to_string(),
        service_name: service_name.to_string(),
        base,
        per_kg,
        currency: currency.to_string(),
        estimated_days: Some(estimated_days),
    }
}

impl Default for StaticRateTable {
    fn default() -> Self {
        use DestinationClass::{Domestic, International};

        Self {
            rates: vec![
                row(Carrier::Dhl, Domestic, "GND", "DHL Parcel Ground", Decimal::new(850, 2), Decimal::new(125, 2), "USD", 5),
                row(Carrier::Dhl, Domestic, "EXP", "DHL Parcel Expedited", Decimal::new(1200, 2), Decimal::new(180, 2), "USD", 3),
                row(Carrier::Dhl, International, "PLT", "DHL Parcel International Standard", Decimal::new(2400, 2), Decimal::new(650, 2), "USD", 10),
                row(Carrier::CanadaPost, Domestic, "DOM.RP", "Regular Parcel", Decimal::new(1050, 2), Decimal::new(175, 2), "CAD", 6),
                row(Carrier::CanadaPost, Domestic, "DOM.EP", "Expedited Parcel", Decimal::new(1200, 2), Decimal::new(210, 2), "CAD", 3),
                row(Carrier::CanadaPost, International, "INT.IP.AIR", "International Parcel Air", Decimal::new(3500, 2), Decimal::new(900, 2), "CAD", 10),
            ],
        }
    }
}

impl StaticRateTable {
    /// Load a table from JSON (`{"rates": [...]}`).
    pub fn from_json(json: &str) -> Result<Self, ShippingError> {
        serde_json::from_str(json).map_err(|e| ShippingError::InvalidConfig(format!("rate table: {e}")))
    }

    /// Priced rows for the request's carrier and destination class.
    pub fn rates_for(
        &self,
        carrier: Carrier,
        request: &RateRequest,
    ) -> Result<Vec<ShippingRate>, ShippingError> {
        let weight = request.package.weight_kg;
        if !(weight.is_finite() && weight > 0.0) {
            return Err(ShippingError::InvalidRequest(
                "package weight must be positive".to_string(),
            ));
        }
        let weight = Decimal::from_f64(weight)
            .filter(|w| *w > Decimal::ZERO)
            .ok_or_else(|| {
                ShippingError::InvalidRequest(format!("package weight {weight} kg cannot be priced"))
            })?;
        let class = DestinationClass::of(request);

        self.rates
            .iter()
            .filter(|r| r.carrier == carrier && r.destination == class)
            .map(|r| {
                Ok(ShippingRate {
                    carrier,
                    service_code: r.service_code.clone(),
                    service_name: r.service_name.clone(),
                    amount: r.price(weight)?,
                    currency: r.currency.clone(),
                    estimated_days: r.estimated_days,
                    source: RateSource::StaticTable,
                })
            })
            .collect()
    }
}

/// Live rates first, static table when the carrier has none.
#[derive(Clone, Debug, Default)]
pub struct RateQuoter {
    table: StaticRateTable,
}

impl RateQuoter {
    /// Quoter over a custom table.
    pub fn new(table: StaticRateTable) -> Self {
        Self { table }
    }

    /// Fallback table in use.
    pub fn table(&self) -> &StaticRateTable {
        &self.table
    }

    /// Quote `request` with `client`.
    ///
    /// Errors from the carrier propagate; only an empty answer falls back.
    pub async fn quote(
        &self,
        client: &dyn ShippingCarrierClient,
        request: &RateRequest,
    ) -> Result<Vec<ShippingRate>, ShippingError> {
        let carrier = client.carrier();
        let live = client.get_rates(request).await?;
        if !live.is_empty() {
            debug!(carrier = %carrier, count = live.len(), "Using live rates");
            return Ok(live);
        }

        let rates = self.table.rates_for(carrier, request)?;
        info!(
            carrier = %carrier,
            destination = ?DestinationClass::of(request),
            count = rates.len(),
            "No live rates; quoted from static table"
        );
        Ok(rates)
    }
}

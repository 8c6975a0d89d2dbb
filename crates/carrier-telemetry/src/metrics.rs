//! Prometheus metrics for carrier calls.
//!
//! All metrics follow the naming convention: `carrier_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{exponential_buckets, CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use shared_types::{Carrier, CarrierOperation};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Carrier calls by carrier, operation and outcome
    pub static ref CARRIER_REQUESTS: CounterVec = CounterVec::new(
        Opts::new("carrier_requests_total", "Carrier API requests"),
        &["carrier", "operation", "outcome"]  // outcome: success/rejected/invalid_response/transport_error
    ).expect("metric creation failed");

    /// Carrier call latency
    pub static ref CARRIER_CALL_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "carrier_call_duration_seconds",
            "Time spent waiting on carrier APIs"
        ).buckets(exponential_buckets(0.01, 2.0, 12).expect("bucket layout")),
        &["carrier", "operation"]
    ).expect("metric creation failed");

    /// OAuth token fetches (cache misses)
    pub static ref TOKEN_FETCHES: CounterVec = CounterVec::new(
        Opts::new("carrier_token_fetches_total", "OAuth token fetches"),
        &["carrier"]
    ).expect("metric creation failed");
}

/// How a carrier call ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallOutcome {
    /// 2xx with a usable body.
    Success,
    /// Non-2xx.
    Rejected,
    /// 2xx with a body we could not use.
    InvalidResponse,
    /// No HTTP response at all.
    TransportError,
}

impl CallOutcome {
    /// Metric label.
    pub fn as_str(&self) -> &'static str {
        match self {
            CallOutcome::Success => "success",
            CallOutcome::Rejected => "rejected",
            CallOutcome::InvalidResponse => "invalid_response",
            CallOutcome::TransportError => "transport_error",
        }
    }
}

/// Count one carrier call.
pub fn record_call(carrier: Carrier, operation: CarrierOperation, outcome: CallOutcome) {
    CARRIER_REQUESTS
        .with_label_values(&[carrier.as_str(), operation.as_str(), outcome.as_str()])
        .inc();
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once; repeat registrations are ignored.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(CARRIER_REQUESTS.clone()),
        Box::new(CARRIER_CALL_DURATION.clone()),
        Box::new(TOKEN_FETCHES.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard observing `CARRIER_CALL_DURATION` on drop.
pub struct CallTimer {
    carrier: Carrier,
    operation: CarrierOperation,
    start: std::time::Instant,
}

impl CallTimer {
    /// Start timing a carrier call.
    pub fn start(carrier: Carrier, operation: CarrierOperation) -> Self {
        Self {
            carrier,
            operation,
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for CallTimer {
    fn drop(&mut self) {
        CARRIER_CALL_DURATION
            .with_label_values(&[self.carrier.as_str(), self.operation.as_str()])
            .observe(self.start.elapsed().as_secs_f64());
    }
}

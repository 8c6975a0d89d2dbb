//! # Carrier Telemetry
//!
//! Logging and metrics for the carrier gateway.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` registry with an `EnvFilter` and a
//!   pretty or JSON fmt layer.
//! - **Metrics**: Prometheus counters and histograms for every carrier call.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use carrier_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("telemetry");
//!     // carrier calls are now logged and counted
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CARRIER_SERVICE_NAME` | `carrier-gateway` | Service name on every log line |
//! | `CARRIER_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `CARRIER_JSON_LOGS` | `false` (`true` in containers) | JSON log output |
//! | `CARRIER_CONSOLE_OUTPUT` | `true` | Write logs to stderr |

#![warn(missing_docs)]

mod config;
mod instrumented;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use instrumented::send_checked;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, record_call, register_metrics, CallOutcome, CallTimer, CARRIER_REQUESTS,
    CARRIER_CALL_DURATION, TOKEN_FETCHES,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The global subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Prometheus registration or encoding failed.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// A configuration value is unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and register metrics.
///
/// Returns a guard that must be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    register_metrics()?;
    init_logging(&config)?;

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry");
    }
}

/// Log a carrier event with the standard `carrier` / `operation` fields.
#[macro_export]
macro_rules! log_carrier_event {
    ($level:ident, $carrier:expr, $operation:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            carrier = %$carrier,
            operation = %$operation,
            $($($field)*,)?
            $msg
        )
    };
}

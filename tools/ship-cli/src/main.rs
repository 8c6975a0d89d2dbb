//! ship-cli: operator tool for the carrier gateway.
//!
//! Builds one carrier client from the environment, runs a single
//! operation against it and prints the result as JSON on stdout. Logs go
//! to stderr.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use carrier_registry::{create_carrier_client, CarrierRegistry, RateQuoter, StaticRateTable};
use carrier_telemetry::{encode_metrics, init_telemetry, TelemetryConfig};
use shared_types::{Carrier, RateRequest, ShipmentRequest, ShippingCarrierClient, TrackingRequest};

/// Carrier gateway operator CLI
#[derive(Parser, Debug)]
#[command(name = "ship-cli")]
#[command(about = "Track parcels, quote rates and buy labels from the command line")]
struct Args {
    /// Print Prometheus metrics to stderr when done
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Current tracking status of one parcel
    Track {
        /// Carrier name (dhl, canada_post)
        #[arg(short, long)]
        carrier: Carrier,
        /// Tracking number or PIN
        #[arg(short, long)]
        tracking_number: String,
    },
    /// Rates for a parcel, falling back to the static table
    Rates {
        /// Carrier name (dhl, canada_post)
        #[arg(short, long)]
        carrier: Carrier,
        /// JSON file holding a rate request
        #[arg(short, long)]
        request: PathBuf,
        /// JSON file replacing the built-in static rate table
        #[arg(long)]
        rate_table: Option<PathBuf>,
    },
    /// Buy a label
    Ship {
        /// Carrier name (dhl, canada_post)
        #[arg(short, long)]
        carrier: Carrier,
        /// JSON file holding a shipment request
        #[arg(short, long)]
        request: PathBuf,
        /// Write an inline label document here
        #[arg(long)]
        label_out: Option<PathBuf>,
    },
    /// Carriers with credentials in the environment
    Carriers,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to encode result")?;
    println!("{text}");
    Ok(())
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Track {
            carrier,
            tracking_number,
        } => {
            let client = create_carrier_client(carrier)
                .with_context(|| format!("Failed to configure {carrier}"))?;
            let info = client
                .track_shipment(&TrackingRequest::new(tracking_number))
                .await
                .context("Tracking failed")?;
            print_json(&info)
        }
        Command::Rates {
            carrier,
            request,
            rate_table,
        } => {
            let request: RateRequest = read_json(&request)?;
            let quoter = match rate_table {
                Some(path) => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    RateQuoter::new(StaticRateTable::from_json(&text)?)
                }
                None => RateQuoter::default(),
            };
            let client = create_carrier_client(carrier)
                .with_context(|| format!("Failed to configure {carrier}"))?;
            let rates = quoter
                .quote(client.as_ref(), &request)
                .await
                .context("Rate quote failed")?;
            print_json(&rates)
        }
        Command::Ship {
            carrier,
            request,
            label_out,
        } => {
            let request: ShipmentRequest = read_json(&request)?;
            let client = create_carrier_client(carrier)
                .with_context(|| format!("Failed to configure {carrier}"))?;
            let shipment = client
                .create_shipment(&request)
                .await
                .context("Shipment creation failed")?;

            if let Some(path) = label_out {
                match shipment.label.decode()? {
                    Some(bytes) => {
                        std::fs::write(&path, &bytes)
                            .with_context(|| format!("Failed to write {}", path.display()))?;
                        info!(path = %path.display(), bytes = bytes.len(), "Label written");
                    }
                    // The label is already bought; report it rather than fail.
                    None => warn!(
                        carrier = %carrier,
                        "Carrier returned a label link, not a document; nothing written"
                    ),
                }
            }
            print_json(&shipment)
        }
        Command::Carriers => {
            let registry = CarrierRegistry::from_env().context("Failed to build carrier registry")?;
            let names: Vec<&str> = registry.carriers().iter().map(Carrier::as_str).collect();
            print_json(&names)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _guard = init_telemetry(TelemetryConfig::for_service("ship-cli"))
        .context("Failed to initialize telemetry")?;
    info!(version = env!("CARGO_PKG_VERSION"), "ship-cli starting");

    let outcome = run(args.command).await;

    if args.metrics {
        eprintln!("{}", encode_metrics().context("Failed to encode metrics")?);
    }
    outcome
}

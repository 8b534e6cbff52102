//! `lmk` — LastMile Kit command line.
//!
//! Three subcommands mirror the protocol surface: `place-order` (dispatcher),
//! `confirm` (deliverer) and `status` (dispatcher lookup).  Confirmation
//! prints the classifier's rendered message and exits 0 only when the
//! shipment is known delivered (fresh or replayed).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lmk_client::{classify_confirm, precheck, ConfirmMessage, DeliveryClient};
use lmk_schemas::ConfirmDeliveryRequest;

const DEFAULT_API_BASE: &str = "http://localhost:3000/api";
const DEFAULT_DELIVERER: &str = "DeliveryBoy01";

#[derive(Parser)]
#[command(name = "lmk")]
#[command(about = "LastMile Kit CLI", long_about = None)]
struct Cli {
    /// API base URL (overrides LMK_API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Place an order and print the shipment id + OTP
    PlaceOrder {
        /// Customer the shipment is addressed to
        #[arg(long)]
        customer: String,
    },

    /// Confirm a delivery by presenting shipment id + OTP
    Confirm {
        /// Shipment id issued at order placement
        #[arg(long)]
        shipment_id: String,

        /// One-time confirmation code, compared exactly as typed
        #[arg(long)]
        otp: String,

        /// Deliverer label recorded on the shipment (or LMK_DELIVERER)
        #[arg(long)]
        delivered_by: Option<String>,
    },

    /// Print the dispatcher-side status of one shipment
    Status {
        /// Shipment id
        #[arg(long)]
        shipment_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env.local if present (dev convenience).
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();
    let base = cli
        .api_base
        .clone()
        .or_else(|| std::env::var("LMK_API_BASE").ok())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    tracing::debug!(%base, "api base");
    let client = DeliveryClient::new(base);

    match cli.cmd {
        Commands::PlaceOrder { customer } => {
            let new = client
                .place_order(&customer)
                .await
                .context("place-order failed")?;
            println!("shipment_id={}", new.shipment_id);
            println!("otp_code={}", new.otp_code);
        }

        Commands::Confirm {
            shipment_id,
            otp,
            delivered_by,
        } => {
            let delivered_by = delivered_by
                .or_else(|| std::env::var("LMK_DELIVERER").ok())
                .unwrap_or_else(|| DEFAULT_DELIVERER.to_string());

            // Local preconditions first; neither reaches the network.
            let msg = match precheck(&shipment_id, &otp) {
                Some(local) => local,
                None => {
                    let transport = client
                        .confirm_delivery(&ConfirmDeliveryRequest {
                            shipment_id,
                            otp,
                            delivered_by,
                        })
                        .await;
                    classify_confirm(&transport)
                }
            };

            println!("{}", render(&msg));
            if !msg.indicates_delivery() {
                std::process::exit(1);
            }
        }

        Commands::Status { shipment_id } => {
            let view = client
                .shipment_status(&shipment_id)
                .await
                .context("status lookup failed")?;
            match view {
                Some(v) => {
                    println!("shipment_id={}", v.shipment_id);
                    println!("customer_name={}", v.customer_name);
                    println!("status={}", v.status);
                    if let Some(by) = v.delivered_by {
                        println!("delivered_by={by}");
                    }
                    if let Some(at) = v.delivered_at {
                        println!("delivered_at={}", at.to_rfc3339());
                    }
                }
                None => {
                    println!("Shipment ID not found");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();
}

/// Render with LMK_DISPLAY_TZ when set to a valid IANA name, the machine's
/// local zone otherwise.
fn render(msg: &ConfirmMessage) -> String {
    match display_tz() {
        Some(tz) => msg.render(&tz),
        None => msg.render(&chrono::Local),
    }
}

fn display_tz() -> Option<chrono_tz::Tz> {
    std::env::var("LMK_DISPLAY_TZ").ok()?.parse().ok()
}

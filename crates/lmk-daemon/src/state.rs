//! Shared runtime state for lmk-daemon.
//!
//! Handlers receive `State<Arc<AppState>>` from Axum.  The shipment table is
//! owned here, not process-global: tests construct as many independent
//! `AppState`s as they need.

use lmk_shipments::ShipmentStore;

use crate::config::{DaemonConfig, WireEncoding};

/// Static build metadata included in health responses.
#[derive(Clone, Debug)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

/// Handle shared (via `Arc`) across all Axum handlers.
pub struct AppState {
    /// The system of record for shipments.
    pub store: ShipmentStore,
    /// Static build metadata.
    pub build: BuildInfo,
    /// Active wire encoding for confirmation outcomes, fixed at boot.
    pub encoding: WireEncoding,
}

impl AppState {
    pub fn new(config: &DaemonConfig) -> Self {
        Self::with_options(config.otp_digits, config.encoding)
    }

    /// Direct constructor for tests that skip the env-config layer.
    pub fn with_options(otp_digits: u8, encoding: WireEncoding) -> Self {
        Self {
            store: ShipmentStore::with_otp_digits(otp_digits),
            build: BuildInfo {
                service: "lmk-daemon",
                version: env!("CARGO_PKG_VERSION"),
            },
            encoding,
        }
    }
}

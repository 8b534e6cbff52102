//! In-memory shipment table.
//!
//! # Locking discipline
//!
//! The table is `RwLock<HashMap<id, Arc<Mutex<ShipmentRecord>>>>`:
//!
//! - The map lock is held only to insert a record or clone its handle,
//!   never across a confirmation.
//! - Each record's mutex scopes the compare-and-set performed by
//!   [`ShipmentRecord::confirm`], so contention is per shipment id only.
//! - No `.await` runs while a record lock is held; the critical section is
//!   pure (see `shipment.rs`).
//!
//! The store is explicitly owned: the daemon constructs one and hands it to
//! handlers through shared state. Tests build as many independent stores as
//! they need.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::otp::{generate_otp, DEFAULT_OTP_DIGITS, MAX_OTP_DIGITS, MIN_OTP_DIGITS};
use crate::shipment::{ConfirmOutcome, DeliveryStatus, ShipmentRecord};

// ---------------------------------------------------------------------------
// CreateOrderError
// ---------------------------------------------------------------------------

/// Rejection of a place-order request. No side effect has occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOrderError {
    /// `customer_name` was empty after trimming.
    EmptyCustomerName,
}

impl std::fmt::Display for CreateOrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreateOrderError::EmptyCustomerName => {
                write!(f, "customer_name must not be empty")
            }
        }
    }
}

impl std::error::Error for CreateOrderError {}

// ---------------------------------------------------------------------------
// NewShipment / ShipmentView
// ---------------------------------------------------------------------------

/// What the dispatcher gets back from a successful place-order call. The
/// only channel through which the OTP ever leaves the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShipment {
    pub shipment_id: String,
    pub otp_code: String,
}

/// Read-only snapshot of one shipment. Carries no OTP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentView {
    pub shipment_id: String,
    pub customer_name: String,
    pub status: DeliveryStatus,
}

// ---------------------------------------------------------------------------
// ShipmentStore
// ---------------------------------------------------------------------------

/// Owned, concurrent shipment table: the system of record.
#[derive(Debug)]
pub struct ShipmentStore {
    shipments: RwLock<HashMap<String, Arc<Mutex<ShipmentRecord>>>>,
    otp_digits: u8,
}

impl ShipmentStore {
    /// Store with the default OTP width.
    pub fn new() -> Self {
        Self::with_otp_digits(DEFAULT_OTP_DIGITS)
    }

    /// Store with an explicit OTP width. The config layer validates the
    /// range; this constructor only debug-asserts it.
    pub fn with_otp_digits(otp_digits: u8) -> Self {
        debug_assert!(
            (MIN_OTP_DIGITS..=MAX_OTP_DIGITS).contains(&otp_digits),
            "otp width {otp_digits} outside {MIN_OTP_DIGITS}..={MAX_OTP_DIGITS}"
        );
        Self {
            shipments: RwLock::new(HashMap::new()),
            otp_digits,
        }
    }

    /// Create a shipment in `Pending` state and return its id + OTP.
    ///
    /// `customer_name` must be non-empty after trimming; it is stored
    /// exactly as supplied. The id is a fresh UUID v4; the OTP is never
    /// reissued for the same id.
    ///
    /// # Errors
    /// [`CreateOrderError::EmptyCustomerName`] when validation fails; the
    /// store is untouched.
    pub async fn create_order(&self, customer_name: &str) -> Result<NewShipment, CreateOrderError> {
        if customer_name.trim().is_empty() {
            return Err(CreateOrderError::EmptyCustomerName);
        }

        let shipment_id = Uuid::new_v4().to_string();
        let otp_code = generate_otp(self.otp_digits);
        let record = ShipmentRecord::new(&shipment_id, customer_name, &otp_code);

        let mut map = self.shipments.write().await;
        map.insert(shipment_id.clone(), Arc::new(Mutex::new(record)));

        Ok(NewShipment {
            shipment_id,
            otp_code,
        })
    }

    /// Apply one confirmation attempt and return its canonical outcome.
    ///
    /// Under concurrent attempts for the same id, exactly one caller
    /// observes `Delivered`; every other caller observes `AlreadyDelivered`
    /// with the identical receipt. Attempts against unknown ids or with a
    /// wrong OTP never mutate anything.
    pub async fn confirm_delivery(
        &self,
        shipment_id: &str,
        otp: &str,
        delivered_by: &str,
    ) -> ConfirmOutcome {
        let Some(record) = self.lookup(shipment_id).await else {
            return ConfirmOutcome::NotFound;
        };

        let mut rec = record.lock().await;
        rec.confirm(otp, delivered_by, Utc::now())
    }

    /// Snapshot one shipment for status display. `None` for unknown ids.
    pub async fn shipment_view(&self, shipment_id: &str) -> Option<ShipmentView> {
        let record = self.lookup(shipment_id).await?;
        let rec = record.lock().await;
        Some(ShipmentView {
            shipment_id: rec.id().to_string(),
            customer_name: rec.customer_name().to_string(),
            status: rec.status().clone(),
        })
    }

    async fn lookup(&self, shipment_id: &str) -> Option<Arc<Mutex<ShipmentRecord>>> {
        let map = self.shipments.read().await;
        map.get(shipment_id).map(Arc::clone)
    }
}

impl Default for ShipmentStore {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

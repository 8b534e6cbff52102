//! Shipment record and delivery state machine.
//!
//! # Design
//!
//! A shipment has exactly two lifecycle states. Every confirmation attempt
//! is applied via [`ShipmentRecord::confirm`], which enforces two invariants:
//!
//! 1. **At-most-once delivery.** `Pending → Delivered` happens exactly once;
//!    no transition leaves `Delivered`.
//! 2. **No partial state.** The delivery evidence (`delivered_by`,
//!    `delivered_at`) lives *inside* the `Delivered` variant, so it is set
//!    in the same assignment as the status flip and can never exist without
//!    it, nor be overwritten after it.
//!
//! # State diagram
//!
//! ```text
//!              confirm(correct otp)
//!   Pending ─────────────────────────► Delivered (terminal)
//!      │                                   │
//!      │ confirm(wrong otp): InvalidOtp    │ confirm(any otp): AlreadyDelivered
//!      └── stays Pending                   └── stays Delivered, same receipt
//! ```
//!
//! Pure deterministic logic: no IO, no wall-clock. The caller provides `now`.

use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// DeliveryStatus
// ---------------------------------------------------------------------------

/// Lifecycle state of a shipment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// Created, awaiting confirmation.
    Pending,
    /// Confirmed exactly once. **Terminal.**
    Delivered {
        delivered_by: String,
        delivered_at: DateTime<Utc>,
    },
}

impl DeliveryStatus {
    /// Returns `true` once the shipment has been delivered.
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    /// Wire label for this state: "pending" | "delivered".
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Delivered { .. } => "delivered",
        }
    }
}

// ---------------------------------------------------------------------------
// DeliveryReceipt
// ---------------------------------------------------------------------------

/// Evidence of a completed delivery, identical on the fresh transition and
/// on every later replay of the same shipment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub shipment_id: String,
    pub customer_name: String,
    pub delivered_by: String,
    pub delivered_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// ConfirmOutcome
// ---------------------------------------------------------------------------

/// Canonical result of a confirmation attempt.
///
/// This is the single internal representation of every confirmation result;
/// the HTTP boundary translates it to whichever wire encoding is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// This attempt performed the `Pending → Delivered` transition.
    Delivered(DeliveryReceipt),
    /// The shipment was already delivered; receipt is the original one.
    AlreadyDelivered(DeliveryReceipt),
    /// OTP mismatch against a still-pending shipment. No state change.
    InvalidOtp,
    /// No shipment with the given id exists. No state change.
    NotFound,
}

impl ConfirmOutcome {
    /// Stable label used in logs and by tests: "delivered" |
    /// "already_delivered" | "invalid_otp" | "not_found".
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delivered(_) => "delivered",
            Self::AlreadyDelivered(_) => "already_delivered",
            Self::InvalidOtp => "invalid_otp",
            Self::NotFound => "not_found",
        }
    }

    /// The receipt carried by `Delivered` / `AlreadyDelivered`, if any.
    pub fn receipt(&self) -> Option<&DeliveryReceipt> {
        match self {
            Self::Delivered(r) | Self::AlreadyDelivered(r) => Some(r),
            Self::InvalidOtp | Self::NotFound => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ShipmentRecord
// ---------------------------------------------------------------------------

/// One shipment tracked through the delivery state machine.
///
/// `otp_code` and `status` are private: the OTP must never leak past this
/// crate (status lookups omit it), and the only mutation path is
/// [`confirm`][`ShipmentRecord::confirm`].
#[derive(Debug, Clone)]
pub struct ShipmentRecord {
    id: String,
    customer_name: String,
    otp_code: String,
    status: DeliveryStatus,
}

impl ShipmentRecord {
    /// Create a new record in the `Pending` state.
    pub fn new(
        id: impl Into<String>,
        customer_name: impl Into<String>,
        otp_code: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            customer_name: customer_name.into(),
            otp_code: otp_code.into(),
            status: DeliveryStatus::Pending,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn status(&self) -> &DeliveryStatus {
        &self.status
    }

    /// Apply one confirmation attempt.
    ///
    /// The OTP is compared exactly as supplied: no trimming, no case
    /// folding. A wrong OTP on a delivered shipment still reports
    /// `AlreadyDelivered`; the delivered fact dominates once the OTP has
    /// served its purpose.
    ///
    /// There is no attempt counter and no lockout on repeated wrong OTPs
    /// (inherited demo scope, kept deliberately).
    ///
    /// `now` becomes `delivered_at` when this attempt wins the transition.
    pub fn confirm(
        &mut self,
        otp: &str,
        delivered_by: &str,
        now: DateTime<Utc>,
    ) -> ConfirmOutcome {
        match &self.status {
            // Terminal: replay the original receipt, whatever the OTP.
            DeliveryStatus::Delivered {
                delivered_by,
                delivered_at,
            } => ConfirmOutcome::AlreadyDelivered(DeliveryReceipt {
                shipment_id: self.id.clone(),
                customer_name: self.customer_name.clone(),
                delivered_by: delivered_by.clone(),
                delivered_at: *delivered_at,
            }),

            DeliveryStatus::Pending => {
                if otp != self.otp_code {
                    return ConfirmOutcome::InvalidOtp;
                }

                // Single assignment: status flip + evidence, atomically.
                self.status = DeliveryStatus::Delivered {
                    delivered_by: delivered_by.to_string(),
                    delivered_at: now,
                };

                ConfirmOutcome::Delivered(DeliveryReceipt {
                    shipment_id: self.id.clone(),
                    customer_name: self.customer_name.clone(),
                    delivered_by: delivered_by.to_string(),
                    delivered_at: now,
                })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn pending_record() -> ShipmentRecord {
        ShipmentRecord::new("ship-test", "Asha", "4821")
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()
    }

    #[test]
    fn new_record_starts_pending() {
        let rec = pending_record();
        assert_eq!(*rec.status(), DeliveryStatus::Pending);
        assert!(!rec.status().is_delivered());
    }

    #[test]
    fn correct_otp_delivers_once() {
        let mut rec = pending_record();
        let outcome = rec.confirm("4821", "Raj", t0());

        match outcome {
            ConfirmOutcome::Delivered(r) => {
                assert_eq!(r.shipment_id, "ship-test");
                assert_eq!(r.customer_name, "Asha");
                assert_eq!(r.delivered_by, "Raj");
                assert_eq!(r.delivered_at, t0());
            }
            other => panic!("expected Delivered, got {other:?}"),
        }
        assert!(rec.status().is_delivered());
    }

    #[test]
    fn repeat_confirm_replays_identical_receipt() {
        let mut rec = pending_record();
        let first = rec.confirm("4821", "Raj", t0());
        let first_receipt = first.receipt().unwrap().clone();

        // Later attempt, different deliverer, different clock, wrong OTP.
        let later = t0() + chrono::Duration::minutes(42);
        let second = rec.confirm("0000", "Kiran", later);

        match second {
            ConfirmOutcome::AlreadyDelivered(r) => {
                assert_eq!(r, first_receipt, "receipt must never change");
                assert_eq!(r.delivered_by, "Raj");
                assert_eq!(r.delivered_at, t0());
            }
            other => panic!("expected AlreadyDelivered, got {other:?}"),
        }
    }

    #[test]
    fn wrong_otp_does_not_mutate() {
        let mut rec = pending_record();
        let outcome = rec.confirm("0000", "Raj", t0());

        assert_eq!(outcome, ConfirmOutcome::InvalidOtp);
        assert_eq!(*rec.status(), DeliveryStatus::Pending);
    }

    #[test]
    fn wrong_otp_does_not_lock_out_correct_one() {
        let mut rec = pending_record();
        assert_eq!(rec.confirm("9999", "Raj", t0()), ConfirmOutcome::InvalidOtp);

        let outcome = rec.confirm("4821", "Raj", t0());
        assert!(matches!(outcome, ConfirmOutcome::Delivered(_)));
    }

    #[test]
    fn otp_is_compared_exactly() {
        // No trimming, no normalization: whitespace and padding matter.
        let mut rec = pending_record();
        assert_eq!(
            rec.confirm(" 4821", "Raj", t0()),
            ConfirmOutcome::InvalidOtp
        );
        assert_eq!(
            rec.confirm("4821 ", "Raj", t0()),
            ConfirmOutcome::InvalidOtp
        );
        assert_eq!(rec.confirm("04821", "Raj", t0()), ConfirmOutcome::InvalidOtp);
        assert_eq!(*rec.status(), DeliveryStatus::Pending);
    }

    #[test]
    fn outcome_labels_are_stable() {
        let mut rec = pending_record();
        assert_eq!(rec.confirm("0000", "Raj", t0()).as_str(), "invalid_otp");
        assert_eq!(rec.confirm("4821", "Raj", t0()).as_str(), "delivered");
        assert_eq!(
            rec.confirm("4821", "Raj", t0()).as_str(),
            "already_delivered"
        );
        assert_eq!(ConfirmOutcome::NotFound.as_str(), "not_found");
    }
}

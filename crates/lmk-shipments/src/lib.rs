//! lmk-shipments
//!
//! Domain core of the LastMile Kit: the shipment record, the delivery
//! confirmation state machine, the concurrent in-memory store, and OTP
//! generation.  No HTTP, no wire types — the daemon translates outcomes to
//! the boundary; this crate only decides them.

pub mod otp;
pub mod shipment;
pub mod store;

pub use otp::{generate_otp, DEFAULT_OTP_DIGITS, MAX_OTP_DIGITS, MIN_OTP_DIGITS};
pub use shipment::{ConfirmOutcome, DeliveryReceipt, DeliveryStatus, ShipmentRecord};
pub use store::{CreateOrderError, NewShipment, ShipmentStore, ShipmentView};

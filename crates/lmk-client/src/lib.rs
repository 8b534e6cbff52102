//! lmk-client
//!
//! Deliverer/dispatcher side of the LastMile Kit protocol: a thin reqwest
//! transport (`api`) and the total outcome classifier with its display
//! messages (`message`).  The classifier accepts both wire encodings the
//! daemon can emit and maps every possible response — including unexpected
//! ones — to exactly one user-facing message.

pub mod api;
pub mod message;

pub use api::{ClientError, DeliveryClient};
pub use message::{classify_confirm, format_hhmm, precheck, ConfirmMessage, ConfirmTransport};

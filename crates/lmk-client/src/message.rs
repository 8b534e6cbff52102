//! Outcome classification and display messages.
//!
//! `classify_confirm` is a **total** function over the confirmation
//! boundary contract: every status/body combination a server can produce —
//! plus "no response at all" — lands in exactly one `ConfirmMessage`
//! variant.  Unknown shapes become `UnexpectedResponse`; nothing is merged,
//! dropped, or allowed to panic.
//!
//! Local preconditions (`precheck`) run before any network call, so a blank
//! shipment id or OTP never reaches the wire.

use chrono::{DateTime, TimeZone, Utc};
use lmk_schemas::ConfirmDeliveryResponse;

// ---------------------------------------------------------------------------
// ConfirmTransport
// ---------------------------------------------------------------------------

/// What the transport layer handed back for one confirmation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmTransport {
    /// No response obtained (connectivity failure). Safe to retry: the
    /// server applied no state change for this attempt from our view.
    NoResponse,
    /// A response arrived; classification happens on status + raw body.
    Response { status: u16, body: String },
}

// ---------------------------------------------------------------------------
// ConfirmMessage
// ---------------------------------------------------------------------------

/// The finite set of user-facing results of a confirmation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmMessage {
    /// Local precondition: `shipment_id` was empty. No network call made.
    MissingShipmentId,
    /// Local precondition: `otp` was empty. No network call made.
    MissingOtp,
    /// Transport failure; distinct from every server-reported outcome.
    NetworkError,
    ShipmentNotFound,
    WrongOtp,
    /// This attempt performed the delivery.
    Delivered {
        customer_name: String,
        shipment_id: String,
        delivered_by: String,
        delivered_at: DateTime<Utc>,
    },
    /// Someone else already delivered it; fields are the original receipt.
    AlreadyDelivered {
        shipment_id: String,
        delivered_by: String,
        delivered_at: DateTime<Utc>,
    },
    /// Any other non-success status.
    ServerError,
    /// A response arrived but matched no known shape. Surfaced, never
    /// swallowed or misread as success.
    UnexpectedResponse,
}

impl ConfirmMessage {
    /// True when the shipment is known delivered (fresh or replayed).
    pub fn indicates_delivery(&self) -> bool {
        matches!(
            self,
            ConfirmMessage::Delivered { .. } | ConfirmMessage::AlreadyDelivered { .. }
        )
    }

    /// Render the fixed English display text. Timestamps are formatted as
    /// 24-hour `HH:MM` in the given zone; see [`format_hhmm`].
    pub fn render<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        match self {
            ConfirmMessage::MissingShipmentId => "Shipment ID is missing".to_string(),
            ConfirmMessage::MissingOtp => "OTP is missing".to_string(),
            ConfirmMessage::NetworkError => "Network error. Backend not reachable.".to_string(),
            ConfirmMessage::ShipmentNotFound => "Shipment ID not found".to_string(),
            ConfirmMessage::WrongOtp => "Wrong OTP, please re-type".to_string(),
            ConfirmMessage::Delivered {
                customer_name,
                shipment_id,
                delivered_by,
                delivered_at,
            } => format!(
                "Successfully delivered to {customer_name}\nShipment {shipment_id} confirmed by {delivered_by} at {}",
                format_hhmm(*delivered_at, tz)
            ),
            ConfirmMessage::AlreadyDelivered {
                shipment_id,
                delivered_by,
                delivered_at,
            } => format!(
                "Shipment already delivered\nShipment {shipment_id} was delivered by {delivered_by} at {}",
                format_hhmm(*delivered_at, tz)
            ),
            ConfirmMessage::ServerError => "Server error. Please try again.".to_string(),
            ConfirmMessage::UnexpectedResponse => "Unexpected server response".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// precheck / classify
// ---------------------------------------------------------------------------

/// Local precondition check, run before any network call.
///
/// Inputs are opaque: an all-whitespace id or OTP is *not* empty and goes to
/// the server as-is.
pub fn precheck(shipment_id: &str, otp: &str) -> Option<ConfirmMessage> {
    if shipment_id.is_empty() {
        return Some(ConfirmMessage::MissingShipmentId);
    }
    if otp.is_empty() {
        return Some(ConfirmMessage::MissingOtp);
    }
    None
}

/// Map a transport result to exactly one display message.
///
/// Handles both wire encodings: status-coded (404 / 401 / 409 / 200) and
/// body-coded (outcome tagged in a 200 body).  A 409 whose body is not the
/// already-delivered shape, or a 2xx whose body is not one of the three
/// known tags, is `UnexpectedResponse`.
pub fn classify_confirm(t: &ConfirmTransport) -> ConfirmMessage {
    let (status, body) = match t {
        ConfirmTransport::NoResponse => return ConfirmMessage::NetworkError,
        ConfirmTransport::Response { status, body } => (*status, body.as_str()),
    };

    match status {
        404 => ConfirmMessage::ShipmentNotFound,
        401 => ConfirmMessage::WrongOtp,
        409 => match serde_json::from_str::<ConfirmDeliveryResponse>(body) {
            Ok(ConfirmDeliveryResponse::AlreadyDelivered {
                shipment_id,
                delivered_by,
                delivered_at,
            }) => ConfirmMessage::AlreadyDelivered {
                shipment_id,
                delivered_by,
                delivered_at,
            },
            _ => ConfirmMessage::UnexpectedResponse,
        },
        s if (200..300).contains(&s) => match serde_json::from_str::<ConfirmDeliveryResponse>(body)
        {
            Ok(ConfirmDeliveryResponse::Delivered {
                shipment_id,
                customer_name,
                delivered_by,
                delivered_at,
            }) => ConfirmMessage::Delivered {
                customer_name,
                shipment_id,
                delivered_by,
                delivered_at,
            },
            Ok(ConfirmDeliveryResponse::AlreadyDelivered {
                shipment_id,
                delivered_by,
                delivered_at,
            }) => ConfirmMessage::AlreadyDelivered {
                shipment_id,
                delivered_by,
                delivered_at,
            },
            Ok(ConfirmDeliveryResponse::InvalidOtp) => ConfirmMessage::WrongOtp,
            Err(_) => ConfirmMessage::UnexpectedResponse,
        },
        _ => ConfirmMessage::ServerError,
    }
}

// ---------------------------------------------------------------------------
// Time formatting
// ---------------------------------------------------------------------------

/// Render a timestamp as 24-hour `HH:MM` in the given zone.
///
/// The zone is an explicit parameter so display stays deterministic under
/// test (`chrono_tz::Tz`) and follows the machine zone in production
/// (`chrono::Local`).  The format is fixed, never locale-dependent.
pub fn format_hhmm<Tz: TimeZone>(ts: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.with_timezone(tz).format("%H:%M").to_string()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()
    }

    fn resp(status: u16, body: &str) -> ConfirmTransport {
        ConfirmTransport::Response {
            status,
            body: body.to_string(),
        }
    }

    fn delivered_body() -> String {
        serde_json::json!({
            "status": "delivered",
            "shipment_id": "S1",
            "customer_name": "Asha",
            "delivered_by": "Raj",
            "delivered_at": t0().to_rfc3339(),
        })
        .to_string()
    }

    fn already_delivered_body() -> String {
        serde_json::json!({
            "status": "already_delivered",
            "shipment_id": "S1",
            "delivered_by": "Raj",
            "delivered_at": t0().to_rfc3339(),
        })
        .to_string()
    }

    // -- precheck -----------------------------------------------------------

    #[test]
    fn precheck_flags_empty_fields_id_first() {
        assert_eq!(precheck("", ""), Some(ConfirmMessage::MissingShipmentId));
        assert_eq!(precheck("", "4821"), Some(ConfirmMessage::MissingShipmentId));
        assert_eq!(precheck("S1", ""), Some(ConfirmMessage::MissingOtp));
        assert_eq!(precheck("S1", "4821"), None);
    }

    #[test]
    fn precheck_does_not_trim() {
        // Whitespace is opaque input; the server compares it exactly.
        assert_eq!(precheck(" ", " "), None);
    }

    // -- classify: every branch --------------------------------------------

    #[test]
    fn no_response_is_network_error() {
        assert_eq!(
            classify_confirm(&ConfirmTransport::NoResponse),
            ConfirmMessage::NetworkError
        );
    }

    #[test]
    fn status_404_is_not_found() {
        assert_eq!(
            classify_confirm(&resp(404, r#"{"error":"shipment not found"}"#)),
            ConfirmMessage::ShipmentNotFound
        );
    }

    #[test]
    fn status_401_is_wrong_otp() {
        assert_eq!(
            classify_confirm(&resp(401, r#"{"error":"invalid otp"}"#)),
            ConfirmMessage::WrongOtp
        );
    }

    #[test]
    fn status_409_with_receipt_body_is_already_delivered() {
        let msg = classify_confirm(&resp(409, &already_delivered_body()));
        assert_eq!(
            msg,
            ConfirmMessage::AlreadyDelivered {
                shipment_id: "S1".to_string(),
                delivered_by: "Raj".to_string(),
                delivered_at: t0(),
            }
        );
    }

    #[test]
    fn status_409_with_wrong_or_junk_body_is_unexpected() {
        assert_eq!(
            classify_confirm(&resp(409, "not json")),
            ConfirmMessage::UnexpectedResponse
        );
        assert_eq!(
            classify_confirm(&resp(409, r#"{"status":"weird"}"#)),
            ConfirmMessage::UnexpectedResponse
        );
        // A 409 must carry the already-delivered shape, not a fresh delivery.
        assert_eq!(
            classify_confirm(&resp(409, &delivered_body())),
            ConfirmMessage::UnexpectedResponse
        );
    }

    #[test]
    fn status_200_delivered_body() {
        let msg = classify_confirm(&resp(200, &delivered_body()));
        assert_eq!(
            msg,
            ConfirmMessage::Delivered {
                customer_name: "Asha".to_string(),
                shipment_id: "S1".to_string(),
                delivered_by: "Raj".to_string(),
                delivered_at: t0(),
            }
        );
    }

    #[test]
    fn status_200_body_coded_outcomes() {
        // Body-coded servers report these conditions via 200 + tag.
        assert!(matches!(
            classify_confirm(&resp(200, &already_delivered_body())),
            ConfirmMessage::AlreadyDelivered { .. }
        ));
        assert_eq!(
            classify_confirm(&resp(200, r#"{"status":"invalid_otp"}"#)),
            ConfirmMessage::WrongOtp
        );
    }

    #[test]
    fn status_200_with_unknown_tag_or_junk_is_unexpected() {
        assert_eq!(
            classify_confirm(&resp(200, r#"{"status":"shipped"}"#)),
            ConfirmMessage::UnexpectedResponse
        );
        assert_eq!(
            classify_confirm(&resp(200, "")),
            ConfirmMessage::UnexpectedResponse
        );
        // Known tag but missing required fields.
        assert_eq!(
            classify_confirm(&resp(200, r#"{"status":"delivered"}"#)),
            ConfirmMessage::UnexpectedResponse
        );
    }

    #[test]
    fn other_non_success_statuses_are_generic_server_errors() {
        for status in [400, 403, 418, 500, 502, 503] {
            assert_eq!(
                classify_confirm(&resp(status, "whatever")),
                ConfirmMessage::ServerError,
                "status {status}"
            );
        }
    }

    // -- rendering ----------------------------------------------------------

    #[test]
    fn format_hhmm_is_deterministic_per_zone() {
        // 09:26:53 UTC is 14:56 in Kolkata (+05:30); seconds are dropped.
        assert_eq!(format_hhmm(t0(), &chrono_tz::Asia::Kolkata), "14:56");
        assert_eq!(format_hhmm(t0(), &chrono_tz::UTC), "09:26");
    }

    #[test]
    fn delivered_message_carries_all_display_fields() {
        let msg = classify_confirm(&resp(200, &delivered_body()));
        let text = msg.render(&chrono_tz::Asia::Kolkata);
        assert_eq!(
            text,
            "Successfully delivered to Asha\nShipment S1 confirmed by Raj at 14:56"
        );
    }

    #[test]
    fn already_delivered_message_carries_receipt_fields() {
        let msg = classify_confirm(&resp(409, &already_delivered_body()));
        let text = msg.render(&chrono_tz::UTC);
        assert_eq!(
            text,
            "Shipment already delivered\nShipment S1 was delivered by Raj at 09:26"
        );
    }

    #[test]
    fn fixed_texts_for_field_free_variants() {
        let tz = chrono_tz::UTC;
        assert_eq!(ConfirmMessage::MissingShipmentId.render(&tz), "Shipment ID is missing");
        assert_eq!(ConfirmMessage::MissingOtp.render(&tz), "OTP is missing");
        assert_eq!(
            ConfirmMessage::NetworkError.render(&tz),
            "Network error. Backend not reachable."
        );
        assert_eq!(ConfirmMessage::ShipmentNotFound.render(&tz), "Shipment ID not found");
        assert_eq!(ConfirmMessage::WrongOtp.render(&tz), "Wrong OTP, please re-type");
        assert_eq!(
            ConfirmMessage::ServerError.render(&tz),
            "Server error. Please try again."
        );
        assert_eq!(
            ConfirmMessage::UnexpectedResponse.render(&tz),
            "Unexpected server response"
        );
    }

    #[test]
    fn only_delivery_outcomes_indicate_delivery() {
        assert!(classify_confirm(&resp(200, &delivered_body())).indicates_delivery());
        assert!(classify_confirm(&resp(409, &already_delivered_body())).indicates_delivery());
        for msg in [
            ConfirmMessage::MissingShipmentId,
            ConfirmMessage::MissingOtp,
            ConfirmMessage::NetworkError,
            ConfirmMessage::ShipmentNotFound,
            ConfirmMessage::WrongOtp,
            ConfirmMessage::ServerError,
            ConfirmMessage::UnexpectedResponse,
        ] {
            assert!(!msg.indicates_delivery(), "{msg:?}");
        }
    }
}

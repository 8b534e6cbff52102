//! Wire contract for the LastMile Kit HTTP API.
//!
//! Every request and response body that crosses the `/api` boundary is
//! defined here, `Serialize + Deserialize`, shared by the daemon (encode)
//! and the client (decode).  No business logic lives in this crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// POST /api/place-order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub customer_name: String,
}

/// Returned on 200. The OTP travels to the dispatcher here and nowhere else;
/// it is handed to the deliverer out-of-band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderResponse {
    pub shipment_id: String,
    pub otp_code: String,
}

// ---------------------------------------------------------------------------
// POST /api/confirm-delivery
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmDeliveryRequest {
    pub shipment_id: String,
    pub otp: String,
    pub delivered_by: String,
}

/// Confirmation outcome as it appears on the wire, tagged by `status`.
///
/// Under the status-coded encoding `Delivered` rides a 200 and
/// `AlreadyDelivered` a 409; under the body-coded encoding all three
/// variants ride a 200.  `not_found` never appears here — it is a 404 in
/// both encodings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConfirmDeliveryResponse {
    Delivered {
        shipment_id: String,
        customer_name: String,
        delivered_by: String,
        delivered_at: DateTime<Utc>,
    },
    AlreadyDelivered {
        shipment_id: String,
        delivered_by: String,
        delivered_at: DateTime<Utc>,
    },
    InvalidOtp,
}

// ---------------------------------------------------------------------------
// GET /api/shipments/{id}
// ---------------------------------------------------------------------------

/// Dispatcher-side status lookup. Never carries the OTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentStatusResponse {
    pub shipment_id: String,
    pub customer_name: String,
    /// "pending" | "delivered"
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// GET /api/health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
    pub version: String,
}

// ---------------------------------------------------------------------------
// Error body (400 / 401 / 404)
// ---------------------------------------------------------------------------

/// Generic error body for status-coded failures. Clients classify on the
/// HTTP status; `error` is a human-readable hint only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()
    }

    // The `status` tag values are the wire contract; both the daemon and
    // any foreign client key on them exactly.
    #[test]
    fn confirm_response_is_tagged_by_snake_case_status() {
        let delivered = ConfirmDeliveryResponse::Delivered {
            shipment_id: "S1".to_string(),
            customer_name: "Asha".to_string(),
            delivered_by: "Raj".to_string(),
            delivered_at: t0(),
        };
        let v = serde_json::to_value(&delivered).unwrap();
        assert_eq!(v["status"], "delivered");
        assert_eq!(v["customer_name"], "Asha");

        let already = ConfirmDeliveryResponse::AlreadyDelivered {
            shipment_id: "S1".to_string(),
            delivered_by: "Raj".to_string(),
            delivered_at: t0(),
        };
        assert_eq!(serde_json::to_value(&already).unwrap()["status"], "already_delivered");

        assert_eq!(
            serde_json::to_value(ConfirmDeliveryResponse::InvalidOtp).unwrap(),
            serde_json::json!({ "status": "invalid_otp" })
        );
    }

    #[test]
    fn unknown_status_tags_fail_to_decode() {
        let err = serde_json::from_str::<ConfirmDeliveryResponse>(r#"{"status":"shipped"}"#);
        assert!(err.is_err(), "unknown tags must be decode errors, not a guess");
    }

    #[test]
    fn delivered_at_round_trips_as_rfc3339() {
        let json = serde_json::json!({
            "status": "already_delivered",
            "shipment_id": "S1",
            "delivered_by": "Raj",
            "delivered_at": "2026-03-14T09:26:53Z",
        });
        let decoded: ConfirmDeliveryResponse = serde_json::from_value(json).unwrap();
        match decoded {
            ConfirmDeliveryResponse::AlreadyDelivered { delivered_at, .. } => {
                assert_eq!(delivered_at, t0());
            }
            other => panic!("expected AlreadyDelivered, got {other:?}"),
        }
    }

    #[test]
    fn status_view_omits_absent_delivery_fields() {
        let pending = ShipmentStatusResponse {
            shipment_id: "S1".to_string(),
            customer_name: "Asha".to_string(),
            status: "pending".to_string(),
            delivered_by: None,
            delivered_at: None,
        };
        let v = serde_json::to_value(&pending).unwrap();
        assert!(v.get("delivered_by").is_none());
        assert!(v.get("delivered_at").is_none());
    }
}

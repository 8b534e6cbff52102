//! Axum router and all HTTP handlers for lmk-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers.  Handlers are `pub(crate)`; the scenario tests in
//! `tests/` compose the router through `build_router` directly.
//!
//! Outcome-to-wire translation happens here and only here: the store returns
//! one `ConfirmOutcome`, and `encode_outcome` writes it in whichever wire
//! encoding the deployment selected (see `config::WireEncoding`).

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::info;

use lmk_schemas::{
    ConfirmDeliveryRequest, ConfirmDeliveryResponse, ErrorResponse, HealthResponse,
    PlaceOrderRequest, PlaceOrderResponse, ShipmentStatusResponse,
};
use lmk_shipments::{ConfirmOutcome, DeliveryReceipt, DeliveryStatus};

use crate::config::WireEncoding;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the complete application router wired to the given shared state.
///
/// Middleware layers (CORS, tracing) are **not** applied here; `main.rs`
/// attaches them after this call so tests can use the bare router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/place-order", post(place_order))
        .route("/api/confirm-delivery", post(confirm_delivery))
        .route("/api/shipments/:id", get(shipment_status))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// GET /api/health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service.to_string(),
            version: st.build.version.to_string(),
        }),
    )
}

// ---------------------------------------------------------------------------
// POST /api/place-order
// ---------------------------------------------------------------------------

pub(crate) async fn place_order(
    State(st): State<Arc<AppState>>,
    Json(req): Json<PlaceOrderRequest>,
) -> Response {
    match st.store.create_order(&req.customer_name).await {
        Ok(new) => {
            // The OTP itself never reaches the log.
            info!(shipment_id = %new.shipment_id, "place-order");
            (
                StatusCode::OK,
                Json(PlaceOrderResponse {
                    shipment_id: new.shipment_id,
                    otp_code: new.otp_code,
                }),
            )
                .into_response()
        }
        Err(err) => {
            info!("place-order rejected: {err}");
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}

// ---------------------------------------------------------------------------
// POST /api/confirm-delivery
// ---------------------------------------------------------------------------

pub(crate) async fn confirm_delivery(
    State(st): State<Arc<AppState>>,
    Json(req): Json<ConfirmDeliveryRequest>,
) -> Response {
    let outcome = st
        .store
        .confirm_delivery(&req.shipment_id, &req.otp, &req.delivered_by)
        .await;

    info!(
        shipment_id = %req.shipment_id,
        otp = %mask_otp(&req.otp),
        delivered_by = %req.delivered_by,
        outcome = outcome.as_str(),
        "confirm-delivery"
    );

    encode_outcome(st.encoding, outcome)
}

/// Translate the canonical outcome into the active wire encoding.
///
/// `not_found` is a 404 under both encodings; the encodings differ only in
/// how `invalid_otp` and `already_delivered` ride (status line vs. tagged
/// 200 body).
fn encode_outcome(encoding: WireEncoding, outcome: ConfirmOutcome) -> Response {
    match outcome {
        ConfirmOutcome::NotFound => not_found_response(),

        ConfirmOutcome::InvalidOtp => match encoding {
            WireEncoding::StatusCoded => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "invalid otp".to_string(),
                }),
            )
                .into_response(),
            WireEncoding::BodyCoded => {
                (StatusCode::OK, Json(ConfirmDeliveryResponse::InvalidOtp)).into_response()
            }
        },

        ConfirmOutcome::Delivered(r) => (StatusCode::OK, Json(delivered_body(r))).into_response(),

        ConfirmOutcome::AlreadyDelivered(r) => {
            let status = match encoding {
                WireEncoding::StatusCoded => StatusCode::CONFLICT,
                WireEncoding::BodyCoded => StatusCode::OK,
            };
            (status, Json(already_delivered_body(r))).into_response()
        }
    }
}

fn delivered_body(r: DeliveryReceipt) -> ConfirmDeliveryResponse {
    ConfirmDeliveryResponse::Delivered {
        shipment_id: r.shipment_id,
        customer_name: r.customer_name,
        delivered_by: r.delivered_by,
        delivered_at: r.delivered_at,
    }
}

fn already_delivered_body(r: DeliveryReceipt) -> ConfirmDeliveryResponse {
    ConfirmDeliveryResponse::AlreadyDelivered {
        shipment_id: r.shipment_id,
        delivered_by: r.delivered_by,
        delivered_at: r.delivered_at,
    }
}

// ---------------------------------------------------------------------------
// GET /api/shipments/{id}
// ---------------------------------------------------------------------------

pub(crate) async fn shipment_status(
    State(st): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let Some(view) = st.store.shipment_view(&id).await else {
        return not_found_response();
    };

    let (delivered_by, delivered_at) = match view.status {
        DeliveryStatus::Delivered {
            ref delivered_by,
            delivered_at,
        } => (Some(delivered_by.clone()), Some(delivered_at)),
        DeliveryStatus::Pending => (None, None),
    };

    (
        StatusCode::OK,
        Json(ShipmentStatusResponse {
            shipment_id: view.shipment_id,
            customer_name: view.customer_name,
            status: view.status.as_str().to_string(),
            delivered_by,
            delivered_at,
        }),
    )
        .into_response()
}

fn not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "shipment not found".to_string(),
        }),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Mask an OTP for logging: all but the last two characters starred.
fn mask_otp(otp: &str) -> String {
    let n = otp.chars().count();
    let keep = if n > 2 { 2 } else { 0 };
    let mut out: String = "*".repeat(n - keep);
    out.extend(otp.chars().skip(n - keep));
    out
}

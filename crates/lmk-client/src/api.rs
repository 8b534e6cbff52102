//! HTTP transport for the LastMile Kit API.
//!
//! `DeliveryClient` owns a `reqwest::Client` and a base URL; base URLs are
//! injectable so tests can point at a mock server or an in-process daemon.
//!
//! Confirmation is deliberately different from the other calls: it returns a
//! [`ConfirmTransport`] rather than a `Result`, because *every* transport
//! result — including "no response" — is a legitimate input to the outcome
//! classifier, not an error to propagate.

use lmk_schemas::{
    ConfirmDeliveryRequest, ErrorResponse, PlaceOrderRequest, PlaceOrderResponse,
    ShipmentStatusResponse,
};

use crate::message::ConfirmTransport;

// ---------------------------------------------------------------------------
// ClientError
// ---------------------------------------------------------------------------

/// Failure of a place-order or status call.
#[derive(Debug)]
pub enum ClientError {
    /// The server rejected the request (400); carries its error hint.
    Rejected(String),
    /// No usable response (connectivity, or an unreadable body).
    Transport(reqwest::Error),
    /// A response arrived with a status outside the contract.
    Unexpected { status: u16, body: String },
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Rejected(hint) => write!(f, "request rejected: {hint}"),
            ClientError::Transport(e) => write!(f, "transport failure: {e}"),
            ClientError::Unexpected { status, body } => {
                write!(f, "unexpected response: status={status} body={body}")
            }
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Transport(e) => Some(e),
            ClientError::Rejected(_) | ClientError::Unexpected { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// DeliveryClient
// ---------------------------------------------------------------------------

/// Client for the daemon's `/api` surface.
#[derive(Debug, Clone)]
pub struct DeliveryClient {
    http: reqwest::Client,
    base_url: String,
}

impl DeliveryClient {
    /// `base_url` is the full API prefix, e.g. `http://localhost:3000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }

    /// Place an order; returns the shipment id and its OTP.
    pub async fn place_order(&self, customer_name: &str) -> Result<PlaceOrderResponse, ClientError> {
        let resp = self
            .http
            .post(self.url("place-order"))
            .json(&PlaceOrderRequest {
                customer_name: customer_name.to_string(),
            })
            .send()
            .await
            .map_err(ClientError::Transport)?;

        let status = resp.status();
        if status.is_success() {
            return resp.json().await.map_err(ClientError::Transport);
        }

        let body = resp.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::BAD_REQUEST {
            let hint = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(ClientError::Rejected(hint));
        }
        Err(ClientError::Unexpected {
            status: status.as_u16(),
            body,
        })
    }

    /// Submit one confirmation attempt and capture whatever comes back.
    ///
    /// Never fails: connectivity problems collapse to
    /// [`ConfirmTransport::NoResponse`], everything else is carried as raw
    /// status + body for the classifier to judge.
    pub async fn confirm_delivery(&self, req: &ConfirmDeliveryRequest) -> ConfirmTransport {
        let resp = match self
            .http
            .post(self.url("confirm-delivery"))
            .json(req)
            .send()
            .await
        {
            Ok(r) => r,
            Err(_) => return ConfirmTransport::NoResponse,
        };

        let status = resp.status().as_u16();
        match resp.text().await {
            Ok(body) => ConfirmTransport::Response { status, body },
            // Connection died mid-body: no usable response was obtained.
            Err(_) => ConfirmTransport::NoResponse,
        }
    }

    /// Dispatcher-side status lookup. `Ok(None)` for an unknown id.
    pub async fn shipment_status(
        &self,
        shipment_id: &str,
    ) -> Result<Option<ShipmentStatusResponse>, ClientError> {
        let resp = self
            .http
            .get(self.url(&format!("shipments/{shipment_id}")))
            .send()
            .await
            .map_err(ClientError::Transport)?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status.is_success() {
            return resp.json().await.map(Some).map_err(ClientError::Transport);
        }

        let body = resp.text().await.unwrap_or_default();
        Err(ClientError::Unexpected {
            status: status.as_u16(),
            body,
        })
    }
}

//! HTTP driver for the member portal's reservation endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use courtbot_core::config::PortalConfig;
use courtbot_core::{BookingDriver, BookingRequest, DriverError, ReservationOutcome};

/// Books courts by POSTing to `{base_url}/api/reservations`.
///
/// The portal is expected to answer `409 Conflict` when a matching
/// reservation already exists, which is what makes reruns after a crash
/// safe — the driver surfaces that as [`ReservationOutcome::AlreadyBooked`]
/// rather than booking twice.
pub struct PortalDriver {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

/// Wire shape of one reservation attempt.
#[derive(Debug, Serialize)]
struct ReservationPayload<'a> {
    court: &'a str,
    date: String,
    start_time: String,
    duration_minutes: u32,
}

impl<'a> ReservationPayload<'a> {
    fn from_request(req: &'a BookingRequest) -> Self {
        Self {
            court: &req.court,
            date: req.date.format("%Y-%m-%d").to_string(),
            start_time: req.start.format("%H:%M").to_string(),
            duration_minutes: req.duration_minutes,
        }
    }
}

impl PortalDriver {
    pub fn new(config: &PortalConfig) -> Result<Self, DriverError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DriverError::Protocol(format!("http client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    fn apply_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => builder.header("Authorization", format!("Bearer {token}")),
            None => builder,
        }
    }
}

/// Map a non-transport portal answer onto the driver contract.
fn interpret_response(status: u16, body: &str) -> ReservationOutcome {
    match status {
        200..=299 => ReservationOutcome::Confirmed,
        409 => ReservationOutcome::AlreadyBooked,
        _ => {
            let detail = body.trim();
            if detail.is_empty() {
                ReservationOutcome::Failed(format!("portal returned {status}"))
            } else {
                ReservationOutcome::Failed(format!("portal returned {status}: {detail}"))
            }
        }
    }
}

#[async_trait]
impl BookingDriver for PortalDriver {
    fn name(&self) -> &str {
        "portal"
    }

    async fn reserve(&self, req: &BookingRequest) -> Result<ReservationOutcome, DriverError> {
        let url = format!("{}/api/reservations", self.base_url);
        debug!(court = %req.court, date = %req.date, "submitting reservation");

        let builder = self
            .client
            .post(&url)
            .json(&ReservationPayload::from_request(req));

        let resp = self
            .apply_auth(builder)
            .send()
            .await
            .map_err(|e| DriverError::Unavailable(e.to_string()))?;

        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let outcome = interpret_response(status, &body);
        if let ReservationOutcome::Failed(ref reason) = outcome {
            warn!(court = %req.court, date = %req.date, %reason, "portal rejected reservation");
        }
        Ok(outcome)
    }
}

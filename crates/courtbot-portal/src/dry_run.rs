//! Driver that reserves nothing.

use async_trait::async_trait;
use tracing::info;

use courtbot_core::{BookingDriver, BookingRequest, DriverError, ReservationOutcome};

/// Logs every would-be reservation and reports it confirmed.
///
/// Used by `--dry-run` so a schedule change can be rehearsed end to end —
/// matching, timing, request building — without touching the portal.
#[derive(Debug, Default)]
pub struct DryRunDriver;

#[async_trait]
impl BookingDriver for DryRunDriver {
    fn name(&self) -> &str {
        "dry-run"
    }

    async fn reserve(&self, req: &BookingRequest) -> Result<ReservationOutcome, DriverError> {
        info!(
            court = %req.court,
            date = %req.date,
            start = %req.start,
            duration_minutes = req.duration_minutes,
            "[dry run] would reserve"
        );
        Ok(ReservationOutcome::Confirmed)
    }
}

//! The booking-driver collaborator seam.
//!
//! The scheduler only decides *what* to book and *when* to submit; the
//! driver owns the actual reservation against the member portal, including
//! idempotency (no-op when a matching reservation already exists).

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{BookingRequest, ReservationOutcome};

/// Errors at the transport level — the driver could not get an answer from
/// the portal at all. A rejected reservation is not an error; it comes back
/// as [`ReservationOutcome::Failed`].
#[derive(Debug, Error)]
pub enum DriverError {
    /// The portal could not be reached (connect/timeout/TLS).
    #[error("Portal unavailable: {0}")]
    Unavailable(String),

    /// The portal answered with something the driver could not interpret.
    #[error("Unexpected portal response: {0}")]
    Protocol(String),
}

/// Attempt to reserve exactly the slot described by `req`.
///
/// Implementations must be safe to call once per request per run and must
/// not retry internally — re-invocation on the outer daily cadence is the
/// retry mechanism.
#[async_trait]
pub trait BookingDriver: Send + Sync {
    /// Short label for logs and reports (e.g. `"portal"`, `"dry-run"`).
    fn name(&self) -> &str;

    async fn reserve(&self, req: &BookingRequest) -> Result<ReservationOutcome, DriverError>;
}

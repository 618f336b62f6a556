//! Per-run outcome reporting.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use courtbot_core::{BookingRequest, ReservationOutcome};

/// How the run was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    Scheduled,
    Manual,
}

/// What happened to one [`BookingRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    /// The driver was called and answered.
    Attempted(ReservationOutcome),
    /// The driver could not reach the portal at all.
    Unavailable(String),
    /// The run was cancelled before this request was handed to the driver.
    NotAttempted,
}

impl std::fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptStatus::Attempted(outcome) => write!(f, "{outcome}"),
            AttemptStatus::Unavailable(reason) => write!(f, "portal unavailable: {reason}"),
            AttemptStatus::NotAttempted => write!(f, "not attempted"),
        }
    }
}

/// One request plus its recorded status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptReport {
    pub request: BookingRequest,
    pub status: AttemptStatus,
}

impl AttemptReport {
    /// Confirmed and already-booked both count as a successful reservation —
    /// the slot is held either way.
    pub fn succeeded(&self) -> bool {
        matches!(
            self.status,
            AttemptStatus::Attempted(ReservationOutcome::Confirmed)
                | AttemptStatus::Attempted(ReservationOutcome::AlreadyBooked)
        )
    }
}

/// Overall classification of a run, used for the report subject line and the
/// process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// No slot matched today's weekday.
    NothingDue,
    /// Every request succeeded (confirmed or already booked).
    AllSucceeded,
    /// Some requests succeeded, some did not.
    Partial,
    /// No request succeeded.
    AllFailed,
    /// The run was cancelled during the wait; nothing was attempted.
    Cancelled,
}

impl RunStatus {
    pub fn headline(&self) -> &'static str {
        match self {
            RunStatus::NothingDue => "Nothing to book today",
            RunStatus::AllSucceeded => "All bookings successful",
            RunStatus::Partial => "Partial success",
            RunStatus::AllFailed => "All bookings failed",
            RunStatus::Cancelled => "Run cancelled — nothing attempted",
        }
    }
}

/// Summary of one scheduler run, assembled at `Done` (or on cancellation)
/// and handed to the notification collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Correlates log lines, notifications, and rerun investigations.
    pub run_id: Uuid,
    pub mode: RunMode,
    /// Invocation date in the operating zone — the 7-day target derivation
    /// basis.
    pub basis_date: NaiveDate,
    /// Operating zone name, for rendering timestamps.
    pub timezone: String,
    /// Human-readable summaries of the matched slots.
    pub matched: Vec<String>,
    /// RFC 3339 submission target, when the run had one.
    pub target: Option<String>,
    /// Computed wait before submission, in seconds (0 for manual runs and
    /// late fires).
    pub wait_seconds: i64,
    pub attempts: Vec<AttemptReport>,
    pub cancelled: bool,
}

impl RunReport {
    pub fn status(&self) -> RunStatus {
        if self.cancelled {
            return RunStatus::Cancelled;
        }
        if self.attempts.is_empty() {
            return RunStatus::NothingDue;
        }
        let successes = self.attempts.iter().filter(|a| a.succeeded()).count();
        match successes {
            0 => RunStatus::AllFailed,
            n if n == self.attempts.len() => RunStatus::AllSucceeded,
            _ => RunStatus::Partial,
        }
    }

    /// True when every attempted request died on transport — the portal was
    /// never reachable. This is the one driver condition that makes the
    /// process exit nonzero.
    pub fn driver_unavailable(&self) -> bool {
        !self.attempts.is_empty()
            && self
                .attempts
                .iter()
                .all(|a| matches!(a.status, AttemptStatus::Unavailable(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn attempt(status: AttemptStatus) -> AttemptReport {
        AttemptReport {
            request: BookingRequest {
                court: "North".into(),
                date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
                start: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
                duration_minutes: 120,
            },
            status,
        }
    }

    fn report(attempts: Vec<AttemptReport>, cancelled: bool) -> RunReport {
        RunReport {
            run_id: Uuid::nil(),
            mode: RunMode::Scheduled,
            basis_date: NaiveDate::from_ymd_opt(2026, 2, 3).unwrap(),
            timezone: "America/Los_Angeles".into(),
            matched: vec![],
            target: None,
            wait_seconds: 0,
            attempts,
            cancelled,
        }
    }

    #[test]
    fn status_classification() {
        use AttemptStatus::*;
        use ReservationOutcome::*;

        assert_eq!(report(vec![], false).status(), RunStatus::NothingDue);
        assert_eq!(
            report(vec![attempt(Attempted(Confirmed))], false).status(),
            RunStatus::AllSucceeded
        );
        // Already-booked is a held slot, so it counts as success.
        assert_eq!(
            report(
                vec![attempt(Attempted(Confirmed)), attempt(Attempted(AlreadyBooked))],
                false
            )
            .status(),
            RunStatus::AllSucceeded
        );
        assert_eq!(
            report(
                vec![
                    attempt(Attempted(Confirmed)),
                    attempt(Attempted(Failed("slot taken".into())))
                ],
                false
            )
            .status(),
            RunStatus::Partial
        );
        assert_eq!(
            report(vec![attempt(Attempted(Failed("down".into())))], false).status(),
            RunStatus::AllFailed
        );
        assert_eq!(
            report(vec![attempt(NotAttempted)], true).status(),
            RunStatus::Cancelled
        );
    }

    #[test]
    fn driver_unavailable_requires_every_attempt_transport_dead() {
        use AttemptStatus::*;
        use ReservationOutcome::*;

        assert!(report(
            vec![
                attempt(Unavailable("connect refused".into())),
                attempt(Unavailable("connect refused".into()))
            ],
            false
        )
        .driver_unavailable());

        assert!(!report(
            vec![
                attempt(Unavailable("connect refused".into())),
                attempt(Attempted(Confirmed))
            ],
            false
        )
        .driver_unavailable());

        assert!(!report(vec![], false).driver_unavailable());
    }
}

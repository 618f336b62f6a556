use chrono::{DateTime, NaiveDate, NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Which concrete court(s) a schedule entry books.
///
/// The schedule grammar's `Both` sentinel expands to the configured court
/// pair at parse time, so downstream code never re-interprets selector
/// strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourtSelector {
    /// One concrete court by name.
    Named(String),
    /// Both members of the paired court group. Submissions for the two are
    /// independent; neither blocks nor rolls back the other.
    Pair(String, String),
}

impl CourtSelector {
    /// Concrete court names, in submission order.
    pub fn courts(&self) -> Vec<&str> {
        match self {
            CourtSelector::Named(c) => vec![c.as_str()],
            CourtSelector::Pair(a, b) => vec![a.as_str(), b.as_str()],
        }
    }
}

impl std::fmt::Display for CourtSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CourtSelector::Named(c) => write!(f, "{c}"),
            CourtSelector::Pair(a, b) => write!(f, "{a}+{b}"),
        }
    }
}

/// A recurring weekly booking desire, immutable once parsed from
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklySlot {
    /// Day of week the court time falls on.
    pub day: Weekday,
    /// Civil start time of the court reservation.
    pub start: NaiveTime,
    /// Court(s) to reserve.
    pub courts: CourtSelector,
}

impl std::fmt::Display for WeeklySlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}|{}",
            self.day,
            self.start.format("%-I:%M %p"),
            self.courts
        )
    }
}

/// How the current run was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocation {
    /// Timed run with a known civil invocation instant — the run waits for
    /// the configured submission time before submitting.
    Scheduled(DateTime<Tz>),
    /// Manual run with no invocation instant — zero wait, requests are built
    /// immediately with "today" as the basis date.
    Manual,
}

/// A fully resolved, date-concrete reservation attempt.
///
/// Created once per matched slot per run (twice for paired slots), handed to
/// the [`crate::BookingDriver`], and discarded after the run report is
/// assembled. The same schedule and invocation instant always resolve to the
/// same set of requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    /// Concrete court name as the portal knows it.
    pub court: String,
    /// Calendar date to reserve — always the next occurrence of the slot's
    /// weekday at least 7 days after the basis date.
    pub date: NaiveDate,
    /// Civil start time of the reservation.
    pub start: NaiveTime,
    /// Reservation length in minutes.
    pub duration_minutes: u32,
}

/// What the booking driver reports back for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationOutcome {
    /// The reservation was placed.
    Confirmed,
    /// A matching reservation already existed — the driver no-ops so a rerun
    /// never books the same slot twice.
    AlreadyBooked,
    /// The portal rejected the request (slot taken, quota reached, …).
    Failed(String),
}

impl std::fmt::Display for ReservationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReservationOutcome::Confirmed => write!(f, "confirmed"),
            ReservationOutcome::AlreadyBooked => write!(f, "already booked"),
            ReservationOutcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

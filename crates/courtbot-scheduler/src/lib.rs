//! `courtbot-scheduler` — the recurring booking scheduler.
//!
//! # Overview
//!
//! One invocation of the scheduler is one run: parse the weekly slot list,
//! find the slots due on the invocation's weekday, wait until the configured
//! civil submission time, then hand one [`courtbot_core::BookingRequest`]
//! per concrete court to the booking driver and record the outcomes in a
//! [`report::RunReport`].
//!
//! # Run states
//!
//! | State        | Behaviour                                              |
//! |--------------|--------------------------------------------------------|
//! | `Idle`       | Nothing started yet                                    |
//! | `Matching`   | Filtering slots against the invocation weekday         |
//! | `Waiting`    | Cancellable sleep until the submission target          |
//! | `Submitting` | Driving the booking driver, one call per request       |
//! | `Done`       | Every outcome recorded; the run never retries          |
//!
//! `Waiting` is skipped entirely on a manual run (no invocation instant).
//! All timing is anchored to civil wall-clock time in a named zone, so the
//! submission target means the same local clock reading on both sides of a
//! daylight-saving transition.

pub mod error;
pub mod matcher;
pub mod parse;
pub mod report;
pub mod runner;
pub mod timing;

pub use error::{Result, ScheduleError};
pub use report::{AttemptReport, AttemptStatus, RunMode, RunReport, RunStatus};
pub use runner::Scheduler;
pub use timing::SubmitDecision;

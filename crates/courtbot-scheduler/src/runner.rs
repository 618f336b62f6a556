//! The per-run state machine: match, wait, submit, report.

use chrono::{Datelike, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use futures_util::future::join_all;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use courtbot_core::{
    BookingDriver, BookingRequest, CourtbotConfig, Invocation, WeeklySlot,
};

use crate::error::Result;
use crate::matcher::due_today;
use crate::parse::{parse_submit_at, parse_weekly};
use crate::report::{AttemptReport, AttemptStatus, RunMode, RunReport};
use crate::timing::{submission_decision, target_date, SubmitDecision};

/// Lifecycle of a single run. `Waiting` is skipped on manual runs; the other
/// states are always traversed in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Idle,
    Matching,
    Waiting,
    Submitting,
    Done,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunState::Idle => "idle",
            RunState::Matching => "matching",
            RunState::Waiting => "waiting",
            RunState::Submitting => "submitting",
            RunState::Done => "done",
        };
        write!(f, "{s}")
    }
}

/// The recurring booking scheduler, built once per run from configuration.
///
/// Holds only immutable parsed configuration — running it twice with the
/// same invocation instant produces the same set of requests.
pub struct Scheduler {
    slots: Vec<WeeklySlot>,
    submit_at: NaiveTime,
    tz: Tz,
    duration_minutes: u32,
}

impl Scheduler {
    /// Parse the weekly schedule, submission time, and zone out of `config`.
    ///
    /// Fails fast on any malformed entry — before any wait or submission.
    pub fn from_config(config: &CourtbotConfig) -> Result<Self> {
        let slots = parse_weekly(
            &config.schedule.weekly,
            &config.schedule.default_selector,
            &config.courts.pair,
        )?;
        let submit_at = parse_submit_at(&config.schedule.submit_at)?;
        let tz = config.operating_tz()?;

        Ok(Self {
            slots,
            submit_at,
            tz,
            duration_minutes: config.schedule.default_duration_minutes,
        })
    }

    pub fn slots(&self) -> &[WeeklySlot] {
        &self.slots
    }

    pub fn operating_tz(&self) -> Tz {
        self.tz
    }

    /// Execute one run to completion (or clean cancellation).
    ///
    /// The `shutdown` channel cancels the wait: flipping it to `true` before
    /// submission starts aborts the run with every request reported
    /// "not attempted" — distinguishable from a submission failure.
    pub async fn run(
        &self,
        invocation: Invocation,
        driver: &dyn BookingDriver,
        mut shutdown: watch::Receiver<bool>,
    ) -> RunReport {
        let run_id = Uuid::new_v4();
        let mut state = RunState::Idle;

        let (basis, mode) = match invocation {
            Invocation::Scheduled(at) => (at, RunMode::Scheduled),
            Invocation::Manual => (Utc::now().with_timezone(&self.tz), RunMode::Manual),
        };
        let basis_date = basis.date_naive();

        self.transition(run_id, &mut state, RunState::Matching);
        let matched = due_today(&self.slots, basis.weekday());
        info!(
            %run_id,
            date = %basis_date,
            weekday = %basis.weekday(),
            matched = matched.len(),
            "matched weekly slots"
        );

        let mut report = RunReport {
            run_id,
            mode,
            basis_date,
            timezone: self.tz.name().to_string(),
            matched: matched.iter().map(|s| s.to_string()).collect(),
            target: None,
            wait_seconds: 0,
            attempts: Vec::new(),
            cancelled: false,
        };

        if matched.is_empty() {
            self.transition(run_id, &mut state, RunState::Done);
            return report;
        }

        let requests = self.build_requests(basis_date, &matched);

        // Manual runs skip the wait entirely; timed runs sleep until local
        // clocks read the submission target.
        if let Invocation::Scheduled(at) = invocation {
            self.transition(run_id, &mut state, RunState::Waiting);
            let decision = submission_decision(at, self.submit_at);
            let late = decision.is_late();
            match decision {
                SubmitDecision::WaitUntil { target, wait } => {
                    report.target = Some(target.to_rfc3339());
                    report.wait_seconds = wait.num_seconds();
                    info!(%run_id, target = %target, wait_secs = wait.num_seconds(), "waiting for submission target");

                    if self.wait_cancelled(wait, &mut shutdown).await {
                        info!(%run_id, "run cancelled during wait — nothing submitted");
                        report.attempts = requests
                            .into_iter()
                            .map(|request| AttemptReport {
                                request,
                                status: AttemptStatus::NotAttempted,
                            })
                            .collect();
                        report.cancelled = true;
                        return report;
                    }
                }
                SubmitDecision::FireNow { target, lateness } => {
                    report.target = Some(target.to_rfc3339());
                    if late {
                        warn!(
                            %run_id,
                            lateness_minutes = lateness.num_minutes(),
                            "invocation past submission target beyond grace — submitting immediately"
                        );
                    } else {
                        debug!(%run_id, lateness_secs = lateness.num_seconds(), "within grace of submission target");
                    }
                }
            }
        }

        self.transition(run_id, &mut state, RunState::Submitting);
        report.attempts = self.submit_all(run_id, driver, requests).await;

        self.transition(run_id, &mut state, RunState::Done);
        report
    }

    /// One request per concrete court, dated the next occurrence of the
    /// slot's weekday at least 7 days past the basis date.
    fn build_requests(&self, basis: NaiveDate, matched: &[&WeeklySlot]) -> Vec<BookingRequest> {
        matched
            .iter()
            .flat_map(|slot| {
                let date = target_date(basis, slot.day);
                slot.courts.courts().into_iter().map(move |court| BookingRequest {
                    court: court.to_string(),
                    date,
                    start: slot.start,
                    duration_minutes: self.duration_minutes,
                })
            })
            .collect()
    }

    /// Sleep for `wait`, returning `true` if the shutdown channel fired first.
    async fn wait_cancelled(
        &self,
        wait: chrono::Duration,
        shutdown: &mut watch::Receiver<bool>,
    ) -> bool {
        if *shutdown.borrow() {
            return true;
        }
        let wait = wait.to_std().unwrap_or_default();

        tokio::select! {
            biased;
            _ = cancel_signal(shutdown) => true,
            _ = tokio::time::sleep(wait) => false,
        }
    }

    /// Hand every request to the driver. Paired requests are independent, so
    /// they are submitted concurrently and one failure never blocks the
    /// other.
    async fn submit_all(
        &self,
        run_id: Uuid,
        driver: &dyn BookingDriver,
        requests: Vec<BookingRequest>,
    ) -> Vec<AttemptReport> {
        let attempts = join_all(requests.into_iter().map(|request| async move {
            let status = match driver.reserve(&request).await {
                Ok(outcome) => AttemptStatus::Attempted(outcome),
                Err(e) => AttemptStatus::Unavailable(e.to_string()),
            };
            AttemptReport { request, status }
        }))
        .await;

        for attempt in &attempts {
            info!(
                %run_id,
                court = %attempt.request.court,
                date = %attempt.request.date,
                status = %attempt.status,
                "booking attempt recorded"
            );
        }
        attempts
    }

    fn transition(&self, run_id: Uuid, state: &mut RunState, next: RunState) {
        debug!(%run_id, from = %state, to = %next, "run state");
        *state = next;
    }
}

/// Resolves once the shutdown channel flips to `true`; never resolves if the
/// sender is dropped without cancelling.
async fn cancel_signal(rx: &mut watch::Receiver<bool>) {
    loop {
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
        if *rx.borrow() {
            return;
        }
    }
}

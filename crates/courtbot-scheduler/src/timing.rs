//! Submission-target timing, anchored to civil wall-clock time.
//!
//! All arithmetic here resolves civil readings through the named operating
//! zone, never through a fixed UTC offset, so the configured submission time
//! means the same local clock reading on both sides of a daylight-saving
//! transition.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Weekday};
use chrono_tz::Tz;

use courtbot_core::config::GRACE_MINUTES;

/// Spring-forward gaps in the IANA database are at most a few hours; the
/// forward probe in [`resolve_local`] always terminates well inside this.
const MAX_GAP_PROBE_MINUTES: i64 = 24 * 60;

/// What the run should do about the submission target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitDecision {
    /// The target is still ahead — sleep until local clocks read it.
    WaitUntil {
        target: DateTime<Tz>,
        /// Real elapsed time until the target instant.
        wait: Duration,
    },
    /// The nearest occurrence of the target has already passed — submit now
    /// rather than deferring a full day.
    FireNow {
        target: DateTime<Tz>,
        lateness: Duration,
    },
}

impl SubmitDecision {
    /// Lateness beyond the grace tolerance — the run warns but proceeds.
    pub fn is_late(&self) -> bool {
        matches!(
            self,
            SubmitDecision::FireNow { lateness, .. }
                if *lateness > Duration::minutes(GRACE_MINUTES)
        )
    }
}

/// Resolve a civil reading in `tz` to an instant.
///
/// A reading inside a spring-forward gap resolves to the nearest valid civil
/// time after the gap (explicit policy, not an error); a reading repeated by
/// a fall-back transition resolves to the earlier instant.
pub fn resolve_local(tz: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(t) => t,
        LocalResult::Ambiguous(earlier, _) => earlier,
        LocalResult::None => {
            for step in 1..=MAX_GAP_PROBE_MINUTES {
                let probe = naive + Duration::minutes(step);
                if let Some(t) = tz.from_local_datetime(&probe).earliest() {
                    return t;
                }
            }
            // Unreachable for real zones; interpret the reading as UTC so the
            // run still proceeds rather than aborting mid-wait.
            tz.from_utc_datetime(&naive)
        }
    }
}

/// Decide when to submit, given the invocation instant and the configured
/// wall-clock submission time.
///
/// The occurrence of `submit_at` *nearest* to the invocation decides the
/// action: a future nearest occurrence is waited for, a past one fires
/// immediately. This keeps the two de-facto launch modes working with one
/// rule — a trigger a few minutes before midnight waits the short stretch to
/// the next `00:01:01`, while a trigger that fired minutes late submits
/// immediately instead of deferring a full day.
pub fn submission_decision(invocation: DateTime<Tz>, submit_at: NaiveTime) -> SubmitDecision {
    let tz = invocation.timezone();
    let today = invocation.date_naive();

    let todays = resolve_local(tz, today.and_time(submit_at));
    if invocation < todays {
        return SubmitDecision::WaitUntil {
            target: todays,
            wait: todays.signed_duration_since(invocation),
        };
    }

    let lateness = invocation.signed_duration_since(todays);
    let next = resolve_local(tz, (today + Duration::days(1)).and_time(submit_at));
    let until_next = next.signed_duration_since(invocation);

    if lateness <= until_next {
        SubmitDecision::FireNow {
            target: todays,
            lateness,
        }
    } else {
        SubmitDecision::WaitUntil {
            target: next,
            wait: until_next,
        }
    }
}

/// The next calendar date on `day` that is at least 7 days after `basis`.
///
/// For a slot matched on its own weekday this is exactly `basis + 7`; the
/// general form also covers selectors resolved against other weekdays.
pub fn target_date(basis: NaiveDate, day: Weekday) -> NaiveDate {
    let base = basis + Duration::days(7);
    let ahead = (day.num_days_from_monday() as i64
        - base.weekday().num_days_from_monday() as i64)
        .rem_euclid(7);
    base + Duration::days(ahead)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::Los_Angeles;

    fn civil(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Tz> {
        resolve_local(
            Los_Angeles,
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(h, min, s)
                .unwrap(),
        )
    }

    fn submit() -> NaiveTime {
        NaiveTime::from_hms_opt(0, 1, 1).unwrap()
    }

    #[test]
    fn before_midnight_waits_for_next_occurrence() {
        // Tuesday 11:50 PM — the nearest 00:01:01 is 11 minutes ahead on
        // Wednesday, not 23h49m behind on Tuesday.
        let invocation = civil(2026, 2, 3, 23, 50, 0);
        match submission_decision(invocation, submit()) {
            SubmitDecision::WaitUntil { target, wait } => {
                assert_eq!(target.date_naive(), NaiveDate::from_ymd_opt(2026, 2, 4).unwrap());
                assert_eq!(wait, Duration::minutes(11) + Duration::seconds(1));
            }
            other => panic!("expected WaitUntil, got {other:?}"),
        }
    }

    #[test]
    fn slightly_late_fires_within_grace() {
        let invocation = civil(2026, 2, 4, 0, 5, 1);
        let decision = submission_decision(invocation, submit());
        match &decision {
            SubmitDecision::FireNow { lateness, .. } => {
                assert_eq!(*lateness, Duration::minutes(4));
            }
            other => panic!("expected FireNow, got {other:?}"),
        }
        assert!(!decision.is_late());
    }

    #[test]
    fn fifteen_minutes_late_fires_with_warning() {
        // Past the 10-minute grace: still fires immediately, flagged late.
        let invocation = civil(2026, 2, 4, 0, 16, 1);
        let decision = submission_decision(invocation, submit());
        assert!(matches!(decision, SubmitDecision::FireNow { .. }));
        assert!(decision.is_late());
    }

    #[test]
    fn exactly_on_target_fires_with_zero_lateness() {
        let invocation = civil(2026, 2, 4, 0, 1, 1);
        match submission_decision(invocation, submit()) {
            SubmitDecision::FireNow { lateness, .. } => assert_eq!(lateness, Duration::zero()),
            other => panic!("expected FireNow, got {other:?}"),
        }
    }

    #[test]
    fn wait_reflects_wall_clock_across_spring_forward() {
        // 2026-03-08: 02:00 PST jumps to 03:00 PDT. Waiting from 00:30 to a
        // 03:01:01 target is 1h31m01s of real time, not the 2h31m01s a naive
        // civil subtraction would claim — and the target is still the 03:01:01
        // local reading.
        let invocation = civil(2026, 3, 8, 0, 30, 0);
        let target_time = NaiveTime::from_hms_opt(3, 1, 1).unwrap();
        match submission_decision(invocation, target_time) {
            SubmitDecision::WaitUntil { target, wait } => {
                assert_eq!(wait, Duration::minutes(91) + Duration::seconds(1));
                assert_eq!(target.time(), target_time);
                // Offsets differ across the transition: -08:00 before, -07:00 after.
                assert_eq!(target.offset().to_string(), "PDT");
            }
            other => panic!("expected WaitUntil, got {other:?}"),
        }
    }

    #[test]
    fn gap_reading_resolves_to_first_valid_time_after() {
        // 02:30 does not exist on 2026-03-08; policy resolves to 03:00 PDT.
        let resolved = resolve_local(
            Los_Angeles,
            NaiveDate::from_ymd_opt(2026, 3, 8)
                .unwrap()
                .and_hms_opt(2, 30, 0)
                .unwrap(),
        );
        assert_eq!(resolved.time(), NaiveTime::from_hms_opt(3, 0, 0).unwrap());
        assert_eq!(resolved.offset().to_string(), "PDT");
    }

    #[test]
    fn ambiguous_reading_resolves_to_earlier_instant() {
        // 2026-11-01: 01:30 occurs twice; the PDT (earlier) instant wins.
        let resolved = resolve_local(
            Los_Angeles,
            NaiveDate::from_ymd_opt(2026, 11, 1)
                .unwrap()
                .and_hms_opt(1, 30, 0)
                .unwrap(),
        );
        assert_eq!(resolved.offset().to_string(), "PDT");
    }

    #[test]
    fn target_date_is_exactly_a_week_out_for_matched_slots() {
        // 2026-02-03 is a Tuesday; a Tuesday slot books 2026-02-10.
        let basis = NaiveDate::from_ymd_opt(2026, 2, 3).unwrap();
        assert_eq!(
            target_date(basis, Weekday::Tue),
            NaiveDate::from_ymd_opt(2026, 2, 10).unwrap()
        );
    }

    #[test]
    fn target_date_advances_to_next_weekday_occurrence() {
        // From a Tuesday basis, the next Friday at least 7 days out is
        // basis + 10, never basis + 3.
        let basis = NaiveDate::from_ymd_opt(2026, 2, 3).unwrap();
        assert_eq!(
            target_date(basis, Weekday::Fri),
            NaiveDate::from_ymd_opt(2026, 2, 13).unwrap()
        );
        // And from a Friday basis, a Thursday slot is 13 days out.
        let friday = NaiveDate::from_ymd_opt(2026, 2, 6).unwrap();
        assert_eq!(
            target_date(friday, Weekday::Thu),
            NaiveDate::from_ymd_opt(2026, 2, 19).unwrap()
        );
    }

    #[test]
    fn target_date_unaffected_by_dst_shift_in_between() {
        // A week that contains the 2026-03-08 spring-forward still lands
        // exactly 7 calendar days out.
        let basis = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(); // Wednesday
        assert_eq!(
            target_date(basis, Weekday::Wed),
            NaiveDate::from_ymd_opt(2026, 3, 11).unwrap()
        );
    }
}

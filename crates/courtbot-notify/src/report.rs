//! Text rendering of a run report.
//!
//! One renderer feeds both channels: the chat message is the body verbatim,
//! the email pairs it with [`subject_line`].

use courtbot_scheduler::{RunReport, RunStatus};

/// Subject carrying the basis date and overall status, e.g.
/// `Court Booking Report for 02/03/2026 - All bookings successful`.
pub fn subject_line(report: &RunReport) -> String {
    format!(
        "Court Booking Report for {} - {}",
        report.basis_date.format("%m/%d/%Y"),
        report.status().headline()
    )
}

/// Plain-text report body: headline, matched slots, computed wait, one line
/// per booking attempt.
pub fn render_text(report: &RunReport) -> String {
    let status = report.status();
    let mut out = String::new();

    out.push_str(&format!("*{}*\n", status.headline()));
    out.push_str(&format!(
        "Run {} — {} ({})\n",
        report.run_id, report.basis_date, report.timezone
    ));

    if report.matched.is_empty() {
        out.push_str("\nNo slot matched today's weekday.\n");
        return out;
    }

    out.push_str("\nMatched slots:\n");
    for slot in &report.matched {
        out.push_str(&format!("  - {slot}\n"));
    }

    match (&report.target, report.wait_seconds) {
        (Some(target), _) if report.cancelled => {
            out.push_str(&format!("Cancelled before the submission target ({target})\n"));
        }
        (Some(target), secs) if secs > 0 => {
            out.push_str(&format!("Submitted at {target} after waiting {secs}s\n"));
        }
        (Some(target), _) => {
            out.push_str(&format!("Submitted immediately (target was {target})\n"));
        }
        (None, _) => out.push_str("Submitted immediately (manual run)\n"),
    }

    let successes = report.attempts.iter().filter(|a| a.succeeded()).count();
    out.push_str(&format!(
        "\nAttempts: {} total, {} successful, {} failed\n",
        report.attempts.len(),
        successes,
        report.attempts.len() - successes
    ));
    for attempt in &report.attempts {
        out.push_str(&format!(
            "  - {} {} {} ({} min): {}\n",
            attempt.request.court,
            attempt.request.date,
            attempt.request.start.format("%-I:%M %p"),
            attempt.request.duration_minutes,
            attempt.status
        ));
    }

    if status == RunStatus::Cancelled {
        out.push_str("\nThe run was cancelled during the wait; no request was submitted.\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use uuid::Uuid;

    use courtbot_core::{BookingRequest, ReservationOutcome};
    use courtbot_scheduler::{AttemptReport, AttemptStatus, RunMode};

    fn attempt(court: &str, status: AttemptStatus) -> AttemptReport {
        AttemptReport {
            request: BookingRequest {
                court: court.into(),
                date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
                start: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
                duration_minutes: 120,
            },
            status,
        }
    }

    fn report() -> RunReport {
        RunReport {
            run_id: Uuid::nil(),
            mode: RunMode::Scheduled,
            basis_date: NaiveDate::from_ymd_opt(2026, 2, 3).unwrap(),
            timezone: "America/Los_Angeles".into(),
            matched: vec!["Tue 7:00 PM|North+South".into()],
            target: Some("2026-02-04T00:01:01-08:00".into()),
            wait_seconds: 661,
            attempts: vec![
                attempt("North", AttemptStatus::Attempted(ReservationOutcome::Confirmed)),
                attempt(
                    "South",
                    AttemptStatus::Attempted(ReservationOutcome::Failed("slot taken".into())),
                ),
            ],
            cancelled: false,
        }
    }

    #[test]
    fn subject_carries_date_and_status() {
        assert_eq!(
            subject_line(&report()),
            "Court Booking Report for 02/03/2026 - Partial success"
        );
    }

    #[test]
    fn body_lists_wait_and_every_attempt() {
        let text = render_text(&report());
        assert!(text.contains("*Partial success*"));
        assert!(text.contains("Tue 7:00 PM|North+South"));
        assert!(text.contains("after waiting 661s"));
        assert!(text.contains("Attempts: 2 total, 1 successful, 1 failed"));
        assert!(text.contains("North 2026-02-10 7:00 PM (120 min): confirmed"));
        assert!(text.contains("South 2026-02-10 7:00 PM (120 min): failed: slot taken"));
    }

    #[test]
    fn nothing_due_renders_short_report() {
        let mut r = report();
        r.matched.clear();
        r.attempts.clear();
        r.target = None;
        r.wait_seconds = 0;
        let text = render_text(&r);
        assert!(text.contains("*Nothing to book today*"));
        assert!(text.contains("No slot matched"));
        assert!(!text.contains("Attempts:"));
    }

    #[test]
    fn cancelled_run_says_nothing_was_submitted() {
        let mut r = report();
        r.cancelled = true;
        for a in &mut r.attempts {
            a.status = AttemptStatus::NotAttempted;
        }
        let text = render_text(&r);
        assert!(text.contains("Cancelled before the submission target"));
        assert!(text.contains("cancelled during the wait"));
        assert!(text.contains("not attempted"));
        assert!(!text.contains("Submitted at"));
    }
}

//! Weekly slot matching.

use chrono::Weekday;

use courtbot_core::WeeklySlot;

/// Return the slots due on `today` — exactly those whose weekday matches the
/// invocation's weekday in the operating zone.
///
/// An empty result means "nothing to book today" and is not an error; the
/// caller finishes the run with an empty report.
pub fn due_today(slots: &[WeeklySlot], today: Weekday) -> Vec<&WeeklySlot> {
    slots.iter().filter(|slot| slot.day == today).collect()
}

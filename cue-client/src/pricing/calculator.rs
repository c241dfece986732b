//! Running cost calculator
//!
//! Computes the display estimate for an open session from its start
//! instant, the current instant and the active rate schedule. Works on
//! wall-clock `NaiveDateTime` so the caller decides the timezone.

use chrono::{NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use shared::RateSchedule;

/// Result of one cost computation (recomputed every tick, never stored)
#[derive(Debug, Clone, PartialEq)]
pub struct TickResult {
    /// Whole minutes elapsed since session start, floored at 0
    pub elapsed_minutes: i64,
    /// Minutes actually charged
    pub charged_minutes: i64,
    /// Estimated cost, rounded to 2 decimal places
    pub cost: Decimal,
    /// Whether `now` falls inside the peak window
    pub is_peak: bool,
}

/// Compute the running estimate for a session
///
/// Two billing branches, kept exactly as the hall has historically billed:
///
/// - `start` and `now` inside the same clock-hour: a single rate (the one
///   applicable at `now`) over `max(elapsed, minimum_minutes)`.
/// - spanning clock-hours: the elapsed time is split into per-hour
///   segments, each weighted by its minute count and rated at an instant
///   inside the segment. The minimum-minutes floor is NOT applied on this
///   branch. The asymmetry is intentional and pinned by tests; do not
///   unify the branches.
pub fn compute(start: NaiveDateTime, now: NaiveDateTime, schedule: &RateSchedule) -> TickResult {
    let elapsed_minutes = (now - start).num_minutes().max(0);
    let is_peak = schedule.is_peak(now.time());

    let same_hour = now <= start || (start.date() == now.date() && start.hour() == now.hour());
    if same_hour {
        let charged_minutes = elapsed_minutes.max(schedule.minimum_minutes);
        let cost = segment_cost(charged_minutes, schedule.rate_at(now.time())).round_dp(2);
        return TickResult {
            elapsed_minutes,
            charged_minutes,
            cost,
            is_peak,
        };
    }

    // First segment: the remainder of start's hour, rated at the start instant.
    let mut cost = segment_cost(60 - i64::from(start.minute()), schedule.rate_at(start.time()));

    // Middle segments: whole hours, each rated at the top of the hour.
    let mut cursor = hour_floor(start) + chrono::Duration::hours(1);
    let last_hour = hour_floor(now);
    while cursor < last_hour {
        cost += segment_cost(60, schedule.rate_at(cursor.time()));
        cursor += chrono::Duration::hours(1);
    }

    // Last segment: minutes elapsed within now's hour, rated at `now`.
    cost += segment_cost(i64::from(now.minute()), schedule.rate_at(now.time()));

    TickResult {
        elapsed_minutes,
        charged_minutes: elapsed_minutes,
        cost: cost.round_dp(2),
        is_peak,
    }
}

/// Cost of `minutes` at an hourly `rate`
fn segment_cost(minutes: i64, rate: Decimal) -> Decimal {
    Decimal::from(minutes) * rate / Decimal::from(60)
}

/// Truncate to the start of the clock-hour
fn hour_floor(t: NaiveDateTime) -> NaiveDateTime {
    t - chrono::Duration::minutes(i64::from(t.minute()))
        - chrono::Duration::seconds(i64::from(t.second()))
        - chrono::Duration::nanoseconds(i64::from(t.nanosecond()))
}

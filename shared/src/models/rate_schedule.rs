//! Rate Schedule Model

use chrono::{NaiveTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tariff snapshot pushed by the server
///
/// One process-wide instance, replaced wholesale on every update and never
/// partially mutated. Peak bounds are `HH:MM` wall-clock strings on the
/// wire; membership checks compare integer minutes-since-midnight, with a
/// wraparound branch for windows that cross midnight (e.g. 22:00–02:00).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSchedule {
    /// Hourly rate outside the peak window
    pub standard_rate: Decimal,
    /// Hourly rate inside the peak window
    pub peak_rate: Decimal,
    /// Peak window start, `HH:MM`
    pub peak_start: String,
    /// Peak window end, `HH:MM`; earlier than `peak_start` for overnight windows
    pub peak_end: String,
    /// Minimum chargeable minutes per session
    pub minimum_minutes: i64,
}

impl RateSchedule {
    /// Check whether `t` falls inside the peak window
    ///
    /// Server-provided bounds are taken as-is; a bound that fails to parse
    /// never matches.
    pub fn is_peak(&self, t: NaiveTime) -> bool {
        let (Some(start), Some(end)) = (
            minutes_of_day(&self.peak_start),
            minutes_of_day(&self.peak_end),
        ) else {
            return false;
        };
        let now = t.hour() * 60 + t.minute();

        if start <= end {
            now >= start && now <= end
        } else {
            // Overnight window (e.g. 22:00 - 02:00)
            now >= start || now <= end
        }
    }

    /// Hourly rate applicable at `t`
    pub fn rate_at(&self, t: NaiveTime) -> Decimal {
        if self.is_peak(t) {
            self.peak_rate
        } else {
            self.standard_rate
        }
    }
}

impl Default for RateSchedule {
    /// House tariff used until the first server push: 30/h standard, 45/h
    /// during the 17:00–22:00 evening window, 30-minute minimum.
    fn default() -> Self {
        Self {
            standard_rate: Decimal::from(30),
            peak_rate: Decimal::from(45),
            peak_start: "17:00".to_string(),
            peak_end: "22:00".to_string(),
            minimum_minutes: 30,
        }
    }
}

/// Parse `HH:MM` into minutes since midnight
fn minutes_of_day(hhmm: &str) -> Option<u32> {
    let t = NaiveTime::parse_from_str(hhmm, "%H:%M").ok()?;
    Some(t.hour() * 60 + t.minute())
}

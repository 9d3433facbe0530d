use chrono::{Datelike, Timelike, Weekday};

use crate::model::{RawAvailability, Timestamp};

use super::EngineError;

// ── Weekly slot schedule ─────────────────────────────────────────

/// A vehicle's pickup slots, indexed by weekday (Monday = 0).
///
/// Slots are exact (hour, minute) pairs. There are no ranges: a pickup at
/// 10:15 is only open if "1015" is listed for that day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklyAvailability {
    days: [Vec<(u32, u32)>; 7],
}

impl WeeklyAvailability {
    pub fn parse(raw: &RawAvailability) -> Result<Self, EngineError> {
        let mut schedule = Self::default();
        for (day, times) in raw {
            let weekday = parse_weekday(day)?;
            let slots = &mut schedule.days[weekday.num_days_from_monday() as usize];
            for t in times {
                slots.push(parse_slot(t)?);
            }
        }
        Ok(schedule)
    }

    pub fn slots_on(&self, day: Weekday) -> &[(u32, u32)] {
        &self.days[day.num_days_from_monday() as usize]
    }

    /// True if `at` falls on a listed (weekday, hour, minute). Seconds are ignored.
    pub fn is_open(&self, at: Timestamp) -> bool {
        self.slots_on(at.weekday()).contains(&(at.hour(), at.minute()))
    }
}

fn parse_weekday(name: &str) -> Result<Weekday, EngineError> {
    let day = match name.to_lowercase().as_str() {
        "monday" => Weekday::Mon,
        "tuesday" => Weekday::Tue,
        "wednesday" => Weekday::Wed,
        "thursday" => Weekday::Thu,
        "friday" => Weekday::Fri,
        "saturday" => Weekday::Sat,
        "sunday" => Weekday::Sun,
        _ => {
            return Err(EngineError::DatasetInvalid(format!(
                "unknown weekday in availability: {name:?}"
            )));
        }
    };
    Ok(day)
}

/// "HHMM" → (hour, minute). HH is the first two chars, MM the next two.
fn parse_slot(raw: &str) -> Result<(u32, u32), EngineError> {
    let bad = || EngineError::DatasetInvalid(format!("bad availability time {raw:?}, expected HHMM"));
    if raw.len() != 4 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad());
    }
    let hour = raw[0..2].parse().map_err(|_| bad())?;
    let minute = raw[2..4].parse().map_err(|_| bad())?;
    Ok((hour, minute))
}

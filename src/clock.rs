use chrono::{DateTime, FixedOffset, Timelike, Utc};

pub const DEFAULT_OFFSET_HOURS: i32 = 6;

/// Builds the fixed display offset, or `None` when the hours are out of range.
pub fn offset_from_hours(hours: i32) -> Option<FixedOffset> {
    FixedOffset::east_opt(hours.checked_mul(3600)?)
}

/// Formats `now` as `H:MM AM|PM` in the given fixed offset.
pub fn format_clock(now: DateTime<Utc>, offset: FixedOffset) -> String {
    let local = now.with_timezone(&offset);
    let (is_pm, hour) = local.hour12();
    let meridiem = if is_pm { "PM" } else { "AM" };
    format!("{hour}:{:02} {meridiem}", local.minute())
}

/// The time field of the form. Empty until a sign-in stamps it.
#[derive(Debug, Clone)]
pub struct ClockField {
    offset: FixedOffset,
    value: String,
}

impl ClockField {
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            offset,
            value: String::new(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn stamp(&mut self, now: DateTime<Utc>) {
        self.value = format_clock(now, self.offset);
    }

    /// Re-stamps only while the field is populated.
    pub fn refresh(&mut self, now: DateTime<Utc>) -> bool {
        if self.value.is_empty() {
            return false;
        }
        self.stamp(now);
        true
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }
}

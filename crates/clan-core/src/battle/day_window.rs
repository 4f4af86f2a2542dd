//! Battle days run from 05:00 to 05:00 region-local time

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike, Utc};

use crate::value_objects::Region;

/// Local hour at which a new battle day begins
pub const DAY_START_HOUR: u32 = 5;

/// Half-open UTC interval `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// The window of the battle day that began on `day` at 05:00 local
    pub fn for_day(region: Region, day: NaiveDate) -> Self {
        let local_start = day.and_time(NaiveTime::MIN) + Duration::hours(i64::from(DAY_START_HOUR));
        let start = (local_start - region.utc_offset()).and_utc();
        Self {
            start,
            end: start + Duration::days(1),
        }
    }

    /// The window containing `now`
    pub fn containing(region: Region, now: DateTime<Utc>) -> Self {
        Self::for_day(region, battle_day(region, now))
    }

    #[inline]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

/// Calendar date of the battle day `now` falls in
pub fn battle_day(region: Region, now: DateTime<Utc>) -> NaiveDate {
    let local = now.naive_utc() + region.utc_offset();
    if local.hour() < DAY_START_HOUR {
        local.date() - Duration::days(1)
    } else {
        local.date()
    }
}

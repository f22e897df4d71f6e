//! Hour boundaries inside the visible scope.

use chrono::{DateTime, Duration, FixedOffset, Timelike, Utc};

/// Lazy sequence of the full local hours after `now`, up to `now + scope`.
///
/// The first mark is the next hour boundary strictly after `now`; a mark that
/// falls exactly on `now + scope` is still produced. Cloning restarts the
/// sequence from the same position.
#[derive(Clone, Debug)]
pub struct HourMarks {
    next: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl HourMarks {
    /// Hour boundaries are taken in the local time of `now`'s offset.
    pub fn new(now: DateTime<FixedOffset>, scope: Duration) -> Self {
        let into_hour = Duration::minutes(now.minute() as i64)
            + Duration::seconds(now.second() as i64)
            + Duration::nanoseconds(now.nanosecond() as i64);
        let now_utc = now.with_timezone(&Utc);
        Self {
            next: now_utc - into_hour + Duration::hours(1),
            end: now_utc + scope,
        }
    }
}

impl Iterator for HourMarks {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.end {
            return None;
        }
        let mark = self.next;
        self.next = mark + Duration::hours(1);
        Some(mark)
    }
}

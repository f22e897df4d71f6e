//! Calendar events as the timeline sees them.

use crate::packing::PackingOrder;
use crate::{CalendarEvent, Color};
use chrono::{DateTime, Duration, Utc};

/// Whether `event` shows up on a timeline spanning `now..now + scope`.
///
/// All-day events are not drawn on the timeline.
pub fn is_visible(event: &CalendarEvent, now: DateTime<Utc>, scope: Duration) -> bool {
    !event.all_day && event.begin < now + scope && event.end > now
}

/// The events to draw this frame, arranged in packing order.
pub fn visible_events<'a>(
    events: &'a [CalendarEvent],
    now: DateTime<Utc>,
    scope: Duration,
    order: PackingOrder,
) -> Vec<&'a CalendarEvent> {
    let mut visible: Vec<_> = events
        .iter()
        .filter(|event| is_visible(event, now, scope))
        .collect();
    order.arrange(&mut visible);
    visible
}

/// Fixed test schedule relative to `now`, for demos and development without
/// a calendar provider.
pub fn simulated_events(now: DateTime<Utc>) -> Vec<CalendarEvent> {
    let blue = Color::new(0x3F, 0x7F, 0xFF);
    vec![
        CalendarEvent {
            id: 0,
            title: "test meeting with very long title text".to_string(),
            begin: now,
            end: now + Duration::hours(1),
            color: blue,
            all_day: false,
        },
        CalendarEvent {
            id: 1,
            title: "test1".to_string(),
            begin: now + Duration::minutes(30),
            end: now + Duration::minutes(90),
            color: blue,
            all_day: false,
        },
        CalendarEvent {
            id: 2,
            title: "test2".to_string(),
            begin: now + Duration::hours(2),
            end: now + Duration::hours(4),
            color: blue,
            all_day: false,
        },
    ]
}

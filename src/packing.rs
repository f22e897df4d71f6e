//! # Event Row Packing
//!
//! Overlapping calendar events are stacked on separate rows above the
//! timeline. An event occupies its row from `begin` until its *effective end*:
//! the later of its calendar end and the moment its title has been fully
//! written out, since a short event with a long title still blocks the space
//! its label is drawn into.
//!
//! Rows are handed out first-fit in traversal order: each event takes the
//! lowest row that is free at its begin time, or opens a new row. This is
//! O(events × rows) and deterministic for a given order; it does not promise
//! the minimal number of rows for arbitrary orders (it does when events are
//! traversed by begin time).

use crate::time_axis::TimeAxis;
use crate::CalendarEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order in which events are handed to the packer. Earlier events win the
/// lower rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PackingOrder {
    /// By begin time, then title, then id
    #[default]
    BeginTime,
    /// By title, then begin time, then id
    TitleThenBegin,
    /// As delivered by the calendar collaborator
    Provided,
}

impl PackingOrder {
    /// Stable sort of `events` into this order.
    pub fn arrange(self, events: &mut [&CalendarEvent]) {
        match self {
            PackingOrder::BeginTime => events.sort_by(|a, b| {
                a.begin
                    .cmp(&b.begin)
                    .then_with(|| a.title.cmp(&b.title))
                    .then_with(|| a.id.cmp(&b.id))
            }),
            PackingOrder::TitleThenBegin => events.sort_by(|a, b| {
                a.title
                    .cmp(&b.title)
                    .then_with(|| a.begin.cmp(&b.begin))
                    .then_with(|| a.id.cmp(&b.id))
            }),
            PackingOrder::Provided => {}
        }
    }
}

/// Per-frame bookkeeping: index is the row, value the instant until which
/// the row is taken.
#[derive(Debug, Default)]
pub struct RowOccupancy {
    blocked_until: Vec<DateTime<Utc>>,
}

impl RowOccupancy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the lowest row free at `begin` and block it until `until`.
    pub fn claim(&mut self, begin: DateTime<Utc>, until: DateTime<Utc>) -> usize {
        match self.blocked_until.iter().position(|blocked| *blocked <= begin) {
            Some(row) => {
                self.blocked_until[row] = until;
                row
            }
            None => {
                self.blocked_until.push(until);
                self.blocked_until.len() - 1
            }
        }
    }

    pub fn row_count(&self) -> usize {
        self.blocked_until.len()
    }
}

/// Layout of one event on the timeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PackedEvent<'a> {
    pub event: &'a CalendarEvent,
    pub x_begin: f32,
    pub x_end: f32,
    pub row: usize,
    /// End of the span the event blocks, title included
    pub occupied_until: DateTime<Utc>,
}

/// Instant until which `event` blocks its row, given the pixel width of its
/// title. Titles too wide for the calendar's range block their row for good.
pub fn effective_end(event: &CalendarEvent, title_width: f32, axis: &TimeAxis) -> DateTime<Utc> {
    let title_end = event
        .begin
        .checked_add_signed(axis.duration_of_span(title_width))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    event.end.max(title_end)
}

/// Assign rows to `events` in the given order.
///
/// `title_width` reports the pixels needed for an event's title, padding
/// included. Never fails: every event gets a row, however many overlap.
pub fn pack_events<'a, F>(
    events: &[&'a CalendarEvent],
    axis: &TimeAxis,
    mut title_width: F,
) -> Vec<PackedEvent<'a>>
where
    F: FnMut(&str) -> f32,
{
    let mut rows = RowOccupancy::new();
    let packed: Vec<_> = events
        .iter()
        .map(|&event| {
            let occupied_until = effective_end(event, title_width(&event.title), axis);
            let row = rows.claim(event.begin, occupied_until);
            PackedEvent {
                event,
                x_begin: axis.coordinate_of(event.begin),
                x_end: axis.coordinate_of(event.end),
                row,
                occupied_until,
            }
        })
        .collect();
    log::trace!(
        "packed {} events into {} rows",
        packed.len(),
        rows.row_count()
    );
    packed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AxisGeometry, TimeScope};
    use crate::Color;
    use chrono::{Duration, TimeZone};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 14, h, m, 0).unwrap()
    }

    fn event(id: i64, title: &str, begin: DateTime<Utc>, end: DateTime<Utc>) -> CalendarEvent {
        CalendarEvent {
            id,
            title: title.to_string(),
            begin,
            end,
            color: Color::WHITE,
            all_day: false,
        }
    }

    /// 4 h over 240 px: one pixel per minute
    fn axis() -> TimeAxis {
        let geometry = AxisGeometry {
            axis_length: 250.0,
            now_x: 10.0,
            arrow_length: 5.0,
            center_x: 125.0,
            center_y: 125.0,
        };
        TimeAxis::new(at(9, 0), TimeScope::from_hours(4).unwrap(), &geometry)
    }

    fn rows(packed: &[PackedEvent]) -> Vec<(String, usize)> {
        packed
            .iter()
            .map(|p| (p.event.title.clone(), p.row))
            .collect()
    }

    #[test]
    fn test_overlap_goes_up_a_row() {
        let events = [
            event(1, "A", at(9, 0), at(10, 0)),
            event(2, "B", at(9, 30), at(10, 30)),
            event(3, "C", at(11, 0), at(13, 0)),
        ];
        let refs: Vec<_> = events.iter().collect();
        let packed = pack_events(&refs, &axis(), |_| 5.0);
        assert_eq!(
            rows(&packed),
            vec![("A".into(), 0), ("B".into(), 1), ("C".into(), 0)]
        );
        assert!((packed[0].x_begin - 10.0).abs() < 1e-3);
        assert!((packed[0].x_end - 70.0).abs() < 1e-3);
    }

    #[test]
    fn test_long_title_blocks_row() {
        // B starts after A ends, but A's 90 px title reaches to 10:30
        let events = [
            event(1, "A", at(9, 0), at(9, 15)),
            event(2, "B", at(10, 0), at(10, 15)),
            event(3, "C", at(10, 30), at(10, 45)),
        ];
        let refs: Vec<_> = events.iter().collect();
        let widths = |title: &str| if title == "A" { 90.0 } else { 10.0 };
        let packed = pack_events(&refs, &axis(), widths);
        assert_eq!(
            rows(&packed),
            vec![("A".into(), 0), ("B".into(), 1), ("C".into(), 0)]
        );
        assert_eq!(packed[0].occupied_until, at(10, 30));
    }

    #[test]
    fn test_title_wider_than_axis() {
        let scope_end = at(13, 0);
        let events = [
            event(1, "W", at(9, 30), at(9, 45)),
            event(2, "next", at(12, 0), at(12, 30)),
        ];
        let refs: Vec<_> = events.iter().collect();
        // the axis has 240 px in front of the now bar
        let widths = |title: &str| if title == "W" { 5_000.0 } else { 10.0 };
        let packed = pack_events(&refs, &axis(), widths);

        assert!(packed[0].occupied_until > scope_end);
        assert_eq!(packed[0].row, 0);
        assert_eq!(packed[1].row, 1);
    }

    #[test]
    fn test_unbounded_title_width_terminates() {
        let events = [
            event(1, "endless", at(9, 0), at(9, 10)),
            event(2, "after", at(9, 20), at(9, 40)),
        ];
        let refs: Vec<_> = events.iter().collect();
        let packed = pack_events(&refs, &axis(), |_| f32::INFINITY);
        assert_eq!(packed[0].occupied_until, DateTime::<Utc>::MAX_UTC);
        assert_eq!(rows(&packed), vec![("endless".into(), 0), ("after".into(), 1)]);
    }

    #[test]
    fn test_touching_events_share_a_row() {
        let events = [
            event(1, "A", at(9, 0), at(10, 0)),
            event(2, "B", at(10, 0), at(11, 0)),
        ];
        let refs: Vec<_> = events.iter().collect();
        let packed = pack_events(&refs, &axis(), |_| 0.0);
        assert_eq!(packed[1].row, 0);
    }

    #[test]
    fn test_inverted_event_still_gets_a_row() {
        let events = [
            event(1, "backwards", at(11, 0), at(10, 0)),
            event(2, "later", at(11, 5), at(11, 30)),
        ];
        let refs: Vec<_> = events.iter().collect();
        let packed = pack_events(&refs, &axis(), |_| 20.0);
        // title alone blocks 11:00 to 11:20
        assert_eq!(packed[0].occupied_until, at(11, 20));
        assert_eq!(packed[0].row, 0);
        assert_eq!(packed[1].row, 1);
    }

    #[test]
    fn test_rows_grow_without_bound() {
        let events: Vec<_> = (0..12)
            .map(|i| event(i, "all at once", at(9, 0), at(12, 0)))
            .collect();
        let refs: Vec<_> = events.iter().collect();
        let packed = pack_events(&refs, &axis(), |_| 50.0);
        let assigned: Vec<_> = packed.iter().map(|p| p.row).collect();
        assert_eq!(assigned, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn test_packing_order() {
        let events = [
            event(1, "Zeta", at(9, 0), at(10, 0)),
            event(2, "Alpha", at(9, 30), at(10, 0)),
            event(3, "Alpha", at(9, 15), at(9, 20)),
        ];

        let mut by_begin: Vec<_> = events.iter().collect();
        PackingOrder::BeginTime.arrange(&mut by_begin);
        assert_eq!(by_begin.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 3, 2]);

        let mut by_title: Vec<_> = events.iter().collect();
        PackingOrder::TitleThenBegin.arrange(&mut by_title);
        assert_eq!(by_title.iter().map(|e| e.id).collect::<Vec<_>>(), vec![3, 2, 1]);

        let mut provided: Vec<_> = events.iter().collect();
        PackingOrder::Provided.arrange(&mut provided);
        assert_eq!(provided.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_same_row_never_overlaps() {
        // a dense pseudo-random schedule, checked pairwise per row
        let events: Vec<_> = (0..40i64)
            .map(|i| {
                let begin = at(9, 0) + Duration::minutes((i * 37) % 200);
                let end = begin + Duration::minutes(5 + (i * 13) % 70);
                event(i, &"x".repeat((i % 7) as usize), begin, end)
            })
            .collect();
        let refs: Vec<_> = events.iter().collect();
        let width = |title: &str| title.len() as f32 * 6.0;

        let first = pack_events(&refs, &axis(), width);
        let second = pack_events(&refs, &axis(), width);
        assert_eq!(first, second);

        for (i, a) in first.iter().enumerate() {
            for b in &first[i + 1..] {
                if a.row == b.row {
                    let disjoint = a.occupied_until <= b.event.begin
                        || b.occupied_until <= a.event.begin;
                    assert!(disjoint, "events {} and {} overlap", a.event.id, b.event.id);
                }
            }
        }
    }
}

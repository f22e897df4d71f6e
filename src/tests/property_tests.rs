//! Timeline properties checked over deterministic sweeps of inputs.

use crate::config::{AxisGeometry, LayoutConfig, ScreenDimensions, TimeScope};
use crate::hour_marks::HourMarks;
use crate::packing::{pack_events, PackedEvent};
use crate::time_axis::{coordinate_of_time, time_of_coordinate, TimeAxis};
use crate::weather::WeatherCurveBuilder;
use crate::{CalendarEvent, Color, CurrentWeather, HourlySample};
use chrono::{DateTime, Duration, FixedOffset, TimeZone, Timelike, Utc};

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 14, 9, 41, 17).unwrap()
}

/// Small linear congruential generator, so the sweeps are reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 33) % bound
    }
}

fn axis(scope_hours: i64, width: i32, now_x: f32) -> TimeAxis {
    let layout = LayoutConfig {
        now_bar_x: now_x,
        ..LayoutConfig::default()
    };
    let geometry = AxisGeometry::new(&layout, ScreenDimensions { width, height: 300 }).unwrap();
    TimeAxis::new(base(), TimeScope::from_hours(scope_hours).unwrap(), &geometry)
}

#[test]
fn coordinates_round_trip() {
    let configurations = [(1, 200.0, 0.0), (3, 390.0, 60.0), (4, 454.0, 120.5), (12, 1000.0, 100.0)];
    for (hours, length, now_x) in configurations {
        let scope = Duration::hours(hours);
        for step in -20..=40 {
            let t = base() + scope * step / 20;
            let x = coordinate_of_time(t, base(), scope, length, now_x);
            let back = time_of_coordinate(x, base(), scope, length, now_x);
            // f32 pixels resolve a 12 hour scope to a few milliseconds
            let error = (back - t).num_milliseconds().abs();
            assert!(error <= 10, "round trip off by {error} ms for {hours}h, step {step}");
        }
    }
}

#[test]
fn coordinates_are_monotonic() {
    let axis = axis(4, 390, 60.0);
    let mut previous = f32::NEG_INFINITY;
    for minute in -60..=300 {
        let x = axis.coordinate_of(base() + Duration::minutes(minute));
        assert!(x > previous, "x({minute} min) = {x} not after {previous}");
        previous = x;
    }
}

fn random_events(rng: &mut Lcg, count: i64) -> Vec<CalendarEvent> {
    (0..count)
        .map(|id| {
            let begin = base() + Duration::minutes(rng.next(300) as i64 - 60);
            // a few inverted events as well
            let length = rng.next(150) as i64 - 10;
            CalendarEvent {
                id,
                title: "x".repeat(rng.next(40) as usize),
                begin,
                end: begin + Duration::minutes(length),
                color: Color::WHITE,
                all_day: false,
            }
        })
        .collect()
}

fn rows_of(packed: &[PackedEvent<'_>]) -> Vec<usize> {
    packed.iter().map(|p| p.row).collect()
}

#[test]
fn packed_rows_never_overlap() {
    let axis = axis(4, 390, 60.0);
    let mut rng = Lcg(7);
    for _ in 0..50 {
        let events = random_events(&mut rng, 12);
        let refs: Vec<&CalendarEvent> = events.iter().collect();
        let packed = pack_events(&refs, &axis, |title| title.len() as f32 * 6.0 + 4.0);

        for (i, a) in packed.iter().enumerate() {
            for b in &packed[i + 1..] {
                if a.row != b.row {
                    continue;
                }
                let disjoint =
                    a.occupied_until <= b.event.begin || b.occupied_until <= a.event.begin;
                assert!(
                    disjoint,
                    "events {} and {} share row {} and overlap",
                    a.event.id, b.event.id, a.row
                );
            }
        }
    }
}

#[test]
fn packing_is_deterministic() {
    let axis = axis(4, 390, 60.0);
    let events = random_events(&mut Lcg(42), 20);
    let refs: Vec<&CalendarEvent> = events.iter().collect();
    let width = |title: &str| title.chars().count() as f32 * 7.0;

    let first = rows_of(&pack_events(&refs, &axis, width));
    for _ in 0..5 {
        assert_eq!(rows_of(&pack_events(&refs, &axis, width)), first);
    }
}

#[test]
fn hour_marks_are_aligned_and_in_scope() {
    let offsets = [0, 3600, -5 * 3600, 19800, 20700];
    for offset in offsets {
        let zone = FixedOffset::east_opt(offset).unwrap();
        for minute in [0, 1, 29, 59] {
            let now = zone.with_ymd_and_hms(2024, 3, 14, 10, minute, 30).unwrap();
            for hours in 1..=6 {
                let scope = Duration::hours(hours);
                let marks: Vec<_> = HourMarks::new(now, scope).collect();

                assert!(marks.len() as i64 >= hours - 1 && marks.len() as i64 <= hours);
                for mark in &marks {
                    assert!(*mark > now && *mark <= now + scope);
                    let local = mark.with_timezone(&zone);
                    assert_eq!((local.minute(), local.second()), (0, 0));
                }
                assert!(marks.windows(2).all(|w| w[1] - w[0] == Duration::hours(1)));
            }
        }
    }
}

#[test]
fn weather_stops_at_first_sample_out_of_scope() {
    let axis = axis(4, 390, 60.0);
    let layout = LayoutConfig::default();
    let builder = WeatherCurveBuilder::new(&axis, &layout, 150.0, TimeScope::from_hours(4).unwrap());
    let current = CurrentWeather {
        timestamp: base(),
        temperature: 10.0,
    };
    let sample = |hours: i64| HourlySample {
        timestamp: base() + Duration::hours(hours),
        temperature: 10.0 + hours as f32,
        probability_of_precipitation: 0.5,
    };

    // exactly one scope after the reading is still drawn
    let hourly = vec![sample(1), sample(4), sample(5), sample(2)];
    let curve = builder.temperature_curve(&current, &hourly);
    assert_eq!(curve.points.len(), 3);
    assert_eq!(curve.points[2].x, axis.coordinate_of(base() + Duration::hours(4)));

    let chart = builder.precipitation_chart(&current, &hourly, &crate::draw::MonoTextMetrics);
    assert_eq!(chart.bars.len(), 2);
}

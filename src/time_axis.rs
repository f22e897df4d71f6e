//! # Time ↔ Pixel Mapping
//!
//! The timeline is an affine map from time to x:
//!
//! ```text
//! x(t) = now_x + (t - now) / scope * (axis_length - now_x)
//! ```
//!
//! `now` lands on the now bar, `now + scope` on the arrow tip. Times in the
//! past map left of the now bar, times beyond the scope right of the arrow;
//! neither is clamped here.

use crate::config::{AxisGeometry, TimeScope};
use chrono::{DateTime, Duration, Utc};

/// Pixel x of `time` on the timeline.
pub fn coordinate_of_time(
    time: DateTime<Utc>,
    now: DateTime<Utc>,
    scope: Duration,
    axis_length: f32,
    now_x: f32,
) -> f32 {
    let scope_ms = scope.num_milliseconds() as f64;
    debug_assert!(scope_ms > 0.0, "time scope must be positive");
    let offset_ms = (time - now).num_milliseconds() as f64;
    (now_x as f64 + offset_ms / scope_ms * (axis_length - now_x) as f64) as f32
}

/// Inverse of [`coordinate_of_time`], to the millisecond.
pub fn time_of_coordinate(
    x: f32,
    now: DateTime<Utc>,
    scope: Duration,
    axis_length: f32,
    now_x: f32,
) -> DateTime<Utc> {
    let span = (axis_length - now_x) as f64;
    debug_assert!(span > 0.0, "now bar must lie before the end of the timeline");
    let offset_ms = (x - now_x) as f64 / span * scope.num_milliseconds() as f64;
    now + Duration::milliseconds(offset_ms.round() as i64)
}

/// The timeline of one frame: "now" frozen together with scope and geometry.
#[derive(Clone, Copy, Debug)]
pub struct TimeAxis {
    now: DateTime<Utc>,
    scope: Duration,
    axis_length: f32,
    now_x: f32,
}

impl TimeAxis {
    pub fn new(now: DateTime<Utc>, scope: TimeScope, geometry: &AxisGeometry) -> Self {
        Self {
            now,
            scope: scope.duration(),
            axis_length: geometry.axis_length,
            now_x: geometry.now_x,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn scope(&self) -> Duration {
        self.scope
    }

    pub fn now_x(&self) -> f32 {
        self.now_x
    }

    pub fn coordinate_of(&self, time: DateTime<Utc>) -> f32 {
        coordinate_of_time(time, self.now, self.scope, self.axis_length, self.now_x)
    }

    pub fn time_of(&self, x: f32) -> DateTime<Utc> {
        time_of_coordinate(x, self.now, self.scope, self.axis_length, self.now_x)
    }

    /// Pixels per millisecond
    fn scale(&self) -> f64 {
        (self.axis_length - self.now_x) as f64 / self.scope.num_milliseconds() as f64
    }

    /// Width in pixels a duration covers on the timeline.
    pub fn span_of(&self, duration: Duration) -> f32 {
        (duration.num_milliseconds() as f64 * self.scale()) as f32
    }

    /// Duration covered by `pixels` of timeline. Negative widths count as
    /// zero, widths past the longest representable duration saturate.
    pub fn duration_of_span(&self, pixels: f32) -> Duration {
        let ms = (pixels.max(0.0) as f64 / self.scale()).round();
        Duration::try_milliseconds(ms as i64).unwrap_or(Duration::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 14, 10, 0, 0).unwrap()
    }

    fn axis() -> TimeAxis {
        TimeAxis {
            now: now(),
            scope: Duration::hours(4),
            axis_length: 360.0,
            now_x: 40.0,
        }
    }

    #[test]
    fn test_now_maps_to_now_bar_and_scope_to_tip() {
        let axis = axis();
        assert_eq!(axis.coordinate_of(now()), 40.0);
        assert!((axis.coordinate_of(now() + Duration::hours(4)) - 360.0).abs() < 1e-3);
        assert!((axis.coordinate_of(now() + Duration::hours(2)) - 200.0).abs() < 1e-3);
        // the past extends left of the now bar
        assert!((axis.coordinate_of(now() - Duration::hours(1)) - -40.0).abs() < 1e-3);
    }

    #[test]
    fn test_round_trip() {
        let axis = axis();
        for minutes in (-120..=360).step_by(7) {
            let t = now() + Duration::minutes(minutes) + Duration::milliseconds(333);
            let back = axis.time_of(axis.coordinate_of(t));
            let error = (back - t).num_milliseconds().abs();
            assert!(error <= 10, "round trip off by {error} ms at {minutes} min");
        }
    }

    #[test]
    fn test_monotonic() {
        let axis = axis();
        let xs: Vec<f32> = (-60..=300)
            .step_by(1)
            .map(|m| axis.coordinate_of(now() + Duration::minutes(m)))
            .collect();
        for pair in xs.windows(2) {
            assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_free_functions_match_axis() {
        let x = coordinate_of_time(
            now() + Duration::minutes(90),
            now(),
            Duration::hours(3),
            250.0,
            10.0,
        );
        assert!((x - 130.0).abs() < 1e-3);
        let t = time_of_coordinate(x, now(), Duration::hours(3), 250.0, 10.0);
        assert_eq!(t, now() + Duration::minutes(90));
    }

    #[test]
    fn test_span_conversions() {
        let axis = axis();
        // 320 px for 4 hours: one hour is 80 px
        assert!((axis.span_of(Duration::hours(1)) - 80.0).abs() < 1e-3);
        assert_eq!(axis.duration_of_span(80.0), Duration::hours(1));
        assert_eq!(axis.duration_of_span(-5.0), Duration::zero());
        assert_eq!(axis.duration_of_span(f32::INFINITY), Duration::MAX);
    }
}

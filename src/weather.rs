//! # Weather Geometry
//!
//! Turns a [`WeatherSnapshot`](crate::WeatherSnapshot) into timeline geometry:
//!
//! - **Temperature curve**: a polyline from the current temperature at the
//!   now bar through the hourly forecast. A configured pixel distance stands
//!   for 40 degrees; warmer is higher on screen, 0° sits on the timeline.
//! - **Precipitation probability**: a short level marker per forecast hour,
//!   lower for likelier rain, with the peak percentage written under its
//!   marker.
//! - **Minutely precipitation**: one bar per minute hanging down from the
//!   timeline, a configured pixel distance per mm/h, with the peak rate
//!   written under the tallest bar.
//!
//! Hourly and minutely samples are consumed in order and accumulation stops
//! at the first sample more than one time scope after the current reading.
//!
//! Label rounding differs per quantity: temperatures round to the nearest
//! degree and probabilities to the nearest percent, precipitation amounts
//! are truncated to whole millimeters.

use crate::config::{LayoutConfig, TimeScope};
use crate::draw::{FontRole, PointF, RectF, TextMetrics};
use crate::time_axis::TimeAxis;
use crate::{CurrentWeather, HourlySample, MinutelySample};
use chrono::{DateTime, Duration, Utc};

/// A text and the left end of its baseline.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub text: String,
    pub position: PointF,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TemperatureCurve {
    pub points: Vec<PointF>,
}

impl TemperatureCurve {
    /// Consecutive point pairs, one per line segment.
    pub fn segments(&self) -> impl Iterator<Item = (PointF, PointF)> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BarChart {
    pub bars: Vec<RectF>,
    /// Annotation of the highest sample, if any sample is above zero
    pub peak: Option<Label>,
}

pub fn format_temperature(temperature: f32, units: &str) -> String {
    format!("{}{}", temperature.round() as i32, units)
}

pub fn format_probability(probability: f32) -> String {
    format!("{}%", (probability * 100.0).round() as i32)
}

pub fn format_millimeters(rate: f32) -> String {
    format!("{}mm", rate.trunc() as i32)
}

/// Builds weather geometry for one frame.
pub struct WeatherCurveBuilder<'a> {
    axis: &'a TimeAxis,
    layout: &'a LayoutConfig,
    center_y: f32,
    scope: Duration,
}

impl<'a> WeatherCurveBuilder<'a> {
    pub fn new(axis: &'a TimeAxis, layout: &'a LayoutConfig, center_y: f32, scope: TimeScope) -> Self {
        Self {
            axis,
            layout,
            center_y,
            scope: Duration::seconds(scope.as_seconds()),
        }
    }

    /// Samples from the start of `samples` up to the first one past the scope.
    fn within_scope<'s, T>(
        &self,
        samples: &'s [T],
        current: &CurrentWeather,
        timestamp: impl Fn(&T) -> DateTime<Utc>,
    ) -> &'s [T] {
        let end = samples
            .iter()
            .position(|sample| timestamp(sample) - current.timestamp > self.scope)
            .unwrap_or(samples.len());
        &samples[..end]
    }

    pub fn temperature_y(&self, temperature: f32) -> f32 {
        self.center_y - self.layout.temperature_scale_40_degrees * temperature / 40.0
    }

    /// Current temperature, centered on the now bar at the curve's start.
    pub fn current_temperature_label(
        &self,
        current: &CurrentWeather,
        units: &str,
        metrics: &dyn TextMetrics,
    ) -> Label {
        let text = format_temperature(current.temperature, units);
        let width = metrics.text_width(&text, FontRole::Timeline);
        Label {
            position: PointF::new(
                self.axis.now_x() - width / 2.0,
                self.temperature_y(current.temperature),
            ),
            text,
        }
    }

    pub fn temperature_curve(
        &self,
        current: &CurrentWeather,
        hourly: &[HourlySample],
    ) -> TemperatureCurve {
        let start = PointF::new(self.axis.now_x(), self.temperature_y(current.temperature));
        let forecast = self
            .within_scope(hourly, current, |s| s.timestamp)
            .iter()
            .map(|sample| {
                PointF::new(
                    self.axis.coordinate_of(sample.timestamp),
                    self.temperature_y(sample.temperature),
                )
            });
        TemperatureCurve {
            points: std::iter::once(start).chain(forecast).collect(),
        }
    }

    pub fn precipitation_chart(
        &self,
        current: &CurrentWeather,
        hourly: &[HourlySample],
        metrics: &dyn TextMetrics,
    ) -> BarChart {
        let mut chart = BarChart::default();
        let mut peak: Option<(f32, RectF)> = None;
        for sample in self.within_scope(hourly, current, |s| s.timestamp) {
            let probability = sample.probability_of_precipitation;
            let bar = RectF::centered_bar(
                self.axis.coordinate_of(sample.timestamp),
                self.center_y + self.layout.precipitation_scale_100_percent * probability,
                self.layout.precipitation_bar_width,
                self.layout.precipitation_bar_thickness,
            );
            if probability > peak.map_or(0.0, |(p, _)| p) {
                peak = Some((probability, bar));
            }
            chart.bars.push(bar);
        }
        chart.peak = peak.map(|(probability, bar)| {
            self.label_below(
                format_probability(probability),
                &bar,
                self.layout.precipitation_label_offset,
                metrics,
            )
        });
        chart
    }

    pub fn minutely_chart(
        &self,
        current: &CurrentWeather,
        minutely: &[MinutelySample],
        metrics: &dyn TextMetrics,
    ) -> BarChart {
        let bar_width = self.axis.span_of(Duration::minutes(1)).max(1.0);
        let mut chart = BarChart::default();
        let mut peak: Option<(f32, RectF)> = None;
        for sample in self.within_scope(minutely, current, |s| s.timestamp) {
            let rate = sample.precipitation_rate;
            if rate <= 0.0 {
                continue;
            }
            let left = self.axis.coordinate_of(sample.timestamp);
            let bar = RectF::new(
                left,
                self.center_y,
                left + bar_width,
                self.center_y + rate * self.layout.minutely_scale_1mm,
            );
            if rate > peak.map_or(0.0, |(r, _)| r) {
                peak = Some((rate, bar));
            }
            chart.bars.push(bar);
        }
        chart.peak = peak.map(|(rate, bar)| {
            self.label_below(
                format_millimeters(rate),
                &bar,
                self.layout.minutely_label_offset,
                metrics,
            )
        });
        chart
    }

    fn label_below(&self, text: String, bar: &RectF, offset: f32, metrics: &dyn TextMetrics) -> Label {
        let width = metrics.text_width(&text, FontRole::Timeline);
        let center = (bar.left + bar.right) / 2.0;
        Label {
            position: PointF::new(center - width / 2.0, bar.bottom + offset),
            text,
        }
    }
}

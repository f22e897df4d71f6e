//! # Heads Up Watch Face Core Library
//!
//! This library holds the timeline layout and rendering engine of the heads up
//! watch face. The watch face shows a digital clock above a horizontal
//! timeline: a line starting at "now" and reaching a configured number of
//! hours into the future, decorated with hour marks, the upcoming calendar
//! events and the weather forecast.
//!
//! ## Design Philosophy
//!
//! ### Plain data in, draw commands out
//! The host platform (calendar provider, weather client, clock, surface) only
//! hands over three normalized feeds: the current time, a list of
//! [`CalendarEvent`]s and an optional [`WeatherSnapshot`]. The engine never
//! talks to a canvas directly; [`renderer::TimelineRenderer::draw`] returns an
//! ordered list of [`draw::DrawCommand`]s which a surface (for example
//! [`canvas::rasterize`] on an `embedded-graphics` target) replays.
//!
//! ### One "now" per frame
//! "Now" is sampled exactly once when a frame starts ([`TimelineData::now`])
//! and threaded through every coordinate computation, so the now bar, the
//! first hour mark and the start of the temperature curve always line up.
//!
//! ### Immutable configuration
//! All pixel dimensions, colors and the time scope live in a validated
//! [`config::RenderConfig`] which is replaced wholesale when the surface is
//! resized. Bad configuration is rejected at construction time, so drawing a
//! frame cannot fail.
//!
//! ## Data Flow
//! 1. **Feeds**: calendar and weather collaborators publish snapshots
//!    ([`feeds::SnapshotCell`]), the clock is sampled once per frame
//! 2. **Layout**: [`time_axis`], [`hour_marks`], [`packing`] and [`weather`]
//!    turn the data into geometry
//! 3. **Render**: [`renderer`] and [`watch_face`] style the geometry for the
//!    current [`style::RenderMode`] and emit draw commands

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// Module declarations
pub mod calendar;
pub mod canvas;
pub mod clock;
pub mod config;
pub mod draw;
pub mod fallback;
pub mod feeds;
pub mod hour_marks;
pub mod packing;
pub mod renderer;
pub mod style;
pub mod time_axis;
pub mod watch_face;
pub mod weather;

#[cfg(test)]
mod tests;

/// A 24-bit RGB color.
///
/// Stored as `"#RRGGBB"` in configuration files.
///
/// # Example
/// ```
/// use headsup_face_lib::Color;
///
/// let orange: Color = "#FF8800".parse().unwrap();
/// assert_eq!(orange, Color::new(0xFF, 0x88, 0x00));
/// assert_eq!(orange.to_string(), "#FF8800");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(0xFF, 0xFF, 0xFF);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Error returned when a color string is not of the form `#RRGGBB`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color {0:?}, expected #RRGGBB")]
pub struct ColorParseError(pub String);

impl std::str::FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .filter(|hex| hex.len() == 6 && hex.is_ascii())
            .ok_or_else(|| ColorParseError(s.to_string()))?;
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ColorParseError(s.to_string()))
        };
        Ok(Color::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// A calendar appointment as delivered by the calendar collaborator.
///
/// Events are immutable once constructed. `end` is normally after `begin`,
/// but the layout code tolerates inverted intervals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: i64,
    pub title: String,
    pub begin: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Calendar color, used for the event bar in interactive mode
    pub color: Color,
    pub all_day: bool,
}

/// Temperature reading at the time the forecast was fetched.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub timestamp: DateTime<Utc>,
    pub temperature: f32,
}

/// One hour of the forecast.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HourlySample {
    pub timestamp: DateTime<Utc>,
    pub temperature: f32,
    /// Probability of precipitation, 0.0 to 1.0
    pub probability_of_precipitation: f32,
}

/// One minute of the short-term precipitation forecast.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinutelySample {
    pub timestamp: DateTime<Utc>,
    /// Precipitation rate in mm/h
    pub precipitation_rate: f32,
}

/// A forecast sub-series that may not be available.
///
/// `Absent` is a normal state (nothing fetched yet, or the weather service
/// does not deliver this resolution) and makes the renderer skip the
/// corresponding chart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "samples", rename_all = "snake_case")]
pub enum Series<T> {
    Absent,
    Present(Vec<T>),
}

impl<T> Series<T> {
    /// The samples, if the series was delivered.
    pub fn samples(&self) -> Option<&[T]> {
        match self {
            Series::Absent => None,
            Series::Present(samples) => Some(samples),
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Series::Present(_))
    }
}

impl<T> Default for Series<T> {
    fn default() -> Self {
        Series::Absent
    }
}

impl<T> From<Option<Vec<T>>> for Series<T> {
    fn from(samples: Option<Vec<T>>) -> Self {
        samples.map_or(Series::Absent, Series::Present)
    }
}

/// Latest forecast handed over by the weather collaborator.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use headsup_face_lib::{CurrentWeather, Series, WeatherSnapshot};
///
/// let snapshot = WeatherSnapshot {
///     current: CurrentWeather {
///         timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
///         temperature: 14.5,
///     },
///     hourly: Series::Absent,
///     minutely: Series::Absent,
/// };
///
/// assert!(snapshot.hourly.samples().is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub current: CurrentWeather,
    #[serde(default)]
    pub hourly: Series<HourlySample>,
    #[serde(default)]
    pub minutely: Series<MinutelySample>,
}

/// Everything a single frame is drawn from.
///
/// `now` carries the local UTC offset, which decides where hour boundaries
/// fall. The event list and the weather snapshot are read-only for the whole
/// frame.
#[derive(Clone, Copy, Debug)]
pub struct TimelineData<'a> {
    pub now: DateTime<FixedOffset>,
    pub events: &'a [CalendarEvent],
    /// `None` until the first forecast has been fetched
    pub weather: Option<&'a WeatherSnapshot>,
}

impl TimelineData<'_> {
    /// "Now" as an instant, for coordinate math.
    pub fn now_utc(&self) -> DateTime<Utc> {
        self.now.with_timezone(&Utc)
    }
}

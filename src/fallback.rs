//! # Offline Weather Model
//!
//! A deterministic stand-in for the weather feed, used by the binary and in
//! development when no forecast provider is wired up. It produces a complete
//! [`WeatherSnapshot`] so every weather element of the timeline can be seen:
//!
//! - **Temperature**: a daily sine around 12 °C with a 6 °C swing, warmest at
//!   15:00 UTC and coldest at 03:00 UTC.
//! - **Probability of precipitation**: a second daily sine, driest at 06:00
//!   and wettest at 18:00 UTC.
//! - **Minutely precipitation**: a half-hour shower starting ten minutes
//!   after the current minute, peaking at 2.5 mm/h.
//!
//! Hourly samples start at the next full hour and cover 48 hours, minutely
//! samples start at the current minute and cover one hour.

use crate::{CurrentWeather, HourlySample, MinutelySample, Series, WeatherSnapshot};
use chrono::{DateTime, Duration, Timelike, Utc};
use std::f32::consts::{PI, TAU};

const MEAN_TEMPERATURE: f32 = 12.0;
const TEMPERATURE_SWING: f32 = 6.0;
const WARMEST_HOUR: f32 = 15.0;
const WETTEST_HOUR: f32 = 18.0;
const HOURLY_SAMPLES: i64 = 48;
const MINUTELY_SAMPLES: i64 = 60;
const SHOWER_START_MIN: i64 = 10;
const SHOWER_LENGTH_MIN: i64 = 30;
const SHOWER_PEAK_MM: f32 = 2.5;

/// Fractional UTC hour of the day.
fn hour_of_day(t: DateTime<Utc>) -> f32 {
    t.hour() as f32 + t.minute() as f32 / 60.0 + t.second() as f32 / 3600.0
}

/// Modeled temperature at `t`.
pub fn temperature_at(t: DateTime<Utc>) -> f32 {
    let phase = (hour_of_day(t) - WARMEST_HOUR + 6.0) / 24.0 * TAU;
    MEAN_TEMPERATURE + TEMPERATURE_SWING * phase.sin()
}

/// Modeled probability of precipitation at `t`, in `0.0..=1.0`.
pub fn probability_at(t: DateTime<Utc>) -> f32 {
    let phase = (hour_of_day(t) - WETTEST_HOUR + 6.0) / 24.0 * TAU;
    // two decimals, like a forecast provider reports it
    ((0.4 + 0.4 * phase.sin()).clamp(0.0, 1.0) * 100.0).round() / 100.0
}

fn shower_rate(minute: i64) -> f32 {
    let into_shower = minute - SHOWER_START_MIN;
    if !(0..=SHOWER_LENGTH_MIN).contains(&into_shower) {
        return 0.0;
    }
    let rate = SHOWER_PEAK_MM * (PI * into_shower as f32 / SHOWER_LENGTH_MIN as f32).sin();
    rate.max(0.0)
}

/// Generate a synthetic weather snapshot taken at `now`.
/// If `now` is `None`, fall back to `Utc::now()`.
pub fn synthetic_weather(now: Option<DateTime<Utc>>) -> WeatherSnapshot {
    let now = now.unwrap_or_else(Utc::now);
    let minute_start = now
        - Duration::seconds(now.second() as i64)
        - Duration::nanoseconds(now.nanosecond() as i64);
    let next_hour = minute_start - Duration::minutes(now.minute() as i64) + Duration::hours(1);

    let hourly = (0..HOURLY_SAMPLES)
        .map(|h| {
            let timestamp = next_hour + Duration::hours(h);
            HourlySample {
                timestamp,
                temperature: temperature_at(timestamp),
                probability_of_precipitation: probability_at(timestamp),
            }
        })
        .collect();

    let minutely = (0..MINUTELY_SAMPLES)
        .map(|m| MinutelySample {
            timestamp: minute_start + Duration::minutes(m),
            precipitation_rate: shower_rate(m),
        })
        .collect();

    WeatherSnapshot {
        current: CurrentWeather {
            timestamp: now,
            temperature: temperature_at(now),
        },
        hourly: Series::Present(hourly),
        minutely: Series::Present(minutely),
    }
}

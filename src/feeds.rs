//! Data sources feeding the frame loop.
//!
//! Calendar and weather updates arrive from outside the render path. Each is
//! held in a [`SnapshotCell`]: a writer publishes a complete new value, a
//! frame takes the current one at its start and keeps it for the whole
//! draw, so a frame never observes a half-applied update.

use crate::{CalendarEvent, TimelineData, WeatherSnapshot};
use chrono::{DateTime, FixedOffset, Local};
use log::debug;
use std::sync::{Arc, Mutex, PoisonError};

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock in the system time zone.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Always reports the same instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Holds the latest published value.
#[derive(Debug, Default)]
pub struct SnapshotCell<T> {
    current: Mutex<Arc<T>>,
}

impl<T> SnapshotCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            current: Mutex::new(Arc::new(value)),
        }
    }

    /// Replace the value seen by frames started from now on.
    pub fn publish(&self, value: T) {
        let value = Arc::new(value);
        // the lock only guards a pointer swap, a poisoned one is still usable
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = value;
    }

    pub fn snapshot(&self) -> Arc<T> {
        Arc::clone(&self.current.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Everything a frame reads.
pub struct Feeds<C: Clock = SystemClock> {
    clock: C,
    calendar: SnapshotCell<Vec<CalendarEvent>>,
    weather: SnapshotCell<Option<WeatherSnapshot>>,
}

impl Feeds<SystemClock> {
    pub fn system() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> Feeds<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            calendar: SnapshotCell::new(Vec::new()),
            weather: SnapshotCell::new(None),
        }
    }

    pub fn publish_events(&self, events: Vec<CalendarEvent>) {
        debug!("calendar feed: {} events", events.len());
        self.calendar.publish(events);
    }

    /// `None` marks the weather as unavailable.
    pub fn publish_weather(&self, weather: Option<WeatherSnapshot>) {
        debug!("weather feed: {}", if weather.is_some() { "updated" } else { "cleared" });
        self.weather.publish(weather);
    }

    /// Sample the clock and the feeds once for a frame.
    pub fn frame(&self) -> FrameSnapshot {
        FrameSnapshot {
            now: self.clock.now(),
            events: self.calendar.snapshot(),
            weather: self.weather.snapshot(),
        }
    }
}

/// Inputs of one frame, fixed for its whole draw.
#[derive(Clone, Debug)]
pub struct FrameSnapshot {
    pub now: DateTime<FixedOffset>,
    pub events: Arc<Vec<CalendarEvent>>,
    pub weather: Arc<Option<WeatherSnapshot>>,
}

impl FrameSnapshot {
    pub fn data(&self) -> TimelineData<'_> {
        TimelineData {
            now: self.now,
            events: &self.events,
            weather: (*self.weather).as_ref(),
        }
    }
}

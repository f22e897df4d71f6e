//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the
//! headsup-config.toml file, and turning it into the validated
//! [`RenderConfig`] the renderer works with.
//!
//! [`Config`] is the editable, serializable form: every section has defaults
//! so a file only needs to list what it changes. [`RenderConfig`] is the
//! immutable form derived from a [`Config`] and the current surface size. It
//! is rebuilt wholesale whenever the surface changes, and construction is the
//! only place configuration errors can surface.

use crate::packing::PackingOrder;
use crate::Color;
use chrono::Duration;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "headsup-config.toml";

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("time scope must be positive, got {0} hours")]
    NonPositiveScope(i64),

    #[error("time scope of {hours} hours exceeds the maximum of {max} hours")]
    ScopeTooLong { hours: i64, max: i64 },

    #[error("surface must have a positive size, got {width}x{height}")]
    EmptySurface { width: i32, height: i32 },

    #[error("timeline length must be positive, got {0}")]
    AxisLength(f32),

    #[error("now bar at x={now_x} lies outside the timeline [0, {axis_length})")]
    NowBarOutsideAxis { now_x: f32, axis_length: f32 },

    #[error("config IO: {0}")]
    Io(#[from] io::Error),

    #[error("config parse: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config serialize: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Application configuration loaded from headsup-config.toml
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// What the timeline shows
    pub timeline: TimelineConfig,
    /// Pixel dimensions of every timeline element
    pub layout: LayoutConfig,
    /// Interactive and ambient colors
    pub palette: PaletteConfig,
    /// Digital clock placement and format
    pub clock: ClockConfig,
    /// Surface defaults and hardware properties
    pub display: DisplayConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// How many hours into the future the timeline reaches
    pub scope_hours: i64,
    /// Traversal order of calendar events when assigning rows
    pub packing_order: PackingOrder,
    /// Suffix appended to the current temperature label
    pub temperature_units: String,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            scope_hours: 4,
            packing_order: PackingOrder::default(),
            temperature_units: "°C".to_string(),
        }
    }
}

/// Pixel dimensions. Vertical offsets are relative to the timeline, positive
/// values point down.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Length of the timeline; the surface width when unset
    pub axis_length: Option<f32>,
    pub arrow_length: f32,
    pub line_width: f32,
    pub now_bar_x: f32,
    pub now_bar_size: f32,
    pub now_bar_thickness: f32,
    pub hour_mark_size: f32,
    pub hour_mark_thickness: f32,
    pub hour_mark_text_offset: f32,
    pub event_bar_height: f32,
    pub event_title_offset: f32,
    /// Vertical distance between two event rows
    pub event_row_spacing: f32,
    /// Extra horizontal room reserved after an event title
    pub event_title_padding: f32,
    /// Pixels representing 40 degrees on the temperature curve
    pub temperature_scale_40_degrees: f32,
    /// Pixels representing a 100% probability of precipitation
    pub precipitation_scale_100_percent: f32,
    pub precipitation_bar_width: f32,
    pub precipitation_bar_thickness: f32,
    pub precipitation_label_offset: f32,
    /// Pixels representing 1 mm/h on the minutely chart
    pub minutely_scale_1mm: f32,
    pub minutely_label_offset: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            axis_length: None,
            arrow_length: 8.0,
            line_width: 2.0,
            now_bar_x: 60.0,
            now_bar_size: 24.0,
            now_bar_thickness: 3.0,
            hour_mark_size: 10.0,
            hour_mark_thickness: 2.0,
            hour_mark_text_offset: 20.0,
            event_bar_height: 6.0,
            event_title_offset: -10.0,
            event_row_spacing: 18.0,
            event_title_padding: 4.0,
            temperature_scale_40_degrees: 80.0,
            precipitation_scale_100_percent: 50.0,
            precipitation_bar_width: 6.0,
            precipitation_bar_thickness: 2.0,
            precipitation_label_offset: 12.0,
            minutely_scale_1mm: 20.0,
            minutely_label_offset: 12.0,
        }
    }
}

/// A color for interactive mode and its battery friendly ambient alternate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ColorPair {
    pub interactive: Color,
    pub ambient: Color,
}

impl ColorPair {
    pub const fn new(interactive: Color, ambient: Color) -> Self {
        Self {
            interactive,
            ambient,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub background: ColorPair,
    /// Axis line, arrow, now bar and hour marks
    pub timeline: ColorPair,
    /// Hour numbers and event titles
    pub timeline_text: ColorPair,
    /// Event bars in ambient mode; interactive mode uses the calendar color
    pub event_ambient: Color,
    pub temperature: ColorPair,
    pub precipitation: ColorPair,
    pub minutely: ColorPair,
    pub clock_hour: ColorPair,
    pub clock_minute: ColorPair,
    pub clock_second: ColorPair,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        let grey = Color::new(0xAA, 0xAA, 0xAA);
        Self {
            background: ColorPair::new(Color::new(0x10, 0x10, 0x18), Color::BLACK),
            timeline: ColorPair::new(Color::WHITE, grey),
            timeline_text: ColorPair::new(Color::new(0xDD, 0xDD, 0xDD), grey),
            event_ambient: Color::new(0x88, 0x88, 0x88),
            temperature: ColorPair::new(Color::new(0xFF, 0x8C, 0x1A), Color::new(0x99, 0x99, 0x99)),
            precipitation: ColorPair::new(Color::new(0x4F, 0xA8, 0xFF), Color::new(0x77, 0x77, 0x77)),
            minutely: ColorPair::new(Color::new(0x2E, 0x6C, 0xE6), Color::new(0x55, 0x55, 0x55)),
            clock_hour: ColorPair::new(Color::WHITE, Color::WHITE),
            clock_minute: ColorPair::new(Color::WHITE, grey),
            clock_second: ColorPair::new(Color::new(0xBB, 0xBB, 0xBB), grey),
        }
    }
}

/// Digital clock placement relative to the surface center.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Show hours as 1-12 instead of 0-23
    pub hour_format_12: bool,
    pub digital_x_offset: f32,
    pub digital_y_offset: f32,
    /// Shift to the left applied when the hour has two digits
    pub two_digit_correction: f32,
    pub minutes_offset_x: f32,
    pub minutes_offset_y: f32,
    pub seconds_offset_x: f32,
    pub seconds_offset_y: f32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            hour_format_12: false,
            digital_x_offset: -30.0,
            digital_y_offset: -40.0,
            two_digit_correction: 10.0,
            minutes_offset_x: 24.0,
            minutes_offset_y: -6.0,
            seconds_offset_x: 24.0,
            seconds_offset_y: 10.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Surface width in pixels until the host reports the real size
    pub width: i32,
    /// Surface height in pixels until the host reports the real size
    pub height: i32,
    /// The display uses fewer color bits in ambient mode; anti-aliasing is
    /// switched off there
    pub low_bit_ambient: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 390,
            height: 390,
            low_bit_ambient: true,
        }
    }
}

impl Config {
    /// Load configuration from headsup-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match Self::try_load_from_path(&path) {
            Ok(config) => {
                info!(
                    "Loaded configuration from {} ({}h timeline)",
                    path.as_ref().display(),
                    config.timeline.scope_hours
                );
                config
            }
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                info!("No config file found, using default configuration");
                Self::default()
            }
            Err(e) => {
                warn!("Invalid config file: {}", e);
                warn!("Using default configuration");
                Self::default()
            }
        }
    }

    /// Load configuration from specified path, reporting every failure
    pub fn try_load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Save current configuration to headsup-config.toml
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to_path(CONFIG_FILE)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }

    /// The surface size configured for the display
    pub fn screen_dimensions(&self) -> ScreenDimensions {
        ScreenDimensions {
            width: self.display.width,
            height: self.display.height,
        }
    }
}

/// Size of the drawing surface as reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenDimensions {
    pub width: i32,
    pub height: i32,
}

/// Longest accepted time scope: one leap year.
pub const MAX_SCOPE_HOURS: i64 = 366 * 24;

/// How far into the future the timeline reaches. Always positive and at
/// most [`MAX_SCOPE_HOURS`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeScope(Duration);

impl TimeScope {
    pub fn from_hours(hours: i64) -> Result<Self, ConfigError> {
        if hours <= 0 {
            return Err(ConfigError::NonPositiveScope(hours));
        }
        let too_long = ConfigError::ScopeTooLong {
            hours,
            max: MAX_SCOPE_HOURS,
        };
        if hours > MAX_SCOPE_HOURS {
            return Err(too_long);
        }
        Duration::try_hours(hours).map(Self).ok_or(too_long)
    }

    pub fn duration(&self) -> Duration {
        self.0
    }

    /// Scope length in seconds, the unit forecast timestamps are compared in
    pub fn as_seconds(&self) -> i64 {
        self.0.num_seconds()
    }
}

/// Fixed pixel geometry of the timeline for the current surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisGeometry {
    /// x where the timeline (and its arrow tip) ends
    pub axis_length: f32,
    /// x of the now bar; time `now` maps here
    pub now_x: f32,
    pub arrow_length: f32,
    pub center_x: f32,
    /// y of the timeline
    pub center_y: f32,
}

impl AxisGeometry {
    pub fn new(layout: &LayoutConfig, screen: ScreenDimensions) -> Result<Self, ConfigError> {
        if screen.width <= 0 || screen.height <= 0 {
            return Err(ConfigError::EmptySurface {
                width: screen.width,
                height: screen.height,
            });
        }
        let axis_length = layout.axis_length.unwrap_or(screen.width as f32);
        if !(axis_length > 0.0) {
            return Err(ConfigError::AxisLength(axis_length));
        }
        // now_x == axis_length would leave no room for the future
        if !(layout.now_bar_x >= 0.0 && layout.now_bar_x < axis_length) {
            return Err(ConfigError::NowBarOutsideAxis {
                now_x: layout.now_bar_x,
                axis_length,
            });
        }
        Ok(Self {
            axis_length,
            now_x: layout.now_bar_x,
            arrow_length: layout.arrow_length,
            center_x: screen.width as f32 / 2.0,
            center_y: screen.height as f32 / 2.0,
        })
    }
}

/// Validated configuration for one surface size.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    config: Config,
    screen: ScreenDimensions,
    scope: TimeScope,
    geometry: AxisGeometry,
}

impl RenderConfig {
    pub fn new(config: Config, screen: ScreenDimensions) -> Result<Self, ConfigError> {
        let scope = TimeScope::from_hours(config.timeline.scope_hours)?;
        let geometry = AxisGeometry::new(&config.layout, screen)?;
        Ok(Self {
            config,
            screen,
            scope,
            geometry,
        })
    }

    /// A new configuration for a resized surface
    pub fn resized(&self, screen: ScreenDimensions) -> Result<Self, ConfigError> {
        Self::new(self.config.clone(), screen)
    }

    pub fn scope(&self) -> TimeScope {
        self.scope
    }

    pub fn geometry(&self) -> &AxisGeometry {
        &self.geometry
    }

    pub fn screen(&self) -> ScreenDimensions {
        self.screen
    }

    pub fn timeline(&self) -> &TimelineConfig {
        &self.config.timeline
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.config.layout
    }

    pub fn palette(&self) -> &PaletteConfig {
        &self.config.palette
    }

    pub fn clock(&self) -> &ClockConfig {
        &self.config.clock
    }

    pub fn low_bit_ambient(&self) -> bool {
        self.config.display.low_bit_ambient
    }
}

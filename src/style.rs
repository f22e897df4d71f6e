//! # Render Modes and Styles
//!
//! The watch face runs in one of two modes. Interactive mode is refreshed
//! every second and drawn in full color. Ambient mode is the always-on,
//! low-power state: it refreshes once a minute, uses the dim alternate of
//! every color, outlines what would otherwise be filled, drops second-level
//! detail, and turns anti-aliasing off on low-bit displays.
//!
//! Styles are computed per draw call from the mode instead of being kept in
//! mutable paint objects.

use crate::config::{ColorPair, PaletteConfig};
use crate::Color;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    #[default]
    Interactive,
    Ambient,
}

impl RenderMode {
    pub fn from_ambient(ambient: bool) -> Self {
        if ambient {
            RenderMode::Ambient
        } else {
            RenderMode::Interactive
        }
    }

    pub fn is_ambient(self) -> bool {
        self == RenderMode::Ambient
    }
}

/// Every kind of thing the watch face paints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Element {
    Background,
    Axis,
    NowBar,
    HourMark,
    HourLabel,
    EventBar,
    EventTitle,
    Temperature,
    TemperatureLabel,
    Precipitation,
    PrecipitationLabel,
    MinutelyPrecipitation,
    MinutelyLabel,
    ClockHour,
    ClockMinute,
    ClockSecond,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Paint {
    Fill,
    Stroke,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Style {
    pub color: Color,
    pub paint: Paint,
    pub stroke_width: f32,
    pub antialiased: bool,
}

impl Style {
    pub fn with_color(self, color: Color) -> Self {
        Self { color, ..self }
    }
}

fn colors(element: Element, palette: &PaletteConfig) -> ColorPair {
    match element {
        Element::Background => palette.background,
        Element::Axis | Element::NowBar | Element::HourMark => palette.timeline,
        Element::HourLabel | Element::EventTitle => palette.timeline_text,
        // interactive event bars take the calendar color, see `event_bar_style`
        Element::EventBar => ColorPair::new(palette.event_ambient, palette.event_ambient),
        Element::Temperature | Element::TemperatureLabel => palette.temperature,
        Element::Precipitation | Element::PrecipitationLabel => palette.precipitation,
        Element::MinutelyPrecipitation | Element::MinutelyLabel => palette.minutely,
        Element::ClockHour => palette.clock_hour,
        Element::ClockMinute => palette.clock_minute,
        Element::ClockSecond => palette.clock_second,
    }
}

/// Style of `element` in `mode`.
///
/// `low_bit_ambient` tells whether the display loses color depth in ambient
/// mode, in which case anti-aliasing is switched off there.
pub fn style_for(
    element: Element,
    mode: RenderMode,
    palette: &PaletteConfig,
    low_bit_ambient: bool,
    stroke_width: f32,
) -> Style {
    let pair = colors(element, palette);
    let ambient = mode.is_ambient();
    let outline_in_ambient = matches!(
        element,
        Element::EventBar | Element::ClockHour | Element::ClockMinute
    );
    Style {
        color: if ambient { pair.ambient } else { pair.interactive },
        paint: if ambient && outline_in_ambient {
            Paint::Stroke
        } else {
            Paint::Fill
        },
        stroke_width,
        antialiased: !(ambient && low_bit_ambient),
    }
}

/// Event bars carry their calendar color while interactive.
pub fn event_bar_style(
    event_color: Color,
    mode: RenderMode,
    palette: &PaletteConfig,
    low_bit_ambient: bool,
    stroke_width: f32,
) -> Style {
    let style = style_for(Element::EventBar, mode, palette, low_bit_ambient, stroke_width);
    match mode {
        RenderMode::Interactive => style.with_color(event_color),
        RenderMode::Ambient => style,
    }
}

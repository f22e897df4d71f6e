//! Draw commands emitted by the renderer and the text metrics it needs.
//!
//! A frame is an ordered `Vec<DrawCommand>`; later commands paint over
//! earlier ones. Coordinates are surface pixels, y grows downward.

use crate::style::Style;
use crate::Color;
use embedded_graphics::mono_font::{iso_8859_1, MonoFont};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

impl PointF {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis aligned rectangle given by its edges.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RectF {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl RectF {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// A bar of `thickness` centered on `x`, reaching `size / 2` above and
    /// below `y`.
    pub fn centered_bar(x: f32, y: f32, thickness: f32, size: f32) -> Self {
        Self::new(
            x - thickness / 2.0,
            y - size / 2.0,
            x + thickness / 2.0,
            y + size / 2.0,
        )
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Which font a text is set in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FontRole {
    /// Hour numbers, event titles and weather labels
    Timeline,
    ClockLarge,
    ClockSmall,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Fill the whole surface
    Clear { color: Color },
    Line {
        from: PointF,
        to: PointF,
        style: Style,
    },
    Rect { rect: RectF, style: Style },
    /// `position` is the left end of the text baseline
    Text {
        text: String,
        position: PointF,
        font: FontRole,
        style: Style,
    },
}

impl DrawCommand {
    pub fn text(&self) -> Option<&str> {
        match self {
            DrawCommand::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Font measurements supplied by the drawing surface.
pub trait TextMetrics {
    /// Width in pixels `text` takes when set in `font`.
    fn text_width(&self, text: &str, font: FontRole) -> f32;
}

/// Metrics of the `embedded-graphics` mono fonts used by [`crate::canvas`].
#[derive(Clone, Copy, Debug, Default)]
pub struct MonoTextMetrics;

impl MonoTextMetrics {
    pub fn font(role: FontRole) -> &'static MonoFont<'static> {
        match role {
            FontRole::Timeline => &iso_8859_1::FONT_6X10,
            FontRole::ClockLarge => &iso_8859_1::FONT_10X20,
            FontRole::ClockSmall => &iso_8859_1::FONT_7X13,
        }
    }
}

impl TextMetrics for MonoTextMetrics {
    fn text_width(&self, text: &str, font: FontRole) -> f32 {
        let font = Self::font(font);
        let chars = text.chars().count() as u32;
        if chars == 0 {
            return 0.0;
        }
        (chars * font.character_size.width + (chars - 1) * font.character_spacing) as f32
    }
}

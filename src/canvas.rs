//! # Rasterization
//!
//! Plays a frame's [`DrawCommand`]s onto any `embedded-graphics`
//! [`DrawTarget`] and provides [`PixelBuffer`], an in-memory target with an
//! ASCII preview for development without a watch.
//!
//! Coordinates are rounded to whole pixels. Text uses the fonts of
//! [`MonoTextMetrics`], so the widths the renderer measured are the widths
//! that get drawn. Drawing outside the target is clipped.

use crate::draw::{DrawCommand, MonoTextMetrics, PointF, RectF};
use crate::style::{Paint, Style};
use crate::Color;
use core::convert::Infallible;
use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, StrokeAlignment},
    text::{Baseline, Text},
};

impl From<Color> for Rgb888 {
    fn from(color: Color) -> Self {
        Rgb888::new(color.r, color.g, color.b)
    }
}

fn point(p: PointF) -> Point {
    Point::new(p.x.round() as i32, p.y.round() as i32)
}

fn stroke_width(style: &Style) -> u32 {
    style.stroke_width.round().max(1.0) as u32
}

fn rectangle(rect: &RectF) -> Rectangle {
    let top_left = point(PointF::new(rect.left, rect.top));
    // thin bars still cover one pixel
    let size = Size::new(
        rect.width().round().max(1.0) as u32,
        rect.height().round().max(1.0) as u32,
    );
    Rectangle::new(top_left, size)
}

fn primitive_style(style: &Style) -> PrimitiveStyle<Rgb888> {
    let color = Rgb888::from(style.color);
    match style.paint {
        Paint::Fill => PrimitiveStyle::with_fill(color),
        Paint::Stroke => PrimitiveStyleBuilder::new()
            .stroke_color(color)
            .stroke_width(stroke_width(style))
            .stroke_alignment(StrokeAlignment::Inside)
            .build(),
    }
}

/// Draw `commands` in order onto `target`.
pub fn rasterize<D>(commands: &[DrawCommand], target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    for command in commands {
        match command {
            DrawCommand::Clear { color } => target.clear(Rgb888::from(*color))?,
            DrawCommand::Line { from, to, style } => {
                Line::new(point(*from), point(*to))
                    .into_styled(PrimitiveStyle::with_stroke(
                        Rgb888::from(style.color),
                        stroke_width(style),
                    ))
                    .draw(target)?;
            }
            DrawCommand::Rect { rect, style } => {
                rectangle(rect)
                    .into_styled(primitive_style(style))
                    .draw(target)?;
            }
            DrawCommand::Text {
                text,
                position,
                font,
                style,
            } => {
                let text_style = MonoTextStyle::new(MonoTextMetrics::font(*font), Rgb888::from(style.color));
                Text::with_baseline(text, point(*position), text_style, Baseline::Alphabetic)
                    .draw(target)?;
            }
        }
    }
    Ok(())
}

/// Frame buffer in memory.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb888>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb888::BLACK; (width * height) as usize],
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb888> {
        self.index(Point::new(x, y)).map(|i| self.pixels[i])
    }

    fn index(&self, p: Point) -> Option<usize> {
        let (x, y) = (u32::try_from(p.x).ok()?, u32::try_from(p.y).ok()?);
        (x < self.width && y < self.height).then(|| (y * self.width + x) as usize)
    }

    /// Coarse preview, `columns` characters wide. A cell is `#` when most of
    /// its pixels differ from `background`, `+` when some do.
    pub fn to_ascii(&self, background: Rgb888, columns: u32) -> String {
        let columns = columns.clamp(1, self.width.max(1));
        let cell_w = (self.width / columns).max(1);
        // terminal characters are about twice as tall as wide
        let cell_h = cell_w * 2;
        let rows = self.height / cell_h;

        let mut out = String::with_capacity(((columns + 1) * rows) as usize);
        for row in 0..rows {
            for column in 0..columns {
                let mut painted = 0;
                for y in row * cell_h..(row + 1) * cell_h {
                    for x in column * cell_w..(column + 1) * cell_w {
                        if self.pixel(x as i32, y as i32).is_some_and(|c| c != background) {
                            painted += 1;
                        }
                    }
                }
                out.push(match painted {
                    0 => ' ',
                    n if n * 2 > cell_w * cell_h => '#',
                    _ => '+',
                });
            }
            out.push('\n');
        }
        out
    }
}

impl OriginDimensions for PixelBuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for PixelBuffer {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, color) in pixels {
            if let Some(i) = self.index(p) {
                self.pixels[i] = color;
            }
        }
        Ok(())
    }
}

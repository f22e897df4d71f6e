//! Digital time display drawn over the timeline.
//!
//! Hours are set large, minutes small to their upper right and seconds small
//! below the minutes. Seconds are only shown in interactive mode since
//! ambient mode refreshes once a minute.

use crate::config::{ClockConfig, PaletteConfig};
use crate::draw::{DrawCommand, FontRole, PointF};
use crate::style::{style_for, Element, RenderMode};
use chrono::{DateTime, FixedOffset, Timelike};

pub struct DigitalClock<'a> {
    config: &'a ClockConfig,
    palette: &'a PaletteConfig,
    low_bit_ambient: bool,
    stroke_width: f32,
}

impl<'a> DigitalClock<'a> {
    pub fn new(
        config: &'a ClockConfig,
        palette: &'a PaletteConfig,
        low_bit_ambient: bool,
        stroke_width: f32,
    ) -> Self {
        Self {
            config,
            palette,
            low_bit_ambient,
            stroke_width,
        }
    }

    /// Hour text without leading zero, 1-12 when the 12 hour format is on.
    pub fn hour_text(&self, now: DateTime<FixedOffset>) -> String {
        if self.config.hour_format_12 {
            now.hour12().1.to_string()
        } else {
            now.hour().to_string()
        }
    }

    pub fn draw(&self, now: DateTime<FixedOffset>, center: PointF, mode: RenderMode) -> Vec<DrawCommand> {
        let config = self.config;
        let origin = PointF::new(
            center.x + config.digital_x_offset,
            center.y + config.digital_y_offset,
        );

        let hours = self.hour_text(now);
        let hour_x = if hours.chars().count() > 1 {
            origin.x - config.two_digit_correction
        } else {
            origin.x
        };

        let mut commands = vec![
            self.text(hours, PointF::new(hour_x, origin.y), FontRole::ClockLarge, Element::ClockHour, mode),
            self.text(
                format!("{:02}", now.minute()),
                PointF::new(origin.x + config.minutes_offset_x, origin.y + config.minutes_offset_y),
                FontRole::ClockSmall,
                Element::ClockMinute,
                mode,
            ),
        ];
        if !mode.is_ambient() {
            commands.push(self.text(
                format!("{:02}", now.second()),
                PointF::new(origin.x + config.seconds_offset_x, origin.y + config.seconds_offset_y),
                FontRole::ClockSmall,
                Element::ClockSecond,
                mode,
            ));
        }
        commands
    }

    fn text(
        &self,
        text: String,
        position: PointF,
        font: FontRole,
        element: Element,
        mode: RenderMode,
    ) -> DrawCommand {
        DrawCommand::Text {
            text,
            position,
            font,
            style: style_for(element, mode, self.palette, self.low_bit_ambient, self.stroke_width),
        }
    }
}

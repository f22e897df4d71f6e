//! # Timeline Rendering
//!
//! [`TimelineRenderer`] turns one frame of [`TimelineData`] into draw
//! commands, back to front:
//!
//! 1. the timeline itself, ending in an arrow head
//! 2. the now bar
//! 3. a scale bar and the hour number for every full hour in scope
//! 4. the calendar events, stacked in rows above the timeline
//! 5. the weather: temperature curve and precipitation probability when the
//!    hourly forecast is there, the minutely chart when the minutely forecast
//!    is there and the face is interactive
//!
//! Missing data only removes the corresponding elements; drawing never
//! fails. The renderer's only state is its [`RenderConfig`] and the current
//! [`RenderMode`].

use crate::calendar::visible_events;
use crate::config::{ConfigError, RenderConfig, ScreenDimensions};
use crate::draw::{DrawCommand, FontRole, PointF, RectF, TextMetrics};
use crate::hour_marks::HourMarks;
use crate::packing::{pack_events, PackedEvent};
use crate::style::{event_bar_style, style_for, Element, RenderMode, Style};
use crate::time_axis::TimeAxis;
use crate::weather::{BarChart, Label, WeatherCurveBuilder};
use crate::{TimelineData, WeatherSnapshot};
use chrono::Timelike;
use log::{debug, info};

pub struct TimelineRenderer {
    config: RenderConfig,
    mode: RenderMode,
}

impl TimelineRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            mode: RenderMode::Interactive,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Rebuild the configuration for a resized surface. Must run before the
    /// next [`draw`](Self::draw) after the surface changed; on error the
    /// previous configuration stays in place.
    pub fn update_screen_dimensions(&mut self, screen: ScreenDimensions) -> Result<(), ConfigError> {
        self.config = self.config.resized(screen)?;
        debug!(
            "timeline geometry updated for {}x{}: {:?}",
            screen.width,
            screen.height,
            self.config.geometry()
        );
        Ok(())
    }

    pub fn on_mode_changed(&mut self, ambient: bool) {
        let mode = RenderMode::from_ambient(ambient);
        if mode != self.mode {
            info!("render mode changed to {:?}", mode);
        }
        self.mode = mode;
    }

    fn style(&self, element: Element) -> Style {
        style_for(
            element,
            self.mode,
            self.config.palette(),
            self.config.low_bit_ambient(),
            self.config.layout().line_width,
        )
    }

    /// The timeline of one frame.
    pub fn draw(&self, data: &TimelineData<'_>, metrics: &dyn TextMetrics) -> Vec<DrawCommand> {
        let axis = TimeAxis::new(data.now_utc(), self.config.scope(), self.config.geometry());
        let mut commands = Vec::new();

        self.draw_axis(&mut commands);
        self.draw_hour_marks(&mut commands, data, &axis, metrics);
        let rows = self.draw_events(&mut commands, data, &axis, metrics);
        if let Some(weather) = data.weather {
            self.draw_weather(&mut commands, weather, &axis, metrics);
        }

        debug!(
            "frame at {}: {} events in {} rows, weather {}, {} commands",
            data.now.format("%H:%M:%S"),
            data.events.len(),
            rows,
            if data.weather.is_some() { "present" } else { "absent" },
            commands.len()
        );
        commands
    }

    fn draw_axis(&self, commands: &mut Vec<DrawCommand>) {
        let geometry = self.config.geometry();
        let layout = self.config.layout();
        let style = self.style(Element::Axis);
        let cy = geometry.center_y;
        let tip = PointF::new(geometry.axis_length, cy);
        let back = geometry.axis_length - geometry.arrow_length;

        commands.push(DrawCommand::Line {
            from: PointF::new(0.0, cy),
            to: tip,
            style,
        });
        for wing in [cy + geometry.arrow_length, cy - geometry.arrow_length] {
            commands.push(DrawCommand::Line {
                from: tip,
                to: PointF::new(back, wing),
                style,
            });
        }

        commands.push(DrawCommand::Rect {
            rect: RectF::centered_bar(
                geometry.now_x,
                cy,
                layout.now_bar_thickness,
                layout.now_bar_size,
            ),
            style: self.style(Element::NowBar),
        });
    }

    fn draw_hour_marks(
        &self,
        commands: &mut Vec<DrawCommand>,
        data: &TimelineData<'_>,
        axis: &TimeAxis,
        metrics: &dyn TextMetrics,
    ) {
        let layout = self.config.layout();
        let cy = self.config.geometry().center_y;
        let offset = data.now.offset();

        for mark in HourMarks::new(data.now, axis.scope()) {
            let x = axis.coordinate_of(mark);
            commands.push(DrawCommand::Rect {
                rect: RectF::centered_bar(x, cy, layout.hour_mark_thickness, layout.hour_mark_size),
                style: self.style(Element::HourMark),
            });

            let text = mark.with_timezone(offset).hour().to_string();
            let width = metrics.text_width(&text, FontRole::Timeline);
            commands.push(DrawCommand::Text {
                position: PointF::new(x - width / 2.0, cy + layout.hour_mark_text_offset),
                text,
                font: FontRole::Timeline,
                style: self.style(Element::HourLabel),
            });
        }
    }

    /// Returns the number of rows used.
    fn draw_events(
        &self,
        commands: &mut Vec<DrawCommand>,
        data: &TimelineData<'_>,
        axis: &TimeAxis,
        metrics: &dyn TextMetrics,
    ) -> usize {
        let layout = self.config.layout();
        let cy = self.config.geometry().center_y;
        let events = visible_events(
            data.events,
            axis.now(),
            axis.scope(),
            self.config.timeline().packing_order,
        );
        let packed = pack_events(&events, axis, |title| {
            metrics.text_width(title, FontRole::Timeline) + layout.event_title_padding
        });

        for PackedEvent {
            event,
            x_begin,
            x_end,
            row,
            ..
        } in &packed
        {
            let lift = *row as f32 * layout.event_row_spacing;
            commands.push(DrawCommand::Rect {
                rect: RectF::new(*x_begin, cy - layout.event_bar_height - lift, *x_end, cy - lift),
                style: event_bar_style(
                    event.color,
                    self.mode,
                    self.config.palette(),
                    self.config.low_bit_ambient(),
                    layout.line_width,
                ),
            });
            commands.push(DrawCommand::Text {
                text: event.title.clone(),
                position: PointF::new(*x_begin, cy + layout.event_title_offset - lift),
                font: FontRole::Timeline,
                style: self.style(Element::EventTitle),
            });
        }
        packed.iter().map(|p| p.row + 1).max().unwrap_or(0)
    }

    fn draw_weather(
        &self,
        commands: &mut Vec<DrawCommand>,
        weather: &WeatherSnapshot,
        axis: &TimeAxis,
        metrics: &dyn TextMetrics,
    ) {
        let builder = WeatherCurveBuilder::new(
            axis,
            self.config.layout(),
            self.config.geometry().center_y,
            self.config.scope(),
        );
        let current = &weather.current;

        if let Some(hourly) = weather.hourly.samples() {
            let style = self.style(Element::Temperature);
            for (from, to) in builder.temperature_curve(current, hourly).segments() {
                commands.push(DrawCommand::Line { from, to, style });
            }
            let chart = builder.precipitation_chart(current, hourly, metrics);
            self.push_chart(commands, chart, Element::Precipitation, Element::PrecipitationLabel);
        }

        if let Some(minutely) = weather.minutely.samples() {
            if !self.mode.is_ambient() {
                let chart = builder.minutely_chart(current, minutely, metrics);
                self.push_chart(
                    commands,
                    chart,
                    Element::MinutelyPrecipitation,
                    Element::MinutelyLabel,
                );
            }
        }

        let label = builder.current_temperature_label(
            current,
            &self.config.timeline().temperature_units,
            metrics,
        );
        self.push_label(commands, label, Element::TemperatureLabel);
    }

    fn push_chart(
        &self,
        commands: &mut Vec<DrawCommand>,
        chart: BarChart,
        bar: Element,
        label: Element,
    ) {
        let style = self.style(bar);
        commands.extend(chart.bars.into_iter().map(|rect| DrawCommand::Rect { rect, style }));
        if let Some(peak) = chart.peak {
            self.push_label(commands, peak, label);
        }
    }

    fn push_label(&self, commands: &mut Vec<DrawCommand>, label: Label, element: Element) {
        commands.push(DrawCommand::Text {
            text: label.text,
            position: label.position,
            font: FontRole::Timeline,
            style: self.style(element),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::draw::MonoTextMetrics;
    use crate::style::Paint;
    use crate::{CalendarEvent, Color, CurrentWeather, HourlySample, Series};
    use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 14, 10, 0, 0)
            .unwrap()
    }

    fn renderer() -> TimelineRenderer {
        let mut config = Config::default();
        config.timeline.scope_hours = 3;
        let screen = ScreenDimensions {
            width: 400,
            height: 400,
        };
        TimelineRenderer::new(RenderConfig::new(config, screen).unwrap())
    }

    fn texts(commands: &[DrawCommand]) -> Vec<&str> {
        commands.iter().filter_map(DrawCommand::text).collect()
    }

    #[test]
    fn test_empty_frame_has_axis_now_bar_and_hours() {
        let renderer = renderer();
        let data = TimelineData {
            now: now(),
            events: &[],
            weather: None,
        };
        let commands = renderer.draw(&data, &MonoTextMetrics);

        // line + two arrow wings + now bar + 3 × (bar, label)
        assert_eq!(commands.len(), 4 + 6);
        assert_eq!(texts(&commands), vec!["11", "12", "13"]);
        match &commands[0] {
            DrawCommand::Line { from, to, .. } => {
                assert_eq!(*from, PointF::new(0.0, 200.0));
                assert_eq!(*to, PointF::new(400.0, 200.0));
            }
            other => panic!("expected the timeline first, got {other:?}"),
        }
        match &commands[3] {
            DrawCommand::Rect { rect, .. } => assert_eq!(rect.left + rect.width() / 2.0, 60.0),
            other => panic!("expected the now bar, got {other:?}"),
        }
    }

    #[test]
    fn test_event_rows_lift_bars() {
        let renderer = renderer();
        let utc = now().with_timezone(&Utc);
        let events = vec![
            CalendarEvent {
                id: 1,
                title: "standup".into(),
                begin: utc,
                end: utc + Duration::hours(1),
                color: Color::new(0xFF, 0, 0),
                all_day: false,
            },
            CalendarEvent {
                id: 2,
                title: "review".into(),
                begin: utc + Duration::minutes(15),
                end: utc + Duration::minutes(45),
                color: Color::new(0, 0xFF, 0),
                all_day: false,
            },
        ];
        let data = TimelineData {
            now: now(),
            events: &events,
            weather: None,
        };
        let commands = renderer.draw(&data, &MonoTextMetrics);

        let bars: Vec<&RectF> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Rect { rect, style } if style.color.r == 0xFF && style.color.g == 0 => {
                    Some(rect)
                }
                DrawCommand::Rect { rect, style } if style.color.g == 0xFF && style.color.r == 0 => {
                    Some(rect)
                }
                _ => None,
            })
            .collect();
        assert_eq!(bars.len(), 2);
        // defaults: bar 6 px high, rows 18 px apart, timeline at y = 200
        assert_eq!(bars[0].bottom, 200.0);
        assert_eq!(bars[0].top, 194.0);
        assert_eq!(bars[1].bottom, 182.0);
        assert!(texts(&commands).contains(&"review"));
    }

    #[test]
    fn test_ambient_event_bars_are_outlined() {
        let mut renderer = renderer();
        renderer.on_mode_changed(true);
        let utc = now().with_timezone(&Utc);
        let events = vec![CalendarEvent {
            id: 1,
            title: "focus".into(),
            begin: utc,
            end: utc + Duration::hours(2),
            color: Color::new(0xFF, 0, 0),
            all_day: false,
        }];
        let data = TimelineData {
            now: now(),
            events: &events,
            weather: None,
        };
        let commands = renderer.draw(&data, &MonoTextMetrics);
        let outlined = commands.iter().any(|c| {
            matches!(c, DrawCommand::Rect { style, .. }
                if style.paint == Paint::Stroke
                    && style.color == renderer.config().palette().event_ambient)
        });
        assert!(outlined);
    }

    #[test]
    fn test_hourly_weather_draws_curve_and_labels() {
        let renderer = renderer();
        let utc = now().with_timezone(&Utc);
        let weather = WeatherSnapshot {
            current: CurrentWeather {
                timestamp: utc,
                temperature: 12.3,
            },
            hourly: Series::Present(
                (1..=5)
                    .map(|h| HourlySample {
                        timestamp: utc + Duration::hours(h),
                        temperature: 12.0 + h as f32,
                        probability_of_precipitation: 0.1 * h as f32,
                    })
                    .collect(),
            ),
            minutely: Series::Absent,
        };
        let data = TimelineData {
            now: now(),
            events: &[],
            weather: Some(&weather),
        };
        let commands = renderer.draw(&data, &MonoTextMetrics);
        let temperature = renderer.config().palette().temperature.interactive;

        // hours 1-3 are in scope: 3 segments from the current reading
        let segments = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { style, .. } if style.color == temperature))
            .count();
        assert_eq!(segments, 3);
        let labels = texts(&commands);
        assert!(labels.contains(&"12°C"));
        assert!(labels.contains(&"30%"));
    }

    #[test]
    fn test_resize_keeps_old_config_on_error() {
        let mut renderer = renderer();
        assert!(renderer
            .update_screen_dimensions(ScreenDimensions {
                width: 0,
                height: 0
            })
            .is_err());
        assert_eq!(renderer.config().geometry().axis_length, 400.0);

        renderer
            .update_screen_dimensions(ScreenDimensions {
                width: 300,
                height: 200,
            })
            .unwrap();
        assert_eq!(renderer.config().geometry().axis_length, 300.0);
        assert_eq!(renderer.config().geometry().center_y, 100.0);
    }
}

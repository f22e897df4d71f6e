//! One complete watch face frame: background, timeline and digital clock.

use crate::clock::DigitalClock;
use crate::config::{Config, ConfigError, RenderConfig, ScreenDimensions};
use crate::draw::{DrawCommand, PointF, TextMetrics};
use crate::renderer::TimelineRenderer;
use crate::style::{style_for, Element, RenderMode};
use crate::TimelineData;
use log::info;

pub struct WatchFace {
    timeline: TimelineRenderer,
}

impl WatchFace {
    /// Sized from the display section of `config` until the host reports
    /// the real surface.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let screen = config.screen_dimensions();
        let config = RenderConfig::new(config, screen)?;
        info!(
            "watch face ready: {}x{}, {} hour scope",
            screen.width,
            screen.height,
            config.timeline().scope_hours
        );
        Ok(Self {
            timeline: TimelineRenderer::new(config),
        })
    }

    pub fn mode(&self) -> RenderMode {
        self.timeline.mode()
    }

    pub fn config(&self) -> &RenderConfig {
        self.timeline.config()
    }

    pub fn on_ambient_mode_changed(&mut self, ambient: bool) {
        self.timeline.on_mode_changed(ambient);
    }

    pub fn on_surface_changed(&mut self, screen: ScreenDimensions) -> Result<(), ConfigError> {
        self.timeline.update_screen_dimensions(screen)
    }

    pub fn draw(&self, data: &TimelineData<'_>, metrics: &dyn TextMetrics) -> Vec<DrawCommand> {
        let config = self.timeline.config();
        let mode = self.mode();
        let background = style_for(
            Element::Background,
            mode,
            config.palette(),
            config.low_bit_ambient(),
            config.layout().line_width,
        );

        let mut commands = vec![DrawCommand::Clear {
            color: background.color,
        }];
        commands.extend(self.timeline.draw(data, metrics));

        let geometry = config.geometry();
        let clock = DigitalClock::new(
            config.clock(),
            config.palette(),
            config.low_bit_ambient(),
            config.layout().line_width,
        );
        commands.extend(clock.draw(
            data.now,
            PointF::new(geometry.center_x, geometry.center_y),
            mode,
        ));
        commands
    }
}

// ============================================================================
// WINDOW HOST
// ============================================================================

use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};

use kurbo::Rect;
use pixels::{Pixels, SurfaceTexture};
use tracing::{debug, info, trace, warn};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

use crate::attitude::{AttitudeIndicator, PITCH_LIMIT};
use crate::compass::Compass;
use crate::config::InstrumentConfig;
use crate::control::{InstrumentCommand, StepAction};
use crate::error::Result;
use crate::key_value::KeyValueList;
use crate::painter::Painter;
use crate::raster::{load_font, Canvas};

/// Placement of the three panels inside the window, left to right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub attitude: Rect,
    pub compass: Rect,
    pub table: Rect,
}

impl Layout {
    /// Split `width` into two equal instrument panels and a table column.
    pub fn split(width: f64, height: f64, table_width: f64) -> Self {
        let table_width = table_width.clamp(0.0, width.max(0.0));
        let panel = ((width - table_width) / 2.0).max(0.0);
        Self {
            attitude: Rect::new(0.0, 0.0, panel, height),
            compass: Rect::new(panel, 0.0, 2.0 * panel, height),
            table: Rect::new(2.0 * panel, 0.0, width.max(2.0 * panel), height),
        }
    }
}

/// Keyboard binding for interactive stepping.
pub fn step_for_key(key: Key<&str>) -> Option<StepAction> {
    match key {
        Key::Named(NamedKey::ArrowLeft) => Some(StepAction::RollLeft),
        Key::Named(NamedKey::ArrowRight) => Some(StepAction::RollRight),
        Key::Named(NamedKey::ArrowUp) => Some(StepAction::PitchUp),
        Key::Named(NamedKey::ArrowDown) => Some(StepAction::PitchDown),
        Key::Named(NamedKey::PageUp) => Some(StepAction::HeightUp),
        Key::Named(NamedKey::PageDown) => Some(StepAction::HeightDown),
        Key::Character(c) => match c.to_ascii_lowercase().as_str() {
            "a" => Some(StepAction::YawLeft),
            "d" => Some(StepAction::YawRight),
            "w" => Some(StepAction::AltitudeUp),
            "s" => Some(StepAction::AltitudeDown),
            _ => None,
        },
        _ => None,
    }
}

/// Attitude indicator, compass and key/value table in one window.
#[derive(Debug)]
pub struct Dashboard {
    config: InstrumentConfig,
    attitude: AttitudeIndicator,
    compass: Compass,
    table: KeyValueList,
    layout: Layout,
    surface: (f64, f64),
    scale_factor: f64,
}

impl Dashboard {
    pub fn new(config: InstrumentConfig) -> Self {
        let attitude = AttitudeIndicator::from_config(&config);
        let compass = Compass::from_config(&config);
        let table = KeyValueList::with_style(config.table_style.clone());
        let (width, height) = Self::initial_size(&config);
        let mut dashboard = Self {
            layout: Layout::split(width, height, config.table_width),
            config,
            attitude,
            compass,
            table,
            surface: (width, height),
            scale_factor: 1.0,
        };
        dashboard.on_resize(width, height);
        dashboard
    }

    fn initial_size(config: &InstrumentConfig) -> (f64, f64) {
        (2.0 * config.size_min + config.table_width, config.size_min)
    }

    pub fn config(&self) -> &InstrumentConfig {
        &self.config
    }

    pub fn attitude(&self) -> &AttitudeIndicator {
        &self.attitude
    }

    pub fn attitude_mut(&mut self) -> &mut AttitudeIndicator {
        &mut self.attitude
    }

    pub fn compass(&self) -> &Compass {
        &self.compass
    }

    pub fn compass_mut(&mut self) -> &mut Compass {
        &mut self.compass
    }

    /// Shared handle onto the table; clones may be moved to other threads.
    pub fn table(&self) -> KeyValueList {
        self.table.clone()
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn apply(&mut self, command: InstrumentCommand) {
        trace!(?command, "applying command");
        match command {
            InstrumentCommand::SetRoll(roll) => self.attitude.set_roll(roll),
            InstrumentCommand::SetPitch(pitch) => {
                self.attitude.set_pitch(pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT))
            }
            InstrumentCommand::SetAttitude(roll, pitch) => self
                .attitude
                .set_attitude(roll, pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT)),
            InstrumentCommand::SetYaw(yaw) => self.compass.set_yaw(yaw),
            InstrumentCommand::SetAltitude(altitude) => self.compass.set_altitude(altitude),
            InstrumentCommand::SetHeight(height) => self.compass.set_height(height),
            InstrumentCommand::Step(action) => {
                if !self.attitude.step(action) {
                    self.compass.step(action);
                }
            }
            InstrumentCommand::SetEntry(key, value) => self.table.insert(key, value),
            InstrumentCommand::RemoveEntry(key) => {
                self.table.remove(&key);
            }
        }
    }

    /// Apply every queued command without blocking. Returns how many ran.
    pub fn update_with_commands(&mut self, receiver: &Receiver<InstrumentCommand>) -> usize {
        let mut applied = 0;
        while let Ok(command) = receiver.try_recv() {
            self.apply(command);
            applied += 1;
        }
        applied
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Physical pixels per logical unit. Size limits, offsets and the table
    /// width are configured in logical units and scaled by this factor.
    pub fn set_scale_factor(&mut self, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            warn!(factor, "ignoring invalid scale factor");
            return;
        }
        self.scale_factor = factor;
        let size = self.config.size_context().scaled(factor);
        self.attitude.set_size_context(size);
        self.compass.set_size_context(size);
        let (width, height) = self.surface;
        self.on_resize(width, height);
    }

    /// Lay out the panels for a surface of `width` x `height` physical pixels.
    pub fn on_resize(&mut self, width: f64, height: f64) {
        self.surface = (width, height);
        let table_width = self.config.table_width * self.scale_factor;
        self.layout = Layout::split(width, height, table_width);
        self.attitude
            .on_resize(self.layout.attitude.width(), self.layout.attitude.height());
        self.compass
            .on_resize(self.layout.compass.width(), self.layout.compass.height());
        debug!(width, height, panel = self.layout.attitude.width(), "layout updated");
    }

    pub fn needs_redraw(&self) -> bool {
        self.attitude.needs_redraw() || self.compass.needs_redraw() || self.table.is_dirty()
    }

    /// Clear every pending redraw flag.
    pub fn mark_drawn(&mut self) {
        self.attitude.redraw().take();
        self.compass.redraw().take();
        self.table.take_dirty();
    }

    /// Draw all three panels at their layout positions.
    pub fn render<P: Painter + ?Sized>(&self, painter: &mut P) {
        let Layout {
            attitude,
            compass,
            table,
        } = self.layout;

        painter.save();
        painter.translate(attitude.x0, attitude.y0);
        self.attitude.render(painter);
        painter.restore();

        painter.save();
        painter.translate(compass.x0, compass.y0);
        self.compass.render(painter);
        painter.restore();

        painter.save();
        painter.translate(table.x0, table.y0);
        self.table.render(painter, table.width(), table.height());
        painter.restore();
    }

    pub fn show(&mut self) -> Result<()> {
        self.run_window(None)
    }

    pub fn show_with_commands(&mut self, receiver: Receiver<InstrumentCommand>) -> Result<()> {
        self.run_window(Some(receiver))
    }

    fn run_window(&mut self, receiver: Option<Receiver<InstrumentCommand>>) -> Result<()> {
        let (width, height) = Self::initial_size(&self.config);

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(width, height))
            .with_min_inner_size(LogicalSize::new(width, height))
            .build(&event_loop)?;
        let window = Arc::new(window);

        let font = match load_font(self.config.font_path.as_deref()) {
            Ok(font) => Some(font),
            Err(err) => {
                warn!(%err, "no font available, labels will not be drawn");
                None
            }
        };

        // Model changes schedule a frame right away.
        let notify = window.clone();
        self.attitude
            .redraw()
            .subscribe(move || notify.request_redraw());
        let notify = window.clone();
        self.compass
            .redraw()
            .subscribe(move || notify.request_redraw());

        let window_clone = window.clone();
        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;
        self.on_resize(fb_width as f64, fb_height as f64);
        self.set_scale_factor(window.scale_factor());

        let frame_duration = Duration::from_secs_f64(1.0 / self.config.max_framerate.max(1.0));
        let mut last_frame = Instant::now();

        info!(
            title = %self.config.title,
            width = fb_width,
            height = fb_height,
            "opening instrument window"
        );

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::WaitUntil(last_frame + frame_duration));
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        info!("window closed");
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if new_size.width == 0 || new_size.height == 0 {
                            return;
                        }
                        fb_width = new_size.width as usize;
                        fb_height = new_size.height as usize;
                        if let Err(err) = pixels.resize_buffer(new_size.width, new_size.height) {
                            warn!(%err, "failed to resize frame buffer");
                        }
                        if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                            warn!(%err, "failed to resize surface");
                        }
                        self.on_resize(fb_width as f64, fb_height as f64);
                    }
                    WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                        debug!(scale_factor, "scale factor changed");
                        self.set_scale_factor(scale_factor);
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        if event.state != ElementState::Pressed {
                            return;
                        }
                        if let Some(action) = step_for_key(event.logical_key.as_ref()) {
                            self.apply(InstrumentCommand::Step(action));
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        let mut canvas = Canvas::new(pixels.frame_mut(), fb_width, fb_height)
                            .with_font(font.as_ref());
                        canvas.clear(self.config.background_color);
                        self.render(&mut canvas);
                        self.mark_drawn();
                        if let Err(err) = pixels.render() {
                            warn!(%err, "failed to present frame");
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if last_frame.elapsed() < frame_duration {
                        return;
                    }
                    last_frame = Instant::now();
                    if let Some(receiver) = &receiver {
                        self.update_with_commands(receiver);
                    }
                    if self.table.is_dirty() {
                        window_clone.request_redraw();
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{DrawCommand, Scene};
    use kurbo::Point;
    use std::sync::mpsc;

    #[test]
    fn layout_splits_panels_evenly() {
        let layout = Layout::split(820.0, 300.0, 220.0);
        assert_eq!(layout.attitude, Rect::new(0.0, 0.0, 300.0, 300.0));
        assert_eq!(layout.compass, Rect::new(300.0, 0.0, 600.0, 300.0));
        assert_eq!(layout.table, Rect::new(600.0, 0.0, 820.0, 300.0));
    }

    #[test]
    fn keys_map_to_steps() {
        assert_eq!(
            step_for_key(Key::Named(NamedKey::ArrowLeft)),
            Some(StepAction::RollLeft)
        );
        assert_eq!(
            step_for_key(Key::Named(NamedKey::PageDown)),
            Some(StepAction::HeightDown)
        );
        assert_eq!(step_for_key(Key::Character("D")), Some(StepAction::YawRight));
        assert_eq!(step_for_key(Key::Character("q")), None);
    }

    #[test]
    fn commands_reach_the_right_model() {
        let mut dashboard = Dashboard::new(InstrumentConfig::default());
        let (sender, receiver) = mpsc::channel();
        for command in [
            InstrumentCommand::SetAttitude(10.0, 120.0),
            InstrumentCommand::SetYaw(45.0),
            InstrumentCommand::SetAltitude(250.0),
            InstrumentCommand::Step(StepAction::YawRight),
            InstrumentCommand::Step(StepAction::RollLeft),
            InstrumentCommand::SetEntry("mode".into(), "AUTO".into()),
        ] {
            sender.send(command).unwrap();
        }

        assert_eq!(dashboard.update_with_commands(&receiver), 6);
        assert_eq!(dashboard.attitude().roll(), 9.0);
        assert_eq!(dashboard.attitude().pitch(), 90.0);
        assert_eq!(dashboard.compass().yaw(), 46.0);
        assert_eq!(dashboard.compass().altitude(), 250.0);
        assert_eq!(dashboard.table().rows()[0].value, "AUTO");
        assert!(dashboard.needs_redraw());

        dashboard.mark_drawn();
        assert!(!dashboard.needs_redraw());
    }

    #[test]
    fn render_places_panels_side_by_side() {
        let mut dashboard = Dashboard::new(InstrumentConfig::default());
        dashboard.on_resize(820.0, 300.0);
        let mut scene = Scene::new();
        dashboard.render(&mut scene);

        let offsets: Vec<f64> = scene
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Translate { dx, dy } if *dy == 0.0 && *dx >= 300.0 => Some(*dx),
                _ => None,
            })
            .collect();
        assert!(offsets.contains(&300.0));
        assert!(offsets.contains(&600.0));
    }

    #[test]
    fn oversized_panels_center_their_instruments() {
        let mut dashboard = Dashboard::new(InstrumentConfig::default());
        dashboard.on_resize(1620.0, 800.0);
        assert_eq!(dashboard.layout().attitude.width(), 700.0);

        for size in [dashboard.attitude().size(), dashboard.compass().size()] {
            assert_eq!(size.current_size(), 596.0);
            assert_eq!(size.center(), Point::new(350.0, 400.0));
        }
    }

    #[test]
    fn scale_factor_scales_size_limits_and_table() {
        let mut dashboard = Dashboard::new(InstrumentConfig::default());
        dashboard.set_scale_factor(2.0);
        dashboard.on_resize(2440.0, 1000.0);

        assert_eq!(dashboard.layout().table.width(), 440.0);
        assert_eq!(dashboard.layout().attitude.width(), 1000.0);
        assert_eq!(dashboard.attitude().size().current_size(), 992.0);

        dashboard.set_scale_factor(0.0);
        assert_eq!(dashboard.scale_factor(), 2.0);
    }
}

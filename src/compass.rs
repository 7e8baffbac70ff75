//! Compass card with a heading marker and an altitude/height readout.
//!
//! Unlike the attitude indicator, the tick ring stays fixed and the heading
//! marker turns by `-yaw` to point at the current heading.

use kurbo::{Point, Rect};

use crate::color::Color;
use crate::config::{CompassStyle, InstrumentConfig};
use crate::control::StepAction;
use crate::painter::{centered_square, points_to_pixels, Align, Painter, Pen};
use crate::redraw::RedrawSignal;
use crate::scene::Scene;
use crate::size::SizeContext;

const HEADING_TICKS: usize = 36;
const HEADING_TICK_SPACING: f64 = 360.0 / HEADING_TICKS as f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinal {
    North,
    East,
    South,
    West,
}

impl Cardinal {
    fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Cardinal::North),
            9 => Some(Cardinal::East),
            18 => Some(Cardinal::South),
            27 => Some(Cardinal::West),
            _ => None,
        }
    }
}

/// One heading tick, described in its own rotated frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingTick {
    pub index: usize,
    /// Rotation applied to the tick frame, in degrees.
    pub angle: f64,
    pub start: Point,
    pub end: Point,
    pub label: Option<String>,
    pub cardinal: Option<Cardinal>,
}

impl HeadingTick {
    pub fn is_long(&self) -> bool {
        self.label.is_some()
    }
}

pub fn heading_ticks(size: &SizeContext) -> Vec<HeadingTick> {
    let current = size.current_size();
    let top = -current / 2.0 + size.offset();

    (0..HEADING_TICKS)
        .map(|index| {
            let long = index % 3 == 0;
            let length = if long { current / 25.0 } else { current / 50.0 };
            HeadingTick {
                index,
                angle: -(index as f64) * HEADING_TICK_SPACING,
                start: Point::new(0.0, top),
                end: Point::new(0.0, top + length),
                label: long.then(|| (index * 10).to_string()),
                cardinal: Cardinal::from_index(index),
            }
        })
        .collect()
}

/// Fore and aft reference arrows, fixed in screen space.
pub fn cardinal_arrows(size: &SizeContext, margin: f64) -> [[Point; 3]; 2] {
    let current = size.current_size();
    let reach = current / 2.0 - size.offset() - current / 25.0 - margin;
    let base = [
        Point::new(-current / 10.0, 0.0),
        Point::new(current / 10.0, 0.0),
    ];
    [
        [Point::new(0.0, -reach), base[0], base[1]],
        [Point::new(0.0, reach), base[0], base[1]],
    ]
}

/// Heading marker triangle before the `-yaw` rotation is applied.
pub fn heading_marker(size: &SizeContext) -> [Point; 3] {
    let current = size.current_size();
    let top = -current / 2.0 + size.offset();
    let base = top + current / 12.0;
    [
        Point::new(0.0, top),
        Point::new(-current / 24.0, base),
        Point::new(current / 24.0, base),
    ]
}

pub fn altitude_text(altitude: f64) -> String {
    format!("ALT: {altitude:.1} m")
}

pub fn height_text(height: f64) -> String {
    format!("H: {height:.1} m")
}

#[derive(Debug)]
pub struct Compass {
    yaw: f64,
    altitude: f64,
    height: f64,
    show_altitude_panel: bool,
    size: SizeContext,
    style: CompassStyle,
    redraw: RedrawSignal,
}

impl Compass {
    pub fn new(size: SizeContext) -> Self {
        Self {
            yaw: 0.0,
            altitude: 0.0,
            height: 0.0,
            show_altitude_panel: true,
            size,
            style: CompassStyle::default(),
            redraw: RedrawSignal::new(),
        }
    }

    pub fn from_config(config: &InstrumentConfig) -> Self {
        let mut compass =
            Self::new(config.size_context()).with_style(config.compass_style.clone());
        compass.show_altitude_panel = config.show_altitude_panel;
        compass
    }

    pub fn with_style(mut self, style: CompassStyle) -> Self {
        self.style = style;
        self
    }

    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn show_altitude_panel(&self) -> bool {
        self.show_altitude_panel
    }

    pub fn size(&self) -> &SizeContext {
        &self.size
    }

    /// Heading in degrees; stored unwrapped.
    pub fn set_yaw(&mut self, degrees: f64) {
        self.yaw = degrees;
        self.redraw.request();
    }

    pub fn set_altitude(&mut self, meters: f64) {
        self.altitude = meters;
        self.redraw.request();
    }

    pub fn set_height(&mut self, meters: f64) {
        self.height = meters;
        self.redraw.request();
    }

    pub fn set_show_altitude_panel(&mut self, show: bool) {
        self.show_altitude_panel = show;
        self.redraw.request();
    }

    pub fn on_resize(&mut self, width: f64, height: f64) {
        self.size.on_resize(width, height);
        self.redraw.request();
    }

    /// Swap the sizing limits; the next `on_resize` applies them.
    pub fn set_size_context(&mut self, size: SizeContext) {
        self.size = size;
        self.redraw.request();
    }

    /// Apply a one-unit interactive step. Returns false for actions that
    /// belong to another instrument.
    pub fn step(&mut self, action: StepAction) -> bool {
        match action {
            StepAction::YawLeft => self.set_yaw(self.yaw - 1.0),
            StepAction::YawRight => self.set_yaw(self.yaw + 1.0),
            StepAction::AltitudeUp => self.set_altitude(self.altitude + 1.0),
            StepAction::AltitudeDown => self.set_altitude(self.altitude - 1.0),
            StepAction::HeightUp => self.set_height(self.height + 1.0),
            StepAction::HeightDown => self.set_height(self.height - 1.0),
            _ => return false,
        }
        true
    }

    pub fn needs_redraw(&self) -> bool {
        self.redraw.is_pending()
    }

    pub fn redraw(&mut self) -> &mut RedrawSignal {
        &mut self.redraw
    }

    pub fn scene(&self) -> Scene {
        let mut scene = Scene::new();
        self.render(&mut scene);
        scene
    }

    fn tick_style(&self, cardinal: Option<Cardinal>) -> (Color, f32) {
        let style = &self.style;
        match cardinal {
            Some(Cardinal::North) => (style.north, style.big_font_size),
            Some(Cardinal::South) => (style.south, style.big_font_size),
            Some(Cardinal::East | Cardinal::West) => (style.east_west, style.big_font_size),
            None => (style.tick, style.small_font_size),
        }
    }

    pub fn render<P: Painter + ?Sized>(&self, painter: &mut P) {
        let size = &self.size;
        let style = &self.style;
        let center = size.center();

        painter.save();
        painter.translate(center.x, center.y);

        painter.ellipse(
            centered_square(size.current_size()),
            style.background,
            Some(style.outline),
        );

        for tick in heading_ticks(size) {
            let (color, font_size) = self.tick_style(tick.cardinal);
            painter.save();
            painter.rotate(tick.angle);
            painter.line(tick.start, tick.end, Pen::new(color, style.tick_width));
            if let Some(label) = &tick.label {
                let top = tick.end.y + 4.0;
                let height = points_to_pixels(font_size) + 2.0;
                let rect = Rect::new(-50.0, top, 50.0, top + height);
                painter.text(rect, Align::Center, label, font_size, color);
            }
            painter.restore();
        }

        let [front, back] = cardinal_arrows(size, style.arrow_margin);
        painter.polygon(&front, style.front_arrow);
        painter.polygon(&back, style.back_arrow);

        painter.save();
        painter.rotate(-self.yaw);
        painter.polygon(&heading_marker(size), style.heading_marker);
        painter.restore();

        if self.show_altitude_panel {
            let panel = Rect::new(
                -style.panel_width / 2.0,
                -style.panel_height / 2.0,
                style.panel_width / 2.0,
                style.panel_height / 2.0,
            );
            painter.rounded_rect(
                panel,
                style.panel_radius,
                style.panel_fill,
                Some(style.panel_outline),
            );
            let mid = panel.center().y;
            let upper = Rect::new(panel.x0, panel.y0 + 2.0, panel.x1, mid);
            let lower = Rect::new(panel.x0, mid, panel.x1, panel.y1);
            painter.text(
                upper,
                Align::Center,
                &altitude_text(self.altitude),
                style.panel_font_size,
                style.panel_text,
            );
            painter.text(
                lower,
                Align::Center,
                &height_text(self.height),
                style.panel_font_size,
                style.panel_text,
            );
        }

        painter.restore();
    }
}

impl Default for Compass {
    fn default() -> Self {
        Self::new(SizeContext::default())
    }
}

use kurbo::{Point, Rect};

use crate::color::Color;

/// Stroke settings for lines and outlines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub color: Color,
    pub width: f64,
}

impl Pen {
    pub const fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }
}

/// Horizontal text alignment inside a layout rectangle. Text is always
/// centered vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// A 2D drawing surface with a transform stack.
///
/// Angles are in degrees. Arc angles start at 3 o'clock and grow
/// counter-clockwise on screen; `rotate` with a positive angle turns the
/// frame clockwise on screen (y grows downward).
pub trait Painter {
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);
    fn rotate(&mut self, degrees: f64);
    fn clip_ellipse(&mut self, rect: Rect);
    fn chord(&mut self, rect: Rect, start: f64, sweep: f64, fill: Color, pen: Option<Pen>);
    fn ellipse(&mut self, rect: Rect, fill: Color, pen: Option<Pen>);
    fn polygon(&mut self, points: &[Point], fill: Color);
    fn line(&mut self, from: Point, to: Point, pen: Pen);
    fn text(&mut self, rect: Rect, align: Align, text: &str, size: f32, color: Color);
    fn rounded_rect(&mut self, rect: Rect, radius: f64, fill: Color, pen: Option<Pen>);

    /// Plain filled rectangle without an outline.
    fn fill_rect(&mut self, rect: Rect, fill: Color) {
        self.rounded_rect(rect, 0.0, fill, None);
    }
}

/// Point on the ellipse inscribed in `rect` at `degrees`, screen convention.
pub fn point_on_ellipse(rect: Rect, degrees: f64) -> Point {
    let center = rect.center();
    let (sin, cos) = degrees.to_radians().sin_cos();
    Point::new(
        center.x + rect.width() / 2.0 * cos,
        center.y - rect.height() / 2.0 * sin,
    )
}

/// Pixel height of a font given in points, at 96 dpi.
pub fn points_to_pixels(points: f32) -> f64 {
    points as f64 * 96.0 / 72.0
}

/// Square rectangle of side `size` centered on the origin.
pub fn centered_square(size: f64) -> Rect {
    Rect::new(-size / 2.0, -size / 2.0, size / 2.0, size / 2.0)
}

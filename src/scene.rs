// ============================================================================
// RETAINED MODE ABSTRACTIONS
// ============================================================================

use kurbo::{Affine, Point, Rect};

use crate::color::Color;
use crate::painter::{Align, Painter, Pen};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Save,
    Restore,
    Translate {
        dx: f64,
        dy: f64,
    },
    Rotate(f64),
    ClipEllipse(Rect),
    Chord {
        rect: Rect,
        start: f64,
        sweep: f64,
        fill: Color,
        pen: Option<Pen>,
    },
    Ellipse {
        rect: Rect,
        fill: Color,
        pen: Option<Pen>,
    },
    Polygon {
        points: Vec<Point>,
        fill: Color,
    },
    Line {
        from: Point,
        to: Point,
        pen: Pen,
    },
    Text {
        rect: Rect,
        align: Align,
        text: String,
        size: f32,
        color: Color,
    },
    RoundedRect {
        rect: Rect,
        radius: f64,
        fill: Color,
        pen: Option<Pen>,
    },
}

impl DrawCommand {
    /// True for commands that only change painter state.
    pub fn is_state(&self) -> bool {
        matches!(
            self,
            DrawCommand::Save
                | DrawCommand::Restore
                | DrawCommand::Translate { .. }
                | DrawCommand::Rotate(_)
        )
    }
}

/// A drawing command together with the transform active when it was issued.
#[derive(Debug, Clone, Copy)]
pub struct Placed<'a> {
    pub transform: Affine,
    pub command: &'a DrawCommand,
}

impl Placed<'_> {
    pub fn map(&self, point: Point) -> Point {
        self.transform * point
    }
}

/// An ordered frame of draw commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Play every recorded command into `painter`, in order.
    pub fn replay<P: Painter + ?Sized>(&self, painter: &mut P) {
        for command in &self.commands {
            match command {
                DrawCommand::Save => painter.save(),
                DrawCommand::Restore => painter.restore(),
                DrawCommand::Translate { dx, dy } => painter.translate(*dx, *dy),
                DrawCommand::Rotate(degrees) => painter.rotate(*degrees),
                DrawCommand::ClipEllipse(rect) => painter.clip_ellipse(*rect),
                DrawCommand::Chord {
                    rect,
                    start,
                    sweep,
                    fill,
                    pen,
                } => painter.chord(*rect, *start, *sweep, *fill, *pen),
                DrawCommand::Ellipse { rect, fill, pen } => painter.ellipse(*rect, *fill, *pen),
                DrawCommand::Polygon { points, fill } => painter.polygon(points, *fill),
                DrawCommand::Line { from, to, pen } => painter.line(*from, *to, *pen),
                DrawCommand::Text {
                    rect,
                    align,
                    text,
                    size,
                    color,
                } => painter.text(*rect, *align, text, *size, *color),
                DrawCommand::RoundedRect {
                    rect,
                    radius,
                    fill,
                    pen,
                } => painter.rounded_rect(*rect, *radius, *fill, *pen),
            }
        }
    }

    /// Drawing commands paired with their screen transform. State commands
    /// are folded away.
    pub fn resolve(&self) -> Vec<Placed<'_>> {
        let mut transform = Affine::IDENTITY;
        let mut stack = Vec::new();
        let mut placed = Vec::new();
        for command in &self.commands {
            match command {
                DrawCommand::Save => stack.push(transform),
                DrawCommand::Restore => {
                    if let Some(saved) = stack.pop() {
                        transform = saved;
                    }
                }
                DrawCommand::Translate { dx, dy } => {
                    transform = transform * Affine::translate((*dx, *dy));
                }
                DrawCommand::Rotate(degrees) => {
                    transform = transform * Affine::rotate(degrees.to_radians());
                }
                _ => placed.push(Placed { transform, command }),
            }
        }
        placed
    }
}

impl Painter for Scene {
    fn save(&mut self) {
        self.add_command(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.add_command(DrawCommand::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.add_command(DrawCommand::Translate { dx, dy });
    }

    fn rotate(&mut self, degrees: f64) {
        self.add_command(DrawCommand::Rotate(degrees));
    }

    fn clip_ellipse(&mut self, rect: Rect) {
        self.add_command(DrawCommand::ClipEllipse(rect));
    }

    fn chord(&mut self, rect: Rect, start: f64, sweep: f64, fill: Color, pen: Option<Pen>) {
        self.add_command(DrawCommand::Chord {
            rect,
            start,
            sweep,
            fill,
            pen,
        });
    }

    fn ellipse(&mut self, rect: Rect, fill: Color, pen: Option<Pen>) {
        self.add_command(DrawCommand::Ellipse { rect, fill, pen });
    }

    fn polygon(&mut self, points: &[Point], fill: Color) {
        self.add_command(DrawCommand::Polygon {
            points: points.to_vec(),
            fill,
        });
    }

    fn line(&mut self, from: Point, to: Point, pen: Pen) {
        self.add_command(DrawCommand::Line { from, to, pen });
    }

    fn text(&mut self, rect: Rect, align: Align, text: &str, size: f32, color: Color) {
        self.add_command(DrawCommand::Text {
            rect,
            align,
            text: text.to_string(),
            size,
            color,
        });
    }

    fn rounded_rect(&mut self, rect: Rect, radius: f64, fill: Color, pen: Option<Pen>) {
        self.add_command(DrawCommand::RoundedRect {
            rect,
            radius,
            fill,
            pen,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn resolve_composes_local_transforms() {
        let mut scene = Scene::new();
        scene.translate(10.0, 20.0);
        scene.save();
        scene.rotate(90.0);
        scene.line(Point::ZERO, Point::new(5.0, 0.0), Pen::new(Color::BLACK, 1.0));
        scene.restore();
        scene.line(Point::ZERO, Point::new(5.0, 0.0), Pen::new(Color::BLACK, 1.0));

        let placed = scene.resolve();
        assert_eq!(placed.len(), 2);

        // Positive rotation turns clockwise on screen: +x maps to +y.
        let rotated = placed[0].map(Point::new(5.0, 0.0));
        assert_abs_diff_eq!(rotated.x, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(rotated.y, 25.0, epsilon = 1e-9);

        let restored = placed[1].map(Point::new(5.0, 0.0));
        assert_abs_diff_eq!(restored.x, 15.0, epsilon = 1e-9);
        assert_abs_diff_eq!(restored.y, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn replay_reproduces_the_scene() {
        let mut scene = Scene::new();
        scene.save();
        scene.translate(3.0, 4.0);
        scene.ellipse(Rect::new(0.0, 0.0, 2.0, 2.0), Color::SKY, None);
        scene.text(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Align::Center,
            "N",
            8.0,
            Color::BLUE,
        );
        scene.restore();

        let mut copy = Scene::new();
        scene.replay(&mut copy);
        assert_eq!(scene, copy);
    }
}

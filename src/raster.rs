// ============================================================================
// SOFTWARE RASTERIZER
// ============================================================================

use std::path::{Path, PathBuf};

use kurbo::{Affine, BezPath, Ellipse, Point, Rect, RoundedRect, Shape};
use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::color::Color;
use crate::error::{InstrumentError, Result};
use crate::painter::{point_on_ellipse, points_to_pixels, Align, Painter, Pen};

/// Fonts tried when no font path is configured.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

pub fn load_font_file(path: &Path) -> Result<Font<'static>> {
    let data = std::fs::read(path)?;
    Font::try_from_vec(data)
        .ok_or_else(|| InstrumentError::Font(format!("cannot parse {}", path.display())))
}

/// Load `path`, or the first readable system font when `path` is `None`.
pub fn load_font(path: Option<&Path>) -> Result<Font<'static>> {
    if let Some(path) = path {
        return load_font_file(path);
    }
    SYSTEM_FONTS
        .iter()
        .map(PathBuf::from)
        .filter(|p| p.exists())
        .find_map(|p| load_font_file(&p).ok())
        .ok_or_else(|| InstrumentError::Font("no usable system font found".to_string()))
}

#[derive(Debug, Clone, Copy)]
struct Clip {
    inverse: Affine,
    ellipse: Ellipse,
}

impl Clip {
    fn contains(&self, device: Point) -> bool {
        self.ellipse.contains(self.inverse * device)
    }
}

/// Transform plus the clips in force; a pixel must lie inside every clip.
#[derive(Debug, Clone)]
struct PaintState {
    transform: Affine,
    clips: Vec<Clip>,
}

/// RGBA8 frame buffer that implements [`Painter`].
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
    font: Option<&'a Font<'static>>,
    state: PaintState,
    stack: Vec<PaintState>,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
            font: None,
            state: PaintState {
                transform: Affine::IDENTITY,
                clips: Vec::new(),
            },
            stack: Vec::new(),
        }
    }

    pub fn with_font(mut self, font: Option<&'a Font<'static>>) -> Self {
        self.font = font;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    /// Color of the pixel at `(x, y)`, if inside the frame.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        self.frame
            .get(idx..idx + 3)
            .map(|px| Color::new(px[0], px[1], px[2]))
    }

    fn set_pixel(&mut self, x: i64, y: i64, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
        if !self.state.clips.iter().all(|clip| clip.contains(center)) {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let Some(dst) = self.frame.get_mut(idx..idx + 4) else {
            return;
        };
        let a = (alpha * color.opacity()).clamp(0.0, 1.0);
        let src = [color.r, color.g, color.b];
        for (d, s) in dst.iter_mut().zip(src) {
            *d = (s as f32 * a + *d as f32 * (1.0 - a)).round() as u8;
        }
        dst[3] = 0xff;
    }

    /// Device-space pixel bounds covering `local` under the current transform.
    fn device_bounds(&self, local: Rect) -> Option<(i64, i64, i64, i64)> {
        let device = self.state.transform.transform_rect_bbox(local);
        let x0 = (device.x0.floor() as i64 - 1).max(0);
        let y0 = (device.y0.floor() as i64 - 1).max(0);
        let x1 = (device.x1.ceil() as i64 + 1).min(self.width as i64 - 1);
        let y1 = (device.y1.ceil() as i64 + 1).min(self.height as i64 - 1);
        (x0 <= x1 && y0 <= y1).then_some((x0, y0, x1, y1))
    }

    /// Fill every pixel whose local-space samples satisfy `inside`, with
    /// 2x2 supersampling for coverage.
    fn fill_local<F>(&mut self, bounds: Rect, color: Color, inside: F)
    where
        F: Fn(Point) -> bool,
    {
        const SAMPLES: [(f64, f64); 4] = [(0.25, 0.25), (0.75, 0.25), (0.25, 0.75), (0.75, 0.75)];
        let Some((x0, y0, x1, y1)) = self.device_bounds(bounds) else {
            return;
        };
        let inverse = self.state.transform.inverse();
        for y in y0..=y1 {
            for x in x0..=x1 {
                let hits = SAMPLES
                    .iter()
                    .filter(|(sx, sy)| inside(inverse * Point::new(x as f64 + sx, y as f64 + sy)))
                    .count();
                if hits > 0 {
                    self.set_pixel(x, y, color, hits as f32 / SAMPLES.len() as f32);
                }
            }
        }
    }

    /// Anti-aliased thick line between two device-space points.
    fn draw_thick_line_aa(&mut self, p0: Point, p1: Point, thickness: f64, color: Color) {
        let pad = thickness.ceil() as i64 + 1;
        let min_x = p0.x.min(p1.x).floor() as i64 - pad;
        let max_x = p0.x.max(p1.x).ceil() as i64 + pad;
        let min_y = p0.y.min(p1.y).floor() as i64 - pad;
        let max_y = p0.y.max(p1.y).ceil() as i64 + pad;
        let d = p1 - p0;
        let len_sq = d.hypot2().max(f64::EPSILON);
        for y in min_y.max(0)..=max_y.min(self.height as i64 - 1) {
            for x in min_x.max(0)..=max_x.min(self.width as i64 - 1) {
                let p = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let t = ((p - p0).dot(d) / len_sq).clamp(0.0, 1.0);
                let dist = (p0 + d * t).distance(p);
                let aa = (1.0 - (dist - thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
                if aa > 0.01 {
                    self.set_pixel(x, y, color, aa as f32);
                }
            }
        }
    }

    fn draw_antialiased_pixel(&mut self, at: Point, color: Color, alpha: f32) {
        let x_floor = at.x.floor();
        let y_floor = at.y.floor();
        let x_frac = at.x - x_floor;
        let y_frac = at.y - y_floor;
        let (x, y) = (x_floor as i64, y_floor as i64);

        // Spread over the four nearest pixels, bilinear weights.
        let samples = [
            (x, y, (1.0 - x_frac) * (1.0 - y_frac)),
            (x + 1, y, x_frac * (1.0 - y_frac)),
            (x, y + 1, (1.0 - x_frac) * y_frac),
            (x + 1, y + 1, x_frac * y_frac),
        ];
        for (px, py, weight) in samples {
            let final_alpha = alpha * weight as f32;
            if final_alpha > 0.001 {
                self.set_pixel(px, py, color, final_alpha);
            }
        }
    }

    fn stroke_outline<F>(&mut self, bounds: Rect, pen: Pen, on_outline: F)
    where
        F: Fn(Point) -> bool,
    {
        let grown = bounds.inflate(pen.width, pen.width);
        self.fill_local(grown, pen.color, on_outline);
    }
}

fn polygon_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
        path.close_path();
    }
    path
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let d = b - a;
    let len_sq = d.hypot2();
    if len_sq <= f64::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(d) / len_sq).clamp(0.0, 1.0);
    p.distance(a + d * t)
}

/// Circular segment cut from the ellipse in `rect` by the chord between
/// `start` and `start + sweep`.
#[derive(Debug, Clone, Copy)]
struct ChordShape {
    ellipse: Ellipse,
    from: Point,
    to: Point,
    side: f64,
    full: bool,
}

impl ChordShape {
    fn new(rect: Rect, start: f64, sweep: f64) -> Self {
        let from = point_on_ellipse(rect, start);
        let to = point_on_ellipse(rect, start + sweep);
        let mid = point_on_ellipse(rect, start + sweep / 2.0);
        Self {
            ellipse: Ellipse::from_rect(rect),
            from,
            to,
            side: (to - from).cross(mid - from),
            full: sweep.abs() >= 360.0,
        }
    }

    fn on_arc_side(&self, p: Point) -> bool {
        self.full || (self.to - self.from).cross(p - self.from) * self.side > 0.0
    }

    fn contains(&self, p: Point) -> bool {
        self.ellipse.contains(p) && self.on_arc_side(p)
    }
}

impl Painter for Canvas<'_> {
    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.state.transform = self.state.transform * Affine::translate((dx, dy));
    }

    fn rotate(&mut self, degrees: f64) {
        self.state.transform = self.state.transform * Affine::rotate(degrees.to_radians());
    }

    fn clip_ellipse(&mut self, rect: Rect) {
        self.state.clips.push(Clip {
            inverse: self.state.transform.inverse(),
            ellipse: Ellipse::from_rect(rect),
        });
    }

    fn chord(&mut self, rect: Rect, start: f64, sweep: f64, fill: Color, pen: Option<Pen>) {
        let shape = ChordShape::new(rect, start, sweep);
        self.fill_local(rect, fill, |p| shape.contains(p));
        if let Some(pen) = pen {
            let half = pen.width / 2.0;
            let outer = Ellipse::from_rect(rect.inflate(half, half));
            let inner = Ellipse::from_rect(rect.inflate(-half, -half));
            self.stroke_outline(rect, pen, |p| {
                let on_arc = outer.contains(p) && !inner.contains(p) && shape.on_arc_side(p);
                on_arc || (!shape.full && distance_to_segment(p, shape.from, shape.to) <= half)
            });
        }
    }

    fn ellipse(&mut self, rect: Rect, fill: Color, pen: Option<Pen>) {
        let ellipse = Ellipse::from_rect(rect);
        self.fill_local(rect, fill, |p| ellipse.contains(p));
        if let Some(pen) = pen {
            let half = pen.width / 2.0;
            let outer = Ellipse::from_rect(rect.inflate(half, half));
            let inner = Ellipse::from_rect(rect.inflate(-half, -half));
            self.stroke_outline(rect, pen, |p| outer.contains(p) && !inner.contains(p));
        }
    }

    fn polygon(&mut self, points: &[Point], fill: Color) {
        if points.len() < 3 {
            return;
        }
        let path = polygon_path(points);
        let bounds = path.bounding_box();
        self.fill_local(bounds, fill, |p| path.contains(p));
    }

    fn line(&mut self, from: Point, to: Point, pen: Pen) {
        let transform = self.state.transform;
        self.draw_thick_line_aa(transform * from, transform * to, pen.width, pen.color);
    }

    fn text(&mut self, rect: Rect, align: Align, text: &str, size: f32, color: Color) {
        let Some(font) = self.font else {
            return;
        };
        let scale = Scale::uniform(points_to_pixels(size) as f32);
        let v_metrics = font.v_metrics(scale);
        let glyphs: Vec<PositionedGlyph<'_>> = font.layout(text, scale, point(0.0, 0.0)).collect();
        let text_width = glyphs
            .last()
            .map(|g| (g.position().x + g.unpositioned().h_metrics().advance_width) as f64)
            .unwrap_or(0.0);
        let text_height = (v_metrics.ascent - v_metrics.descent) as f64;

        let left = match align {
            Align::Left => rect.x0,
            Align::Center => rect.center().x - text_width / 2.0,
            Align::Right => rect.x1 - text_width,
        };
        let baseline = rect.center().y - text_height / 2.0 + v_metrics.ascent as f64;
        let transform = self.state.transform;

        for glyph in &glyphs {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            let mut coverage = Vec::new();
            glyph.draw(|gx, gy, v| {
                if v > 0.001 {
                    let local = Point::new(
                        left + (bb.min.x + gx as i32) as f64 + 0.5,
                        baseline + (bb.min.y + gy as i32) as f64 + 0.5,
                    );
                    coverage.push((transform * local, v));
                }
            });
            for (at, v) in coverage {
                self.draw_antialiased_pixel(at - kurbo::Vec2::new(0.5, 0.5), color, v);
            }
        }
    }

    fn rounded_rect(&mut self, rect: Rect, radius: f64, fill: Color, pen: Option<Pen>) {
        let shape = RoundedRect::from_rect(rect, radius);
        self.fill_local(rect, fill, |p| shape.contains(p));
        if let Some(pen) = pen {
            let half = pen.width / 2.0;
            let outer = RoundedRect::from_rect(rect.inflate(half, half), radius + half);
            let inner = RoundedRect::from_rect(rect.inflate(-half, -half), (radius - half).max(0.0));
            self.stroke_outline(rect, pen, |p| outer.contains(p) && !inner.contains(p));
        }
    }
}

//! Attitude indicator: artificial horizon, pitch ladder and roll scale.
//!
//! The horizon disc, ladder and roll scale are drawn in a frame rotated by
//! the current roll. The aircraft wings and the zero-roll marker are drawn
//! back in screen space, so the ring turns under a fixed marker.

use kurbo::{Point, Rect};

use crate::config::{AttitudeStyle, InstrumentConfig};
use crate::control::StepAction;
use crate::painter::{centered_square, points_to_pixels, Align, Painter};
use crate::redraw::RedrawSignal;
use crate::scene::Scene;
use crate::size::SizeContext;

/// Pitch beyond which the horizon stops moving.
pub const PITCH_DISPLAY_LIMIT: f64 = 40.0;
/// Valid pitch range accepted from callers.
pub const PITCH_LIMIT: f64 = 90.0;

const ROLL_TICKS: usize = 36;
const ROLL_TICK_SPACING: f64 = 360.0 / ROLL_TICKS as f64;

/// Where the horizon chord cuts the instrument disc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizonSplit {
    /// Vertical chord offset, positive toward the top of the disc.
    pub offset: f64,
    /// Half the chord length.
    pub half_chord: f64,
    /// Chord half-angle `gr` in degrees.
    pub angle: f64,
}

impl HorizonSplit {
    /// `(start, sweep)` of the sky segment.
    pub fn sky(&self) -> (f64, f64) {
        (self.angle, 180.0 - 2.0 * self.angle)
    }

    /// `(start, sweep)` of the ground segment.
    pub fn ground(&self) -> (f64, f64) {
        (self.angle, -(180.0 + 2.0 * self.angle))
    }
}

pub fn horizon_split(pitch: f64, size: &SizeContext) -> HorizonSplit {
    let half = size.half_size();
    let ratio = size.size_ratio();
    let limit = ratio * PITCH_DISPLAY_LIMIT;
    let offset = (ratio * -pitch).clamp(-limit, limit);
    let half_chord = (half * half - offset * offset).sqrt();
    let angle = (offset / half_chord).atan().to_degrees();
    HorizonSplit {
        offset,
        half_chord,
        angle,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RungKind {
    Horizon,
    Major,
    Minor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LadderRung {
    /// Pitch value of the rung in degrees.
    pub pitch: i32,
    pub y: f64,
    pub half_length: f64,
    pub kind: RungKind,
    pub label: Option<String>,
}

/// Visible pitch ladder rungs for the current pitch. Rungs whose outer end
/// falls outside the disc are culled.
pub fn pitch_ladder(pitch: f64, size: &SizeContext) -> Vec<LadderRung> {
    let base = size.current_size() / 8.0;
    let ratio = size.size_ratio();
    let half = size.half_size();

    (-9..=9)
        .filter_map(|i: i32| {
            let p = i * 10;
            let major = i % 3 == 0;
            let half_length = if major { base } else { base / 2.0 };
            let y = ratio * p as f64 - ratio * -pitch;
            if half_length.hypot(y) > half {
                return None;
            }
            let rung = match (i, major) {
                (0, _) => LadderRung {
                    pitch: p,
                    y,
                    half_length: half_length * 1.8,
                    kind: RungKind::Horizon,
                    label: None,
                },
                (_, true) => LadderRung {
                    pitch: p,
                    y,
                    half_length,
                    kind: RungKind::Major,
                    label: Some((-p).to_string()),
                },
                _ => LadderRung {
                    pitch: p,
                    y,
                    half_length,
                    kind: RungKind::Minor,
                    label: None,
                },
            };
            Some(rung)
        })
        .collect()
}

/// One roll scale tick, described in its own rotated frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleTick {
    pub index: usize,
    /// Rotation of the tick frame in degrees, clockwise from the top.
    pub angle: f64,
    pub start: Point,
    pub end: Point,
    pub label: Option<String>,
}

impl ScaleTick {
    pub fn is_major(&self) -> bool {
        self.label.is_some()
    }
}

pub fn roll_scale(size: &SizeContext) -> Vec<ScaleTick> {
    let length = size.current_size() / 25.0;
    let top = -size.half_size() + size.offset();

    (0..ROLL_TICKS)
        .map(|index| {
            let major = index % 3 == 0;
            let tick_length = if major { length } else { length / 2.0 };
            let label = major.then(|| {
                let degrees = (index as f64 * ROLL_TICK_SPACING) as i32;
                if index < ROLL_TICKS / 2 {
                    degrees.to_string()
                } else {
                    (degrees - 360).to_string()
                }
            });
            ScaleTick {
                index,
                angle: index as f64 * ROLL_TICK_SPACING,
                start: Point::new(0.0, top),
                end: Point::new(0.0, top + tick_length),
                label,
            }
        })
        .collect()
}

/// Left and right wing triangles, in screen space around the center.
pub fn aircraft_marker(size: &SizeContext) -> [[Point; 3]; 2] {
    let m = size.current_size() / 20.0;
    let right = [
        Point::new(m, 0.0),
        Point::new(2.0 * m, -m / 2.0),
        Point::new(2.0 * m, m / 2.0),
    ];
    let left = right.map(|p| Point::new(-p.x, p.y));
    [left, right]
}

/// Zero-roll marker triangle at the top of the disc, in screen space.
pub fn roll_marker(size: &SizeContext) -> [Point; 3] {
    let len = size.current_size() / 25.0;
    let top = -size.half_size() + size.offset();
    [
        Point::new(0.0, top),
        Point::new(-len / 2.0, top + len),
        Point::new(len / 2.0, top + len),
    ]
}

#[derive(Debug)]
pub struct AttitudeIndicator {
    roll: f64,
    pitch: f64,
    size: SizeContext,
    style: AttitudeStyle,
    redraw: RedrawSignal,
}

impl AttitudeIndicator {
    pub fn new(size: SizeContext) -> Self {
        Self {
            roll: 0.0,
            pitch: 0.0,
            size,
            style: AttitudeStyle::default(),
            redraw: RedrawSignal::new(),
        }
    }

    pub fn from_config(config: &InstrumentConfig) -> Self {
        Self::new(config.size_context()).with_style(config.attitude_style.clone())
    }

    pub fn with_style(mut self, style: AttitudeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn roll(&self) -> f64 {
        self.roll
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    pub fn size(&self) -> &SizeContext {
        &self.size
    }

    pub fn set_roll(&mut self, degrees: f64) {
        self.roll = degrees;
        self.redraw.request();
    }

    /// Callers keep `degrees` inside `[-90, 90]`.
    pub fn set_pitch(&mut self, degrees: f64) {
        self.pitch = degrees;
        self.redraw.request();
    }

    pub fn set_attitude(&mut self, roll: f64, pitch: f64) {
        self.roll = roll;
        self.pitch = pitch;
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

    /// Apply a one-degree interactive step. Returns false for actions that
    /// belong to another instrument.
    pub fn step(&mut self, action: StepAction) -> bool {
        match action {
            StepAction::RollLeft => self.set_roll(self.roll - 1.0),
            StepAction::RollRight => self.set_roll(self.roll + 1.0),
            StepAction::PitchUp => self.set_pitch((self.pitch + 1.0).min(PITCH_LIMIT)),
            StepAction::PitchDown => self.set_pitch((self.pitch - 1.0).max(-PITCH_LIMIT)),
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

    pub fn render<P: Painter + ?Sized>(&self, painter: &mut P) {
        let size = &self.size;
        let style = &self.style;
        let disc = centered_square(size.current_size());
        let center = size.center();
        let label_height = points_to_pixels(style.font_size) + 2.0;

        painter.save();
        painter.translate(center.x, center.y);
        painter.rotate(self.roll);

        let split = horizon_split(self.pitch, size);
        let (sky_start, sky_sweep) = split.sky();
        let (ground_start, ground_sweep) = split.ground();
        painter.chord(disc, sky_start, sky_sweep, style.sky, Some(style.outline));
        painter.chord(
            disc,
            ground_start,
            ground_sweep,
            style.ground,
            Some(style.outline),
        );

        painter.clip_ellipse(disc);

        for rung in pitch_ladder(self.pitch, size) {
            let pen = match rung.kind {
                RungKind::Horizon => style.horizon,
                _ => style.ladder,
            };
            painter.line(
                Point::new(-rung.half_length, rung.y),
                Point::new(rung.half_length, rung.y),
                pen,
            );
            if let Some(label) = &rung.label {
                let right = -rung.half_length - 2.0;
                let rect = Rect::new(
                    right - 100.0,
                    rung.y - label_height / 2.0,
                    right,
                    rung.y + label_height / 2.0,
                );
                painter.text(rect, Align::Right, label, style.font_size, style.label_color);
            }
        }

        painter.save();
        painter.rotate(-self.roll);
        for wing in aircraft_marker(size) {
            painter.polygon(&wing, style.aircraft_marker);
        }
        painter.restore();

        for tick in roll_scale(size) {
            painter.save();
            painter.rotate(tick.angle);
            painter.line(tick.start, tick.end, style.roll_scale);
            if let Some(label) = &tick.label {
                let top = tick.end.y + 2.0;
                let rect = Rect::new(-50.0, top, 50.0, top + label_height);
                painter.text(
                    rect,
                    Align::Center,
                    label,
                    style.font_size,
                    style.roll_scale.color,
                );
            }
            painter.restore();
        }

        painter.rotate(-self.roll);
        painter.polygon(&roll_marker(size), style.roll_marker);
        painter.restore();
    }
}

impl Default for AttitudeIndicator {
    fn default() -> Self {
        Self::new(SizeContext::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::DrawCommand;
    use approx::assert_abs_diff_eq;

    #[test]
    fn level_flight_splits_disc_in_half() {
        let split = horizon_split(0.0, &SizeContext::default());
        assert_abs_diff_eq!(split.angle, 0.0);
        assert_eq!(split.sky(), (0.0, 180.0));
        assert_eq!(split.ground(), (0.0, -180.0));
        assert_abs_diff_eq!(split.half_chord, 98.0);
    }

    #[test]
    fn horizon_saturates_at_forty_degrees() {
        let size = SizeContext::default();
        let at_limit = horizon_split(40.0, &size);
        let beyond = horizon_split(85.0, &size);
        assert_eq!(at_limit, beyond);
        assert_abs_diff_eq!(beyond.offset, -size.size_ratio() * 40.0);
    }

    #[test]
    fn nose_up_grows_the_sky() {
        let split = horizon_split(10.0, &SizeContext::default());
        let (_, sky_sweep) = split.sky();
        let (_, ground_sweep) = split.ground();
        assert!(sky_sweep > 180.0);
        assert!(ground_sweep.abs() < 180.0);
        assert_abs_diff_eq!(sky_sweep - ground_sweep, 360.0, epsilon = 1e-9);
    }

    #[test]
    fn ladder_at_level_flight() {
        let size = SizeContext::default();
        let rungs = pitch_ladder(0.0, &size);
        let horizon: Vec<_> = rungs
            .iter()
            .filter(|r| r.kind == RungKind::Horizon)
            .collect();
        assert_eq!(horizon.len(), 1);
        assert_abs_diff_eq!(horizon[0].y, 0.0);
        assert_abs_diff_eq!(horizon[0].half_length, 196.0 / 8.0 * 1.8);

        // +-40 fits, +-50 falls outside the disc.
        let pitches: Vec<i32> = rungs.iter().map(|r| r.pitch).collect();
        assert!(pitches.contains(&40));
        assert!(pitches.contains(&-40));
        assert!(!pitches.contains(&50));
        for rung in &rungs {
            assert!(rung.half_length.min(196.0 / 8.0).hypot(rung.y) <= size.half_size());
        }
    }

    #[test]
    fn ladder_labels_are_negated_pitch() {
        let rungs = pitch_ladder(0.0, &SizeContext::default());
        let labelled: Vec<_> = rungs
            .iter()
            .filter_map(|r| r.label.as_deref().map(|l| (r.pitch, l)))
            .collect();
        assert_eq!(labelled, vec![(-30, "30"), (30, "-30")]);
    }

    #[test]
    fn roll_scale_labels() {
        let ticks = roll_scale(&SizeContext::default());
        assert_eq!(ticks.len(), 36);
        let labels: Vec<&str> = ticks.iter().filter_map(|t| t.label.as_deref()).collect();
        assert_eq!(
            labels,
            vec!["0", "30", "60", "90", "120", "150", "-180", "-150", "-120", "-90", "-60", "-30"]
        );
        assert_abs_diff_eq!(ticks[1].end.y - ticks[1].start.y, 196.0 / 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ticks[3].end.y - ticks[3].start.y, 196.0 / 25.0, epsilon = 1e-9);
    }

    #[test]
    fn pitch_steps_clamp() {
        let mut adi = AttitudeIndicator::default();
        adi.set_pitch(89.5);
        assert!(adi.step(StepAction::PitchUp));
        assert!(adi.step(StepAction::PitchUp));
        assert_eq!(adi.pitch(), 90.0);
        adi.set_pitch(-90.0);
        adi.step(StepAction::PitchDown);
        assert_eq!(adi.pitch(), -90.0);
        assert!(!adi.step(StepAction::YawLeft));
    }

    #[test]
    fn setters_request_redraw() {
        let mut adi = AttitudeIndicator::default();
        assert!(!adi.redraw().take());
        adi.set_roll(12.0);
        assert!(adi.redraw().take());
        adi.on_resize(300.0, 300.0);
        assert!(adi.redraw().take());
    }

    #[test]
    fn frame_order() {
        let scene = AttitudeIndicator::default().scene();
        let drawing: Vec<_> = scene.commands().iter().filter(|c| !c.is_state()).collect();
        assert!(matches!(drawing[0], DrawCommand::Chord { .. }));
        assert!(matches!(drawing[1], DrawCommand::Chord { .. }));
        assert!(matches!(drawing[2], DrawCommand::ClipEllipse(_)));
        assert!(matches!(drawing.last(), Some(DrawCommand::Polygon { .. })));
    }
}

use approx::assert_abs_diff_eq;
use flight_instruments::attitude::{horizon_split, pitch_ladder, RungKind};
use flight_instruments::compass::heading_ticks;
use flight_instruments::scene::Placed;
use flight_instruments::{
    AttitudeIndicator, Compass, DrawCommand, SizeContext, PITCH_DISPLAY_LIMIT,
};
use kurbo::Point;

fn lines<'a>(placed: &'a [Placed<'a>]) -> Vec<(Point, Point)> {
    placed
        .iter()
        .filter_map(|p| match p.command {
            DrawCommand::Line { from, to, .. } => Some((p.map(*from), p.map(*to))),
            _ => None,
        })
        .collect()
}

#[test]
fn horizon_offset_stays_inside_display_limit() {
    let size = SizeContext::default();
    let bound = size.size_ratio() * PITCH_DISPLAY_LIMIT;
    for pitch in -90..=90 {
        let split = horizon_split(pitch as f64, &size);
        assert!(
            split.offset.abs() <= bound + 1e-9,
            "pitch {pitch} gave offset {}",
            split.offset
        );
    }
}

#[test]
fn full_turn_of_roll_draws_the_same_frame() {
    let mut a = AttitudeIndicator::default();
    let mut b = AttitudeIndicator::default();
    a.set_attitude(17.0, 12.0);
    b.set_attitude(17.0 + 360.0, 12.0);

    let scene_a = a.scene();
    let scene_b = b.scene();
    let placed_a = scene_a.resolve();
    let placed_b = scene_b.resolve();
    assert_eq!(placed_a.len(), placed_b.len());

    for (pa, pb) in placed_a.iter().zip(&placed_b) {
        assert_eq!(pa.command, pb.command);
        let (ca, cb) = (pa.transform.as_coeffs(), pb.transform.as_coeffs());
        for (x, y) in ca.iter().zip(cb.iter()) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-9);
        }
    }
}

#[test]
fn ladder_rungs_stay_inside_the_disc() {
    let size = SizeContext::default();
    let half = size.half_size();
    for pitch in [-90.0, -45.0, -12.5, 0.0, 7.0, 30.0, 90.0] {
        for rung in pitch_ladder(pitch, &size) {
            let length = match rung.kind {
                RungKind::Horizon => rung.half_length / 1.8,
                _ => rung.half_length,
            };
            assert!(length.hypot(rung.y) <= half + 1e-9);
        }
    }
}

#[test]
fn level_flight_reference_frame() {
    let mut adi = AttitudeIndicator::default();
    adi.set_attitude(0.0, 0.0);
    assert_eq!(adi.size().current_size(), 196.0);

    let split = horizon_split(adi.pitch(), adi.size());
    assert_abs_diff_eq!(split.angle, 0.0);
    assert_eq!(split.sky(), (0.0, 180.0));
    assert_eq!(split.ground(), (0.0, -180.0));

    let ladder = pitch_ladder(0.0, adi.size());
    let horizon: Vec<_> = ladder
        .iter()
        .filter(|r| r.kind == RungKind::Horizon)
        .collect();
    assert_eq!(horizon.len(), 1);
    assert_abs_diff_eq!(horizon[0].y, 0.0);
    assert_abs_diff_eq!(horizon[0].half_length, 196.0 / 8.0 * 1.8);

    let major = ladder
        .iter()
        .find(|r| r.kind == RungKind::Major)
        .map(|r| r.half_length);
    assert!(major.is_some_and(|l| horizon[0].half_length > l));
}

#[test]
fn opposite_pitch_mirrors_the_horizon() {
    let mut adi = AttitudeIndicator::default();
    adi.set_pitch(30.0);
    let up = horizon_split(adi.pitch(), adi.size());
    adi.set_pitch(-30.0);
    let down = horizon_split(adi.pitch(), adi.size());

    assert_abs_diff_eq!(up.offset, -down.offset, epsilon = 1e-9);
    assert_abs_diff_eq!(up.angle, -down.angle, epsilon = 1e-9);
    assert_abs_diff_eq!(up.half_chord, down.half_chord, epsilon = 1e-9);
}

#[test]
fn resize_is_idempotent() {
    let mut compass = Compass::default();
    compass.on_resize(420.0, 380.0);
    let first = *compass.size();
    let scene = compass.scene();
    compass.on_resize(420.0, 380.0);
    assert_eq!(*compass.size(), first);
    assert_eq!(compass.scene(), scene);
}

#[test]
fn heading_ring_has_thirty_six_ticks() {
    let ticks = heading_ticks(&SizeContext::default());
    assert_eq!(ticks.len(), 36);
    assert_eq!(ticks.iter().filter(|t| t.is_long()).count(), 12);
    for pair in ticks.windows(2) {
        assert_abs_diff_eq!(pair[0].angle - pair[1].angle, 10.0);
    }
}

#[test]
fn heading_marker_points_at_east_tick_for_yaw_ninety() {
    let mut compass = Compass::default();
    compass.set_show_altitude_panel(false);
    compass.set_yaw(90.0);
    let scene = compass.scene();
    let placed = scene.resolve();

    let marker_apex = placed
        .iter()
        .rev()
        .find_map(|p| match p.command {
            DrawCommand::Polygon { points, .. } => Some(p.map(points[0])),
            _ => None,
        })
        .expect("heading marker drawn last");

    let label_90 = placed
        .iter()
        .position(|p| matches!(p.command, DrawCommand::Text { text, .. } if text == "90"))
        .expect("90 label drawn");
    let tick_lines = lines(&placed[..label_90]);
    let (east_start, _) = *tick_lines.last().expect("tick before its label");

    assert_abs_diff_eq!(marker_apex.x, east_start.x, epsilon = 1e-9);
    assert_abs_diff_eq!(marker_apex.y, east_start.y, epsilon = 1e-9);

    // Counter-clockwise from north on screen is toward the left.
    let center = compass.size().center();
    assert!(marker_apex.x < center.x);
    assert_abs_diff_eq!(marker_apex.y, center.y, epsilon = 1e-9);
}

fn polygons(placed: &[Placed<'_>]) -> Vec<Vec<Point>> {
    placed
        .iter()
        .filter_map(|p| match p.command {
            DrawCommand::Polygon { points, .. } => {
                Some(points.iter().map(|pt| p.map(*pt)).collect())
            }
            _ => None,
        })
        .collect()
}

/// First roll scale tick: the first line drawn vertically in its own frame.
fn zero_roll_tick(placed: &[Placed<'_>]) -> Point {
    placed
        .iter()
        .find_map(|p| match p.command {
            DrawCommand::Line { from, to, .. } if from.x == 0.0 && to.x == 0.0 => {
                Some(p.map(*from))
            }
            _ => None,
        })
        .expect("roll scale drawn")
}

#[test]
fn aircraft_and_roll_markers_stay_fixed_while_scale_turns() {
    let level = AttitudeIndicator::default();
    let mut banked = AttitudeIndicator::default();
    banked.set_roll(37.0);

    let level_scene = level.scene();
    let banked_scene = banked.scene();
    let level_placed = level_scene.resolve();
    let banked_placed = banked_scene.resolve();

    // two wings, then the roll marker
    let fixed = polygons(&level_placed);
    let moved = polygons(&banked_placed);
    assert_eq!(fixed.len(), 3);
    assert_eq!(fixed.len(), moved.len());
    for (a, b) in fixed.iter().flatten().zip(moved.iter().flatten()) {
        assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-9);
        assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-9);
    }
    assert_abs_diff_eq!(moved[0][0].x, 100.0 - 196.0 / 20.0, epsilon = 1e-9);
    assert_abs_diff_eq!(moved[0][0].y, 100.0, epsilon = 1e-9);

    let center = level.size().center();
    let bearing = |p: Point| (p.y - center.y).atan2(p.x - center.x).to_degrees();
    let turned = bearing(zero_roll_tick(&banked_placed)) - bearing(zero_roll_tick(&level_placed));
    assert_abs_diff_eq!(turned, 37.0, epsilon = 1e-9);
}

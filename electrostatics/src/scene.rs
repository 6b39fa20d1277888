//! Projection of widget state into drawable shapes
//!
//! Everything here is pure: positions come from the widget snapshot and any
//! scatter comes from the [`Jitter`] passed in. The renderer only has to turn
//! the shapes into triangles.

use glam::Vec2;

use crate::balloon::Balloon;
use crate::constants::{
    ATTRACTED_ROTATION, CHARGED_SCALE, CHARGING_DELAY, CONTAINER_HEIGHT, CONTAINER_WIDTH, DROPLET_COUNT,
    PAPER_SIZE, RESTING_JITTER, STREAM_BOTTOM, STREAM_TOP, STREAM_WIDTH, STREAM_X,
};
use crate::effect::TargetPoint;
use crate::jitter::Jitter;
use crate::water::WaterStream;

/// sRGB color with alpha, as written in a stylesheet
pub type Color = [f32; 4];

pub const fn rgb(hex: u32) -> Color {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

pub mod palette {
    use super::{rgb, Color};

    pub const SKY: Color = rgb(0xdbeafe);
    pub const WHITE: Color = rgb(0xffffff);
    pub const BORDER: Color = rgb(0x93c5fd);

    pub const HAIR: Color = rgb(0xb45309);
    pub const HAIR_STRAND: Color = rgb(0x92400e);
    pub const BALLOON: Color = rgb(0xf87171);
    pub const BALLOON_CHARGED: Color = rgb(0xef4444);
    pub const PAPER: Color = rgb(0xfefce8);
    pub const PAPER_ATTRACTED: Color = rgb(0xfef9c3);
    pub const PAPER_EDGE: Color = rgb(0xfef08a);

    pub const WATER_LIGHT: Color = rgb(0x60a5fa);
    pub const WATER_DARK: Color = rgb(0x2563eb);
    pub const TAP: Color = rgb(0x1d4ed8);
    pub const WOOL: Color = rgb(0xfde68a);
    pub const WOOL_STRAND: Color = rgb(0xfcd34d);
    pub const RULER: Color = rgb(0xfacc15);
    pub const RULER_CHARGED: Color = rgb(0xeab308);
    pub const RULER_MARK: Color = rgb(0xa16207);
}

/// A primitive in container coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Vertical gradient filling a rectangle
    Backdrop { min: Vec2, max: Vec2, top: Color, bottom: Color },
    /// Rectangle rotated about its center (radians)
    Rect { center: Vec2, size: Vec2, rotation: f32, color: Color },
    Ellipse { center: Vec2, radii: Vec2, color: Color },
    /// Thick polyline colored by height, from `top` at y=`span.0` to `bottom` at y=`span.1`
    Stroke {
        points: Vec<Vec2>,
        width: f32,
        top: Color,
        bottom: Color,
        span: (f32, f32),
    },
}

/// Displayed transform of one paper piece
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaperPose {
    pub id: u32,
    /// Top-left corner, as positioned by the widget
    pub corner: Vec2,
    /// Degrees, clockwise
    pub rotation: f32,
    pub affected: bool,
}

/// Attracted pieces stand at 45°, resting ones wobble a few degrees
pub fn paper_poses(pieces: &[TargetPoint], jitter: &mut dyn Jitter) -> Vec<PaperPose> {
    pieces
        .iter()
        .map(|piece| PaperPose {
            id: piece.id,
            corner: piece.position,
            rotation: if piece.affected {
                ATTRACTED_ROTATION
            } else {
                jitter.centered(RESTING_JITTER)
            },
            affected: piece.affected,
        })
        .collect()
}

/// Control points of the stream for a curvature
pub fn stream_control_points(curvature: f32) -> [Vec2; 4] {
    let mid = (STREAM_BOTTOM - STREAM_TOP) / 2.0 + STREAM_TOP;
    [
        Vec2::new(STREAM_X, STREAM_TOP),
        Vec2::new(STREAM_X, mid - 50.0),
        Vec2::new(STREAM_X + curvature, mid + 50.0),
        Vec2::new(STREAM_X + curvature * 1.5, STREAM_BOTTOM),
    ]
}

/// Cubic Bezier at `t` in [0, 1]
pub fn bezier(points: &[Vec2; 4], t: f32) -> Vec2 {
    let mt = 1.0 - t;
    points[0] * (mt * mt * mt)
        + points[1] * (3.0 * mt * mt * t)
        + points[2] * (3.0 * mt * t * t)
        + points[3] * (t * t * t)
}

/// Centerline of the stream. A straight stream is a single segment.
pub fn stream_path(curvature: f32, samples: usize) -> Vec<Vec2> {
    let points = stream_control_points(curvature);
    if curvature == 0.0 {
        return vec![points[0], Vec2::new(STREAM_X, STREAM_BOTTOM)];
    }

    let samples = samples.max(2);
    (0..samples)
        .map(|i| bezier(&points, i as f32 / (samples - 1) as f32))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Droplet {
    pub center: Vec2,
    pub radius: f32,
}

/// Droplets spread evenly down the stream.
///
/// Heights are evenly spaced rather than following the curve parameter, and
/// each droplet is nudged sideways by up to 2.5 px.
pub fn droplets(curvature: f32, jitter: &mut dyn Jitter) -> Vec<Droplet> {
    let points = stream_control_points(curvature);

    (0..DROPLET_COUNT)
        .map(|i| {
            let t = i as f32 / DROPLET_COUNT as f32;
            let y = STREAM_TOP + t * (STREAM_BOTTOM - STREAM_TOP);
            let x = if curvature != 0.0 { bezier(&points, t).x } else { STREAM_X };

            Droplet {
                center: Vec2::new(x + jitter.centered(5.0), y),
                radius: 2.0 + jitter.sample() * 2.0,
            }
        })
        .collect()
}

/// Linear interpolation through evenly spaced keyframes, `progress` in [0, 1]
pub fn keyframe(frames: &[f32], progress: f32) -> f32 {
    match frames {
        [] => 0.0,
        [only] => *only,
        _ => {
            let scaled = progress.clamp(0.0, 1.0) * (frames.len() - 1) as f32;
            let index = (scaled.floor() as usize).min(frames.len() - 2);
            let local = scaled - index as f32;
            frames[index] + (frames[index + 1] - frames[index]) * local
        }
    }
}

/// Side-to-side shake of the ruler while it is rubbed
pub fn ruler_rub_offset(elapsed: f32) -> f32 {
    keyframe(&[0.0, 5.0, -5.0, 5.0, -5.0, 0.0], elapsed / CHARGING_DELAY)
}

/// Shake of the wool pad while it rubs the ruler
pub fn wool_rub_offset(elapsed: f32) -> Vec2 {
    let progress = elapsed / CHARGING_DELAY;
    Vec2::new(
        keyframe(&[-5.0, 5.0, -5.0, 5.0, -5.0, 0.0], progress),
        keyframe(&[-3.0, 3.0, -3.0, 3.0, -3.0, 0.0], progress),
    )
}

/// Container border and its sky gradient
fn backdrop() -> Vec<Shape> {
    let size = Vec2::new(CONTAINER_WIDTH, CONTAINER_HEIGHT);
    vec![
        Shape::Rect {
            center: size * 0.5,
            size,
            rotation: 0.0,
            color: palette::BORDER,
        },
        Shape::Backdrop {
            min: Vec2::splat(2.0),
            max: size - Vec2::splat(2.0),
            top: palette::SKY,
            bottom: palette::WHITE,
        },
    ]
}

/// Strands hanging inside a rounded block: `count` strips spread over `width`
fn strands(
    origin: Vec2,
    width: f32,
    count: usize,
    size: Vec2,
    top: f32,
    color: Color,
) -> impl Iterator<Item = Shape> {
    (0..count).map(move |i| {
        let left = ((i * 7) % 100) as f32 / 100.0 * width;
        let tilt = ((i % 5) as f32 * 5.0 - 10.0).to_radians();
        Shape::Rect {
            center: origin + Vec2::new(left + size.x / 2.0, top + size.y / 2.0),
            size,
            rotation: tilt,
            color,
        }
    })
}

/// White badge with a minus sign on a charged object
fn charge_badge(center: Vec2, color: Color) -> [Shape; 2] {
    [
        Shape::Ellipse {
            center,
            radii: Vec2::splat(16.0),
            color: palette::WHITE,
        },
        Shape::Rect {
            center,
            size: Vec2::new(12.0, 3.0),
            rotation: 0.0,
            color,
        },
    ]
}

pub fn balloon_scene(balloon: &Balloon, poses: &[PaperPose]) -> Vec<Shape> {
    let mut shapes = backdrop();

    // Hair
    let hair = Vec2::new(40.0, 40.0);
    shapes.push(Shape::Ellipse {
        center: hair + Vec2::new(80.0, 80.0),
        radii: Vec2::new(80.0, 80.0),
        color: palette::HAIR,
    });
    shapes.push(Shape::Rect {
        center: hair + Vec2::new(80.0, 160.0),
        size: Vec2::new(160.0, 160.0),
        rotation: 0.0,
        color: palette::HAIR,
    });
    shapes.extend(strands(hair, 160.0, 20, Vec2::new(16.0, 160.0), -10.0, palette::HAIR_STRAND));

    // Balloon
    let charged = balloon.charge.is_charged();
    let rect = balloon.drag.live_rect();
    let scale = if charged { CHARGED_SCALE } else { 1.0 };
    shapes.push(Shape::Ellipse {
        center: rect.center(),
        radii: rect.size() * 0.5 * scale,
        color: if charged { palette::BALLOON_CHARGED } else { palette::BALLOON },
    });
    if charged {
        shapes.extend(charge_badge(rect.center(), palette::BALLOON_CHARGED));
    }

    // Paper
    let size = Vec2::from(PAPER_SIZE);
    for pose in poses {
        let center = pose.corner + size * 0.5;
        let rotation = pose.rotation.to_radians();
        shapes.push(Shape::Rect {
            center,
            size: size + Vec2::splat(2.0),
            rotation,
            color: palette::PAPER_EDGE,
        });
        shapes.push(Shape::Rect {
            center,
            size,
            rotation,
            color: if pose.affected { palette::PAPER_ATTRACTED } else { palette::PAPER },
        });
    }

    shapes
}

pub fn water_scene(water: &WaterStream, droplets: &[Droplet]) -> Vec<Shape> {
    let mut shapes = backdrop();

    shapes.push(Shape::Stroke {
        points: stream_path(water.curvature, 48),
        width: STREAM_WIDTH,
        top: palette::WATER_LIGHT,
        bottom: palette::WATER_DARK,
        span: (0.0, STREAM_BOTTOM),
    });
    shapes.extend(droplets.iter().map(|d| Shape::Ellipse {
        center: d.center,
        radii: Vec2::splat(d.radius),
        color: palette::WATER_LIGHT,
    }));

    // Tap
    shapes.push(Shape::Rect {
        center: Vec2::new(STREAM_X + 20.0, 60.0),
        size: Vec2::new(40.0, 40.0),
        rotation: 0.0,
        color: palette::TAP,
    });

    // Wool
    let rubbing = water.rubbing_elapsed();
    let wool = Vec2::new(CONTAINER_WIDTH - 50.0 - 80.0, 100.0) + rubbing.map(wool_rub_offset).unwrap_or(Vec2::ZERO);
    shapes.push(Shape::Rect {
        center: wool + Vec2::new(40.0, 32.0),
        size: Vec2::new(80.0, 64.0),
        rotation: 0.0,
        color: palette::WOOL,
    });
    shapes.extend(strands(wool, 80.0, 15, Vec2::new(8.0, 40.0), -2.0, palette::WOOL_STRAND));

    // Ruler
    let charged = water.charge.is_charged();
    let mut rect = water.drag.live_rect();
    if let Some(elapsed) = rubbing {
        let shake = Vec2::new(ruler_rub_offset(elapsed), 0.0);
        rect.min += shake;
        rect.max += shake;
    }
    let scale = if charged { CHARGED_SCALE } else { 1.0 };
    let size = rect.size() * scale;
    shapes.push(Shape::Rect {
        center: rect.center(),
        size: size + Vec2::splat(2.0),
        rotation: 0.0,
        color: palette::RULER_MARK,
    });
    shapes.push(Shape::Rect {
        center: rect.center(),
        size,
        rotation: 0.0,
        color: if charged { palette::RULER_CHARGED } else { palette::RULER },
    });
    let top_left = rect.center() - size * 0.5;
    shapes.extend((0..8).map(|i| Shape::Rect {
        center: top_left + Vec2::new((i + 1) as f32 * 0.125 * size.x, 6.0),
        size: Vec2::new(2.0, 12.0),
        rotation: 0.0,
        color: palette::RULER_MARK,
    }));
    if charged {
        shapes.extend(charge_badge(rect.center(), palette::RULER_MARK));
    }

    shapes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{Action, Dispatcher};
    use crate::drag::Rect;
    use crate::jitter::{FixedJitter, SeededJitter};

    #[test]
    fn straight_stream_without_curvature() {
        let path = stream_path(0.0, 48);
        assert_eq!(path, vec![Vec2::new(150.0, 60.0), Vec2::new(150.0, 400.0)]);
    }

    #[test]
    fn curved_stream_ends_offset_by_one_and_a_half_curvatures() {
        let path = stream_path(20.0, 48);
        assert_eq!(path.len(), 48);
        assert_eq!(path[0], Vec2::new(150.0, 60.0));

        let end = *path.last().expect("non-empty path");
        assert!((end - Vec2::new(180.0, 400.0)).length() < 1e-3);
        assert!(path.iter().all(|p| p.x >= 150.0 - 1e-3));
    }

    #[test]
    fn bezier_midpoint() {
        let points = stream_control_points(40.0);
        // x(0.5) = 150·(1/8 + 3/8) + 190·3/8 + 210·1/8
        let mid = bezier(&points, 0.5);
        assert!((mid.x - (75.0 + 71.25 + 26.25)).abs() < 1e-3);
    }

    #[test]
    fn droplets_follow_the_curve_without_jitter() {
        let curvature = -40.0;
        let points = stream_control_points(curvature);
        let drops = droplets(curvature, &mut FixedJitter::default());

        assert_eq!(drops.len(), 10);
        for (i, drop) in drops.iter().enumerate() {
            let t = i as f32 / 10.0;
            assert!((drop.center.x - bezier(&points, t).x).abs() < 1e-4);
            assert!((drop.center.y - (60.0 + 340.0 * t)).abs() < 1e-4);
            assert_eq!(drop.radius, 3.0);
        }
    }

    #[test]
    fn droplet_scatter_is_small() {
        let mut jitter = SeededJitter::new(3);
        for drop in droplets(0.0, &mut jitter) {
            assert!((drop.center.x - 150.0).abs() <= 2.5);
            assert!((2.0..4.0).contains(&drop.radius));
        }
    }

    #[test]
    fn paper_poses_tilt_attracted_pieces() {
        let mut pieces = crate::balloon::Balloon::home_pieces();
        pieces[2].affected = true;

        let poses = paper_poses(&pieces, &mut FixedJitter(1.0));
        assert_eq!(poses[2].rotation, 45.0);
        assert_eq!(poses[0].rotation, 5.0);
        assert_eq!(poses[0].corner, Vec2::new(100.0, 350.0));
    }

    #[test]
    fn keyframes_interpolate() {
        let frames = [0.0, 5.0, -5.0, 5.0, -5.0, 0.0];
        assert_eq!(keyframe(&frames, 0.0), 0.0);
        assert_eq!(keyframe(&frames, 0.1), 2.5);
        assert_eq!(keyframe(&frames, 0.2), 5.0);
        assert_eq!(keyframe(&frames, 1.0), 0.0);
        assert_eq!(keyframe(&frames, 3.0), 0.0);
        assert_eq!(keyframe(&[], 0.5), 0.0);
    }

    #[test]
    fn rubbing_ruler_shakes_in_the_scene() {
        let mut dispatcher = Dispatcher::new(WaterStream::new(Some(Rect::from_size(600.0, 400.0))));
        dispatcher.dispatch(Action::Charge);
        dispatcher.dispatch(Action::FrameTick { dt: 0.3 });

        let shapes = water_scene(dispatcher.state(), &[]);
        let ruler_center = shapes.iter().find_map(|s| match s {
            Shape::Rect { color, center, .. } if *color == palette::RULER => Some(*center),
            _ => None,
        });
        let ruler_center = ruler_center.expect("ruler is drawn");
        assert!((ruler_center - Vec2::new(385.0, 220.0)).length() < 1e-3);
    }

    #[test]
    fn charged_balloon_gets_a_badge() {
        let mut dispatcher = Dispatcher::new(Balloon::new(Some(Rect::from_size(600.0, 400.0))));
        let plain = balloon_scene(dispatcher.state(), &[]).len();
        dispatcher.dispatch(Action::Charge);
        let charged = balloon_scene(dispatcher.state(), &[]);

        assert_eq!(charged.len(), plain + 2);
        assert!(charged.iter().any(|s| matches!(
            s,
            Shape::Ellipse { color, radii, .. } if *color == palette::BALLOON_CHARGED && radii.x > 64.0
        )));
    }
}

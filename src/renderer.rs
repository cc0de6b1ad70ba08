use glam::vec2;

use crate::clip::{Clip, clip_to_near};
use crate::geometry::{Color, Point2};
use crate::observer::{HEADING_LENGTH, Observer};
use crate::projection::{Viewport, project};
use crate::world::{Wall, WallList};

/// Radius of the observer marker circle, in pixels.
pub const OBSERVER_RADIUS: f32 = 2.0;
/// Pixels per world unit for the heading line drawn from the marker.
pub const MARKER_SCALE: f32 = 5.0;

const HORIZON_COLOR: Color = Color::rgb(90, 90, 90);
const OBSERVER_COLOR: Color = Color::rgb(255, 0, 0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand {
    Line { from: Point2, to: Point2, color: Color },
    Circle { center: Point2, radius: f32, color: Color },
}

/// Build this frame's draw commands. Walls are emitted in list order, then the
/// horizon and the observer marker.
pub fn render_frame(walls: &WallList, observer: &Observer, viewport: &Viewport) -> Vec<DrawCommand> {
    let mut out = Vec::with_capacity(walls.len() * 4 + 3);

    for wall in walls {
        draw_wall(&mut out, wall, observer, viewport);
    }

    let center = viewport.center();
    out.push(DrawCommand::Line {
        from: vec2(0.0, center.y),
        to: vec2(viewport.width, center.y),
        color: HORIZON_COLOR,
    });
    out.push(DrawCommand::Circle {
        center,
        radius: OBSERVER_RADIUS,
        color: OBSERVER_COLOR,
    });
    // The observer always faces into the screen, so the heading points up.
    out.push(DrawCommand::Line {
        from: center,
        to: center - vec2(0.0, (HEADING_LENGTH + OBSERVER_RADIUS) * MARKER_SCALE),
        color: OBSERVER_COLOR,
    });

    out
}

/// Emit the edges of one wall; returns how many commands were pushed.
fn draw_wall(out: &mut Vec<DrawCommand>, wall: &Wall, observer: &Observer, viewport: &Viewport) -> usize {
    let a = observer.to_observer_space(wall.p0);
    let b = observer.to_observer_space(wall.p1);

    let clip = clip_to_near(a, b);
    let Some(seg) = clip.segment() else {
        return 0;
    };
    let start = out.len();

    let p0 = project(seg.a, wall.height, viewport);
    let p1 = project(seg.b, wall.height, viewport);
    let vc = 0.5 * viewport.height;
    let color = wall.color;

    // bottom
    out.push(DrawCommand::Line {
        from: vec2(p0.x, vc + p0.y),
        to: vec2(p1.x, vc + p1.y),
        color,
    });
    // top
    out.push(DrawCommand::Line {
        from: vec2(p0.x, vc - p0.y),
        to: vec2(p1.x, vc - p1.y),
        color,
    });

    for (p, synthesized) in [(p0, seg.a_clipped), (p1, seg.b_clipped)] {
        if !synthesized {
            out.push(DrawCommand::Line {
                from: vec2(p.x, vc - p.y),
                to: vec2(p.x, vc + p.y),
                color,
            });
        }
    }

    if matches!(clip, Clip::Clipped(_)) {
        log::trace!("wall {:?}-{:?} clipped at near plane", wall.p0, wall.p1);
    }
    out.len() - start
}

use glam::vec2;

use crate::clip::CLIP_DEPTH;
use crate::geometry::Point2;

/// Pixel size of the framebuffer the pipeline projects into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }

    #[inline]
    pub fn center(&self) -> Point2 {
        vec2(0.5 * self.width, 0.5 * self.height)
    }
}

/// Inverse-depth projection of an observer-space point.
///
/// Returns the screen column in `.x` and the wall's projected half-height in
/// `.y`; the renderer mirrors `.y` above and below the horizon.
#[inline]
pub fn project(p: Point2, wall_height: f32, viewport: &Viewport) -> Point2 {
    debug_assert!(
        p.y >= CLIP_DEPTH,
        "projecting depth {} behind the near plane",
        p.y
    );
    let scale = viewport.height / p.y;
    vec2(
        p.x * scale + 0.5 * viewport.width,
        0.5 * wall_height * scale,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Viewport = Viewport {
        width: 800.0,
        height: 600.0,
    };

    #[test]
    fn centered_point_hits_screen_center() {
        let s = project(vec2(0.0, 25.0), 5.0, &VIEW);
        assert_eq!(s.x, 400.0);
        assert!((s.y - 60.0).abs() < 1e-4);
    }

    #[test]
    fn twice_as_far_is_half_as_large() {
        let near = project(vec2(10.0, 20.0), 4.0, &VIEW);
        let far = project(vec2(10.0, 40.0), 4.0, &VIEW);
        assert!((near.y - 2.0 * far.y).abs() < 1e-3);
        assert!(((near.x - 400.0) - 2.0 * (far.x - 400.0)).abs() < 1e-3);
    }

    #[test]
    fn half_height_shrinks_with_depth() {
        for lateral in [-30.0, 0.0, 12.5] {
            let mut prev = f32::INFINITY;
            let mut depth = CLIP_DEPTH;
            while depth < 1000.0 {
                let h = project(vec2(lateral, depth), 5.0, &VIEW).y;
                assert!(h < prev, "depth {depth}: {h} !< {prev}");
                prev = h;
                depth *= 1.5;
            }
        }
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn projecting_behind_near_plane_is_a_defect() {
        project(vec2(1.0, 0.0), 5.0, &VIEW);
    }
}

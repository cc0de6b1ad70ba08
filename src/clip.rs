use glam::vec2;

use crate::geometry::Point2;

/// Near plane depth in observer space. Anything projected has at least this depth.
pub const CLIP_DEPTH: f32 = 0.1;

/// Observer-space segment. `*_clipped` marks an endpoint synthesized on the near plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub a: Point2,
    pub b: Point2,
    pub a_clipped: bool,
    pub b_clipped: bool,
}

impl Segment {
    pub fn new(a: Point2, b: Point2) -> Self {
        Self {
            a,
            b,
            a_clipped: false,
            b_clipped: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Clip {
    /// Both endpoints in front of the near plane.
    Visible(Segment),
    /// Straddled the near plane; one endpoint was moved onto it.
    Clipped(Segment),
    /// Nothing in front of the near plane.
    Rejected,
}

impl Clip {
    pub fn segment(&self) -> Option<&Segment> {
        match self {
            Clip::Visible(s) | Clip::Clipped(s) => Some(s),
            Clip::Rejected => None,
        }
    }
}

/// Point where `front -> back` crosses depth `CLIP_DEPTH`. Needs `front.y > CLIP_DEPTH >= back.y`.
#[inline]
fn near_intersection(front: Point2, back: Point2) -> Point2 {
    let t = (front.y - CLIP_DEPTH) / (front.y - back.y);
    vec2(front.x + (back.x - front.x) * t, CLIP_DEPTH)
}

/// Classify and clip an observer-space segment against the near plane.
pub fn clip_to_near(a: Point2, b: Point2) -> Clip {
    let in_a = a.y > CLIP_DEPTH;
    let in_b = b.y > CLIP_DEPTH;

    match (in_a, in_b) {
        (true, true) => Clip::Visible(Segment::new(a, b)),
        (false, false) => Clip::Rejected,
        (true, false) => Clip::Clipped(Segment {
            a,
            b: near_intersection(a, b),
            a_clipped: false,
            b_clipped: true,
        }),
        (false, true) => Clip::Clipped(Segment {
            a: near_intersection(b, a),
            b,
            a_clipped: true,
            b_clipped: false,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Distance of `p` from the infinite line through `a` and `b`.
    fn off_line(a: Point2, b: Point2, p: Point2) -> f32 {
        (b - a).perp_dot(p - a).abs() / (b - a).length()
    }

    #[test]
    fn visible_passes_through() {
        let (a, b) = (vec2(-3.0, 4.0), vec2(5.0, 0.2));
        assert_eq!(clip_to_near(a, b), Clip::Visible(Segment::new(a, b)));
    }

    #[test]
    fn behind_is_rejected() {
        assert_eq!(clip_to_near(vec2(1.0, -4.0), vec2(2.0, -1.0)), Clip::Rejected);
        // exactly on the near plane does not count as in front
        assert_eq!(
            clip_to_near(vec2(1.0, CLIP_DEPTH), vec2(-1.0, CLIP_DEPTH)),
            Clip::Rejected
        );
    }

    #[test]
    fn zero_depth_endpoint_is_clipped() {
        let (a, b) = (vec2(4.0, 0.0), vec2(-2.0, 10.0));
        let Clip::Clipped(seg) = clip_to_near(a, b) else {
            panic!("expected a clipped segment");
        };
        assert!(seg.a_clipped && !seg.b_clipped);
        assert_eq!(seg.a.y, CLIP_DEPTH);
        assert_eq!(seg.b, b);
        assert!(off_line(a, b, seg.a) < 1e-5);
    }

    #[test]
    fn clipped_point_lies_on_segment() {
        let fronts = [vec2(0.0, 10.0), vec2(-7.0, 0.5), vec2(30.0, 200.0)];
        let backs = [vec2(3.0, CLIP_DEPTH), vec2(-1.0, -0.5), vec2(12.0, -40.0), vec2(0.0, 0.0)];
        for front in fronts {
            for back in backs {
                let Clip::Clipped(seg) = clip_to_near(front, back) else {
                    panic!("{front:?} {back:?} should straddle");
                };
                assert_eq!(seg.a, front);
                assert!(seg.b_clipped);
                assert_eq!(seg.b.y, CLIP_DEPTH);
                assert!(off_line(front, back, seg.b) < 1e-3, "{seg:?}");
                let (lo, hi) = (front.x.min(back.x), front.x.max(back.x));
                assert!(seg.b.x >= lo - 1e-4 && seg.b.x <= hi + 1e-4);
            }
        }
    }

    #[test]
    fn classification_is_total() {
        let depths = [-5.0, -0.01, 0.0, CLIP_DEPTH, 0.100001, 1.0, 50.0];
        for &da in &depths {
            for &db in &depths {
                let clip = clip_to_near(vec2(1.0, da), vec2(-1.0, db));
                let expected = match (da > CLIP_DEPTH, db > CLIP_DEPTH) {
                    (true, true) => matches!(clip, Clip::Visible(_)),
                    (false, false) => matches!(clip, Clip::Rejected),
                    _ => matches!(clip, Clip::Clipped(_)),
                };
                assert!(expected, "{da} {db} -> {clip:?}");
                if let Some(seg) = clip.segment() {
                    assert!(seg.a.y >= CLIP_DEPTH && seg.b.y >= CLIP_DEPTH);
                }
            }
        }
    }
}

use glam::{Vec2, vec2};
use rayon::{iter::ParallelIterator, slice::ParallelSliceMut};

use crate::geometry::Color;
use crate::renderer::DrawCommand;

/// Internal 0RGB framebuffer the draw commands are rasterized into.
pub struct Framebuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    /// Full-screen fill, rows in parallel.
    pub fn clear(&mut self, color: Color) {
        let px = color.to_pixel();
        self.pixels
            .par_chunks_mut(self.width.max(1))
            .for_each(|row| row.fill(px));
    }

    pub fn draw(&mut self, commands: &[DrawCommand]) {
        for cmd in commands {
            match *cmd {
                DrawCommand::Line { from, to, color } => self.draw_line(from, to, color),
                DrawCommand::Circle {
                    center,
                    radius,
                    color,
                } => self.fill_circle(center, radius, color),
            }
        }
    }

    #[inline]
    fn plot(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.pixels[idx] = blend(self.pixels[idx], color);
    }

    /// Bresenham, after trimming the segment to the buffer rectangle.
    pub fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color) {
        let max = vec2(self.width as f32 - 1.0, self.height as f32 - 1.0);
        let Some((from, to)) = clip_to_rect(from, to, max) else {
            return;
        };

        let (mut x0, mut y0) = (from.x.round() as i32, from.y.round() as i32);
        let (x1, y1) = (to.x.round() as i32, to.y.round() as i32);
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.plot(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if !center.is_finite() || !radius.is_finite() || radius < 0.0 {
            return;
        }
        let r2 = radius * radius;
        let y_lo = (center.y - radius).floor().max(0.0) as i32;
        let y_hi = (center.y + radius).ceil().min(self.height as f32 - 1.0) as i32;
        let x_lo = (center.x - radius).floor().max(0.0) as i32;
        let x_hi = (center.x + radius).ceil().min(self.width as f32 - 1.0) as i32;
        for y in y_lo..=y_hi {
            for x in x_lo..=x_hi {
                let d = vec2(x as f32, y as f32) - center;
                if d.length_squared() <= r2 {
                    self.plot(x, y, color);
                }
            }
        }
    }
}

#[inline]
fn blend(dst: u32, c: Color) -> u32 {
    match c.a {
        255 => c.to_pixel(),
        0 => dst,
        a => {
            let a = a as u32;
            let mix = |shift: u32, src: u8| {
                let d = (dst >> shift) & 0xFF;
                ((src as u32 * a + d * (255 - a)) / 255) << shift
            };
            mix(16, c.r) | mix(8, c.g) | mix(0, c.b)
        }
    }
}

/// Liang-Barsky clip of `a -> b` to `[0, max]`.
fn clip_to_rect(a: Vec2, b: Vec2, max: Vec2) -> Option<(Vec2, Vec2)> {
    if !a.is_finite() || !b.is_finite() || max.x < 0.0 || max.y < 0.0 {
        return None;
    }
    let d = b - a;
    let (mut t0, mut t1) = (0.0f32, 1.0f32);
    for (p, q) in [
        (-d.x, a.x),
        (d.x, max.x - a.x),
        (-d.y, a.y),
        (d.y, max.y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((a + d * t0, a + d * t1))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(255, 0, 0);

    fn lit(fb: &Framebuffer) -> usize {
        fb.pixels.iter().filter(|&&p| p != 0).count()
    }

    #[test]
    fn clear_fills_every_pixel() {
        let mut fb = Framebuffer::new(7, 5);
        fb.clear(Color::rgb(50, 50, 50));
        assert!(fb.pixels.iter().all(|&p| p == 0x0032_3232));
    }

    #[test]
    fn line_hits_both_endpoints() {
        let mut fb = Framebuffer::new(16, 16);
        fb.draw_line(vec2(1.0, 2.0), vec2(12.0, 9.0), RED);
        assert_eq!(fb.pixels[2 * 16 + 1], RED.to_pixel());
        assert_eq!(fb.pixels[9 * 16 + 12], RED.to_pixel());
        assert_eq!(lit(&fb), 12);
    }

    #[test]
    fn offscreen_line_is_trimmed() {
        let mut fb = Framebuffer::new(10, 10);
        fb.draw_line(vec2(-30000.0, 4.0), vec2(30000.0, 4.0), RED);
        assert_eq!(lit(&fb), 10);
        fb.draw_line(vec2(-5.0, -5.0), vec2(-1.0, 20.0), RED);
        fb.draw_line(vec2(f32::NAN, 0.0), vec2(3.0, 3.0), RED);
        assert_eq!(lit(&fb), 10);
    }

    #[test]
    fn circle_stays_in_bounds() {
        let mut fb = Framebuffer::new(8, 8);
        fb.fill_circle(vec2(0.0, 0.0), 2.0, RED);
        // quarter disc of radius 2 on the lattice
        assert_eq!(lit(&fb), 6);
    }

    #[test]
    fn draws_commands_in_order() {
        let mut fb = Framebuffer::new(4, 1);
        let blue = Color::rgb(0, 0, 255);
        fb.draw(&[
            DrawCommand::Line {
                from: vec2(0.0, 0.0),
                to: vec2(3.0, 0.0),
                color: RED,
            },
            DrawCommand::Line {
                from: vec2(2.0, 0.0),
                to: vec2(3.0, 0.0),
                color: blue,
            },
        ]);
        assert_eq!(fb.pixels, vec![0xFF0000, 0xFF0000, 0xFF, 0xFF]);
    }

    #[test]
    fn translucent_color_blends() {
        assert_eq!(blend(0, Color::rgba(255, 0, 0, 0)), 0);
        assert_eq!(blend(0x0000_00FF, Color::rgba(255, 0, 0, 255)), 0x00FF_0000);
        let half = blend(0, Color::rgba(254, 0, 0, 128));
        assert_eq!(half, 127 << 16);
    }
}

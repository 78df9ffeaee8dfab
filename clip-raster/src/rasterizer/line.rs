use nalgebra_glm::Vec2;

use crate::Color;

use super::Frame;

const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const TOP: u8 = 4;
const BOTTOM: u8 = 8;

/// Returns the region code of the point w.r.t. the rectangle [0, max_x] x [0, max_y].
fn region_code(p: &Vec2, max_x: f32, max_y: f32) -> u8 {
    let mut code = INSIDE;

    if p.x < 0f32 {
        code |= LEFT;
    } else if p.x > max_x {
        code |= RIGHT;
    }

    if p.y < 0f32 {
        code |= TOP;
    } else if p.y > max_y {
        code |= BOTTOM;
    }

    code
}

/// Clips the line segment to the rectangle [0, max_x] x [0, max_y] and returns the clipped end
/// points or None if nothing of the segment is left.
///
/// # Arguments
/// * `a` - The start of the segment.
/// * `b` - The end of the segment.
/// * `max_x` - The largest x-coordinate inside the rectangle.
/// * `max_y` - The largest y-coordinate inside the rectangle.
fn clip_segment(mut a: Vec2, mut b: Vec2, max_x: f32, max_y: f32) -> Option<(Vec2, Vec2)> {
    if !(a.x.is_finite() && a.y.is_finite() && b.x.is_finite() && b.y.is_finite()) {
        return None;
    }

    let mut code_a = region_code(&a, max_x, max_y);
    let mut code_b = region_code(&b, max_x, max_y);

    // every iteration moves one end point onto a border, so this terminates after a few rounds
    for _ in 0..8 {
        if code_a | code_b == INSIDE {
            return Some((a, b));
        }

        if code_a & code_b != INSIDE {
            return None;
        }

        let code = if code_a != INSIDE { code_a } else { code_b };
        let d = b - a;

        let p = if code & BOTTOM != 0 {
            Vec2::new(a.x + d.x * (max_y - a.y) / d.y, max_y)
        } else if code & TOP != 0 {
            Vec2::new(a.x + d.x * (0f32 - a.y) / d.y, 0f32)
        } else if code & RIGHT != 0 {
            Vec2::new(max_x, a.y + d.y * (max_x - a.x) / d.x)
        } else {
            Vec2::new(0f32, a.y + d.y * (0f32 - a.x) / d.x)
        };

        if code == code_a {
            a = p;
            code_a = region_code(&a, max_x, max_y);
        } else {
            b = p;
            code_b = region_code(&b, max_x, max_y);
        }
    }

    None
}

/// Draws the line from a to b with Bresenham's algorithm. Both end points are drawn and the parts
/// of the line outside of the frame are skipped.
///
/// # Arguments
/// * `frame` - The frame to draw on.
/// * `a` - The start of the line in window coordinates.
/// * `b` - The end of the line in window coordinates.
/// * `color` - The line color.
pub fn draw_line(frame: &mut Frame, a: &Vec2, b: &Vec2, color: Color) {
    let (width, height) = (frame.get_width(), frame.get_height());
    if width == 0 || height == 0 {
        return;
    }

    let (a, b) = match clip_segment(*a, *b, (width - 1) as f32, (height - 1) as f32) {
        Some(segment) => segment,
        None => return,
    };

    let (mut x0, mut y0) = (a.x.round() as i64, a.y.round() as i64);
    let (x1, y1) = (b.x.round() as i64, b.y.round() as i64);

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if x0 >= 0 && y0 >= 0 && (x0 as usize) < width && (y0 as usize) < height {
            frame.set_pixel(x0 as usize, y0 as usize, color);
        }

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

/// Draws the outline of the triangle.
///
/// # Arguments
/// * `frame` - The frame to draw on.
/// * `p` - The triangle vertices in window coordinates.
/// * `color` - The line color.
pub fn draw_triangle_wireframe(frame: &mut Frame, p: &[Vec2; 3], color: Color) {
    draw_line(frame, &p[0], &p[1], color);
    draw_line(frame, &p[1], &p[2], color);
    draw_line(frame, &p[2], &p[0], color);
}

use nalgebra_glm::Vec2;

use crate::{math::clamp, Color};

use super::{DepthBuffer, Frame, Texture};

/// A triangle corner in window coordinates together with the attributes needed for texturing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenVertex {
    /// The x-coordinate in pixels.
    pub x: f32,

    /// The y-coordinate in pixels, where row 0 is the top of the frame.
    pub y: f32,

    /// The horizontal texture coordinate.
    pub u: f32,

    /// The vertical texture coordinate.
    pub v: f32,

    /// The reciprocal of the clip-space w of the vertex.
    pub inv_w: f32,
}

impl ScreenVertex {
    pub fn new(x: f32, y: f32, u: f32, v: f32, inv_w: f32) -> Self {
        Self { x, y, u, v, inv_w }
    }
}

/// A point on the scan structure with `N` attributes that are interpolated linearly in screen
/// space.
#[derive(Debug, Clone, Copy)]
struct ScanPoint<const N: usize> {
    x: f32,
    y: f32,
    attrs: [f32; N],
}

impl<const N: usize> ScanPoint<N> {
    /// Returns the per row increment of x and the attributes from self towards dest.
    ///
    /// # Arguments
    /// * `dest` - The point to step towards.
    /// * `dy` - The positive number of rows between self and dest.
    #[inline]
    fn step_towards(&self, dest: &Self, dy: f32) -> Self {
        debug_assert!(dy > 0f32);

        let mut attrs = [0f32; N];
        for (a, (s, d)) in attrs.iter_mut().zip(self.attrs.iter().zip(dest.attrs.iter())) {
            *a = (d - s) / dy;
        }

        Self {
            x: (dest.x - self.x) / dy,
            y: 1f32,
            attrs,
        }
    }

    /// Returns the point reached after the given number of steps.
    #[inline]
    fn advance(&self, step: &Self, steps: f32) -> Self {
        let mut attrs = self.attrs;
        for (a, s) in attrs.iter_mut().zip(step.attrs.iter()) {
            *a += steps * s;
        }

        Self {
            x: self.x + steps * step.x,
            y: self.y + steps * step.y,
            attrs,
        }
    }
}

/// Walks over all pixels covered by the triangle and calls `plot` with the pixel position and
/// the attributes interpolated linearly in screen space. Only pixels within the frame of the
/// given size are visited.
///
/// The vertex coordinates are truncated to whole pixels. The triangle is split at the row of the
/// vertically middle vertex into a top and a bottom half, which are scanned row by row from left
/// to right. Spans cover `[left, right)`.
///
/// # Arguments
/// * `width` - The width of the frame.
/// * `height` - The height of the frame.
/// * `vertices` - The vertices as (x, y, attributes) in window coordinates.
/// * `plot` - Called for each covered pixel.
fn scan_triangle<const N: usize, F>(
    width: usize,
    height: usize,
    vertices: [(f32, f32, [f32; N]); 3],
    mut plot: F,
) where
    F: FnMut(usize, usize, &[f32; N]),
{
    let [mut top, mut mid, mut bot] = vertices.map(|(x, y, attrs)| ScanPoint {
        x: x.trunc(),
        y: y.trunc(),
        attrs,
    });

    // sort the points vertically
    if mid.y < top.y {
        std::mem::swap(&mut mid, &mut top);
    }
    if bot.y < top.y {
        std::mem::swap(&mut bot, &mut top);
    }
    if bot.y < mid.y {
        std::mem::swap(&mut bot, &mut mid);
    }

    let dy_top_mid = mid.y - top.y;
    let dy_top_bot = bot.y - top.y;
    let dy_mid_bot = bot.y - mid.y;

    // triangles with zero height cover no pixels, this also catches NaN coordinates
    if !(dy_top_bot > 0f32) {
        return;
    }

    // the point on the top-bottom edge at the height of the middle vertex
    let top_bot_step = top.step_towards(&bot, dy_top_bot);
    let mut mid2 = top.advance(&top_bot_step, dy_top_mid);

    // the left edge must end in mid s.t. the scanlines go from left to right
    if mid.x > mid2.x {
        std::mem::swap(&mut mid, &mut mid2);
    }

    if dy_top_mid > 0f32 {
        let left_step = top.step_towards(&mid, dy_top_mid);
        let right_step = top.step_towards(&mid2, dy_top_mid);

        scan_half(
            width,
            height,
            (&top, &left_step),
            (&top, &right_step),
            mid.y,
            &mut plot,
        );
    }

    if dy_mid_bot > 0f32 {
        let left_step = mid.step_towards(&bot, dy_mid_bot);
        let right_step = mid2.step_towards(&bot, dy_mid_bot);

        scan_half(
            width,
            height,
            (&mid, &left_step),
            (&mid2, &right_step),
            bot.y,
            &mut plot,
        );
    }
}

/// Scans the rows from the start of the two edges down to `y_end` inclusive.
///
/// # Arguments
/// * `width` - The width of the frame.
/// * `height` - The height of the frame.
/// * `left` - The start point and per row step of the left edge.
/// * `right` - The start point and per row step of the right edge.
/// * `y_end` - The last row of the half.
/// * `plot` - Called for each covered pixel.
fn scan_half<const N: usize, F>(
    width: usize,
    height: usize,
    left: (&ScanPoint<N>, &ScanPoint<N>),
    right: (&ScanPoint<N>, &ScanPoint<N>),
    y_end: f32,
    plot: &mut F,
) where
    F: FnMut(usize, usize, &[f32; N]),
{
    let y_start = left.0.y;
    debug_assert!(y_start == right.0.y);

    // clamp the rows to the frame
    let y0 = (y_start as i64).max(0);
    let y1 = (y_end as i64).min(height as i64 - 1);

    for y in y0..=y1 {
        let steps = (y as f32) - y_start;

        let mut l = left.0.advance(left.1, steps);
        let mut r = right.0.advance(right.1, steps);
        l.x = l.x.trunc();
        r.x = r.x.trunc();

        let dx = r.x - l.x;
        if !(dx > 0f32) {
            continue;
        }

        let mut attr_step = [0f32; N];
        for (s, (a, b)) in attr_step.iter_mut().zip(l.attrs.iter().zip(r.attrs.iter())) {
            *s = (b - a) / dx;
        }

        // clamp the span to the frame
        let x0 = clamp(l.x as i64, 0, width as i64);
        let x1 = clamp(r.x as i64, 0, width as i64);

        for x in x0..x1 {
            let x_steps = (x as f32) - l.x;

            let mut attrs = l.attrs;
            for (a, s) in attrs.iter_mut().zip(attr_step.iter()) {
                *a += x_steps * s;
            }

            plot(x as usize, y as usize, &attrs);
        }
    }
}

/// Fills the triangle with a solid color.
///
/// # Arguments
/// * `frame` - The frame to draw on.
/// * `p` - The triangle vertices in window coordinates.
/// * `color` - The fill color.
pub fn fill_triangle(frame: &mut Frame, p: &[Vec2; 3], color: Color) {
    let (width, height) = (frame.get_width(), frame.get_height());

    scan_triangle(width, height, p.map(|p| (p.x, p.y, [])), |x, y, _| {
        frame.set_pixel(x, y, color);
    });
}

/// Fills the triangle with the texture, interpolating the texture coordinates linearly in screen
/// space. This ignores perspective and warps textures on surfaces that are tilted with respect
/// to the view plane.
///
/// # Arguments
/// * `frame` - The frame to draw on.
/// * `vertices` - The triangle vertices in window coordinates. The `inv_w` values are ignored.
/// * `texture` - The texture to sample from.
pub fn fill_affine_textured_triangle<T: Texture + ?Sized>(
    frame: &mut Frame,
    vertices: &[ScreenVertex; 3],
    texture: &T,
) {
    let (width, height) = (frame.get_width(), frame.get_height());
    let vertices = vertices.map(|v| (v.x, v.y, [v.u, v.v]));

    scan_triangle(width, height, vertices, |x, y, [u, v]| {
        frame.set_pixel(x, y, texture.pixel_at_uv(*u, *v));
    });
}

/// Fills the triangle with the texture using perspective correct texture coordinates.
///
/// The values `u/w`, `v/w` and `1/w` are linear in screen space. They are interpolated per pixel
/// and the texture coordinate is recovered by dividing by the interpolated `1/w`.
///
/// If a depth buffer is given, a pixel is only written if its depth `w` is strictly nearer than
/// the depth stored for the pixel, and the depth buffer is updated accordingly.
///
/// # Arguments
/// * `frame` - The frame to draw on.
/// * `vertices` - The triangle vertices in window coordinates.
/// * `texture` - The texture to sample from.
/// * `depth_buffer` - Optionally, the depth buffer with the same size as the frame.
pub fn fill_perspective_textured_triangle<T: Texture + ?Sized>(
    frame: &mut Frame,
    vertices: &[ScreenVertex; 3],
    texture: &T,
    mut depth_buffer: Option<&mut DepthBuffer>,
) {
    let (width, height) = (frame.get_width(), frame.get_height());
    if let Some(depth_buffer) = depth_buffer.as_ref() {
        debug_assert!(depth_buffer.width() == width && depth_buffer.height() == height);
    }

    let vertices = vertices.map(|v| (v.x, v.y, [v.u * v.inv_w, v.v * v.inv_w, v.inv_w]));

    scan_triangle(width, height, vertices, |x, y, [u_w, v_w, inv_w]| {
        let z = 1f32 / inv_w;

        if let Some(depth_buffer) = depth_buffer.as_mut() {
            if z < depth_buffer.get(x, y) {
                depth_buffer.set(x, y, z);
            } else {
                return;
            }
        }

        frame.set_pixel(x, y, texture.pixel_at_uv(u_w * z, v_w * z));
    });
}

#[cfg(test)]
mod test {
    use crate::ImageTexture;

    use super::*;

    const CLEAR: Color = Color::new(0, 0, 0, 0);

    /// Creates a texture where every texel encodes its own column and row.
    fn create_coordinate_texture(size: usize) -> ImageTexture {
        let texels = (0..size * size)
            .map(|i| Color::new((i % size) as u8, (i / size) as u8, 0, 255))
            .collect();

        ImageTexture::new(size, size, texels).unwrap()
    }

    /// Creates a texture with a single color.
    fn create_solid_texture(color: Color) -> ImageTexture {
        ImageTexture::new(2, 2, vec![color; 4]).unwrap()
    }

    /// Returns the number of pixels that are not cleared.
    fn count_pixels(frame: &Frame) -> usize {
        frame
            .get_pixels()
            .chunks_exact(4)
            .filter(|p| *p != CLEAR.to_bytes())
            .count()
    }

    #[test]
    fn test_fill_triangle() {
        let mut frame = Frame::new_empty(20, 20);

        let p = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 10.0),
        ];
        fill_triangle(&mut frame, &p, Color::RED);

        for y in 0..20 {
            for x in 0..20 {
                let expected = if x + y < 10 { Color::RED } else { CLEAR };
                assert_eq!(frame.get_pixel(x, y), expected, "Pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_fill_triangle_vertex_order_does_not_matter() {
        let p = [
            Vec2::new(3.0, 2.0),
            Vec2::new(17.0, 9.0),
            Vec2::new(6.0, 18.0),
        ];

        let mut reference = Frame::new_empty(20, 20);
        fill_triangle(&mut reference, &p, Color::GREEN);
        assert!(count_pixels(&reference) > 0);

        for order in [[0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]] {
            let mut frame = Frame::new_empty(20, 20);
            fill_triangle(&mut frame, &order.map(|i| p[i]), Color::GREEN);
            assert_eq!(frame.get_pixels(), reference.get_pixels());
        }
    }

    #[test]
    fn test_fill_triangle_area() {
        let mut frame = Frame::new_empty(128, 128);

        let p = [
            Vec2::new(20.0, 10.0),
            Vec2::new(100.0, 60.0),
            Vec2::new(10.0, 110.0),
        ];
        fill_triangle(&mut frame, &p, Color::BLUE);

        let area = crate::math::signed_area_2d(&p[0], &p[1], &p[2]).abs() / 2.0;
        let num_pixels = count_pixels(&frame) as f32;

        // the error is at most about one pixel per row
        let height = 100.0;
        assert!((num_pixels - area).abs() <= height * 2.0);

        // every row within the triangle has a contiguous span
        for y in 11..110 {
            let xs: Vec<usize> = (0..128)
                .filter(|x| frame.get_pixel(*x, y) == Color::BLUE)
                .collect();

            assert!(!xs.is_empty(), "Row {} is empty", y);
            assert_eq!(xs.len(), xs[xs.len() - 1] - xs[0] + 1);
        }
    }

    #[test]
    fn test_degenerate_triangle() {
        let mut frame = Frame::new_empty(20, 20);

        let p = [
            Vec2::new(1.0, 5.0),
            Vec2::new(10.0, 5.0),
            Vec2::new(18.0, 5.0),
        ];
        fill_triangle(&mut frame, &p, Color::RED);
        assert_eq!(count_pixels(&frame), 0);

        let texture = create_solid_texture(Color::RED);
        let v = p.map(|p| ScreenVertex::new(p.x, p.y, 0.0, 0.0, 1.0));
        fill_affine_textured_triangle(&mut frame, &v, &texture);
        fill_perspective_textured_triangle(&mut frame, &v, &texture, None);
        assert_eq!(count_pixels(&frame), 0);

        // zero width
        let p = [
            Vec2::new(5.0, 1.0),
            Vec2::new(5.0, 10.0),
            Vec2::new(5.0, 18.0),
        ];
        fill_triangle(&mut frame, &p, Color::RED);
        assert_eq!(count_pixels(&frame), 0);
    }

    #[test]
    fn test_clipping_to_frame() {
        let mut frame = Frame::new_empty(16, 16);

        // a triangle that is way larger than the frame covers every pixel
        let p = [
            Vec2::new(-100.0, -100.0),
            Vec2::new(300.0, -50.0),
            Vec2::new(-50.0, 300.0),
        ];
        fill_triangle(&mut frame, &p, Color::RED);
        assert_eq!(count_pixels(&frame), 16 * 16);

        let mut frame = Frame::new_empty(16, 16);
        let texture = create_coordinate_texture(8);
        let mut depth = DepthBuffer::new(16, 16);
        let v = p.map(|p| ScreenVertex::new(p.x, p.y, 0.3, 0.6, 0.5));
        fill_perspective_textured_triangle(&mut frame, &v, &texture, Some(&mut depth));
        assert_eq!(count_pixels(&frame), 16 * 16);
        assert!(depth.depths().iter().all(|d| (*d - 2.0).abs() < 1e-4));

        // completely outside
        let mut frame = Frame::new_empty(16, 16);
        let p = [
            Vec2::new(20.0, 0.0),
            Vec2::new(30.0, 0.0),
            Vec2::new(20.0, 10.0),
        ];
        fill_triangle(&mut frame, &p, Color::RED);
        assert_eq!(count_pixels(&frame), 0);
    }

    #[test]
    fn test_affine_texture_mapping() {
        let size = 32;
        let texture = create_coordinate_texture(size);
        let mut frame = Frame::new_empty(size, size);

        // map the texture onto the frame 1:1 with two triangles, upside down
        let s = size as f32;
        let tl = ScreenVertex::new(0.0, 0.0, 0.0, 0.0, 1.0);
        let bl = ScreenVertex::new(0.0, s, 0.0, 1.0, 1.0);
        let br = ScreenVertex::new(s, s, 1.0, 1.0, 1.0);
        let tr = ScreenVertex::new(s, 0.0, 1.0, 0.0, 1.0);

        fill_affine_textured_triangle(&mut frame, &[tl, bl, tr], &texture);
        fill_affine_textured_triangle(&mut frame, &[bl, br, tr], &texture);

        // every written pixel shows a texel at most one texel away from the mirrored position
        let mut num_written = 0;
        for y in 0..size {
            for x in 0..size {
                let c = frame.get_pixel(x, y);
                if c == CLEAR {
                    continue;
                }

                let mirrored_y = (size - 1 - y) as i64;

                num_written += 1;
                assert!((c.r as i64 - x as i64).abs() <= 1, "Pixel ({}, {}): {:?}", x, y, c);
                assert!((c.g as i64 - mirrored_y).abs() <= 1, "Pixel ({}, {}): {:?}", x, y, c);
            }
        }

        assert!(num_written > size * size * 9 / 10);
    }

    #[test]
    fn test_perspective_differs_from_affine() {
        let size = 64;
        let texture = create_coordinate_texture(size);

        // a triangle whose vertices have different depths
        let v = [
            ScreenVertex::new(4.0, 4.0, 0.1, 0.9, 1.0),
            ScreenVertex::new(60.0, 10.0, 0.9, 0.9, 0.1),
            ScreenVertex::new(10.0, 60.0, 0.1, 0.1, 0.5),
        ];

        let mut affine = Frame::new_empty(size, size);
        fill_affine_textured_triangle(&mut affine, &v, &texture);

        let mut perspective = Frame::new_empty(size, size);
        fill_perspective_textured_triangle(&mut perspective, &v, &texture, None);

        // both cover the same pixels
        assert_eq!(count_pixels(&affine), count_pixels(&perspective));

        let num_different = affine
            .get_pixels()
            .chunks_exact(4)
            .zip(perspective.get_pixels().chunks_exact(4))
            .filter(|(a, b)| a != b)
            .count();

        assert!(
            num_different > count_pixels(&affine) / 4,
            "Only {} pixels differ",
            num_different
        );
    }

    #[test]
    fn test_perspective_equals_affine_for_constant_depth() {
        let size = 64;
        let texture = create_coordinate_texture(size);

        let v = [
            ScreenVertex::new(4.0, 4.0, 0.1, 0.9, 0.5),
            ScreenVertex::new(60.0, 10.0, 0.9, 0.9, 0.5),
            ScreenVertex::new(10.0, 60.0, 0.1, 0.1, 0.5),
        ];

        let mut affine = Frame::new_empty(size, size);
        fill_affine_textured_triangle(&mut affine, &v, &texture);

        let mut perspective = Frame::new_empty(size, size);
        fill_perspective_textured_triangle(&mut perspective, &v, &texture, None);

        // apart from rounding at texel borders both are the same
        for y in 0..size {
            for x in 0..size {
                let a = affine.get_pixel(x, y);
                let p = perspective.get_pixel(x, y);
                assert!((a.r as i64 - p.r as i64).abs() <= 1);
                assert!((a.g as i64 - p.g as i64).abs() <= 1);
                assert_eq!(a.a, p.a);
            }
        }
    }

    #[test]
    fn test_depth_test_is_order_independent() {
        let size = 32;
        let near = create_solid_texture(Color::BLUE);
        let far = create_solid_texture(Color::RED);

        let near_triangle = [
            ScreenVertex::new(2.0, 2.0, 0.0, 0.0, 0.5),
            ScreenVertex::new(20.0, 4.0, 0.0, 0.0, 0.5),
            ScreenVertex::new(6.0, 22.0, 0.0, 0.0, 0.5),
        ];
        let far_triangle = [
            ScreenVertex::new(8.0, 8.0, 0.0, 0.0, 0.1),
            ScreenVertex::new(30.0, 10.0, 0.0, 0.0, 0.1),
            ScreenVertex::new(12.0, 30.0, 0.0, 0.0, 0.1),
        ];

        let mut frame0 = Frame::new_empty(size, size);
        let mut depth0 = DepthBuffer::new(size, size);
        fill_perspective_textured_triangle(&mut frame0, &far_triangle, &far, Some(&mut depth0));
        fill_perspective_textured_triangle(&mut frame0, &near_triangle, &near, Some(&mut depth0));

        let mut frame1 = Frame::new_empty(size, size);
        let mut depth1 = DepthBuffer::new(size, size);
        fill_perspective_textured_triangle(&mut frame1, &near_triangle, &near, Some(&mut depth1));
        fill_perspective_textured_triangle(&mut frame1, &far_triangle, &far, Some(&mut depth1));

        assert_eq!(frame0.get_pixels(), frame1.get_pixels());
        assert_eq!(depth0.depths(), depth1.depths());

        // the overlap shows the near triangle
        assert_eq!(frame0.get_pixel(10, 12), Color::BLUE);
        assert!((depth0.get(10, 12) - 2.0).abs() < 1e-4);
        assert_eq!(frame0.get_pixel(20, 20), Color::RED);
        assert!((depth0.get(20, 20) - 10.0).abs() < 1e-3);

        // without the depth test the last triangle wins
        let mut frame2 = Frame::new_empty(size, size);
        fill_perspective_textured_triangle(&mut frame2, &near_triangle, &near, None);
        fill_perspective_textured_triangle(&mut frame2, &far_triangle, &far, None);
        assert_eq!(frame2.get_pixel(10, 12), Color::RED);
    }

    #[test]
    fn test_depth_buffer_written_on_first_touch() {
        let size = 16;
        let texture = create_solid_texture(Color::GREEN);
        let mut frame = Frame::new_empty(size, size);
        let mut depth = DepthBuffer::new(size, size);

        let v = [
            ScreenVertex::new(0.0, 0.0, 0.0, 0.0, 0.001),
            ScreenVertex::new(16.0, 0.0, 0.0, 0.0, 0.001),
            ScreenVertex::new(0.0, 16.0, 0.0, 0.0, 0.001),
        ];
        fill_perspective_textured_triangle(&mut frame, &v, &texture, Some(&mut depth));

        for y in 0..size {
            for x in 0..size {
                let written = frame.get_pixel(x, y) == Color::GREEN;
                assert_eq!(written, depth.get(x, y) != DepthBuffer::EMPTY);
            }
        }

        assert!(count_pixels(&frame) > 0);
    }
}

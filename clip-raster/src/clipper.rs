//! Clipping of triangles against the view frustum in homogeneous clip space.
//!
//! The triangles are clipped plane by plane before the perspective divide, which keeps w away
//! from zero for everything that reaches the rasterizer. Every synthesized triangle keeps the
//! winding order of its source triangle s.t. backface culling still works after clipping.

use log::trace;

use crate::{
    math::{ClipPlane, FRUSTUM_PLANES},
    Triangle, Vertex,
};

/// Interpolates from the vertex outside of the plane towards the vertex inside of the plane and
/// returns the vertex on the plane.
///
/// # Arguments
/// * `plane` - The plane to intersect with.
/// * `outside` - The vertex outside of the plane.
/// * `inside` - The vertex inside of the plane.
#[inline]
fn intersect(plane: &ClipPlane, outside: &Vertex, inside: &Vertex) -> Vertex {
    let t = plane.find_lerp_factor(&outside.pos, &inside.pos);
    debug_assert!(
        t.is_finite() && (0f32..=1f32).contains(&t),
        "Invalid lerp factor {} for plane {:?} between {:?} and {:?}",
        t,
        plane,
        outside.pos,
        inside.pos
    );

    outside.lerp(inside, t)
}

/// Clips the triangle by a single plane and appends the resulting zero, one or two triangles to
/// the output.
///
/// # Arguments
/// * `triangle` - The triangle in clip space.
/// * `plane` - The plane to clip against.
/// * `out` - The list the clipped triangles are appended to.
pub fn clip_triangle_into(triangle: &Triangle, plane: &ClipPlane, out: &mut Vec<Triangle>) {
    let mut inside = [0usize; 3];
    let mut outside = [0usize; 3];
    let mut num_inside = 0;
    let mut num_outside = 0;

    for (i, v) in triangle.vertices.iter().enumerate() {
        if plane.is_outside(&v.pos) {
            outside[num_outside] = i;
            num_outside += 1;
        } else {
            inside[num_inside] = i;
            num_inside += 1;
        }
    }

    let color = triangle.color;
    let v = &triangle.vertices;

    match num_inside {
        // the triangle is completely outside of the plane
        0 => {}
        // one vertex inside, shrink the triangle towards it
        1 => {
            let (ai, bi) = (inside[0], outside[0]);
            let a = &v[ai];
            let b = &v[bi];
            let c = &v[outside[1]];

            let b1 = intersect(plane, b, a);
            let c1 = intersect(plane, c, a);

            if b_follows_a(ai, bi) {
                out.push(Triangle::new(*a, b1, c1, color));
            } else {
                out.push(Triangle::new(*a, c1, b1, color));
            }
        }
        // one vertex outside, the remaining quad is split into two triangles
        2 => {
            let (ai, bi) = (inside[0], outside[0]);
            let a = &v[ai];
            let b = &v[bi];
            let c = &v[inside[1]];

            let a1 = intersect(plane, b, a);
            let c1 = intersect(plane, b, c);

            if b_follows_a(ai, bi) {
                out.push(Triangle::new(*a, a1, c1, color));
                out.push(Triangle::new(*a, c1, *c, color));
            } else {
                out.push(Triangle::new(*a, *c, c1, color));
                out.push(Triangle::new(*a, c1, a1, color));
            }
        }
        // the triangle is completely inside of the plane
        _ => out.push(*triangle),
    }
}

/// Returns true if the vertex with index `bi` directly follows the vertex with index `ai` in the
/// cyclic vertex order of a triangle.
#[inline]
fn b_follows_a(ai: usize, bi: usize) -> bool {
    (ai + 1) % 3 == bi
}

/// Clips the triangle by a single plane and returns the resulting zero, one or two triangles.
///
/// # Arguments
/// * `triangle` - The triangle in clip space.
/// * `plane` - The plane to clip against.
pub fn clip_triangle(triangle: &Triangle, plane: &ClipPlane) -> Vec<Triangle> {
    let mut result = Vec::with_capacity(2);
    clip_triangle_into(triangle, plane, &mut result);

    result
}

/// Clips all the given triangles by a single plane and returns the new list of triangles.
///
/// # Arguments
/// * `triangles` - The triangles in clip space.
/// * `plane` - The plane to clip against.
pub fn clip_triangles_by_plane(triangles: &[Triangle], plane: &ClipPlane) -> Vec<Triangle> {
    let mut result = Vec::with_capacity(triangles.len());
    for t in triangles.iter() {
        clip_triangle_into(t, plane, &mut result);
    }

    result
}

/// Clips the given triangles by all six frustum planes, one plane after the other, and returns
/// the triangles that remain inside of the frustum.
///
/// # Arguments
/// * `triangles` - The triangles in clip space.
pub fn clip_triangles_by_all_planes(triangles: &[Triangle]) -> Vec<Triangle> {
    let mut result = triangles.to_vec();

    for plane in FRUSTUM_PLANES.iter() {
        if result.is_empty() {
            break;
        }

        result = clip_triangles_by_plane(&result, plane);
        trace!(
            "Clipped by {:?}/{:?}: {} triangles",
            plane.axis,
            plane.side,
            result.len()
        );
    }

    result
}

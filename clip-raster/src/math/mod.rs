mod homogeneous;
mod plane;

pub use homogeneous::*;
pub use plane::*;

use nalgebra_glm::{Mat4, Vec2, Vec3};

/// Constraint a value to lie between two further values
///
/// # Arguments
/// * `x` - The value to constraint.
/// * `min_value` - The lower bound for the value constraint.
/// * `max_value` - The upper bound for the value constraint.
#[inline]
pub fn clamp<T>(x: T, min_value: T, max_value: T) -> T
where
    T: PartialOrd,
{
    if x < min_value {
        min_value
    } else if x > max_value {
        max_value
    } else {
        x
    }
}

/// Transforms the given homogeneous position with the given 4x4 matrix.
///
/// # Arguments
/// * `t` - The 4x4 homogenous transformation matrix, usually the model-view-projection.
/// * `p` - The homogeneous position to transform.
#[inline]
pub fn transform_pos(t: &Mat4, p: &HomogeneousVector) -> HomogeneousVector {
    (t * p.as_vec4()).into()
}

/// Performs the perspective divide on the given clip-space position and returns the normalized
/// device coordinates. The w-component of the result holds `1/w` of the clip-space position.
/// A zero w yields the zero vector.
///
/// # Arguments
/// * `clip` - The position in clip space.
#[inline]
pub fn perspective_divide(clip: &HomogeneousVector) -> HomogeneousVector {
    let w = clip.w();
    if w == 0f32 {
        return HomogeneousVector::zero();
    }

    HomogeneousVector::new(clip.x() / w, clip.y() / w, clip.z() / w, 1f32 / w)
}

/// Maps the given normalized device coordinates to window coordinates. The y-axis is flipped s.t.
/// the window row 0 is at the top.
///
/// # Arguments
/// * `ndc` - The position in normalized device coordinates.
/// * `width` - The width of the window in pixels.
/// * `height` - The height of the window in pixels.
#[inline]
pub fn ndc_to_window(ndc: &HomogeneousVector, width: f32, height: f32) -> Vec3 {
    let x = (ndc.x() + 1f32) * 0.5 * width;
    let y = (1f32 - ndc.y()) * 0.5 * height;

    Vec3::new(x, y, ndc.z())
}

/// Returns twice the signed area of the 2D triangle. The area is positive for counter-clockwise
/// triangles in a y-up coordinate system.
///
/// # Arguments
/// * `p0` - The first vertex of the triangle.
/// * `p1` - The second vertex of the triangle.
/// * `p2` - The third vertex of the triangle.
#[inline]
pub fn signed_area_2d(p0: &Vec2, p1: &Vec2, p2: &Vec2) -> f32 {
    let a = p1 - p0;
    let b = p2 - p0;

    a.x * b.y - a.y * b.x
}

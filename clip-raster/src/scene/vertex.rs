use serde::{Deserialize, Serialize};

use crate::math::{Axis, HomogeneousVector};

/// A triangle corner with a homogeneous position and a texture coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vertex {
    /// The homogeneous position of the vertex.
    pub pos: HomogeneousVector,

    /// The texture coordinate (u, v) stored in the first two components.
    pub tex_coords: HomogeneousVector,
}

impl Vertex {
    /// Creates a new vertex.
    ///
    /// # Arguments
    /// * `pos` - The homogeneous position of the vertex.
    /// * `tex_coords` - The texture coordinate of the vertex.
    pub fn new(pos: HomogeneousVector, tex_coords: HomogeneousVector) -> Self {
        Self { pos, tex_coords }
    }

    /// Creates a vertex at the given object space position with w = 1 and texture
    /// coordinate (u, v).
    pub fn from_pos(x: f32, y: f32, z: f32, u: f32, v: f32) -> Self {
        Self::new(
            HomogeneousVector::point(x, y, z),
            HomogeneousVector::tex_coord(u, v),
        )
    }

    /// Returns the position component for the given axis.
    #[inline]
    pub fn get(&self, axis: Axis) -> f32 {
        self.pos.get(axis)
    }

    #[inline]
    pub fn u(&self) -> f32 {
        self.tex_coords.x()
    }

    #[inline]
    pub fn v(&self) -> f32 {
        self.tex_coords.y()
    }

    /// Returns a copy of the vertex with the position replaced.
    #[inline]
    pub fn with_pos(&self, pos: HomogeneousVector) -> Self {
        Self {
            pos,
            tex_coords: self.tex_coords,
        }
    }

    /// Returns true if the clip-space position is within all six frustum planes.
    pub fn is_inside_view_frustum(&self) -> bool {
        self.is_inside_x_planes() && self.is_inside_y_planes() && self.is_inside_z_planes()
    }

    #[inline]
    pub fn is_inside_x_planes(&self) -> bool {
        self.is_inside_planes(Axis::X)
    }

    #[inline]
    pub fn is_inside_y_planes(&self) -> bool {
        self.is_inside_planes(Axis::Y)
    }

    #[inline]
    pub fn is_inside_z_planes(&self) -> bool {
        self.is_inside_planes(Axis::Z)
    }

    /// Checks `|component| <= |w|` for the given axis.
    #[inline]
    fn is_inside_planes(&self, axis: Axis) -> bool {
        self.pos.get(axis).abs() <= self.pos.w().abs()
    }

    /// Interpolates the position and the texture coordinate independently towards the other
    /// vertex.
    ///
    /// # Arguments
    /// * `other` - The vertex reached for `t = 1`.
    /// * `t` - The interpolation factor.
    #[inline]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            pos: self.pos.lerp(&other.pos, t),
            tex_coords: self.tex_coords.lerp(&other.tex_coords, t),
        }
    }
}

mod cube;
mod vertex;

pub use cube::*;
pub use vertex::*;

use crate::{
    math::{transform_pos, HomogeneousVector},
    Error, Result,
};
use nalgebra_glm::{rotate_x_vec3, rotate_y_vec3, Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// RGBA color with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0, 255);
    pub const WHITE: Color = Color::new(255, 255, 255, 255);
    pub const RED: Color = Color::new(255, 0, 0, 255);
    pub const GREEN: Color = Color::new(0, 255, 0, 255);
    pub const BLUE: Color = Color::new(0, 0, 255, 255);
    pub const MAGENTA: Color = Color::new(255, 0, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Converts to [u8; 4] in RGBA order.
    #[inline]
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }
}

/// A triangle with a flat color. The winding order is given by the order of the vertices, i.e.,
/// vertex `(i + 1) % 3` follows vertex `i`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub vertices: [Vertex; 3],

    /// The color used for solid fills.
    pub color: Color,
}

impl Triangle {
    /// Creates a new triangle from the given vertices in the given winding order.
    ///
    /// # Arguments
    /// * `a` - The first vertex.
    /// * `b` - The vertex following `a`.
    /// * `c` - The vertex following `b`.
    /// * `color` - The flat color of the triangle.
    pub fn new(a: Vertex, b: Vertex, c: Vertex, color: Color) -> Self {
        Self {
            vertices: [a, b, c],
            color,
        }
    }

    /// Creates a new triangle from object space positions with all texture coordinates zero.
    ///
    /// # Arguments
    /// * `p0` - The first position.
    /// * `p1` - The position following `p0`.
    /// * `p2` - The position following `p1`.
    /// * `color` - The flat color of the triangle.
    pub fn from_positions(p0: &Vec3, p1: &Vec3, p2: &Vec3, color: Color) -> Self {
        let v = |p: &Vec3| Vertex::from_pos(p.x, p.y, p.z, 0f32, 0f32);

        Self::new(v(p0), v(p1), v(p2), color)
    }

    /// Returns the triangle with the texture coordinates of the three vertices replaced.
    pub fn with_tex_coords(mut self, uv0: Vec2, uv1: Vec2, uv2: Vec2) -> Self {
        for (vertex, uv) in self.vertices.iter_mut().zip([uv0, uv1, uv2]) {
            vertex.tex_coords = HomogeneousVector::tex_coord(uv.x, uv.y);
        }

        self
    }

    /// Returns the vertex with the given index. The index is taken modulo 3.
    #[inline]
    pub fn vertex(&self, index: usize) -> &Vertex {
        &self.vertices[index % 3]
    }

    /// Moves all three vertices by the given offset.
    pub fn translate(&mut self, offset: &Vec3) {
        for v in self.vertices.iter_mut() {
            let p = v.pos.xyz() + offset;
            v.pos = HomogeneousVector::new(p.x, p.y, p.z, v.pos.w());
        }
    }

    /// Rotates all three vertices around the x-axis through the origin.
    ///
    /// # Arguments
    /// * `angle` - The rotation angle in radians.
    pub fn rotate_x(&mut self, angle: f32) {
        self.rotate_with(|p| rotate_x_vec3(p, angle));
    }

    /// Rotates all three vertices around the y-axis through the origin.
    ///
    /// # Arguments
    /// * `angle` - The rotation angle in radians.
    pub fn rotate_y(&mut self, angle: f32) {
        self.rotate_with(|p| rotate_y_vec3(p, angle));
    }

    fn rotate_with<F: Fn(&Vec3) -> Vec3>(&mut self, f: F) {
        for v in self.vertices.iter_mut() {
            let p = f(&v.pos.xyz());
            v.pos = HomogeneousVector::new(p.x, p.y, p.z, v.pos.w());
        }
    }

    /// Returns a copy of the triangle with all positions transformed by the given matrix, e.g.,
    /// the model-view-projection matrix to get the triangle in clip space.
    pub fn transformed(&self, t: &Mat4) -> Self {
        let [a, b, c] = self.vertices;

        Self::new(
            a.with_pos(transform_pos(t, &a.pos)),
            b.with_pos(transform_pos(t, &b.pos)),
            c.with_pos(transform_pos(t, &c.pos)),
            self.color,
        )
    }
}

/// An ordered list of triangles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mesh {
    triangles: Vec<Triangle>,
}

impl Mesh {
    /// Creates a new empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the given triangle to the mesh.
    #[inline]
    pub fn add_triangle(&mut self, t: Triangle) {
        self.triangles.push(t);
    }

    /// Returns the triangles of the mesh in the order they have been added.
    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Rotates every triangle of the mesh in local space, first around x then around y.
    ///
    /// # Arguments
    /// * `angle_x` - The rotation angle around the x-axis in radians.
    /// * `angle_y` - The rotation angle around the y-axis in radians.
    pub fn rotate(&mut self, angle_x: f32, angle_y: f32) {
        for t in self.triangles.iter_mut() {
            t.rotate_x(angle_x);
            t.rotate_y(angle_y);
        }
    }

    /// Writes the mesh to the given writer.
    ///
    /// # Arguments
    /// * `writer` - The writer to write the mesh to.
    pub fn write<W: std::io::Write>(&self, writer: W) -> Result<()> {
        bincode::serialize_into(writer, self).map_err(|e| Error::SerializationError(Box::new(e)))
    }

    /// Reads the mesh from the given reader.
    ///
    /// # Arguments
    /// * `reader` - The reader to read the mesh from.
    pub fn read_from<R: std::io::Read>(reader: R) -> Result<Self> {
        bincode::deserialize_from(reader).map_err(|e| Error::DeserializationError(Box::new(e)))
    }
}

impl FromIterator<Triangle> for Mesh {
    fn from_iter<I: IntoIterator<Item = Triangle>>(iter: I) -> Self {
        Self {
            triangles: iter.into_iter().collect(),
        }
    }
}

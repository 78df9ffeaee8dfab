use std::ops::{Add, Div, Mul, Sub};

use nalgebra_glm::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// The four component slots of a homogeneous vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
    W,
}

impl Axis {
    /// Returns the component index of the axis, i.e., 0 for x up to 3 for w.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
            Axis::W => 3,
        }
    }
}

/// A 4-component vector (x, y, z, w) used for clip-space positions and texture coordinates.
///
/// The fourth component is the homogeneous weight. After the perspective divide the renderer
/// stores `1/w` of the clip-space position in it, which is what perspective-correct texturing
/// interpolates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HomogeneousVector(Vec4);

impl HomogeneousVector {
    /// Creates a new vector from its four components.
    #[inline]
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self(Vec4::new(x, y, z, w))
    }

    /// Creates a point with w = 1.
    #[inline]
    pub fn point(x: f32, y: f32, z: f32) -> Self {
        Self::new(x, y, z, 1f32)
    }

    /// Creates a texture coordinate. The last two components are unused and set to zero.
    #[inline]
    pub fn tex_coord(u: f32, v: f32) -> Self {
        Self::new(u, v, 0f32, 0f32)
    }

    /// Returns the vector with all four components set to zero.
    #[inline]
    pub fn zero() -> Self {
        Self(Vec4::zeros())
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.0.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.0.y
    }

    #[inline]
    pub fn z(&self) -> f32 {
        self.0.z
    }

    #[inline]
    pub fn w(&self) -> f32 {
        self.0.w
    }

    /// Returns the component for the given axis.
    ///
    /// # Arguments
    /// * `axis` - The axis of the component to return.
    #[inline]
    pub fn get(&self, axis: Axis) -> f32 {
        self.0[axis.index()]
    }

    /// Sets the component for the given axis.
    ///
    /// # Arguments
    /// * `axis` - The axis of the component to overwrite.
    /// * `value` - The new component value.
    #[inline]
    pub fn set(&mut self, axis: Axis, value: f32) {
        self.0[axis.index()] = value;
    }

    /// Returns a copy of the vector with the component for the given axis replaced.
    #[inline]
    pub fn with(mut self, axis: Axis, value: f32) -> Self {
        self.set(axis, value);
        self
    }

    /// Returns the component-wise absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Returns the x, y and z part of the vector.
    #[inline]
    pub fn xyz(&self) -> Vec3 {
        self.0.xyz()
    }

    /// Returns the underlying glm vector.
    #[inline]
    pub fn as_vec4(&self) -> &Vec4 {
        &self.0
    }

    /// Linearly interpolates between self and dest, i.e., returns `self + (dest - self) * t`.
    ///
    /// # Arguments
    /// * `dest` - The vector reached for `t = 1`.
    /// * `t` - The interpolation factor.
    #[inline]
    pub fn lerp(&self, dest: &Self, t: f32) -> Self {
        (*dest - *self) * t + *self
    }
}

impl Default for HomogeneousVector {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<Vec4> for HomogeneousVector {
    #[inline]
    fn from(v: Vec4) -> Self {
        Self(v)
    }
}

impl From<HomogeneousVector> for Vec4 {
    #[inline]
    fn from(v: HomogeneousVector) -> Self {
        v.0
    }
}

impl Add<Self> for HomogeneousVector {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Add<f32> for HomogeneousVector {
    type Output = Self;

    #[inline]
    fn add(self, rhs: f32) -> Self::Output {
        Self(self.0.add_scalar(rhs))
    }
}

impl Sub<Self> for HomogeneousVector {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Sub<f32> for HomogeneousVector {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: f32) -> Self::Output {
        Self(self.0.add_scalar(-rhs))
    }
}

impl Mul<Self> for HomogeneousVector {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0.component_mul(&rhs.0))
    }
}

impl Mul<f32> for HomogeneousVector {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Div<Self> for HomogeneousVector {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self::Output {
        Self(self.0.component_div(&rhs.0))
    }
}

impl Div<f32> for HomogeneousVector {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f32) -> Self::Output {
        Self(self.0 / rhs)
    }
}

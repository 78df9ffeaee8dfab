use serde::{Deserialize, Serialize};

use super::{Axis, HomogeneousVector};

/// The side of the clip volume a clip plane bounds along its axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaneSide {
    /// The plane `component = w`.
    Positive,

    /// The plane `component = -w`.
    Negative,
}

impl PlaneSide {
    /// Returns the sign of the plane side as factor, i.e., 1 or -1.
    #[inline]
    pub fn factor(self) -> f32 {
        match self {
            PlaneSide::Positive => 1f32,
            PlaneSide::Negative => -1f32,
        }
    }
}

/// One of the six planes bounding the canonical clip volume `-w <= x, y, z <= w`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipPlane {
    pub axis: Axis,
    pub side: PlaneSide,
}

impl ClipPlane {
    pub const NEAR: ClipPlane = ClipPlane::new(Axis::Z, PlaneSide::Negative);
    pub const FAR: ClipPlane = ClipPlane::new(Axis::Z, PlaneSide::Positive);
    pub const RIGHT: ClipPlane = ClipPlane::new(Axis::X, PlaneSide::Positive);
    pub const LEFT: ClipPlane = ClipPlane::new(Axis::X, PlaneSide::Negative);
    pub const TOP: ClipPlane = ClipPlane::new(Axis::Y, PlaneSide::Positive);
    pub const BOTTOM: ClipPlane = ClipPlane::new(Axis::Y, PlaneSide::Negative);

    /// Creates a new clip plane.
    ///
    /// # Arguments
    /// * `axis` - The axis the plane is orthogonal to. Must be one of x, y or z.
    /// * `side` - The side of the clip volume that is bounded by the plane.
    pub const fn new(axis: Axis, side: PlaneSide) -> Self {
        Self { axis, side }
    }

    /// Returns the signed distance of the homogeneous point to the plane, i.e., the distance
    /// that is positive outside of the clip volume and negative or zero inside.
    ///
    /// # Arguments
    /// * `p` - The point in clip space.
    #[inline]
    pub fn signed_distance(&self, p: &HomogeneousVector) -> f32 {
        self.side.factor() * p.get(self.axis) - p.w()
    }

    /// Returns true if the given point lies strictly outside of the half-space of the plane.
    /// Points exactly on the plane count as inside.
    ///
    /// # Arguments
    /// * `p` - The point in clip space.
    #[inline]
    pub fn is_outside(&self, p: &HomogeneousVector) -> bool {
        self.signed_distance(p) > 0f32
    }

    /// Computes the interpolation factor `t` at which the segment from `src` to `dst` crosses the
    /// plane, i.e., `src.lerp(dst, t)` lies on the plane.
    ///
    /// The factor is the ratio of the signed distances `d_src / (d_src - d_dst)`. It is within
    /// [0, 1] as long as `src` and `dst` are on different sides of the plane.
    ///
    /// # Arguments
    /// * `src` - The point to interpolate from, usually the one outside of the plane.
    /// * `dst` - The point to interpolate to, usually the one inside of the plane.
    #[inline]
    pub fn find_lerp_factor(&self, src: &HomogeneousVector, dst: &HomogeneousVector) -> f32 {
        let d_src = self.signed_distance(src);
        let d_dst = self.signed_distance(dst);

        d_src / (d_src - d_dst)
    }
}

/// The frustum planes in the order they are clipped against.
pub const FRUSTUM_PLANES: [ClipPlane; 6] = [
    ClipPlane::NEAR,
    ClipPlane::FAR,
    ClipPlane::RIGHT,
    ClipPlane::LEFT,
    ClipPlane::TOP,
    ClipPlane::BOTTOM,
];

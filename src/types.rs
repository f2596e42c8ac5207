pub use cgmath::{Array, ElementWise, EuclideanSpace, InnerSpace, MetricSpace, VectorSpace, Zero};
pub use cgmath::{Point2, Point3, Quaternion, Rotation, Vector2, Vector3};

pub use std::f64::consts::PI;

use std::ops::Deref;

pub type Float = f64;
pub type Vector2f = Vector2<Float>;
pub type Vector3f = Vector3<Float>;
pub type Point2f = Point2<Float>;
pub type Point3f = Point3<Float>;

/// A direction of unit length.
///
/// Every constructor normalizes, so a `Unit3f` handed out by this crate is always unit length
/// (up to rounding).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Unit3f(Vector3f);

impl Unit3f {
    pub fn new(v: Vector3f) -> Unit3f {
        Unit3f(v.normalize())
    }

    /// Normalizes `v`, or returns `None` for a zero or non-finite vector.
    pub fn try_new(v: Vector3f) -> Option<Unit3f> {
        let m = v.magnitude();
        iff!(m > 0.0 && m.is_finite(), Some(Unit3f(v / m)), None)
    }

    pub fn unit_z() -> Unit3f {
        Unit3f(Vector3f::unit_z())
    }

    pub fn get(self) -> Vector3f {
        self.0
    }

    pub fn to_array(self) -> [Float; 3] {
        self.0.into()
    }
}

impl Deref for Unit3f {
    type Target = Vector3f;
    fn deref(&self) -> &Vector3f {
        &self.0
    }
}

impl std::ops::Neg for Unit3f {
    type Output = Unit3f;
    fn neg(self) -> Unit3f {
        Unit3f(-self.0)
    }
}

/// Orthonormal frame attached to a plane with normal `w`.
///
/// `from_normal`: `u` and `v` are the images of +X and +Y under the shortest-arc rotation
/// taking +Z onto `w`. An antiparallel normal (-Z) is reached by a half turn about +X, so `u`
/// stays +X and `v` flips. The rotation axis is undefined at -Z, so normals close to -Z but not
/// on it can give a frame turned by up to a half turn about `w`. Use `with_up` for planes that
/// face down.
#[derive(Copy, Clone, Debug)]
pub struct Frame {
    pub u: Vector3f,
    pub v: Vector3f,
    pub w: Unit3f,
}

impl Frame {
    pub fn from_normal(normal: Unit3f) -> Frame {
        let rot = Quaternion::from_arc(Vector3f::unit_z(), *normal, Some(Vector3f::unit_x()));
        Frame {
            u: rot.rotate_vector(Vector3f::unit_x()),
            v: rot.rotate_vector(Vector3f::unit_y()),
            w: normal,
        }
    }

    /// Frame whose `v` is `up` projected into the plane, and `u = v x w`. Varies smoothly with
    /// `normal` as long as it stays away from `up`. `None` when `up` is parallel to `normal`.
    pub fn with_up(normal: Unit3f, up: Vector3f) -> Option<Frame> {
        let v = Unit3f::try_new(up - *normal * up.dot(*normal))?;
        Some(Frame { u: v.cross(*normal), v: *v, w: normal })
    }

    /// Global point from local (x, y) offsets around `origin`.
    pub fn to_global(&self, origin: Point3f, x: Float, y: Float) -> Point3f {
        origin + self.u * x + self.v * y
    }

    /// Local (x, y) of `p` relative to `origin`, dropping the normal component.
    pub fn to_local(&self, origin: Point3f, p: Point3f) -> Point2f {
        let d = p - origin;
        Point2f::new(d.dot(self.u), d.dot(self.v))
    }
}

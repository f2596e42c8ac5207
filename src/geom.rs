use crate::types::*;

/// One ray's trajectory: the positions where it met a surface, in order, plus where it started
/// heading and where it is heading now.
///
/// Paths handed out by a light source have no steps yet; the first step is the point where the
/// ray is reflected.
#[derive(Clone, Debug, PartialEq)]
pub struct LightPath {
    pub points: Vec<Point3f>,
    pub init_direction: Unit3f,
    pub current_direction: Unit3f,
}

impl LightPath {
    pub fn new(direction: Unit3f) -> Self {
        LightPath { points: Vec::new(), init_direction: direction, current_direction: direction }
    }

    pub fn add_step(&mut self, point: Point3f, direction: Unit3f) {
        self.points.push(point);
        self.current_direction = direction;
    }

    pub fn last_point(&self) -> Option<Point3f> {
        self.points.last().copied()
    }
}

/// Specular reflection of `v` about the surface normal `n`: r = v - 2 (n . v) n.
pub fn reflect(v: Unit3f, n: Unit3f) -> Unit3f {
    Unit3f::new(*v - *n * (n.dot(*v) * 2.0))
}

/// Reflects every incoming direction off a single surface normal.
///
/// This is the batch form used by the tracers: one normal, one column of directions.
pub fn calc_reflected_ray(normal: Unit3f, incoming: &[Unit3f]) -> Vec<Unit3f> {
    let n = *normal;
    incoming.iter().map(|v| Unit3f::new(**v - n * (n.dot(**v) * 2.0))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn check_reflection(n: Vector3f, v: Vector3f) {
        let (n, v) = (Unit3f::new(n), Unit3f::new(v));
        let r = reflect(v, n);
        assert_abs_diff_eq!(r.magnitude(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(n.dot(*r), -n.dot(*v), epsilon = 1e-9);
    }

    #[test]
    fn reflection_law_holds_for_oblique_and_aligned_rays() {
        let normals = [
            Vector3f::new(0.0, 0.0, 1.0),
            Vector3f::new(0.2, -0.4, 0.9),
            Vector3f::new(-1.0, 1.0, 0.0),
        ];
        for n in normals.iter() {
            check_reflection(*n, Vector3f::new(0.3, 0.1, -1.0));
            check_reflection(*n, Vector3f::new(1.0, 2.0, 3.0));
            check_reflection(*n, *n);
            check_reflection(*n, -*n);
        }
    }

    #[test]
    fn normal_incidence_returns_along_the_same_line() {
        let r = reflect(-Unit3f::unit_z(), Unit3f::unit_z());
        assert_eq!(r, Unit3f::unit_z());
    }

    #[test]
    fn batch_matches_single_reflection() {
        let n = Unit3f::new(Vector3f::new(0.1, 0.2, 1.0));
        let incoming: Vec<Unit3f> = vec![
            Unit3f::new(Vector3f::new(0.0, 0.0, -1.0)),
            Unit3f::new(Vector3f::new(0.5, -0.5, -1.0)),
        ];
        let batch = calc_reflected_ray(n, &incoming);
        for (v, r) in incoming.iter().zip(batch) {
            assert_abs_diff_eq!(*r, *reflect(*v, n), epsilon = 1e-15);
        }
    }

    #[test]
    fn add_step_updates_current_direction_only() {
        let mut lp = LightPath::new(-Unit3f::unit_z());
        lp.add_step(Point3f::new(1.0, 2.0, 0.0), Unit3f::unit_z());
        assert_eq!(lp.init_direction, -Unit3f::unit_z());
        assert_eq!(lp.current_direction, Unit3f::unit_z());
        assert_eq!(lp.last_point(), Some(Point3f::new(1.0, 2.0, 0.0)));
    }
}

use crate::ensemble::*;
use crate::trace::*;
use crate::types::*;

/// Where each path's current ray meets the plane through `center` with normal `normal`.
///
/// The whole ensemble is processed column by column. A path has no intersection (`None`) when
/// its direction is within `epsilon` of parallel to the plane, when it has no steps yet, or when
/// the result is not finite. The ray is treated as a full line, so intersections behind the
/// last position are kept.
pub fn intersections(
    ensemble: &LightPathEnsemble, center: Point3f, normal: Unit3f, epsilon: Float,
) -> Vec<Option<Point3f>> {
    let n = *normal;
    let denominators = ensemble.current_directions().iter().map(|v| n.dot(**v));
    ensemble
        .last_points()
        .into_iter()
        .zip(ensemble.current_directions())
        .zip(denominators)
        .map(|((p, v), d)| {
            let p = p?;
            if d.abs() <= epsilon {
                return None;
            }
            let t = -n.dot(p - center) / d;
            let hit = p + **v * t;
            iff!(hit.x.is_finite() && hit.y.is_finite() && hit.z.is_finite(), Some(hit), None)
        })
        .collect()
}

/// Intersections of a trace with a plane, in the plane's own 2D frame.
///
/// Coordinates are measured from `plane_center` along the `u` and `v` axes of
/// `Frame::from_normal`: for a plane facing +Z that is plain global (x, y). Rays that miss the
/// plane are left out, so the result may be shorter than the trace.
pub fn plane_intersect(
    ray_trace: &RayTrace, plane_center: Point3f, plane_normal: Vector3f, epsilon: Float,
) -> Vec<Point2f> {
    let normal = match Unit3f::try_new(plane_normal) {
        Some(n) => n,
        None => return Vec::new(),
    };
    plane_intersect_in_frame(ray_trace, plane_center, &Frame::from_normal(normal), epsilon)
}

/// `plane_intersect` with the plane and its 2D axes given by `frame`, e.g. from
/// `Frame::with_up` for a receiver facing down.
pub fn plane_intersect_in_frame(
    ray_trace: &RayTrace, plane_center: Point3f, frame: &Frame, epsilon: Float,
) -> Vec<Point2f> {
    intersections(&ray_trace.light_paths_ensemble, plane_center, frame.w, epsilon)
        .into_iter()
        .filter_map(|hit| hit.map(|p| frame.to_local(plane_center, p)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::*;
    use approx::assert_abs_diff_eq;

    fn trace_of(rays: &[(Point3f, Vector3f)]) -> RayTrace<'static> {
        let mut trace = RayTrace::empty();
        let paths = rays
            .iter()
            .map(|(p, v)| {
                let mut lp = LightPath::new(Unit3f::new(*v));
                lp.add_step(*p, Unit3f::new(*v));
                lp
            })
            .collect();
        trace.add_many_light_paths(paths).unwrap();
        trace
    }

    #[test]
    fn vertical_ray_lands_exactly_below_its_origin() {
        let trace = trace_of(&[(Point3f::new(2.0, 3.0, 10.0), Vector3f::new(0.0, 0.0, -1.0))]);
        let pts = plane_intersect(&trace, Point3f::new(0.0, 0.0, 0.0), Vector3f::unit_z(), 1e-6);
        assert_eq!(pts, vec![Point2f::new(2.0, 3.0)]);
    }

    #[test]
    fn parallel_rays_are_excluded() {
        let trace = trace_of(&[
            (Point3f::new(2.0, 3.0, 10.0), Vector3f::new(0.0, 0.0, -1.0)),
            (Point3f::new(0.0, 0.0, 1.0), Vector3f::new(1.0, 0.0, 0.0)),
            (Point3f::new(1.0, 1.0, 1.0), Vector3f::new(0.0, 0.0, 1.0)),
        ]);
        let pts = plane_intersect(&trace, Point3f::new(0.0, 0.0, 0.0), Vector3f::unit_z(), 1e-6);
        assert_eq!(pts.len(), trace.ray_count() - 1);
    }

    #[test]
    fn coordinates_are_relative_to_the_plane_center() {
        let trace = trace_of(&[(Point3f::new(2.0, 3.0, 10.0), Vector3f::new(0.0, 0.0, -1.0))]);
        let pts = plane_intersect(&trace, Point3f::new(1.0, 1.0, -4.0), Vector3f::unit_z(), 1e-6);
        assert_eq!(pts, vec![Point2f::new(1.0, 2.0)]);
    }

    #[test]
    fn oblique_rays_meet_a_tilted_plane_in_its_frame() {
        let normal = Vector3f::new(1.0, 0.0, 1.0);
        let center = Point3f::new(0.0, 0.0, 0.0);
        let trace = trace_of(&[(Point3f::new(1.0, 2.0, 5.0), Vector3f::new(0.2, -0.1, -1.0))]);
        let hit = intersections(&trace.light_paths_ensemble, center, Unit3f::new(normal), 1e-6)[0]
            .unwrap();
        assert_abs_diff_eq!((hit - center).dot(normal), 0.0, epsilon = 1e-12);

        let local = plane_intersect(&trace, center, normal, 1e-6)[0];
        let frame = Frame::from_normal(Unit3f::new(normal));
        assert_abs_diff_eq!(frame.to_global(center, local.x, local.y), hit, epsilon = 1e-12);
    }

    #[test]
    fn downward_receiver_keeps_its_axes_under_a_small_tilt() {
        let trace = trace_of(&[(Point3f::new(2.0, 3.0, 0.0), Vector3f::new(0.0, 0.0, 1.0))]);
        let center = Point3f::new(0.0, 0.0, 10.0);
        let flat = Frame::with_up(-Unit3f::unit_z(), Vector3f::unit_y()).unwrap();
        let tilted =
            Frame::with_up(Unit3f::new(Vector3f::new(1e-7, 0.0, -1.0)), Vector3f::unit_y())
                .unwrap();
        let a = plane_intersect_in_frame(&trace, center, &flat, 1e-6)[0];
        let b = plane_intersect_in_frame(&trace, center, &tilted, 1e-6)[0];
        assert_abs_diff_eq!(a, Point2f::new(-2.0, 3.0), epsilon = 1e-12);
        assert_abs_diff_eq!(a, b, epsilon = 1e-5);
    }

    #[test]
    fn paths_without_steps_have_no_intersection() {
        let e = LightPathEnsemble::from_paths(vec![LightPath::new(-Unit3f::unit_z())]).unwrap();
        let hits = intersections(&e, Point3f::new(0.0, 0.0, 0.0), Unit3f::unit_z(), 1e-6);
        assert_eq!(hits, vec![None]);
    }
}

use crate::prims::*;
use crate::types::*;

/// A flat rectangular mirror facet.
#[derive(Copy, Clone, Debug)]
pub struct FlatMirror {
    pub center: Point3f,
    pub width: Float,
    pub height: Float,
    frame: Frame,
}

impl FlatMirror {
    /// `width` runs along the facet's local x axis and `height` along its local y axis, as
    /// defined by `Frame::from_normal`.
    pub fn new(center: Point3f, normal: Vector3f, width: Float, height: Float) -> FlatMirror {
        FlatMirror { center, width, height, frame: Frame::from_normal(Unit3f::new(normal)) }
    }

    pub fn normal(&self) -> Unit3f {
        self.frame.w
    }
}

impl RayTraceable for FlatMirror {
    fn survey_of_points(&self, resolution: Resolution) -> Vec<(Point3f, Unit3f)> {
        let (cols, rows) = resolution.grid(self.width, self.height);
        let (dx, dy) = (self.width / cols as Float, self.height / rows as Float);
        let mut out = Vec::with_capacity(cols * rows);
        for j in 0..rows {
            let y = (j as Float + 0.5) * dy - self.height / 2.0;
            for i in 0..cols {
                let x = (i as Float + 0.5) * dx - self.width / 2.0;
                out.push((self.frame.to_global(self.center, x, y), self.frame.w));
            }
        }
        out
    }

    fn most_basic_ray_tracable_objects(&self) -> Vec<&dyn RayTraceable> {
        vec![self as &dyn RayTraceable]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn single_sample_sits_at_the_center() {
        let m = FlatMirror::new(Point3f::new(1.0, 2.0, 3.0), Vector3f::unit_z(), 2.0, 2.0);
        let pts = m.survey_of_points(Resolution::PixelX(1));
        assert_eq!(pts, vec![(Point3f::new(1.0, 2.0, 3.0), Unit3f::unit_z())]);
    }

    #[test]
    fn samples_cover_cell_centres_in_the_facet_plane() {
        let normal = Vector3f::new(0.0, -1.0, 1.0);
        let m = FlatMirror::new(Point3f::new(0.0, 0.0, 4.0), normal, 2.0, 1.0);
        let pts = m.survey_of_points(Resolution::PixelX(4));
        assert_eq!(pts.len(), 8);
        for (p, n) in pts.iter() {
            assert_abs_diff_eq!((*p - m.center).dot(**n), 0.0, epsilon = 1e-12);
            assert_eq!(*n, m.normal());
        }
        let centroid = pts.iter().fold(Vector3f::zero(), |acc, (p, _)| acc + p.to_vec()) / 8.0;
        assert_abs_diff_eq!(centroid, m.center.to_vec(), epsilon = 1e-12);
    }

    #[test]
    fn a_facet_is_its_own_basic_object() {
        let m = FlatMirror::new(Point3f::new(0.0, 0.0, 0.0), Vector3f::unit_z(), 1.0, 1.0);
        assert_eq!(m.most_basic_ray_tracable_objects().len(), 1);
    }
}

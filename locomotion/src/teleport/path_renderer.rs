use cgmath::Vector3;
use engine::{
    AssetRef,
    scene::{SplineComponent, SplineMeshComponent},
    teleport_log,
};

/// Draws the teleport path as a spline with one mesh per segment.
///
/// Segment meshes live in a pool that only ever grows: a frame reuses what is
/// already there and allocates only the shortfall. Segments past the end of
/// the current path are hidden, not freed.
pub struct TeleportPathRenderer {
    spline: SplineComponent,
    mesh_pool: Vec<SplineMeshComponent>,
    arc_mesh: Option<AssetRef>,
    arc_material: Option<AssetRef>,
}

impl TeleportPathRenderer {
    pub fn new(arc_mesh: Option<AssetRef>, arc_material: Option<AssetRef>) -> Self {
        Self {
            spline: SplineComponent::new(),
            mesh_pool: Vec::new(),
            arc_mesh,
            arc_material,
        }
    }

    pub fn spline(&self) -> &SplineComponent {
        &self.spline
    }

    pub fn segments(&self) -> &[SplineMeshComponent] {
        &self.mesh_pool
    }

    pub fn pool_size(&self) -> usize {
        self.mesh_pool.len()
    }

    pub fn visible_segment_count(&self) -> usize {
        self.mesh_pool.iter().filter(|mesh| mesh.is_visible()).count()
    }

    pub fn draw_teleport_path(&mut self, points: &[Vector3<f32>]) {
        self.update_spline(points);

        let (Some(mesh), Some(material)) = (self.arc_mesh.clone(), self.arc_material.clone()) else {
            teleport_log!(DEBUG, "no arc mesh or material, drawing spline only");
            self.hide_segments();
            return;
        };

        let segment_count = points.len().saturating_sub(1);
        while self.mesh_pool.len() < segment_count {
            teleport_log!(TRACE, "growing path mesh pool to {}", self.mesh_pool.len() + 1);
            self.mesh_pool
                .push(SplineMeshComponent::new(mesh.clone(), material.clone()));
        }

        for (index, segment) in self.mesh_pool.iter_mut().enumerate() {
            if index >= segment_count {
                segment.set_visibility(false);
                continue;
            }

            let start = self.spline.get_location_and_tangent_at_spline_point(index);
            let end = self.spline.get_location_and_tangent_at_spline_point(index + 1);
            match (start, end) {
                (Some(start), Some(end)) => {
                    segment.set_start_and_end(start, end);
                    segment.set_visibility(true);
                }
                _ => segment.set_visibility(false),
            }
        }
    }

    pub fn hide_teleport_path(&mut self) {
        self.spline.clear_spline_points();
        self.hide_segments();
    }

    fn update_spline(&mut self, points: &[Vector3<f32>]) {
        self.spline.clear_spline_points();
        for &point in points {
            self.spline.add_spline_point(point);
        }
        self.spline.update_spline();
    }

    fn hide_segments(&mut self) {
        for segment in &mut self.mesh_pool {
            segment.set_visibility(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::vec3;

    fn renderer() -> TeleportPathRenderer {
        TeleportPathRenderer::new(
            Some(AssetRef::new("SM_TeleportArc")),
            Some(AssetRef::new("M_TeleportArc")),
        )
    }

    fn path(len: usize) -> Vec<Vector3<f32>> {
        (0..len).map(|i| vec3(0.0, 1.0, -(i as f32))).collect()
    }

    #[test]
    fn test_segments_follow_spline_points() {
        let mut renderer = renderer();

        renderer.draw_teleport_path(&path(4));

        assert_eq!(renderer.spline().get_number_of_spline_points(), 4);
        assert_eq!(renderer.pool_size(), 3);
        assert_eq!(renderer.visible_segment_count(), 3);
        let second = &renderer.segments()[1];
        assert_eq!(second.start().location, vec3(0.0, 1.0, -1.0));
        assert_eq!(second.end().location, vec3(0.0, 1.0, -2.0));
    }

    #[test]
    fn test_pool_reuses_before_growing() {
        let mut renderer = renderer();
        let mut largest_path = 0;

        for len in [6, 3, 9, 2, 9, 5] {
            renderer.draw_teleport_path(&path(len));
            largest_path = largest_path.max(len);

            assert_eq!(renderer.pool_size(), largest_path - 1);
            assert_eq!(renderer.visible_segment_count(), len - 1);
        }
    }

    #[test]
    fn test_hiding_keeps_pool() {
        let mut renderer = renderer();
        renderer.draw_teleport_path(&path(5));

        renderer.hide_teleport_path();

        assert_eq!(renderer.spline().get_number_of_spline_points(), 0);
        assert_eq!(renderer.pool_size(), 4);
        assert_eq!(renderer.visible_segment_count(), 0);
    }

    #[test]
    fn test_missing_mesh_draws_spline_only() {
        let mut renderer = TeleportPathRenderer::new(None, Some(AssetRef::new("M_TeleportArc")));

        renderer.draw_teleport_path(&path(5));

        assert_eq!(renderer.spline().get_number_of_spline_points(), 5);
        assert_eq!(renderer.pool_size(), 0);
    }

    #[test]
    fn test_single_point_path_has_no_segments() {
        let mut renderer = renderer();

        renderer.draw_teleport_path(&path(1));

        assert_eq!(renderer.pool_size(), 0);
    }
}

use cgmath::Vector3;

use crate::assets::AssetRef;

use super::{spline::SplinePoint, SceneObject};

/// A mesh deformed along one spline segment, from `start` to `end`.
#[derive(Clone, Debug)]
pub struct SplineMeshComponent {
    object: SceneObject,
    start: SplinePoint,
    end: SplinePoint,
}

impl SplineMeshComponent {
    pub fn new(mesh: AssetRef, material: AssetRef) -> Self {
        let origin = SplinePoint {
            location: Vector3::new(0.0, 0.0, 0.0),
            tangent: Vector3::new(0.0, 0.0, 0.0),
        };
        Self {
            object: SceneObject::new(Some(mesh), Some(material)),
            start: origin,
            end: origin,
        }
    }

    pub fn set_start_and_end(&mut self, start: SplinePoint, end: SplinePoint) {
        self.start = start;
        self.end = end;
        self.object.set_world_location(start.location);
    }

    pub fn start(&self) -> SplinePoint {
        self.start
    }

    pub fn end(&self) -> SplinePoint {
        self.end
    }

    pub fn set_visibility(&mut self, visible: bool) {
        self.object.set_visibility(visible);
    }

    pub fn is_visible(&self) -> bool {
        self.object.is_visible()
    }

    pub fn scene_object(&self) -> &SceneObject {
        &self.object
    }
}

use cgmath::{Matrix4, SquareMatrix, Vector3, Vector4};

use crate::assets::AssetRef;

/// A renderable scene component as far as gameplay code is concerned: an
/// optional mesh and material, a world transform and a visibility flag.
#[derive(Clone, Debug)]
pub struct SceneObject {
    pub mesh: Option<AssetRef>,
    pub material: Option<AssetRef>,
    transform: Matrix4<f32>,
    visible: bool,
}

impl SceneObject {
    pub fn new(mesh: Option<AssetRef>, material: Option<AssetRef>) -> SceneObject {
        SceneObject {
            mesh,
            material,
            transform: Matrix4::identity(),
            visible: true,
        }
    }

    pub fn get_world_position(&self) -> Vector3<f32> {
        let column: Vector4<f32> = self.transform.w;
        Vector3::new(column.x, column.y, column.z)
    }

    /// Moves the object, keeping rotation and scale.
    pub fn set_world_location(&mut self, location: Vector3<f32>) {
        self.transform.w = location.extend(1.0);
    }

    pub fn set_transform(&mut self, transform: Matrix4<f32>) {
        self.transform = transform;
    }

    pub fn get_transform(&self) -> Matrix4<f32> {
        self.transform
    }

    pub fn set_visibility(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::vec3;

    #[test]
    fn test_set_world_location_keeps_scale() {
        let mut object = SceneObject::new(None, None);
        object.set_transform(Matrix4::from_scale(2.0));
        object.set_world_location(vec3(1.0, 2.0, 3.0));

        assert_eq!(object.get_world_position(), vec3(1.0, 2.0, 3.0));
        assert_eq!(object.get_transform().x.x, 2.0);
    }
}

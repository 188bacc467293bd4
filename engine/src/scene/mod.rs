pub mod scene_object;
pub use scene_object::SceneObject;

pub mod spline;
pub use spline::SplineComponent;

pub mod spline_mesh;
pub use spline_mesh::SplineMeshComponent;

use cgmath::Vector3;
use rapier3d::prelude::*;

pub fn npoint_to_cgvec(point: Point<Real>) -> Vector3<f32> {
    Vector3 {
        x: point.x,
        y: point.y,
        z: point.z,
    }
}

pub fn vec_to_npoint(vec: Vector3<f32>) -> Point<Real> {
    point![vec.x, vec.y, vec.z]
}

pub fn vec_to_nvec(vec: Vector3<f32>) -> Vector<Real> {
    vector![vec.x, vec.y, vec.z]
}

pub fn vec_to_isometry(vec: Vector3<f32>) -> Isometry<Real> {
    Isometry::translation(vec.x, vec.y, vec.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::vec3;

    #[test]
    fn test_conversions_round_trip_components() {
        let v = vec3(1.0, -2.0, 3.5);
        assert_eq!(npoint_to_cgvec(vec_to_npoint(v)), v);
        assert_eq!(vec_to_isometry(v).translation.vector, vec_to_nvec(v));
    }
}

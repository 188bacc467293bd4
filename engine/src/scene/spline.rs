use cgmath::{InnerSpace, Vector3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplinePoint {
    pub location: Vector3<f32>,
    pub tangent: Vector3<f32>,
}

/// World-space spline through a list of points.
///
/// Tangents are recomputed by `update_spline` (Catmull-Rom style: the
/// neighbour difference for interior points, the adjacent segment at the ends).
#[derive(Clone, Debug, Default)]
pub struct SplineComponent {
    points: Vec<SplinePoint>,
}

impl SplineComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_spline_points(&mut self) {
        self.points.clear();
    }

    pub fn add_spline_point(&mut self, location: Vector3<f32>) {
        self.points.push(SplinePoint {
            location,
            tangent: Vector3::new(0.0, 0.0, 0.0),
        });
    }

    pub fn update_spline(&mut self) {
        let count = self.points.len();
        if count < 2 {
            return;
        }

        let locations: Vec<Vector3<f32>> = self.points.iter().map(|p| p.location).collect();
        for (i, point) in self.points.iter_mut().enumerate() {
            point.tangent = if i == 0 {
                locations[1] - locations[0]
            } else if i == count - 1 {
                locations[count - 1] - locations[count - 2]
            } else {
                (locations[i + 1] - locations[i - 1]) * 0.5
            };
        }
    }

    pub fn get_number_of_spline_points(&self) -> usize {
        self.points.len()
    }

    pub fn get_location_and_tangent_at_spline_point(&self, index: usize) -> Option<SplinePoint> {
        self.points.get(index).copied()
    }

    /// Sum of chord lengths between consecutive points.
    pub fn get_spline_length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|pair| (pair[1].location - pair[0].location).magnitude())
            .sum()
    }
}

//! Navigation mesh used to validate teleport destinations.
//!
//! The mesh is a set of convex, planar polygon cells over shared vertices.
//! Projection snaps a raw collision point onto the nearest walkable cell
//! within an axis-aligned search extent.
use cgmath::{InnerSpace, Vector3, vec3};
use ordered_float::OrderedFloat;

use crate::error::{LocomotionError, Result};

/// Snapping of arbitrary points onto walkable space.
pub trait NavigationQuery {
    /// Nearest navigable point to `point` whose offset from it lies within
    /// `extent` on every axis.
    fn project_point(&self, point: Vector3<f32>, extent: Vector3<f32>) -> Option<Vector3<f32>>;
}

#[derive(Clone, Debug)]
pub struct NavCell {
    pub vertex_indices: Vec<u32>,
    pub center: Vector3<f32>,
    normal: Vector3<f32>,
}

#[derive(Clone, Debug, Default)]
pub struct NavMesh {
    vertices: Vec<Vector3<f32>>,
    cells: Vec<NavCell>,
}

impl NavMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a convex cell over the given vertices, wound either way.
    pub fn add_cell(&mut self, corners: &[Vector3<f32>]) -> Result<u32> {
        if corners.len() < 3 {
            return Err(LocomotionError::validation(
                "navmesh cell",
                format!("needs at least 3 vertices, got {}", corners.len()),
            ));
        }

        let normal = newell_normal(corners);
        if normal.magnitude2() <= f32::EPSILON {
            return Err(LocomotionError::validation("navmesh cell", "degenerate polygon"));
        }
        let normal = normal.normalize();
        if normal.y.abs() < 0.1 {
            return Err(LocomotionError::validation(
                "navmesh cell",
                "cell is too steep to walk on",
            ));
        }

        let first_index = self.vertices.len() as u32;
        self.vertices.extend_from_slice(corners);
        let vertex_indices = (first_index..first_index + corners.len() as u32).collect();
        let center = corners.iter().fold(vec3(0.0, 0.0, 0.0), |acc, v| acc + *v)
            / corners.len() as f32;

        self.cells.push(NavCell {
            vertex_indices,
            center,
            normal,
        });
        Ok((self.cells.len() - 1) as u32)
    }

    /// Axis-aligned rectangle at height `y`.
    pub fn add_rect(&mut self, min_x: f32, max_x: f32, min_z: f32, max_z: f32, y: f32) -> Result<u32> {
        if min_x >= max_x || min_z >= max_z {
            return Err(LocomotionError::validation(
                "navmesh rect",
                format!("empty rect x=[{min_x}, {max_x}] z=[{min_z}, {max_z}]"),
            ));
        }
        self.add_cell(&[
            vec3(min_x, y, min_z),
            vec3(max_x, y, min_z),
            vec3(max_x, y, max_z),
            vec3(min_x, y, max_z),
        ])
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cell(&self, index: u32) -> Option<&NavCell> {
        self.cells.get(index as usize)
    }

    /// Find the cell whose XZ footprint contains a world position
    pub fn cell_from_position(&self, pos: Vector3<f32>) -> Option<u32> {
        self.cells
            .iter()
            .position(|cell| self.point_in_cell(pos, cell))
            .map(|idx| idx as u32)
    }

    fn cell_vertices(&self, cell: &NavCell) -> Vec<Vector3<f32>> {
        cell.vertex_indices
            .iter()
            .filter_map(|&idx| self.vertices.get(idx as usize))
            .copied()
            .collect()
    }

    /// Point-in-polygon test in the XZ plane. Cells are convex, so the point is
    /// inside when it is on the same side of every edge.
    fn point_in_cell(&self, point: Vector3<f32>, cell: &NavCell) -> bool {
        let vertices = self.cell_vertices(cell);
        if vertices.len() < 3 {
            return false;
        }

        let mut sign = None;

        for i in 0..vertices.len() {
            let v1 = vertices[i];
            let v2 = vertices[(i + 1) % vertices.len()];

            let edge = Vector3::new(v2.x - v1.x, 0.0, v2.z - v1.z);
            let to_point = Vector3::new(point.x - v1.x, 0.0, point.z - v1.z);
            let cross = edge.x * to_point.z - edge.z * to_point.x;

            if cross.abs() < f32::EPSILON {
                continue; // On the edge
            }

            let current_sign = cross > 0.0;

            match sign {
                None => sign = Some(current_sign),
                Some(prev_sign) if prev_sign != current_sign => return false,
                _ => {}
            }
        }

        true
    }

    /// Closest point of the cell to `point`, measured in the XZ plane and
    /// lifted onto the cell's plane.
    fn closest_point_on_cell(&self, point: Vector3<f32>, cell: &NavCell) -> Vector3<f32> {
        let vertices = self.cell_vertices(cell);

        let (x, z) = if self.point_in_cell(point, cell) {
            (point.x, point.z)
        } else {
            let mut best = (vertices[0].x, vertices[0].z);
            let mut best_distance = f32::MAX;
            for i in 0..vertices.len() {
                let a = vertices[i];
                let b = vertices[(i + 1) % vertices.len()];
                let candidate = closest_point_on_segment_xz(point, a, b);
                let dx = candidate.0 - point.x;
                let dz = candidate.1 - point.z;
                let distance = dx * dx + dz * dz;
                if distance < best_distance {
                    best_distance = distance;
                    best = candidate;
                }
            }
            best
        };

        // Plane through the cell centre: n . (p - c) = 0, solved for y
        let n = cell.normal;
        let c = cell.center;
        let y = c.y - (n.x * (x - c.x) + n.z * (z - c.z)) / n.y;
        vec3(x, y, z)
    }
}

impl NavigationQuery for NavMesh {
    fn project_point(&self, point: Vector3<f32>, extent: Vector3<f32>) -> Option<Vector3<f32>> {
        self.cells
            .iter()
            .map(|cell| self.closest_point_on_cell(point, cell))
            .filter(|candidate| {
                let offset = *candidate - point;
                offset.x.abs() <= extent.x && offset.y.abs() <= extent.y && offset.z.abs() <= extent.z
            })
            .min_by_key(|candidate| OrderedFloat((*candidate - point).magnitude2()))
    }
}

fn newell_normal(corners: &[Vector3<f32>]) -> Vector3<f32> {
    let mut normal = vec3(0.0, 0.0, 0.0);
    for i in 0..corners.len() {
        let current = corners[i];
        let next = corners[(i + 1) % corners.len()];
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }
    normal
}

fn closest_point_on_segment_xz(point: Vector3<f32>, a: Vector3<f32>, b: Vector3<f32>) -> (f32, f32) {
    let (abx, abz) = (b.x - a.x, b.z - a.z);
    let length_sq = abx * abx + abz * abz;
    if length_sq <= f32::EPSILON {
        return (a.x, a.z);
    }
    let t = (((point.x - a.x) * abx + (point.z - a.z) * abz) / length_sq).clamp(0.0, 1.0);
    (a.x + abx * t, a.z + abz * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXTENT: Vector3<f32> = vec3(1.0, 1.0, 1.0);

    fn floor_and_ledge() -> NavMesh {
        let mut nav = NavMesh::new();
        nav.add_rect(-5.0, 5.0, -5.0, 5.0, 0.0).unwrap();
        nav.add_rect(-2.0, 2.0, -8.0, -6.0, 3.0).unwrap();
        nav
    }

    fn assert_near(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).magnitude() < 1e-4, "{a:?} != {b:?}");
    }

    #[test]
    fn test_projects_point_inside_cell_onto_plane() {
        let nav = floor_and_ledge();

        let projected = nav.project_point(vec3(1.0, 0.4, 2.0), EXTENT).unwrap();
        assert_near(projected, vec3(1.0, 0.0, 2.0));
        assert_eq!(nav.cell_from_position(vec3(1.0, 0.4, 2.0)), Some(0));
    }

    #[test]
    fn test_snaps_to_edge_within_extent() {
        let nav = floor_and_ledge();

        let projected = nav.project_point(vec3(5.5, 0.0, 0.0), EXTENT).unwrap();
        assert_near(projected, vec3(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_rejects_points_outside_extent() {
        let nav = floor_and_ledge();

        assert!(nav.project_point(vec3(7.0, 0.0, 0.0), EXTENT).is_none());
        assert!(nav.project_point(vec3(0.0, 1.5, 0.0), EXTENT).is_none());
    }

    #[test]
    fn test_picks_nearest_cell() {
        let nav = floor_and_ledge();

        // Above the ledge: the ledge is within extent, the floor is not
        let projected = nav.project_point(vec3(0.0, 3.2, -7.0), EXTENT).unwrap();
        assert_near(projected, vec3(0.0, 3.0, -7.0));
    }

    #[test]
    fn test_sloped_cell_height() {
        let mut nav = NavMesh::new();
        nav.add_cell(&[
            vec3(0.0, 0.0, 0.0),
            vec3(4.0, 2.0, 0.0),
            vec3(4.0, 2.0, -4.0),
            vec3(0.0, 0.0, -4.0),
        ])
        .unwrap();

        let projected = nav.project_point(vec3(2.0, 1.5, -2.0), EXTENT).unwrap();
        assert_near(projected, vec3(2.0, 1.0, -2.0));
    }

    #[test]
    fn test_rejects_bad_cells() {
        let mut nav = NavMesh::new();

        assert!(nav.add_cell(&[vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0)]).is_err());
        assert!(nav
            .add_cell(&[vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0), vec3(0.0, 1.0, 1.0)])
            .is_err());
        assert!(nav.add_rect(1.0, 1.0, 0.0, 2.0, 0.0).is_err());
        assert_eq!(nav.cell_count(), 0);
    }
}

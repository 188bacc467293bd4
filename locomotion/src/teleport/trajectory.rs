use cgmath::{InnerSpace, Vector3};

use crate::physics::{
    ActorId, ActorTags, PredictProjectilePathParams, WorldQuery, predict_projectile_path,
};

use super::TeleportConfig;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectoryHit {
    pub actor: ActorId,
    pub location: Vector3<f32>,
}

/// One frame's teleport trace: the points to draw and what it landed on.
#[derive(Clone, Debug, Default)]
pub struct ArcTrajectory {
    /// Start, every sub-step, and the hit location when there is one
    pub points: Vec<Vector3<f32>>,
    pub hit: Option<TrajectoryHit>,
}

impl ArcTrajectory {
    /// Ballistic arc launched along `direction` at the configured projectile speed
    pub fn predict_arc(
        world: &dyn WorldQuery,
        start: Vector3<f32>,
        direction: Vector3<f32>,
        config: &TeleportConfig,
        ignore: ActorTags,
    ) -> Self {
        if direction.magnitude2() <= f32::EPSILON {
            return Self::at_rest(start);
        }

        let params = PredictProjectilePathParams {
            start_location: start,
            launch_velocity: direction.normalize() * config.projectile_speed,
            projectile_radius: config.projectile_radius,
            max_sim_time: config.max_sim_time,
            sim_frequency: config.sim_frequency,
            gravity: config.gravity,
            ignore,
        };
        let result = predict_projectile_path(world, &params);

        ArcTrajectory {
            points: result.path,
            hit: result.hit.map(|hit| TrajectoryHit {
                actor: hit.actor,
                location: hit.location,
            }),
        }
    }

    /// Straight trace of at most `max_distance` along `direction`
    pub fn trace_ray(
        world: &dyn WorldQuery,
        start: Vector3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
        ignore: ActorTags,
    ) -> Self {
        if direction.magnitude2() <= f32::EPSILON || max_distance <= 0.0 {
            return Self::at_rest(start);
        }

        let direction = direction.normalize();
        match world.cast_ray(start, direction, max_distance, ignore) {
            Some(hit) => ArcTrajectory {
                points: vec![start, hit.location],
                hit: Some(TrajectoryHit {
                    actor: hit.actor,
                    location: hit.location,
                }),
            },
            None => ArcTrajectory {
                points: vec![start, start + direction * max_distance],
                hit: None,
            },
        }
    }

    fn at_rest(start: Vector3<f32>) -> Self {
        ArcTrajectory {
            points: vec![start],
            hit: None,
        }
    }

    pub fn landing_position(&self) -> Option<Vector3<f32>> {
        self.hit.map(|hit| hit.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::PhysicsWorld;
    use cgmath::vec3;

    fn floor_world() -> PhysicsWorld {
        let mut world = PhysicsWorld::new();
        world.add_box(
            "floor",
            ActorTags::WALKABLE,
            vec3(0.0, -0.1, 0.0),
            vec3(50.0, 0.1, 50.0),
        );
        world
    }

    #[test]
    fn test_arc_lands_ahead_on_floor() {
        let world = floor_world();
        let start = vec3(0.0, 1.0, -0.3);

        let trajectory = ArcTrajectory::predict_arc(
            &world,
            start,
            vec3(0.0, 0.3, -1.0),
            &TeleportConfig::default(),
            ActorTags::PLAYER,
        );

        let landing = trajectory.landing_position().expect("arc should land");
        assert!(landing.y.abs() < 1e-3);
        assert!(landing.z < -5.0);
        assert_eq!(trajectory.points[0], start);
        assert_eq!(trajectory.points.last().copied(), Some(landing));
    }

    #[test]
    fn test_ray_hits_within_max_distance() {
        let world = floor_world();

        let trajectory = ArcTrajectory::trace_ray(
            &world,
            vec3(0.0, 1.0, 0.0),
            vec3(0.0, -1.0, -1.0),
            20.0,
            ActorTags::PLAYER,
        );

        let landing = trajectory.landing_position().unwrap();
        assert!((landing - vec3(0.0, 0.0, -1.0)).magnitude() < 1e-3);
        assert_eq!(trajectory.points.len(), 2);
    }

    #[test]
    fn test_ray_out_of_range_misses() {
        let world = floor_world();

        let trajectory = ArcTrajectory::trace_ray(
            &world,
            vec3(0.0, 1.0, 0.0),
            vec3(0.0, -1.0, -1.0),
            1.0,
            ActorTags::PLAYER,
        );

        assert!(trajectory.hit.is_none());
        assert_eq!(trajectory.points.len(), 2);
        let reach = trajectory.points[1] - trajectory.points[0];
        assert!((reach.magnitude() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_zero_direction_stays_at_start() {
        let world = floor_world();

        let trajectory = ArcTrajectory::predict_arc(
            &world,
            vec3(0.0, 1.0, 0.0),
            vec3(0.0, 0.0, 0.0),
            &TeleportConfig::default(),
            ActorTags::PLAYER,
        );

        assert_eq!(trajectory.points.len(), 1);
        assert!(trajectory.hit.is_none());
    }
}

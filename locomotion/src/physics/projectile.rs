use cgmath::{InnerSpace, Vector3, vec3};

use super::{ActorId, ActorTags, WorldQuery};

#[derive(Clone, Copy, Debug)]
pub struct PredictProjectilePathParams {
    pub start_location: Vector3<f32>,
    pub launch_velocity: Vector3<f32>,
    /// Radius of the traced sphere. Zero traces a plain line.
    pub projectile_radius: f32,
    pub max_sim_time: f32,
    /// Sub-steps per simulated second.
    pub sim_frequency: f32,
    /// Downward acceleration, positive.
    pub gravity: f32,
    pub ignore: ActorTags,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileHit {
    pub actor: ActorId,
    pub location: Vector3<f32>,
    pub time: f32,
}

#[derive(Clone, Debug)]
pub struct PredictProjectilePathResult {
    /// Start location, every sub-step location, and the hit location if any
    pub path: Vec<Vector3<f32>>,
    pub hit: Option<ProjectileHit>,
    pub last_velocity: Vector3<f32>,
}

impl PredictProjectilePathResult {
    pub fn is_hit(&self) -> bool {
        self.hit.is_some()
    }
}

/// Step a ballistic projectile through the world until it hits something or
/// runs out of simulation time.
///
/// Each sub-step traces the chord between consecutive positions with a ray;
/// with a radius, the sub-step end is also tested for sphere overlap so the
/// projectile cannot slip past geometry it would have grazed.
pub fn predict_projectile_path(
    world: &dyn WorldQuery,
    params: &PredictProjectilePathParams,
) -> PredictProjectilePathResult {
    let mut result = PredictProjectilePathResult {
        path: vec![params.start_location],
        hit: None,
        last_velocity: params.launch_velocity,
    };

    let step_budget = params.max_sim_time * params.sim_frequency;
    if !(step_budget.is_finite() && params.sim_frequency > 0.0 && params.max_sim_time > 0.0) {
        return result;
    }

    let gravity = vec3(0.0, -params.gravity, 0.0);
    let step = 1.0 / params.sim_frequency;

    let step_count = step_budget.ceil() as usize;

    let mut position = params.start_location;
    let mut velocity = params.launch_velocity;

    for index in 0..step_count {
        let time = index as f32 * step;
        let dt = step.min(params.max_sim_time - time);
        let next_velocity = velocity + gravity * dt;
        // Exact for constant acceleration
        let next_position = position + (velocity + next_velocity) * (0.5 * dt);

        let segment = next_position - position;
        let length = segment.magnitude();
        if length > f32::EPSILON {
            if let Some(hit) = world.cast_ray(position, segment / length, length, params.ignore) {
                let fraction = hit.distance / length;
                result.path.push(hit.location);
                result.hit = Some(ProjectileHit {
                    actor: hit.actor,
                    location: hit.location,
                    time: time + dt * fraction,
                });
                result.last_velocity = velocity + gravity * (dt * fraction);
                return result;
            }
        }

        if params.projectile_radius > 0.0 {
            let touching =
                world.overlapping_actors(next_position, params.projectile_radius, params.ignore);
            if let Some(&actor) = touching.first() {
                result.path.push(next_position);
                result.hit = Some(ProjectileHit {
                    actor,
                    location: next_position,
                    time: time + dt,
                });
                result.last_velocity = next_velocity;
                return result;
            }
        }

        result.path.push(next_position);
        position = next_position;
        velocity = next_velocity;
    }

    result.last_velocity = velocity;
    result
}

use cgmath::{InnerSpace, Vector3, Zero, vec3};
use engine::locomotion_log;
use serde::{Deserialize, Serialize};

use crate::physics::{ActorTags, WorldQuery};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MovementMode {
    Walking,
    Falling,
    /// No gravity; used while a hand holds on to a climbable surface.
    Flying,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    pub capsule_half_height: f32,
    pub capsule_radius: f32,
    pub max_walk_speed: f32,
    pub max_fly_speed: f32,
    pub gravity: f32,
    /// How far below the capsule the floor may drop before walking turns into falling
    pub step_height: f32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        CharacterConfig {
            capsule_half_height: 0.88,
            capsule_radius: 0.34,
            max_walk_speed: 3.0,
            max_fly_speed: 3.0,
            gravity: 9.8,
            step_height: 0.45,
        }
    }
}

/// Capsule movement for the VR character.
///
/// `location` is the capsule centre. Pending movement input is accumulated
/// between ticks and consumed by the next `tick`.
pub struct CharacterMovement {
    config: CharacterConfig,
    location: Vector3<f32>,
    velocity: Vector3<f32>,
    mode: MovementMode,
    pending_input: Vector3<f32>,
}

impl CharacterMovement {
    pub fn new(config: CharacterConfig, location: Vector3<f32>) -> Self {
        Self {
            config,
            location,
            velocity: Vector3::zero(),
            mode: MovementMode::Walking,
            pending_input: Vector3::zero(),
        }
    }

    pub fn location(&self) -> Vector3<f32> {
        self.location
    }

    pub fn velocity(&self) -> Vector3<f32> {
        self.velocity
    }

    pub fn movement_mode(&self) -> MovementMode {
        self.mode
    }

    pub fn capsule_half_height(&self) -> f32 {
        self.config.capsule_half_height
    }

    pub fn set_location(&mut self, location: Vector3<f32>) {
        self.location = location;
    }

    /// Move without sweeping for collisions.
    pub fn add_world_offset(&mut self, offset: Vector3<f32>) {
        self.location += offset;
    }

    pub fn add_movement_input(&mut self, direction: Vector3<f32>) {
        self.pending_input += direction;
    }

    pub fn set_movement_mode(&mut self, mode: MovementMode) {
        if mode == self.mode {
            return;
        }
        locomotion_log!(INFO, "movement mode {:?} -> {:?}", self.mode, mode);
        if matches!(mode, MovementMode::Flying | MovementMode::Falling) {
            self.velocity.y = 0.0;
        }
        if mode == MovementMode::Flying {
            self.velocity = Vector3::zero();
        }
        self.mode = mode;
    }

    pub fn tick(&mut self, delta_seconds: f32, world: &dyn WorldQuery) {
        let input = clamp_length(self.pending_input, 1.0);
        self.pending_input = Vector3::zero();

        if delta_seconds <= 0.0 {
            return;
        }

        match self.mode {
            MovementMode::Walking => self.walk(input, delta_seconds, world),
            MovementMode::Falling => self.fall(delta_seconds, world),
            MovementMode::Flying => {
                self.velocity = input * self.config.max_fly_speed;
                self.location += self.velocity * delta_seconds;
            }
        }
    }

    fn walk(&mut self, input: Vector3<f32>, delta_seconds: f32, world: &dyn WorldQuery) {
        let horizontal = clamp_length(vec3(input.x, 0.0, input.z), 1.0);
        self.velocity = horizontal * self.config.max_walk_speed;
        self.location += self.velocity * delta_seconds;

        let probe = self.config.capsule_half_height + self.config.step_height;
        match world.cast_ray(self.location, vec3(0.0, -1.0, 0.0), probe, ActorTags::PLAYER) {
            Some(hit) => {
                self.location.y = hit.location.y + self.config.capsule_half_height;
            }
            None => {
                locomotion_log!(DEBUG, "no floor under {:?}, falling", self.location);
                self.set_movement_mode(MovementMode::Falling);
            }
        }
    }

    fn fall(&mut self, delta_seconds: f32, world: &dyn WorldQuery) {
        self.velocity.y -= self.config.gravity * delta_seconds;
        let drop = (-self.velocity.y * delta_seconds).max(0.0);
        let next = self.location + self.velocity * delta_seconds;

        if self.velocity.y <= 0.0 {
            let probe = self.config.capsule_half_height + drop;
            let from = vec3(next.x, self.location.y, next.z);
            if let Some(hit) = world.cast_ray(from, vec3(0.0, -1.0, 0.0), probe, ActorTags::PLAYER) {
                self.location = vec3(next.x, hit.location.y + self.config.capsule_half_height, next.z);
                self.velocity = Vector3::zero();
                self.set_movement_mode(MovementMode::Walking);
                return;
            }
        }

        self.location = next;
    }
}

fn clamp_length(v: Vector3<f32>, max: f32) -> Vector3<f32> {
    let length = v.magnitude();
    if length > max { v * (max / length) } else { v }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::PhysicsWorld;

    fn floor_world() -> PhysicsWorld {
        let mut world = PhysicsWorld::new();
        world.add_box(
            "floor",
            ActorTags::WALKABLE,
            vec3(0.0, -0.1, 0.0),
            vec3(5.0, 0.1, 5.0),
        );
        world
    }

    #[test]
    fn test_walking_moves_and_stays_on_floor() {
        let world = floor_world();
        let mut movement = CharacterMovement::new(CharacterConfig::default(), vec3(0.0, 0.9, 0.0));

        movement.add_movement_input(vec3(0.0, 0.0, -2.0));
        movement.tick(0.5, &world);

        assert_eq!(movement.movement_mode(), MovementMode::Walking);
        assert!((movement.location().z + 1.5).abs() < 1e-4);
        assert!((movement.location().y - 0.88).abs() < 1e-4);
        assert!((movement.velocity().magnitude() - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_walking_off_the_edge_falls_then_lands() {
        let mut world = floor_world();
        world.add_box(
            "lower floor",
            ActorTags::WALKABLE,
            vec3(0.0, -2.1, -10.0),
            vec3(5.0, 0.1, 5.0),
        );
        let mut movement = CharacterMovement::new(CharacterConfig::default(), vec3(0.0, 0.88, -4.9));

        movement.add_movement_input(vec3(0.0, 0.0, -1.0));
        movement.tick(0.1, &world);
        assert_eq!(movement.movement_mode(), MovementMode::Falling);

        for _ in 0..100 {
            movement.tick(0.02, &world);
        }

        assert_eq!(movement.movement_mode(), MovementMode::Walking);
        assert!((movement.location().y - (-2.0 + 0.88)).abs() < 1e-3);
    }

    #[test]
    fn test_flying_ignores_gravity() {
        let world = PhysicsWorld::new();
        let mut movement = CharacterMovement::new(CharacterConfig::default(), vec3(0.0, 5.0, 0.0));
        movement.set_movement_mode(MovementMode::Flying);

        movement.tick(1.0, &world);

        assert_eq!(movement.location(), vec3(0.0, 5.0, 0.0));
        assert_eq!(movement.velocity(), Vector3::zero());
    }

    #[test]
    fn test_world_offset_does_not_change_velocity() {
        let mut movement = CharacterMovement::new(CharacterConfig::default(), vec3(0.0, 1.0, 0.0));
        movement.set_movement_mode(MovementMode::Flying);
        movement.add_world_offset(vec3(0.0, 0.5, 0.0));

        assert_eq!(movement.location(), vec3(0.0, 1.5, 0.0));
        assert_eq!(movement.velocity(), Vector3::zero());
    }
}

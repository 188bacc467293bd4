pub mod projectile;
pub mod util;

pub use projectile::{
    PredictProjectilePathParams, PredictProjectilePathResult, ProjectileHit, predict_projectile_path,
};

use std::collections::HashMap;

use bitflags::bitflags;
use cgmath::{InnerSpace, Vector3};
use engine::physics_log;
use rapier3d::prelude::*;

use self::util::{npoint_to_cgvec, vec_to_isometry, vec_to_npoint, vec_to_nvec};

bitflags! {
    /// Gameplay tags attached to actors in the physics world.
    pub struct ActorTags: u32 {
        /// Hands can grip it and start climbing
        const CLIMBABLE = 1 << 0;
        /// Characters can stand on it
        const WALKABLE  = 1 << 1;
        /// The player's own body; never a teleport or overlap target
        const PLAYER    = 1 << 2;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub actor: ActorId,
    pub location: Vector3<f32>,
    pub distance: f32,
}

/// Spatial queries the locomotion code consumes from the host's physics.
///
/// Every query takes an `ignore` mask: actors carrying any of those tags are
/// invisible to it.
pub trait WorldQuery {
    fn cast_ray(
        &self,
        origin: Vector3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
        ignore: ActorTags,
    ) -> Option<RayHit>;

    fn overlapping_actors(
        &self,
        center: Vector3<f32>,
        radius: f32,
        ignore: ActorTags,
    ) -> Vec<ActorId>;

    fn actor_tags(&self, actor: ActorId) -> ActorTags;

    fn actor_name(&self, actor: ActorId) -> Option<&str>;
}

struct ActorInfo {
    name: String,
    tags: ActorTags,
    collider: ColliderHandle,
}

/// Static level geometry backed by rapier's query pipeline.
///
/// Each actor owns exactly one collider; the actor id is stored in the
/// collider's `user_data` so query results map straight back to actors.
pub struct PhysicsWorld {
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    query_pipeline: QueryPipeline,
    actors: HashMap<ActorId, ActorInfo>,
    next_actor_id: u32,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            query_pipeline: QueryPipeline::new(),
            actors: HashMap::new(),
            next_actor_id: 0,
        }
    }

    /// Add a static actor whose collider is centred at `location`.
    pub fn add_static_actor(
        &mut self,
        name: &str,
        tags: ActorTags,
        collider: ColliderBuilder,
        location: Vector3<f32>,
    ) -> ActorId {
        let actor = ActorId(self.next_actor_id);
        self.next_actor_id += 1;

        let collider = collider
            .translation(vec_to_nvec(location))
            .user_data(actor.0 as u128)
            .build();
        let handle = self.collider_set.insert(collider);

        self.actors.insert(
            actor,
            ActorInfo {
                name: name.to_owned(),
                tags,
                collider: handle,
            },
        );
        self.query_pipeline
            .update(&self.rigid_body_set, &self.collider_set);

        physics_log!(DEBUG, "added actor {} ({:?}) tags={:?}", name, actor, tags);
        actor
    }

    /// Convenience for axis-aligned boxes, given by centre and half extents.
    pub fn add_box(
        &mut self,
        name: &str,
        tags: ActorTags,
        center: Vector3<f32>,
        half_extents: Vector3<f32>,
    ) -> ActorId {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z);
        self.add_static_actor(name, tags, collider, center)
    }

    pub fn remove_actor(&mut self, actor: ActorId) -> bool {
        let Some(info) = self.actors.remove(&actor) else {
            return false;
        };
        let mut islands = IslandManager::new();
        self.collider_set
            .remove(info.collider, &mut islands, &mut self.rigid_body_set, false);
        self.query_pipeline
            .update(&self.rigid_body_set, &self.collider_set);
        true
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    fn actor_from_collider(&self, handle: ColliderHandle) -> Option<ActorId> {
        self.collider_set
            .get(handle)
            .map(|collider| ActorId(collider.user_data as u32))
    }

    fn tags_of_collider(&self, collider: &Collider) -> ActorTags {
        self.actor_tags(ActorId(collider.user_data as u32))
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldQuery for PhysicsWorld {
    fn cast_ray(
        &self,
        origin: Vector3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
        ignore: ActorTags,
    ) -> Option<RayHit> {
        if direction.magnitude2() <= f32::EPSILON || max_distance <= 0.0 {
            return None;
        }
        let direction = direction.normalize();
        let ray = Ray::new(vec_to_npoint(origin), vec_to_nvec(direction));

        let predicate = |_handle: ColliderHandle, collider: &Collider| {
            !self.tags_of_collider(collider).intersects(ignore)
        };
        let filter = QueryFilter::default().predicate(&predicate);

        let (handle, toi) = self.query_pipeline.cast_ray(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            max_distance,
            true,
            filter,
        )?;

        let actor = self.actor_from_collider(handle)?;
        Some(RayHit {
            actor,
            location: npoint_to_cgvec(ray.point_at(toi)),
            distance: toi,
        })
    }

    fn overlapping_actors(
        &self,
        center: Vector3<f32>,
        radius: f32,
        ignore: ActorTags,
    ) -> Vec<ActorId> {
        if radius <= 0.0 {
            return Vec::new();
        }

        let shape = Ball::new(radius);
        let shape_pos = vec_to_isometry(center);
        let predicate = |_handle: ColliderHandle, collider: &Collider| {
            !self.tags_of_collider(collider).intersects(ignore)
        };
        let filter = QueryFilter::default().predicate(&predicate);

        let mut actors = Vec::new();
        self.query_pipeline.intersections_with_shape(
            &self.rigid_body_set,
            &self.collider_set,
            &shape_pos,
            &shape,
            filter,
            |handle| {
                if let Some(actor) = self.actor_from_collider(handle) {
                    actors.push(actor);
                }
                true
            },
        );

        actors.sort();
        actors.dedup();
        actors
    }

    fn actor_tags(&self, actor: ActorId) -> ActorTags {
        self.actors
            .get(&actor)
            .map(|info| info.tags)
            .unwrap_or_else(ActorTags::empty)
    }

    fn actor_name(&self, actor: ActorId) -> Option<&str> {
        self.actors.get(&actor).map(|info| info.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::vec3;

    fn test_world() -> (PhysicsWorld, ActorId, ActorId) {
        let mut world = PhysicsWorld::new();
        let floor = world.add_box(
            "floor",
            ActorTags::WALKABLE,
            vec3(0.0, -0.1, 0.0),
            vec3(10.0, 0.1, 10.0),
        );
        let wall = world.add_box(
            "wall",
            ActorTags::CLIMBABLE,
            vec3(0.0, 3.0, -3.0),
            vec3(2.0, 3.0, 0.25),
        );
        (world, floor, wall)
    }

    #[test]
    fn test_cast_ray_hits_floor() {
        let (world, floor, _) = test_world();

        let hit = world
            .cast_ray(vec3(1.0, 2.0, 1.0), vec3(0.0, -1.0, 0.0), 10.0, ActorTags::empty())
            .expect("ray should hit the floor");

        assert_eq!(hit.actor, floor);
        assert!((hit.location.y - 0.0).abs() < 1e-4);
        assert!((hit.distance - 2.0).abs() < 1e-4);
        assert_eq!(world.actor_name(hit.actor), Some("floor"));
    }

    #[test]
    fn test_cast_ray_respects_max_distance_and_ignore() {
        let (world, _, _) = test_world();

        assert!(world
            .cast_ray(vec3(1.0, 2.0, 1.0), vec3(0.0, -1.0, 0.0), 1.0, ActorTags::empty())
            .is_none());
        assert!(world
            .cast_ray(vec3(1.0, 2.0, 1.0), vec3(0.0, -1.0, 0.0), 10.0, ActorTags::WALKABLE)
            .is_none());
    }

    #[test]
    fn test_overlapping_actors() {
        let (world, _, wall) = test_world();

        let touching = world.overlapping_actors(vec3(0.0, 1.5, -2.7), 0.1, ActorTags::empty());
        assert_eq!(touching, vec![wall]);
        assert!(world.actor_tags(wall).contains(ActorTags::CLIMBABLE));

        let clear = world.overlapping_actors(vec3(0.0, 1.5, -2.0), 0.1, ActorTags::empty());
        assert!(clear.is_empty());
    }

    #[test]
    fn test_remove_actor() {
        let (mut world, floor, _) = test_world();

        assert!(world.remove_actor(floor));
        assert!(!world.remove_actor(floor));
        assert_eq!(world.actor_count(), 1);
        assert_eq!(world.actor_tags(floor), ActorTags::empty());
        assert!(world
            .cast_ray(vec3(1.0, 2.0, 1.0), vec3(0.0, -1.0, 0.0), 10.0, ActorTags::empty())
            .is_none());
    }
}

pub mod hand_pair;

pub use hand_pair::HandPair;

use std::collections::BTreeSet;

use cgmath::{Quaternion, Rotation, Vector3, Zero};
use engine::{AssetRef, climb_log};
use serde::{Deserialize, Serialize};

use crate::{
    effect::Effect,
    haptics::HapticEffect,
    input_context::FORWARD,
    physics::{ActorId, ActorTags, WorldQuery},
    vr_config::Handedness,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HandConfig {
    /// Template the hands are spawned from; without one the character has no hands
    pub controller_class: Option<AssetRef>,
    /// Radius of the overlap sphere around each controller
    pub grab_radius: f32,
    pub hand_hold_rumble: Option<HapticEffect>,
}

impl Default for HandConfig {
    fn default() -> Self {
        HandConfig {
            controller_class: Some(AssetRef::new("BP_HandController")),
            grab_radius: 0.08,
            hand_hold_rumble: Some(HapticEffect::new("HandHoldRumble")),
        }
    }
}

/// One tracked motion controller and its climbing state.
pub struct HandController {
    hand: Handedness,
    location: Vector3<f32>,
    rotation: Quaternion<f32>,
    grab_radius: f32,
    hand_hold_rumble: Option<HapticEffect>,
    overlapping: BTreeSet<ActorId>,
    can_climb: bool,
    is_climbing: bool,
    climbing_start_location: Vector3<f32>,
}

impl HandController {
    pub fn new(hand: Handedness, config: &HandConfig) -> Self {
        Self {
            hand,
            location: Vector3::zero(),
            rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            grab_radius: config.grab_radius,
            hand_hold_rumble: config.hand_hold_rumble.clone(),
            overlapping: BTreeSet::new(),
            can_climb: false,
            is_climbing: false,
            climbing_start_location: Vector3::zero(),
        }
    }

    pub fn hand(&self) -> Handedness {
        self.hand
    }

    pub fn location(&self) -> Vector3<f32> {
        self.location
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.rotation.rotate_vector(FORWARD)
    }

    pub fn can_climb(&self) -> bool {
        self.can_climb
    }

    pub fn is_climbing(&self) -> bool {
        self.is_climbing
    }

    pub fn climbing_start_location(&self) -> Vector3<f32> {
        self.climbing_start_location
    }

    pub fn overlapping_actors(&self) -> impl Iterator<Item = &ActorId> {
        self.overlapping.iter()
    }

    pub fn set_world_pose(&mut self, location: Vector3<f32>, rotation: Quaternion<f32>) {
        self.location = location;
        self.rotation = rotation;
    }

    /// The controller is carried along when its character moves.
    pub(crate) fn add_world_offset(&mut self, offset: Vector3<f32>) {
        self.location += offset;
    }

    /// Refresh the overlap set and dispatch begin/end overlap callbacks for
    /// every actor that entered or left it.
    pub fn update_overlaps(&mut self, world: &dyn WorldQuery) -> Vec<Effect> {
        let current: BTreeSet<ActorId> = world
            .overlapping_actors(self.location, self.grab_radius, ActorTags::PLAYER)
            .into_iter()
            .collect();

        let ended: Vec<ActorId> = self.overlapping.difference(&current).copied().collect();
        let began: Vec<ActorId> = current.difference(&self.overlapping).copied().collect();

        let mut effects = Vec::new();
        for actor in ended {
            self.overlapping.remove(&actor);
            self.on_end_overlap(actor, world);
        }
        for actor in began {
            self.overlapping.insert(actor);
            effects.extend(self.on_begin_overlap(actor, world));
        }
        effects
    }

    pub fn on_begin_overlap(&mut self, actor: ActorId, world: &dyn WorldQuery) -> Option<Effect> {
        climb_log!(
            TRACE,
            "{:?} hand began overlapping {}",
            self.hand,
            world.actor_name(actor).unwrap_or("<unnamed>")
        );

        if !self.can_climb && self.overlaps_climbable(world) {
            self.can_climb = true;
            climb_log!(INFO, "{:?} hand can climb", self.hand);
            return self.play_hand_hold_rumble();
        }
        None
    }

    pub fn on_end_overlap(&mut self, actor: ActorId, world: &dyn WorldQuery) {
        climb_log!(
            TRACE,
            "{:?} hand ended overlapping {}",
            self.hand,
            world.actor_name(actor).unwrap_or("<unnamed>")
        );

        if self.can_climb && !self.overlaps_climbable(world) {
            self.can_climb = false;
            climb_log!(INFO, "{:?} hand cannot climb", self.hand);
        }
    }

    fn overlaps_climbable(&self, world: &dyn WorldQuery) -> bool {
        self.overlapping
            .iter()
            .any(|&actor| world.actor_tags(actor).contains(ActorTags::CLIMBABLE))
    }

    fn play_hand_hold_rumble(&self) -> Option<Effect> {
        // Holding on to a surface keeps re-entering overlaps; stay quiet meanwhile
        if self.is_climbing {
            return None;
        }

        let Some(effect) = self.hand_hold_rumble.clone() else {
            climb_log!(DEBUG, "{:?} hand has no hand hold rumble configured", self.hand);
            return None;
        };

        Some(Effect::PlayHapticEffect {
            hand: self.hand,
            effect,
        })
    }

    pub(crate) fn start_climbing(&mut self) {
        self.is_climbing = true;
        self.climbing_start_location = self.location;
    }

    pub(crate) fn stop_climbing(&mut self) {
        self.is_climbing = false;
    }

    /// Displacement of the hand since the climb anchor.
    pub(crate) fn climb_delta(&self) -> Vector3<f32> {
        self.location - self.climbing_start_location
    }

    pub(crate) fn reset_climb_anchor(&mut self) {
        self.climbing_start_location = self.location;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::PhysicsWorld;
    use cgmath::vec3;

    fn wall_world() -> PhysicsWorld {
        let mut world = PhysicsWorld::new();
        world.add_box(
            "climbing wall",
            ActorTags::CLIMBABLE,
            vec3(0.0, 3.0, -3.0),
            vec3(2.0, 3.0, 0.25),
        );
        world.add_box(
            "plain pillar",
            ActorTags::empty(),
            vec3(4.0, 1.0, 0.0),
            vec3(0.25, 1.0, 0.25),
        );
        world
    }

    fn hand_at(location: Vector3<f32>) -> HandController {
        let mut hand = HandController::new(Handedness::Right, &HandConfig::default());
        hand.set_world_pose(location, Quaternion::new(1.0, 0.0, 0.0, 0.0));
        hand
    }

    #[test]
    fn test_entering_climbable_sets_flag_and_rumbles() {
        let world = wall_world();
        let mut hand = hand_at(vec3(0.0, 1.5, -2.7));

        let effects = hand.update_overlaps(&world);

        assert!(hand.can_climb());
        assert_eq!(effects.len(), 1);
        assert!(matches!(
            &effects[0],
            Effect::PlayHapticEffect { hand: Handedness::Right, .. }
        ));
    }

    #[test]
    fn test_leaving_climbable_clears_flag() {
        let world = wall_world();
        let mut hand = hand_at(vec3(0.0, 1.5, -2.7));
        hand.update_overlaps(&world);

        hand.set_world_pose(vec3(0.0, 1.5, -1.0), Quaternion::new(1.0, 0.0, 0.0, 0.0));
        let effects = hand.update_overlaps(&world);

        assert!(effects.is_empty());
        assert!(!hand.can_climb());
        assert_eq!(hand.overlapping_actors().count(), 0);
    }

    #[test]
    fn test_non_climbable_overlap_is_ignored() {
        let world = wall_world();
        let mut hand = hand_at(vec3(3.7, 1.0, 0.0));

        let effects = hand.update_overlaps(&world);

        assert_eq!(hand.overlapping_actors().count(), 1);
        assert!(!hand.can_climb());
        assert!(effects.is_empty());
    }

    #[test]
    fn test_rumble_suppressed_while_climbing() {
        let world = wall_world();
        let mut hand = hand_at(vec3(0.0, 1.5, -2.7));
        hand.update_overlaps(&world);
        hand.start_climbing();

        // Slip off and back on while still holding
        hand.set_world_pose(vec3(0.0, 1.5, -1.0), Quaternion::new(1.0, 0.0, 0.0, 0.0));
        hand.update_overlaps(&world);
        hand.set_world_pose(vec3(0.0, 1.5, -2.7), Quaternion::new(1.0, 0.0, 0.0, 0.0));
        let effects = hand.update_overlaps(&world);

        assert!(hand.can_climb());
        assert!(effects.is_empty());
    }

    #[test]
    fn test_missing_rumble_effect_is_skipped() {
        let world = wall_world();
        let config = HandConfig {
            hand_hold_rumble: None,
            ..HandConfig::default()
        };
        let mut hand = HandController::new(Handedness::Left, &config);
        hand.set_world_pose(vec3(0.0, 1.5, -2.7), Quaternion::new(1.0, 0.0, 0.0, 0.0));

        assert!(hand.update_overlaps(&world).is_empty());
        assert!(hand.can_climb());
    }
}

use cgmath::{InnerSpace, Vector3};
use engine::climb_log;

use crate::{character::MovementMode, effect::Effect, physics::WorldQuery, vr_config::Handedness};

use super::{HandConfig, HandController};

/// Both hand controllers of one character, paired with each other.
///
/// Only one hand drives the body at a time: gripping with one hand releases
/// the other, and letting go with the last hand drops the character.
pub struct HandPair {
    left: HandController,
    right: HandController,
}

impl HandPair {
    pub fn new(config: &HandConfig) -> Self {
        Self {
            left: HandController::new(Handedness::Left, config),
            right: HandController::new(Handedness::Right, config),
        }
    }

    pub fn hand(&self, hand: Handedness) -> &HandController {
        match hand {
            Handedness::Left => &self.left,
            Handedness::Right => &self.right,
        }
    }

    pub fn hand_mut(&mut self, hand: Handedness) -> &mut HandController {
        match hand {
            Handedness::Left => &mut self.left,
            Handedness::Right => &mut self.right,
        }
    }

    pub fn other(&self, hand: Handedness) -> &HandController {
        self.hand(hand.other())
    }

    /// The hand and its sibling, both mutable.
    fn split_mut(&mut self, hand: Handedness) -> (&mut HandController, &mut HandController) {
        match hand {
            Handedness::Left => (&mut self.left, &mut self.right),
            Handedness::Right => (&mut self.right, &mut self.left),
        }
    }

    pub fn is_climbing(&self) -> bool {
        self.left.is_climbing() || self.right.is_climbing()
    }

    pub fn grip(&mut self, hand: Handedness) -> Vec<Effect> {
        let (this, other) = self.split_mut(hand);
        if !this.can_climb() || this.is_climbing() {
            return Vec::new();
        }

        this.start_climbing();
        climb_log!(INFO, "{:?} hand gripped at {:?}", hand, this.climbing_start_location());

        let mut effects = vec![Effect::SetMovementMode {
            mode: MovementMode::Flying,
        }];
        effects.extend(Self::release_hand(other, this));
        effects
    }

    pub fn release(&mut self, hand: Handedness) -> Vec<Effect> {
        let (this, other) = self.split_mut(hand);
        Self::release_hand(this, other)
    }

    /// Let go with both hands; drops the character if either was holding on.
    pub fn release_all(&mut self) -> Vec<Effect> {
        let mut effects = self.release(Handedness::Left);
        effects.extend(self.release(Handedness::Right));
        effects
    }

    fn release_hand(this: &mut HandController, other: &HandController) -> Vec<Effect> {
        if !this.is_climbing() {
            return Vec::new();
        }

        this.stop_climbing();
        climb_log!(INFO, "{:?} hand released", this.hand());

        if other.is_climbing() {
            return Vec::new();
        }
        vec![Effect::SetMovementMode {
            mode: MovementMode::Falling,
        }]
    }

    pub fn update_overlaps(&mut self, world: &dyn WorldQuery) -> Vec<Effect> {
        let mut effects = self.left.update_overlaps(world);
        effects.extend(self.right.update_overlaps(world));
        effects
    }

    /// Pull the body toward the climbing hand.
    ///
    /// The hand's displacement since its anchor is fed back to the character
    /// as an inverse world offset. Both controllers ride along with the body,
    /// which puts the climbing hand back on its anchor.
    pub fn update_climb(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();

        for hand in [Handedness::Left, Handedness::Right] {
            let (this, _) = self.split_mut(hand);
            if !this.is_climbing() {
                continue;
            }

            let delta = this.climb_delta();
            if delta.magnitude2() <= f32::EPSILON * f32::EPSILON {
                continue;
            }

            let offset = -delta;
            self.add_world_offset(offset);
            self.hand_mut(hand).reset_climb_anchor();
            effects.push(Effect::AddCharacterWorldOffset { offset });
        }

        effects
    }

    pub fn add_world_offset(&mut self, offset: Vector3<f32>) {
        self.left.add_world_offset(offset);
        self.right.add_world_offset(offset);
    }
}

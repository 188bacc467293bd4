use cgmath::Vector3;

use crate::{character::MovementMode, haptics::HapticEffect, vr_config::Handedness};

/// Requests raised by hand controllers for the character that owns them.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    SetMovementMode {
        mode: MovementMode,
    },
    AddCharacterWorldOffset {
        offset: Vector3<f32>,
    },
    PlayHapticEffect {
        hand: Handedness,
        effect: HapticEffect,
    },
}

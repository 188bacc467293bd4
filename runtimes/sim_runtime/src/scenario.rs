// Scripted input tracks. Each scenario maps a frame number to the tracked
// poses and analog inputs a player would produce on that frame.

use cgmath::{Deg, Quaternion, Rotation3, Vector2, Vector3, vec3};
use clap::ValueEnum;
use locomotion::InputContext;
use serde::Serialize;

/// Frames spent on each hand-over-hand pull while climbing
const CLIMB_CYCLE: u32 = 30;
/// How far each pull drags the gripping hand down
const CLIMB_PULL: f32 = 0.6;
const REACH_HEIGHT: f32 = 1.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// Thumbstick locomotion while slowly turning the head
    Walk,
    /// Aim at the floor ahead and teleport twice
    Teleport,
    /// Hand-over-hand up the climbing wall
    Climb,
    /// Every scenario in turn, each with a fresh character
    All,
}

impl Scenario {
    pub fn expand(self) -> Vec<Scenario> {
        match self {
            Scenario::All => vec![Scenario::Walk, Scenario::Teleport, Scenario::Climb],
            scenario => vec![scenario],
        }
    }

    pub fn spawn_location(self) -> Vector3<f32> {
        match self {
            Scenario::Walk | Scenario::Teleport | Scenario::All => vec3(0.0, 0.88, 4.0),
            // Arm's length from the wall
            Scenario::Climb => vec3(0.0, 0.88, -2.5),
        }
    }

    pub fn input_at(self, frame: u32) -> InputContext {
        match self {
            Scenario::Walk => walk_input(frame),
            Scenario::Teleport => teleport_input(frame),
            Scenario::Climb => climb_input(frame),
            Scenario::All => InputContext::default(),
        }
    }
}

fn walk_input(frame: u32) -> InputContext {
    let mut input = InputContext::default();
    input.head.rotation = Quaternion::from_angle_y(Deg(frame as f32 * 0.25));
    input.right_hand.thumbstick = Vector2::new(0.0, 1.0);
    input
}

fn teleport_input(frame: u32) -> InputContext {
    let mut input = InputContext::default();
    input.left_hand.rotation = Quaternion::from_angle_x(Deg(-30.0));
    // Two presses; teleport fires on release
    let pressed = (5..15).contains(&frame) || (70..80).contains(&frame);
    input.left_hand.trigger_value = if pressed { 1.0 } else { 0.0 };
    input
}

fn climb_input(frame: u32) -> InputContext {
    let mut input = InputContext::default();
    input.left_hand.position = vec3(-0.3, REACH_HEIGHT, -0.45);
    input.right_hand.position = vec3(0.3, REACH_HEIGHT, -0.45);

    // Reach for the wall first
    let Some(climbing_frame) = frame.checked_sub(10) else {
        return input;
    };

    let cycle = climbing_frame / CLIMB_CYCLE;
    let t = (climbing_frame % CLIMB_CYCLE) as f32 / (CLIMB_CYCLE - 1) as f32;
    let pulling = if cycle % 2 == 0 {
        &mut input.right_hand
    } else {
        &mut input.left_hand
    };
    pulling.squeeze_value = 1.0;
    pulling.position.y = REACH_HEIGHT - CLIMB_PULL * t;
    input
}

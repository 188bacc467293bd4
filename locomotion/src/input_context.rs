// Input context is an abstraction layer over the tracked devices the runtime provides:
// the headset pose plus one pose and set of analog inputs per motion controller.
// Poses are in tracking space, i.e. relative to the character's VR root.

use cgmath::{Quaternion, Rotation, Vector2, Vector3, Zero, vec3};

use crate::vr_config::Handedness;

/// Forward in tracking space. Controllers and the headset look down -Z.
pub const FORWARD: Vector3<f32> = vec3(0.0, 0.0, -1.0);
pub const RIGHT: Vector3<f32> = vec3(1.0, 0.0, 0.0);

#[derive(Clone, Debug)]
pub struct InputContext {
    pub head: Head,
    pub left_hand: Hand,
    pub right_hand: Hand,
}

impl InputContext {
    pub fn hand(&self, handedness: Handedness) -> &Hand {
        match handedness {
            Handedness::Left => &self.left_hand,
            Handedness::Right => &self.right_hand,
        }
    }

    pub fn hand_mut(&mut self, handedness: Handedness) -> &mut Hand {
        match handedness {
            Handedness::Left => &mut self.left_hand,
            Handedness::Right => &mut self.right_hand,
        }
    }
}

impl Default for InputContext {
    fn default() -> InputContext {
        InputContext {
            head: Head::default(),
            left_hand: Hand::default(),
            right_hand: Hand::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Head {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
}

impl Head {
    pub fn forward(&self) -> Vector3<f32> {
        self.rotation.rotate_vector(FORWARD)
    }

    pub fn right(&self) -> Vector3<f32> {
        self.rotation.rotate_vector(RIGHT)
    }
}

impl Default for Head {
    fn default() -> Head {
        Head {
            // Standing eye height
            position: vec3(0.0, 1.7, 0.0),
            rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
        }
    }
}

// Context for an individual hand (motion controller)
#[derive(Clone, Debug)]
pub struct Hand {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub thumbstick: Vector2<f32>,
    pub trigger_value: f32,
    pub squeeze_value: f32,
    pub a_value: f32,
}

impl Hand {
    pub fn forward(&self) -> Vector3<f32> {
        self.rotation.rotate_vector(FORWARD)
    }
}

impl Default for Hand {
    fn default() -> Hand {
        Hand {
            position: vec3(0.0, 1.0, -0.3),
            rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            thumbstick: Vector2::zero(),
            trigger_value: 0.0,
            squeeze_value: 0.0,
            a_value: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonTransition {
    Idle,
    Pressed,
    Held,
    Released,
}

/// Turns an analog value into press/release edges against a threshold.
#[derive(Clone, Copy, Debug, Default)]
pub struct ButtonState {
    was_pressed: bool,
}

impl ButtonState {
    pub fn update(&mut self, value: f32, threshold: f32) -> ButtonTransition {
        let is_pressed = value >= threshold;
        let transition = match (self.was_pressed, is_pressed) {
            (false, true) => ButtonTransition::Pressed,
            (true, true) => ButtonTransition::Held,
            (true, false) => ButtonTransition::Released,
            (false, false) => ButtonTransition::Idle,
        };
        self.was_pressed = is_pressed;
        transition
    }

    pub fn is_pressed(&self) -> bool {
        self.was_pressed
    }
}

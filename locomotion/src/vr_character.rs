use cgmath::{InnerSpace, Vector3, vec3};
use engine::{Time, TimerManager, climb_log, input_log, locomotion_log};

use crate::{
    character::{CharacterMovement, MovementMode},
    config::{InputBindings, LocomotionConfig},
    effect::Effect,
    hand_controller::{HandConfig, HandPair},
    input_context::{ButtonState, ButtonTransition, InputContext},
    navigation::NavigationQuery,
    physics::WorldQuery,
    player_controller::{CameraView, PlayerController},
    teleport::TeleportSystem,
    vignette::Vignette,
    vr_config::Handedness,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharacterTimer {
    FinishTeleport,
}

/// The player's pawn in VR.
///
/// The actor location is the capsule centre. Tracked poses (headset and
/// controllers) are relative to the VR root, which sits at
/// `location + vr_root_offset` and starts out on the floor under the capsule.
pub struct VRCharacter {
    movement: CharacterMovement,
    vr_root_offset: Vector3<f32>,
    tracking: InputContext,
    hand_config: HandConfig,
    hands: Option<HandPair>,
    teleport: TeleportSystem,
    vignette: Vignette,
    input: InputBindings,
    timers: TimerManager<CharacterTimer>,
    player_controller: Option<Box<dyn PlayerController>>,
    teleport_button: ButtonState,
    left_grip: ButtonState,
    right_grip: ButtonState,
}

impl VRCharacter {
    pub fn new(config: LocomotionConfig, spawn_location: Vector3<f32>) -> Self {
        let LocomotionConfig {
            teleport,
            vignette,
            character,
            hands,
            input,
        } = config;
        let half_height = character.capsule_half_height;

        VRCharacter {
            movement: CharacterMovement::new(character, spawn_location),
            vr_root_offset: vec3(0.0, -half_height, 0.0),
            tracking: InputContext::default(),
            hand_config: hands,
            hands: None,
            teleport: TeleportSystem::new(teleport),
            vignette: Vignette::new(vignette),
            input,
            timers: TimerManager::new(),
            player_controller: None,
            teleport_button: ButtonState::default(),
            left_grip: ButtonState::default(),
            right_grip: ButtonState::default(),
        }
    }

    pub fn possess(&mut self, player_controller: Box<dyn PlayerController>) {
        locomotion_log!(INFO, "possessed by {}", player_controller.name());
        self.player_controller = Some(player_controller);
    }

    pub fn begin_play(&mut self) {
        self.teleport.hide_destination_marker();

        self.hands = match &self.hand_config.controller_class {
            Some(class) => {
                locomotion_log!(DEBUG, "spawning hand controllers from {}", class);
                let mut hands = HandPair::new(&self.hand_config);
                let root = self.vr_root_location();
                for hand in [Handedness::Left, Handedness::Right] {
                    let tracked = self.tracking.hand(hand);
                    hands
                        .hand_mut(hand)
                        .set_world_pose(root + tracked.position, tracked.rotation);
                }
                Some(hands)
            }
            None => {
                locomotion_log!(WARN, "no hand controller class configured, climbing disabled");
                None
            }
        };

        self.vignette.begin_play();
    }

    pub fn tick(
        &mut self,
        time: &Time,
        input: &InputContext,
        world: &dyn WorldQuery,
        nav: &dyn NavigationQuery,
    ) {
        let delta_seconds = time.delta_seconds();

        self.tracking = input.clone();
        self.sync_hand_poses();

        self.process_input(input);

        self.movement.tick(delta_seconds, world);
        self.update_vr_root_location();
        self.sync_hand_poses();

        self.update_destination_marker(world, nav);

        let camera = self.camera_view();
        let velocity = self.movement.velocity();
        self.vignette
            .update(velocity, &camera, self.player_controller.as_deref());

        if let Some(hands) = self.hands.as_mut() {
            let mut effects = hands.update_overlaps(world);
            effects.extend(hands.update_climb());
            self.apply_effects(effects);
        }

        for timer in self.timers.tick(time.elapsed) {
            match timer {
                CharacterTimer::FinishTeleport => self.finish_teleport(),
            }
        }

        if let Some(pc) = self.player_controller.as_mut() {
            pc.tick(delta_seconds);
        }
    }

    fn process_input(&mut self, input: &InputContext) {
        let stick = input.hand(self.input.movement_hand).thumbstick;
        let dead_zone = self.input.dead_zone;
        let axis = |value: f32| if value.abs() < dead_zone { 0.0 } else { value };
        self.move_forward(axis(stick.y));
        self.move_right(axis(stick.x));

        let teleport_config = self.teleport.config();
        let teleport_value = teleport_config.button_value(input.hand(teleport_config.aim_hand));
        let teleport_threshold = teleport_config.trigger_threshold;
        if self.teleport_button.update(teleport_value, teleport_threshold) == ButtonTransition::Released {
            input_log!(DEBUG, "teleport released");
            self.begin_teleport();
        }

        let grip_threshold = self.input.grip_threshold;
        let left = self.left_grip.update(input.left_hand.squeeze_value, grip_threshold);
        let right = self.right_grip.update(input.right_hand.squeeze_value, grip_threshold);
        for (hand, transition) in [(Handedness::Left, left), (Handedness::Right, right)] {
            match transition {
                ButtonTransition::Pressed => self.grip(hand),
                ButtonTransition::Released => self.release(hand),
                ButtonTransition::Idle | ButtonTransition::Held => {}
            }
        }
    }

    pub fn move_forward(&mut self, throttle: f32) {
        if throttle == 0.0 {
            return;
        }
        let forward = flatten(self.tracking.head.forward());
        self.movement.add_movement_input(forward * throttle);
    }

    pub fn move_right(&mut self, throttle: f32) {
        if throttle == 0.0 {
            return;
        }
        let right = flatten(self.tracking.head.right());
        self.movement.add_movement_input(right * throttle);
    }

    pub fn grip(&mut self, hand: Handedness) {
        let Some(hands) = self.hands.as_mut() else {
            climb_log!(DEBUG, "no hand controllers to grip with");
            return;
        };
        let effects = hands.grip(hand);
        self.apply_effects(effects);
    }

    pub fn release(&mut self, hand: Handedness) {
        let Some(hands) = self.hands.as_mut() else {
            return;
        };
        let effects = hands.release(hand);
        self.apply_effects(effects);
    }

    /// Move the capsule under the headset without moving the headset.
    ///
    /// The horizontal camera offset is added to the actor and subtracted from
    /// the VR root, so the tracked space stays put in the world.
    pub fn update_vr_root_location(&mut self) -> Vector3<f32> {
        let mut offset = self.camera_location() - self.movement.location();
        offset.y = 0.0;

        self.movement.add_world_offset(offset);
        self.vr_root_offset -= offset;
        offset
    }

    pub fn update_destination_marker(&mut self, world: &dyn WorldQuery, nav: &dyn NavigationQuery) -> bool {
        let aim_hand = self.teleport.config().aim_hand;
        let start = self.vr_root_location() + self.tracking.hand(aim_hand).position;
        let direction = self.tracking.hand(aim_hand).forward();
        self.teleport.update_destination_marker(world, nav, start, direction)
    }

    /// Fade out and schedule the move. Nothing happens unless the destination
    /// marker is showing.
    pub fn begin_teleport(&mut self) {
        let pc = player_controller_mut(&mut self.player_controller);
        if let Some(delay) = self.teleport.begin_teleport(pc) {
            self.timers.set_timer(delay, CharacterTimer::FinishTeleport);
        }
    }

    /// Move onto the marker. Any hold is let go first, otherwise the next
    /// climb update would pull the character back to it.
    pub fn finish_teleport(&mut self) {
        if let Some(hands) = self.hands.as_mut() {
            if hands.is_climbing() {
                climb_log!(INFO, "teleporting off the wall");
            }
            let effects = hands.release_all();
            self.apply_effects(effects);
        }

        let pc = player_controller_mut(&mut self.player_controller);
        self.teleport.finish_teleport(&mut self.movement, pc);
    }

    pub fn apply_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SetMovementMode { mode } => self.movement.set_movement_mode(mode),
                Effect::AddCharacterWorldOffset { offset } => {
                    self.movement.add_world_offset(offset);
                }
                Effect::PlayHapticEffect { hand, effect } => match self.player_controller.as_mut() {
                    Some(pc) => pc.play_haptic_effect(&effect, hand),
                    None => climb_log!(DEBUG, "no player controller for {:?} hand haptics", hand),
                },
            }
        }
    }

    fn sync_hand_poses(&mut self) {
        let root = self.vr_root_location();
        if let Some(hands) = self.hands.as_mut() {
            for hand in [Handedness::Left, Handedness::Right] {
                let tracked = self.tracking.hand(hand);
                hands
                    .hand_mut(hand)
                    .set_world_pose(root + tracked.position, tracked.rotation);
            }
        }
    }

    pub fn location(&self) -> Vector3<f32> {
        self.movement.location()
    }

    pub fn movement_mode(&self) -> MovementMode {
        self.movement.movement_mode()
    }

    pub fn movement(&self) -> &CharacterMovement {
        &self.movement
    }

    pub fn vr_root_offset(&self) -> Vector3<f32> {
        self.vr_root_offset
    }

    pub fn vr_root_location(&self) -> Vector3<f32> {
        self.movement.location() + self.vr_root_offset
    }

    pub fn camera_location(&self) -> Vector3<f32> {
        self.vr_root_location() + self.tracking.head.position
    }

    pub fn camera_view(&self) -> CameraView {
        CameraView {
            location: self.camera_location(),
            rotation: self.tracking.head.rotation,
        }
    }

    pub fn hands(&self) -> Option<&HandPair> {
        self.hands.as_ref()
    }

    pub fn teleport(&self) -> &TeleportSystem {
        &self.teleport
    }

    pub fn vignette(&self) -> &Vignette {
        &self.vignette
    }

    pub fn pending_timer_count(&self) -> usize {
        self.timers.pending_count()
    }

    pub fn player_controller(&self) -> Option<&dyn PlayerController> {
        self.player_controller.as_deref()
    }
}

fn player_controller_mut(
    player_controller: &mut Option<Box<dyn PlayerController>>,
) -> Option<&mut dyn PlayerController> {
    match player_controller {
        Some(pc) => Some(&mut **pc),
        None => None,
    }
}

/// Project onto the horizontal plane, keeping unit length.
fn flatten(v: Vector3<f32>) -> Vector3<f32> {
    let flat = vec3(v.x, 0.0, v.z);
    if flat.magnitude2() <= f32::EPSILON {
        return flat;
    }
    flat.normalize()
}

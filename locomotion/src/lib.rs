pub mod character;
pub mod config;
pub mod effect;
pub mod error;
pub mod hand_controller;
pub mod haptics;
pub mod input_context;
pub mod navigation;
pub mod physics;
pub mod player_controller;
pub mod teleport;
pub mod vignette;
pub mod vr_character;
pub mod vr_config;

pub use character::{CharacterConfig, CharacterMovement, MovementMode};
pub use config::{InputBindings, LocomotionConfig};
pub use effect::Effect;
pub use error::{LocomotionError, Result};
pub use hand_controller::{HandConfig, HandController, HandPair};
pub use haptics::HapticEffect;
pub use input_context::InputContext;
pub use navigation::{NavMesh, NavigationQuery};
pub use physics::{ActorId, ActorTags, PhysicsWorld, WorldQuery};
pub use player_controller::{CameraView, LocalPlayerController, PlayerController};
pub use teleport::{TeleportConfig, TeleportMode, TeleportSystem};
pub use vignette::{Vignette, VignetteConfig};
pub use vr_character::VRCharacter;
pub use vr_config::Handedness;

// VR teleport movement.
//
// The player aims with one controller; a projectile arc (or a straight ray)
// is traced through the world and its hit snapped onto the navmesh. A valid
// destination shows a marker and a drawn path, and releasing the teleport
// button fades the camera out, moves the character and fades back in.

pub mod path_renderer;
pub mod teleport_system;
pub mod trajectory;

pub use path_renderer::TeleportPathRenderer;
pub use teleport_system::{
    TeleportButton, TeleportConfig, TeleportDestination, TeleportMode, TeleportSystem,
};
pub use trajectory::{ArcTrajectory, TrajectoryHit};

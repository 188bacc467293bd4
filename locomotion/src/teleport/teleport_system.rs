use std::time::Duration;

use cgmath::{Vector3, vec3};
use engine::{AssetRef, scene::SceneObject, teleport_log};
use serde::{Deserialize, Serialize};

use crate::{
    character::CharacterMovement,
    input_context::Hand,
    navigation::NavigationQuery,
    physics::{ActorTags, WorldQuery},
    player_controller::PlayerController,
    vr_config::Handedness,
};

use super::{ArcTrajectory, TeleportPathRenderer};

const FADE_COLOR: Vector3<f32> = vec3(0.0, 0.0, 0.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeleportMode {
    /// Ballistic projectile trace
    Arc,
    /// Straight line of `max_teleport_distance`
    Ray,
}

/// Button mapping options for teleport activation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeleportButton {
    Trigger,
    AButton,
    Squeeze,
}

/// Configuration for the teleport system
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TeleportConfig {
    pub enabled: bool,
    pub mode: TeleportMode,
    pub projectile_radius: f32,
    pub projectile_speed: f32,
    pub max_sim_time: f32,
    pub sim_frequency: f32,
    pub gravity: f32,
    /// Half-size of the box a hit may be snapped within onto the navmesh
    pub projection_extent: Vector3<f32>,
    pub max_teleport_distance: f32,
    pub fade_out_duration: f32,
    pub fade_in_duration: f32,
    pub marker_mesh: Option<AssetRef>,
    pub arc_mesh: Option<AssetRef>,
    pub arc_material: Option<AssetRef>,
    pub aim_hand: Handedness,
    pub button_mapping: TeleportButton,
    pub trigger_threshold: f32,
}

impl Default for TeleportConfig {
    fn default() -> Self {
        TeleportConfig {
            enabled: true,
            mode: TeleportMode::Arc,
            projectile_radius: 0.05,
            projectile_speed: 10.0,
            max_sim_time: 5.0,
            sim_frequency: 15.0,
            gravity: 9.8,
            projection_extent: vec3(1.0, 1.0, 1.0),
            max_teleport_distance: 20.0,
            fade_out_duration: 0.5,
            fade_in_duration: 0.5,
            marker_mesh: Some(AssetRef::new("SM_DestinationMarker")),
            arc_mesh: Some(AssetRef::new("SM_TeleportArc")),
            arc_material: Some(AssetRef::new("M_TeleportArc")),
            aim_hand: Handedness::Left,
            button_mapping: TeleportButton::Trigger,
            trigger_threshold: 0.5,
        }
    }
}

impl TeleportConfig {
    /// Analog value of the button mapped to teleport on `hand`
    pub fn button_value(&self, hand: &Hand) -> f32 {
        match self.button_mapping {
            TeleportButton::Trigger => hand.trigger_value,
            TeleportButton::AButton => hand.a_value,
            TeleportButton::Squeeze => hand.squeeze_value,
        }
    }
}

/// A navigable teleport target and the path that reached it.
#[derive(Clone, Debug)]
pub struct TeleportDestination {
    pub location: Vector3<f32>,
    pub path: Vec<Vector3<f32>>,
}

/// Destination search, preview and the fade-out/move/fade-in sequence.
pub struct TeleportSystem {
    config: TeleportConfig,
    destination_marker: SceneObject,
    path_renderer: TeleportPathRenderer,
}

impl TeleportSystem {
    pub fn new(config: TeleportConfig) -> Self {
        let path_renderer =
            TeleportPathRenderer::new(config.arc_mesh.clone(), config.arc_material.clone());
        let mut destination_marker = SceneObject::new(config.marker_mesh.clone(), None);
        destination_marker.set_visibility(false);

        TeleportSystem {
            config,
            destination_marker,
            path_renderer,
        }
    }

    pub fn with_default_config() -> Self {
        Self::new(TeleportConfig::default())
    }

    pub fn config(&self) -> &TeleportConfig {
        &self.config
    }

    pub fn destination_marker(&self) -> &SceneObject {
        &self.destination_marker
    }

    pub fn path_renderer(&self) -> &TeleportPathRenderer {
        &self.path_renderer
    }

    pub fn hide_destination_marker(&mut self) {
        self.destination_marker.set_visibility(false);
    }

    /// Trace from `start` along `direction` and snap the hit onto the navmesh.
    /// Both the trace and the projection have to succeed.
    pub fn find_teleport_destination(
        &self,
        world: &dyn WorldQuery,
        nav: &dyn NavigationQuery,
        start: Vector3<f32>,
        direction: Vector3<f32>,
    ) -> Option<TeleportDestination> {
        let trajectory = match self.config.mode {
            TeleportMode::Arc => {
                ArcTrajectory::predict_arc(world, start, direction, &self.config, ActorTags::PLAYER)
            }
            TeleportMode::Ray => ArcTrajectory::trace_ray(
                world,
                start,
                direction,
                self.config.max_teleport_distance,
                ActorTags::PLAYER,
            ),
        };

        let hit = trajectory.hit?;
        teleport_log!(
            TRACE,
            "teleport trace hit {} at {:?}",
            world.actor_name(hit.actor).unwrap_or("<unnamed>"),
            hit.location
        );

        let Some(location) = nav.project_point(hit.location, self.config.projection_extent) else {
            teleport_log!(TRACE, "hit at {:?} is off the navmesh", hit.location);
            return None;
        };

        Some(TeleportDestination {
            location,
            path: trajectory.points,
        })
    }

    /// Show the marker and path for a valid destination, hide both otherwise.
    /// Returns whether a destination was found.
    pub fn update_destination_marker(
        &mut self,
        world: &dyn WorldQuery,
        nav: &dyn NavigationQuery,
        start: Vector3<f32>,
        direction: Vector3<f32>,
    ) -> bool {
        let destination = if self.config.enabled {
            self.find_teleport_destination(world, nav, start, direction)
        } else {
            None
        };

        match destination {
            Some(destination) => {
                self.destination_marker.set_visibility(true);
                self.destination_marker.set_world_location(destination.location);
                self.path_renderer.draw_teleport_path(&destination.path);
                true
            }
            None => {
                self.destination_marker.set_visibility(false);
                self.path_renderer.hide_teleport_path();
                false
            }
        }
    }

    /// Start fading out toward a teleport. Returns how long until the move
    /// should happen, or `None` when there is nowhere valid to go.
    pub fn begin_teleport(&mut self, player_controller: Option<&mut dyn PlayerController>) -> Option<Duration> {
        if !self.destination_marker.is_visible() {
            teleport_log!(DEBUG, "teleport ignored, no valid destination");
            return None;
        }

        let delay = match Duration::try_from_secs_f32(self.config.fade_out_duration.max(0.0)) {
            Ok(delay) => delay,
            Err(err) => {
                teleport_log!(
                    WARN,
                    "teleport ignored, bad fade out duration {}: {}",
                    self.config.fade_out_duration,
                    err
                );
                return None;
            }
        };

        teleport_log!(
            INFO,
            "teleport to {:?} started",
            self.destination_marker.get_world_position()
        );
        self.start_fade(player_controller, 0.0, 1.0, self.config.fade_out_duration);
        Some(delay)
    }

    /// Move the character onto the marker, capsule resting on the ground,
    /// and fade back in.
    pub fn finish_teleport(
        &mut self,
        movement: &mut CharacterMovement,
        player_controller: Option<&mut dyn PlayerController>,
    ) {
        let mut destination = self.destination_marker.get_world_position();
        destination.y += movement.capsule_half_height();
        movement.set_location(destination);
        teleport_log!(INFO, "teleported to {:?}", destination);

        self.start_fade(player_controller, 1.0, 0.0, self.config.fade_in_duration);
    }

    fn start_fade(
        &self,
        player_controller: Option<&mut dyn PlayerController>,
        from_alpha: f32,
        to_alpha: f32,
        duration: f32,
    ) {
        match player_controller {
            Some(pc) => pc.start_camera_fade(from_alpha, to_alpha, duration, FADE_COLOR),
            None => teleport_log!(WARN, "no player controller, skipping camera fade"),
        }
    }
}

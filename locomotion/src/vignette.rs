//! Comfort vignette ("blinkers").
//!
//! A post-process material narrows the view while the character moves. Its
//! `Radius` shrinks with speed and its `Center` follows the point on screen
//! the character is travelling toward.

use cgmath::{InnerSpace, Rotation, Vector2, Vector3};
use engine::{AssetRef, FloatCurve, comfort_log};
use serde::{Deserialize, Serialize};

use crate::{
    input_context::FORWARD,
    player_controller::{CameraView, PlayerController},
};

const SCREEN_CENTER: Vector2<f32> = Vector2::new(0.5, 0.5);

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct VignetteConfig {
    /// Base post-process material; without one the vignette stays off
    pub blinker_material: Option<AssetRef>,
    /// Speed in m/s to vignette radius in normalized screen units
    pub radius_vs_velocity: Option<FloatCurve>,
    /// How far ahead of the camera the travel direction is sampled, in meters
    pub stationary_distance: f32,
    pub initial_radius: f32,
}

impl Default for VignetteConfig {
    fn default() -> Self {
        VignetteConfig {
            blinker_material: Some(AssetRef::new("M_TunnelVision")),
            radius_vs_velocity: Some(FloatCurve::from_pairs(&[(0.0, 1.0), (1.0, 0.6), (3.0, 0.4)])),
            stationary_distance: 10.0,
            initial_radius: 0.4,
        }
    }
}

/// Dynamic instance of the blinker material and its two parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct BlinkerMaterial {
    pub base: AssetRef,
    pub radius: f32,
    pub center: Vector2<f32>,
}

pub struct Vignette {
    config: VignetteConfig,
    material: Option<BlinkerMaterial>,
}

impl Vignette {
    pub fn new(config: VignetteConfig) -> Self {
        Self {
            config,
            material: None,
        }
    }

    pub fn config(&self) -> &VignetteConfig {
        &self.config
    }

    pub fn material(&self) -> Option<&BlinkerMaterial> {
        self.material.as_ref()
    }

    pub fn begin_play(&mut self) {
        self.material = match &self.config.blinker_material {
            Some(base) => {
                comfort_log!(DEBUG, "blinker material instance created from {}", base);
                Some(BlinkerMaterial {
                    base: base.clone(),
                    radius: self.config.initial_radius,
                    center: SCREEN_CENTER,
                })
            }
            None => {
                comfort_log!(INFO, "no blinker material configured, vignette disabled");
                None
            }
        };
    }

    pub fn update(
        &mut self,
        velocity: Vector3<f32>,
        camera: &CameraView,
        player_controller: Option<&dyn PlayerController>,
    ) {
        let center = self.get_blinker_center(velocity, camera, player_controller);

        let Some(material) = self.material.as_mut() else {
            return;
        };

        match &self.config.radius_vs_velocity {
            Some(curve) => material.radius = curve.value_at(velocity.magnitude()),
            None => comfort_log!(TRACE, "no radius curve, keeping radius {}", material.radius),
        }
        material.center = center;
    }

    /// Normalized screen position of the travel direction, `(0.5, 0.5)` when
    /// it cannot be determined.
    pub fn get_blinker_center(
        &self,
        velocity: Vector3<f32>,
        camera: &CameraView,
        player_controller: Option<&dyn PlayerController>,
    ) -> Vector2<f32> {
        if velocity.magnitude2() <= f32::EPSILON {
            return SCREEN_CENTER;
        }
        let direction = velocity.normalize();

        // Sample in front of the camera, so reversing still steers the centre
        let forward = camera.rotation.rotate_vector(FORWARD);
        let stationary_location = if forward.dot(direction) > 0.0 {
            camera.location + direction * self.config.stationary_distance
        } else {
            camera.location - direction * self.config.stationary_distance
        };

        let Some(pc) = player_controller else {
            return SCREEN_CENTER;
        };

        let (width, height) = pc.viewport_size();
        if width == 0 || height == 0 {
            return SCREEN_CENTER;
        }

        match pc.project_world_location_to_screen(camera, stationary_location) {
            Some(screen) => {
                comfort_log!(TRACE, "blinker screen location {:?}", screen);
                Vector2::new(screen.x / width as f32, screen.y / height as f32)
            }
            None => SCREEN_CENTER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player_controller::LocalPlayerController;
    use cgmath::{One, Quaternion, vec3};

    fn camera() -> CameraView {
        CameraView {
            location: vec3(0.0, 1.7, 0.0),
            rotation: Quaternion::one(),
        }
    }

    fn assert_near(a: Vector2<f32>, b: Vector2<f32>) {
        assert!((a - b).magnitude() < 1e-4, "{a:?} != {b:?}");
    }

    fn vignette(config: VignetteConfig) -> Vignette {
        let mut vignette = Vignette::new(config);
        vignette.begin_play();
        vignette
    }

    #[test]
    fn test_begin_play_creates_material_with_initial_radius() {
        let vignette = vignette(VignetteConfig::default());

        let material = vignette.material().unwrap();
        assert_eq!(material.radius, 0.4);
        assert_eq!(material.center, SCREEN_CENTER);
    }

    #[test]
    fn test_missing_material_disables_vignette() {
        let mut vignette = vignette(VignetteConfig {
            blinker_material: None,
            ..VignetteConfig::default()
        });
        let pc = LocalPlayerController::new("player", (800, 600));

        vignette.update(vec3(1.0, 0.0, 0.0), &camera(), Some(&pc));
        assert!(vignette.material().is_none());
    }

    #[test]
    fn test_radius_follows_speed_curve() {
        let mut vignette = vignette(VignetteConfig::default());

        vignette.update(vec3(0.0, 0.0, -2.0), &camera(), None);
        assert!((vignette.material().unwrap().radius - 0.5).abs() < 1e-5);

        vignette.update(vec3(0.0, 0.0, 0.0), &camera(), None);
        assert!((vignette.material().unwrap().radius - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_missing_curve_keeps_radius() {
        let mut vignette = vignette(VignetteConfig {
            radius_vs_velocity: None,
            ..VignetteConfig::default()
        });
        let pc = LocalPlayerController::new("player", (1000, 1000));

        vignette.update(vec3(3.0, 0.0, -3.0), &camera(), Some(&pc));

        let material = vignette.material().unwrap();
        assert_eq!(material.radius, 0.4);
        assert!(material.center.x > 0.5);
    }

    #[test]
    fn test_centre_defaults() {
        let vignette = vignette(VignetteConfig::default());
        let pc = LocalPlayerController::new("player", (800, 600));

        // Standing still
        assert_near(vignette.get_blinker_center(vec3(0.0, 0.0, 0.0), &camera(), Some(&pc)), SCREEN_CENTER);
        // Moving, but nobody to project for
        assert_near(vignette.get_blinker_center(vec3(1.0, 0.0, -1.0), &camera(), None), SCREEN_CENTER);
    }

    #[test]
    fn test_centre_follows_travel_direction() {
        let vignette = vignette(VignetteConfig::default());
        let pc = LocalPlayerController::new("player", (1000, 1000));

        let ahead = vignette.get_blinker_center(vec3(0.0, 0.0, -2.0), &camera(), Some(&pc));
        assert_near(ahead, SCREEN_CENTER);

        let ahead_right = vignette.get_blinker_center(vec3(1.0, 0.0, -1.0), &camera(), Some(&pc));
        assert!(ahead_right.x > 0.5);
        assert!((ahead_right.y - 0.5).abs() < 1e-4);

        // Backing away still samples in front of the camera
        let backward = vignette.get_blinker_center(vec3(0.0, 0.0, 2.0), &camera(), Some(&pc));
        assert_near(backward, SCREEN_CENTER);

        // Backing away to the right: the sample lands ahead and to the left
        let back_right = vignette.get_blinker_center(vec3(1.0, 0.0, 1.0), &camera(), Some(&pc));
        assert!(back_right.x < 0.5);
    }
}

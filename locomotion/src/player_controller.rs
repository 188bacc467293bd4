use cgmath::{Deg, Matrix4, Quaternion, Vector2, Vector3, Vector4, perspective};
use engine::{CameraFade, locomotion_log};

use crate::{haptics::HapticEffect, vr_config::Handedness};

/// World-space pose of the camera a projection is made from.
#[derive(Clone, Copy, Debug)]
pub struct CameraView {
    pub location: Vector3<f32>,
    pub rotation: Quaternion<f32>,
}

/// The host's per-player services: haptics, the camera manager and the
/// viewport.
pub trait PlayerController {
    fn name(&self) -> &str;

    fn play_haptic_effect(&mut self, effect: &HapticEffect, hand: Handedness);

    /// Fade the screen from `from_alpha` to `to_alpha` (0 clear, 1 covered).
    fn start_camera_fade(&mut self, from_alpha: f32, to_alpha: f32, duration: f32, color: Vector3<f32>);

    fn viewport_size(&self) -> (u32, u32);

    /// Pixel position of `world_location` as seen from `view`, or `None` when
    /// the location is behind the camera.
    fn project_world_location_to_screen(
        &self,
        view: &CameraView,
        world_location: Vector3<f32>,
    ) -> Option<Vector2<f32>>;

    fn camera_fade(&self) -> Option<&CameraFade> {
        None
    }

    fn tick(&mut self, _delta_seconds: f32) {}
}

#[derive(Clone, Debug, PartialEq)]
pub struct HapticRequest {
    pub hand: Handedness,
    pub effect: HapticEffect,
}

/// Player controller for a locally simulated player.
///
/// Haptics are recorded rather than played, the fade runs on an
/// `engine::CameraFade`, and projection uses a symmetric perspective frustum.
pub struct LocalPlayerController {
    name: String,
    viewport: (u32, u32),
    fov_y: Deg<f32>,
    near: f32,
    far: f32,
    fade: CameraFade,
    haptic_requests: Vec<HapticRequest>,
}

impl LocalPlayerController {
    pub fn new(name: impl Into<String>, viewport: (u32, u32)) -> Self {
        Self {
            name: name.into(),
            viewport,
            fov_y: Deg(90.0),
            near: 0.1,
            far: 1000.0,
            fade: CameraFade::new(),
            haptic_requests: Vec::new(),
        }
    }

    pub fn haptic_requests(&self) -> &[HapticRequest] {
        &self.haptic_requests
    }

    fn view_projection(&self, view: &CameraView) -> Matrix4<f32> {
        let (width, height) = self.viewport;
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        let projection = perspective(self.fov_y, aspect, self.near, self.far);
        let view_matrix = Matrix4::from(view.rotation.conjugate())
            * Matrix4::from_translation(-view.location);
        projection * view_matrix
    }
}

impl PlayerController for LocalPlayerController {
    fn name(&self) -> &str {
        &self.name
    }

    fn play_haptic_effect(&mut self, effect: &HapticEffect, hand: Handedness) {
        locomotion_log!(
            DEBUG,
            "{}: haptic {} on {:?} hand (amplitude {})",
            self.name,
            effect.asset,
            hand,
            effect.amplitude
        );
        self.haptic_requests.push(HapticRequest {
            hand,
            effect: effect.clone(),
        });
    }

    fn start_camera_fade(&mut self, from_alpha: f32, to_alpha: f32, duration: f32, color: Vector3<f32>) {
        locomotion_log!(
            DEBUG,
            "{}: camera fade {} -> {} over {}s",
            self.name,
            from_alpha,
            to_alpha,
            duration
        );
        self.fade.start(from_alpha, to_alpha, duration, color);
    }

    fn viewport_size(&self) -> (u32, u32) {
        self.viewport
    }

    fn project_world_location_to_screen(
        &self,
        view: &CameraView,
        world_location: Vector3<f32>,
    ) -> Option<Vector2<f32>> {
        let clip = self.view_projection(view) * world_location.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }

        let Vector4 { x, y, w, .. } = clip;
        let (width, height) = self.viewport;
        let ndc_x = x / w;
        let ndc_y = y / w;
        // Screen space grows right and down
        Some(Vector2::new(
            (ndc_x * 0.5 + 0.5) * width as f32,
            (0.5 - ndc_y * 0.5) * height as f32,
        ))
    }

    fn camera_fade(&self) -> Option<&CameraFade> {
        Some(&self.fade)
    }

    fn tick(&mut self, delta_seconds: f32) {
        self.fade.tick(delta_seconds);
    }
}

use cgmath::{vec3, Vector3};

/// Full-screen fade driven by the player camera manager.
///
/// Alpha 0 is fully transparent, alpha 1 is fully covered by `color`.
#[derive(Clone, Debug)]
pub struct CameraFade {
    from_alpha: f32,
    to_alpha: f32,
    duration: f32,
    elapsed: f32,
    color: Vector3<f32>,
    active: bool,
}

impl CameraFade {
    pub fn new() -> Self {
        Self {
            from_alpha: 0.0,
            to_alpha: 0.0,
            duration: 0.0,
            elapsed: 0.0,
            color: vec3(0.0, 0.0, 0.0),
            active: false,
        }
    }

    pub fn start(&mut self, from_alpha: f32, to_alpha: f32, duration: f32, color: Vector3<f32>) {
        self.from_alpha = from_alpha.clamp(0.0, 1.0);
        self.to_alpha = to_alpha.clamp(0.0, 1.0);
        self.duration = duration.max(0.0);
        self.elapsed = 0.0;
        self.color = color;
        self.active = true;
    }

    pub fn tick(&mut self, delta_seconds: f32) {
        if !self.active {
            return;
        }
        self.elapsed = (self.elapsed + delta_seconds).min(self.duration);
        if self.elapsed >= self.duration {
            self.active = false;
        }
    }

    pub fn alpha(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to_alpha;
        }
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.from_alpha + (self.to_alpha - self.from_alpha) * t
    }

    pub fn color(&self) -> Vector3<f32> {
        self.color
    }

    /// True while the fade is still interpolating.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Default for CameraFade {
    fn default() -> Self {
        Self::new()
    }
}

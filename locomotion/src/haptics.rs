use engine::AssetRef;
use serde::{Deserialize, Serialize};

/// A haptic effect asset plus how hard and how long to play it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HapticEffect {
    pub asset: AssetRef,
    #[serde(default = "default_amplitude")]
    pub amplitude: f32,
    #[serde(default = "default_duration")]
    pub duration: f32,
}

fn default_amplitude() -> f32 {
    0.6
}

fn default_duration() -> f32 {
    0.1
}

impl HapticEffect {
    pub fn new(asset: impl Into<String>) -> Self {
        Self {
            asset: AssetRef::new(asset),
            amplitude: default_amplitude(),
            duration: default_duration(),
        }
    }
}

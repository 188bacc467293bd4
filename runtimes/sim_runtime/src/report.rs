// Serializable views of the simulation for logging and the final summary.

use cgmath::{InnerSpace, Vector3};
use engine::Time;
use locomotion::{MovementMode, VRCharacter};
use serde::Serialize;

use crate::scenario::Scenario;

/// Character state after one frame
#[derive(Debug, Serialize)]
pub struct FrameSnapshot {
    pub frame: u32,
    pub time: f32,
    pub location: [f32; 3],
    pub movement_mode: String,
    pub climbing: bool,
    pub marker_visible: bool,
    pub path_segments: usize,
    pub vignette_radius: Option<f32>,
    pub fade_alpha: Option<f32>,
}

impl FrameSnapshot {
    pub fn capture(frame: u32, time: &Time, character: &VRCharacter) -> Self {
        let teleport = character.teleport();
        FrameSnapshot {
            frame,
            time: time.total.as_secs_f32(),
            location: character.location().into(),
            movement_mode: format!("{:?}", character.movement_mode()),
            climbing: character.hands().is_some_and(|hands| hands.is_climbing()),
            marker_visible: teleport.destination_marker().is_visible(),
            path_segments: teleport.path_renderer().visible_segment_count(),
            vignette_radius: character.vignette().material().map(|material| material.radius),
            fade_alpha: character
                .player_controller()
                .and_then(|pc| pc.camera_fade())
                .map(|fade| fade.alpha()),
        }
    }
}

/// What one scenario run did overall
#[derive(Debug, Serialize)]
pub struct ScenarioSummary {
    pub scenario: Scenario,
    pub frames: u32,
    pub start: [f32; 3],
    pub end: [f32; 3],
    pub distance_travelled: f32,
    pub max_height: f32,
    pub final_mode: String,
    pub path_pool_size: usize,
}

pub struct SummaryBuilder {
    scenario: Scenario,
    frames: u32,
    start: Vector3<f32>,
    last: Vector3<f32>,
    distance_travelled: f32,
    max_height: f32,
}

impl SummaryBuilder {
    pub fn new(scenario: Scenario, start: Vector3<f32>) -> Self {
        SummaryBuilder {
            scenario,
            frames: 0,
            start,
            last: start,
            distance_travelled: 0.0,
            max_height: start.y,
        }
    }

    pub fn record(&mut self, location: Vector3<f32>) {
        self.frames += 1;
        self.distance_travelled += (location - self.last).magnitude();
        self.max_height = self.max_height.max(location.y);
        self.last = location;
    }

    pub fn finish(self, final_mode: MovementMode, path_pool_size: usize) -> ScenarioSummary {
        ScenarioSummary {
            scenario: self.scenario,
            frames: self.frames,
            start: self.start.into(),
            end: self.last.into(),
            distance_travelled: self.distance_travelled,
            max_height: self.max_height,
            final_mode: format!("{:?}", final_mode),
            path_pool_size,
        }
    }
}

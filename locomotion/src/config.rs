use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    character::CharacterConfig,
    error::{LocomotionError, Result},
    hand_controller::HandConfig,
    teleport::TeleportConfig,
    vignette::VignetteConfig,
    vr_config::Handedness,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputBindings {
    /// Hand whose thumbstick drives the Forward/Right axes
    pub movement_hand: Handedness,
    /// Squeeze value at which a hand grips
    pub grip_threshold: f32,
    /// Thumbstick deflection below which the axes read zero
    pub dead_zone: f32,
}

impl Default for InputBindings {
    fn default() -> Self {
        Self {
            movement_hand: Handedness::Right,
            grip_threshold: 0.5,
            dead_zone: 0.15,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    pub teleport: TeleportConfig,
    pub vignette: VignetteConfig,
    pub character: CharacterConfig,
    pub hands: HandConfig,
    pub input: InputBindings,
}

impl LocomotionConfig {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        // Try to load from default locations
        let default_paths = ["locomotion.toml", "config/locomotion.toml"];
        for path in &default_paths {
            let path = Path::new(path);
            if path.exists() {
                return Self::load_from_file(path);
            }
        }

        // No config file found, use defaults
        Ok(Self::default())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| LocomotionError::Io {
            operation: format!("read config file {}", path.display()),
            source,
        })?;

        Self::from_toml_str(&content, path)
    }

    /// Parse and validate; `origin` is only used in error messages.
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self> {
        let config: LocomotionConfig =
            toml::from_str(content).map_err(|err| LocomotionError::Config {
                path: PathBuf::from(origin),
                reason: err.to_string(),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|err| LocomotionError::Config {
            path: PathBuf::from(path),
            reason: err.to_string(),
        })?;

        std::fs::write(path, content).map_err(|source| LocomotionError::Io {
            operation: format!("write config file {}", path.display()),
            source,
        })
    }

    pub fn validate(&self) -> Result<()> {
        let teleport = &self.teleport;
        positive("teleport.projectile_speed", teleport.projectile_speed)?;
        positive("teleport.max_sim_time", teleport.max_sim_time)?;
        positive("teleport.sim_frequency", teleport.sim_frequency)?;
        positive("teleport.max_teleport_distance", teleport.max_teleport_distance)?;
        positive("teleport.fade_out_duration", teleport.fade_out_duration)?;
        positive("teleport.fade_in_duration", teleport.fade_in_duration)?;
        non_negative("teleport.projectile_radius", teleport.projectile_radius)?;
        non_negative("teleport.gravity", teleport.gravity)?;
        non_negative("teleport.projection_extent.x", teleport.projection_extent.x)?;
        non_negative("teleport.projection_extent.y", teleport.projection_extent.y)?;
        non_negative("teleport.projection_extent.z", teleport.projection_extent.z)?;
        unit_interval("teleport.trigger_threshold", teleport.trigger_threshold)?;

        let vignette = &self.vignette;
        positive("vignette.stationary_distance", vignette.stationary_distance)?;
        non_negative("vignette.initial_radius", vignette.initial_radius)?;
        if let Some(curve) = &vignette.radius_vs_velocity {
            if !curve.is_sorted() {
                return Err(LocomotionError::validation(
                    "vignette.radius_vs_velocity",
                    "curve keys must be sorted by time",
                ));
            }
        }

        let character = &self.character;
        positive("character.capsule_half_height", character.capsule_half_height)?;
        non_negative("character.capsule_radius", character.capsule_radius)?;
        positive("character.max_walk_speed", character.max_walk_speed)?;
        positive("character.max_fly_speed", character.max_fly_speed)?;
        non_negative("character.gravity", character.gravity)?;
        non_negative("character.step_height", character.step_height)?;

        non_negative("hands.grab_radius", self.hands.grab_radius)?;

        unit_interval("input.grip_threshold", self.input.grip_threshold)?;
        if !(0.0..1.0).contains(&self.input.dead_zone) {
            return Err(LocomotionError::validation(
                "input.dead_zone",
                format!("must be in [0, 1), got {}", self.input.dead_zone),
            ));
        }

        Ok(())
    }
}

fn positive(item: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LocomotionError::validation(item, format!("must be positive and finite, got {value}")))
    }
}

fn non_negative(item: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LocomotionError::validation(
            item,
            format!("must be finite and not negative, got {value}"),
        ))
    }
}

fn unit_interval(item: &str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(LocomotionError::validation(item, format!("must be in [0, 1], got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::teleport::{TeleportButton, TeleportMode};

    fn parse(content: &str) -> Result<LocomotionConfig> {
        LocomotionConfig::from_toml_str(content, Path::new("test.toml"))
    }

    fn rejected_item(content: &str) -> String {
        match parse(content) {
            Err(LocomotionError::Validation { item, .. }) => item,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = LocomotionConfig::default();
        assert_eq!(config.teleport.mode, TeleportMode::Arc);
        assert_eq!(config.teleport.projectile_speed, 10.0);
        assert_eq!(config.character.capsule_half_height, 0.88);
        assert_eq!(config.vignette.stationary_distance, 10.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = parse(
            r#"
            [teleport]
            mode = "ray"
            max_teleport_distance = 12.5
            aim_hand = "right"
            button_mapping = "a_button"
            projection_extent = { x = 0.5, y = 2.0, z = 0.5 }

            [vignette]
            radius_vs_velocity = [
                { time = 0.0, value = 1.0 },
                { time = 2.0, value = 0.3 },
            ]

            [hands]
            hand_hold_rumble = { asset = "SoftRumble", amplitude = 0.2 }
            "#,
        )
        .unwrap();

        assert_eq!(config.teleport.mode, TeleportMode::Ray);
        assert_eq!(config.teleport.max_teleport_distance, 12.5);
        assert_eq!(config.teleport.aim_hand, Handedness::Right);
        assert_eq!(config.teleport.button_mapping, TeleportButton::AButton);
        assert_eq!(config.teleport.projection_extent.y, 2.0);
        assert_eq!(config.teleport.projectile_speed, 10.0);

        let curve = config.vignette.radius_vs_velocity.unwrap();
        assert!((curve.value_at(1.0) - 0.65).abs() < 1e-5);

        let rumble = config.hands.hand_hold_rumble.unwrap();
        assert_eq!(rumble.asset.name(), "SoftRumble");
        assert_eq!(rumble.amplitude, 0.2);
        assert_eq!(rumble.duration, 0.1);
        assert_eq!(config.character.max_walk_speed, 3.0);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert_eq!(
            rejected_item("[teleport]\nsim_frequency = 0.0"),
            "teleport.sim_frequency"
        );
        assert_eq!(
            rejected_item("[teleport]\nprojectile_radius = -0.1"),
            "teleport.projectile_radius"
        );
        assert_eq!(
            rejected_item("[character]\nmax_walk_speed = -1.0"),
            "character.max_walk_speed"
        );
        assert_eq!(rejected_item("[input]\ndead_zone = 1.0"), "input.dead_zone");
        assert_eq!(
            rejected_item(
                "[vignette]\nradius_vs_velocity = [{ time = 2.0, value = 0.3 }, { time = 0.0, value = 1.0 }]"
            ),
            "vignette.radius_vs_velocity"
        );
    }

    #[test]
    fn test_validation_rejects_non_finite_values() {
        assert_eq!(
            rejected_item("[teleport]\nfade_out_duration = inf"),
            "teleport.fade_out_duration"
        );
        assert_eq!(
            rejected_item("[teleport]\nmax_sim_time = inf"),
            "teleport.max_sim_time"
        );
        assert_eq!(rejected_item("[teleport]\ngravity = nan"), "teleport.gravity");
        assert_eq!(
            rejected_item("[vignette]\ninitial_radius = inf"),
            "vignette.initial_radius"
        );
    }

    #[test]
    fn test_malformed_toml_is_a_config_error() {
        match parse("[teleport\nmode = ") {
            Err(LocomotionError::Config { path, .. }) => assert_eq!(path, PathBuf::from("test.toml")),
            other => panic!("expected a config error, got {other:?}"),
        }
        assert!(matches!(
            parse("[teleport]\nmode = \"hover\""),
            Err(LocomotionError::Config { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let result = LocomotionConfig::load(Some(Path::new("/nonexistent/locomotion.toml")));
        assert!(matches!(result, Err(LocomotionError::Io { .. })));
    }

    #[test]
    fn test_saved_file_loads_back() {
        let path = std::env::temp_dir().join(format!("locomotion-{}.toml", std::process::id()));
        let mut config = LocomotionConfig::default();
        config.teleport.fade_out_duration = 0.3;
        config.input.movement_hand = Handedness::Left;

        config.save(&path).unwrap();
        let loaded = LocomotionConfig::load(Some(&path)).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.teleport.fade_out_duration, 0.3);
        assert_eq!(loaded.input.movement_hand, Handedness::Left);
    }
}

//! Game configuration loaded from JSON.
//!
//! Every section is `#[serde(default)]`, so a config file only needs the
//! values it overrides.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::math::Vec2;

/// Default location of the game config, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/game.json";

/// Environment variable overriding [`DEFAULT_CONFIG_PATH`].
pub const CONFIG_ENV_VAR: &str = "BRICKRUN_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Virtual canvas width; the window is letterboxed onto it.
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub target_fps: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Brickrun".into(),
            width: 800,
            height: 600,
            vsync: true,
            target_fps: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LevelConfig {
    pub map_path: PathBuf,
    pub tile_size: f64,
    /// Columns of look-ahead on each side of the screen when culling blocks.
    pub chunk_size: u32,
    /// Level spawn used when the map has no `P` marker.
    pub player_start: (f64, f64),
    pub player_size: (f64, f64),
    pub enemy_size: (f64, f64),
    /// Falling below this y kills the player. Defaults to the bottom of the
    /// level or the screen, whichever is lower.
    pub kill_plane_y: Option<f64>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            map_path: PathBuf::from("assets/maps/level1.txt"),
            tile_size: 50.0,
            chunk_size: 40,
            player_start: (70.0, 500.0),
            player_size: (20.0, 50.0),
            enemy_size: (40.0, 40.0),
            kill_plane_y: None,
        }
    }
}

impl LevelConfig {
    pub fn player_start(&self) -> Vec2 {
        self.player_start.into()
    }

    pub fn player_size(&self) -> Vec2 {
        self.player_size.into()
    }

    pub fn enemy_size(&self) -> Vec2 {
        self.enemy_size.into()
    }
}

/// Platforming constants. Speeds are pixels per second, `y` grows downwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f64,
    pub max_fall_speed: f64,
    pub move_speed: f64,
    /// Vertical velocity set on jump (negative is up).
    pub jump_impulse: f64,
    /// Vertical velocity set after a stomp (negative is up).
    pub stomp_bounce: f64,
    pub enemy_speed: f64,
    /// Longest elapsed time simulated in a single step, in seconds.
    pub max_frame_time: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 1800.0,
            max_fall_speed: 900.0,
            move_speed: 250.0,
            jump_impulse: -700.0,
            stomp_bounce: -450.0,
            enemy_speed: 80.0,
            max_frame_time: 0.05,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RulesConfig {
    pub stomp_reward: i64,
    /// Fraction of an enemy's height, from the top, that counts as a stomp.
    pub top_zone_fraction: f64,
    /// Seconds spent in the Death state before respawning.
    pub respawn_delay: f64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            stomp_reward: 100,
            top_zone_fraction: 0.25,
            respawn_delay: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Free camera pan speed in pixels per second.
    pub pan_speed: f64,
    /// Multiplicative zoom change per scroll step.
    pub zoom_step: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            pan_speed: 300.0,
            zoom_step: 1.1,
            min_zoom: 0.25,
            max_zoom: 4.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub layout_path: Option<PathBuf>,
    /// TTF/OTF font used for labels and buttons. Text is skipped without one.
    pub font_path: Option<PathBuf>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            layout_path: Some(PathBuf::from("config/ui.json")),
            font_path: None,
        }
    }
}

/// Top-level game configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub level: LevelConfig,
    pub physics: PhysicsConfig,
    pub rules: RulesConfig,
    pub camera: CameraConfig,
    pub ui: UiConfig,
}

impl GameConfig {
    /// Load config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: GameConfig = load_json(path.as_ref())?;
        config.check();
        Ok(config)
    }

    /// Load config from a JSON file, falling back to defaults if the file is
    /// missing. A file that exists but fails to parse is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::warn!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Config path from [`CONFIG_ENV_VAR`], or [`DEFAULT_CONFIG_PATH`].
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Bottom of the playable area.
    pub fn kill_plane(&self, level_height: f64) -> f64 {
        self.level
            .kill_plane_y
            .unwrap_or_else(|| level_height.max(self.window.height as f64))
    }

    fn check(&self) {
        let max_step = self.physics.max_fall_speed * self.physics.max_frame_time;
        if max_step >= self.level.tile_size {
            log::warn!(
                "max_fall_speed * max_frame_time ({max_step}) reaches tile_size ({}); fast falls may pass through floors",
                self.level.tile_size
            );
        }
        if self.rules.top_zone_fraction <= 0.0 || self.rules.top_zone_fraction > 1.0 {
            log::warn!(
                "top_zone_fraction {} outside (0, 1]; stomps will be clamped",
                self.rules.top_zone_fraction
            );
        }
    }
}

pub(crate) fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "physics": {{ "gravity": 1000.0 }}, "rules": {{ "stomp_reward": 250 }} }}"#).unwrap();

        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.physics.gravity, 1000.0);
        assert_eq!(config.physics.move_speed, PhysicsConfig::default().move_speed);
        assert_eq!(config.rules.stomp_reward, 250);
        assert_eq!(config.level.tile_size, 50.0);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig::load_or_default(dir.path().join("nope.json")).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            GameConfig::load_or_default(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn kill_plane_defaults_to_lowest_bound() {
        let mut config = GameConfig::default();
        assert_eq!(config.kill_plane(400.0), 600.0);
        assert_eq!(config.kill_plane(1000.0), 1000.0);
        config.level.kill_plane_y = Some(750.0);
        assert_eq!(config.kill_plane(1000.0), 750.0);
    }

    #[test]
    fn defaults_cannot_tunnel_through_a_tile() {
        let config = GameConfig::default();
        assert!(config.physics.max_fall_speed * config.physics.max_frame_time < config.level.tile_size);
    }
}

//! Game configuration
//!
//! Loaded once at startup from an `entities.json` document. The simulation
//! only ever sees the parsed, validated [`Settings`] value.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;

use crate::components::{Color, EntityKind, Facing, HudElement, ObstacleKind};
use crate::consts::*;

/// Configuration shipped with the crate.
const BUILTIN_JSON: &str = include_str!("../assets/entities.json");

/// Failure to produce a usable [`Settings`] value. Fatal at startup.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// A 2D point as written in the configuration (`{ "x": .., "y": .. }`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl From<Point> for Vec2 {
    fn from(p: Point) -> Self {
        Vec2::new(p.x, p.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScreenSize {
    pub width: f32,
    pub height: f32,
}

/// Spawn-rate ramp and placement constants.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpawnTuning {
    /// Floor for the spawn interval (seconds)
    pub min_interval: f32,
    /// Interval decrement applied after each spawn
    pub interval_step: f32,
    /// Margin kept between a spawn coordinate and the playfield corners
    pub edge_margin: f32,
    /// Distance outside the edge where obstacles appear
    pub offscreen_offset: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            min_interval: MIN_SPAWN_INTERVAL,
            interval_step: SPAWN_INTERVAL_STEP,
            edge_margin: SPAWN_EDGE_MARGIN,
            offscreen_offset: SPAWN_OFFSCREEN_OFFSET,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    pub screen_size: ScreenSize,
    /// Base spawn interval in seconds
    #[serde(rename = "mobSpawnInterval")]
    pub spawn_interval: f32,
    pub score_per_second: f32,
    #[serde(default)]
    pub spawning: SpawnTuning,
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
}

fn default_target_fps() -> u32 {
    DEFAULT_TARGET_FPS
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteDef {
    pub texture: String,
    pub width: f32,
    pub height: f32,
    #[serde(default = "default_frame_count")]
    pub frame_count: u32,
    #[serde(default = "default_frame_time")]
    pub frame_time: f32,
    /// Defaults to `frame_count > 1` when absent
    #[serde(default)]
    pub animated: Option<bool>,
}

fn default_frame_count() -> u32 {
    1
}

fn default_frame_time() -> f32 {
    DEFAULT_FRAME_TIME
}

impl SpriteDef {
    pub fn is_animated(&self) -> bool {
        self.animated.unwrap_or(self.frame_count > 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColliderDef {
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub is_trigger: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerSprites {
    pub horizontal: SpriteDef,
    pub vertical: SpriteDef,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDef {
    pub start_position: Point,
    pub sprites: PlayerSprites,
    pub collider: ColliderDef,
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SpeedRange {
    pub min: f32,
    pub max: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObstacleDef {
    pub sprite: SpriteDef,
    pub collider: ColliderDef,
    pub speed_range: SpeedRange,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiElementDef {
    pub text: String,
    pub font: String,
    pub font_size: u32,
    #[serde(default)]
    pub color: Color,
    pub position: Point,
}

/// HUD elements keyed the way the configuration names them.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiDefs {
    pub score_display: Option<UiElementDef>,
    pub fps_display: Option<UiElementDef>,
    pub game_message: Option<UiElementDef>,
}

impl UiDefs {
    pub fn get(&self, element: HudElement) -> Option<&UiElementDef> {
        match element {
            HudElement::Score => self.score_display.as_ref(),
            HudElement::Fps => self.fps_display.as_ref(),
            HudElement::Message => self.game_message.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NamedAsset {
    pub name: String,
    pub file: String,
}

/// Mixer volumes, 0-128.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeSettings {
    pub music_volume: u8,
    pub sfx_volume: u8,
}

impl Default for VolumeSettings {
    fn default() -> Self {
        Self {
            music_volume: MAX_VOLUME,
            sfx_volume: MAX_VOLUME,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioDef {
    pub background_music: Option<NamedAsset>,
    #[serde(default)]
    pub sound_effects: BTreeMap<String, NamedAsset>,
    #[serde(default)]
    pub settings: VolumeSettings,
}

/// Parsed configuration document
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub game_settings: GameSettings,
    pub player: PlayerDef,
    /// Obstacle kinds by name. [`ObstacleKind`] indexes this map in key order.
    #[serde(rename = "mobs")]
    pub obstacles: BTreeMap<String, ObstacleDef>,
    #[serde(default)]
    pub ui: UiDefs,
    #[serde(default)]
    pub audio: AudioDef,
}

impl Settings {
    /// The configuration embedded in the crate.
    pub fn builtin() -> Result<Self, SettingsError> {
        Self::from_json(BUILTIN_JSON)
    }

    /// Read and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!(
            "Loaded settings from {} ({} obstacle kinds)",
            path.display(),
            settings.obstacles.len()
        );
        Ok(settings)
    }

    /// Parse and validate a configuration document.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the invariants the simulation relies on.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let game = &self.game_settings;
        if game.screen_size.width <= 0.0 || game.screen_size.height <= 0.0 {
            return Err(invalid("screen size must be positive"));
        }
        if game.spawn_interval <= 0.0 {
            return Err(invalid("mobSpawnInterval must be positive"));
        }
        if game.score_per_second < 0.0 {
            return Err(invalid("scorePerSecond must not be negative"));
        }
        if game.spawning.min_interval <= 0.0 || game.spawning.interval_step < 0.0 {
            return Err(invalid("spawning ramp must have a positive floor"));
        }
        let margin = game.spawning.edge_margin;
        if margin < 0.0
            || 2.0 * margin >= game.screen_size.width
            || 2.0 * margin >= game.screen_size.height
        {
            return Err(invalid(format!(
                "spawning.edgeMargin {margin} leaves no room along the screen edges"
            )));
        }
        if game.target_fps == 0 {
            return Err(invalid("targetFps must be positive"));
        }
        if self.obstacles.is_empty() {
            return Err(invalid("at least one mob kind is required"));
        }
        if self.obstacles.len() > usize::from(u16::MAX) {
            return Err(invalid("too many mob kinds"));
        }

        check_sprite("player.sprites.horizontal", &self.player.sprites.horizontal)?;
        check_sprite("player.sprites.vertical", &self.player.sprites.vertical)?;
        for (name, def) in &self.obstacles {
            check_sprite(&format!("mobs.{name}.sprite"), &def.sprite)?;
            if def.speed_range.min > def.speed_range.max {
                return Err(invalid(format!(
                    "mobs.{name}.speedRange: min {} exceeds max {}",
                    def.speed_range.min, def.speed_range.max
                )));
            }
        }
        Ok(())
    }

    pub fn screen_size(&self) -> Vec2 {
        let size = self.game_settings.screen_size;
        Vec2::new(size.width, size.height)
    }

    /// Resolve an obstacle name to its kind id.
    pub fn obstacle_kind(&self, name: &str) -> Option<ObstacleKind> {
        self.obstacles
            .keys()
            .position(|key| key == name)
            .and_then(|index| u16::try_from(index).ok())
            .map(ObstacleKind)
    }

    pub fn obstacle(&self, kind: ObstacleKind) -> Option<&ObstacleDef> {
        self.obstacles.values().nth(usize::from(kind.0))
    }

    pub fn obstacle_name(&self, kind: ObstacleKind) -> Option<&str> {
        self.obstacles
            .keys()
            .nth(usize::from(kind.0))
            .map(String::as_str)
    }

    /// Every configured obstacle kind, in id order.
    pub fn obstacle_kinds(&self) -> impl Iterator<Item = ObstacleKind> + '_ {
        (0..self.obstacles.len()).filter_map(|i| u16::try_from(i).ok().map(ObstacleKind))
    }

    /// Texture to show for an entity of `kind` moving with `facing`.
    pub fn texture_path(&self, kind: EntityKind, facing: Facing) -> Option<&str> {
        match kind {
            EntityKind::Player => {
                let sprites = &self.player.sprites;
                let def = match facing {
                    Facing::Horizontal => &sprites.horizontal,
                    Facing::Vertical => &sprites.vertical,
                };
                Some(def.texture.as_str())
            }
            EntityKind::Obstacle(kind) => self.obstacle(kind).map(|def| def.sprite.texture.as_str()),
            EntityKind::Hud(_) => None,
        }
    }
}

fn invalid(message: impl Into<String>) -> SettingsError {
    SettingsError::Invalid(message.into())
}

fn check_sprite(context: &str, sprite: &SpriteDef) -> Result<(), SettingsError> {
    if sprite.width <= 0.0 || sprite.height <= 0.0 {
        return Err(invalid(format!("{context}: sprite size must be positive")));
    }
    if sprite.is_animated() && sprite.frame_time <= 0.0 {
        return Err(invalid(format!("{context}: frameTime must be positive")));
    }
    Ok(())
}

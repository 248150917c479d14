//! Component records
//!
//! Plain data only. Systems in `sim` give them meaning.

use glam::Vec2;
use serde::Deserialize;

use crate::settings::{ColliderDef, SpriteDef};

/// World-space placement. Rotation is carried but not used by gameplay.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f32,
}

impl Transform {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
        }
    }
}

/// Direction of travel, not pre-scaled by [`Speed`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity(pub Vec2);

/// Scalar speed in world units per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Speed(pub f32);

/// Axis-aligned box centered on the entity's position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Collider {
    pub width: f32,
    pub height: f32,
    /// Present for completeness; collision logic ignores it.
    pub is_trigger: bool,
}

impl Collider {
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width, self.height) / 2.0
    }
}

impl From<&ColliderDef> for Collider {
    fn from(def: &ColliderDef) -> Self {
        Self {
            width: def.width,
            height: def.height,
            is_trigger: def.is_trigger,
        }
    }
}

/// Handle to a texture owned by the presentation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Display data for a sprite.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sprite {
    /// Resolved lazily by the render pass; `None` until loaded or if loading
    /// failed.
    pub texture: Option<TextureHandle>,
    pub width: f32,
    pub height: f32,
    pub frame_count: u32,
    /// Seconds each frame stays on screen.
    pub frame_time: f32,
    pub animated: bool,
    /// Path the current `texture` was loaded from. Cache key for reloads.
    pub asset_path: Option<String>,
}

impl Sprite {
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width, self.height) / 2.0
    }

    /// Whether the animation system should advance this sprite.
    pub fn is_animating(&self) -> bool {
        self.animated && self.frame_count > 1
    }
}

impl From<&SpriteDef> for Sprite {
    fn from(def: &SpriteDef) -> Self {
        Self {
            texture: None,
            width: def.width,
            height: def.height,
            frame_count: def.frame_count.max(1),
            frame_time: def.frame_time,
            animated: def.is_animated(),
            asset_path: None,
        }
    }
}

/// Animation playback state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Animation {
    pub current_frame: u32,
    /// Time accumulated toward the next frame advance.
    pub timer: f32,
}

/// Which sprite variant to use. Independent of the velocity sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Horizontal,
    Vertical,
}

/// Index of an obstacle kind in the loaded settings (sorted by name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObstacleKind(pub u16);

/// HUD text elements the game knows how to refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HudElement {
    Score,
    Fps,
    Message,
}

impl HudElement {
    pub const ALL: [HudElement; 3] = [HudElement::Score, HudElement::Fps, HudElement::Message];

    /// Key used in the configuration file.
    pub fn as_str(&self) -> &'static str {
        match self {
            HudElement::Score => "scoreDisplay",
            HudElement::Fps => "fpsDisplay",
            HudElement::Message => "gameMessage",
        }
    }
}

/// What an entity is, for presentation dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Obstacle(ObstacleKind),
    Hud(HudElement),
}

/// Marks the player entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerTag;

/// Marks obstacle entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObstacleTag;

/// Screen-space placement for HUD text, separate from world [`Transform`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UiPosition(pub Vec2);

/// RGBA color, 0-255 per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// Renderable HUD text.
#[derive(Debug, Clone, PartialEq)]
pub struct UiText {
    pub content: String,
    pub font_path: String,
    pub font_size: u32,
    pub color: Color,
    pub visible: bool,
}

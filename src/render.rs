//! Presentation sink contract, HUD refresh and the render pass
//!
//! The core never touches pixels. Each frame it refreshes HUD text from the
//! session, then hands a [`Presenter`] one draw request per visible sprite and
//! text entity:
//!
//! 1. `clear`
//! 2. `draw_sprite` for each entity with Transform + Sprite + EntityKind, in
//!    entity order
//! 3. `draw_text` for each visible HUD text
//! 4. `present`
//!
//! Textures are resolved lazily. The path for an entity's (kind, facing) comes
//! from the settings; when it differs from the path cached on the sprite the
//! presenter is asked to load it. A failed load leaves the sprite without a
//! texture and it simply isn't drawn.

use std::collections::BTreeMap;

use glam::Vec2;

use crate::components::*;
use crate::ecs::{EntityId, World};
use crate::settings::Settings;
use crate::sim::{GamePhase, Session};

pub const MENU_MESSAGE: &str = "Dodge the Creeps! Press SPACE to start";
pub const GAME_OVER_MESSAGE: &str = "Game Over! Press SPACE to restart";

/// One sprite to draw this frame
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteDraw {
    pub entity: EntityId,
    pub kind: EntityKind,
    pub facing: Facing,
    /// Frame index into the sprite sheet
    pub frame: u32,
    pub center: Vec2,
    pub size: Vec2,
    pub texture: TextureHandle,
    pub flip_x: bool,
    pub flip_y: bool,
}

/// One text to draw this frame
#[derive(Debug, Clone, PartialEq)]
pub struct TextDraw<'a> {
    pub entity: EntityId,
    pub content: &'a str,
    pub font_path: &'a str,
    pub font_size: u32,
    pub color: Color,
    /// Top-left corner in screen space
    pub position: Vec2,
}

/// Drawing backend
pub trait Presenter {
    /// Load a texture. `None` means the asset could not be loaded.
    fn load_texture(&mut self, path: &str) -> Option<TextureHandle>;
    fn clear(&mut self);
    fn draw_sprite(&mut self, sprite: &SpriteDraw);
    fn draw_text(&mut self, text: &TextDraw<'_>);
    fn present(&mut self);
}

/// Update HUD text content and visibility from the session.
pub fn refresh_hud(world: &mut World, session: &Session, fps: f32) {
    for (id, text) in world.ui_texts.iter_mut() {
        let Some(EntityKind::Hud(element)) = world.kinds.get(id) else {
            continue;
        };
        match element {
            HudElement::Score => text.content = format!("Score: {}", session.score),
            HudElement::Fps => text.content = format!("FPS: {}", fps as i32),
            HudElement::Message => match session.phase {
                GamePhase::Menu => {
                    text.content = MENU_MESSAGE.to_string();
                    text.visible = true;
                }
                GamePhase::Playing => text.visible = false,
                GamePhase::GameOver => {
                    text.content = GAME_OVER_MESSAGE.to_string();
                    text.visible = true;
                }
            },
        }
    }
}

/// Frame index to draw for a sprite.
pub fn display_frame(sprite: &Sprite, animation: Option<&Animation>) -> u32 {
    match animation {
        Some(animation) if sprite.is_animating() => animation.current_frame % sprite.frame_count,
        _ => 0,
    }
}

/// Mirror flags for a facing and direction of travel.
pub fn flips(facing: Facing, velocity: Vec2) -> (bool, bool) {
    match facing {
        Facing::Horizontal => (velocity.x < 0.0, false),
        Facing::Vertical => (false, velocity.y > 0.0),
    }
}

/// Resolve the texture for `sprite`, loading it only when the wanted path
/// changed since the last attempt.
fn resolve_texture(sprite: &mut Sprite, path: &str, presenter: &mut dyn Presenter) -> Option<TextureHandle> {
    if sprite.asset_path.as_deref() != Some(path) {
        sprite.texture = presenter.load_texture(path);
        if sprite.texture.is_none() {
            log::warn!("Failed to load texture '{}'", path);
        }
        sprite.asset_path = Some(path.to_string());
    }
    sprite.texture
}

/// Emit one frame of draw requests.
pub fn render_frame(world: &mut World, settings: &Settings, presenter: &mut dyn Presenter) {
    presenter.clear();

    for (id, sprite) in world.sprites.iter_mut() {
        let (Some(transform), Some(&kind)) = (world.transforms.get(id), world.kinds.get(id)) else {
            continue;
        };
        let facing = world.facings.get(id).copied().unwrap_or_default();
        let Some(path) = settings.texture_path(kind, facing) else {
            continue;
        };
        let Some(texture) = resolve_texture(sprite, path, presenter) else {
            continue;
        };

        let velocity = world.velocities.get(id).map(|v| v.0).unwrap_or(Vec2::ZERO);
        let (flip_x, flip_y) = flips(facing, velocity);
        presenter.draw_sprite(&SpriteDraw {
            entity: id,
            kind,
            facing,
            frame: display_frame(sprite, world.animations.get(id)),
            center: transform.position,
            size: Vec2::new(sprite.width, sprite.height),
            texture,
            flip_x,
            flip_y,
        });
    }

    for (id, text) in world.ui_texts.iter() {
        if !text.visible {
            continue;
        }
        let Some(position) = world.ui_positions.get(id) else {
            continue;
        };
        presenter.draw_text(&TextDraw {
            entity: id,
            content: &text.content,
            font_path: &text.font_path,
            font_size: text.font_size,
            color: text.color,
            position: position.0,
        });
    }

    presenter.present();
}

/// Headless presenter: hands out texture handles and logs each frame.
#[derive(Debug, Default)]
pub struct LogPresenter {
    textures: BTreeMap<String, TextureHandle>,
    frames: u64,
    sprites_this_frame: usize,
    texts_this_frame: Vec<String>,
}

impl LogPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Texts drawn in the last presented frame.
    pub fn last_texts(&self) -> &[String] {
        &self.texts_this_frame
    }
}

impl Presenter for LogPresenter {
    fn load_texture(&mut self, path: &str) -> Option<TextureHandle> {
        let next = TextureHandle(self.textures.len() as u32 + 1);
        let handle = *self.textures.entry(path.to_string()).or_insert(next);
        log::debug!("Texture '{}' -> {:?}", path, handle);
        Some(handle)
    }

    fn clear(&mut self) {
        self.sprites_this_frame = 0;
        self.texts_this_frame.clear();
    }

    fn draw_sprite(&mut self, _sprite: &SpriteDraw) {
        self.sprites_this_frame += 1;
    }

    fn draw_text(&mut self, text: &TextDraw<'_>) {
        self.texts_this_frame.push(text.content.to_string());
    }

    fn present(&mut self) {
        self.frames += 1;
        log::trace!(
            "Frame {}: {} sprites, texts {:?}",
            self.frames,
            self.sprites_this_frame,
            self.texts_this_frame
        );
    }
}

//! Audio sink contract and phase-driven music
//!
//! The simulation only names what should be heard. Decoding, mixing and
//! missing-file handling belong to whatever implements [`AudioSink`].

use crate::consts::MAX_VOLUME;
use crate::settings::AudioDef;
use crate::sim::GamePhase;

/// One-shot sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Player hit by a mob
    GameOver,
}

impl Cue {
    /// Name the cue is registered under in the configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::GameOver => "gameover",
        }
    }
}

/// Music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Music {
    /// Looping gameplay track
    Background,
}

impl Music {
    pub fn as_str(&self) -> &'static str {
        match self {
            Music::Background => "background",
        }
    }
}

/// Fire-and-forget audio backend
pub trait AudioSink {
    /// Make a named sound effect available. Returns false if the backend
    /// could not load it; the game carries on without it.
    fn load_sound(&mut self, name: &str, file: &str) -> bool;
    /// Make a named music track available. Same failure contract as
    /// [`AudioSink::load_sound`].
    fn load_music(&mut self, name: &str, file: &str) -> bool;
    fn play_cue(&mut self, cue: Cue);
    fn play_music(&mut self, music: Music, looping: bool);
    fn stop_music(&mut self);
    /// 0-128, clamped by the sink.
    fn set_music_volume(&mut self, volume: u8);
    /// 0-128, clamped by the sink.
    fn set_sfx_volume(&mut self, volume: u8);
}

/// Load the configured assets and volumes into a sink. Returns how many
/// assets failed to load.
pub fn configure(sink: &mut dyn AudioSink, audio: &AudioDef) -> usize {
    let mut failed = 0;
    if let Some(music) = &audio.background_music {
        if !sink.load_music(&music.name, &music.file) {
            log::warn!("Failed to load music '{}' from '{}'", music.name, music.file);
            failed += 1;
        }
    }
    for effect in audio.sound_effects.values() {
        if !sink.load_sound(&effect.name, &effect.file) {
            log::warn!("Failed to load sound '{}' from '{}'", effect.name, effect.file);
            failed += 1;
        }
    }
    sink.set_music_volume(audio.settings.music_volume);
    sink.set_sfx_volume(audio.settings.sfx_volume);
    failed
}

/// Starts and stops music when the session phase changes.
#[derive(Debug, Clone)]
pub struct MusicDirector {
    last_phase: GamePhase,
}

impl Default for MusicDirector {
    fn default() -> Self {
        Self::new()
    }
}

impl MusicDirector {
    pub fn new() -> Self {
        Self {
            last_phase: GamePhase::Menu,
        }
    }

    pub fn last_phase(&self) -> GamePhase {
        self.last_phase
    }

    /// React to `phase` if it differs from the last one seen.
    ///
    /// The game-over cue itself is played by collision handling, so entering
    /// `GameOver` here only stops the music.
    pub fn update(&mut self, phase: GamePhase, audio: &mut dyn AudioSink) {
        if phase == self.last_phase {
            return;
        }
        match phase {
            GamePhase::Playing => audio.play_music(Music::Background, true),
            GamePhase::Menu | GamePhase::GameOver => audio.stop_music(),
        }
        self.last_phase = phase;
    }
}

/// A request received by [`LogAudio`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioRequest {
    Cue(Cue),
    PlayMusic { music: Music, looping: bool },
    StopMusic,
}

/// Audio sink that logs and records requests instead of playing them.
#[derive(Debug, Clone, Default)]
pub struct LogAudio {
    sounds: Vec<String>,
    tracks: Vec<String>,
    requests: Vec<AudioRequest>,
    music_volume: u8,
    sfx_volume: u8,
    playing: Option<Music>,
}

impl LogAudio {
    pub fn new() -> Self {
        Self {
            music_volume: MAX_VOLUME,
            sfx_volume: MAX_VOLUME,
            ..Default::default()
        }
    }

    pub fn requests(&self) -> &[AudioRequest] {
        &self.requests
    }

    /// Cues played so far, in order.
    pub fn cues(&self) -> Vec<Cue> {
        self.requests
            .iter()
            .filter_map(|r| match r {
                AudioRequest::Cue(cue) => Some(*cue),
                _ => None,
            })
            .collect()
    }

    pub fn playing(&self) -> Option<Music> {
        self.playing
    }

    pub fn volumes(&self) -> (u8, u8) {
        (self.music_volume, self.sfx_volume)
    }
}

impl AudioSink for LogAudio {
    fn load_sound(&mut self, name: &str, file: &str) -> bool {
        log::debug!("Registered sound '{}' ({})", name, file);
        self.sounds.push(name.to_string());
        true
    }

    fn load_music(&mut self, name: &str, file: &str) -> bool {
        log::debug!("Registered music '{}' ({})", name, file);
        self.tracks.push(name.to_string());
        true
    }

    fn play_cue(&mut self, cue: Cue) {
        if !self.sounds.iter().any(|s| s == cue.as_str()) {
            log::warn!("Sound effect '{}' not loaded", cue.as_str());
        } else {
            log::info!("Playing sound '{}'", cue.as_str());
        }
        self.requests.push(AudioRequest::Cue(cue));
    }

    fn play_music(&mut self, music: Music, looping: bool) {
        if !self.tracks.iter().any(|t| t == music.as_str()) {
            log::warn!("Music '{}' not loaded", music.as_str());
        } else {
            log::info!("Playing music '{}' (looping: {})", music.as_str(), looping);
        }
        self.playing = Some(music);
        self.requests.push(AudioRequest::PlayMusic { music, looping });
    }

    fn stop_music(&mut self) {
        if let Some(music) = self.playing.take() {
            log::info!("Stopped music '{}'", music.as_str());
        }
        self.requests.push(AudioRequest::StopMusic);
    }

    fn set_music_volume(&mut self, volume: u8) {
        self.music_volume = volume.min(MAX_VOLUME);
    }

    fn set_sfx_volume(&mut self, volume: u8) {
        self.sfx_volume = volume.min(MAX_VOLUME);
    }
}

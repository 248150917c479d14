//! Platform abstraction layer
//!
//! Handles the pieces the simulation needs from the host:
//! - Logical controls and the input source contract
//! - Frame timing (delta time, FPS estimate, pacing)

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

/// Logical controls polled once per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Control {
    Left,
    Right,
    Up,
    Down,
    /// Start / restart (SPACE)
    Start,
    /// Leave the game loop (ESC or window close)
    Quit,
}

/// Anything that can report whether a control is currently held.
pub trait InputSource {
    fn is_held(&self, control: Control) -> bool;
}

/// The set of controls held this tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeldControls {
    held: BTreeSet<Control>,
}

impl HeldControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, control: Control) {
        self.held.insert(control);
    }

    pub fn release(&mut self, control: Control) {
        self.held.remove(&control);
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }
}

impl InputSource for HeldControls {
    fn is_held(&self, control: Control) -> bool {
        self.held.contains(&control)
    }
}

impl FromIterator<Control> for HeldControls {
    fn from_iter<I: IntoIterator<Item = Control>>(iter: I) -> Self {
        Self {
            held: iter.into_iter().collect(),
        }
    }
}

/// Frame timing source
pub trait Clock {
    /// Seconds since the previous tick.
    fn tick(&mut self) -> f32;
    /// Most recent frames-per-second estimate.
    fn fps(&self) -> f32;
    /// Wait out the rest of the current frame.
    fn pace(&mut self);
}

/// Frames per second, refreshed once per accumulated second.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frames: u32,
    elapsed: f32,
    current: f32,
}

impl FpsCounter {
    pub fn new(initial: f32) -> Self {
        Self {
            frames: 0,
            elapsed: 0.0,
            current: initial,
        }
    }

    pub fn record(&mut self, dt: f32) {
        self.frames += 1;
        self.elapsed += dt;
        if self.elapsed >= 1.0 {
            self.current = self.frames as f32 / self.elapsed;
            self.frames = 0;
            self.elapsed = 0.0;
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }
}

/// Wall-clock timing with a sleep-based frame cap
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    target_frame: Duration,
    fps: FpsCounter,
}

impl FrameClock {
    pub fn new(target_fps: u32) -> Self {
        let target_fps = target_fps.max(1);
        Self {
            last: Instant::now(),
            target_frame: Duration::from_secs_f32(1.0 / target_fps as f32),
            fps: FpsCounter::new(target_fps as f32),
        }
    }
}

impl Clock for FrameClock {
    fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        self.fps.record(dt);
        dt
    }

    fn fps(&self) -> f32 {
        self.fps.current()
    }

    fn pace(&mut self) {
        let spent = self.last.elapsed();
        if let Some(remaining) = self.target_frame.checked_sub(spent) {
            std::thread::sleep(remaining);
        }
    }
}

/// Constant-step clock for headless runs and tests. Never sleeps.
#[derive(Debug, Clone)]
pub struct FixedClock {
    dt: f32,
    fps: FpsCounter,
}

impl FixedClock {
    pub fn new(dt: f32) -> Self {
        let initial = if dt > 0.0 { 1.0 / dt } else { 0.0 };
        Self {
            dt,
            fps: FpsCounter::new(initial),
        }
    }
}

impl Clock for FixedClock {
    fn tick(&mut self) -> f32 {
        self.fps.record(self.dt);
        self.dt
    }

    fn fps(&self) -> f32 {
        self.fps.current()
    }

    fn pace(&mut self) {}
}

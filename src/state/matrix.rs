use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::app::AppEvent;
use crate::prefs::PreferenceSet;
use crate::services::Ticker;

/// Glyphs the rain is drawn from.
pub const CHARSET: &[char] = &[
    'ｱ', 'ｲ', 'ｳ', 'ｴ', 'ｵ', 'ｶ', 'ｷ', 'ｸ', 'ｹ', 'ｺ', '0', '1', '2', '3', '4', '5', '7', '9', 'A',
    'E', 'F', 'Z', ':', '=', '*', '+',
];

/// Frame budget at speed 1. Higher speeds divide it down.
const BASE_FRAME_MS: u64 = 500;
const MIN_FRAME_MS: u64 = 25;
/// Reduced motion stretches every frame by this factor.
const REDUCED_MOTION_FACTOR: u32 = 4;

/// Delay between rain frames for a speed setting.
pub fn frame_interval(speed: u8, reduce_motion: bool) -> Duration {
    let ms = (BASE_FRAME_MS / speed.max(1) as u64).max(MIN_FRAME_MS);
    let interval = Duration::from_millis(ms);
    if reduce_motion {
        interval * REDUCED_MOTION_FACTOR
    } else {
        interval
    }
}

/// Matrix rain background. The frame timer only runs while matrix mode is
/// on; `sync` is called once per loop iteration, so it starts within a frame
/// of activation and is aborted within a frame of deactivation.
#[derive(Debug)]
pub struct MatrixRain {
    ticker: Ticker,
    /// Head row of the drop in each column.
    drops: Vec<u16>,
    rng: StdRng,
    frames_drawn: u64,
}

impl Default for MatrixRain {
    fn default() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl MatrixRain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self { ticker: Ticker::new(), drops: Vec::new(), rng, frames_drawn: 0 }
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_running()
    }

    #[cfg(test)]
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn drops(&self) -> &[u16] {
        &self.drops
    }

    #[cfg(test)]
    pub fn interval(&self) -> Duration {
        self.ticker.period()
    }

    /// Reconcile the timer with the current preferences.
    pub fn sync(&mut self, prefs: &PreferenceSet, tx: &UnboundedSender<AppEvent>) {
        if !prefs.matrix_active {
            if self.ticker.is_running() {
                self.ticker.stop();
                self.drops.clear();
                debug!(frames = self.frames_drawn, "matrix rain stopped");
            }
            return;
        }
        let interval = frame_interval(prefs.matrix_speed, prefs.reduce_motion);
        if !self.ticker.is_running() || self.ticker.period() != interval {
            self.ticker.start(interval, tx.clone(), AppEvent::RainFrame);
            debug!(?interval, "matrix rain started");
        }
    }

    pub fn stop(&mut self) {
        self.ticker.stop();
        self.drops.clear();
    }

    /// Advance the rain by one frame for a `width` x `height` area. Frames
    /// from a stopped or replaced timer are ignored; returns whether a frame
    /// was drawn.
    pub fn on_frame(&mut self, generation: u64, width: u16, height: u16) -> bool {
        if !self.ticker.accepts(generation) {
            return false;
        }
        let width = width as usize;
        if self.drops.len() != width {
            let rng = &mut self.rng;
            self.drops.resize_with(width, || rng.gen_range(0..height.max(1)));
        }
        for drop in self.drops.iter_mut() {
            *drop = drop.saturating_add(1);
            if *drop > height && self.rng.gen_bool(0.1) {
                *drop = 0;
            }
        }
        self.frames_drawn += 1;
        true
    }

    /// Glyph for a cell, stable within a frame.
    pub fn glyph(&self, x: u16, y: u16) -> char {
        let idx = (self.frames_drawn + x as u64 * 13 + y as u64 * 7) % CHARSET.len() as u64;
        CHARSET[idx as usize]
    }
}

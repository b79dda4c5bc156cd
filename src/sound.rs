// src/sound.rs
// Synthesized UI cues. No sound files: every cue is a short generated tone
// played on an output that is opened lazily, at most once per session.
use once_cell::unsync::OnceCell;
use std::f32::consts::TAU;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use thiserror::Error;
use tracing::{info, warn};

use crate::prefs::Broadcaster;

pub const SAMPLE_RATE: u32 = 44_100;
const START_GAIN: f32 = 0.1;
const END_GAIN: f32 = 0.01;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio output unavailable: {0}")]
    Unavailable(String),
    #[error("failed to schedule tone: {0}")]
    Playback(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub frequency: f32,
    pub duration: Duration,
    /// Offset from the moment the cue is requested.
    pub delay: Duration,
}

impl Tone {
    fn new(waveform: Waveform, frequency: f32, duration_ms: u64) -> Self {
        Self {
            waveform,
            frequency,
            duration: Duration::from_millis(duration_ms),
            delay: Duration::ZERO,
        }
    }

    fn after(mut self, delay_ms: u64) -> Self {
        self.delay = Duration::from_millis(delay_ms);
        self
    }
}

#[derive(Hash, Eq, PartialEq, Clone, Copy, Debug)]
pub enum Cue {
    Click,
    Keystroke,
    Success,
}

impl Cue {
    pub fn tones(self, rng: &mut impl Rng) -> Vec<Tone> {
        match self {
            Cue::Click => vec![Tone::new(Waveform::Square, 600.0, 30)],
            Cue::Keystroke => vec![Tone::new(Waveform::Sine, rng.gen_range(300.0..400.0), 30)],
            Cue::Success => vec![
                Tone::new(Waveform::Sine, 400.0, 100),
                Tone::new(Waveform::Sine, 600.0, 100).after(100),
            ],
        }
    }
}

/// Mono samples for one tone, with the gain decaying exponentially from
/// 0.1 to 0.01 over the tone's duration.
#[derive(Debug, Clone)]
pub struct ToneSource {
    tone: Tone,
    index: u32,
    total: u32,
}

impl ToneSource {
    pub fn new(tone: Tone) -> Self {
        let total = (tone.duration.as_secs_f32() * SAMPLE_RATE as f32).round() as u32;
        Self { tone, index: 0, total }
    }

    pub fn len(&self) -> u32 {
        self.total
    }
}

impl Iterator for ToneSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.index >= self.total {
            return None;
        }
        let t = self.index as f32 / SAMPLE_RATE as f32;
        let progress = self.index as f32 / self.total.max(1) as f32;
        let gain = START_GAIN * (END_GAIN / START_GAIN).powf(progress);
        let phase = (self.tone.frequency * t).fract();
        let wave = match self.tone.waveform {
            Waveform::Sine => (TAU * phase).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        };
        self.index += 1;
        Some(wave * gain)
    }
}

/// Something that can play a tone without blocking.
pub trait ToneOutput {
    fn schedule(&self, tone: Tone) -> Result<(), AudioError>;
}

pub type OutputFactory = Box<dyn Fn() -> Result<Box<dyn ToneOutput>, AudioError>>;

#[cfg(feature = "audio")]
mod device {
    use super::*;
    use rodio::{OutputStream, OutputStreamHandle, Source};

    impl Source for ToneSource {
        fn current_frame_len(&self) -> Option<usize> {
            Some((self.total - self.index) as usize)
        }

        fn channels(&self) -> u16 {
            1
        }

        fn sample_rate(&self) -> u32 {
            SAMPLE_RATE
        }

        fn total_duration(&self) -> Option<Duration> {
            Some(self.tone.duration)
        }
    }

    pub struct DeviceOutput {
        _stream: OutputStream,
        stream_handle: OutputStreamHandle,
    }

    impl DeviceOutput {
        pub fn open() -> Result<Self, AudioError> {
            let (_stream, stream_handle) =
                OutputStream::try_default().map_err(|e| AudioError::Unavailable(e.to_string()))?;
            Ok(Self { _stream, stream_handle })
        }
    }

    impl ToneOutput for DeviceOutput {
        fn schedule(&self, tone: Tone) -> Result<(), AudioError> {
            let source = ToneSource::new(tone).delay(tone.delay);
            self.stream_handle
                .play_raw(source)
                .map_err(|e| AudioError::Playback(e.to_string()))
        }
    }
}

/// Opens the default audio device when first asked.
pub fn device_output_factory() -> OutputFactory {
    #[cfg(feature = "audio")]
    {
        Box::new(|| device::DeviceOutput::open().map(|o| Box::new(o) as Box<dyn ToneOutput>))
    }
    #[cfg(not(feature = "audio"))]
    {
        Box::new(|| Err(AudioError::Unavailable("built without the audio feature".into())))
    }
}

pub struct SoundManager {
    prefs: Arc<Broadcaster>,
    factory: OutputFactory,
    // `Some(None)` records a failed open so it is not retried.
    output: OnceCell<Option<Box<dyn ToneOutput>>>,
}

impl SoundManager {
    pub fn new(prefs: Arc<Broadcaster>, factory: OutputFactory) -> Self {
        Self { prefs, factory, output: OnceCell::new() }
    }

    /// Whether the output has been opened successfully.
    #[cfg(test)]
    pub fn is_ready(&self) -> bool {
        matches!(self.output.get(), Some(Some(_)))
    }

    /// Open the output now if sound is enabled. Called on the keypress that
    /// unmutes, so the first real cue does not pay the open cost.
    pub fn prime(&self) {
        if self.prefs.sound_enabled() {
            self.output();
        }
    }

    pub fn play_click(&self) {
        self.play(Cue::Click);
    }

    pub fn play_keystroke(&self) {
        self.play(Cue::Keystroke);
    }

    pub fn play_success(&self) {
        self.play(Cue::Success);
    }

    pub fn play(&self, cue: Cue) {
        if self.prefs.muted() {
            return;
        }
        let Some(output) = self.output() else {
            return;
        };
        for tone in cue.tones(&mut rand::thread_rng()) {
            if let Err(err) = output.schedule(tone) {
                warn!(?cue, error = %err, "audio cue failed");
            }
        }
    }

    fn output(&self) -> Option<&dyn ToneOutput> {
        self.output
            .get_or_init(|| match (self.factory)() {
                Ok(output) => {
                    info!("audio output opened");
                    Some(output)
                }
                Err(err) => {
                    warn!(error = %err, "audio disabled for this session");
                    None
                }
            })
            .as_deref()
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Records scheduled tones and counts how often the output was opened.
    #[derive(Clone, Default)]
    pub struct Recorder {
        pub tones: Rc<RefCell<Vec<Tone>>>,
        pub opened: Rc<Cell<usize>>,
    }

    struct RecordingOutput(Rc<RefCell<Vec<Tone>>>);

    impl ToneOutput for RecordingOutput {
        fn schedule(&self, tone: Tone) -> Result<(), AudioError> {
            self.0.borrow_mut().push(tone);
            Ok(())
        }
    }

    impl Recorder {
        pub fn factory(&self) -> OutputFactory {
            let tones = self.tones.clone();
            let opened = self.opened.clone();
            Box::new(move || {
                opened.set(opened.get() + 1);
                Ok(Box::new(RecordingOutput(tones.clone())) as Box<dyn ToneOutput>)
            })
        }

        pub fn count(&self) -> usize {
            self.tones.borrow().len()
        }
    }
}

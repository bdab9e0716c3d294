//! Pluck sound selection and the player capability.

use serde::Deserialize;
use std::fmt;

use crate::error::Result;

/// Normalized amplitude under which the short sprite is played.
pub const SHORT_SOUND_THRESHOLD: f32 = 0.25;

/// Volume never drops below this, however gentle the pluck.
pub const MIN_VOLUME: f32 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundVariant {
    Short,
    Long,
}

impl SoundVariant {
    pub fn for_amplitude(amplitude: f32) -> Self {
        if amplitude < SHORT_SOUND_THRESHOLD {
            SoundVariant::Short
        } else {
            SoundVariant::Long
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SoundVariant::Short => "short",
            SoundVariant::Long => "long",
        }
    }
}

impl fmt::Display for SoundVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Quadratic in amplitude, so small plucks are noticeably quieter.
pub fn volume_for(amplitude: f32) -> f32 {
    (1.0 - MIN_VOLUME) * amplitude * amplitude + MIN_VOLUME
}

/// A named sub-range of the sound asset, in milliseconds.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct Sprite {
    pub offset_ms: f32,
    pub duration_ms: f32,
}

impl Sprite {
    pub const fn new(offset_ms: f32, duration_ms: f32) -> Self {
        Self {
            offset_ms,
            duration_ms,
        }
    }

    /// Sample-frame range covered at `sample_rate`, clipped to `len` frames.
    pub fn frames(&self, sample_rate: u32, len: usize) -> std::ops::Range<usize> {
        let to_frame = |ms: f32| ((ms / 1000.0 * sample_rate as f32).round().max(0.0) as usize).min(len);
        to_frame(self.offset_ms)..to_frame(self.offset_ms + self.duration_ms)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SoundConfig {
    /// Equivalent encodings of the same asset, tried in order.
    pub sources: Vec<String>,
    pub short: Sprite,
    pub long: Sprite,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            sources: vec![
                "pluck.ogg".to_string(),
                "pluck.mp3".to_string(),
                "pluck.wav".to_string(),
            ],
            short: Sprite::new(0.0, 672.0),
            long: Sprite::new(800.0, 2133.0),
        }
    }
}

impl SoundConfig {
    pub fn sprite(&self, variant: SoundVariant) -> Sprite {
        match variant {
            SoundVariant::Short => self.short,
            SoundVariant::Long => self.long,
        }
    }

    /// Source locations below `<base>/sounds/`.
    pub fn source_urls(&self, base: &str) -> Vec<String> {
        self.sources.iter().map(|name| asset_url(base, name)).collect()
    }
}

pub fn asset_url(base: &str, name: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        format!("sounds/{}", name)
    } else {
        format!("{}/sounds/{}", base, name)
    }
}

/// Plays sprites of a single loaded asset; one voice at a time.
pub trait SoundPlayer {
    fn stop(&mut self) -> Result<()>;

    fn set_volume(&mut self, volume: f32) -> Result<()>;

    fn play(&mut self, variant: SoundVariant) -> Result<()>;
}

/// A missing player is silent.
impl<P: SoundPlayer> SoundPlayer for Option<P> {
    fn stop(&mut self) -> Result<()> {
        self.as_mut().map_or(Ok(()), |p| p.stop())
    }

    fn set_volume(&mut self, volume: f32) -> Result<()> {
        self.as_mut().map_or(Ok(()), |p| p.set_volume(volume))
    }

    fn play(&mut self, variant: SoundVariant) -> Result<()> {
        self.as_mut().map_or(Ok(()), |p| p.play(variant))
    }
}

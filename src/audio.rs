//! cpal output for the pluck sound sprites.
//!
//! The UI thread talks to the audio callback through a small command queue;
//! the callback owns the single voice and renders it on every channel.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample, Stream};
use log::{debug, info, warn};
use ringbuf::{Consumer, Producer, RingBuffer};
use std::io::Cursor;
use std::ops::Range;
use std::sync::Arc;

use crate::error::{PluckError, Result};
use crate::sound::{SoundConfig, SoundPlayer, SoundVariant};

const COMMAND_CAPACITY: usize = 64;

/// A decoded, mono sound asset.
#[derive(Clone, Debug, PartialEq)]
pub struct Clip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Clip {
    /// Decode WAV bytes, mixing all channels down to one.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut reader = hound::WavReader::new(Cursor::new(bytes))?;
        let spec = reader.spec();
        let channels = spec.channels.max(1) as usize;

        let interleaved = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<std::result::Result<Vec<f32>, hound::Error>>()?,
            hound::SampleFormat::Int => {
                let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|s| s as f32 * scale))
                    .collect::<std::result::Result<Vec<f32>, hound::Error>>()?
            }
        };

        let samples = interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect();

        Ok(Clip {
            samples,
            sample_rate: spec.sample_rate,
        })
    }

    /// The first candidate whose bytes decode wins.
    pub fn first_playable<I>(candidates: I) -> Result<(String, Clip)>
    where
        I: IntoIterator<Item = (String, Result<Vec<u8>>)>,
    {
        let mut tried = Vec::new();
        for (source, bytes) in candidates {
            match bytes.and_then(|bytes| Clip::decode(&bytes)) {
                Ok(clip) => {
                    info!(
                        "loaded {} ({} frames @ {}Hz)",
                        source,
                        clip.samples.len(),
                        clip.sample_rate
                    );
                    return Ok((source, clip));
                }
                Err(err) => debug!("skipping sound source {}: {}", source, err),
            }
            tried.push(source);
        }
        Err(PluckError::NoPlayableSource(tried))
    }

    /// Read candidates from the filesystem, stopping at the first playable one.
    pub fn load_first_playable(sources: &[String]) -> Result<(String, Clip)> {
        Clip::first_playable(
            sources
                .iter()
                .map(|source| (source.clone(), std::fs::read(source).map_err(PluckError::from))),
        )
    }
}

#[derive(Debug)]
enum Command {
    Stop,
    SetVolume(f32),
    Play(Range<usize>),
}

/// Playback state owned by the audio callback.
struct Voice {
    clip: Arc<Clip>,
    /// Clip frames advanced per output frame.
    step: f64,
    volume: f32,
    cursor: f64,
    end: usize,
    playing: bool,
}

impl Voice {
    fn new(clip: Arc<Clip>, output_rate: u32) -> Self {
        Self {
            step: clip.sample_rate as f64 / output_rate.max(1) as f64,
            clip,
            volume: 1.0,
            cursor: 0.0,
            end: 0,
            playing: false,
        }
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Stop => self.playing = false,
            Command::SetVolume(volume) => self.volume = volume,
            Command::Play(range) => {
                self.cursor = range.start as f64;
                self.end = range.end.min(self.clip.samples.len());
                self.playing = true;
            }
        }
    }

    fn next_sample(&mut self) -> f32 {
        if !self.playing {
            return 0.0;
        }
        let index = self.cursor as usize;
        if index >= self.end {
            self.playing = false;
            return 0.0;
        }
        self.cursor += self.step;
        self.clip.samples[index] * self.volume
    }
}

/// Plays sprites of one clip on the default output device.
pub struct SpritePlayer {
    commands: Producer<Command>,
    clip: Arc<Clip>,
    sounds: SoundConfig,
    _stream: Stream,
}

impl SpritePlayer {
    pub fn new(clip: Clip, sounds: SoundConfig) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| PluckError::AudioDevice("no default output device".to_string()))?;
        let config = device
            .default_output_config()
            .map_err(|e| PluckError::AudioDevice(e.to_string()))?;
        info!(
            "audio: {} @ {}Hz",
            device.name().unwrap_or_else(|_| "unknown".to_string()),
            config.sample_rate().0
        );

        let clip = Arc::new(clip);
        let voice = Voice::new(clip.clone(), config.sample_rate().0);
        let (producer, consumer) = RingBuffer::<Command>::new(COMMAND_CAPACITY).split();

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => run::<f32>(&device, &config.into(), voice, consumer),
            cpal::SampleFormat::I16 => run::<i16>(&device, &config.into(), voice, consumer),
            cpal::SampleFormat::U16 => run::<u16>(&device, &config.into(), voice, consumer),
            other => Err(PluckError::AudioDevice(format!(
                "unsupported sample format {:?}",
                other
            ))),
        }?;

        Ok(Self {
            commands: producer,
            clip,
            sounds,
            _stream: stream,
        })
    }

    fn send(&mut self, command: Command) -> Result<()> {
        self.commands
            .push(command)
            .map_err(|_| PluckError::AudioQueueFull)
    }
}

impl SoundPlayer for SpritePlayer {
    fn stop(&mut self) -> Result<()> {
        self.send(Command::Stop)
    }

    fn set_volume(&mut self, volume: f32) -> Result<()> {
        self.send(Command::SetVolume(volume.clamp(0.0, 1.0)))
    }

    fn play(&mut self, variant: SoundVariant) -> Result<()> {
        let frames = self
            .sounds
            .sprite(variant)
            .frames(self.clip.sample_rate, self.clip.samples.len());
        self.send(Command::Play(frames))
    }
}

fn run<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut voice: Voice,
    mut commands: Consumer<Command>,
) -> Result<Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;
    let err_fn = |err: cpal::StreamError| warn!("an error occurred on stream: {}", err);

    let stream = device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                while let Some(command) = commands.pop() {
                    voice.apply(command);
                }
                write_data(data, channels, &mut || voice.next_sample());
            },
            err_fn,
            None,
        )
        .map_err(|e| PluckError::AudioStream(e.to_string()))?;
    stream
        .play()
        .map_err(|e| PluckError::AudioStream(e.to_string()))?;
    Ok(stream)
}

fn write_data<T>(output: &mut [T], channels: usize, next_sample: &mut dyn FnMut() -> f32)
where
    T: SizedSample + FromSample<f32>,
{
    for frame in output.chunks_mut(channels) {
        let value: T = T::from_sample(next_sample());
        for sample in frame.iter_mut() {
            *sample = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;

    fn wav_bytes(channels: u16, sample_rate: u32, frames: &[[i16; 2]]) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for frame in frames {
                for sample in &frame[..channels as usize] {
                    writer.write_sample(*sample).unwrap();
                }
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn decode_mixes_to_mono_and_scales() {
        let bytes = wav_bytes(2, 22_050, &[[16384, 0], [-32768, -32768], [0, 0]]);
        let clip = Clip::decode(&bytes).unwrap();

        assert_eq!(clip.sample_rate, 22_050);
        assert_eq!(clip.samples.len(), 3);
        assert_approx_eq!(clip.samples[0], 0.25);
        assert_approx_eq!(clip.samples[1], -1.0);
        assert_approx_eq!(clip.samples[2], 0.0);
    }

    #[test]
    fn first_decodable_source_wins() {
        let wav = wav_bytes(1, 8_000, &[[100, 0], [200, 0]]);
        let candidates = vec![
            ("pluck.ogg".to_string(), Ok(b"OggS not a wav".to_vec())),
            (
                "pluck.mp3".to_string(),
                Err(PluckError::Io(std::io::ErrorKind::NotFound.into())),
            ),
            ("pluck.wav".to_string(), Ok(wav.clone())),
            ("later.wav".to_string(), Ok(wav)),
        ];

        let (source, clip) = Clip::first_playable(candidates).unwrap();
        assert_eq!(source, "pluck.wav");
        assert_eq!(clip.samples.len(), 2);
    }

    #[test]
    fn no_decodable_source_lists_what_was_tried() {
        let candidates = vec![("a.ogg".to_string(), Ok(vec![0u8; 16]))];
        match Clip::first_playable(candidates) {
            Err(PluckError::NoPlayableSource(tried)) => assert_eq!(tried, vec!["a.ogg"]),
            other => panic!("unexpected {:?}", other.map(|(s, _)| s)),
        }
    }

    fn ramp_voice(output_rate: u32) -> Voice {
        let clip = Clip {
            samples: (0..10).map(|i| i as f32 / 10.0).collect(),
            sample_rate: 10,
        };
        Voice::new(Arc::new(clip), output_rate)
    }

    #[test]
    fn voice_plays_only_its_range() {
        let mut voice = ramp_voice(10);
        assert_eq!(voice.next_sample(), 0.0);

        voice.apply(Command::SetVolume(0.5));
        voice.apply(Command::Play(2..5));
        let out: Vec<f32> = (0..5).map(|_| voice.next_sample()).collect();
        assert_eq!(out, vec![0.1, 0.15, 0.2, 0.0, 0.0]);
    }

    #[test]
    fn play_restarts_and_stop_silences() {
        let mut voice = ramp_voice(10);
        voice.apply(Command::Play(5..10));
        voice.next_sample();
        voice.apply(Command::Play(1..10));
        assert_approx_eq!(voice.next_sample(), 0.1);
        voice.apply(Command::Stop);
        assert_eq!(voice.next_sample(), 0.0);
    }

    #[test]
    fn voice_resamples_to_output_rate() {
        let mut voice = ramp_voice(20);
        voice.apply(Command::Play(0..4));
        let out: Vec<f32> = (0..9).map(|_| voice.next_sample()).collect();
        assert_eq!(out, vec![0.0, 0.0, 0.1, 0.1, 0.2, 0.2, 0.3, 0.3, 0.0]);
    }

    #[test]
    fn write_data_fills_every_channel() {
        let mut voice = ramp_voice(10);
        voice.apply(Command::Play(3..5));
        let mut out = [0.0f32; 6];
        write_data(&mut out, 2, &mut || voice.next_sample());
        assert_eq!(out, [0.3, 0.3, 0.4, 0.4, 0.0, 0.0]);
    }
}

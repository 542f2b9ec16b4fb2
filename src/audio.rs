//! Tone synthesis into ring-buffer windows
//!
//! The host's audio driver decides how many bytes it can take each frame and
//! hands over a locked window of its ring buffer: one contiguous segment, or
//! two when the window wraps past the end. The synth fills that window with
//! an interleaved stereo sine tone and never owns the memory itself.
//!
//! The only state carried between calls is the phase accumulator, so windows
//! of any length join into one continuous waveform.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::consts::AUDIO_CHANNELS;

/// Per-channel sample encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SampleEncoding {
    /// Signed 16-bit little-endian
    #[default]
    I16,
    /// 32-bit float little-endian
    F32,
}

impl SampleEncoding {
    /// Bytes for one channel of one sample
    pub fn bytes(&self) -> usize {
        match self {
            SampleEncoding::I16 => 2,
            SampleEncoding::F32 => 4,
        }
    }

    #[inline]
    fn write(&self, dest: &mut [u8], value: f64) {
        match self {
            SampleEncoding::I16 => {
                let sample = (value * i16::MAX as f64).round() as i16;
                dest.copy_from_slice(&sample.to_le_bytes());
            }
            SampleEncoding::F32 => dest.copy_from_slice(&(value as f32).to_le_bytes()),
        }
    }
}

/// Layout of the host's audio buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleFormat {
    pub samples_per_second: u32,
    pub encoding: SampleEncoding,
}

impl SampleFormat {
    pub fn new(samples_per_second: u32, encoding: SampleEncoding) -> Self {
        assert!(samples_per_second > 0, "sample rate must be positive");
        Self {
            samples_per_second,
            encoding,
        }
    }

    /// Bytes per stereo sample (left + right)
    pub fn bytes_per_sample(&self) -> usize {
        self.encoding.bytes() * AUDIO_CHANNELS
    }

    pub fn bytes_per_second(&self) -> usize {
        self.bytes_per_sample() * self.samples_per_second as usize
    }
}

/// Tone parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SineWave {
    pub hertz: f32,
    /// Peak level as a fraction of full scale
    pub amplitude: f32,
}

/// A locked region of the host's ring buffer
pub struct AudioWindow<'a> {
    segments: [&'a mut [u8]; 2],
    format: SampleFormat,
}

impl<'a> AudioWindow<'a> {
    /// A window made of one contiguous segment
    pub fn new(memory: &'a mut [u8], format: SampleFormat) -> Self {
        Self::split(memory, Default::default(), format)
    }

    /// A window that wraps: `first` is played before `second`.
    ///
    /// # Panics
    /// If either segment is not a whole number of stereo samples.
    pub fn split(first: &'a mut [u8], second: &'a mut [u8], format: SampleFormat) -> Self {
        let bytes_per_sample = format.bytes_per_sample();
        assert!(
            first.len() % bytes_per_sample == 0 && second.len() % bytes_per_sample == 0,
            "audio window segments ({} + {} bytes) must hold whole {}-byte samples",
            first.len(),
            second.len(),
            bytes_per_sample
        );
        Self {
            segments: [first, second],
            format,
        }
    }

    /// Lock `bytes_to_write` bytes of `ring` starting at `byte_to_lock`,
    /// wrapping to the start of the ring when the region runs off the end.
    ///
    /// # Panics
    /// If the region is larger than the ring or starts outside it.
    pub fn from_ring(ring: &'a mut [u8], byte_to_lock: usize, bytes_to_write: usize, format: SampleFormat) -> Self {
        assert!(
            bytes_to_write <= ring.len() && (byte_to_lock < ring.len() || ring.is_empty()),
            "ring lock {}+{} outside {}-byte ring",
            byte_to_lock,
            bytes_to_write,
            ring.len()
        );

        let (head, tail) = ring.split_at_mut(byte_to_lock);
        if bytes_to_write <= tail.len() {
            let (first, _) = tail.split_at_mut(bytes_to_write);
            Self::new(first, format)
        } else {
            let wrapped = bytes_to_write - tail.len();
            let (second, _) = head.split_at_mut(wrapped);
            Self::split(tail, second, format)
        }
    }

    /// Whether the window wraps around the end of the ring
    pub fn is_split(&self) -> bool {
        !self.segments[1].is_empty()
    }
}

/// Sine tone generator with a persistent phase accumulator
#[derive(Debug, Clone)]
pub struct ToneSynth {
    wave: SineWave,
    /// Fraction of the current cycle already played, in [0, 1)
    phase: f64,
}

impl ToneSynth {
    pub fn new(wave: SineWave) -> Self {
        Self { wave, phase: 0.0 }
    }

    pub fn wave(&self) -> SineWave {
        self.wave
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Change pitch or level.
    ///
    /// The phase is kept, so the new tone picks up at the same point of the
    /// cycle and the waveform stays continuous.
    pub fn set_wave(&mut self, wave: SineWave) {
        if wave != self.wave {
            log::debug!("Tone retuned: {} Hz -> {} Hz", self.wave.hertz, wave.hertz);
        }
        self.wave = wave;
    }

    /// Samples in one full cycle at the given sample rate
    pub fn samples_per_cycle(&self, format: SampleFormat) -> f64 {
        format.samples_per_second as f64 / self.wave.hertz as f64
    }

    #[inline]
    fn next_value(&mut self, phase_step: f64) -> f64 {
        let value = (TAU * self.phase).sin() * self.wave.amplitude as f64;
        // rem_euclid can round a tiny negative up to exactly 1.0
        let next = (self.phase + phase_step).rem_euclid(1.0);
        self.phase = if next < 1.0 { next } else { 0.0 };
        value
    }

    /// Fill the whole window, first segment then second. Returns the number
    /// of stereo samples written.
    pub fn write_samples(&mut self, window: &mut AudioWindow) -> usize {
        let format = window.format;
        let bytes_per_sample = format.bytes_per_sample();
        let channel_bytes = format.encoding.bytes();
        let phase_step = self.samples_per_cycle(format).recip();

        let mut written = 0;
        for segment in window.segments.iter_mut() {
            for sample in segment.chunks_exact_mut(bytes_per_sample) {
                let value = self.next_value(phase_step);
                for channel in sample.chunks_exact_mut(channel_bytes) {
                    format.encoding.write(channel, value);
                }
                written += 1;
            }
        }
        written
    }
}

//! Loudness estimation from raw microphone samples.
//!
//! The most recent samples are kept in a small ring. Loudness is the mean
//! absolute deviation (MAD) of the ring from its own mean, which removes
//! the microphone bias and needs no squaring. The device's own quiescent
//! MAD is subtracted as a noise floor and what remains is scaled to a
//! brightness.

use heapless::HistoryBuf;

use crate::sampler::{ADC_MAX, ADC_MID_SCALE};
use crate::time::Millis;

/// Samples in the ring. A power of two keeps the mean a shift.
pub const SAMPLE_RING_LEN: usize = 16;

/// Calibration of the loudness to brightness mapping.
///
/// Defaults match the reference microphone amplifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EnvelopeConfig {
    /// MAD of a silent room, subtracted from every estimate.
    pub noise_floor: u16,
    /// Largest floor-subtracted MAD that still changes the output.
    pub ceiling: u16,
    /// Left shift spreading the clamped value over the brightness range.
    pub gain_shift: u8,
}

impl EnvelopeConfig {
    pub const fn new() -> Self {
        Self {
            noise_floor: 40,
            ceiling: 63,
            gain_shift: 2,
        }
    }

    pub const fn with_noise_floor(mut self, noise_floor: u16) -> Self {
        self.noise_floor = noise_floor;
        self
    }

    pub const fn with_ceiling(mut self, ceiling: u16, gain_shift: u8) -> Self {
        self.ceiling = ceiling;
        self.gain_shift = gain_shift;
        self
    }
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Ring of recent microphone samples and the loudness derived from it.
#[derive(Debug, Clone)]
pub struct SoundEnvelope {
    samples: HistoryBuf<u16, SAMPLE_RING_LEN>,
    config: EnvelopeConfig,
}

impl SoundEnvelope {
    /// Creates an estimator reporting silence.
    pub fn new(config: EnvelopeConfig) -> Self {
        Self {
            samples: HistoryBuf::new_with(ADC_MID_SCALE),
            config,
        }
    }

    /// Forgets every sample, refilling the ring with mid-scale.
    ///
    /// A zero-filled ring would read as a loud transient on the first
    /// estimate.
    pub fn reset(&mut self) {
        self.samples.clear_with(ADC_MID_SCALE);
    }

    /// Stores a sample over the oldest one.
    #[inline]
    pub fn push(&mut self, sample: u16) {
        self.samples.write(sample.min(ADC_MAX));
    }

    /// Mean of the ring.
    pub fn mean(&self) -> u16 {
        let total: u32 = self.samples.as_slice().iter().map(|&s| u32::from(s)).sum();
        (total / SAMPLE_RING_LEN as u32) as u16
    }

    /// Mean absolute deviation of the ring from its mean.
    ///
    /// Never exceeds half the converter range.
    pub fn mad(&self) -> u16 {
        let mean = self.mean();
        let total: u32 = self
            .samples
            .as_slice()
            .iter()
            .map(|&s| u32::from(s.abs_diff(mean)))
            .sum();
        (total / SAMPLE_RING_LEN as u32) as u16
    }

    /// Loudness on the 0-255 brightness scale.
    pub fn level(&self) -> u8 {
        let above_floor = self.mad().saturating_sub(self.config.noise_floor);
        let clamped = u64::from(above_floor.min(self.config.ceiling));
        (clamped << self.config.gain_shift.min(32)).min(255) as u8
    }

    pub fn config(&self) -> &EnvelopeConfig {
        &self.config
    }
}

impl Default for SoundEnvelope {
    fn default() -> Self {
        Self::new(EnvelopeConfig::default())
    }
}

/// Fast-attack, slow-decay display follower.
///
/// A louder level is shown immediately; otherwise the shown level drops by
/// one for every millisecond that passed, independent of the sample rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Decay {
    shown: u8,
    last: Millis,
}

impl Decay {
    pub fn new(now: Millis) -> Self {
        Self {
            shown: 0,
            last: now,
        }
    }

    /// Feeds a fresh level and returns the level to display.
    pub fn update(&mut self, level: u8, now: Millis) -> u8 {
        let elapsed = now.since(self.last);
        if elapsed > 0 {
            let drop = elapsed.min(u32::from(u8::MAX)) as u8;
            self.shown = self.shown.saturating_sub(drop);
            self.last = now;
        }
        self.shown = self.shown.max(level);
        self.shown
    }

    /// Level currently displayed.
    pub fn shown(&self) -> u8 {
        self.shown
    }
}

//! Core types for choreography construction.

use crate::channel::Channel;
use crate::sequence::{Halt, Session, Stage};

/// Where a track starts counting from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Start {
    /// First step shows this level.
    At(u8),

    /// First step shows the channel's current level plus one step.
    Current,
}

/// Arithmetic progression followed by one channel during a ramp.
///
/// Levels are computed modulo 256, so a track that runs past either end
/// wraps instead of saturating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Track {
    /// Starting point.
    pub start: Start,

    /// Signed change per step.
    pub step: i8,
}

impl Track {
    /// Track starting at `level`.
    #[inline]
    pub const fn at(level: u8, step: i8) -> Self {
        Self {
            start: Start::At(level),
            step,
        }
    }

    /// Track continuing from whatever the channel shows.
    #[inline]
    pub const fn relative(step: i8) -> Self {
        Self {
            start: Start::Current,
            step,
        }
    }

    /// Level shown at step `index` of a ramp, given the channel's level
    /// when the ramp began.
    pub fn level_at(self, origin: u8, index: u16) -> u8 {
        let offset = i32::from(self.step) * i32::from(index);
        let level = match self.start {
            Start::At(level) => i32::from(level) + offset,
            Start::Current => i32::from(origin) + offset + i32::from(self.step),
        };
        level as u8
    }
}

/// One entry of a choreography.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Writes the given channels immediately, leaving `None` untouched.
    Set([Option<u8>; 4]),

    /// Walks the tracked channels through `steps` values.
    ///
    /// Each step polls the button and the deadline, writes the channels
    /// and then pauses `delay_ms`. A ramp without tracks only polls and
    /// pauses, which makes it a hold.
    Ramp {
        tracks: [Option<Track>; 4],
        steps: u16,
        delay_ms: u16,
    },

    /// Waits while polling continuously.
    Wait(u16),
}

impl Phase {
    /// Sets every channel to `level`.
    pub const fn set_all(level: u8) -> Self {
        Phase::Set([Some(level); 4])
    }

    /// Sets one channel.
    pub const fn set(channel: Channel, level: u8) -> Self {
        let mut levels = [None; 4];
        levels[channel.index()] = Some(level);
        Phase::Set(levels)
    }

    /// Polls `steps` times, pausing `delay_ms` after each, without
    /// changing the output.
    pub const fn hold(steps: u16, delay_ms: u16) -> Self {
        Phase::Ramp {
            tracks: [None; 4],
            steps,
            delay_ms,
        }
    }

    pub const fn wait(millis: u16) -> Self {
        Phase::Wait(millis)
    }

    /// Ramps one channel.
    pub const fn ramp(channel: Channel, track: Track, steps: u16, delay_ms: u16) -> Self {
        let mut tracks = [None; 4];
        tracks[channel.index()] = Some(track);
        Phase::Ramp {
            tracks,
            steps,
            delay_ms,
        }
    }

    /// Ramps every channel along the same track.
    pub const fn ramp_all(track: Track, steps: u16, delay_ms: u16) -> Self {
        Phase::Ramp {
            tracks: [Some(track); 4],
            steps,
            delay_ms,
        }
    }

    /// Fades `from` down from `peak` while `to` fades up from dark at the
    /// same rate.
    pub const fn hand_off(
        from: Channel,
        to: Channel,
        peak: u8,
        step: i8,
        steps: u16,
        delay_ms: u16,
    ) -> Self {
        let mut tracks = [None; 4];
        tracks[from.index()] = Some(Track::at(peak, step.wrapping_neg()));
        tracks[to.index()] = Some(Track::at(0, step));
        Phase::Ramp {
            tracks,
            steps,
            delay_ms,
        }
    }

    /// True if playing this phase consults the button at least once.
    pub fn polls(&self) -> bool {
        match self {
            Phase::Set(_) => false,
            Phase::Ramp { steps, .. } => *steps > 0,
            Phase::Wait(_) => true,
        }
    }

    /// Nominal time spent in this phase, ignoring conversion overhead.
    pub fn nominal_millis(&self) -> u32 {
        match *self {
            Phase::Set(_) => 0,
            Phase::Ramp {
                steps, delay_ms, ..
            } => u32::from(steps) * u32::from(delay_ms),
            Phase::Wait(millis) => u32::from(millis),
        }
    }

    /// Plays this phase.
    ///
    /// # Errors
    /// Propagates the first failed checkpoint.
    pub fn play<S: Stage + ?Sized>(&self, session: &mut Session<'_, S>) -> Result<(), Halt> {
        match *self {
            Phase::Set(levels) => {
                let mut shown = session.levels();
                for (slot, level) in shown.0.iter_mut().zip(levels) {
                    if let Some(level) = level {
                        *slot = level;
                    }
                }
                session.show(shown);
                Ok(())
            }
            Phase::Ramp {
                tracks,
                steps,
                delay_ms,
            } => {
                let origin = session.levels();
                let animates = tracks.iter().any(Option::is_some);
                for index in 0..steps {
                    session.checkpoint()?;
                    if animates {
                        let mut shown = session.levels();
                        for ((slot, track), start) in shown.0.iter_mut().zip(tracks).zip(origin.0) {
                            if let Some(track) = track {
                                *slot = track.level_at(start, index);
                            }
                        }
                        session.show(shown);
                    }
                    if delay_ms > 0 {
                        session.pause(u32::from(delay_ms));
                    }
                }
                Ok(())
            }
            Phase::Wait(millis) => session.wait(u32::from(millis)),
        }
    }
}

/// Choreography validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PatternError {
    /// No cycle phases provided.
    EmptyCycle,

    /// No cycle phase ever polls the button.
    CycleNeverPolls,

    /// Choreography capacity exceeded.
    CapacityExceeded,
}

impl core::fmt::Display for PatternError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PatternError::EmptyCycle => {
                write!(f, "choreography must have at least one cycle phase")
            }
            PatternError::CycleNeverPolls => {
                write!(f, "choreography cycle must poll the button at least once")
            }
            PatternError::CapacityExceeded => {
                write!(f, "choreography capacity exceeded")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PatternError {}

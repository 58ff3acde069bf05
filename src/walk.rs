//! Randomized walks where channels independently wander between dark and
//! full brightness.

use rand_core::RngCore;

use crate::channel::{Channel, Levels, MAX_LEVEL};
use crate::sequence::{Halt, Sequence, Session, Stage};

/// Default one-in-N chance per step that a rising walk wakes a channel.
pub const RISE_CHANCE: u32 = 50;

/// Default one-in-N chance per step that a falling walk wakes a channel.
pub const FALL_CHANCE: u32 = 100;

/// Resting end of a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Drift {
    /// Channels rest dark and flare up to full before falling back.
    Rise,
    /// Channels rest at full and dip to dark before climbing back.
    Fall,
}

impl Drift {
    fn resting(self) -> Levels {
        match self {
            Drift::Rise => Levels::OFF,
            Drift::Fall => Levels::FULL,
        }
    }
}

/// Per-channel motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Motion {
    Idle,
    Rising,
    Falling,
}

/// Random walk over the four channels.
///
/// Every step advances each moving channel by one level. A channel that
/// reaches the far end turns around; one that returns to the resting end
/// goes idle. After moving, one random channel may be woken: with a
/// one-in-`chance` probability a channel is picked and, if idle, set in
/// motion away from the resting end.
#[derive(Debug, Clone)]
pub struct RandomWalk<G> {
    rng: G,
    drift: Drift,
    chance: u32,
    motions: [Motion; 4],
}

impl<G: RngCore> RandomWalk<G> {
    /// Creates a walk. A `chance` of zero never wakes a channel.
    pub fn new(rng: G, drift: Drift, chance: u32) -> Self {
        Self {
            rng,
            drift,
            chance,
            motions: [Motion::Idle; 4],
        }
    }

    /// Channels resting dark, flaring up.
    pub fn rise(rng: G) -> Self {
        Self::new(rng, Drift::Rise, RISE_CHANCE)
    }

    /// Channels resting at full, dipping down.
    pub fn fall(rng: G) -> Self {
        Self::new(rng, Drift::Fall, FALL_CHANCE)
    }

    pub fn drift(&self) -> Drift {
        self.drift
    }

    /// Current motion of a channel.
    pub fn motion(&self, channel: Channel) -> Motion {
        self.motions[channel.index()]
    }

    /// Advances every moving channel one level.
    pub fn advance(&mut self, mut levels: Levels) -> Levels {
        for (motion, level) in self.motions.iter_mut().zip(levels.0.iter_mut()) {
            match *motion {
                Motion::Idle => {}
                Motion::Rising => {
                    *level = level.saturating_add(1);
                    if *level == MAX_LEVEL {
                        *motion = match self.drift {
                            Drift::Rise => Motion::Falling,
                            Drift::Fall => Motion::Idle,
                        };
                    }
                }
                Motion::Falling => {
                    *level = level.saturating_sub(1);
                    if *level == 0 {
                        *motion = match self.drift {
                            Drift::Rise => Motion::Idle,
                            Drift::Fall => Motion::Rising,
                        };
                    }
                }
            }
        }
        levels
    }

    /// Rolls the dice once and possibly wakes a channel.
    pub fn maybe_wake(&mut self) -> Option<Channel> {
        if self.chance == 0 || !self.rng.next_u32().is_multiple_of(self.chance) {
            return None;
        }
        let channel = Channel::from_index((self.rng.next_u32() % 4) as usize);
        let motion = &mut self.motions[channel.index()];
        if *motion != Motion::Idle {
            return None;
        }
        *motion = match self.drift {
            Drift::Rise => Motion::Rising,
            Drift::Fall => Motion::Falling,
        };
        Some(channel)
    }
}

impl<G: RngCore> Sequence for RandomWalk<G> {
    fn start_levels(&self) -> Levels {
        self.drift.resting()
    }

    fn prepare<S: Stage + ?Sized>(&mut self, _session: &mut Session<'_, S>) -> Result<(), Halt> {
        self.motions = [Motion::Idle; 4];
        Ok(())
    }

    fn cycle<S: Stage + ?Sized>(&mut self, session: &mut Session<'_, S>) -> Result<(), Halt> {
        let levels = self.advance(session.levels());
        session.show(levels);
        self.maybe_wake();
        Ok(())
    }
}

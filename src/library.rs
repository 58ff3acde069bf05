//! The built-in lighting effects.
//!
//! Most effects are [`Choreography`] tables interpreted by the shared phase
//! player. Two are randomized walks and one follows the microphone.

use rand_core::RngCore;

use crate::channel::{Channel, Levels};
use crate::choreography::{Choreography, ChoreographyBuilder};
use crate::sequence::{Halt, Sequence, Session, Stage};
use crate::sound::SoundReactive;
use crate::types::{PatternError, Phase, Track};
use crate::walk::RandomWalk;

/// Phase capacity of a built-in choreography.
pub const PHASES: usize = 48;

/// Built-in effects in picker order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Effect {
    /// Each channel fades up in turn, then each fades down in turn.
    FadeEach,
    /// Each channel fades up in turn, then all fade down together.
    FadeEachThenAll,
    /// Each channel flashes three times, then all fade out.
    FlashEach,
    /// All channels breathe slowly together.
    Breathe,
    /// All channels pulse quickly together.
    Pulse,
    /// Light hands off from one channel to the next.
    Chase,
    /// Chase out and back.
    ChaseBounce,
    /// Flickering, sagging glow like an unsteady supply.
    Brownout,
    /// Quick flash, long fade.
    FlashFade,
    /// Channels flare up at random from dark.
    Twinkle,
    /// Channels dip at random from full.
    Shimmer,
    /// All channels follow room loudness.
    SoundReactive,
}

impl Effect {
    /// All effects in picker order.
    pub const ALL: [Effect; 12] = [
        Effect::FadeEach,
        Effect::FadeEachThenAll,
        Effect::FlashEach,
        Effect::Breathe,
        Effect::Pulse,
        Effect::Chase,
        Effect::ChaseBounce,
        Effect::Brownout,
        Effect::FlashFade,
        Effect::Twinkle,
        Effect::Shimmer,
        Effect::SoundReactive,
    ];

    /// Position in picker order, as persisted.
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Effect at a persisted index, if valid.
    pub const fn from_index(index: u8) -> Option<Effect> {
        if (index as usize) < Self::ALL.len() {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Instantiates the effect. Only the walks use `rng`.
    ///
    /// # Errors
    /// Propagates choreography validation failures.
    pub fn program<G: RngCore>(self, rng: G) -> Result<Program<G>, PatternError> {
        let choreography = match self {
            Effect::FadeEach => fade_each()?,
            Effect::FadeEachThenAll => fade_each_then_all()?,
            Effect::FlashEach => flash_each()?,
            Effect::Breathe => table(&[], &BREATHE)?,
            Effect::Pulse => table(&[], &PULSE)?,
            Effect::Chase => chase(false)?,
            Effect::ChaseBounce => chase(true)?,
            Effect::Brownout => table(&BROWNOUT_INTRO, &BROWNOUT)?,
            Effect::FlashFade => table(&[], &FLASH_FADE)?,
            Effect::Twinkle => return Ok(Program::Walk(RandomWalk::rise(rng))),
            Effect::Shimmer => return Ok(Program::Walk(RandomWalk::fall(rng))),
            Effect::SoundReactive => return Ok(Program::Sound(SoundReactive::default())),
        };
        Ok(Program::Choreographed(choreography))
    }
}

/// An instantiated effect.
///
/// Sized by its largest variant, a [`Choreography`] of [`PHASES`] phases.
/// There is no allocator to box it into.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone)]
pub enum Program<G> {
    Choreographed(Choreography<PHASES>),
    Walk(RandomWalk<G>),
    Sound(SoundReactive),
}

impl<G: RngCore> Sequence for Program<G> {
    fn start_levels(&self) -> Levels {
        match self {
            Program::Choreographed(c) => c.start_levels(),
            Program::Walk(w) => w.start_levels(),
            Program::Sound(s) => s.start_levels(),
        }
    }

    fn prepare<S: Stage + ?Sized>(&mut self, session: &mut Session<'_, S>) -> Result<(), Halt> {
        match self {
            Program::Choreographed(c) => c.prepare(session),
            Program::Walk(w) => w.prepare(session),
            Program::Sound(s) => s.prepare(session),
        }
    }

    fn cycle<S: Stage + ?Sized>(&mut self, session: &mut Session<'_, S>) -> Result<(), Halt> {
        match self {
            Program::Choreographed(c) => c.cycle(session),
            Program::Walk(w) => w.cycle(session),
            Program::Sound(s) => s.cycle(session),
        }
    }
}

const BREATHE: [Phase; 3] = [
    Phase::ramp_all(Track::at(0, 1), 255, 1),
    Phase::ramp_all(Track::at(255, -1), 256, 1),
    Phase::wait(100),
];

const PULSE: [Phase; 3] = [
    Phase::ramp_all(Track::at(0, 4), 64, 1),
    Phase::ramp_all(Track::at(255, -4), 64, 1),
    Phase::wait(30),
];

const BROWNOUT_INTRO: [Phase; 1] = [Phase::ramp_all(Track::at(0, 1), 60, 2)];

// Relative ramps wrap on purpose; the dip below zero reads as a flicker.
const BROWNOUT: [Phase; 13] = [
    Phase::hold(100, 5),
    Phase::ramp_all(Track::relative(-1), 60, 3),
    Phase::ramp_all(Track::relative(1), 60, 4),
    Phase::hold(100, 10),
    Phase::ramp_all(Track::relative(1), 40, 2),
    Phase::ramp_all(Track::relative(-1), 40, 2),
    Phase::ramp_all(Track::relative(-1), 30, 5),
    Phase::hold(100, 20),
    Phase::ramp_all(Track::relative(1), 30, 5),
    Phase::hold(100, 30),
    Phase::ramp_all(Track::relative(1), 40, 2),
    Phase::hold(100, 20),
    Phase::ramp_all(Track::relative(-1), 40, 2),
];

const FLASH_FADE: [Phase; 4] = [
    Phase::ramp_all(Track::relative(2), 100, 0),
    Phase::hold(8, 1),
    Phase::ramp_all(Track::relative(-1), 200, 35),
    Phase::hold(100, 10),
];

fn table(intro: &[Phase], cycle: &[Phase]) -> Result<Choreography<PHASES>, PatternError> {
    let mut builder = ChoreographyBuilder::new();
    for &phase in intro {
        builder = builder.intro(phase)?;
    }
    builder.phases(cycle)?.build()
}

fn fade_each() -> Result<Choreography<PHASES>, PatternError> {
    let mut builder = ChoreographyBuilder::new();
    for channel in Channel::ALL {
        builder = builder.phase(Phase::ramp(channel, Track::relative(1), 255, 1))?;
    }
    for channel in Channel::ALL {
        builder = builder.phase(Phase::ramp(channel, Track::relative(-1), 255, 1))?;
    }
    builder.build()
}

fn fade_each_then_all() -> Result<Choreography<PHASES>, PatternError> {
    let mut builder = ChoreographyBuilder::new();
    for channel in Channel::ALL {
        builder = builder.phase(Phase::ramp(channel, Track::relative(1), 255, 2))?;
    }
    builder
        .phase(Phase::ramp_all(Track::relative(-1), 255, 4))?
        .build()
}

fn flash_each() -> Result<Choreography<PHASES>, PatternError> {
    let mut builder = ChoreographyBuilder::new();
    for channel in Channel::ALL {
        let linger = if channel == Channel::Fourth { 500 } else { 100 };
        builder = builder.phases(&[
            Phase::set(channel, 255),
            Phase::wait(50),
            Phase::set(channel, 0),
            Phase::wait(50),
            Phase::set(channel, 255),
            Phase::wait(50),
            Phase::set(channel, 0),
            Phase::wait(50),
            Phase::set(channel, 255),
            Phase::wait(linger),
        ])?;
    }
    builder
        .phases(&[
            Phase::ramp_all(Track::at(255, -1), 255, 1),
            Phase::set_all(0),
            Phase::wait(500),
        ])?
        .build()
}

fn chase(bounce: bool) -> Result<Choreography<PHASES>, PatternError> {
    let mut builder = chase_leg(ChoreographyBuilder::new(), Channel::ALL)?;
    if bounce {
        let mut reversed = Channel::ALL;
        reversed.reverse();
        builder = chase_leg(builder, reversed)?;
    }
    builder.build()
}

/// Light enters at the first channel of `order`, passes down the line and
/// leaves through the last.
fn chase_leg(
    builder: ChoreographyBuilder<PHASES>,
    order: [Channel; 4],
) -> Result<ChoreographyBuilder<PHASES>, PatternError> {
    let mut builder = builder.phase(Phase::ramp(order[0], Track::at(0, 2), 100, 0))?;
    for pair in order.windows(2) {
        builder = builder.phase(Phase::hand_off(pair[0], pair[1], 200, 2, 101, 0))?;
    }
    builder
        .phase(Phase::ramp(order[3], Track::at(200, -2), 101, 0))?
        .phase(Phase::wait(100))
}

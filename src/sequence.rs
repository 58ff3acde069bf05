//! The cooperative execution contract shared by every lighting sequence.
//!
//! There is no scheduler. A sequence owns the foreground thread for as long
//! as it runs and stays responsive only by polling the button at every
//! animation step through [`Session::checkpoint`]. A run ends in exactly
//! one of two ways: its timeout elapsed, or the button was pressed.

use core::convert::Infallible;

use crate::channel::Levels;
use crate::log;
use crate::time::{Deadline, Millis, Timeout};

/// Foreground capabilities available to a running sequence.
///
/// Implemented by [`Sequencer`](crate::Sequencer) on hardware and by
/// simulations in tests.
pub trait Stage {
    /// Current time.
    fn now(&self) -> Millis;

    /// Writes all four channel registers.
    fn show(&mut self, levels: Levels);

    /// Runs one button check; true on a tap or hold.
    fn pressed(&mut self) -> bool;

    /// Busy-waits without polling the button.
    fn pause(&mut self, millis: u32);

    /// Samples the microphone.
    fn listen(&mut self) -> u16;
}

/// Why a sequence stopped animating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Halt {
    /// The button was pressed.
    Pressed,
    /// The run's timeout elapsed.
    Elapsed,
}

/// Result of a complete run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Ran until its timeout elapsed.
    Elapsed,
    /// Aborted early because the button was pressed.
    Pressed,
}

impl Outcome {
    /// True if the run was cut short by the button.
    #[inline]
    pub fn pressed(self) -> bool {
        self == Outcome::Pressed
    }
}

impl From<Halt> for Outcome {
    fn from(halt: Halt) -> Self {
        match halt {
            Halt::Pressed => Outcome::Pressed,
            Halt::Elapsed => Outcome::Elapsed,
        }
    }
}

/// One run of a sequence on a [`Stage`].
///
/// Tracks the run's deadline and mirrors the four channel registers so
/// sequences can animate relative to what is currently shown.
pub struct Session<'s, S: Stage + ?Sized> {
    stage: &'s mut S,
    deadline: Deadline,
    levels: Levels,
}

impl<'s, S: Stage + ?Sized> Session<'s, S> {
    /// Starts a run now.
    pub fn new(stage: &'s mut S, timeout: Timeout) -> Self {
        let deadline = Deadline::new(stage.now(), timeout);
        Self {
            stage,
            deadline,
            levels: Levels::OFF,
        }
    }

    /// Levels last written.
    #[inline]
    pub fn levels(&self) -> Levels {
        self.levels
    }

    /// Writes all four channels.
    #[inline]
    pub fn show(&mut self, levels: Levels) {
        self.levels = levels;
        self.stage.show(levels);
    }

    /// Polls the button, then the deadline.
    ///
    /// # Errors
    /// `Halt::Pressed` on a press, `Halt::Elapsed` once the timeout passed.
    pub fn checkpoint(&mut self) -> Result<(), Halt> {
        if self.stage.pressed() {
            return Err(Halt::Pressed);
        }
        if self.deadline.expired(self.stage.now()) {
            return Err(Halt::Elapsed);
        }
        Ok(())
    }

    /// Busy-waits without polling.
    #[inline]
    pub fn pause(&mut self, millis: u32) {
        self.stage.pause(millis);
    }

    /// Waits `millis` while polling continuously.
    ///
    /// # Errors
    /// Returns as soon as a [`checkpoint`](Self::checkpoint) fails.
    pub fn wait(&mut self, millis: u32) -> Result<(), Halt> {
        let start = self.stage.now();
        loop {
            self.checkpoint()?;
            if self.stage.now().since(start) >= millis {
                return Ok(());
            }
        }
    }

    /// Samples the microphone.
    #[inline]
    pub fn listen(&mut self) -> u16 {
        self.stage.listen()
    }

    /// Current time.
    #[inline]
    pub fn now(&self) -> Millis {
        self.stage.now()
    }
}

/// A lighting sequence.
///
/// Implementors describe what to show; [`run`](Sequence::run) supplies the
/// shared execution contract: reset the channels, play the intro once, then
/// repeat the cycle with a checkpoint before each repetition until a
/// checkpoint halts.
pub trait Sequence {
    /// Levels written when a run starts.
    fn start_levels(&self) -> Levels {
        Levels::OFF
    }

    /// Played once per run, before the first cycle.
    fn prepare<S: Stage + ?Sized>(&mut self, session: &mut Session<'_, S>) -> Result<(), Halt> {
        let _ = session;
        Ok(())
    }

    /// Played repeatedly.
    ///
    /// Must call [`Session::checkpoint`] (directly or through
    /// [`Session::wait`]) at least once per animation step.
    fn cycle<S: Stage + ?Sized>(&mut self, session: &mut Session<'_, S>) -> Result<(), Halt>;

    /// Runs until the timeout elapses or the button is pressed.
    fn run<S: Stage + ?Sized>(&mut self, stage: &mut S, timeout: Timeout) -> Outcome {
        let mut session = Session::new(stage, timeout);
        session.show(self.start_levels());

        let Err(halt) = play(self, &mut session);
        let outcome = Outcome::from(halt);
        log::debug!("Sequence ended: {}", outcome);
        outcome
    }
}

fn play<Q, S>(sequence: &mut Q, session: &mut Session<'_, S>) -> Result<Infallible, Halt>
where
    Q: Sequence + ?Sized,
    S: Stage + ?Sized,
{
    sequence.prepare(session)?;
    loop {
        session.checkpoint()?;
        sequence.cycle(session)?;
    }
}

use heapless::Vec;

use crate::channel::Levels;
use crate::sequence::{Halt, Sequence, Session, Stage};
use crate::types::{PatternError, Phase};

/// A data-driven lighting pattern.
///
/// A choreography is a list of [`Phase`]s split in two: an intro played
/// once per run and a cycle repeated until the run ends. Every pattern
/// built from phases shares the same interpreter, so button polling and the
/// deadline behave identically across them.
///
/// # Type Parameters
/// * `N` - Maximum number of phases, intro and cycle together
#[derive(Debug, Clone)]
pub struct Choreography<const N: usize> {
    start: Levels,
    phases: Vec<Phase, N>,
    intro_len: usize,
}

impl<const N: usize> Choreography<N> {
    /// Creates a new choreography builder starting dark.
    pub fn builder() -> ChoreographyBuilder<N> {
        ChoreographyBuilder::new()
    }

    /// Levels shown when a run starts.
    pub fn start(&self) -> Levels {
        self.start
    }

    /// Phases played once per run.
    pub fn intro_phases(&self) -> &[Phase] {
        &self.phases[..self.intro_len]
    }

    /// Phases played repeatedly.
    pub fn cycle_phases(&self) -> &[Phase] {
        &self.phases[self.intro_len..]
    }

    /// Nominal duration of one cycle, ignoring conversion overhead.
    pub fn nominal_cycle_millis(&self) -> u32 {
        self.cycle_phases().iter().map(Phase::nominal_millis).sum()
    }
}

impl<const N: usize> Sequence for Choreography<N> {
    fn start_levels(&self) -> Levels {
        self.start
    }

    fn prepare<S: Stage + ?Sized>(&mut self, session: &mut Session<'_, S>) -> Result<(), Halt> {
        for phase in self.intro_phases() {
            phase.play(session)?;
        }
        Ok(())
    }

    fn cycle<S: Stage + ?Sized>(&mut self, session: &mut Session<'_, S>) -> Result<(), Halt> {
        for phase in self.cycle_phases() {
            phase.play(session)?;
        }
        Ok(())
    }
}

/// Builder for constructing validated choreographies.
#[derive(Debug)]
pub struct ChoreographyBuilder<const N: usize> {
    start: Levels,
    phases: Vec<Phase, N>,
    intro_len: usize,
}

impl<const N: usize> ChoreographyBuilder<N> {
    /// Creates a new empty builder starting dark.
    pub fn new() -> Self {
        Self {
            start: Levels::OFF,
            phases: Vec::new(),
            intro_len: 0,
        }
    }

    /// Sets the levels shown when a run starts.
    pub fn start(mut self, levels: Levels) -> Self {
        self.start = levels;
        self
    }

    /// Appends a phase to the intro.
    ///
    /// # Errors
    /// `CapacityExceeded` if the choreography is full.
    pub fn intro(mut self, phase: Phase) -> Result<Self, PatternError> {
        self.phases
            .insert(self.intro_len, phase)
            .map_err(|_| PatternError::CapacityExceeded)?;
        self.intro_len += 1;
        Ok(self)
    }

    /// Appends a phase to the cycle.
    ///
    /// # Errors
    /// `CapacityExceeded` if the choreography is full.
    pub fn phase(mut self, phase: Phase) -> Result<Self, PatternError> {
        self.phases
            .push(phase)
            .map_err(|_| PatternError::CapacityExceeded)?;
        Ok(self)
    }

    /// Appends several phases to the cycle.
    ///
    /// # Errors
    /// `CapacityExceeded` if the choreography is full.
    pub fn phases(mut self, phases: &[Phase]) -> Result<Self, PatternError> {
        self.phases
            .extend_from_slice(phases)
            .map_err(|_| PatternError::CapacityExceeded)?;
        Ok(self)
    }

    /// Builds and validates the choreography.
    ///
    /// # Errors
    /// * `EmptyCycle` - No cycle phases were added
    /// * `CycleNeverPolls` - The cycle would never consult the button
    pub fn build(self) -> Result<Choreography<N>, PatternError> {
        let cycle = &self.phases[self.intro_len..];
        if cycle.is_empty() {
            return Err(PatternError::EmptyCycle);
        }
        if !cycle.iter().any(Phase::polls) {
            return Err(PatternError::CycleNeverPolls);
        }

        Ok(Choreography {
            start: self.start,
            phases: self.phases,
            intro_len: self.intro_len,
        })
    }
}

impl<const N: usize> Default for ChoreographyBuilder<N> {
    fn default() -> Self {
        Self::new()
    }
}

//! Sound-reactive pattern: all four channels follow room loudness.

use crate::channel::Levels;
use crate::envelope::{Decay, EnvelopeConfig, SoundEnvelope};
use crate::sequence::{Halt, Sequence, Session, Stage};

/// Shows the microphone envelope on every channel.
///
/// Each step takes one microphone sample, re-estimates loudness and shows
/// it through a fast-attack, one-per-millisecond decay.
#[derive(Debug, Clone)]
pub struct SoundReactive {
    envelope: SoundEnvelope,
    decay: Decay,
}

impl SoundReactive {
    pub fn new(config: EnvelopeConfig) -> Self {
        Self {
            envelope: SoundEnvelope::new(config),
            decay: Decay::new(Default::default()),
        }
    }

    pub fn envelope(&self) -> &SoundEnvelope {
        &self.envelope
    }
}

impl Default for SoundReactive {
    fn default() -> Self {
        Self::new(EnvelopeConfig::default())
    }
}

impl Sequence for SoundReactive {
    fn prepare<S: Stage + ?Sized>(&mut self, session: &mut Session<'_, S>) -> Result<(), Halt> {
        self.envelope.reset();
        self.decay = Decay::new(session.now());
        Ok(())
    }

    fn cycle<S: Stage + ?Sized>(&mut self, session: &mut Session<'_, S>) -> Result<(), Halt> {
        self.envelope.push(session.listen());
        let shown = self.decay.update(self.envelope.level(), session.now());
        session.show(Levels::splat(shown));
        Ok(())
    }
}

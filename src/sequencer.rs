//! Foreground sequence runner bound to the real peripherals.
//!
//! Provides [`Sequencer`], which owns the four LED outputs, the ADC, a
//! blocking delay and the input monitor, and lends them to a running
//! [`Sequence`] as its [`Stage`].

use embedded_hal::delay::DelayNs;
use rand_core::RngCore;

use crate::channel::{LedChannels, Levels};
use crate::input::{InputMonitor, Press};
use crate::library::Effect;
use crate::log;
use crate::restart::Restart;
use crate::sampler::{AnalogInput, MuxChannel};
use crate::sequence::{Outcome, Sequence, Stage};
use crate::settings::{Settings, SettingsStore};
use crate::time::{Millis, Timeout, TimeSource};
use crate::types::PatternError;

/// Runs lighting sequences on four LED channels, interruptible by the
/// analog button.
///
/// Every animation step of a running sequence costs one button conversion.
/// A tap or hold ends the run early; a long press never returns, since
/// the input monitor commits settings and restarts the device.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `L` - LED outputs
/// * `A` - Analog input carrying the button and microphone
/// * `D` - Blocking delay
/// * `T` - Millisecond time source
/// * `S` - Settings store
/// * `R` - Restart mechanism
pub struct Sequencer<'t, L, A, D, T, S, R> {
    leds: L,
    adc: A,
    delay: D,
    time: &'t T,
    monitor: InputMonitor<S, R>,
    last_press: Press,
}

impl<'t, L, A, D, T, S, R> Sequencer<'t, L, A, D, T, S, R>
where
    L: LedChannels,
    A: AnalogInput,
    D: DelayNs,
    T: TimeSource,
    S: SettingsStore,
    R: Restart,
{
    /// Creates a sequencer and turns every channel off.
    pub fn new(mut leds: L, adc: A, delay: D, time: &'t T, monitor: InputMonitor<S, R>) -> Self {
        leds.set_levels(Levels::OFF);
        Self {
            leds,
            adc,
            delay,
            time,
            monitor,
            last_press: Press::Released,
        }
    }

    /// Runs `sequence` until the timeout elapses or the button is pressed.
    pub fn run<Q: Sequence + ?Sized>(&mut self, sequence: &mut Q, timeout: impl Into<Timeout>) -> Outcome {
        self.last_press = Press::Released;
        sequence.run(self, timeout.into())
    }

    /// Runs a built-in effect and records it as the one to restore after a
    /// restart.
    ///
    /// # Errors
    /// Propagates choreography validation failures.
    pub fn play<G: RngCore>(
        &mut self,
        effect: Effect,
        rng: G,
        timeout: impl Into<Timeout>,
    ) -> Result<Outcome, PatternError> {
        let mut program = effect.program(rng)?;
        log::info!("Playing effect {=u8}", effect.index());
        self.monitor.settings_mut().set_sequence(effect.index());
        Ok(self.run(&mut program, timeout))
    }

    /// How the button was pressed to end the last run, if it was.
    pub fn last_press(&self) -> Press {
        self.last_press
    }

    pub fn settings(&self) -> &Settings<S> {
        self.monitor.settings()
    }

    pub fn settings_mut(&mut self) -> &mut Settings<S> {
        self.monitor.settings_mut()
    }

    pub fn monitor(&self) -> &InputMonitor<S, R> {
        &self.monitor
    }

    /// Releases the peripherals.
    pub fn free(self) -> (L, A, D, InputMonitor<S, R>) {
        (self.leds, self.adc, self.delay, self.monitor)
    }
}

impl<L, A, D, T, S, R> Stage for Sequencer<'_, L, A, D, T, S, R>
where
    L: LedChannels,
    A: AnalogInput,
    D: DelayNs,
    T: TimeSource,
    S: SettingsStore,
    R: Restart,
{
    fn now(&self) -> Millis {
        self.time.now()
    }

    fn show(&mut self, levels: Levels) {
        self.leds.set_levels(levels);
    }

    fn pressed(&mut self) -> bool {
        let press = self
            .monitor
            .check(&mut self.adc, &mut self.delay, &mut self.leds);
        if press.is_pressed() {
            self.last_press = press;
        }
        press.is_pressed()
    }

    fn pause(&mut self, millis: u32) {
        self.delay.delay_ms(millis);
    }

    fn listen(&mut self) -> u16 {
        self.adc.read(MuxChannel::MICROPHONE)
    }
}

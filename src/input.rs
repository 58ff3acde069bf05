//! Analog button with debounce and a long-press restart.
//!
//! The button pulls a voltage divider on an analog input down. Any reading
//! below the threshold counts as "down". The threshold sits under the
//! released level but above the level that would trip the hardware reset
//! sharing the line.
//!
//! A single [`InputMonitor::check`] runs a fixed ladder of blocking waits:
//!
//! ```text
//! sample ── up ──────────────────────────────────────> Released
//!   │ down
//! wait debounce, sample ── up ───────────────────────> Tapped
//!   │ down
//! wait hold, sample ── up ───────────────────────────> Held
//!   │ down
//! blink, settle, commit settings, restart (never returns)
//! ```
//!
//! The released path does a single conversion and nothing else, since every
//! animation step pays for it.

use embedded_hal::delay::DelayNs;

use crate::channel::{LedChannels, Levels};
use crate::log;
use crate::restart::Restart;
use crate::sampler::{AnalogInput, MuxChannel};
use crate::settings::{Settings, SettingsStore};

/// Calibration of the button ladder.
///
/// Defaults match the reference voltage divider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputConfig {
    /// Readings below this count as pressed.
    pub threshold: u16,
    /// Wait before confirming a press.
    pub debounce_ms: u32,
    /// Further wait before a confirmed press becomes a restart.
    pub hold_ms: u32,
    /// On/off flashes acknowledging a restart.
    pub blink_count: u8,
    /// Duration of each half of a flash.
    pub blink_ms: u32,
    /// Dark pause between the flashes and the restart.
    pub settle_ms: u32,
}

impl InputConfig {
    pub const fn new() -> Self {
        Self {
            threshold: 1000,
            debounce_ms: 300,
            hold_ms: 3000,
            blink_count: 10,
            blink_ms: 50,
            settle_ms: 2000,
        }
    }

    pub const fn with_threshold(mut self, threshold: u16) -> Self {
        self.threshold = threshold;
        self
    }

    pub const fn with_debounce_ms(mut self, debounce_ms: u32) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    pub const fn with_hold_ms(mut self, hold_ms: u32) -> Self {
        self.hold_ms = hold_ms;
        self
    }

    pub const fn with_blink(mut self, count: u8, millis: u32) -> Self {
        self.blink_count = count;
        self.blink_ms = millis;
        self
    }

    pub const fn with_settle_ms(mut self, settle_ms: u32) -> Self {
        self.settle_ms = settle_ms;
        self
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of one button check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Press {
    /// Button was up.
    Released,
    /// Button was down but up again after the debounce wait.
    Tapped,
    /// Button stayed down through the debounce wait but was released
    /// before the hold wait ended.
    Held,
}

impl Press {
    /// True for any press, short or held.
    #[inline]
    pub fn is_pressed(self) -> bool {
        !matches!(self, Press::Released)
    }
}

/// Polls the button and escalates long presses into a restart.
pub struct InputMonitor<S, R> {
    config: InputConfig,
    settings: Settings<S>,
    restart: R,
}

impl<S: SettingsStore, R: Restart> InputMonitor<S, R> {
    pub fn new(config: InputConfig, settings: Settings<S>, restart: R) -> Self {
        Self {
            config,
            settings,
            restart,
        }
    }

    /// Classifies the button state, blocking only while it is held down.
    pub fn check<A, D, L>(&mut self, adc: &mut A, delay: &mut D, leds: &mut L) -> Press
    where
        A: AnalogInput,
        D: DelayNs,
        L: LedChannels,
    {
        if !self.is_down(adc) {
            return Press::Released;
        }

        delay.delay_ms(self.config.debounce_ms);
        if !self.is_down(adc) {
            log::debug!("Button tapped");
            return Press::Tapped;
        }

        delay.delay_ms(self.config.hold_ms);
        if !self.is_down(adc) {
            log::debug!("Button held");
            return Press::Held;
        }

        self.acknowledge_and_restart(delay, leds)
    }

    /// Returns true if the button line currently reads below threshold.
    #[inline]
    pub fn is_down<A: AnalogInput>(&self, adc: &mut A) -> bool {
        adc.read(MuxChannel::BUTTON) < self.config.threshold
    }

    fn acknowledge_and_restart<D, L>(&mut self, delay: &mut D, leds: &mut L) -> !
    where
        D: DelayNs,
        L: LedChannels,
    {
        log::warn!("Long press, restarting");
        for _ in 0..self.config.blink_count {
            leds.set_levels(Levels::FULL);
            delay.delay_ms(self.config.blink_ms);
            leds.set_levels(Levels::OFF);
            delay.delay_ms(self.config.blink_ms);
        }
        delay.delay_ms(self.config.settle_ms);
        self.settings.commit();
        self.restart.restart()
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    pub fn settings(&self) -> &Settings<S> {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings<S> {
        &mut self.settings
    }
}

//! Shared test infrastructure for quad-sequencer integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::Cell;
use core::convert::Infallible;
use core::ops::Range;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use embedded_hal::pwm::{self, SetDutyCycle};
use quad_sequencer::{
    AnalogInput, LedChannels, Levels, Millis, MuxChannel, Restart, SettingsStore, Stage,
    TimeSource,
};

// ============================================================================
// Simulated Clock
// ============================================================================

/// Time spent by one simulated ADC conversion.
pub const CONVERSION_NS: u64 = 100_000;

/// Reading of a released button.
pub const RELEASED_LEVEL: u16 = 1023;

/// Reading of a pressed button.
pub const PRESSED_LEVEL: u16 = 900;

/// Nanosecond clock shared by every simulated peripheral
pub struct SimClock {
    nanos: Cell<u64>,
}

impl SimClock {
    pub fn new() -> Self {
        Self { nanos: Cell::new(0) }
    }

    pub fn advance_ns(&self, nanos: u64) {
        self.nanos.set(self.nanos.get() + nanos);
    }

    pub fn advance_ms(&self, millis: u64) {
        self.advance_ns(millis * 1_000_000);
    }

    pub fn nanos(&self) -> u64 {
        self.nanos.get()
    }

    /// Elapsed milliseconds, fractional part included
    pub fn millis_f(&self) -> f64 {
        self.nanos.get() as f64 / 1_000_000.0
    }
}

impl TimeSource for SimClock {
    fn now(&self) -> Millis {
        Millis((self.nanos.get() / 1_000_000) as u32)
    }
}

/// Blocking delay that advances the simulated clock
pub struct SimDelay<'c> {
    clock: &'c SimClock,
}

impl<'c> SimDelay<'c> {
    pub fn new(clock: &'c SimClock) -> Self {
        Self { clock }
    }
}

impl DelayNs for SimDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.clock.advance_ns(u64::from(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.clock.advance_ns(u64::from(us) * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.clock.advance_ms(u64::from(ms));
    }
}

// ============================================================================
// Simulated ADC
// ============================================================================

/// Analog inputs with a scripted button and microphone
///
/// Each conversion costs [`CONVERSION_NS`]. The button reads low while the
/// clock is inside any of the press windows (in milliseconds).
pub struct SimAdc<'c> {
    clock: &'c SimClock,
    presses: Vec<Range<u64>>,
    mic: Vec<u16>,
    mic_reads: usize,
    button_reads: usize,
}

impl<'c> SimAdc<'c> {
    pub fn new(clock: &'c SimClock) -> Self {
        Self {
            clock,
            presses: Vec::new(),
            mic: Vec::new(),
            mic_reads: 0,
            button_reads: 0,
        }
    }

    /// Holds the button down from `window.start` until `window.end` ms
    pub fn press(mut self, window: Range<u64>) -> Self {
        self.presses.push(window);
        self
    }

    /// Microphone samples, repeated cyclically
    pub fn mic(mut self, samples: &[u16]) -> Self {
        self.mic = samples.to_vec();
        self
    }

    pub fn button_reads(&self) -> usize {
        self.button_reads
    }

    pub fn mic_reads(&self) -> usize {
        self.mic_reads
    }

    fn button_level(&self) -> u16 {
        let now = self.clock.nanos();
        let down = self
            .presses
            .iter()
            .any(|w| now >= w.start * 1_000_000 && now < w.end * 1_000_000);
        if down { PRESSED_LEVEL } else { RELEASED_LEVEL }
    }
}

impl AnalogInput for SimAdc<'_> {
    fn read(&mut self, channel: MuxChannel) -> u16 {
        self.clock.advance_ns(CONVERSION_NS);
        if channel == MuxChannel::BUTTON {
            self.button_reads += 1;
            self.button_level()
        } else if channel == MuxChannel::MICROPHONE {
            let sample = if self.mic.is_empty() {
                512
            } else {
                self.mic[self.mic_reads % self.mic.len()]
            };
            self.mic_reads += 1;
            sample
        } else {
            0
        }
    }
}

// ============================================================================
// Recording LEDs
// ============================================================================

/// LED outputs that record every frame with its timestamp in ms
pub struct RecordingLeds<'c> {
    clock: &'c SimClock,
    current: Levels,
    frames: Vec<(f64, Levels)>,
}

impl<'c> RecordingLeds<'c> {
    pub fn new(clock: &'c SimClock) -> Self {
        Self {
            clock,
            current: Levels::OFF,
            frames: Vec::new(),
        }
    }

    pub fn current(&self) -> Levels {
        self.current
    }

    pub fn frames(&self) -> &[(f64, Levels)] {
        &self.frames
    }

    pub fn levels(&self) -> Vec<Levels> {
        self.frames.iter().map(|&(_, levels)| levels).collect()
    }
}

impl LedChannels for RecordingLeds<'_> {
    fn set_level(&mut self, channel: quad_sequencer::Channel, level: u8) {
        self.current[channel] = level;
    }

    fn set_levels(&mut self, levels: Levels) {
        self.current = levels;
        self.frames.push((self.clock.millis_f(), levels));
    }
}

// ============================================================================
// Simulated Stage
// ============================================================================

/// Stage without an input monitor: a press is any button conversion that
/// reads low
pub struct SimStage<'c> {
    pub clock: &'c SimClock,
    pub adc: SimAdc<'c>,
    pub leds: RecordingLeds<'c>,
    pub delay: SimDelay<'c>,
}

impl<'c> SimStage<'c> {
    pub fn new(clock: &'c SimClock, adc: SimAdc<'c>) -> Self {
        Self {
            clock,
            adc,
            leds: RecordingLeds::new(clock),
            delay: SimDelay::new(clock),
        }
    }
}

impl Stage for SimStage<'_> {
    fn now(&self) -> Millis {
        self.clock.now()
    }

    fn show(&mut self, levels: Levels) {
        self.leds.set_levels(levels);
    }

    fn pressed(&mut self) -> bool {
        self.adc.read(MuxChannel::BUTTON) < 1000
    }

    fn pause(&mut self, millis: u32) {
        self.delay.delay_ms(millis);
    }

    fn listen(&mut self) -> u16 {
        self.adc.read(MuxChannel::MICROPHONE)
    }
}

// ============================================================================
// Settings and Restart
// ============================================================================

/// Settings byte held in memory, counting writes
pub struct MemoryStore {
    pub value: u8,
    pub saves: usize,
}

impl MemoryStore {
    pub fn new(value: u8) -> Self {
        Self { value, saves: 0 }
    }
}

impl SettingsStore for MemoryStore {
    fn load(&mut self) -> u8 {
        self.value
    }

    fn save(&mut self, value: u8) {
        self.value = value;
        self.saves += 1;
    }
}

/// Restart that unwinds out of the test instead
pub struct PanicRestart;

impl Restart for PanicRestart {
    fn restart(&mut self) -> ! {
        panic!("restart");
    }
}

// ============================================================================
// Mock PWM and Pins
// ============================================================================

/// Hardware PWM channel with an 8-bit compare register
pub struct MockPwm<'a> {
    duty: &'a Cell<u16>,
}

impl<'a> MockPwm<'a> {
    pub fn new(duty: &'a Cell<u16>) -> Self {
        Self { duty }
    }
}

impl pwm::ErrorType for MockPwm<'_> {
    type Error = Infallible;
}

impl SetDutyCycle for MockPwm<'_> {
    fn max_duty_cycle(&self) -> u16 {
        255
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duty.set(duty);
        Ok(())
    }
}

/// Output pin that remembers its state and counts rising edges
#[derive(Default)]
pub struct MockPin {
    pub high: bool,
    pub rising_edges: usize,
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if !self.high {
            self.rising_edges += 1;
        }
        self.high = true;
        Ok(())
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Largest change of any channel between consecutive frames
pub fn max_step(frames: &[Levels]) -> u8 {
    frames
        .windows(2)
        .flat_map(|pair| {
            pair[0]
                .0
                .iter()
                .zip(pair[1].0.iter())
                .map(|(a, b)| a.abs_diff(*b))
                .collect::<Vec<_>>()
        })
        .max()
        .unwrap_or(0)
}

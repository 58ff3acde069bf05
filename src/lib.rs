#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`TimeBase`**: Millisecond clock advanced from a timer overflow interrupt
//! - **`SoftPwm`**: Interrupt-emulated PWM for the channel without a compare output
//! - **`QuadPwm`**: Three hardware PWM outputs plus one `SoftPwm`, behind `LedChannels`
//! - **`Sampler`**: Blocking ADC conversions on a multiplexed input
//! - **`InputMonitor`**: Debounced analog button with a long-press restart
//! - **`SoundEnvelope`**: Loudness estimate from a ring of microphone samples
//! - **`Sequence`**: Lighting pattern run until a timeout or a button press
//! - **`Choreography`**: Data-driven pattern built from `Phase`s
//! - **`Sequencer`**: Binds the peripherals together and runs sequences
//!
//! Every running sequence polls the button at each animation step, so a
//! press is noticed within one step no matter which pattern is showing.

pub mod channel;
pub mod choreography;
pub mod envelope;
pub mod input;
pub mod library;
mod log;
pub mod restart;
pub mod sampler;
pub mod sequence;
pub mod sequencer;
pub mod settings;
pub mod soft_pwm;
pub mod sound;
pub mod time;
pub mod timebase;
pub mod types;
pub mod walk;

pub use channel::{Channel, LedChannels, Levels, MAX_LEVEL, QuadPwm};
pub use choreography::{Choreography, ChoreographyBuilder};
pub use envelope::{Decay, EnvelopeConfig, SoundEnvelope};
pub use input::{InputConfig, InputMonitor, Press};
pub use library::{Effect, Program};
pub use restart::{Restart, Watchdog, WatchdogRestart};
pub use sampler::{AdcPeripheral, AnalogInput, MuxChannel, Sampler, SamplerError};
pub use sequence::{Halt, Outcome, Sequence, Session, Stage};
pub use sequencer::Sequencer;
pub use settings::{Settings, SettingsStore};
pub use soft_pwm::SoftPwm;
pub use sound::SoundReactive;
pub use time::{Deadline, Millis, Timeout, TimeSource};
pub use timebase::TimeBase;
pub use types::{PatternError, Phase, Start, Track};
pub use walk::{Drift, RandomWalk};

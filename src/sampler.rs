//! Blocking single-conversion ADC reader.
//!
//! The foreground thread is the only caller. A conversion is started and the
//! result register is polled until the hardware reports completion; there is
//! nothing else for the foreground to do meanwhile, and spinning keeps the
//! interrupt set limited to the two timer handlers.

use core::convert::Infallible;

/// Largest raw reading of the 10-bit converter.
pub const ADC_MAX: u16 = 1023;

/// Theoretical reading of a quiescent, mid-biased signal.
pub const ADC_MID_SCALE: u16 = 512;

/// Number of multiplexer inputs the converter can select.
pub const MUX_INPUTS: u8 = 4;

/// One of the converter's multiplexed analog inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MuxChannel(u8);

impl MuxChannel {
    /// Button voltage divider.
    pub const BUTTON: MuxChannel = MuxChannel(0);

    /// Amplified microphone.
    pub const MICROPHONE: MuxChannel = MuxChannel(1);

    /// Creates a channel selector.
    ///
    /// # Errors
    /// `ChannelOutOfRange` if `index` is not below [`MUX_INPUTS`].
    pub const fn new(index: u8) -> Result<Self, SamplerError> {
        if index < MUX_INPUTS {
            Ok(MuxChannel(index))
        } else {
            Err(SamplerError::ChannelOutOfRange(index))
        }
    }

    /// Multiplexer bits for this channel.
    #[inline]
    pub fn index(self) -> u8 {
        self.0
    }
}

/// Analog sampler errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SamplerError {
    /// Requested multiplexer input does not exist.
    ChannelOutOfRange(u8),
}

impl core::fmt::Display for SamplerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SamplerError::ChannelOutOfRange(index) => {
                write!(
                    f,
                    "analog channel {} out of range (converter has {} inputs)",
                    index, MUX_INPUTS
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SamplerError {}

/// Register-level contract of the analog-to-digital converter.
pub trait AdcPeripheral {
    /// Routes the given input to the converter.
    fn select(&mut self, channel: MuxChannel);

    /// Starts a single conversion.
    fn start_conversion(&mut self);

    /// Returns the converted value, or `WouldBlock` while conversion is
    /// still in progress.
    fn result(&mut self) -> nb::Result<u16, Infallible>;
}

/// Synchronous analog reads, one channel at a time.
pub trait AnalogInput {
    /// Digitizes the given channel and returns the raw reading.
    fn read(&mut self, channel: MuxChannel) -> u16;
}

impl<A: AnalogInput + ?Sized> AnalogInput for &mut A {
    fn read(&mut self, channel: MuxChannel) -> u16 {
        (**self).read(channel)
    }
}

/// Blocking reader over an [`AdcPeripheral`].
#[derive(Debug)]
pub struct Sampler<P> {
    adc: P,
}

impl<P: AdcPeripheral> Sampler<P> {
    /// Wraps a configured converter.
    pub fn new(adc: P) -> Self {
        Self { adc }
    }

    /// Releases the converter.
    pub fn free(self) -> P {
        self.adc
    }
}

impl<P: AdcPeripheral> AnalogInput for Sampler<P> {
    fn read(&mut self, channel: MuxChannel) -> u16 {
        self.adc.select(channel);
        self.adc.start_conversion();
        match nb::block!(self.adc.result()) {
            Ok(value) => value & ADC_MAX,
            Err(never) => match never {},
        }
    }
}

//! The four brightness outputs and the hardware seam that drives them.

use core::ops::{Index, IndexMut};

use embedded_hal::pwm::SetDutyCycle;

use crate::soft_pwm::SoftPwm;

/// Full-scale brightness.
pub const MAX_LEVEL: u8 = 255;

/// One of the four independently dimmable outputs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    First,
    Second,
    Third,
    Fourth,
}

impl Channel {
    /// All channels in display order.
    pub const ALL: [Channel; 4] = [
        Channel::First,
        Channel::Second,
        Channel::Third,
        Channel::Fourth,
    ];

    /// Position of the channel in display order.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Channel at `index` in display order, wrapping modulo four.
    #[inline]
    pub const fn from_index(index: usize) -> Channel {
        Channel::ALL[index % 4]
    }
}

/// Brightness of all four channels, `0..=255` each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Levels(pub [u8; 4]);

impl Levels {
    /// Everything dark.
    pub const OFF: Levels = Levels([0; 4]);

    /// Everything at full brightness.
    pub const FULL: Levels = Levels([MAX_LEVEL; 4]);

    /// All four channels at the same level.
    #[inline]
    pub const fn splat(level: u8) -> Levels {
        Levels([level; 4])
    }

    /// Returns a copy with one channel changed.
    #[inline]
    pub const fn with(mut self, channel: Channel, level: u8) -> Levels {
        self.0[channel.index()] = level;
        self
    }

    /// Iterates `(channel, level)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, u8)> + '_ {
        Channel::ALL.iter().map(move |&channel| (channel, self[channel]))
    }
}

impl Index<Channel> for Levels {
    type Output = u8;

    fn index(&self, channel: Channel) -> &u8 {
        &self.0[channel.index()]
    }
}

impl IndexMut<Channel> for Levels {
    fn index_mut(&mut self, channel: Channel) -> &mut u8 {
        &mut self.0[channel.index()]
    }
}

/// Trait for abstracting the four-channel LED hardware.
///
/// Implement this for your outputs (hardware PWM, emulated PWM, a test
/// recorder, ...). Levels use a linear 0-255 scale on every channel. Handle
/// any hardware errors internally - this method cannot fail.
pub trait LedChannels {
    /// Sets one channel's brightness.
    fn set_level(&mut self, channel: Channel, level: u8);

    /// Sets all four channels.
    fn set_levels(&mut self, levels: Levels) {
        for (channel, level) in levels.iter() {
            self.set_level(channel, level);
        }
    }
}

impl<L: LedChannels + ?Sized> LedChannels for &mut L {
    fn set_level(&mut self, channel: Channel, level: u8) {
        (**self).set_level(channel, level);
    }

    fn set_levels(&mut self, levels: Levels) {
        (**self).set_levels(levels);
    }
}

/// Three hardware PWM outputs plus one interrupt-emulated output.
///
/// The first three channels map to the hardware compare outputs, the fourth
/// to the [`SoftPwm`] duty register.
pub struct QuadPwm<'p, A, B, C>
where
    A: SetDutyCycle,
    B: SetDutyCycle,
    C: SetDutyCycle,
{
    first: A,
    second: B,
    third: C,
    fourth: &'p SoftPwm,
}

impl<'p, A, B, C> QuadPwm<'p, A, B, C>
where
    A: SetDutyCycle,
    B: SetDutyCycle,
    C: SetDutyCycle,
{
    /// Creates the output set and turns every channel off.
    pub fn new(first: A, second: B, third: C, fourth: &'p SoftPwm) -> Self {
        let mut outputs = Self {
            first,
            second,
            third,
            fourth,
        };
        outputs.set_levels(Levels::OFF);
        outputs
    }

    /// Releases the hardware outputs.
    pub fn free(self) -> (A, B, C) {
        (self.first, self.second, self.third)
    }
}

impl<A, B, C> LedChannels for QuadPwm<'_, A, B, C>
where
    A: SetDutyCycle,
    B: SetDutyCycle,
    C: SetDutyCycle,
{
    fn set_level(&mut self, channel: Channel, level: u8) {
        let duty = u16::from(level);
        let max = u16::from(MAX_LEVEL);
        match channel {
            Channel::First => {
                let _ = self.first.set_duty_cycle_fraction(duty, max);
            }
            Channel::Second => {
                let _ = self.second.set_duty_cycle_fraction(duty, max);
            }
            Channel::Third => {
                let _ = self.third.set_duty_cycle_fraction(duty, max);
            }
            Channel::Fourth => self.fourth.set_duty(level),
        }
    }
}

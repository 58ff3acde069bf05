//! Software PWM on a pin without a hardware compare output.
//!
//! One timer drives the pulse. Its overflow interrupt starts the pulse and
//! its compare-match interrupt, with the compare value equal to the duty
//! register, ends it. The pin is therefore high for roughly `duty / 255` of
//! every timer period, the same convention as the hardware channels.
//!
//! ```ignore
//! static FOURTH: SoftPwm = SoftPwm::new(DEFAULT_DEAD_ZONE);
//!
//! #[interrupt]
//! fn TIMER1_OVF() {
//!     let compare = FOURTH.on_overflow(pin());
//!     timer1().ocr1a.write(|w| w.bits(compare));
//! }
//!
//! #[interrupt]
//! fn TIMER1_COMPA() {
//!     FOURTH.on_compare(pin());
//! }
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

use embedded_hal::digital::OutputPin;

/// Duty values at or below this never drive the pin high.
///
/// Interrupt dispatch takes long enough that a pulse this short would end
/// after it was supposed to, making low duties visibly brighter than their
/// hardware siblings.
pub const DEFAULT_DEAD_ZONE: u8 = 4;

/// Duty register shared between the foreground and the timer interrupts.
///
/// The foreground is the only writer and the interrupts only read. The
/// register is a single byte, so a store is never torn; a change takes
/// effect at most one timer period late.
#[derive(Debug)]
pub struct SoftPwm {
    duty: AtomicU8,
    dead_zone: u8,
}

impl SoftPwm {
    /// Creates a channel that starts dark.
    pub const fn new(dead_zone: u8) -> Self {
        Self {
            duty: AtomicU8::new(0),
            dead_zone,
        }
    }

    /// Sets the duty cycle (foreground).
    #[inline]
    pub fn set_duty(&self, duty: u8) {
        self.duty.store(duty, Ordering::Relaxed);
    }

    /// Current duty cycle.
    #[inline]
    pub fn duty(&self) -> u8 {
        self.duty.load(Ordering::Relaxed)
    }

    /// Dead-zone threshold.
    pub fn dead_zone(&self) -> u8 {
        self.dead_zone
    }

    /// Timer overflow ISR body.
    ///
    /// Starts the pulse unless the duty falls in the dead zone and returns
    /// the compare value that ends it this period.
    #[inline]
    pub fn on_overflow<P: OutputPin>(&self, pin: &mut P) -> u8 {
        let duty = self.duty();
        if duty > self.dead_zone {
            let _ = pin.set_high();
        }
        duty
    }

    /// Compare-match ISR body. Ends the pulse.
    #[inline]
    pub fn on_compare<P: OutputPin>(&self, pin: &mut P) {
        let _ = pin.set_low();
    }
}

impl Default for SoftPwm {
    fn default() -> Self {
        Self::new(DEFAULT_DEAD_ZONE)
    }
}

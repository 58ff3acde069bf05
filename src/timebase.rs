//! Interrupt-driven millisecond clock.
//!
//! A free-running hardware timer overflows at a fixed period well below one
//! millisecond. Its overflow ISR calls [`TimeBase::on_overflow`], which counts
//! overflow ticks and advances the millisecond counter every
//! `ticks_per_milli` ticks. The result is an approximation: the tick period
//! rarely divides a millisecond exactly and no drift correction is applied.
//!
//! ```ignore
//! static CLOCK: TimeBase = TimeBase::new(DEFAULT_TICKS_PER_MILLI);
//!
//! #[interrupt]
//! fn TIMER0_OVF() {
//!     CLOCK.on_overflow();
//! }
//! ```

use portable_atomic::{AtomicU8, AtomicU32, Ordering};

use crate::time::{Millis, TimeSource};

/// Overflow ticks per millisecond on the reference build.
pub const DEFAULT_TICKS_PER_MILLI: u8 = 5;

/// Millisecond counter advanced from a timer overflow interrupt.
///
/// The ISR is the only writer of both counters and the foreground only reads
/// the millisecond counter, so plain atomic loads and stores are enough. No
/// read-modify-write atomics are used; small cores do not provide them.
///
/// On 8-bit cores without native 32-bit atomics the millisecond load masks
/// interrupts for the few cycles of the four-byte copy. Nothing spins or
/// waits on a lock.
#[derive(Debug)]
pub struct TimeBase {
    ticks: AtomicU8,
    millis: AtomicU32,
    ticks_per_milli: u8,
}

impl TimeBase {
    /// Creates a clock advancing once every `ticks_per_milli` overflows.
    ///
    /// A value of zero is treated as one.
    pub const fn new(ticks_per_milli: u8) -> Self {
        Self {
            ticks: AtomicU8::new(0),
            millis: AtomicU32::new(0),
            ticks_per_milli: if ticks_per_milli == 0 { 1 } else { ticks_per_milli },
        }
    }

    /// Timer overflow ISR body.
    #[inline]
    pub fn on_overflow(&self) {
        let ticks = self.ticks.load(Ordering::Relaxed) + 1;
        if ticks >= self.ticks_per_milli {
            self.ticks.store(0, Ordering::Relaxed);
            let millis = self.millis.load(Ordering::Relaxed);
            self.millis.store(millis.wrapping_add(1), Ordering::Release);
        } else {
            self.ticks.store(ticks, Ordering::Relaxed);
        }
    }

    /// Current millisecond count.
    #[inline]
    pub fn millis(&self) -> Millis {
        Millis(self.millis.load(Ordering::Acquire))
    }

    /// Overflow ticks required per millisecond.
    pub fn ticks_per_milli(&self) -> u8 {
        self.ticks_per_milli
    }
}

impl Default for TimeBase {
    fn default() -> Self {
        Self::new(DEFAULT_TICKS_PER_MILLI)
    }
}

impl TimeSource for TimeBase {
    fn now(&self) -> Millis {
        self.millis()
    }
}

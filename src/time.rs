//! Millisecond time abstractions shared by the whole core.

/// A point on the millisecond clock.
///
/// The underlying counter wraps once its 32 bits are exhausted. Elapsed
/// windows are computed with wrapping subtraction, so a window that spans
/// the wrap still measures correctly as long as it is shorter than the
/// counter range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Millis(pub u32);

impl Millis {
    /// Milliseconds elapsed since an earlier instant.
    #[inline]
    pub fn since(self, earlier: Millis) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// Returns the instant `millis` after this one, wrapping.
    #[inline]
    pub fn wrapping_add(self, millis: u32) -> Millis {
        Millis(self.0.wrapping_add(millis))
    }

    /// Returns the raw counter value.
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// Trait for abstracting time sources.
pub trait TimeSource {
    /// Returns the current time instant.
    fn now(&self) -> Millis;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Millis {
        (**self).now()
    }
}

/// How long a sequence may run before returning on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Timeout {
    /// Return once this many milliseconds have elapsed.
    After(u32),

    /// Run until input interrupts.
    Forever,
}

impl Timeout {
    /// Interprets a signed millisecond count, where any negative value is the
    /// "run until interrupted" sentinel.
    pub const fn from_millis(millis: i32) -> Self {
        if millis < 0 {
            Timeout::Forever
        } else {
            Timeout::After(millis as u32)
        }
    }
}

impl From<i32> for Timeout {
    fn from(millis: i32) -> Self {
        Timeout::from_millis(millis)
    }
}

/// A timeout anchored at the instant a run started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Deadline {
    start: Millis,
    timeout: Timeout,
}

impl Deadline {
    /// Creates a deadline `timeout` after `start`.
    pub fn new(start: Millis, timeout: Timeout) -> Self {
        Self { start, timeout }
    }

    /// Returns true once the timeout has elapsed. Never true for `Forever`.
    #[inline]
    pub fn expired(&self, now: Millis) -> bool {
        match self.timeout {
            Timeout::After(millis) => now.since(self.start) >= millis,
            Timeout::Forever => false,
        }
    }
}

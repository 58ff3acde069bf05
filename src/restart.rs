//! Deliberate full-device restart.

/// Trait for abstracting the restart mechanism.
pub trait Restart {
    /// Reinitializes the device. Never returns.
    fn restart(&mut self) -> !;
}

impl<R: Restart + ?Sized> Restart for &mut R {
    fn restart(&mut self) -> ! {
        (**self).restart()
    }
}

/// Trait for abstracting the watchdog timer.
pub trait Watchdog {
    /// Enables the watchdog with its shortest timeout.
    fn arm_shortest(&mut self);
}

/// Restarts by letting the watchdog expire.
///
/// The watchdog reset reinitializes every peripheral register, which a jump
/// to the entry point would not.
#[derive(Debug)]
pub struct WatchdogRestart<W> {
    watchdog: W,
}

impl<W: Watchdog> WatchdogRestart<W> {
    pub fn new(watchdog: W) -> Self {
        Self { watchdog }
    }
}

impl<W: Watchdog> Restart for WatchdogRestart<W> {
    fn restart(&mut self) -> ! {
        self.watchdog.arm_shortest();
        loop {
            core::hint::spin_loop();
        }
    }
}

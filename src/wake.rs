//! A single-slot, non-queued wake-up for parked tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// Signal type behind [`Wake`].
type WakeSignal = Signal<CriticalSectionRawMutex, ()>;

/// Wakes one parked task.
///
/// Wakes are not counted: any number of [`Wake::wake`] calls before the task parks again
/// produce exactly one return from [`Wake::parked`]. A woken task must therefore re-check
/// every condition it cares about instead of assuming one wake per change.
pub struct Wake(WakeSignal);

impl Default for Wake {
    fn default() -> Self {
        Self::new()
    }
}

impl Wake {
    #[must_use]
    pub const fn new() -> Self {
        Self(Signal::new())
    }

    /// Make the parked task runnable. A no-op if a wake is already outstanding.
    pub fn wake(&self) {
        self.0.signal(());
    }

    /// Park until woken, consuming the outstanding wake.
    pub async fn parked(&self) {
        self.0.wait().await;
    }

    /// Drop an outstanding wake without parking.
    pub fn clear(&self) {
        self.0.reset();
    }

    /// Whether a wake is outstanding.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.0.signaled()
    }
}

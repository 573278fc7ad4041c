//! Cooperative cancellation
//!
//!     The scan polls a [`CancelSignal`] before each line and returns what it has so far once
//!     the signal is active. Nothing suspends: the signal is a plain flag that the caller may
//!     flip from another thread (or, in tests, from a closure that counts polls).

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub trait CancelSignal {
    fn is_cancellation_requested(&self) -> bool;
}

impl<T: CancelSignal + ?Sized> CancelSignal for &T {
    fn is_cancellation_requested(&self) -> bool {
        (**self).is_cancellation_requested()
    }
}

impl<T: CancelSignal + ?Sized> CancelSignal for Arc<T> {
    fn is_cancellation_requested(&self) -> bool {
        (**self).is_cancellation_requested()
    }
}

impl CancelSignal for bool {
    fn is_cancellation_requested(&self) -> bool {
        *self
    }
}

impl CancelSignal for AtomicBool {
    fn is_cancellation_requested(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl CancelSignal for Cell<bool> {
    fn is_cancellation_requested(&self) -> bool {
        self.get()
    }
}

/// A signal that is never active.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl CancelSignal for NeverCancel {
    fn is_cancellation_requested(&self) -> bool {
        false
    }
}

/// Adapts a closure into a signal. The closure is called once per poll.
pub struct CancelFn<F>(pub F);

impl<F: Fn() -> bool> CancelSignal for CancelFn<F> {
    fn is_cancellation_requested(&self) -> bool {
        (self.0)()
    }
}

/// Cloneable handle over a shared flag; every clone observes `cancel()` from any other.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Whether both handles point at the same underlying flag.
    pub fn same_flag(&self, other: &CancellationFlag) -> bool {
        Arc::ptr_eq(&self.cancelled, &other.cancelled)
    }
}

impl CancelSignal for CancellationFlag {
    fn is_cancellation_requested(&self) -> bool {
        self.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_clones_share_state() {
        let flag = CancellationFlag::new();
        let observer = flag.clone();
        assert!(!observer.is_cancellation_requested());
        flag.cancel();
        assert!(observer.is_cancellation_requested());
        assert!(flag.same_flag(&observer));
        assert!(!flag.same_flag(&CancellationFlag::new()));
    }

    #[test]
    fn closures_are_polled_each_time() {
        let polls = Cell::new(0);
        let signal = CancelFn(|| {
            polls.set(polls.get() + 1);
            polls.get() > 2
        });
        assert!(!signal.is_cancellation_requested());
        assert!(!signal.is_cancellation_requested());
        assert!(signal.is_cancellation_requested());
        assert_eq!(polls.get(), 3);
    }

    #[test]
    fn plain_values_act_as_signals() {
        assert!(true.is_cancellation_requested());
        assert!(!NeverCancel.is_cancellation_requested());
        let atomic = AtomicBool::new(false);
        atomic.store(true, Ordering::SeqCst);
        assert!((&atomic).is_cancellation_requested());
    }
}

//! Single-flight guard shared by chat send and login/register.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Marks one operation as outstanding; clears the mark when dropped.
///
/// Dropping happens on every exit path (success, error, early return or a
/// cancelled future), so a failed call can never leave the flag stuck.
#[derive(Debug)]
pub struct FlightGuard {
    flag: Arc<AtomicBool>,
}

impl FlightGuard {
    /// Claim the flag, or `None` if another operation holds it.
    pub fn try_begin(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag: flag.clone() })
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

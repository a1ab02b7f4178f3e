//! Counting limiter for in-flight run creation calls

use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Semaphore, SemaphorePermit};

/// Default number of run creation calls allowed in flight at once
pub const DEFAULT_MAX_IN_FLIGHT: usize = 3;

/// Fixed-capacity gate around a semaphore, with in-flight accounting.
///
/// One gate is created per orchestration call; it is never shared across
/// organizations.
#[derive(Debug)]
pub struct ConcurrencyGate {
    semaphore: Semaphore,
    capacity: usize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

/// Slot held while a call is in flight; released on drop.
#[derive(Debug)]
pub struct GatePermit<'a> {
    gate: &'a ConcurrencyGate,
    _permit: Option<SemaphorePermit<'a>>,
}

impl ConcurrencyGate {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Semaphore::new(capacity),
            capacity,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Wait until a slot is free.
    ///
    /// The semaphore is private to the gate and never closed, so this only
    /// ever waits.
    pub async fn acquire(&self) -> GatePermit<'_> {
        let permit = self.semaphore.acquire().await.ok();
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        GatePermit {
            gate: self,
            _permit: permit,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of slots held simultaneously so far
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl Default for ConcurrencyGate {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_IN_FLIGHT)
    }
}

impl Drop for GatePermit<'_> {
    fn drop(&mut self) {
        self.gate.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::join_all;
    use std::time::Duration;

    #[tokio::test]
    async fn test_never_exceeds_capacity() {
        let gate = ConcurrencyGate::default();

        let tasks = (0..12).map(|i| {
            let gate = &gate;
            async move {
                let _permit = gate.acquire().await;
                assert!(gate.in_flight() <= DEFAULT_MAX_IN_FLIGHT);
                tokio::time::sleep(Duration::from_millis(5 + (i % 3) as u64)).await;
            }
        });
        join_all(tasks).await;

        assert_eq!(gate.peak(), DEFAULT_MAX_IN_FLIGHT);
        assert_eq!(gate.in_flight(), 0);
    }

    async fn failing_call(gate: &ConcurrencyGate) -> Result<(), String> {
        let _permit = gate.acquire().await;
        Err("boom".to_string())
    }

    #[tokio::test]
    async fn test_slot_released_when_call_fails() {
        let gate = ConcurrencyGate::new(1);

        assert!(failing_call(&gate).await.is_err());

        assert_eq!(gate.in_flight(), 0);
        let permit = tokio::time::timeout(Duration::from_millis(50), gate.acquire()).await;
        assert!(permit.is_ok(), "slot should be free again");
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        assert_eq!(ConcurrencyGate::new(0).capacity(), 1);
    }
}

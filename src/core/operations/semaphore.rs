use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Counting semaphore bounding how many tasks hold a slot at once.
///
/// One instance is created per run (class tier) and one per copy batch; it is
/// passed by reference to the workers that share it.
#[derive(Debug)]
pub struct Semaphore {
    available: Mutex<usize>,
    released: Condvar,
    capacity: usize,
}

/// Slot held until dropped.
#[derive(Debug)]
pub struct SemaphorePermit<'a> {
    semaphore: &'a Semaphore,
}

impl Semaphore {
    /// Capacity is clamped to at least one slot.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            available: Mutex::new(capacity),
            released: Condvar::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Block until a slot is free, then take it.
    pub fn acquire(&self) -> SemaphorePermit<'_> {
        let mut available = self.lock();
        while *available == 0 {
            available = self
                .released
                .wait(available)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *available -= 1;
        SemaphorePermit { semaphore: self }
    }

    /// Take a slot only if one is free right now.
    pub fn try_acquire(&self) -> Option<SemaphorePermit<'_>> {
        let mut available = self.lock();
        if *available == 0 {
            return None;
        }
        *available -= 1;
        Some(SemaphorePermit { semaphore: self })
    }

    pub fn available(&self) -> usize {
        *self.lock()
    }

    fn release(&self) {
        let mut available = self.lock();
        *available += 1;
        self.released.notify_one();
    }

    // The counter stays consistent even if a holder panicked, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, usize> {
        self.available.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for SemaphorePermit<'_> {
    fn drop(&mut self) {
        self.semaphore.release();
    }
}

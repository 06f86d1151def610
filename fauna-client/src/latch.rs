use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// One-shot gate: closed until [`Latch::release`] is called, open forever
/// after that.
#[derive(Debug, Default)]
pub(crate) struct Latch {
    released: Mutex<bool>,
    condvar: Condvar,
}

impl Latch {
    pub fn new() -> Latch {
        Latch::default()
    }

    pub fn release(&self) {
        let mut released = self.released.lock();
        *released = true;
        self.condvar.notify_all();
    }

    /// Blocks until released or until `timeout` elapses.
    ///
    /// Returns whether the latch was released.
    pub fn wait_for(&self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        let mut released = self.released.lock();
        while !*released {
            match deadline {
                Some(deadline) => {
                    if self.condvar.wait_until(&mut released, deadline)
                        .timed_out()
                    {
                        return *released;
                    }
                }
                // too far in the future to represent
                None => self.condvar.wait(&mut released),
            }
        }
        true
    }
}

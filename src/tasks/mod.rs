// Manowatch — Task Plumbing
//
// Shared pieces for both run modes: the millisecond clock the scheduling and
// the LED hold run on, and the record mailbox the threaded pipeline
// publishes through.

pub mod acquire;
pub mod display;
pub mod poll;

use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::events::SensorRecord;

/// Millisecond clock for scheduling and the indicator hold. The counter
/// wraps after ~49.7 days; consumers compare instants with `wrapping_sub`.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

/// Wall clock anchored at boot.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u32 {
        self.origin.elapsed().as_millis() as u32
    }
}

/// How the firmware schedules its work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)] // both modes stay selectable from config
pub enum RunMode {
    /// One loop samples, analyses, and drives the indicator.
    Polling,
    /// One acquisition thread per sensor plus a display thread.
    Threaded,
}

/// Mailbox between an acquisition task and the display task.
pub type SharedRecord = Arc<Mutex<SensorRecord>>;

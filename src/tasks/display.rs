// Manowatch — Display Task
//
// Threaded-mode consumer: polls the active sensor's record, streams fresh
// samples, and drives the indicator. Freshness is sequence-based, so a
// stalled producer silences the stream while the green hold keeps ageing.

use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::{DISPLAY_REFRESH_INTERVAL_MS, STALL_WARN_MS};
use crate::drivers::SensorKind;
use crate::events::{LedColor, SensorRecord};
use crate::led::{render_color, LedSink, LedStateMachine};
use crate::tasks::{Clock, SharedRecord};
use crate::telemetry::Telemetry;

/// Record-consuming half of the threaded pipeline.
pub struct Consumer {
    name: &'static str,
    led: LedStateMachine,
    last_seq: u32,
    last_color: LedColor,
    stall_logged: bool,
}

impl Consumer {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            led: LedStateMachine::new(),
            last_seq: 0,
            last_color: LedColor::Off,
            stall_logged: false,
        }
    }

    /// One refresh: decide freshness, run the indicator, report whether the
    /// record was new.
    pub fn service(&mut self, rec: &SensorRecord, now_ms: u32) -> (LedColor, bool) {
        // seq 0 is the boot value: nothing published yet.
        let fresh = rec.seq != 0 && rec.seq != self.last_seq;
        if fresh {
            self.last_seq = rec.seq;
            self.stall_logged = false;
        } else if rec.seq != 0
            && !self.stall_logged
            && now_ms.wrapping_sub(rec.updated_at_ms) > STALL_WARN_MS
        {
            // One warning per stall episode.
            log::warn!(
                "{} record stalled ({} ms old, last raw {})",
                self.name,
                now_ms.wrapping_sub(rec.updated_at_ms),
                rec.raw
            );
            self.stall_logged = true;
        }
        let color = self.led.tick(if fresh { rec.kurtosis } else { None }, now_ms);
        if color != self.last_color {
            log::info!("Indicator -> {}", color.display_name());
            self.last_color = color;
        }
        (color, fresh)
    }
}

pub fn display_task<C: Clock, S: LedSink, W: Write>(
    kind: SensorKind,
    record: SharedRecord,
    clock: C,
    mut sink: S,
    telemetry: Arc<Telemetry<W>>,
) {
    log::info!("Display task started ({})", kind.profile().name);

    telemetry.announce(kind.profile().name);
    let mut consumer = Consumer::new(kind.profile().name);
    let interval = Duration::from_millis(DISPLAY_REFRESH_INTERVAL_MS);

    loop {
        // 1. Copy the mailbox; the lock is never held across the work below.
        let rec = *record.lock().unwrap();

        // 2. Refresh the indicator, then stream anything new.
        let (color, fresh) = consumer.service(&rec, clock.now_ms());
        if fresh {
            telemetry.pressure(rec.pressure, kind.profile().decimals);
            if let Some(k) = rec.kurtosis {
                telemetry.kurtosis(k);
            }
        }
        render_color(color, &mut sink);

        thread::sleep(interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mailbox_keeps_the_boot_state() {
        let mut consumer = Consumer::new("ABPLLN");
        let rec = SensorRecord::default();
        let (color, fresh) = consumer.service(&rec, 10);
        assert_eq!(color, LedColor::Off);
        assert!(!fresh);
    }

    #[test]
    fn fresh_records_stream_once() {
        let mut consumer = Consumer::new("ABPLLN");
        let mut rec = SensorRecord {
            seq: 1,
            raw: 8000,
            pressure: 291.2,
            kurtosis: Some(48.0),
            updated_at_ms: 0,
        };

        let (color, fresh) = consumer.service(&rec, 0);
        assert_eq!(color, LedColor::Green);
        assert!(fresh);

        // Same sequence again: nothing new to stream.
        let (_, fresh) = consumer.service(&rec, 50);
        assert!(!fresh);

        rec.seq = 2;
        let (_, fresh) = consumer.service(&rec, 100);
        assert!(fresh);
    }

    #[test]
    fn wrapped_counter_still_reads_fresh() {
        let mut consumer = Consumer::new("ABPLLN");
        let rec = SensorRecord {
            seq: u32::MAX,
            raw: 8000,
            pressure: 291.2,
            kurtosis: Some(48.0),
            updated_at_ms: 0,
        };
        assert!(consumer.service(&rec, 0).1);

        // The producer skips 0, so the value after a wrap is 1, never the
        // boot sentinel.
        let rec = SensorRecord { seq: 1, updated_at_ms: 50, ..rec };
        assert!(consumer.service(&rec, 50).1);
    }

    #[test]
    fn stale_mailbox_still_ages_the_green_hold() {
        let mut consumer = Consumer::new("ABPLLN");
        let rec1 = SensorRecord {
            seq: 1,
            raw: 8000,
            pressure: 291.2,
            kurtosis: Some(48.0),
            updated_at_ms: 0,
        };
        assert_eq!(consumer.service(&rec1, 0).0, LedColor::Green);

        let rec2 = SensorRecord { seq: 2, kurtosis: Some(2.0), ..rec1 };
        assert_eq!(consumer.service(&rec2, 400).0, LedColor::Green);

        // Producer stalls: the same record keeps arriving.
        assert_eq!(consumer.service(&rec2, 500).0, LedColor::Green);
        assert_eq!(consumer.service(&rec2, 1001).0, LedColor::Red);
    }
}

// Manowatch — Acquisition Task
//
// Threaded mode: one of these per monitored sensor. The task owns the
// sensor and its analysis window; every good sample is converted, analysed,
// and published into the shared record for the display side to pick up.

use std::thread;
use std::time::{Duration, Instant};

use crate::analysis::SampleWindow;
use crate::config::SENSOR_SAMPLE_INTERVAL_MS;
use crate::drivers::PressureSensor;
use crate::events::SensorRecord;
use crate::tasks::{Clock, SharedRecord};

pub fn acquire_task<C: Clock>(
    mut sensor: Box<dyn PressureSensor + Send>,
    clock: C,
    record: SharedRecord,
) {
    let name = sensor.profile().name;
    log::info!("Acquire task started ({})", name);

    let mut window = SampleWindow::new();
    let interval = Duration::from_millis(SENSOR_SAMPLE_INTERVAL_MS);

    loop {
        let tick_start = Instant::now();

        match sensor.read_raw() {
            Ok(raw) => {
                let primed_before = window.is_full();
                publish(sensor.as_ref(), &mut window, &record, raw, clock.now_ms());
                if !primed_before && window.is_full() {
                    log::debug!("{} analysis window primed", name);
                }
            }
            Err(e) => log::warn!("{} read error: {}", name, e),
        }

        // Sleep for the remainder of the sampling interval.
        let elapsed = tick_start.elapsed();
        if elapsed < interval {
            thread::sleep(interval - elapsed);
        }
    }
}

/// Convert, analyse, and copy one sample into the mailbox. The conversion
/// and the statistic run before the lock; the critical section is one copy.
fn publish(
    sensor: &dyn PressureSensor,
    window: &mut SampleWindow,
    record: &SharedRecord,
    raw: i32,
    now_ms: u32,
) {
    window.push(raw);
    let pressure = sensor.pressure_from_raw(raw);
    let kurtosis = window.kurtosis();

    let mut rec = record.lock().unwrap();
    // seq 0 stays the nothing-published sentinel, so the counter skips it
    // when it wraps.
    let seq = match rec.seq.wrapping_add(1) {
        0 => 1,
        n => n,
    };
    *rec = SensorRecord {
        seq,
        raw,
        pressure,
        kurtosis,
        updated_at_ms: now_ms,
    };
}

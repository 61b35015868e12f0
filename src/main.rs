// Manowatch — Firmware Entry Point
//
// Boot sequence:
//   1. Initialise logging and the boot clock.
//   2. Probe every monitored sensor (component self-test).
//   3. Blank the indicator.
//   4. Threaded mode: spawn one acquisition task per sensor plus the
//      display task, then park this thread.
//      Polling mode: run the monitor loop in place.

mod analysis;
mod config;
mod drivers;
mod events;
mod led;
mod tasks;
mod telemetry;

use std::io;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::config::*;
use crate::drivers::{build_sensor, PressureSensor, SensorKind};
use crate::events::{LedColor, SensorRecord};
use crate::led::{render_color, LogLedSink};
use crate::tasks::{RunMode, SharedRecord, SystemClock};
use crate::telemetry::Telemetry;

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------
fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Manowatch firmware starting…");

    // Millisecond clock shared by every task. Leaked once at boot; the
    // firmware never exits.
    let clock: &'static SystemClock = Box::leak(Box::new(SystemClock::new()));
    let telemetry = Arc::new(Telemetry::stdout());

    match RUN_MODE {
        RunMode::Polling  => run_polling(clock, telemetry),
        RunMode::Threaded => run_threaded(clock, telemetry),
    }
}

// ---------------------------------------------------------------------------
// Run modes
// ---------------------------------------------------------------------------

fn run_polling(
    clock: &'static SystemClock,
    telemetry: Arc<Telemetry<io::Stdout>>,
) -> anyhow::Result<()> {
    // ---- Self-test --------------------------------------------------------
    let mut sensor = build_sensor(ACTIVE_SENSOR);
    match sensor.begin() {
        Ok(()) => {
            let profile = sensor.profile();
            log::info!("{} ready ({})", profile.name, profile.unit.symbol());
        }
        Err(e) => {
            log::error!("Boot check FAILED: {} init error: {}", sensor.profile().name, e);
            // Continue anyway so the fault keeps showing up on serial.
        }
    }

    // ---- Indicator --------------------------------------------------------
    let mut sink = LogLedSink::new(LED_POLARITY);
    render_color(LedColor::Off, &mut sink);

    log::info!("Boot complete: entering monitor loop");
    tasks::poll::monitor_task(sensor, clock, sink, telemetry.as_ref());
    Ok(())
}

fn run_threaded(
    clock: &'static SystemClock,
    telemetry: Arc<Telemetry<io::Stdout>>,
) -> anyhow::Result<()> {
    // ---- Self-test --------------------------------------------------------
    // Probe every monitored variant once; failures are reported and the
    // pipeline still comes up for whatever responds.
    let mut sensors: Vec<(SensorKind, Box<dyn PressureSensor + Send>)> = Vec::new();
    let mut all_ok = true;
    for &kind in MONITORED_SENSORS {
        let mut sensor = build_sensor(kind);
        match sensor.begin() {
            Ok(()) => {
                let profile = sensor.profile();
                log::info!("{} ready ({})", profile.name, profile.unit.symbol());
            }
            Err(e) => {
                all_ok = false;
                log::error!("{} init failed: {}", kind.profile().name, e);
            }
        }
        sensors.push((kind, sensor));
    }
    if !all_ok {
        log::error!("Boot check FAILED: some sensors are offline");
        // Continue anyway so the healthy channels still stream.
    }

    // ---- Indicator --------------------------------------------------------
    let mut sink = LogLedSink::new(LED_POLARITY);
    render_color(LedColor::Off, &mut sink);

    // ---- Acquisition tasks ------------------------------------------------
    let mut records: Vec<(SensorKind, SharedRecord)> = Vec::new();
    for (kind, sensor) in sensors {
        let record: SharedRecord = Arc::new(Mutex::new(SensorRecord::default()));
        records.push((kind, Arc::clone(&record)));

        thread::Builder::new()
            .name(format!("acquire-{}", kind.profile().name.to_lowercase()))
            .stack_size(STACK_ACQUIRE)
            .spawn(move || {
                tasks::acquire::acquire_task(sensor, clock, record);
            })?;
    }

    // ---- Display task -----------------------------------------------------
    let active_record = records
        .iter()
        .find(|(kind, _)| *kind == ACTIVE_SENSOR)
        .map(|(_, record)| Arc::clone(record))
        .ok_or_else(|| anyhow::anyhow!("active sensor {:?} is not monitored", ACTIVE_SENSOR))?;

    let display_telemetry = Arc::clone(&telemetry);
    thread::Builder::new()
        .name("display".into())
        .stack_size(STACK_DISPLAY)
        .spawn(move || {
            tasks::display::display_task(
                ACTIVE_SENSOR,
                active_record,
                clock,
                sink,
                display_telemetry,
            );
        })?;

    log::info!("Boot complete: entering normal operation");

    // Main thread has nothing left to do; park it forever.
    loop {
        thread::sleep(Duration::from_secs(60));
    }
}

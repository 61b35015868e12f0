// Manowatch — Polling Monitor
//
// Single-loop run mode: the active sensor is sampled, streamed, analysed,
// and the indicator refreshed, all on one thread. The smallest footprint
// for a one-sensor bench.

use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use crate::analysis::SampleWindow;
use crate::config::SENSOR_SAMPLE_INTERVAL_MS;
use crate::drivers::PressureSensor;
use crate::events::LedColor;
use crate::led::{render_color, LedSink, LedStateMachine};
use crate::tasks::Clock;
use crate::telemetry::Telemetry;

/// One sensor, its analysis window, and the indicator state.
pub struct Monitor {
    window: SampleWindow,
    led: LedStateMachine,
    last_color: LedColor,
}

impl Monitor {
    pub fn new() -> Self {
        Self {
            window: SampleWindow::new(),
            led: LedStateMachine::new(),
            last_color: LedColor::Off,
        }
    }

    /// One sampling tick.
    pub fn step<W: Write>(
        &mut self,
        sensor: &mut dyn PressureSensor,
        sink: &mut dyn LedSink,
        telemetry: &Telemetry<W>,
        now_ms: u32,
    ) -> LedColor {
        // 1. Sample. A failed read skips the window; the indicator hold in
        //    step 3 keeps ageing regardless.
        let kurtosis = match sensor.read_raw() {
            Ok(raw) => {
                telemetry.pressure(sensor.pressure_from_raw(raw), sensor.profile().decimals);
                let primed_before = self.window.is_full();
                self.window.push(raw);
                if !primed_before && self.window.is_full() {
                    log::debug!("Analysis window primed ({} samples)", self.window.len());
                }
                self.window.kurtosis()
            }
            Err(e) => {
                log::warn!("{} read error: {}", sensor.profile().name, e);
                None
            }
        };

        // 2. Stream the statistic while it is defined.
        if let Some(k) = kurtosis {
            telemetry.kurtosis(k);
        }

        // 3. Refresh the indicator.
        let color = self.led.tick(kurtosis, now_ms);
        if color != self.last_color {
            log::info!("Indicator -> {}", color.display_name());
            self.last_color = color;
        }
        render_color(color, sink);
        color
    }
}

/// Polling-mode entry point. Runs on the caller's thread and does not
/// return under normal operation.
pub fn monitor_task<C: Clock, S: LedSink, W: Write>(
    mut sensor: Box<dyn PressureSensor + Send>,
    clock: C,
    mut sink: S,
    telemetry: &Telemetry<W>,
) {
    log::info!("Monitor task started ({})", sensor.profile().name);

    telemetry.announce(sensor.profile().name);
    let mut monitor = Monitor::new();
    let interval = Duration::from_millis(SENSOR_SAMPLE_INTERVAL_MS);

    loop {
        let tick_start = Instant::now();

        monitor.step(sensor.as_mut(), &mut sink, telemetry, clock.now_ms());

        // Sleep for the remainder of the sampling interval.
        let elapsed = tick_start.elapsed();
        if elapsed < interval {
            thread::sleep(interval - elapsed);
        }
    }
}

// Manowatch — System Configuration
// Bench build: transports are simulated, timings match the rig firmware.

use crate::drivers::SensorKind;
use crate::led::LedPolarity;
use crate::tasks::RunMode;

// ---------------------------------------------------------------------------
// Scheduling
// ---------------------------------------------------------------------------
pub const RUN_MODE: RunMode = RunMode::Threaded;
pub const SENSOR_SAMPLE_INTERVAL_MS: u64 = 2;    // ~500 Hz acquisition
pub const DISPLAY_REFRESH_INTERVAL_MS: u64 = 50; // consumer poll rate
pub const STALL_WARN_MS: u32 = 1000;             // producer silence before a warning

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------
/// Every variant the bench acquires from. Threaded mode spawns one
/// acquisition task per entry.
pub const MONITORED_SENSORS: &[SensorKind] = &[
    SensorKind::Abplln,
    SensorKind::Ssc,
    SensorKind::Ccdann600,
    SensorKind::Elvh,
    SensorKind::Sm4000I2c,
    SensorKind::Sm4000Analog,
    SensorKind::Smpp02,
];

/// The sensor whose stream feeds the indicator and the serial output.
pub const ACTIVE_SENSOR: SensorKind = SensorKind::Abplln;

// ---------------------------------------------------------------------------
// Window Analysis
// ---------------------------------------------------------------------------
pub const WINDOW_SIZE: usize = 50;
pub const KURTOSIS_GREEN_THRESHOLD: f32 = 12.0; // above: impulsive window
pub const KURTOSIS_RED_THRESHOLD: f32 = 4.0;    // below: flat window
pub const GREEN_HOLD_MS: u32 = 1000;            // green latch duration

// ---------------------------------------------------------------------------
// Indicator
// ---------------------------------------------------------------------------
pub const LED_POLARITY: LedPolarity = LedPolarity::ActiveLow; // common-anode RGB

// ---------------------------------------------------------------------------
// Task Stack Sizes (bytes)
// ---------------------------------------------------------------------------
pub const STACK_ACQUIRE: usize = 64 * 1024;
pub const STACK_DISPLAY: usize = 64 * 1024;

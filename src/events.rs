// Manowatch — Shared Data Types

// ---------------------------------------------------------------------------
// Indicator Colour
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedColor {
    /// Power-on state; the analysis never returns to it.
    Off,
    Green,
    Yellow,
    Red,
}

impl LedColor {
    /// Log label for indicator transitions.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Off    => "off",
            Self::Green  => "green",
            Self::Yellow => "yellow",
            Self::Red    => "red",
        }
    }
}

impl Default for LedColor {
    fn default() -> Self {
        Self::Off
    }
}

// ---------------------------------------------------------------------------
// Sensor Result Record: published by acquisition, read by the display task
// ---------------------------------------------------------------------------
/// Latest result from one acquisition task. Kept to a handful of plain
/// fields so the owning lock is only ever held for a copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct SensorRecord {
    /// Publish counter; 0 means no sample has arrived yet. The producer
    /// never writes 0, skipping it when the counter wraps.
    pub seq: u32,
    /// Raw count exactly as decoded from the wire.
    pub raw: i32,
    /// Calibrated pressure in the variant's unit.
    pub pressure: f32,
    /// Window kurtosis, once the window has filled and has variance.
    pub kurtosis: Option<f32>,
    /// Clock timestamp of the publish.
    pub updated_at_ms: u32,
}

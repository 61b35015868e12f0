// Manowatch — Indicator State Machine & LED Rendering
//
// The kurtosis-driven traffic light. Decision logic is pure and clock-fed;
// the electrical side (channel mapping, wiring polarity, the actual output)
// sits behind the `LedSink` seam so the whole thing runs without hardware.

use crate::config::{GREEN_HOLD_MS, KURTOSIS_GREEN_THRESHOLD, KURTOSIS_RED_THRESHOLD};
use crate::events::LedColor;

// ---------------------------------------------------------------------------
// State Machine
// ---------------------------------------------------------------------------

/// Hysteretic indicator controller driven by the window kurtosis.
///
/// A value above the green threshold latches Green and arms a hold timer;
/// for the next [`GREEN_HOLD_MS`] no lower value can demote it. Once the
/// hold lapses the most recent value decides again, and a still-high value
/// re-arms the hold.
pub struct LedStateMachine {
    state: LedColor,
    green_since_ms: u32,
    last_kurtosis: f32,
}

impl LedStateMachine {
    pub fn new() -> Self {
        Self {
            state: LedColor::Off,
            green_since_ms: 0,
            last_kurtosis: 0.0,
        }
    }

    /// Advance one analysis tick. `kurtosis` is `None` when the window had
    /// nothing fresh (not yet full, zero variance, or a skipped sample); the
    /// green hold still ages on those ticks.
    pub fn tick(&mut self, kurtosis: Option<f32>, now_ms: u32) -> LedColor {
        if let Some(k) = kurtosis {
            self.last_kurtosis = k;
            if k > KURTOSIS_GREEN_THRESHOLD {
                self.state = LedColor::Green;
                self.green_since_ms = now_ms;
            } else if self.state != LedColor::Green {
                self.state = if k < KURTOSIS_RED_THRESHOLD {
                    LedColor::Red
                } else {
                    LedColor::Yellow
                };
            }
            // A green still inside its hold ignores lower values.
        }

        // Hold bookkeeping runs every tick, with or without fresh input.
        if self.state == LedColor::Green
            && now_ms.wrapping_sub(self.green_since_ms) > GREEN_HOLD_MS
        {
            if self.last_kurtosis < KURTOSIS_RED_THRESHOLD {
                self.state = LedColor::Red;
            } else if self.last_kurtosis <= KURTOSIS_GREEN_THRESHOLD {
                self.state = LedColor::Yellow;
            } else {
                // Still above threshold: re-arm the hold.
                self.green_since_ms = now_ms;
            }
        }

        self.state
    }
}

// ---------------------------------------------------------------------------
// Channel Mapping & Polarity
// ---------------------------------------------------------------------------

/// Logical on/off demand for the three channels of the RGB package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedChannels {
    pub red: bool,
    pub green: bool,
    pub blue: bool,
}

/// Channel demand for a colour. Yellow lights red and green together because
/// the package has no dedicated yellow die; blue stays unused.
pub fn channels_for(color: LedColor) -> LedChannels {
    match color {
        LedColor::Off    => LedChannels { red: false, green: false, blue: false },
        LedColor::Green  => LedChannels { red: false, green: true,  blue: false },
        LedColor::Yellow => LedChannels { red: true,  green: true,  blue: false },
        LedColor::Red    => LedChannels { red: true,  green: false, blue: false },
    }
}

/// Electrical level on one LED line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineLevel {
    Low,
    High,
}

/// Wiring polarity of the RGB package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedPolarity {
    /// A driven-low line lights the channel (common-anode package).
    ActiveLow,
    /// A driven-high line lights the channel.
    #[allow(dead_code)] // carriers with non-inverted wiring
    ActiveHigh,
}

impl LedPolarity {
    /// Line level that realises a logical channel state on this wiring.
    pub fn line_level(self, on: bool) -> LineLevel {
        match (self, on) {
            (Self::ActiveLow, true) | (Self::ActiveHigh, false) => LineLevel::Low,
            _ => LineLevel::High,
        }
    }
}

// ---------------------------------------------------------------------------
// Output Seam
// ---------------------------------------------------------------------------

/// Hardware output collaborator for the indicator.
pub trait LedSink {
    fn apply(&mut self, channels: LedChannels);
}

/// Drive the indicator for a decided colour.
pub fn render_color(color: LedColor, sink: &mut dyn LedSink) {
    sink.apply(channels_for(color));
}

/// Bench output: reports electrical line changes through the logger instead
/// of GPIO writes.
pub struct LogLedSink {
    polarity: LedPolarity,
    last: Option<LedChannels>,
}

impl LogLedSink {
    pub fn new(polarity: LedPolarity) -> Self {
        Self { polarity, last: None }
    }
}

impl LedSink for LogLedSink {
    fn apply(&mut self, channels: LedChannels) {
        if self.last == Some(channels) {
            return; // line levels unchanged
        }
        self.last = Some(channels);
        log::debug!(
            "LED lines: R={:?} G={:?} B={:?}",
            self.polarity.line_level(channels.red),
            self.polarity.line_level(channels.green),
            self.polarity.line_level(channels.blue),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingSink {
        applied: Vec<LedChannels>,
    }

    impl LedSink for RecordingSink {
        fn apply(&mut self, channels: LedChannels) {
            self.applied.push(channels);
        }
    }

    #[test]
    fn boots_off_and_stays_off_without_data() {
        let mut machine = LedStateMachine::new();
        assert_eq!(machine.tick(None, 0), LedColor::Off);
        assert_eq!(machine.tick(None, 5000), LedColor::Off);
    }

    #[test]
    fn high_kurtosis_enters_green() {
        let mut machine = LedStateMachine::new();
        assert_eq!(machine.tick(Some(15.0), 100), LedColor::Green);
    }

    #[test]
    fn thresholds_split_red_yellow_green() {
        let mut machine = LedStateMachine::new();
        assert_eq!(machine.tick(Some(3.9), 0), LedColor::Red);
        assert_eq!(machine.tick(Some(4.0), 0), LedColor::Yellow);
        assert_eq!(machine.tick(Some(12.0), 0), LedColor::Yellow);
        assert_eq!(machine.tick(Some(12.01), 0), LedColor::Green);
    }

    #[test]
    fn green_holds_through_low_values_then_re_evaluates() {
        let mut machine = LedStateMachine::new();
        assert_eq!(machine.tick(Some(20.0), 0), LedColor::Green);
        assert_eq!(machine.tick(Some(5.0), 300), LedColor::Green);
        assert_eq!(machine.tick(Some(2.0), 900), LedColor::Green);
        // Exactly at the hold duration: still inside the latch.
        assert_eq!(machine.tick(None, 1000), LedColor::Green);
        // One millisecond past: the last value (2.0) decides.
        assert_eq!(machine.tick(None, 1001), LedColor::Red);
    }

    #[test]
    fn refreshed_green_restarts_the_hold() {
        let mut machine = LedStateMachine::new();
        machine.tick(Some(15.0), 0);
        machine.tick(Some(15.0), 600); // re-arm
        // Armed at 600, so 1500 is still inside the hold.
        assert_eq!(machine.tick(Some(2.0), 1500), LedColor::Green);
        assert_eq!(machine.tick(None, 1601), LedColor::Red);
    }

    #[test]
    fn expired_hold_demotes_to_yellow_on_middling_value() {
        let mut machine = LedStateMachine::new();
        machine.tick(Some(20.0), 0);
        assert_eq!(machine.tick(Some(8.0), 1200), LedColor::Yellow);
    }

    #[test]
    fn expired_hold_renews_while_the_value_stays_high() {
        let mut machine = LedStateMachine::new();
        machine.tick(Some(20.0), 0);
        // Hold lapsed, last value still high: green re-arms at 1100.
        assert_eq!(machine.tick(None, 1100), LedColor::Green);
        assert_eq!(machine.tick(None, 2100), LedColor::Green);
        assert_eq!(machine.tick(None, 2102), LedColor::Green);
    }

    #[test]
    fn hold_timer_survives_clock_wraparound() {
        let mut machine = LedStateMachine::new();
        machine.tick(Some(20.0), u32::MAX - 100);
        assert_eq!(machine.tick(None, u32::MAX), LedColor::Green);
        // 501 ms elapsed across the wrap: still green.
        assert_eq!(machine.tick(Some(3.0), 400), LedColor::Green);
        // 1101 ms elapsed: the last value (3.0) decides.
        assert_eq!(machine.tick(None, 1000), LedColor::Red);
    }

    #[test]
    fn channel_map_matches_the_rgb_wiring() {
        assert_eq!(channels_for(LedColor::Off), LedChannels::default());
        assert_eq!(
            channels_for(LedColor::Green),
            LedChannels { red: false, green: true, blue: false }
        );
        assert_eq!(
            channels_for(LedColor::Yellow),
            LedChannels { red: true, green: true, blue: false }
        );
        assert_eq!(
            channels_for(LedColor::Red),
            LedChannels { red: true, green: false, blue: false }
        );
        for color in [LedColor::Off, LedColor::Green, LedColor::Yellow, LedColor::Red] {
            assert!(!channels_for(color).blue);
        }
    }

    #[test]
    fn polarity_adapter_inverts_for_active_low() {
        assert_eq!(LedPolarity::ActiveLow.line_level(true), LineLevel::Low);
        assert_eq!(LedPolarity::ActiveLow.line_level(false), LineLevel::High);
        assert_eq!(LedPolarity::ActiveHigh.line_level(true), LineLevel::High);
        assert_eq!(LedPolarity::ActiveHigh.line_level(false), LineLevel::Low);
    }

    #[test]
    fn render_pushes_channels_to_the_sink() {
        let mut sink = RecordingSink { applied: Vec::new() };
        render_color(LedColor::Yellow, &mut sink);
        assert_eq!(
            sink.applied,
            vec![LedChannels { red: true, green: true, blue: false }]
        );
    }
}

// Manowatch — Calibration Transfer Functions
//
// Raw-count to physical-pressure conversions shared by the driver modules.
// Each variant supplies its own anchors; the shapes here cover the three
// output styles on the rig: two-point digital calibration, single-ended
// ratiometric analog, and differential bridge legs.

/// Out-of-range handling for the two-point calibration line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePolicy {
    /// Below the low anchor reads 0.0, above the high anchor reads full
    /// scale.
    Saturate,
    /// Follow the calibration line outside the anchors.
    Extrapolate,
}

/// Two-point counts-to-pressure calibration line (10 % / 90 % anchors).
#[derive(Debug, Clone, Copy)]
pub struct LinearTransfer {
    pub counts_min: i32,
    pub counts_max: i32,
    pub p_min: f32,
    pub p_max: f32,
    pub policy: RangePolicy,
}

impl LinearTransfer {
    pub fn pressure(&self, raw: i32) -> f32 {
        if self.policy == RangePolicy::Saturate {
            if raw < self.counts_min {
                return 0.0;
            }
            if raw > self.counts_max {
                return self.p_max;
            }
        }
        (raw - self.counts_min) as f32 * (self.p_max - self.p_min)
            / (self.counts_max - self.counts_min) as f32
            + self.p_min
    }
}

/// Single-ended ratiometric analog output: 10–90 % of Vdd spans the range.
#[derive(Debug, Clone, Copy)]
pub struct RatiometricTransfer {
    pub vdd: f32,
    pub adc_full_scale: f32,
    pub p_min: f32,
    pub p_max: f32,
}

impl RatiometricTransfer {
    pub fn voltage(&self, raw: i32) -> f32 {
        raw as f32 / self.adc_full_scale * self.vdd
    }

    pub fn pressure(&self, raw: i32) -> f32 {
        let v = self.voltage(raw);
        ((v / self.vdd - 0.1) * (self.p_max - self.p_min)) / 0.8 + self.p_min
    }
}

/// Differential bridge output sampled on two ADC legs. The transfer works in
/// millivolts of leg difference.
#[derive(Debug, Clone, Copy)]
pub struct DifferentialTransfer {
    pub vdd: f32,
    pub adc_full_scale: f32,
    pub offset_mv: f32,
    pub slope_mv_per_unit: f32,
}

impl DifferentialTransfer {
    pub fn diff_millivolts(&self, raw_pos: i32, raw_neg: i32) -> f32 {
        let pos = raw_pos as f32 / self.adc_full_scale * self.vdd;
        let neg = raw_neg as f32 / self.adc_full_scale * self.vdd;
        (pos - neg) * 1000.0
    }

    /// Conversion straight from the two legs (kept for rig bring-up).
    #[allow(dead_code)]
    pub fn pressure(&self, raw_pos: i32, raw_neg: i32) -> f32 {
        (self.diff_millivolts(raw_pos, raw_neg) - self.offset_mv) / self.slope_mv_per_unit
    }

    /// Same line applied to an already-subtracted differential count.
    pub fn pressure_from_diff(&self, diff_counts: i32) -> f32 {
        let diff_mv = diff_counts as f32 / self.adc_full_scale * self.vdd * 1000.0;
        (diff_mv - self.offset_mv) / self.slope_mv_per_unit
    }
}

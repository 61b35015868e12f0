// Manowatch — ELVH Pressure + Temperature Sensor
//
// Four-byte I2C frame: status and a 14-bit pressure count in the first word,
// an 11-bit die temperature left-justified in the second. Pressure spans
// ±1 bar; the temperature ramp runs -50..150 °C over the 11-bit code.

use super::transfer::{LinearTransfer, RangePolicy};
use super::{check_status, PressureSensor, PressureUnit, SensorError, SensorLink, VariantProfile};

pub const FRAME_LEN: usize = 4;

pub const P_MIN_BAR: f32 = -1.0;
pub const P_MAX_BAR: f32 = 1.0;
pub const OUTPUT_MIN: i32 = 1638;
pub const OUTPUT_MAX: i32 = 14745;

pub const T_MIN_C: f32 = -50.0;
pub const T_MAX_C: f32 = 150.0;

/// Temperature code emitted by the bench link (~25 °C).
pub const BENCH_T_RAW: i32 = 768;

pub const TRANSFER: LinearTransfer = LinearTransfer {
    counts_min: OUTPUT_MIN,
    counts_max: OUTPUT_MAX,
    p_min: P_MIN_BAR,
    p_max: P_MAX_BAR,
    policy: RangePolicy::Extrapolate,
};

pub const PROFILE: VariantProfile = VariantProfile {
    name: "ELV",
    unit: PressureUnit::Bar,
    decimals: 2,
};

/// Unpack a frame into (status, pressure count, temperature count).
pub fn decode_frame(frame: &[u8; FRAME_LEN]) -> (u8, i32, i32) {
    let status = frame[0] >> 6;
    let p_raw = (((frame[0] & 0x3F) as i32) << 8) | frame[1] as i32;
    let t_raw = ((frame[2] as i32) << 3) | ((frame[3] >> 5) as i32);
    (status, p_raw, t_raw)
}

pub fn encode_frame(p_raw: i32, t_raw: i32, frame: &mut [u8]) {
    frame[0] = ((p_raw >> 8) & 0x3F) as u8;
    frame[1] = (p_raw & 0xFF) as u8;
    frame[2] = ((t_raw >> 3) & 0xFF) as u8;
    frame[3] = ((t_raw & 0x07) << 5) as u8;
}

pub fn encode_bench_frame(p_raw: i32, frame: &mut [u8]) {
    encode_frame(p_raw, BENCH_T_RAW, frame);
}

pub fn temperature_from_raw(t_raw: i32) -> f32 {
    t_raw as f32 / 2047.0 * (T_MAX_C - T_MIN_C) + T_MIN_C
}

pub struct ElvDriver<L: SensorLink> {
    link: L,
    last_temperature: Option<f32>,
}

impl<L: SensorLink> ElvDriver<L> {
    pub fn new(link: L) -> Self {
        Self { link, last_temperature: None }
    }

    /// Die temperature from the most recent good frame (kept for bring-up
    /// logging).
    #[allow(dead_code)]
    pub fn last_temperature_c(&self) -> Option<f32> {
        self.last_temperature
    }
}

impl<L: SensorLink> PressureSensor for ElvDriver<L> {
    fn profile(&self) -> &'static VariantProfile {
        &PROFILE
    }

    fn begin(&mut self) -> Result<(), SensorError> {
        self.link.begin()
    }

    fn read_raw(&mut self) -> Result<i32, SensorError> {
        let mut frame = [0u8; FRAME_LEN];
        let got = self.link.read_frame(&mut frame)?;
        if got != FRAME_LEN {
            return Err(SensorError::ShortFrame { expected: FRAME_LEN, got });
        }
        let (status, p_raw, t_raw) = decode_frame(&frame);
        check_status(status)?;
        self.last_temperature = Some(temperature_from_raw(t_raw));
        Ok(p_raw)
    }

    fn pressure_from_raw(&self, raw: i32) -> f32 {
        TRANSFER.pressure(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::testlink::ScriptedLink;

    #[test]
    fn unpacks_both_measurement_fields() {
        assert_eq!(decode_frame(&[0x1A, 0x9A, 0x60, 0x00]), (0, 6810, 768));
        assert_eq!(decode_frame(&[0xDA, 0x9A, 0x60, 0x00]), (3, 6810, 768));
    }

    #[test]
    fn temperature_ramp_covers_the_die_range() {
        assert!((temperature_from_raw(0) - (-50.0)).abs() < 1e-4);
        assert!((temperature_from_raw(2047) - 150.0).abs() < 1e-4);
        assert!((temperature_from_raw(BENCH_T_RAW) - 25.04).abs() < 0.01);
    }

    #[test]
    fn pressure_anchors_hit_the_bar_limits() {
        assert_eq!(TRANSFER.pressure(OUTPUT_MIN), -1.0);
        assert_eq!(TRANSFER.pressure(OUTPUT_MAX), 1.0);
    }

    #[test]
    fn read_records_the_die_temperature() {
        let mut frame = vec![0u8; FRAME_LEN];
        encode_frame(6810, 1024, &mut frame);
        let mut driver = ElvDriver::new(ScriptedLink::new(vec![frame]));
        assert!(driver.last_temperature_c().is_none());
        assert_eq!(driver.read_raw().unwrap(), 6810);
        let t = driver.last_temperature_c().unwrap();
        assert!((t - 50.05).abs() < 0.01);
    }
}

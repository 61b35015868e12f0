// Manowatch — ABPLLN Pressure Sensor
//
// Honeywell ABP-series I2C transducer: 2-byte reads carrying 2 status bits
// ahead of a 14-bit count, calibrated across 10–90 % of full scale over
// 0–600 mbar. This variant saturates outside the calibrated band instead of
// extrapolating.

use super::transfer::{LinearTransfer, RangePolicy};
use super::{check_status, PressureSensor, PressureUnit, SensorError, SensorLink, VariantProfile};

pub const FRAME_LEN: usize = 2;

pub const PRESSURE_RANGE_MBAR: f32 = 600.0;
/// Raw counts at 10 % of the 14-bit output span.
pub const COUNTS_AT_10_PCT: i32 = 1638;
/// Raw counts at 90 % of the 14-bit output span (truncated, as calibrated).
pub const COUNTS_AT_90_PCT: i32 = 14744;

pub const TRANSFER: LinearTransfer = LinearTransfer {
    counts_min: COUNTS_AT_10_PCT,
    counts_max: COUNTS_AT_90_PCT,
    p_min: 0.0,
    p_max: PRESSURE_RANGE_MBAR,
    policy: RangePolicy::Saturate,
};

pub const PROFILE: VariantProfile = VariantProfile {
    name: "ABPLLN",
    unit: PressureUnit::Millibar,
    decimals: 2,
};

/// Split a bridge frame into its status bits and 14-bit count.
pub fn decode_frame(frame: &[u8; FRAME_LEN]) -> (u8, i32) {
    let word = u16::from_be_bytes(*frame);
    ((word >> 14) as u8, (word & 0x3FFF) as i32)
}

/// Wire-encode a count with clean status bits (bench transport).
pub fn encode_frame(raw: i32, frame: &mut [u8]) {
    let word = (raw as u16) & 0x3FFF;
    frame[..FRAME_LEN].copy_from_slice(&word.to_be_bytes());
}

pub struct AbpDriver<L: SensorLink> {
    link: L,
}

impl<L: SensorLink> AbpDriver<L> {
    pub fn new(link: L) -> Self {
        Self { link }
    }
}

impl<L: SensorLink> PressureSensor for AbpDriver<L> {
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
        let (status, raw) = decode_frame(&frame);
        check_status(status)?;
        Ok(raw)
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
    fn decodes_status_and_count() {
        assert_eq!(decode_frame(&[0x20, 0x00]), (0, 8192));
        assert_eq!(decode_frame(&[0x80, 0x01]), (2, 1));
        assert_eq!(decode_frame(&[0x3F, 0xFF]), (0, 16383));
    }

    #[test]
    fn read_surfaces_abnormal_status_and_short_frames() {
        let link = ScriptedLink::new(vec![
            vec![0x20, 0x00],
            vec![0x80, 0x00], // stale conversion
            vec![0x12],       // short delivery
        ]);
        let mut driver = AbpDriver::new(link);
        assert_eq!(driver.read_raw().unwrap(), 8192);
        assert!(matches!(driver.read_raw(), Err(SensorError::StaleData)));
        assert!(matches!(
            driver.read_raw(),
            Err(SensorError::ShortFrame { expected: 2, got: 1 })
        ));
        // Script exhausted: the bus has gone quiet.
        assert!(matches!(driver.read_raw(), Err(SensorError::NotConnected)));
    }

    #[test]
    fn transfer_saturates_outside_the_calibrated_band() {
        assert_eq!(TRANSFER.pressure(COUNTS_AT_10_PCT - 500), 0.0);
        assert_eq!(TRANSFER.pressure(COUNTS_AT_90_PCT + 500), PRESSURE_RANGE_MBAR);
        let mid = (COUNTS_AT_10_PCT + COUNTS_AT_90_PCT) / 2;
        assert!((TRANSFER.pressure(mid) - 300.0).abs() < 1e-3);
    }

    #[test]
    fn bench_frames_round_trip() {
        let mut frame = [0u8; FRAME_LEN];
        encode_frame(9000, &mut frame);
        assert_eq!(decode_frame(&frame), (0, 9000));
    }
}

// Manowatch — CCDANN600MDSA3 Pressure Sensor
//
// SPI word device: one 16-bit transfer carrying 2 status bits and a 12-bit
// count in bits 13..2. The calibration anchors follow the part family's
// 14-bit datasheet values, so the 12-bit field tops out well inside the
// ±600 mbar span.

use super::transfer::{LinearTransfer, RangePolicy};
use super::{check_status, PressureSensor, PressureUnit, SensorError, SensorLink, VariantProfile};

pub const FRAME_LEN: usize = 2;

pub const P_MIN_MBAR: f32 = -600.0;
pub const P_MAX_MBAR: f32 = 600.0;
pub const OUTPUT_MIN: i32 = 1638;
pub const OUTPUT_MAX: i32 = 14745;

pub const TRANSFER: LinearTransfer = LinearTransfer {
    counts_min: OUTPUT_MIN,
    counts_max: OUTPUT_MAX,
    p_min: P_MIN_MBAR,
    p_max: P_MAX_MBAR,
    policy: RangePolicy::Extrapolate,
};

pub const PROFILE: VariantProfile = VariantProfile {
    name: "CCDANN600",
    unit: PressureUnit::Millibar,
    decimals: 2,
};

/// Split the SPI word into status bits (15..14) and the count field (13..2).
pub fn decode_word(frame: &[u8; FRAME_LEN]) -> (u8, i32) {
    let word = u16::from_be_bytes(*frame);
    (((word >> 14) & 0x03) as u8, ((word >> 2) & 0x0FFF) as i32)
}

pub fn encode_word(raw: i32, frame: &mut [u8]) {
    let word = ((raw as u16) & 0x0FFF) << 2;
    frame[..FRAME_LEN].copy_from_slice(&word.to_be_bytes());
}

pub struct CcdDriver<L: SensorLink> {
    link: L,
}

impl<L: SensorLink> CcdDriver<L> {
    pub fn new(link: L) -> Self {
        Self { link }
    }
}

impl<L: SensorLink> PressureSensor for CcdDriver<L> {
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
        let (status, raw) = decode_word(&frame);
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
    fn splits_status_and_the_twelve_bit_field() {
        assert_eq!(decode_word(&[0x3F, 0xFC]), (0, 4095));
        assert_eq!(decode_word(&[0xC0, 0x00]), (3, 0));
        assert_eq!(decode_word(&[0x40, 0x04]), (1, 1));
    }

    #[test]
    fn abnormal_words_error_out_of_the_read() {
        let link = ScriptedLink::new(vec![
            vec![0x40, 0x00], // command mode
            vec![0x20, 0x00],
        ]);
        let mut driver = CcdDriver::new(link);
        assert!(matches!(driver.read_raw(), Err(SensorError::CommandMode)));
        assert_eq!(driver.read_raw().unwrap(), 0x800);
    }

    #[test]
    fn twelve_bit_full_scale_stays_inside_the_span() {
        // The low anchor is reachable in 12 bits, the high one is not:
        // 14-bit anchors put the top code far below the +600 end.
        assert_eq!(TRANSFER.pressure(OUTPUT_MIN), P_MIN_MBAR);
        let p = TRANSFER.pressure(4095);
        assert!((p - (-375.05)).abs() < 0.01);
    }

    #[test]
    fn bench_words_round_trip() {
        let mut frame = [0u8; FRAME_LEN];
        encode_word(2048, &mut frame);
        assert_eq!(decode_word(&frame), (0, 2048));
    }
}

// Manowatch — SSC Pressure Sensor
//
// Honeywell SSC-series I2C transducer: the same 2-byte status-plus-14-bit
// frame as the ABP parts, calibrated ±600 mbar and extrapolating outside
// the anchors.

use super::transfer::{LinearTransfer, RangePolicy};
use super::{check_status, PressureSensor, PressureUnit, SensorError, SensorLink, VariantProfile};

pub const FRAME_LEN: usize = 2;

pub const P_MIN_MBAR: f32 = -600.0;
pub const P_MAX_MBAR: f32 = 600.0;
pub const COUNTS_AT_10_PCT: i32 = 1638;
pub const COUNTS_AT_90_PCT: i32 = 14745;

pub const TRANSFER: LinearTransfer = LinearTransfer {
    counts_min: COUNTS_AT_10_PCT,
    counts_max: COUNTS_AT_90_PCT,
    p_min: P_MIN_MBAR,
    p_max: P_MAX_MBAR,
    policy: RangePolicy::Extrapolate,
};

pub const PROFILE: VariantProfile = VariantProfile {
    name: "SSC",
    unit: PressureUnit::Millibar,
    decimals: 2,
};

pub fn decode_frame(frame: &[u8; FRAME_LEN]) -> (u8, i32) {
    let word = u16::from_be_bytes(*frame);
    ((word >> 14) as u8, (word & 0x3FFF) as i32)
}

pub fn encode_frame(raw: i32, frame: &mut [u8]) {
    let word = (raw as u16) & 0x3FFF;
    frame[..FRAME_LEN].copy_from_slice(&word.to_be_bytes());
}

pub struct SscDriver<L: SensorLink> {
    link: L,
}

impl<L: SensorLink> SscDriver<L> {
    pub fn new(link: L) -> Self {
        Self { link }
    }
}

impl<L: SensorLink> PressureSensor for SscDriver<L> {
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

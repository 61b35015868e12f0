// Manowatch — 2SMPP-02 Pressure Sensor
//
// Bare piezoresistive bridge, no on-part electronics. Both bridge legs are
// sampled by the host ADC and the calibration line runs in millivolts of leg
// difference: -2.5 mV at zero flow, 31 mV across the 37 kPa span.

use super::transfer::DifferentialTransfer;
use super::{PressureSensor, PressureUnit, SensorError, SensorLink, VariantProfile};

pub const FRAME_LEN: usize = 4;

pub const VDD: f32 = 3.3;
pub const ADC_FULL_SCALE: f32 = 65535.0;

pub const V_OFFSET_MV: f32 = -2.5;
pub const V_SPAN_MV: f32 = 31.0;
pub const P_SPAN_KPA: f32 = 37.0;
pub const SLOPE_MV_PER_KPA: f32 = V_SPAN_MV / P_SPAN_KPA;

pub const TRANSFER: DifferentialTransfer = DifferentialTransfer {
    vdd: VDD,
    adc_full_scale: ADC_FULL_SCALE,
    offset_mv: V_OFFSET_MV,
    slope_mv_per_unit: SLOPE_MV_PER_KPA,
};

pub const PROFILE: VariantProfile = VariantProfile {
    name: "2SMPP02",
    unit: PressureUnit::Kilopascal,
    decimals: 3,
};

/// Unpack the two ADC legs (positive first, both big-endian).
pub fn decode_frame(frame: &[u8; FRAME_LEN]) -> (i32, i32) {
    let pos = u16::from_be_bytes([frame[0], frame[1]]) as i32;
    let neg = u16::from_be_bytes([frame[2], frame[3]]) as i32;
    (pos, neg)
}

/// Build a frame whose legs straddle mid-rail by the requested difference.
pub fn encode_frame(diff: i32, frame: &mut [u8]) {
    let pos = (32768 + diff / 2).clamp(0, 65535);
    let neg = (pos - diff).clamp(0, 65535);
    frame[0..2].copy_from_slice(&(pos as u16).to_be_bytes());
    frame[2..4].copy_from_slice(&(neg as u16).to_be_bytes());
}

pub struct SmppDriver<L: SensorLink> {
    link: L,
}

impl<L: SensorLink> SmppDriver<L> {
    pub fn new(link: L) -> Self {
        Self { link }
    }
}

impl<L: SensorLink> PressureSensor for SmppDriver<L> {
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
        let (pos, neg) = decode_frame(&frame);
        Ok(pos - neg)
    }

    fn pressure_from_raw(&self, raw: i32) -> f32 {
        TRANSFER.pressure_from_diff(raw)
    }
}

// Manowatch — SM4000 Pressure Sensor
//
// One part, two electrical options. The digital variant ships a bare signed
// 16-bit count over I2C, little-endian, no status bits; its calibrated span
// runs downhill (full positive count = -500 mbar). The analog variant is a
// 10%..90% ratiometric voltage sampled by the host ADC.

use super::transfer::{LinearTransfer, RangePolicy, RatiometricTransfer};
use super::{PressureSensor, PressureUnit, SensorError, SensorLink, VariantProfile};

pub const FRAME_LEN: usize = 2;

pub const RAW_MIN: i32 = -26214;
pub const RAW_MAX: i32 = 26214;

pub const TRANSFER_I2C: LinearTransfer = LinearTransfer {
    counts_min: RAW_MIN,
    counts_max: RAW_MAX,
    p_min: 0.0,
    p_max: -500.0,
    policy: RangePolicy::Extrapolate,
};

pub const PROFILE_I2C: VariantProfile = VariantProfile {
    name: "SM4000",
    unit: PressureUnit::Millibar,
    decimals: 3,
};

pub const TRANSFER_ANALOG: RatiometricTransfer = RatiometricTransfer {
    vdd: 3.3,
    adc_full_scale: 65535.0,
    p_min: -500.0,
    p_max: 500.0,
};

pub const PROFILE_ANALOG: VariantProfile = VariantProfile {
    name: "SM4000_AN",
    unit: PressureUnit::Millibar,
    decimals: 2,
};

pub fn decode_i2c_frame(frame: &[u8; FRAME_LEN]) -> i32 {
    i16::from_le_bytes(*frame) as i32
}

pub fn encode_i2c_frame(raw: i32, frame: &mut [u8]) {
    let clamped = raw.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
    frame[..FRAME_LEN].copy_from_slice(&clamped.to_le_bytes());
}

pub fn decode_analog_frame(frame: &[u8; FRAME_LEN]) -> i32 {
    u16::from_be_bytes(*frame) as i32
}

pub fn encode_analog_frame(counts: i32, frame: &mut [u8]) {
    let clamped = counts.clamp(0, u16::MAX as i32) as u16;
    frame[..FRAME_LEN].copy_from_slice(&clamped.to_be_bytes());
}

pub struct Sm4000Driver<L: SensorLink> {
    link: L,
}

impl<L: SensorLink> Sm4000Driver<L> {
    pub fn new(link: L) -> Self {
        Self { link }
    }
}

impl<L: SensorLink> PressureSensor for Sm4000Driver<L> {
    fn profile(&self) -> &'static VariantProfile {
        &PROFILE_I2C
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
        Ok(decode_i2c_frame(&frame))
    }

    fn pressure_from_raw(&self, raw: i32) -> f32 {
        TRANSFER_I2C.pressure(raw)
    }
}

pub struct Sm4000AnalogDriver<L: SensorLink> {
    link: L,
}

impl<L: SensorLink> Sm4000AnalogDriver<L> {
    pub fn new(link: L) -> Self {
        Self { link }
    }
}

impl<L: SensorLink> PressureSensor for Sm4000AnalogDriver<L> {
    fn profile(&self) -> &'static VariantProfile {
        &PROFILE_ANALOG
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
        Ok(decode_analog_frame(&frame))
    }

    fn pressure_from_raw(&self, raw: i32) -> f32 {
        TRANSFER_ANALOG.pressure(raw)
    }
}

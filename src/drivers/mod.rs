// Manowatch — Sensor Driver Layer
//
// One module per pressure transducer variant, each holding its wire-frame
// codecs, calibration anchors, and a driver struct speaking through the
// `SensorLink` transport seam. Bus mechanics (addressing, clocking,
// transaction timing) live behind that seam and are not modelled here.

pub mod abp;
pub mod ccd;
pub mod elv;
pub mod sim;
pub mod sm4000;
pub mod smpp;
pub mod ssc;
pub mod transfer;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Everything that can go wrong between the bus and a raw count. Any of
/// these costs at most one sample; the monitor skips the tick and moves on.
#[derive(Debug, Clone, Error)]
pub enum SensorError {
    #[error("sensor not responding on the bus")]
    NotConnected,
    #[error("short frame: expected {expected} bytes, got {got}")]
    ShortFrame { expected: usize, got: usize },
    #[error("device busy in command mode")]
    CommandMode,
    #[error("stale data: no fresh conversion since the last read")]
    StaleData,
    #[error("diagnostic fault reported by the sensor")]
    Diagnostic,
}

/// Map the 2-bit status field shared by the bridge-output transducers.
pub fn check_status(bits: u8) -> Result<(), SensorError> {
    match bits & 0x03 {
        0 => Ok(()),
        1 => Err(SensorError::CommandMode),
        2 => Err(SensorError::StaleData),
        _ => Err(SensorError::Diagnostic),
    }
}

// ---------------------------------------------------------------------------
// Transport Seam
// ---------------------------------------------------------------------------

/// Transport between a driver and its bus peripheral. Implementations wrap
/// one I2C/SPI/ADC transaction; the bench ships a synthetic one in [`sim`].
pub trait SensorLink {
    fn begin(&mut self) -> Result<(), SensorError>;

    /// Run one read transaction into `frame`. Returns how many bytes the
    /// device actually delivered.
    fn read_frame(&mut self, frame: &mut [u8]) -> Result<usize, SensorError>;
}

// ---------------------------------------------------------------------------
// Variant Profiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressureUnit {
    Millibar,
    Bar,
    Kilopascal,
}

impl PressureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Millibar   => "mbar",
            Self::Bar        => "bar",
            Self::Kilopascal => "kPa",
        }
    }
}

/// Static description of a sensor variant: stream label, physical unit, and
/// the fixed decimal places its values carry on the telemetry stream.
#[derive(Debug)]
pub struct VariantProfile {
    pub name: &'static str,
    pub unit: PressureUnit,
    pub decimals: usize,
}

// ---------------------------------------------------------------------------
// Sensor Abstraction
// ---------------------------------------------------------------------------

/// A pressure transducer the monitor can sample. `read_raw` yields the
/// signed count that feeds the analysis window; `pressure_from_raw` is the
/// variant's calibration line over the same count.
pub trait PressureSensor {
    fn profile(&self) -> &'static VariantProfile;
    fn begin(&mut self) -> Result<(), SensorError>;
    fn read_raw(&mut self) -> Result<i32, SensorError>;
    fn pressure_from_raw(&self, raw: i32) -> f32;
}

/// Every transducer variant the firmware knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Abplln,
    Ssc,
    Ccdann600,
    Elvh,
    Sm4000I2c,
    Sm4000Analog,
    Smpp02,
}

impl SensorKind {
    /// Static variant profile, reachable without holding the driver.
    pub fn profile(self) -> &'static VariantProfile {
        match self {
            Self::Abplln       => &abp::PROFILE,
            Self::Ssc          => &ssc::PROFILE,
            Self::Ccdann600    => &ccd::PROFILE,
            Self::Elvh         => &elv::PROFILE,
            Self::Sm4000I2c    => &sm4000::PROFILE_I2C,
            Self::Sm4000Analog => &sm4000::PROFILE_ANALOG,
            Self::Smpp02       => &smpp::PROFILE,
        }
    }
}

/// Build the driver for a variant over the bench transport.
pub fn build_sensor(kind: SensorKind) -> Box<dyn PressureSensor + Send> {
    let link = sim::bench_link(kind);
    match kind {
        SensorKind::Abplln       => Box::new(abp::AbpDriver::new(link)),
        SensorKind::Ssc          => Box::new(ssc::SscDriver::new(link)),
        SensorKind::Ccdann600    => Box::new(ccd::CcdDriver::new(link)),
        SensorKind::Elvh         => Box::new(elv::ElvDriver::new(link)),
        SensorKind::Sm4000I2c    => Box::new(sm4000::Sm4000Driver::new(link)),
        SensorKind::Sm4000Analog => Box::new(sm4000::Sm4000AnalogDriver::new(link)),
        SensorKind::Smpp02       => Box::new(smpp::SmppDriver::new(link)),
    }
}

// ---------------------------------------------------------------------------
// Test Transport
// ---------------------------------------------------------------------------

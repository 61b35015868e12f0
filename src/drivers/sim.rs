// Manowatch — Bench Transport
//
// Synthetic link for running the firmware off-target. Each variant gets a
// seeded waveform (slow sine plus uniform jitter) pushed through the same
// frame codec the real part uses, and a periodic short frame so the fault
// paths stay exercised.

use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{abp, ccd, elv, sm4000, smpp, ssc};
use super::{SensorError, SensorKind, SensorLink};

/// Waveform and framing recipe for one simulated part.
#[derive(Clone, Copy)]
pub struct WaveProfile {
    pub center: f32,
    pub amplitude: f32,
    /// Uniform jitter added to each sample, in counts (0 disables).
    pub noise: i32,
    pub period_ticks: u32,
    /// Every Nth read delivers a short frame (0 disables).
    pub fault_every: u32,
    pub seed: u64,
    pub encode: fn(i32, &mut [u8]),
}

pub struct BenchLink {
    profile: WaveProfile,
    rng: StdRng,
    tick: u32,
    begun: bool,
}

impl BenchLink {
    pub fn new(profile: WaveProfile) -> Self {
        Self {
            rng: StdRng::seed_from_u64(profile.seed),
            profile,
            tick: 0,
            begun: false,
        }
    }

    fn next_raw(&mut self) -> i32 {
        let p = self.profile;
        let phase = self.tick as f32 / p.period_ticks as f32 * TAU;
        let base = p.center + p.amplitude * phase.sin();
        let jitter = if p.noise > 0 { self.rng.gen_range(-p.noise..=p.noise) } else { 0 };
        base.round() as i32 + jitter
    }
}

impl SensorLink for BenchLink {
    fn begin(&mut self) -> Result<(), SensorError> {
        self.begun = true;
        Ok(())
    }

    fn read_frame(&mut self, frame: &mut [u8]) -> Result<usize, SensorError> {
        if !self.begun {
            return Err(SensorError::NotConnected);
        }
        self.tick = self.tick.wrapping_add(1);
        if self.profile.fault_every != 0 && self.tick % self.profile.fault_every == 0 {
            return Ok(frame.len().saturating_sub(1));
        }
        let raw = self.next_raw();
        (self.profile.encode)(raw, frame);
        Ok(frame.len())
    }
}

/// Bench waveform for each variant. Centers and swings sit inside the part's
/// calibrated band so the stream reads as plausible pressure.
pub fn bench_link(kind: SensorKind) -> BenchLink {
    let profile = match kind {
        SensorKind::Abplln => WaveProfile {
            center: 8191.0,
            amplitude: 2400.0,
            noise: 40,
            period_ticks: 400,
            fault_every: 211,
            seed: 0xA1,
            encode: abp::encode_frame,
        },
        SensorKind::Ssc => WaveProfile {
            center: 8191.0,
            amplitude: 3000.0,
            noise: 40,
            period_ticks: 430,
            fault_every: 223,
            seed: 0xA2,
            encode: ssc::encode_frame,
        },
        SensorKind::Ccdann600 => WaveProfile {
            center: 2048.0,
            amplitude: 900.0,
            noise: 12,
            period_ticks: 460,
            fault_every: 227,
            seed: 0xA3,
            encode: ccd::encode_word,
        },
        SensorKind::Elvh => WaveProfile {
            center: 8191.0,
            amplitude: 2600.0,
            noise: 40,
            period_ticks: 470,
            fault_every: 229,
            seed: 0xA4,
            encode: elv::encode_bench_frame,
        },
        SensorKind::Sm4000I2c => WaveProfile {
            center: 0.0,
            amplitude: 9000.0,
            noise: 120,
            period_ticks: 480,
            fault_every: 233,
            seed: 0xA5,
            encode: sm4000::encode_i2c_frame,
        },
        SensorKind::Sm4000Analog => WaveProfile {
            center: 32768.0,
            amplitude: 10000.0,
            noise: 150,
            period_ticks: 490,
            fault_every: 239,
            seed: 0xA6,
            encode: sm4000::encode_analog_frame,
        },
        SensorKind::Smpp02 => WaveProfile {
            center: 60.0,
            amplitude: 45.0,
            noise: 6,
            period_ticks: 500,
            fault_every: 241,
            seed: 0xA7,
            encode: smpp::encode_frame,
        },
    };
    BenchLink::new(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_replays_the_same_frames() {
        let mut a = bench_link(SensorKind::Abplln);
        let mut b = bench_link(SensorKind::Abplln);
        a.begin().unwrap();
        b.begin().unwrap();

        let mut frames_a = Vec::new();
        let mut frames_b = Vec::new();
        for _ in 0..16 {
            let mut fa = [0u8; 2];
            let mut fb = [0u8; 2];
            assert_eq!(a.read_frame(&mut fa).unwrap(), 2);
            assert_eq!(b.read_frame(&mut fb).unwrap(), 2);
            frames_a.push(fa);
            frames_b.push(fb);
        }
        assert_eq!(frames_a, frames_b);
        assert!(frames_a.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn fault_cadence_delivers_short_frames() {
        let mut link = BenchLink::new(WaveProfile {
            center: 100.0,
            amplitude: 0.0,
            noise: 0,
            period_ticks: 10,
            fault_every: 5,
            seed: 1,
            encode: abp::encode_frame,
        });
        link.begin().unwrap();
        for read in 1..=10u32 {
            let mut frame = [0u8; 2];
            let got = link.read_frame(&mut frame).unwrap();
            if read % 5 == 0 {
                assert_eq!(got, 1);
            } else {
                assert_eq!(got, 2);
                assert_eq!(abp::decode_frame(&frame), (0, 100));
            }
        }
    }

    #[test]
    fn reads_before_begin_report_a_dead_bus() {
        let mut link = bench_link(SensorKind::Smpp02);
        let mut frame = [0u8; 4];
        assert!(matches!(link.read_frame(&mut frame), Err(SensorError::NotConnected)));
    }
}

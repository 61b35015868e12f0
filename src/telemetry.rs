// Manowatch — Serial Telemetry
//
// Plotter-friendly stream on one writer: a `SENSOR:<name>` line labels the
// channel, everything after it is one bare number per line. Samples carry the
// variant's fixed precision so the stream stays stable for log collectors.
// Undefined statistics are skipped, never printed as sentinels.

use std::io::{self, Write};
use std::sync::Mutex;

pub struct Telemetry<W: Write> {
    out: Mutex<W>,
}

impl Telemetry<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Telemetry<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    /// Label the stream with the variant name.
    pub fn announce(&self, name: &str) {
        let mut out = self.out.lock().unwrap();
        let _ = writeln!(out, "SENSOR:{}", name);
    }

    /// One pressure sample at the variant's display precision.
    pub fn pressure(&self, value: f32, decimals: usize) {
        let mut out = self.out.lock().unwrap();
        let _ = writeln!(out, "{:.*}", decimals, value);
    }

    /// One kurtosis figure. Callers skip the call while the statistic is
    /// undefined.
    pub fn kurtosis(&self, value: f32) {
        let mut out = self.out.lock().unwrap();
        let _ = writeln!(out, "{:.6}", value);
    }
}

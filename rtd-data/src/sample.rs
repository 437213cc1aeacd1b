//! Placeholder instrument data for the instruments view.
//!
//! There is no instrument I/O on the client; these traces only give the
//! two charts something plausible to draw.

use rand::Rng;

pub const SIGNAL_SAMPLES: usize = 50;
pub const SIGNAL_BASE_POWER_DBM: f64 = -10.0;
/// Peak-to-peak jitter around the base power.
pub const SIGNAL_JITTER_DB: f64 = 0.5;

pub const SPECTRUM_SAMPLES: usize = 100;
pub const SPECTRUM_PEAK_DBM: f64 = -20.0;
/// MHz between adjacent spectrum samples.
pub const SPECTRUM_BIN_MHZ: f64 = 0.2;
/// Roll-off in dB per MHz away from center.
pub const SPECTRUM_ROLLOFF_DB_PER_MHZ: f64 = 2.0;
pub const SPECTRUM_NOISE_DB: f64 = 1.0;

/// Output power trace around -10 dBm.
pub fn signal_generator_trace<R: Rng + ?Sized>(rng: &mut R) -> Vec<f64> {
    (0..SIGNAL_SAMPLES)
        .map(|_| SIGNAL_BASE_POWER_DBM + (rng.gen::<f64>() - 0.5) * SIGNAL_JITTER_DB)
        .collect()
}

/// Triangular spectrum peaking at the center bin.
pub fn spectrum_trace<R: Rng + ?Sized>(rng: &mut R) -> Vec<f64> {
    let center = SPECTRUM_SAMPLES as f64 / 2.0;
    (0..SPECTRUM_SAMPLES)
        .map(|i| {
            let offset_mhz = (i as f64 - center) * SPECTRUM_BIN_MHZ;
            SPECTRUM_PEAK_DBM - offset_mhz.abs() * SPECTRUM_ROLLOFF_DB_PER_MHZ
                + (rng.gen::<f64>() - 0.5) * SPECTRUM_NOISE_DB
        })
        .collect()
}

//! Stochastic perturbation of a baseline flow.

use std::f64::consts::PI;

use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Spread of the Gaussian jitter term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Jitter {
    /// Standard deviation as a fraction of the baseline.
    Proportional(f64),
    /// Fixed standard deviation in flow units.
    Absolute(f64),
}

impl Jitter {
    fn sigma(self, base: f64) -> f64 {
        match self {
            Self::Proportional(fraction) => base * fraction,
            Self::Absolute(sigma) => sigma,
        }
    }
}

/// Range of the extra flow added by a rare spike.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpikeRange {
    /// Uniform draw in `[low, high)` flow units.
    Absolute { low: f64, high: f64 },
    /// Uniform draw in `[base * low, base * high)`.
    Relative { low: f64, high: f64 },
}

impl SpikeRange {
    fn bounds(self, base: f64) -> (f64, f64) {
        match self {
            Self::Absolute { low, high } => (low, high),
            Self::Relative { low, high } => (base * low, base * high),
        }
    }
}

/// Additive noise around a baseline: intra-hour wave, Gaussian jitter, and rare spikes.
///
/// ```text
/// flow = max(floor, base + wave * base * sin(2π·minute/60) + N(0, σ) + spike)
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseModel {
    /// Amplitude of the intra-hour sine wave as a fraction of the baseline.
    pub wave_coefficient: f64,
    pub jitter: Jitter,
    /// Per-step probability of a spike.
    pub spike_probability: f64,
    pub spike: SpikeRange,
    /// Minimum emitted flow; keeps flow strictly positive.
    pub floor: f64,
}

impl NoiseModel {
    /// Deterministic intra-hour component; sums to zero over a full hour.
    pub fn wave(&self, base: f64, minute: u32) -> f64 {
        self.wave_coefficient * base * (2.0 * PI * f64::from(minute) / 60.0).sin()
    }

    /// Applies every noise component to `base` and floors the result.
    ///
    /// Always draws the jitter and the spike trial, so the random stream
    /// advances by the same amount whatever the outcome.
    pub fn perturb<R: Rng + ?Sized>(&self, base: f64, minute: u32, rng: &mut R) -> f64 {
        let sigma = self.jitter.sigma(base).max(0.0);
        let mut noise = Normal::new(0.0, sigma)
            .map(|normal| normal.sample(rng))
            .unwrap_or(0.0);

        if rng.random_bool(self.spike_probability.clamp(0.0, 1.0)) {
            let (low, high) = self.spike.bounds(base);
            noise += if high > low {
                rng.random_range(low..high)
            } else {
                low
            };
        }

        let flow = base + self.wave(base, minute) + noise;
        if flow.is_finite() {
            flow.max(self.floor)
        } else {
            self.floor
        }
    }
}

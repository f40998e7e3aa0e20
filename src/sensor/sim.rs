//! Mock Room Sensor
//!
//! Generates plausible room readings for development and load testing when
//! no hardware node is available. Ranges follow the real node's environment:
//! indoor temperatures, mid-range humidity and a mostly-clean MQ135 ppm
//! estimate.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::RoomReading;

/// Random room-reading generator.
pub struct RoomSimulator {
    rng: StdRng,
}

impl RoomSimulator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded generator for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// One simulated reading: 10-30 degrees C, 20-80 % humidity,
    /// 0.1-4.0 ppm air quality, rounded the way the node reports them.
    pub fn generate(&mut self) -> RoomReading {
        RoomReading {
            temperature: round2(self.rng.gen_range(10.0..=30.0)),
            humidity: self.rng.gen_range(20.0f64..=80.0).round(),
            air_quality: round2(self.rng.gen_range(0.1..=4.0)),
        }
    }
}

impl Default for RoomSimulator {
    fn default() -> Self {
        Self::new()
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_readings_stay_in_range() {
        let mut sim = RoomSimulator::with_seed(7);
        for _ in 0..200 {
            let reading = sim.generate();
            assert!(reading.is_finite());
            assert!((10.0..=30.0).contains(&reading.temperature));
            assert!((20.0..=80.0).contains(&reading.humidity));
            assert!((0.1..=4.0).contains(&reading.air_quality));
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let mut a = RoomSimulator::with_seed(42);
        let mut b = RoomSimulator::with_seed(42);
        for _ in 0..10 {
            assert_eq!(a.generate(), b.generate());
        }
    }
}

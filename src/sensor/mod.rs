//! Room Sensor State
//!
//! Sensor readings arrive asynchronously from the room node (or the mock
//! simulator) while inference is triggered by usage uploads. The last known
//! reading is therefore kept as an explicit timestamped value owned by the
//! server state, never as module-level globals, and every consumer sees how
//! fresh the reading was when it was fused into an assessment.

pub mod sim;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One reading from the room node: DHT22 temperature/humidity and the MQ135
/// air-quality estimate in ppm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomReading {
    /// Degrees Celsius.
    pub temperature: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    /// Air pollutant concentration, ppm (lower is better).
    pub air_quality: f64,
}

impl RoomReading {
    /// Reject payloads with NaN/infinite fields before they enter the state.
    pub fn is_finite(&self) -> bool {
        self.temperature.is_finite() && self.humidity.is_finite() && self.air_quality.is_finite()
    }
}

/// How recent the fused reading was at assessment time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Within the configured staleness window.
    Fresh,
    /// Older than the window; still used, but flagged.
    Stale { age_s: i64 },
    /// No reading has ever arrived; defaults were used.
    Missing,
}

impl Freshness {
    pub fn as_str(self) -> &'static str {
        match self {
            Freshness::Fresh => "fresh",
            Freshness::Stale { .. } => "stale",
            Freshness::Missing => "missing",
        }
    }

    pub fn is_stale(self) -> bool {
        !matches!(self, Freshness::Fresh)
    }
}

/// A reading paired with its freshness, as handed to the ingestion layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSample {
    pub reading: RoomReading,
    pub freshness: Freshness,
}

/// Last-known sensor state with an explicit staleness window.
#[derive(Debug, Clone)]
pub struct SensorState {
    last: Option<(RoomReading, DateTime<Utc>)>,
    defaults: RoomReading,
}

impl SensorState {
    /// `defaults` are the room conditions assumed until a reading arrives.
    pub fn new(defaults: RoomReading) -> Self {
        Self {
            last: None,
            defaults,
        }
    }

    /// Record a new reading, timestamped now.
    pub fn update(&mut self, reading: RoomReading) {
        self.update_at(reading, Utc::now());
    }

    pub fn update_at(&mut self, reading: RoomReading, at: DateTime<Utc>) {
        self.last = Some((reading, at));
    }

    /// The reading to fuse into the next assessment, with its freshness
    /// against `max_age`.
    pub fn latest(&self, max_age: Duration) -> SensorSample {
        self.latest_at(max_age, Utc::now())
    }

    pub fn latest_at(&self, max_age: Duration, now: DateTime<Utc>) -> SensorSample {
        match self.last {
            Some((reading, at)) => {
                let age = now.signed_duration_since(at);
                let freshness = if age <= max_age {
                    Freshness::Fresh
                } else {
                    Freshness::Stale {
                        age_s: age.num_seconds(),
                    }
                };
                SensorSample { reading, freshness }
            }
            None => SensorSample {
                reading: self.defaults,
                freshness: Freshness::Missing,
            },
        }
    }

    /// Timestamp of the last reading, if any.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last.map(|(_, at)| at)
    }
}

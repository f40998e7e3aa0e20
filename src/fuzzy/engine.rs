//! Stress Inference Engine
//!
//! A Mamdani fuzzy inference system mapping four room/usage inputs to a
//! crisp stress score and category:
//!
//! - fuzzification of the clamped inputs
//! - rule firing strength via min over the four antecedent degrees
//! - max-aggregation of firing strengths per output term
//! - centroid defuzzification over the sampled stress universe
//! - fixed-threshold categorization (< 35 low, < 65 medium, else high)
//!
//! The engine value holds only immutable variable definitions and the rule
//! table reference; every [`StressEngine::infer`] call builds its own
//! evaluation state, so one engine can be shared freely across concurrent
//! tasks. Inference never fails: inputs are saturated into their universes,
//! and the degenerate case where no rule fires (possible at the temperature
//! universe edges) resolves to a neutral fallback score.

use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

use super::rules;
use super::{Degree, Term, Trimf, Variable};

/// Sample points used for centroid defuzzification: integer steps over the
/// 0-100 stress universe. The resolution shifts the crisp score by one or
/// two decimal places, so it is part of the engine's documented contract.
pub const DEFAULT_RESOLUTION: usize = 101;

/// Crisp score substituted when the aggregated output mass is zero.
pub const FALLBACK_SCORE: f64 = 50.0;

const SCREEN: Variable = Variable::new(
    "screen",
    0.0,
    12.0,
    [
        Term::new("low", Trimf::new(0.0, 0.0, 4.0)),
        Term::new("moderate", Trimf::new(3.0, 5.5, 8.0)),
        Term::new("heavy", Trimf::new(7.0, 12.0, 12.0)),
    ],
);

const TEMPERATURE: Variable = Variable::new(
    "temperature",
    0.0,
    46.0,
    [
        Term::new("cold", Trimf::new(0.0, 18.0, 22.0)),
        Term::new("comfortable", Trimf::new(20.0, 24.0, 28.0)),
        Term::new("hot", Trimf::new(26.0, 30.0, 46.0)),
    ],
);

const HUMIDITY: Variable = Variable::new(
    "humidity",
    0.0,
    100.0,
    [
        Term::new("dry", Trimf::new(0.0, 0.0, 35.0)),
        Term::new("ideal", Trimf::new(25.0, 50.0, 75.0)),
        Term::new("humid", Trimf::new(65.0, 100.0, 100.0)),
    ],
);

// Air quality is ppm from the MQ135 reading: low is good, the inverse
// polarity of temperature and humidity.
const AIR_QUALITY: Variable = Variable::new(
    "air_quality",
    0.0,
    5.0,
    [
        Term::new("good", Trimf::new(0.0, 0.0, 2.0)),
        Term::new("moderate", Trimf::new(1.5, 2.5, 3.5)),
        Term::new("poor", Trimf::new(3.0, 5.0, 5.0)),
    ],
);

const STRESS: Variable = Variable::new(
    "stress",
    0.0,
    100.0,
    [
        Term::new("low", Trimf::new(0.0, 20.0, 40.0)),
        Term::new("medium", Trimf::new(30.0, 50.0, 70.0)),
        Term::new("high", Trimf::new(60.0, 80.0, 100.0)),
    ],
);

/// Discrete stress category derived from the crisp score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StressCategory {
    Low,
    Medium,
    High,
}

impl StressCategory {
    /// Fixed categorization thresholds: `< 35` low, `< 65` medium, else high.
    pub fn from_score(score: f64) -> Self {
        if score < 35.0 {
            StressCategory::Low
        } else if score < 65.0 {
            StressCategory::Medium
        } else {
            StressCategory::High
        }
    }

    /// Advisory message shown to the user. Pure function of the category.
    pub fn advice(self) -> &'static str {
        match self {
            StressCategory::Low => "You look calm and relaxed. Keep it up!",
            StressCategory::Medium => {
                "Stress is building up. Watch your screen time and your room comfort."
            }
            StressCategory::High => {
                "High stress level! Put the screen down and take a break."
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StressCategory::Low => "Low",
            StressCategory::Medium => "Medium",
            StressCategory::High => "High",
        }
    }
}

impl fmt::Display for StressCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one inference pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Assessment {
    /// Crisp stress score in [0, 100].
    pub stress_value: f64,
    /// Category under the fixed thresholds.
    pub category: StressCategory,
    /// Advisory message for the category.
    pub message: &'static str,
}

impl Assessment {
    fn from_score(stress_value: f64) -> Self {
        let category = StressCategory::from_score(stress_value);
        Self {
            stress_value,
            category,
            message: category.advice(),
        }
    }
}

/// The immutable Mamdani inference system.
#[derive(Debug, Clone)]
pub struct StressEngine {
    screen: Variable,
    temperature: Variable,
    humidity: Variable,
    air_quality: Variable,
    stress: Variable,
    resolution: usize,
    fallback: f64,
}

impl StressEngine {
    pub fn new() -> Self {
        Self {
            screen: SCREEN,
            temperature: TEMPERATURE,
            humidity: HUMIDITY,
            air_quality: AIR_QUALITY,
            stress: STRESS,
            resolution: DEFAULT_RESOLUTION,
            fallback: FALLBACK_SCORE,
        }
    }

    /// Set the number of defuzzification sample points (minimum 2).
    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution.max(2);
        self
    }

    /// Set the score substituted when no rule fires.
    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Run one inference pass.
    ///
    /// Inputs are screen time in hours, temperature in degrees Celsius,
    /// relative humidity in percent and air quality in ppm. Out-of-range
    /// values are saturated into the variable universes; the call always
    /// returns a valid [`Assessment`].
    pub fn infer(
        &self,
        screen_hours: f64,
        temperature: f64,
        humidity: f64,
        air_quality: f64,
    ) -> Assessment {
        let screen = self.screen.clamp(screen_hours);
        let temp = self.temperature.clamp(temperature);
        let humid = self.humidity.clamp(humidity);
        let air = self.air_quality.clamp(air_quality);
        debug!(screen, temp, humid, air, "running stress inference");

        let degrees = [
            self.screen.fuzzify(screen),
            self.temperature.fuzzify(temp),
            self.humidity.fuzzify(humid),
            self.air_quality.fuzzify(air),
        ];

        // Min-implication per rule, max-aggregation per output term.
        let mut clipped = [Degree::ZERO; 3];
        for (s, t, h, a, out) in rules::all() {
            let strength = degrees[0][s]
                .and(degrees[1][t])
                .and(degrees[2][h])
                .and(degrees[3][a]);
            clipped[out as usize] = clipped[out as usize].or(strength);
        }

        let stress_value = match self.defuzzify(&clipped) {
            Some(value) => value,
            None => {
                warn!(
                    fallback = self.fallback,
                    "no rule fired for the current inputs; substituting the neutral score"
                );
                self.fallback
            }
        };

        let assessment = Assessment::from_score(stress_value);
        debug!(
            stress = assessment.stress_value,
            category = %assessment.category,
            "inference complete"
        );
        assessment
    }

    /// Centroid of the aggregated output set, or `None` when the set is
    /// identically zero.
    fn defuzzify(&self, clipped: &[Degree; 3]) -> Option<f64> {
        let (lo, hi) = self.stress.universe();
        let step = (hi - lo) / (self.resolution as f64 - 1.0);

        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for i in 0..self.resolution {
            let x = lo + step * i as f64;
            let mut mu = 0.0f64;
            for (term, alpha) in self.stress.terms().iter().zip(clipped) {
                mu = mu.max(term.shape.evaluate(x).value().min(alpha.value()));
            }
            numerator += x * mu;
            denominator += mu;
        }

        (denominator > 0.0).then(|| numerator / denominator)
    }
}

impl Default for StressEngine {
    fn default() -> Self {
        Self::new()
    }
}

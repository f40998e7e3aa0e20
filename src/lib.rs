//! stresswatch
//!
//! Screen-time and room-environment stress assessment built around a Mamdani
//! fuzzy inference engine.
//!
//! # Architecture
//!
//! - [`fuzzy`] - the inference core: triangular membership functions,
//!   linguistic variables, the 81-rule base and the Mamdani pipeline
//! - [`usage`] - smartphone usage payloads and screen-time rendering
//! - [`sensor`] - timestamped last-known room readings and the mock generator
//! - [`store`] - the append-only CSV assessment log
//! - [`server`] - axum HTTP ingestion endpoints
//! - [`config`] / [`error`] - TOML+env configuration and coded errors
//!
//! The engine is a pure function of its four inputs: it holds only immutable
//! variable and rule definitions, clamps out-of-range inputs instead of
//! rejecting them, and resolves the no-rule-fired case to a neutral fallback
//! score, so `infer` always returns a usable assessment.
//!
//! # Example
//!
//! ```rust
//! use stresswatch::{StressCategory, StressEngine};
//!
//! let engine = StressEngine::new();
//! let assessment = engine.infer(3.0, 24.0, 50.0, 0.1);
//!
//! assert_eq!(assessment.category, StressCategory::Low);
//! assert!(assessment.stress_value < 35.0);
//! ```

pub mod config;
pub mod error;
pub mod fuzzy;
pub mod http_client;
pub mod sensor;
pub mod server;
pub mod store;
pub mod usage;

// Re-export engine types
pub use fuzzy::engine::{Assessment, StressCategory, StressEngine, DEFAULT_RESOLUTION, FALLBACK_SCORE};

// Re-export sensor types
pub use sensor::{Freshness, RoomReading, SensorSample, SensorState};

// Re-export store types
pub use store::{AssessmentLog, AssessmentRecord};

// Re-export usage types
pub use usage::{AppUsage, ScreenTimeLevel, UsagePayload};

// Re-export async server types
pub use server::{create_router, run_server, AppState, SharedState};

// Re-export configuration and error types
pub use config::StresswatchConfig;
pub use error::{ErrorCode, StressError};

//! Health Analysis
//!
//! Rule-based evaluation of a user's daily health metrics:
//!
//! - **types**: `HealthMetrics` input, `HealthAnalysis` output and status enums
//! - **evaluator**: thresholds and recommendation rules
//!
//! # Example
//!
//! ```rust
//! use sahacara::analysis::{Evaluator, HealthMetrics, RecommendationCategory};
//! use sahacara::config::AnalysisConfig;
//!
//! let evaluator = Evaluator::new(AnalysisConfig::default());
//! let analysis = evaluator.evaluate(&HealthMetrics::new().calories(2500.0).water_intake(3.0));
//!
//! assert!(analysis.has_recommendation(RecommendationCategory::Hydration));
//! assert!(analysis.has_recommendation(RecommendationCategory::Nutrition));
//! ```

pub mod evaluator;
pub mod types;

pub use evaluator::{Evaluator, MOOD_POSITIVE_THRESHOLD, MOOD_SCALE_MAX};
pub use types::{
    CalorieStatus, HealthAnalysis, HealthMetrics, MetricStatus, MoodStatus, Overview, Priority,
    Recommendation, RecommendationCategory, WaterStatus,
};

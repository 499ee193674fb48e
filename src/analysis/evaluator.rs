//! Health-Analysis Evaluator
//!
//! Turns a [`HealthMetrics`] snapshot into a [`HealthAnalysis`].
//! Pure and deterministic: the same snapshot always yields the same analysis.

use crate::analysis::types::{
    CalorieStatus, HealthAnalysis, HealthMetrics, MetricStatus, MoodStatus, Overview, Priority,
    Recommendation, RecommendationCategory, WaterStatus,
};
use crate::config::AnalysisConfig;

/// Mood ratings at or above this are positive
pub const MOOD_POSITIVE_THRESHOLD: f64 = 4.0;

/// Top of the mood scale, reported as the mood "goal"
pub const MOOD_SCALE_MAX: f64 = 5.0;

const HYDRATION_ADVICE: &str = "Increase water intake to 8 glasses per day";
const HYDRATION_TIPS: [&str; 2] = ["Set hourly reminders", "Keep a water bottle nearby"];
const NUTRITION_TIPS: [&str; 2] = ["Track portion sizes", "Choose nutrient-dense foods"];

/// Rule-based evaluator over health metrics
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: AnalysisConfig,
}

impl Evaluator {
    /// Create an evaluator with the given defaults and thresholds
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Get the analysis configuration
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Evaluate a metrics snapshot
    ///
    /// Missing fields fall back to zero, except goals which fall back to the
    /// configured calorie and water goals.
    pub fn evaluate(&self, metrics: &HealthMetrics) -> HealthAnalysis {
        let calories = self.calorie_status(metrics);
        let mood = Self::mood_status(metrics);
        let water = self.water_status(metrics);

        let mut recommendations = Vec::new();

        if water.status == WaterStatus::NeedsAttention {
            recommendations.push(Recommendation {
                category: RecommendationCategory::Hydration,
                advice: HYDRATION_ADVICE.to_string(),
                priority: Priority::High,
                tips: HYDRATION_TIPS.iter().map(|t| t.to_string()).collect(),
            });
        }

        if calories.status == CalorieStatus::Exceeding {
            recommendations.push(Recommendation {
                category: RecommendationCategory::Nutrition,
                advice: format!(
                    "Consider reducing calorie intake. Currently {} vs goal {}",
                    calories.current, calories.goal
                ),
                priority: Priority::Medium,
                tips: NUTRITION_TIPS.iter().map(|t| t.to_string()).collect(),
            });
        }

        // Low mood is reported in the overview only; it never adds a recommendation.

        HealthAnalysis {
            overview: Overview {
                calories,
                mood,
                water,
            },
            recommendations,
        }
    }

    fn calorie_status(&self, metrics: &HealthMetrics) -> MetricStatus<CalorieStatus> {
        let current = metrics.calories.unwrap_or(0.0);
        let goal = metrics.calorie_goal.unwrap_or(self.config.calorie_goal);

        let status = if current > goal {
            CalorieStatus::Exceeding
        } else {
            CalorieStatus::OnTrack
        };

        MetricStatus {
            current,
            goal,
            status,
        }
    }

    fn mood_status(metrics: &HealthMetrics) -> MetricStatus<MoodStatus> {
        let current = metrics.mood_rating.unwrap_or(0.0);

        let status = if current >= MOOD_POSITIVE_THRESHOLD {
            MoodStatus::Positive
        } else {
            MoodStatus::NeedsAttention
        };

        MetricStatus {
            current,
            goal: MOOD_SCALE_MAX,
            status,
        }
    }

    fn water_status(&self, metrics: &HealthMetrics) -> MetricStatus<WaterStatus> {
        let current = metrics.water_intake.unwrap_or(0.0);
        let goal = metrics.water_goal.unwrap_or(self.config.water_goal);

        // Decided against the threshold, not the displayed goal.
        let status = if current < self.config.water_threshold {
            WaterStatus::NeedsAttention
        } else {
            WaterStatus::OnTrack
        };

        MetricStatus {
            current,
            goal,
            status,
        }
    }
}

//! Core data types for health analysis
//!
//! This module defines the input snapshot and the derived summary:
//! - `HealthMetrics`: per-request numeric snapshot (every field optional)
//! - `HealthAnalysis`: status overview plus ordered recommendations
//! - Status enums for each metric category

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Per-request snapshot of a user's calorie, mood and water data
///
/// Field names on the wire are camelCase (`calories`, `calorieGoal`,
/// `moodRating`, `waterIntake`, `waterGoal`). Absent or `null` fields are
/// resolved to defaults by the evaluator, never rejected. Only a JSON
/// object is accepted; serde's positional sequence form is refused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "Map<String, Value>")]
pub struct HealthMetrics {
    /// Calories consumed so far
    pub calories: Option<f64>,
    /// Daily calorie goal
    pub calorie_goal: Option<f64>,
    /// Mood on a 0-5 scale
    pub mood_rating: Option<f64>,
    /// Servings of water consumed
    pub water_intake: Option<f64>,
    /// Displayed water goal in servings
    pub water_goal: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetricFields {
    #[serde(default)]
    calories: Option<f64>,
    #[serde(default)]
    calorie_goal: Option<f64>,
    #[serde(default)]
    mood_rating: Option<f64>,
    #[serde(default)]
    water_intake: Option<f64>,
    #[serde(default)]
    water_goal: Option<f64>,
}

impl TryFrom<Map<String, Value>> for HealthMetrics {
    type Error = serde_json::Error;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let fields: MetricFields = serde_json::from_value(Value::Object(map))?;

        Ok(Self {
            calories: fields.calories,
            calorie_goal: fields.calorie_goal,
            mood_rating: fields.mood_rating,
            water_intake: fields.water_intake,
            water_goal: fields.water_goal,
        })
    }
}

impl HealthMetrics {
    /// Create an empty snapshot (all fields defaulted)
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set calories consumed
    pub fn calories(mut self, value: f64) -> Self {
        self.calories = Some(value);
        self
    }

    /// Builder method: set calorie goal
    pub fn calorie_goal(mut self, value: f64) -> Self {
        self.calorie_goal = Some(value);
        self
    }

    /// Builder method: set mood rating
    pub fn mood_rating(mut self, value: f64) -> Self {
        self.mood_rating = Some(value);
        self
    }

    /// Builder method: set water intake
    pub fn water_intake(mut self, value: f64) -> Self {
        self.water_intake = Some(value);
        self
    }

    /// Builder method: set water goal
    pub fn water_goal(mut self, value: f64) -> Self {
        self.water_goal = Some(value);
        self
    }
}

/// Calorie status relative to the goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalorieStatus {
    OnTrack,
    Exceeding,
}

impl CalorieStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalorieStatus::OnTrack => "on_track",
            CalorieStatus::Exceeding => "exceeding",
        }
    }
}

/// Mood status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodStatus {
    Positive,
    NeedsAttention,
}

impl MoodStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoodStatus::Positive => "positive",
            MoodStatus::NeedsAttention => "needs_attention",
        }
    }
}

/// Water intake status relative to the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterStatus {
    OnTrack,
    NeedsAttention,
}

impl WaterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaterStatus::OnTrack => "on_track",
            WaterStatus::NeedsAttention => "needs_attention",
        }
    }
}

impl fmt::Display for CalorieStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for MoodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for WaterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current value, goal and derived status for one metric category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricStatus<S> {
    #[serde(serialize_with = "serialize_number")]
    pub current: f64,
    #[serde(serialize_with = "serialize_number")]
    pub goal: f64,
    pub status: S,
}

/// Whole numbers go out as integers (`2500`, not `2500.0`)
fn serialize_number<Ser: Serializer>(value: &f64, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
    // Beyond 2^53 an f64 no longer holds every integer exactly
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    if value.fract() == 0.0 && value.abs() <= MAX_EXACT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Status of all three metric categories
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub calories: MetricStatus<CalorieStatus>,
    pub mood: MetricStatus<MoodStatus>,
    pub water: MetricStatus<WaterStatus>,
}

/// Recommendation category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    Hydration,
    Nutrition,
}

/// Recommendation priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// A single actionable suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: RecommendationCategory,
    pub advice: String,
    pub priority: Priority,
    pub tips: Vec<String>,
}

/// Derived status summary plus recommendation list
///
/// Immutable once computed. Recommendations keep evaluation order
/// (hydration before nutrition); no sort is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthAnalysis {
    pub overview: Overview,
    pub recommendations: Vec<Recommendation>,
}

impl HealthAnalysis {
    /// Check whether a recommendation of the given category was emitted
    pub fn has_recommendation(&self, category: RecommendationCategory) -> bool {
        self.recommendations.iter().any(|r| r.category == category)
    }
}

//! Request and response payloads of the keepItFit backend

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::HashMap;

use crate::error::{ApiError, Result};

/// Shortest activity the tracker accepts, in minutes.
pub const MIN_ACTIVITY_MINUTES: u32 = 1;
/// Longest activity the tracker accepts, in minutes.
pub const MAX_ACTIVITY_MINUTES: u32 = 300;
/// Number of previous chat turns sent along with a new message.
pub const CHAT_HISTORY_LIMIT: usize = 10;

// ============================================================================
// Errors
// ============================================================================

/// Error body returned by the backend: `{"detail": ...}`.
///
/// `detail` is a string for handled errors and a list of field errors for
/// request validation failures.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    /// Flatten `detail` into one displayable line.
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            Value::Array(items) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                (!messages.is_empty()).then(|| messages.join("; "))
            }
            _ => None,
        }
    }
}

// ============================================================================
// Profile enums
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Lose,
    #[default]
    Maintain,
    Gain,
}

impl Goal {
    /// Key of the label in the string tables
    pub fn translation_key(&self) -> &'static str {
        match self {
            Goal::Lose => "goalLose",
            Goal::Maintain => "goalMaintain",
            Goal::Gain => "goalGain",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Diet {
    #[default]
    Balanced,
    Vegan,
    Keto,
}

impl Diet {
    pub fn translation_key(&self) -> &'static str {
        match self {
            Diet::Balanced => "dietBalanced",
            Diet::Vegan => "dietVegan",
            Diet::Keto => "dietKeto",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    #[default]
    Moderate,
    VeryActive,
}

impl ActivityLevel {
    pub fn translation_key(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "activitySedentary",
            ActivityLevel::Moderate => "activityModerate",
            ActivityLevel::VeryActive => "activityVeryActive",
        }
    }
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// The backend looks users up by email under this name.
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: &str, password: &str) -> Result<Self> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::InvalidRequest(
                "Please fill in all fields".to_string(),
            ));
        }

        Ok(Self {
            username: email.to_string(),
            password: password.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub goal: Goal,
    pub diet: Diet,
    pub activity_level: ActivityLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_conditions: Option<String>,
}

impl RegisterRequest {
    /// Account fields plus the body measurements the plan generator needs.
    pub fn validate(&self) -> Result<()> {
        let missing_text = [&self.username, &self.email, &self.password]
            .iter()
            .any(|value| value.trim().is_empty());
        let missing_body = [self.age, self.weight, self.height]
            .iter()
            .any(|value| value.map_or(true, |v| v == 0));

        if missing_text || missing_body {
            return Err(ApiError::InvalidRequest(
                "Please fill in all required fields".to_string(),
            ));
        }

        Ok(())
    }
}

/// Response of `/auth/login` and `/auth/register`.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub weight: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub diet: Option<String>,
    #[serde(default)]
    pub activity_level: Option<String>,
    #[serde(default)]
    pub health_conditions: Option<String>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .finish_non_exhaustive()
    }
}

/// Record returned by `/auth/me` and `/auth/update-profile`.
///
/// Only loosely typed: every field is optional, a value of an unexpected
/// shape reads as `None` instead of failing the whole record, and unknown
/// fields are kept in `extra` so nothing the backend adds is lost.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<i64>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub username: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<Number>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<Number>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub height: Option<Number>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub goal: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub diet: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub activity_level: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub health_conditions: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub profile_picture: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl UserProfile {
    /// Age, weight and height are what the plan generator requires.
    pub fn has_body_measurements(&self) -> bool {
        self.age.is_some() && self.weight.is_some() && self.height.is_some()
    }
}

/// Partial profile update; absent fields are left untouched server-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<Goal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diet: Option<Diet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<ActivityLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_conditions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProfilePictureUpload {
    pub profile_picture: String,
}

impl ProfilePictureUpload {
    /// The stored object keeps its URL across uploads, so image caches need
    /// a query parameter that changes with every upload.
    pub fn cache_busted_url(&self, timestamp_millis: i64) -> String {
        let separator = if self.profile_picture.contains('?') { '&' } else { '?' };
        format!("{}{}t={}", self.profile_picture, separator, timestamp_millis)
    }
}

// ============================================================================
// Activity
// ============================================================================

/// One-tap presets offered by the activity screen: name and minutes.
pub const QUICK_ACTIVITIES: &[(&str, u32)] = &[
    ("Running", 30),
    ("Walking", 30),
    ("Cycling", 45),
    ("Swimming", 30),
    ("Yoga", 45),
    ("Weight Training", 60),
    ("HIIT", 20),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityCreate {
    pub activity: String,
    /// Minutes, within `MIN_ACTIVITY_MINUTES..=MAX_ACTIVITY_MINUTES`
    pub duration: u32,
}

impl ActivityCreate {
    /// A zero duration counts as missing; anything above the maximum is
    /// clamped down.
    pub fn new(activity: &str, duration: u32) -> Result<Self> {
        let activity = activity.trim();
        if activity.is_empty() || duration == 0 {
            return Err(ApiError::InvalidRequest(
                "Please enter both activity name and duration".to_string(),
            ));
        }

        Ok(Self {
            activity: activity.to_string(),
            duration: clamp_duration(duration),
        })
    }
}

fn clamp_duration(minutes: u32) -> u32 {
    minutes.clamp(MIN_ACTIVITY_MINUTES, MAX_ACTIVITY_MINUTES)
}

/// Normalise free-text duration input the way the tracker's text field does:
/// non-digits are dropped and the number is clamped to 1..=300.
///
/// Returns `None` when no digits remain.
pub fn parse_duration_input(input: &str) -> Option<u32> {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }

    // Overflowing input is still "a lot of minutes".
    let minutes = digits.parse::<u32>().unwrap_or(u32::MAX);
    Some(clamp_duration(minutes))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Activity {
    pub id: i64,
    pub owner_id: i64,
    pub activity: String,
    pub duration: u32,
    pub date: NaiveDateTime,
}

/// Last seven days, as computed by `/activity/stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStats {
    pub total_minutes: u32,
    pub total_activities: u32,
    pub calories_burned: u32,
    pub streak: u32,
}

// ============================================================================
// Plan
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WellnessScore {
    pub wellness_score: u32,
    pub profile_complete: bool,
    pub recent_activities_count: u32,
}

/// Plan generators emit numbers for static plans and text for AI plans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(serde_json::Number),
    Text(String),
}

impl std::fmt::Display for NumberOrText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumberOrText::Number(n) => write!(f, "{}", n),
            NumberOrText::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MealPlanDay {
    pub day: NumberOrText,
    #[serde(default)]
    pub breakfast: String,
    #[serde(default)]
    pub lunch: String,
    #[serde(default)]
    pub dinner: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkoutDay {
    pub day: NumberOrText,
    #[serde(default)]
    pub workout: String,
    #[serde(default)]
    pub duration: Option<NumberOrText>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FitnessPlan {
    pub daily_calories: f64,
    pub bmr: f64,
    pub tdee: f64,
    pub goal: String,
    pub diet: String,
    #[serde(default)]
    pub meal_plan: Vec<MealPlanDay>,
    #[serde(default)]
    pub workout_routine: Vec<WorkoutDay>,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default)]
    pub ai_generated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeRequest {
    pub ingredients: String,
}

impl RecipeRequest {
    pub fn new(ingredients: &str) -> Result<Self> {
        let ingredients = ingredients.trim();
        if ingredients.is_empty() {
            return Err(ApiError::InvalidRequest(
                "Please enter available ingredients".to_string(),
            ));
        }

        Ok(Self {
            ingredients: ingredients.to_string(),
        })
    }
}

/// Free-form recipe object; the generator's schema is advisory only.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Recipe(pub Map<String, Value>);

impl Recipe {
    pub fn name(&self) -> Option<&str> {
        self.0.get("recipe_name").and_then(Value::as_str)
    }

    pub fn ingredients(&self) -> Vec<&str> {
        self.string_list("ingredients")
    }

    pub fn instructions(&self) -> Vec<&str> {
        self.string_list("instructions")
    }

    fn string_list(&self, key: &str) -> Vec<&str> {
        self.0
            .get(key)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

// ============================================================================
// Meals
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealAnalysisCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
    pub analysis: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MealAnalysis {
    pub id: i64,
    #[serde(default)]
    pub image_uri: Option<String>,
    pub analysis_data: Map<String, Value>,
    pub date: NaiveDateTime,
    pub owner_id: i64,
}

/// Response of the `/upload/` endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MealUpload {
    pub url: String,
    pub filename: String,
    #[serde(default)]
    pub analysis: Value,
}

/// What the image analyser produced for an upload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MealAnalysisOutcome<'a> {
    /// Structured nutrition data, ready to save as a meal analysis
    Structured(&'a Map<String, Value>),
    /// The model answered with prose instead of JSON
    Text(&'a str),
    /// Analysis was skipped or failed; the note says why
    Note(&'a str),
    Empty,
}

impl MealUpload {
    pub fn outcome(&self) -> MealAnalysisOutcome<'_> {
        match &self.analysis {
            Value::String(text) => MealAnalysisOutcome::Text(text),
            Value::Object(map) => {
                if let Some(text) = map.get("text").and_then(Value::as_str) {
                    MealAnalysisOutcome::Text(text)
                } else if let Some(note) = map.get("note").and_then(Value::as_str) {
                    MealAnalysisOutcome::Note(note)
                } else if map.is_empty() {
                    MealAnalysisOutcome::Empty
                } else {
                    MealAnalysisOutcome::Structured(map)
                }
            }
            _ => MealAnalysisOutcome::Empty,
        }
    }
}

// ============================================================================
// Chat
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<ChatTurn>,
}

impl ChatRequest {
    /// Trims the message and keeps only the last `CHAT_HISTORY_LIMIT` turns.
    pub fn new(message: &str, history: &[ChatTurn]) -> Result<Self> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ApiError::InvalidRequest(
                "Please enter a message".to_string(),
            ));
        }

        let start = history.len().saturating_sub(CHAT_HISTORY_LIMIT);
        Ok(Self {
            message: message.to_string(),
            history: history[start..].to_vec(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

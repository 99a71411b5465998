//! # keepItFit API client
//!
//! The shared backend client ([`ApiClient`]), its typed endpoints, the
//! request/response payloads and the mapping from failures to user-facing
//! alerts.
//!
//! ```ignore
//! use core_api::{ApiClient, Alert};
//!
//! let client = ApiClient::from_config(&config);
//! match client.generate_plan().await {
//!     Ok(plan) => render(plan),
//!     Err(e) => show(Alert::from_error(&e, "Unable to Generate Plan",
//!         "Something went wrong. Please try again later.")),
//! }
//! ```

pub mod alert;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod types;

pub use alert::{Alert, AlertKind};
pub use client::ApiClient;
pub use error::{ApiError, Result};
pub use types::{
    Activity, ActivityLevel, ActivityStats, ChatReply, ChatRole, ChatTurn, Diet, FitnessPlan,
    Goal, MealAnalysis, MealAnalysisOutcome, MealUpload, ProfileUpdate, Recipe, RegisterRequest,
    TokenResponse, UserProfile, WellnessScore,
};

//! Typed backend endpoints
//!
//! Each method validates its input locally where the screens do, then
//! performs exactly one request. Paths are relative to the configured base
//! URL.

use bridge_traits::http::MultipartFile;
use bytes::Bytes;
use core_runtime::logging::{redact_if_sensitive, strip_path};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::client::ApiClient;
use crate::error::{ApiError, Result};
use crate::types::{
    Activity, ActivityCreate, ActivityStats, ChatReply, ChatRequest, ChatTurn, FitnessPlan,
    LoginRequest, MealAnalysis, MealAnalysisCreate, MealUpload, ProfilePictureUpload,
    ProfileUpdate, Recipe, RecipeRequest, RegisterRequest, TokenResponse, UserProfile,
    WellnessScore,
};

pub mod paths {
    pub const LOGIN: &str = "/auth/login";
    pub const REGISTER: &str = "/auth/register";
    pub const ME: &str = "/auth/me";
    pub const UPDATE_PROFILE: &str = "/auth/update-profile";
    pub const UPLOAD_PROFILE_PICTURE: &str = "/auth/upload-profile-picture";
    pub const GENERATE_PLAN: &str = "/plan/generate-plan";
    pub const WELLNESS_SCORE: &str = "/plan/wellness-score";
    pub const GENERATE_RECIPE: &str = "/plan/generate-recipe";
    pub const TRACK_ACTIVITY: &str = "/activity/track-activity";
    pub const RECENT_ACTIVITIES: &str = "/activity/recent";
    pub const MEAL_ANALYSIS: &str = "/activity/meal-analysis";
    pub const MEAL_INSIGHTS: &str = "/activity/meal-insights";
    pub const ACTIVITY_STATS: &str = "/activity/stats";
    pub const UPLOAD: &str = "/upload/";
    pub const CHAT_MESSAGE: &str = "/chat/message";
}

/// Multipart field name the backend reads uploads from
pub const UPLOAD_FIELD: &str = "file";

const DEFAULT_PROFILE_PICTURE_NAME: &str = "profile.jpg";

/// Build the `file` part for a profile picture picked at `image_uri`.
///
/// The file name is the last path segment of the URI; the type is always
/// JPEG because the picker re-encodes.
pub fn profile_picture_part(image_uri: &str, data: Bytes) -> MultipartFile {
    let file_name = match strip_path(image_uri) {
        "" => DEFAULT_PROFILE_PICTURE_NAME,
        name => name,
    };

    MultipartFile {
        field_name: UPLOAD_FIELD.to_string(),
        file_name: file_name.to_string(),
        content_type: "image/jpeg".to_string(),
        data,
    }
}

/// Build the `file` part for a meal photo: `meal.<ext>` typed `image/<ext>`.
pub fn meal_image_part(image_uri: &str, data: Bytes) -> MultipartFile {
    let extension = strip_path(image_uri)
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| "jpg".to_string());

    MultipartFile {
        field_name: UPLOAD_FIELD.to_string(),
        file_name: format!("meal.{}", extension),
        content_type: format!("image/{}", extension),
        data,
    }
}

impl ApiClient {
    // ------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------

    #[instrument(skip(self, email, password), fields(email = %redact_if_sensitive("email", email)))]
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse> {
        let request = LoginRequest::new(email, password)?;
        self.post_json(paths::LOGIN, &request).await
    }

    #[instrument(
        skip(self, request),
        fields(username = %redact_if_sensitive("username", &request.username))
    )]
    pub async fn register(&self, request: &RegisterRequest) -> Result<TokenResponse> {
        request.validate()?;
        self.post_json(paths::REGISTER, request).await
    }

    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<UserProfile> {
        self.get_json(paths::ME).await
    }

    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile> {
        self.post_json(paths::UPDATE_PROFILE, update).await
    }

    #[instrument(skip(self, image_uri, data), fields(file = strip_path(image_uri), bytes = data.len()))]
    pub async fn upload_profile_picture(
        &self,
        image_uri: &str,
        data: Bytes,
    ) -> Result<ProfilePictureUpload> {
        ensure_image(&data)?;
        self.post_multipart(
            paths::UPLOAD_PROFILE_PICTURE,
            profile_picture_part(image_uri, data),
        )
        .await
    }

    // ------------------------------------------------------------------
    // Plan
    // ------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn generate_plan(&self) -> Result<FitnessPlan> {
        self.post_empty(paths::GENERATE_PLAN).await
    }

    #[instrument(skip(self))]
    pub async fn wellness_score(&self) -> Result<WellnessScore> {
        self.get_json(paths::WELLNESS_SCORE).await
    }

    #[instrument(skip(self, ingredients))]
    pub async fn generate_recipe(&self, ingredients: &str) -> Result<Recipe> {
        let request = RecipeRequest::new(ingredients)?;
        self.post_json(paths::GENERATE_RECIPE, &request).await
    }

    // ------------------------------------------------------------------
    // Activity
    // ------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn track_activity(&self, activity: &str, duration: u32) -> Result<Activity> {
        let request = ActivityCreate::new(activity, duration)?;
        self.post_json(paths::TRACK_ACTIVITY, &request).await
    }

    #[instrument(skip(self))]
    pub async fn recent_activities(&self) -> Result<Vec<Activity>> {
        self.get_json(paths::RECENT_ACTIVITIES).await
    }

    #[instrument(skip(self))]
    pub async fn activity_stats(&self) -> Result<ActivityStats> {
        self.get_json(paths::ACTIVITY_STATS).await
    }

    #[instrument(skip(self, analysis))]
    pub async fn save_meal_analysis(
        &self,
        image_uri: Option<&str>,
        analysis: Map<String, Value>,
    ) -> Result<MealAnalysis> {
        let request = MealAnalysisCreate {
            image_uri: image_uri.map(str::to_string),
            analysis,
        };
        self.post_json(paths::MEAL_ANALYSIS, &request).await
    }

    #[instrument(skip(self))]
    pub async fn meal_insights(&self) -> Result<Vec<MealAnalysis>> {
        self.get_json(paths::MEAL_INSIGHTS).await
    }

    /// Upload a meal photo for storage and image analysis.
    #[instrument(skip(self, image_uri, data), fields(file = strip_path(image_uri), bytes = data.len()))]
    pub async fn upload_meal_image(&self, image_uri: &str, data: Bytes) -> Result<MealUpload> {
        ensure_image(&data)?;
        self.post_multipart(paths::UPLOAD, meal_image_part(image_uri, data))
            .await
    }

    // ------------------------------------------------------------------
    // Chat
    // ------------------------------------------------------------------

    #[instrument(skip(self, message, history), fields(history_len = history.len()))]
    pub async fn send_chat_message(&self, message: &str, history: &[ChatTurn]) -> Result<ChatReply> {
        let request = ChatRequest::new(message, history)?;
        self.post_json(paths::CHAT_MESSAGE, &request).await
    }
}

fn ensure_image(data: &Bytes) -> Result<()> {
    if data.is_empty() {
        return Err(ApiError::InvalidRequest(
            "Please select a photo first".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_picture_part_name() {
        let part = profile_picture_part("file:///data/cache/ImagePicker/abc.jpeg", Bytes::from_static(b"x"));
        assert_eq!(part.field_name, "file");
        assert_eq!(part.file_name, "abc.jpeg");
        assert_eq!(part.content_type, "image/jpeg");

        let fallback = profile_picture_part("file:///data/cache/", Bytes::from_static(b"x"));
        assert_eq!(fallback.file_name, "profile.jpg");
    }

    #[test]
    fn test_upload_parts_drop_local_directories() {
        let part = profile_picture_part("C:\\Users\\sam\\Pictures\\me.jpg", Bytes::from_static(b"x"));
        assert_eq!(part.file_name, "me.jpg");

        let meal = meal_image_part("D:\\photos\\dinner.webp", Bytes::from_static(b"x"));
        assert_eq!(meal.file_name, "meal.webp");
        assert_eq!(meal.content_type, "image/webp");
    }

    #[test]
    fn test_meal_image_part_uses_extension() {
        let part = meal_image_part("file:///tmp/IMG_0042.PNG", Bytes::from_static(b"x"));
        assert_eq!(part.file_name, "meal.png");
        assert_eq!(part.content_type, "image/png");

        let no_ext = meal_image_part("content://media/external/images/42", Bytes::from_static(b"x"));
        assert_eq!(no_ext.file_name, "meal.jpg");
    }

    #[test]
    fn test_empty_image_rejected() {
        assert!(matches!(
            ensure_image(&Bytes::new()),
            Err(ApiError::InvalidRequest(_))
        ));
    }
}

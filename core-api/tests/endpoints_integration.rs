//! Endpoint behaviour against a recording HTTP double

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bridge_traits::storage::SecureStore;
use bytes::Bytes;
use core_api::alert::AlertKind;
use core_api::types::{MealAnalysisOutcome, NumberOrText};
use core_api::{ApiClient, ApiError, ChatTurn, ProfileUpdate, RegisterRequest};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Replays canned responses in order and records every request.
#[derive(Default)]
struct RecordingHttp {
    responses: Mutex<VecDeque<BridgeResult<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingHttp {
    fn respond(&self, status: u16, body: Value) {
        self.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        }));
    }

    fn fail(&self, error: BridgeError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn last_json(&self) -> Value {
        let requests = self.requests.lock().unwrap();
        let body = requests
            .last()
            .and_then(|request| request.body.clone())
            .unwrap_or_default();
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    }
}

#[async_trait]
impl HttpClient for RecordingHttp {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BridgeError::OperationFailed("no canned response".to_string())))
    }
}

#[derive(Default)]
struct MemoryStore(Mutex<HashMap<String, Vec<u8>>>);

#[async_trait]
impl SecureStore for MemoryStore {
    async fn set_secret(&self, key: &str, value: &[u8]) -> BridgeResult<()> {
        self.0.lock().unwrap().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn get_secret(&self, key: &str) -> BridgeResult<Option<Vec<u8>>> {
        Ok(self.0.lock().unwrap().get(key).cloned())
    }

    async fn delete_secret(&self, key: &str) -> BridgeResult<()> {
        self.0.lock().unwrap().remove(key);
        Ok(())
    }
}

fn setup() -> (ApiClient, Arc<RecordingHttp>, Arc<MemoryStore>) {
    let http = Arc::new(RecordingHttp::default());
    let store = Arc::new(MemoryStore::default());
    let client = ApiClient::new("http://api.test", http.clone(), store.clone());
    (client, http, store)
}

#[tokio::test]
async fn login_posts_email_as_username() {
    let (client, http, _) = setup();
    http.respond(200, json!({"access_token": "jwt", "token_type": "bearer"}));

    let token = client.login("sam@example.com", "secret").await.unwrap();

    assert_eq!(token.access_token, "jwt");
    let requests = http.requests();
    assert_eq!(requests[0].method, HttpMethod::Post);
    assert_eq!(requests[0].url, "http://api.test/auth/login");
    assert_eq!(
        http.last_json(),
        json!({"username": "sam@example.com", "password": "secret"})
    );
}

#[tokio::test]
async fn empty_credentials_never_reach_the_network() {
    let (client, http, _) = setup();

    let error = client.login("", "secret").await.unwrap_err();

    assert!(matches!(error, ApiError::InvalidRequest(_)));
    assert!(http.requests().is_empty());
    let alert = error.to_alert("Login Failed", "Invalid credentials. Please try again.");
    assert_eq!(alert.message, "Please fill in all fields");
    assert_eq!(alert.kind, AlertKind::Warning);
}

#[tokio::test]
async fn register_sends_defaults() {
    let (client, http, _) = setup();
    http.respond(200, json!({"access_token": "jwt", "token_type": "bearer", "goal": "maintain"}));

    let request = RegisterRequest {
        username: "sam".to_string(),
        email: "sam@example.com".to_string(),
        password: "secret".to_string(),
        age: Some(29),
        weight: Some(72),
        height: Some(180),
        ..Default::default()
    };
    client.register(&request).await.unwrap();

    let body = http.last_json();
    assert_eq!(body["diet"], "balanced");
    assert_eq!(body["age"], 29);
}

#[tokio::test]
async fn failed_login_alert_uses_detail() {
    let (client, http, _) = setup();
    http.respond(400, json!({"detail": "Incorrect email or password"}));

    let error = client.login("sam@example.com", "wrong").await.unwrap_err();
    let alert = error.to_alert("Login Failed", "Invalid credentials. Please try again.");

    assert_eq!(alert.title, "Login Failed");
    assert_eq!(alert.message, "Incorrect email or password");
}

#[tokio::test]
async fn update_profile_sends_only_present_fields() {
    let (client, http, store) = setup();
    store.set_secret("userToken", b"jwt").await.unwrap();
    http.respond(200, json!({"id": 1, "username": "sam", "email": "s@e.com", "weight": 70}));

    let profile = client
        .update_profile(&ProfileUpdate {
            weight: Some(70),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(profile.weight, Some(serde_json::Number::from(70_u32)));
    assert_eq!(http.last_json(), json!({"weight": 70}));
    assert_eq!(
        http.requests()[0].header_value("authorization"),
        Some("Bearer jwt")
    );
}

#[tokio::test]
async fn plan_without_profile_yields_detail() {
    let (client, http, _) = setup();
    http.respond(
        400,
        json!({"detail": "Please complete your profile (age, weight, height) before generating a plan"}),
    );

    let error = client.generate_plan().await.unwrap_err();

    assert_eq!(error.status(), Some(400));
    assert!(error.detail().unwrap().contains("complete your profile"));
}

#[tokio::test]
async fn plan_decodes_ai_output() {
    let (client, http, _) = setup();
    http.respond(
        200,
        json!({
            "daily_calories": 2200,
            "bmr": 1700,
            "tdee": 2635.0,
            "goal": "maintain",
            "diet": "keto",
            "meal_plan": [{"day": 1, "breakfast": "Eggs", "lunch": "Steak salad", "dinner": "Salmon"}],
            "workout_routine": [{"day": "Tuesday", "workout": "Strength", "duration": "45 min"}],
            "tips": ["Drink water"],
            "ai_generated": true
        }),
    );

    let plan = client.generate_plan().await.unwrap();

    assert!(plan.ai_generated);
    assert_eq!(plan.meal_plan[0].day, NumberOrText::Number(serde_json::Number::from(1u64)));
    assert_eq!(plan.workout_routine[0].day.to_string(), "Tuesday");
    assert_eq!(plan.tips, vec!["Drink water".to_string()]);
}

#[tokio::test]
async fn track_activity_clamps_duration() {
    let (client, http, _) = setup();
    http.respond(
        200,
        json!({"id": 9, "owner_id": 1, "activity": "Cycling", "duration": 300, "date": "2024-05-01T08:30:00"}),
    );

    let activity = client.track_activity("Cycling", 480).await.unwrap();

    assert_eq!(http.last_json(), json!({"activity": "Cycling", "duration": 300}));
    assert_eq!(activity.duration, 300);
}

#[tokio::test]
async fn track_activity_requires_name_and_duration() {
    let (client, http, _) = setup();

    let error = client.track_activity("Cycling", 0).await.unwrap_err();

    assert_eq!(
        error.to_string(),
        "Please enter both activity name and duration"
    );
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn stats_and_recent_activities() {
    let (client, http, _) = setup();
    http.respond(200, json!({"totalMinutes": 90, "totalActivities": 2, "caloriesBurned": 540, "streak": 1}));
    http.respond(
        200,
        json!([{"id": 1, "owner_id": 1, "activity": "Yoga", "duration": 45, "date": "2024-05-01T07:00:00.123456"}]),
    );

    let stats = client.activity_stats().await.unwrap();
    let recent = client.recent_activities().await.unwrap();

    assert_eq!(stats.total_minutes, 90);
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].activity, "Yoga");
}

#[tokio::test]
async fn meal_upload_then_save() {
    let (client, http, _) = setup();
    http.respond(
        200,
        json!({
            "url": "http://minio/meals/abc.jpg",
            "filename": "abc.jpg",
            "analysis": {"description": "Grilled chicken", "calories": 420}
        }),
    );
    http.respond(
        200,
        json!({
            "id": 4,
            "image_uri": "http://minio/meals/abc.jpg",
            "analysis_data": {"description": "Grilled chicken", "calories": 420},
            "date": "2024-05-01T12:00:00",
            "owner_id": 1
        }),
    );

    let upload = client
        .upload_meal_image("file:///tmp/abc.jpg", Bytes::from_static(b"\xff\xd8\xff"))
        .await
        .unwrap();
    let analysis = match upload.outcome() {
        MealAnalysisOutcome::Structured(map) => map.clone(),
        other => panic!("unexpected outcome: {other:?}"),
    };
    let saved = client
        .save_meal_analysis(Some(&upload.url), analysis)
        .await
        .unwrap();

    let requests = http.requests();
    assert_eq!(requests[0].url, "http://api.test/upload/");
    assert_eq!(requests[0].multipart.as_ref().unwrap().file_name, "meal.jpg");
    assert!(requests[0].header_value("content-type").is_none());
    assert_eq!(
        http.last_json()["image_uri"],
        json!("http://minio/meals/abc.jpg")
    );
    assert_eq!(saved.analysis_data["calories"], 420);
}

#[tokio::test]
async fn chat_sends_trimmed_history() {
    let (client, http, _) = setup();
    http.respond(200, json!({"response": "Aim for 1.6 g/kg."}));

    let history: Vec<ChatTurn> = (0..12).map(|i| ChatTurn::user(format!("m{i}"))).collect();
    let reply = client
        .send_chat_message(" protein? ", &history)
        .await
        .unwrap();

    assert_eq!(reply.response, "Aim for 1.6 g/kg.");
    let body = http.last_json();
    assert_eq!(body["message"], "protein?");
    assert_eq!(body["history"].as_array().unwrap().len(), 10);
    assert_eq!(body["history"][0]["role"], "user");
}

#[tokio::test]
async fn unreachable_backend_maps_to_connection_alert() {
    let (client, http, _) = setup();
    http.fail(BridgeError::ConnectionFailed("No route to host".to_string()));

    let error = client.wellness_score().await.unwrap_err();
    let alert = error.to_alert(
        "Unable to Generate Plan",
        "Something went wrong. Please try again later.",
    );

    assert_eq!(alert.title, "Connection Issue");
    assert!(alert.message.contains("check your internet connection"));
}

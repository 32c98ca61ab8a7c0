use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use uuid::Uuid;

use crate::config::{CachedUser, Config};
use crate::models::user::{LoginPayload, RegisterPayload};
use crate::models::{
    DateRange, Meal, NewWorkout, NutritionLog, NutritionLogInput, NutritionProfile,
    NutritionProfileInput, NutritionStats, NutritionTargets, Program, User, WeightLogEntry,
    Workout, WorkoutFilter, WorkoutStats,
};

mod error;
mod retry;

pub use error::ApiError;
pub use retry::RetryConfig;

/// The `{success, data, message, token, count}` body every endpoint returns.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub token: Option<String>,
    pub count: Option<usize>,
}

impl<T> Envelope<T> {
    fn into_data(self) -> Result<T, ApiError> {
        self.data
            .ok_or_else(|| ApiError::InvalidResponse("response carried no data".to_string()))
    }
}

/// API client for the FitTrack backend.
///
/// Authenticated calls read the token from the shared config. Any 401 on an
/// authenticated call clears the stored token and cached user.
pub struct ApiClient {
    client: Client,
    base_url: String,
    config: Arc<Mutex<Config>>,
    retry_config: RetryConfig,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: Config) -> Result<Self> {
        Self::with_retry_config(config, RetryConfig::default())
    }

    /// Create a new API client with custom retry configuration
    pub fn with_retry_config(config: Config, retry_config: RetryConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.api.timeout_seconds);
        let base_url = config.api.base_url.trim_end_matches('/').to_string();

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            config: Arc::new(Mutex::new(config)),
            retry_config,
        })
    }

    /// Copy of the current config, including any session changes.
    pub fn config(&self) -> Config {
        self.lock_config().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock_config().is_authenticated()
    }

    fn lock_config(&self) -> MutexGuard<'_, Config> {
        self.config.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let config = self.lock_config();
        if !config.is_authenticated() {
            return Err(ApiError::NotLoggedIn);
        }
        Ok(request.bearer_auth(&config.auth.token))
    }

    fn update_config(&self, update: impl FnOnce(&mut Config)) -> Result<(), ApiError> {
        let mut config = self.lock_config();
        update(&mut config);
        config
            .save()
            .map_err(|e| ApiError::LocalConfig(e.to_string()))
    }

    fn forget_session(&self) {
        tracing::debug!("Received 401, clearing stored session");
        if let Err(e) = self.update_config(Config::clear_session) {
            tracing::warn!("{}", e);
        }
    }

    /// Send a request and decode the envelope, mapping failures to `ApiError`.
    async fn dispatch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        authenticated: bool,
    ) -> Result<Envelope<T>, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            return serde_json::from_slice(&body)
                .map_err(|e| ApiError::InvalidResponse(e.to_string()));
        }

        let message = serde_json::from_slice::<Envelope<serde_json::Value>>(&body)
            .ok()
            .and_then(|envelope| envelope.message);

        if status == StatusCode::UNAUTHORIZED && authenticated {
            self.forget_session();
            return Err(ApiError::SessionExpired(
                message.unwrap_or_else(|| "Not authorized".to_string()),
            ));
        }

        Err(ApiError::from_status(status, message))
    }

    async fn get<T, Q>(&self, path: &str, query: &Q) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.url(path);
        let url = url.as_str();
        self.retry_config
            .execute(|| async move {
                let request = self.authorize(self.client.get(url).query(query))?;
                self.dispatch(request, true).await
            })
            .await
    }

    async fn post<T, B>(&self, path: &str, body: &B) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.authorize(self.client.post(self.url(path)).json(body))?;
        self.dispatch(request, true).await
    }

    async fn put<T, B>(&self, path: &str, body: &B) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.authorize(self.client.put(self.url(path)).json(body))?;
        self.dispatch(request, true).await
    }

    /// Delete a resource and return the server's confirmation message.
    async fn delete(&self, path: &str) -> Result<String, ApiError> {
        let request = self.authorize(self.client.delete(self.url(path)))?;
        let envelope: Envelope<serde_json::Value> = self.dispatch(request, true).await?;
        Ok(envelope.message.unwrap_or_else(|| "Deleted".to_string()))
    }

    /// Store the token and user from a register/login response.
    fn start_session(&self, envelope: Envelope<User>) -> Result<User, ApiError> {
        let token = envelope
            .token
            .clone()
            .ok_or_else(|| ApiError::InvalidResponse("response carried no token".to_string()))?;
        let user = envelope.into_data()?;

        let cached = CachedUser::from(&user);
        self.update_config(|config| config.set_session(token, cached))?;

        tracing::info!("Signed in as {}", user.email);
        Ok(user)
    }

    // Auth

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, ApiError> {
        let payload = RegisterPayload {
            name,
            email,
            password,
        };
        let request = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&payload);
        let envelope = self.dispatch(request, false).await?;
        self.start_session(envelope)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        tracing::debug!("Logging in as {}", email);

        let payload = LoginPayload { email, password };
        let request = self.client.post(self.url("/api/auth/login")).json(&payload);
        let envelope = self.dispatch(request, false).await?;
        self.start_session(envelope)
    }

    /// Tell the server and drop the local session. The local session is
    /// cleared even if the server cannot be reached.
    pub async fn logout(&self) -> Result<(), ApiError> {
        if self.is_authenticated() {
            let result: Result<Envelope<serde_json::Value>, ApiError> =
                self.post("/api/auth/logout", &serde_json::json!({})).await;
            if let Err(e) = result {
                tracing::debug!("Server logout failed: {}", e);
            }
        }
        self.update_config(Config::clear_session)
    }

    /// Fetch the current user and refresh the cached copy.
    pub async fn me(&self) -> Result<User, ApiError> {
        let user = self.get::<User, _>("/api/auth/me", &()).await?.into_data()?;
        let cached = CachedUser::from(&user);
        self.update_config(|config| config.user = Some(cached))?;
        Ok(user)
    }

    // Workouts

    pub async fn list_workouts(&self, filter: &WorkoutFilter) -> Result<Vec<Workout>, ApiError> {
        self.get("/api/workouts", filter).await?.into_data()
    }

    pub async fn get_workout(&self, id: Uuid) -> Result<Workout, ApiError> {
        self.get(&format!("/api/workouts/{id}"), &()).await?.into_data()
    }

    pub async fn create_workout(&self, workout: &NewWorkout) -> Result<Workout, ApiError> {
        self.post("/api/workouts", workout).await?.into_data()
    }

    pub async fn delete_workout(&self, id: Uuid) -> Result<String, ApiError> {
        self.delete(&format!("/api/workouts/{id}")).await
    }

    pub async fn workout_stats(&self, range: DateRange) -> Result<WorkoutStats, ApiError> {
        self.get("/api/workouts/stats", &range).await?.into_data()
    }

    // Programs

    pub async fn list_programs(&self) -> Result<Vec<Program>, ApiError> {
        self.get("/api/programs", &()).await?.into_data()
    }

    pub async fn get_program(&self, id: Uuid) -> Result<Program, ApiError> {
        self.get(&format!("/api/programs/{id}"), &()).await?.into_data()
    }

    /// The active program, or `None` when no program is active.
    pub async fn active_program(&self) -> Result<Option<Program>, ApiError> {
        match self.get::<Program, _>("/api/programs/active", &()).await {
            Ok(envelope) => envelope.into_data().map(Some),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn create_program(&self, program: &serde_json::Value) -> Result<Program, ApiError> {
        self.post("/api/programs", program).await?.into_data()
    }

    pub async fn activate_program(&self, id: Uuid) -> Result<Program, ApiError> {
        self.put(&format!("/api/programs/{id}/activate"), &serde_json::json!({}))
            .await?
            .into_data()
    }

    pub async fn delete_program(&self, id: Uuid) -> Result<String, ApiError> {
        self.delete(&format!("/api/programs/{id}")).await
    }

    // Nutrition

    pub async fn list_nutrition_logs(&self, range: DateRange) -> Result<Vec<NutritionLog>, ApiError> {
        self.get("/api/nutrition", &range).await?.into_data()
    }

    pub async fn get_nutrition_log(&self, date: NaiveDate) -> Result<NutritionLog, ApiError> {
        self.get(&format!("/api/nutrition/{date}"), &()).await?.into_data()
    }

    /// Create or replace the log for `input.date`.
    pub async fn save_nutrition_log(&self, input: &NutritionLogInput) -> Result<NutritionLog, ApiError> {
        self.post("/api/nutrition", input).await?.into_data()
    }

    pub async fn add_meal(&self, date: NaiveDate, meal: &Meal) -> Result<NutritionLog, ApiError> {
        self.put(&format!("/api/nutrition/{date}/meals"), meal)
            .await?
            .into_data()
    }

    pub async fn delete_nutrition_log(&self, date: NaiveDate) -> Result<String, ApiError> {
        self.delete(&format!("/api/nutrition/{date}")).await
    }

    pub async fn weight_logs(&self) -> Result<Vec<WeightLogEntry>, ApiError> {
        self.get("/api/nutrition/weight-logs", &()).await?.into_data()
    }

    pub async fn nutrition_stats(&self, range: DateRange) -> Result<NutritionStats, ApiError> {
        self.get("/api/nutrition/stats", &range).await?.into_data()
    }

    /// The nutrition profile, or `None` when none has been set up.
    pub async fn nutrition_profile(&self) -> Result<Option<NutritionProfile>, ApiError> {
        match self.get::<NutritionProfile, _>("/api/nutrition/profile", &()).await {
            Ok(envelope) => envelope.into_data().map(Some),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn save_nutrition_profile(
        &self,
        input: &NutritionProfileInput,
    ) -> Result<NutritionProfile, ApiError> {
        self.post("/api/nutrition/profile", input).await?.into_data()
    }

    pub async fn nutrition_targets(&self) -> Result<NutritionTargets, ApiError> {
        self.get("/api/nutrition/profile/targets", &()).await?.into_data()
    }
}

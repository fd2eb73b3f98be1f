//! Typed client for the CareFlow REST API.
//!
//! | Area | Endpoints |
//! |------|-----------|
//! | Health | `GET /health` |
//! | Auth | `POST /api/auth/{signup,login,logout}`, `GET /api/auth/me` |
//! | Appointments | `GET/POST /api/appointments`, `PUT/DELETE /api/appointments/{id}`, `POST /api/appointments/{id}/comments` |
//! | Users | `GET/POST /api/users` |
//! | AI | `POST /api/ai/nurse/analyze-report`, `POST /api/ai/nurse/chat`, `POST /api/ai/tutor/search`, `GET /api/ai/tutor/popular-terms` |
//!
//! Every call is a single attempt. Calls that need a session check for a
//! token first and return [`ApiError::Unauthenticated`] without touching the
//! network when there is none.

use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::auth::AuthState;
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::schema::{
    Acknowledgement, Appointment, AppointmentFilter, AppointmentUpdate, ChatRequest, ChatResponse,
    Comment, HealthStatus, LoginRequest, NewAppointment, NewComment, NewUser, PopularTerms,
    ReportAnalysis, ReportUpload, Role, SignupRequest, TermDefinition, TermSearchRequest,
    TokenResponse, User, Validate,
};

#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ClientConfig,
    http: reqwest::Client,
    auth: AuthState,
}

impl ApiClient {
    pub fn new(config: ClientConfig, auth: AuthState) -> ApiResult<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http, auth })
    }

    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.config.url(path))
    }

    async fn authed(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let token = self.auth.token().await.ok_or(ApiError::Unauthenticated)?;
        Ok(self.request(method, path).bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = ApiError::from_response(status.as_u16(), &body);
            debug!(status = status.as_u16(), error = %err, "request rejected");
            return Err(err);
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn authed_json<B, T>(&self, method: Method, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + Validate,
        T: DeserializeOwned,
    {
        body.validate()?;
        let request = self.authed(method, path).await?.json(body);
        self.send(request).await
    }

    // ── health ──────────────────────────────────────────────────────────

    pub async fn health(&self) -> ApiResult<HealthStatus> {
        self.send(self.request(Method::GET, "/health")).await
    }

    // ── auth ────────────────────────────────────────────────────────────

    pub async fn signup(&self, request: &SignupRequest) -> ApiResult<User> {
        request.validate()?;
        let response: TokenResponse = self
            .send(self.request(Method::POST, "/api/auth/signup").json(request))
            .await?;
        self.store_session(response).await
    }

    pub async fn login(&self, request: &LoginRequest) -> ApiResult<User> {
        request.validate()?;
        let response: TokenResponse = self
            .send(self.request(Method::POST, "/api/auth/login").json(request))
            .await?;
        self.store_session(response).await
    }

    async fn store_session(&self, response: TokenResponse) -> ApiResult<User> {
        let user = response.user;
        self.auth
            .set_session(response.access_token, user.clone())
            .await?;
        info!(user = %user.email, role = %user.role, "session started");
        Ok(user)
    }

    /// Tell the server, then drop the local session whatever it said.
    pub async fn logout(&self) -> ApiResult<()> {
        let outcome = match self.authed(Method::POST, "/api/auth/logout").await {
            Ok(request) => self.send::<Acknowledgement>(request).await.map(|_| ()),
            Err(e) => Err(e),
        };
        if let Err(e) = &outcome {
            warn!(error = %e, "logout request failed; clearing local session anyway");
        }
        self.auth.clear().await?;
        outcome
    }

    pub async fn current_user(&self) -> ApiResult<User> {
        let user: User = self.send(self.authed(Method::GET, "/api/auth/me").await?).await?;
        self.auth.set_user(user.clone()).await;
        Ok(user)
    }

    /// Validate a stored token against `/api/auth/me`.
    ///
    /// A token the server rejects (or answers with garbage) is cleared and
    /// `Ok(None)` returned. Transport failures are returned as errors and
    /// leave the token in place.
    pub async fn restore_session(&self) -> ApiResult<Option<User>> {
        if !self.auth.is_authenticated().await {
            return Ok(None);
        }
        match self.current_user().await {
            Ok(user) => Ok(Some(user)),
            Err(e @ (ApiError::Status { .. } | ApiError::Decode(_))) => {
                warn!(error = %e, "stored token rejected; clearing");
                self.auth.clear().await?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    // ── appointments ────────────────────────────────────────────────────

    pub async fn list_appointments(
        &self,
        filter: &AppointmentFilter,
    ) -> ApiResult<Vec<Appointment>> {
        let request = self
            .authed(Method::GET, "/api/appointments")
            .await?
            .query(&filter.query_pairs());
        self.send(request).await
    }

    pub async fn create_appointment(&self, appointment: &NewAppointment) -> ApiResult<Appointment> {
        self.authed_json(Method::POST, "/api/appointments", appointment).await
    }

    pub async fn update_appointment(
        &self,
        id: &str,
        update: &AppointmentUpdate,
    ) -> ApiResult<Appointment> {
        let path = appointment_path(id)?;
        self.authed_json(Method::PUT, &path, update).await
    }

    pub async fn cancel_appointment(&self, id: &str) -> ApiResult<Appointment> {
        self.update_appointment(id, &AppointmentUpdate::cancel()).await
    }

    pub async fn delete_appointment(&self, id: &str) -> ApiResult<Acknowledgement> {
        let path = appointment_path(id)?;
        self.send(self.authed(Method::DELETE, &path).await?).await
    }

    pub async fn add_comment(&self, id: &str, comment: &NewComment) -> ApiResult<Comment> {
        let path = format!("{}/comments", appointment_path(id)?);
        self.authed_json(Method::POST, &path, comment).await
    }

    // ── users ───────────────────────────────────────────────────────────

    pub async fn list_users(&self, role: Option<Role>) -> ApiResult<Vec<User>> {
        let mut request = self.authed(Method::GET, "/api/users").await?;
        if let Some(role) = role {
            request = request.query(&[("role", role.as_str())]);
        }
        self.send(request).await
    }

    pub async fn create_user(&self, user: &NewUser) -> ApiResult<User> {
        self.authed_json(Method::POST, "/api/users", user).await
    }

    // ── AI assist ───────────────────────────────────────────────────────

    pub async fn analyze_report(&self, upload: &ReportUpload) -> ApiResult<ReportAnalysis> {
        upload.validate()?;
        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(upload.kind.mime())?;
        let request = self
            .authed(Method::POST, "/api/ai/nurse/analyze-report")
            .await?
            .multipart(Form::new().part("file", part));
        info!(file = %upload.file_name, bytes = upload.bytes.len(), "uploading report");
        self.send(request).await
    }

    pub async fn nurse_chat(&self, request: &ChatRequest) -> ApiResult<ChatResponse> {
        self.authed_json(Method::POST, "/api/ai/nurse/chat", request).await
    }

    pub async fn search_term(&self, request: &TermSearchRequest) -> ApiResult<TermDefinition> {
        self.authed_json(Method::POST, "/api/ai/tutor/search", request).await
    }

    pub async fn popular_terms(&self) -> ApiResult<PopularTerms> {
        let request = self.authed(Method::GET, "/api/ai/tutor/popular-terms").await?;
        self.send(request).await
    }
}

fn appointment_path(id: &str) -> ApiResult<String> {
    let id = id.trim();
    if id.is_empty() || id.contains('/') {
        return Err(ApiError::validation(format!("invalid appointment id '{id}'")));
    }
    Ok(format!("/api/appointments/{id}"))
}

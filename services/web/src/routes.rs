//! Web service routes

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::{AppError, AppResult},
    header::{HeaderNav, header_nav},
    middleware::session_middleware,
    navigation::{RecordingNavigator, Route},
    models::{
        Account, AuthConflicts, CredentialDraft, Field, IdentityId, ItemId, LikeView,
        SessionContext, ValidationState,
    },
    register::{RegistrationForm, SubmitOutcome},
    state::AppState,
};

/// Response for a registration attempt
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    /// Route the client should move to, if any
    pub redirect: Option<&'static str>,
    pub account: Option<Account>,
    pub validation: ValidationState,
    pub conflicts: AuthConflicts,
    pub messages: Vec<&'static str>,
}

impl RegisterResponse {
    fn from_form(form: &RegistrationForm, redirect: Option<Route>) -> Self {
        Self {
            redirect: redirect.map(Route::path),
            account: None,
            validation: form.validation().clone(),
            conflicts: *form.conflicts(),
            messages: form.messages(),
        }
    }
}

/// Request for user login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for user login
#[derive(Serialize)]
pub struct LoginResponse {
    pub redirect: &'static str,
    pub account: Account,
}

/// Create the router for the web service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/header", get(header))
        .route("/register", post(register))
        .route("/login", post(login))
        .route(
            "/likes/:item_id",
            get(get_likes).put(like).delete(dislike),
        )
        .route("/likes/:item_id/toggle", post(toggle_like))
        .layer(middleware::from_fn(session_middleware))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "web"
    }))
}

/// Header navigation for the caller
pub async fn header(Extension(session): Extension<SessionContext>) -> Json<HeaderNav> {
    Json(header_nav(&session))
}

/// Registration endpoint.
///
/// The submitted values go through the form controller as if typed and
/// blurred field by field; the submit only runs when the form is valid.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CredentialDraft>,
) -> impl IntoResponse {
    info!("Registration request for user: {}", payload.username);

    let mut form = RegistrationForm::new();
    for field in Field::ALL {
        form.on_change(field, payload.get(field).to_string());
        form.on_blur(field);
    }

    if !form.form_valid() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(RegisterResponse::from_form(&form, None)),
        );
    }

    let mut navigator = RecordingNavigator::default();
    let outcome = form
        .submit_with(
            state.directory.as_ref(),
            state.provider.as_ref(),
            &mut navigator,
        )
        .await;

    match outcome {
        SubmitOutcome::Registered(account) => {
            let mut response = RegisterResponse::from_form(&form, navigator.last());
            response.account = Some(account);
            (StatusCode::OK, Json(response))
        }
        SubmitOutcome::Navigate(_) => (
            StatusCode::OK,
            Json(RegisterResponse::from_form(&form, navigator.last())),
        ),
        SubmitOutcome::Stay => {
            let status = if form.conflicts().any() {
                StatusCode::CONFLICT
            } else {
                StatusCode::UNPROCESSABLE_ENTITY
            };
            (status, Json(RegisterResponse::from_form(&form, None)))
        }
    }
}

/// Login endpoint
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let account = state
        .provider
        .sign_in(&payload.email, &payload.password)
        .await?;

    info!("Signed in account {}", account.id);
    Ok(Json(LoginResponse {
        redirect: Route::Home.path(),
        account,
    }))
}

fn viewer(session: &SessionContext) -> AppResult<&IdentityId> {
    session.current_user.as_ref().ok_or(AppError::Unauthorized)
}

/// Likes of an item as seen by the caller
pub async fn get_likes(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(item_id): Path<String>,
) -> AppResult<Json<LikeView>> {
    let viewer = viewer(&session)?;
    let item = ItemId::new(item_id);
    Ok(Json(state.ledger.get_likes(viewer, &item).await?))
}

/// Like an item
pub async fn like(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(item_id): Path<String>,
) -> AppResult<Json<LikeView>> {
    let viewer = viewer(&session)?;
    let item = ItemId::new(item_id);
    state.ledger.like(viewer, &item).await?;
    Ok(Json(state.ledger.get_likes(viewer, &item).await?))
}

/// Remove the caller's like
pub async fn dislike(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(item_id): Path<String>,
) -> AppResult<Json<LikeView>> {
    let viewer = viewer(&session)?;
    let item = ItemId::new(item_id);
    state.ledger.dislike(viewer, &item).await?;
    Ok(Json(state.ledger.get_likes(viewer, &item).await?))
}

/// Flip the caller's like
pub async fn toggle_like(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(item_id): Path<String>,
) -> AppResult<Json<LikeView>> {
    let viewer = viewer(&session)?;
    let item = ItemId::new(item_id);
    Ok(Json(state.ledger.toggle(viewer, &item).await?))
}

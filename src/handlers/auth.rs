// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, extract::ValidJson, i18n::Locale},
    models::auth::{AuthResponse, LoginUserPayload, RegisterUserPayload, UserSummary},
};

// POST /api/user/register
#[utoipa::path(
    post,
    path = "/api/user/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = UserSummary),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Empresa não encontrada"),
        (status = 409, description = "E-mail já cadastrado")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    locale: Locale,
    ValidJson(payload): ValidJson<RegisterUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let user = app_state
        .auth_service
        .register_user(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(UserSummary::from(&user))))
}

// POST /api/user/login
#[utoipa::path(
    post,
    path = "/api/user/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login realizado", body = AuthResponse),
        (status = 401, description = "Senha incorreta"),
        (status = 404, description = "Usuário não encontrado")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    ValidJson(payload): ValidJson<LoginUserPayload>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (token, user) = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(AuthResponse { token, user }))
}

// GET /api/user/me
#[utoipa::path(
    get,
    path = "/api/user/me",
    tag = "Users",
    responses(
        (status = 200, description = "Usuário logado", body = UserSummary),
        (status = 401, description = "Token ausente ou inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> Result<Json<UserSummary>, ApiError> {
    // O token pode ser de um usuário já apagado
    let user = app_state
        .user_service
        .get(claims.user_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(user))
}

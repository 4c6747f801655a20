// src/handlers/users.rs

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        auth::OptionalUser,
        extract::{IdPath, ValidJson},
        i18n::Locale,
    },
    models::auth::{UpdateUserPayload, UserSummary},
};

// GET /api/user
#[utoipa::path(
    get,
    path = "/api/user",
    tag = "Users",
    responses((status = 200, description = "Lista de usuários", body = Vec<UserSummary>))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    let users = app_state
        .user_service
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(users))
}

// GET /api/user/{id}
#[utoipa::path(
    get,
    path = "/api/user/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário", body = UserSummary),
        (status = 404, description = "Usuário não encontrado")
    )
)]
pub async fn get_user(
    State(app_state): State<AppState>,
    locale: Locale,
    IdPath(id): IdPath,
) -> Result<Json<UserSummary>, ApiError> {
    let user = app_state
        .user_service
        .get(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(user))
}

// PUT /api/user/{id}
#[utoipa::path(
    put,
    path = "/api/user/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "ID do usuário")),
    request_body = UpdateUserPayload,
    responses(
        (status = 200, description = "Usuário atualizado", body = UserSummary),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Usuário ou empresa não encontrados"),
        (status = 409, description = "E-mail já cadastrado")
    )
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    locale: Locale,
    IdPath(id): IdPath,
    ValidJson(payload): ValidJson<UpdateUserPayload>,
) -> Result<Json<UserSummary>, ApiError> {
    let user = app_state
        .user_service
        .update(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(user))
}

// DELETE /api/user/{id}
#[utoipa::path(
    delete,
    path = "/api/user/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário apagado"),
        (status = 403, description = "Tentativa de apagar a própria conta"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security((), ("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    locale: Locale,
    OptionalUser(caller): OptionalUser,
    IdPath(id): IdPath,
) -> Result<Json<Value>, ApiError> {
    let deleted = app_state
        .user_service
        .delete(id, caller.as_ref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(json!({ "id": deleted })))
}

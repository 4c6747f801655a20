// src/handlers/feedback.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::{AuthenticatedUser, OptionalUser},
        extract::{IdPath, ValidJson},
        i18n::Locale,
    },
    models::feedback::{
        CreateFeedbackPayload, Feedback, FeedbackDetail, FeedbackFilter, FeedbackQuery,
        UpdateFeedbackPayload, UpdateStatusPayload,
    },
};

// GET /api/feedback?search=&category=&status=&company=
#[utoipa::path(
    get,
    path = "/api/feedback",
    tag = "Feedback",
    params(FeedbackQuery),
    responses(
        (status = 200, description = "Feedbacks filtrados, por id", body = Vec<FeedbackDetail>),
        (status = 400, description = "Filtro inválido")
    )
)]
pub async fn list_feedback(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<FeedbackQuery>,
) -> Result<Json<Vec<FeedbackDetail>>, ApiError> {
    let filter = FeedbackFilter::from_query(query)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let feedbacks = app_state
        .feedback_service
        .list(&filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(feedbacks))
}

// GET /api/feedback/{id}
#[utoipa::path(
    get,
    path = "/api/feedback/{id}",
    tag = "Feedback",
    params(("id" = i32, Path, description = "ID do feedback")),
    responses(
        (status = 200, description = "Feedback", body = FeedbackDetail),
        (status = 404, description = "Feedback não encontrado")
    )
)]
pub async fn get_feedback(
    State(app_state): State<AppState>,
    locale: Locale,
    IdPath(id): IdPath,
) -> Result<Json<FeedbackDetail>, ApiError> {
    let feedback = app_state
        .feedback_service
        .get(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(feedback))
}

// POST /api/feedback
#[utoipa::path(
    post,
    path = "/api/feedback",
    tag = "Feedback",
    request_body = CreateFeedbackPayload,
    responses(
        (status = 201, description = "Feedback criado", body = Feedback),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Usuário, empresa, categoria ou status não encontrado")
    )
)]
pub async fn create_feedback(
    State(app_state): State<AppState>,
    locale: Locale,
    ValidJson(payload): ValidJson<CreateFeedbackPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let feedback = app_state
        .feedback_service
        .create(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(feedback)))
}

// PUT /api/feedback/{id}
#[utoipa::path(
    put,
    path = "/api/feedback/{id}",
    tag = "Feedback",
    params(("id" = i32, Path, description = "ID do feedback")),
    request_body = UpdateFeedbackPayload,
    responses(
        (status = 200, description = "Feedback atualizado", body = Feedback),
        (status = 400, description = "Dados inválidos"),
        (status = 401, description = "Token exigido pela política FEEDBACK_UPDATE_POLICY=restricted"),
        (status = 403, description = "Sem permissão (política restrita)"),
        (status = 404, description = "Feedback, categoria ou status não encontrado")
    ),
    security((), ("api_jwt" = []))
)]
pub async fn update_feedback(
    State(app_state): State<AppState>,
    locale: Locale,
    OptionalUser(caller): OptionalUser,
    IdPath(id): IdPath,
    ValidJson(payload): ValidJson<UpdateFeedbackPayload>,
) -> Result<Json<Feedback>, ApiError> {
    let feedback = app_state
        .feedback_service
        .update(id, &payload, caller.as_ref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(feedback))
}

// PUT /api/feedback/{id}/status
#[utoipa::path(
    put,
    path = "/api/feedback/{id}/status",
    tag = "Feedback",
    params(("id" = i32, Path, description = "ID do feedback")),
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Status alterado", body = FeedbackDetail),
        (status = 400, description = "Dados inválidos"),
        (status = 401, description = "Token ausente ou inválido"),
        (status = 403, description = "Nem autor, nem empresa alvo, nem administrador"),
        (status = 404, description = "Feedback ou status não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_feedback_status(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(claims): AuthenticatedUser,
    IdPath(id): IdPath,
    ValidJson(payload): ValidJson<UpdateStatusPayload>,
) -> Result<Json<FeedbackDetail>, ApiError> {
    let Some(status_id) = payload.status_id else {
        return Err(AppError::InternalServerError(anyhow::anyhow!("status_id ausente após validação"))
            .to_api_error(&locale, &app_state.i18n_store));
    };

    let feedback = app_state
        .feedback_service
        .change_status(id, status_id, &claims)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(feedback))
}

// DELETE /api/feedback/{id}
#[utoipa::path(
    delete,
    path = "/api/feedback/{id}",
    tag = "Feedback",
    params(("id" = i32, Path, description = "ID do feedback")),
    responses(
        (status = 200, description = "Feedback apagado junto com as respostas"),
        (status = 404, description = "Feedback não encontrado")
    )
)]
pub async fn delete_feedback(
    State(app_state): State<AppState>,
    locale: Locale,
    IdPath(id): IdPath,
) -> Result<Json<Value>, ApiError> {
    let deleted = app_state
        .feedback_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(json!({ "id": deleted })))
}

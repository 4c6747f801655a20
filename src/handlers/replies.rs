// src/handlers/replies.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        extract::{IdPath, ValidJson},
        i18n::Locale,
    },
    models::reply::{CreateReplyPayload, Reply},
};

// GET /api/replies/feedback/{id}
#[utoipa::path(
    get,
    path = "/api/replies/feedback/{id}",
    tag = "Replies",
    params(("id" = i32, Path, description = "ID do feedback")),
    responses(
        (status = 200, description = "Respostas, da mais antiga para a mais nova", body = Vec<Reply>),
        (status = 404, description = "Feedback não encontrado")
    )
)]
pub async fn list_replies(
    State(app_state): State<AppState>,
    locale: Locale,
    IdPath(feedback_id): IdPath,
) -> Result<Json<Vec<Reply>>, ApiError> {
    let replies = app_state
        .reply_service
        .list_for_feedback(feedback_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(replies))
}

// POST /api/replies
#[utoipa::path(
    post,
    path = "/api/replies",
    tag = "Replies",
    request_body = CreateReplyPayload,
    responses(
        (status = 201, description = "Resposta criada", body = Reply),
        (status = 400, description = "Dados inválidos"),
        (status = 401, description = "Token ausente ou inválido"),
        (status = 403, description = "Nem autor, nem membro da empresa alvo"),
        (status = 404, description = "Feedback não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_reply(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidJson(payload): ValidJson<CreateReplyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(feedback_id) = payload.feedback_id else {
        return Err(AppError::InternalServerError(anyhow::anyhow!("feedback_id ausente após validação"))
            .to_api_error(&locale, &app_state.i18n_store));
    };

    let reply = app_state
        .reply_service
        .create(&claims, feedback_id, &payload.title, &payload.description)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(reply)))
}

// src/models/reply.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{not_blank, EntityId};

// Resposta a um feedback. Imutável depois de criada.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    #[schema(example = 1)]
    pub id: EntityId,
    #[schema(example = "Obrigado pelo aviso")]
    pub title: String,
    #[schema(example = "Vamos ajustar o horário da fornada.")]
    pub description: String,
    pub feedback_id: EntityId,
    pub user_id: EntityId,
    pub author_email: String,
    pub created_at: DateTime<Utc>,
}

// O autor sai do token, não do corpo
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateReplyPayload {
    #[validate(custom(function = "not_blank"))]
    pub title: String,

    #[validate(custom(function = "not_blank"))]
    pub description: String,

    #[validate(required(message = "required"))]
    pub feedback_id: Option<EntityId>,
}

// src/models/company.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{not_blank, EntityId};

// A empresa que recebe os feedbacks
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[schema(example = 2)]
    pub id: EntityId,

    #[schema(example = "Padaria Central")]
    pub name: String,

    #[schema(example = "contato@padariacentral.com")]
    pub email: String,

    #[schema(example = "12.345.678/0001-99")]
    pub cnpj: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CompanyPayload {
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "Padaria Central")]
    pub name: String,

    #[validate(custom(function = "not_blank"))]
    #[schema(example = "contato@padariacentral.com")]
    pub email: String,

    #[validate(custom(function = "not_blank"))]
    #[schema(example = "12.345.678/0001-99")]
    pub cnpj: String,
}

// src/models/catalog.rs

// Categorias e status: mesmo formato (nome + cor), tabelas diferentes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{not_blank, EntityId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[schema(example = 3)]
    pub id: EntityId,

    #[serde(rename = "typeCategory")]
    #[schema(example = "Bug")]
    pub name: String,

    #[serde(rename = "colorCategory")]
    #[schema(example = "#FF0000")]
    pub color: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryPayload {
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "Bug")]
    pub type_category: String,

    #[validate(custom(function = "not_blank"))]
    #[schema(example = "#FF0000")]
    pub color_category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    #[schema(example = 2)]
    pub id: EntityId,

    #[serde(rename = "typeStatus")]
    #[schema(example = "Em análise")]
    pub name: String,

    #[serde(rename = "colorStatus")]
    #[schema(example = "#FFC107")]
    pub color: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct StatusPayload {
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "Em análise")]
    pub type_status: String,

    #[validate(custom(function = "not_blank"))]
    #[schema(example = "#FFC107")]
    pub color_status: String,
}

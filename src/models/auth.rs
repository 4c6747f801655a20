// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::EntityId;

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(example = 7)]
    pub id: EntityId,

    #[schema(example = "ana@empresa.com")]
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    #[schema(example = 2)]
    pub company_id: Option<EntityId>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// O resumo que vai junto com o token e no /me
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: EntityId,
    pub email: String,
    pub company_id: Option<EntityId>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            company_id: user.company_id,
        }
    }
}

// Dados para registro de um novo usuário
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterUserPayload {
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "ana@empresa.com")]
    pub email: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "segredo123")]
    pub password: String,

    #[schema(example = 2)]
    pub company_id: Option<EntityId>,
}

// Dados para login
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct LoginUserPayload {
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "ana@empresa.com")]
    pub email: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "segredo123")]
    pub password: String,
}

// Atualização de usuário. A senha só é trocada quando enviada.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateUserPayload {
    #[validate(email(message = "invalid_email"))]
    pub email: String,

    #[validate(length(min = 1, message = "required"))]
    pub password: Option<String>,

    pub company_id: Option<EntityId>,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserSummary,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: EntityId,
    pub email: String,
    pub company_id: Option<EntityId>,
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

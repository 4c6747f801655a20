// src/common/error.rs

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

/// Recursos que podem aparecer em erros de "não encontrado" ou de referência.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    User,
    Company,
    Category,
    Status,
    Feedback,
}

impl Resource {
    pub fn code(self) -> &'static str {
        match self {
            Resource::User => "user",
            Resource::Company => "company",
            Resource::Category => "category",
            Resource::Status => "status",
            Resource::Feedback => "feedback",
        }
    }
}

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Filtro inválido: {0}")]
    InvalidFilter(&'static str),

    #[error("Corpo da requisição inválido: {0}")]
    MalformedBody(String),

    #[error("Parâmetro de rota inválido: {0}")]
    InvalidPath(String),

    #[error("Referência inválida: {0}")]
    InvalidReference(String),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token ausente")]
    MissingToken,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    #[error("{} não encontrado", .0.code())]
    NotFound(Resource),

    #[error("{} protegido contra exclusão", .0.code())]
    ProtectedRecord(Resource),

    #[error("{} referenciado por {count} feedback(s)", .resource.code())]
    ReferencedByFeedback { resource: Resource, count: i64 },

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::MalformedBody(_)
            | AppError::InvalidPath(_)
            | AppError::InvalidFilter(_)
            | AppError::InvalidReference(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::MissingToken | AppError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::EmailAlreadyExists
            | AppError::ProtectedRecord(_)
            | AppError::ReferencedByFeedback { .. } => StatusCode::CONFLICT,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converte o erro interno na resposta pública, traduzida para o idioma do cliente.
    pub fn to_api_error(self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let status = self.status_code();
        let lang = locale.0.as_str();

        let (error, details) = match self {
            AppError::ValidationError(errors) => {
                let mut details: HashMap<String, Vec<String>> = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages = field_errors
                        .iter()
                        .map(|e| {
                            let code = e.message.as_deref().unwrap_or(e.code.as_ref());
                            i18n.message(lang, &format!("validation.{}", code), &[])
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                (
                    i18n.message(lang, "validation.invalid_fields", &[]),
                    Some(json!(details)),
                )
            }
            AppError::MalformedBody(reason) => (
                i18n.message(lang, "error.malformed_body", &[]),
                Some(json!({ "reason": reason })),
            ),
            AppError::InvalidPath(reason) => (
                i18n.message(lang, "error.invalid_path", &[]),
                Some(json!({ "reason": reason })),
            ),
            AppError::InvalidFilter(field) => (
                i18n.message(lang, "error.invalid_filter", &[("field", field.to_string())]),
                None,
            ),
            AppError::InvalidReference(constraint) => (
                i18n.message(lang, "error.invalid_reference", &[]),
                Some(json!({ "constraint": constraint })),
            ),
            AppError::EmailAlreadyExists => (i18n.message(lang, "error.email_already_exists", &[]), None),
            AppError::InvalidCredentials => (i18n.message(lang, "error.invalid_credentials", &[]), None),
            AppError::MissingToken => (i18n.message(lang, "error.missing_token", &[]), None),
            AppError::InvalidToken => (i18n.message(lang, "error.invalid_token", &[]), None),
            AppError::Forbidden => (i18n.message(lang, "error.forbidden", &[]), None),
            AppError::NotFound(resource) => (
                i18n.message(lang, &format!("not_found.{}", resource.code()), &[]),
                None,
            ),
            AppError::ProtectedRecord(resource) => (
                i18n.message(lang, &format!("protected.{}", resource.code()), &[]),
                None,
            ),
            AppError::ReferencedByFeedback { resource, count } => (
                i18n.message(
                    lang,
                    &format!("referenced.{}", resource.code()),
                    &[("count", count.to_string())],
                ),
                Some(json!({ "feedbackCount": count })),
            ),
            // O resto vira 500. O detalhe fica só no log.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (i18n.message(lang, "error.internal", &[]), None)
            }
        };

        ApiError { status, error, details }
    }
}

// O erro que efetivamente sai na resposta HTTP
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Payload {
        #[validate(length(min = 1, message = "required"))]
        name: String,
    }

    fn store() -> I18nStore {
        I18nStore::load().unwrap()
    }

    #[test]
    fn taxonomy_maps_to_http_status() {
        assert_eq!(AppError::NotFound(Resource::Category).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::MissingToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::InvalidFilter("category").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::MalformedBody("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidPath("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::ProtectedRecord(Resource::Status).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::ReferencedByFeedback { resource: Resource::Status, count: 2 }.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::DatabaseError(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_errors_carry_translated_details() {
        let errors = Payload { name: String::new() }.validate().unwrap_err();

        let api = AppError::ValidationError(errors).to_api_error(&Locale("pt".into()), &store());

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.error, "Um ou mais campos são inválidos.");
        assert_eq!(api.details.unwrap()["name"][0], "Este campo é obrigatório.");
    }

    #[test]
    fn conflict_reports_the_reference_count() {
        let api = AppError::ReferencedByFeedback { resource: Resource::Category, count: 4 }
            .to_api_error(&Locale("en".into()), &store());

        assert_eq!(api.status, StatusCode::CONFLICT);
        assert!(api.error.contains('4'));
        assert_eq!(api.details.unwrap()["feedbackCount"], 4);
    }

    #[test]
    fn internal_errors_are_opaque() {
        let api = AppError::InternalServerError(anyhow::anyhow!("senha do banco: hunter2"))
            .to_api_error(&Locale("en".into()), &store());

        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.error.contains("hunter2"));
        assert!(api.details.is_none());
    }
}

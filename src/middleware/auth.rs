// src/middleware/auth.rs

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::auth::Claims,
};

/// Lê o token do cabeçalho `Authorization`.
/// `Ok(None)` quando o cabeçalho não veio; erro quando veio mas não é `Bearer`.
fn bearer_token(headers: &HeaderMap) -> Result<Option<String>, AppError> {
    if !headers.contains_key(header::AUTHORIZATION) {
        return Ok(None);
    }

    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|Authorization(bearer)| Some(bearer.token().to_string()))
        .ok_or(AppError::InvalidToken)
}

fn claims_from_headers(app_state: &AppState, headers: &HeaderMap) -> Result<Option<Claims>, AppError> {
    match bearer_token(headers)? {
        Some(token) => app_state.auth_service.validate_token(&token).map(Some),
        None => Ok(None),
    }
}

// O middleware: sem token válido a requisição nem chega ao handler
pub async fn auth_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = claims_from_headers(&app_state, request.headers())
        .and_then(|claims| claims.ok_or(AppError::MissingToken))
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    // Insere a identidade nos "extensions" da requisição
    request.extensions_mut().insert(AuthenticatedUser(claims));
    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(user.clone());
        }

        // Rota montada sem o auth_guard: valida aqui mesmo
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_headers(&parts.headers);

        claims_from_headers(&app_state, &parts.headers)
            .and_then(|claims| claims.ok_or(AppError::MissingToken))
            .map(AuthenticatedUser)
            .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))
    }
}

/// Identidade opcional, para rotas públicas que mudam de comportamento
/// quando o chamador está logado. Token presente mas inválido ainda é 401.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<Claims>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(AuthenticatedUser(claims)) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(OptionalUser(Some(claims.clone())));
        }

        let app_state = AppState::from_ref(state);
        let locale = Locale::from_headers(&parts.headers);

        claims_from_headers(&app_state, &parts.headers)
            .map(OptionalUser)
            .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))
    }
}

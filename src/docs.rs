// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

// Categorias, status e empresas usam os handlers genéricos de `crud`
// (utoipa não documenta funções genéricas); aqui entram só os esquemas.
#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::update_user,
        handlers::users::delete_user,

        // --- Feedback ---
        handlers::feedback::list_feedback,
        handlers::feedback::get_feedback,
        handlers::feedback::create_feedback,
        handlers::feedback::update_feedback,
        handlers::feedback::update_feedback_status,
        handlers::feedback::delete_feedback,

        // --- Replies ---
        handlers::replies::list_replies,
        handlers::replies::create_reply,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::UserSummary,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::UpdateUserPayload,
            models::auth::AuthResponse,

            // --- Catálogos ---
            models::catalog::Category,
            models::catalog::CategoryPayload,
            models::catalog::Status,
            models::catalog::StatusPayload,
            models::company::Company,
            models::company::CompanyPayload,

            // --- Feedback ---
            models::feedback::Feedback,
            models::feedback::FeedbackDetail,
            models::feedback::CreateFeedbackPayload,
            models::feedback::UpdateFeedbackPayload,
            models::feedback::UpdateStatusPayload,

            // --- Replies ---
            models::reply::Reply,
            models::reply::CreateReplyPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Usuários"),
        (name = "Feedback", description = "Feedbacks, filtros e troca de status"),
        (name = "Replies", description = "Respostas aos feedbacks")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

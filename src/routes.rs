// src/routes.rs

use std::time::Duration;

use anyhow::Context;
use axum::{
    http::{
        header::{ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::{AppState, Settings},
    docs::ApiDoc,
    handlers::{self, crud},
    middleware::auth::auth_guard,
    models::{
        catalog::{Category, Status},
        company::Company,
    },
};

fn cors_layer(settings: &Settings) -> anyhow::Result<CorsLayer> {
    let origin = match settings.cors_origin.as_deref() {
        Some(origin) => AllowOrigin::exact(
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("CORS_ORIGIN inválida: {}", origin))?,
        ),
        None => AllowOrigin::any(),
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION, ACCEPT_LANGUAGE])
        .max_age(Duration::from_secs(60 * 60)))
}

/// Monta todas as rotas sob `/api`, mais o Swagger UI.
pub fn build_router(app_state: AppState) -> anyhow::Result<Router> {
    let cors = cors_layer(&app_state.settings)?;

    // Rotas de usuário (públicas, exceto /me)
    let user_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/", get(handlers::users::list_users))
        .route(
            "/{id}",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .merge(
            Router::new()
                .route("/me", get(handlers::auth::get_me))
                .route_layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    auth_guard,
                )),
        );

    let category_routes = Router::new()
        .route("/", get(crud::list::<Category>).post(crud::create::<Category>))
        .route(
            "/{id}",
            get(crud::get::<Category>)
                .put(crud::update::<Category>)
                .delete(crud::delete::<Category>),
        );

    let status_routes = Router::new()
        .route("/", get(crud::list::<Status>).post(crud::create::<Status>))
        .route(
            "/{id}",
            get(crud::get::<Status>)
                .put(crud::update::<Status>)
                .delete(crud::delete::<Status>),
        );

    let company_routes = Router::new()
        .route("/", get(crud::list::<Company>).post(crud::create::<Company>))
        .route(
            "/{id}",
            get(crud::get::<Company>)
                .put(crud::update::<Company>)
                .delete(crud::delete::<Company>),
        );

    // Só a troca de status exige token
    let feedback_routes = Router::new()
        .route(
            "/",
            get(handlers::feedback::list_feedback).post(handlers::feedback::create_feedback),
        )
        .route(
            "/{id}",
            get(handlers::feedback::get_feedback)
                .put(handlers::feedback::update_feedback)
                .delete(handlers::feedback::delete_feedback),
        )
        .merge(
            Router::new()
                .route("/{id}/status", put(handlers::feedback::update_feedback_status))
                .route_layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    auth_guard,
                )),
        );

    let reply_routes = Router::new()
        .route("/feedback/{id}", get(handlers::replies::list_replies))
        .merge(
            Router::new()
                .route("/", post(handlers::replies::create_reply))
                .route_layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    auth_guard,
                )),
        );

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/user", user_routes)
        .nest("/api/category", category_routes)
        .nest("/api/status", status_routes)
        .nest("/api/company", company_routes)
        .nest("/api/feedback", feedback_routes)
        .nest("/api/replies", reply_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .with_state(app_state);

    Ok(app)
}

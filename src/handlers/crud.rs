// src/handlers/crud.rs

// Handlers genéricos para categorias, status e empresas.
// A rota escolhe a entidade: `get(crud::list::<Category>)`.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    common::error::ApiError,
    config::AppState,
    db::{CrudEntity, CrudRepository},
    middleware::{
        extract::{IdPath, ValidJson},
        i18n::Locale,
    },
};

fn repository<T: CrudEntity>(app_state: &AppState) -> CrudRepository<T> {
    CrudRepository::new(app_state.db_pool.clone())
}

pub async fn list<T>(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<Json<Vec<T>>, ApiError>
where
    T: CrudEntity + Serialize,
{
    let rows = repository::<T>(&app_state)
        .list(&app_state.db_pool)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(rows))
}

pub async fn get<T>(
    State(app_state): State<AppState>,
    locale: Locale,
    IdPath(id): IdPath,
) -> Result<Json<T>, ApiError>
where
    T: CrudEntity + Serialize,
{
    let row = repository::<T>(&app_state)
        .get(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(row))
}

pub async fn create<T>(
    State(app_state): State<AppState>,
    locale: Locale,
    ValidJson(payload): ValidJson<T::Fields>,
) -> Result<impl IntoResponse, ApiError>
where
    T: CrudEntity + Serialize,
    T::Fields: DeserializeOwned + Validate,
{
    let row = repository::<T>(&app_state)
        .create(&app_state.db_pool, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update<T>(
    State(app_state): State<AppState>,
    locale: Locale,
    IdPath(id): IdPath,
    ValidJson(payload): ValidJson<T::Fields>,
) -> Result<Json<T>, ApiError>
where
    T: CrudEntity + Serialize,
    T::Fields: DeserializeOwned + Validate,
{
    let row = repository::<T>(&app_state)
        .update(&app_state.db_pool, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(row))
}

// Categorias e status em uso por algum feedback não são apagados (409)
pub async fn delete<T>(
    State(app_state): State<AppState>,
    locale: Locale,
    IdPath(id): IdPath,
) -> Result<Json<Value>, ApiError>
where
    T: CrudEntity,
{
    let deleted = repository::<T>(&app_state)
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::info!("🗑️ {} {} apagado(a).", T::RESOURCE.code(), deleted);

    Ok(Json(json!({ "id": deleted })))
}

// src/models/feedback.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{not_blank, EntityId};
use crate::common::error::AppError;

// Valores que o front manda quando o filtro está em "todos"
pub const ALL_CATEGORIES: &str = "all-categories";
pub const ALL_STATUS: &str = "all-status";
pub const ALL_COMPANIES: &str = "all-companies";

// A linha crua da tabela feedbacks
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    #[schema(example = 10)]
    pub id: EntityId,
    #[schema(example = "Pão veio frio")]
    pub title: String,
    #[schema(example = "Comprei às 7h e o pão já estava frio.")]
    pub description: String,
    pub user_id: EntityId,
    pub company_id: EntityId,
    pub category_id: EntityId,
    pub status_id: EntityId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Feedback com os dados de exibição de categoria, status, empresa e autor
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackDetail {
    pub id: EntityId,
    pub title: String,
    pub description: String,

    pub user_id: EntityId,
    pub user_email: String,

    pub company_id: EntityId,
    pub company_name: String,

    pub category_id: EntityId,
    #[serde(rename = "typeCategory")]
    pub category_name: String,
    #[serde(rename = "colorCategory")]
    pub category_color: String,

    pub status_id: EntityId,
    #[serde(rename = "typeStatus")]
    pub status_name: String,
    #[serde(rename = "colorStatus")]
    pub status_color: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateFeedbackPayload {
    #[validate(custom(function = "not_blank"))]
    pub title: String,

    #[validate(custom(function = "not_blank"))]
    pub description: String,

    #[validate(required(message = "required"))]
    pub user_id: Option<EntityId>,

    #[validate(required(message = "required"))]
    pub company_id: Option<EntityId>,

    #[validate(required(message = "required"))]
    pub category_id: Option<EntityId>,

    // Sem status, o feedback nasce com o status inicial
    pub status_id: Option<EntityId>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateFeedbackPayload {
    #[validate(custom(function = "not_blank"))]
    pub title: String,

    #[validate(custom(function = "not_blank"))]
    pub description: String,

    #[validate(required(message = "required"))]
    pub category_id: Option<EntityId>,

    #[validate(required(message = "required"))]
    pub status_id: Option<EntityId>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateStatusPayload {
    #[validate(required(message = "required"))]
    #[schema(example = 2)]
    pub status_id: Option<EntityId>,
}

// Query string do GET /feedback. Tudo chega como texto por causa dos sentinelas.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeedbackQuery {
    /// Texto procurado no título ou na descrição (sem diferenciar maiúsculas)
    pub search: Option<String>,
    /// Id da categoria ou `all-categories`
    pub category: Option<String>,
    /// Id do status ou `all-status`
    pub status: Option<String>,
    /// Id da empresa alvo ou `all-companies`
    pub company: Option<String>,
}

/// Filtros já normalizados. `None` significa "não filtrar".
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FeedbackFilter {
    pub search: Option<String>,
    pub category_id: Option<EntityId>,
    pub status_id: Option<EntityId>,
    pub company_id: Option<EntityId>,
}

impl FeedbackFilter {
    pub fn from_query(query: FeedbackQuery) -> Result<Self, AppError> {
        let search = query
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            search,
            category_id: parse_id_filter(query.category, ALL_CATEGORIES, "category")?,
            status_id: parse_id_filter(query.status, ALL_STATUS, "status")?,
            company_id: parse_id_filter(query.company, ALL_COMPANIES, "company")?,
        })
    }
}

fn parse_id_filter(
    raw: Option<String>,
    all_sentinel: &str,
    field: &'static str,
) -> Result<Option<EntityId>, AppError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) if value == all_sentinel => Ok(None),
        Some(value) => value
            .parse::<EntityId>()
            .map(Some)
            .map_err(|_| AppError::InvalidFilter(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(search: &str, category: &str, status: &str, company: &str) -> FeedbackQuery {
        let opt = |v: &str| (!v.is_empty()).then(|| v.to_string());
        FeedbackQuery {
            search: opt(search),
            category: opt(category),
            status: opt(status),
            company: opt(company),
        }
    }

    #[test]
    fn sentinels_disable_every_filter() {
        let filter =
            FeedbackFilter::from_query(query("", ALL_CATEGORIES, ALL_STATUS, ALL_COMPANIES)).unwrap();

        assert_eq!(filter, FeedbackFilter::default());
    }

    #[test]
    fn absent_values_disable_filters() {
        let filter = FeedbackFilter::from_query(FeedbackQuery::default()).unwrap();

        assert_eq!(filter, FeedbackFilter::default());
    }

    #[test]
    fn numeric_values_become_exact_filters() {
        let filter = FeedbackFilter::from_query(query("abc", "3", "2", "9")).unwrap();

        assert_eq!(filter.search.as_deref(), Some("abc"));
        assert_eq!(filter.category_id, Some(3));
        assert_eq!(filter.status_id, Some(2));
        assert_eq!(filter.company_id, Some(9));
    }

    #[test]
    fn blank_search_is_ignored() {
        let filter = FeedbackFilter::from_query(query("   ", "", "", "")).unwrap();

        assert!(filter.search.is_none());
    }

    #[test]
    fn sentinel_of_another_filter_is_rejected() {
        let err = FeedbackFilter::from_query(query("", ALL_STATUS, "", "")).unwrap_err();

        assert!(matches!(err, AppError::InvalidFilter("category")));
    }

    #[test]
    fn garbage_id_is_rejected() {
        let err = FeedbackFilter::from_query(query("", "", "", "acme")).unwrap_err();

        assert!(matches!(err, AppError::InvalidFilter("company")));
    }
}

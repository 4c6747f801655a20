// src/db/feedback_repo.rs

use sqlx::{Executor, PgPool, Postgres, QueryBuilder};

use crate::{
    common::error::AppError,
    models::{
        feedback::{Feedback, FeedbackDetail, FeedbackFilter},
        EntityId,
    },
};

// Feedback + nomes e cores para exibição
const DETAIL_SELECT: &str = r#"
    SELECT
        f.id, f.title, f.description,
        f.user_id, u.email AS user_email,
        f.company_id, co.name AS company_name,
        f.category_id, ca.name AS category_name, ca.color AS category_color,
        f.status_id, s.name AS status_name, s.color AS status_color,
        f.created_at, f.updated_at
    FROM feedbacks f
    INNER JOIN users u ON u.id = f.user_id
    INNER JOIN companies co ON co.id = f.company_id
    INNER JOIN categories ca ON ca.id = f.category_id
    INNER JOIN statuses s ON s.id = f.status_id
"#;

#[derive(Clone)]
pub struct FeedbackRepository {
    pool: PgPool,
}

impl FeedbackRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Listagem com os filtros combinados por AND, ordenada por id.
    pub async fn list_details(&self, filter: &FeedbackFilter) -> Result<Vec<FeedbackDetail>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(DETAIL_SELECT);
        builder.push(" WHERE TRUE");

        if let Some(term) = &filter.search {
            // strpos evita ter que escapar % e _ do termo
            builder
                .push(" AND (strpos(lower(f.title), lower(")
                .push_bind(term.clone())
                .push(")) > 0 OR strpos(lower(f.description), lower(")
                .push_bind(term.clone())
                .push(")) > 0)");
        }
        if let Some(category_id) = filter.category_id {
            builder.push(" AND f.category_id = ").push_bind(category_id);
        }
        if let Some(status_id) = filter.status_id {
            builder.push(" AND f.status_id = ").push_bind(status_id);
        }
        if let Some(company_id) = filter.company_id {
            builder.push(" AND f.company_id = ").push_bind(company_id);
        }

        builder.push(" ORDER BY f.id ASC");

        let feedbacks = builder
            .build_query_as::<FeedbackDetail>()
            .fetch_all(&self.pool)
            .await?;

        Ok(feedbacks)
    }

    pub async fn find_detail<'e, E>(
        &self,
        executor: E,
        id: EntityId,
    ) -> Result<Option<FeedbackDetail>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{} WHERE f.id = $1", DETAIL_SELECT);
        let detail = sqlx::query_as::<_, FeedbackDetail>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(detail)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: EntityId,
        status_id: EntityId,
    ) -> Result<Feedback, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let feedback = sqlx::query_as::<_, Feedback>(
            r#"
            UPDATE feedbacks
            SET status_id = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status_id)
        .fetch_one(executor)
        .await?;

        Ok(feedback)
    }
}

// src/db/reply_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::{reply::Reply, EntityId},
};

#[derive(Clone)]
pub struct ReplyRepository {
    pool: PgPool,
}

impl ReplyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        feedback_id: EntityId,
        user_id: EntityId,
        title: &str,
        description: &str,
    ) -> Result<Reply, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let reply = sqlx::query_as::<_, Reply>(
            r#"
            WITH inserted AS (
                INSERT INTO replies (feedback_id, user_id, title, description)
                VALUES ($1, $2, $3, $4)
                RETURNING *
            )
            SELECT
                i.id, i.title, i.description, i.feedback_id, i.user_id,
                u.email AS author_email, i.created_at
            FROM inserted i
            INNER JOIN users u ON u.id = i.user_id
            "#,
        )
        .bind(feedback_id)
        .bind(user_id)
        .bind(title)
        .bind(description)
        .fetch_one(executor)
        .await?;

        Ok(reply)
    }

    /// Respostas de um feedback, da mais antiga para a mais nova.
    pub async fn list_by_feedback(&self, feedback_id: EntityId) -> Result<Vec<Reply>, AppError> {
        let replies = sqlx::query_as::<_, Reply>(
            r#"
            SELECT
                r.id, r.title, r.description, r.feedback_id, r.user_id,
                u.email AS author_email, r.created_at
            FROM replies r
            INNER JOIN users u ON u.id = r.user_id
            WHERE r.feedback_id = $1
            ORDER BY r.created_at ASC, r.id ASC
            "#,
        )
        .bind(feedback_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(replies)
    }
}

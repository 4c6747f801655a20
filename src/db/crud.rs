// src/db/crud.rs

// Repositório genérico: o mesmo conjunto de operações para todas as tabelas
// simples. Cada entidade descreve sua tabela via `CrudEntity`.

use std::marker::PhantomData;

use sqlx::{postgres::PgRow, Executor, FromRow, PgPool, Postgres, QueryBuilder};

use crate::{
    common::{
        db_utils::map_constraint_violation,
        error::{AppError, Resource},
    },
    models::{
        auth::User,
        catalog::{Category, CategoryPayload, Status, StatusPayload},
        company::{Company, CompanyPayload},
        feedback::Feedback,
        EntityId, INITIAL_STATUS_ID,
    },
};

/// Valor gravável de uma coluna.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Id(EntityId),
    OptionalId(Option<EntityId>),
}

impl FieldValue {
    fn push_to(self, builder: &mut QueryBuilder<'static, Postgres>) {
        match self {
            FieldValue::Text(v) => builder.push_bind(v),
            FieldValue::Id(v) => builder.push_bind(v),
            FieldValue::OptionalId(v) => builder.push_bind(v),
        };
    }
}

pub trait CrudEntity: for<'r> FromRow<'r, PgRow> + Send + Unpin + 'static {
    const TABLE: &'static str;
    const RESOURCE: Resource;

    /// Coluna de `feedbacks` que aponta para esta entidade.
    /// Quando definida, o delete só acontece se nenhum feedback a usa.
    const FEEDBACK_REFERENCE: Option<&'static str> = None;

    /// Registros que o sistema assume existirem; nunca são excluídos.
    const PROTECTED_IDS: &'static [EntityId] = &[];

    type Fields: Send + Sync;

    /// Pares (coluna, valor), na ordem em que serão gravados.
    fn field_values(fields: &Self::Fields) -> Vec<(&'static str, FieldValue)>;
}

pub struct CrudRepository<T> {
    pool: PgPool,
    _entity: PhantomData<fn() -> T>,
}

// derive(Clone) exigiria T: Clone
impl<T> Clone for CrudRepository<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: CrudEntity> CrudRepository<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<T>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT * FROM {} ORDER BY id ASC", T::TABLE);
        let rows = sqlx::query_as::<_, T>(&sql).fetch_all(executor).await?;
        Ok(rows)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: EntityId) -> Result<Option<T>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT * FROM {} WHERE id = $1", T::TABLE);
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row)
    }

    /// Igual ao `find_by_id`, mas já falha com `NotFound`.
    pub async fn get<'e, E>(&self, executor: E, id: EntityId) -> Result<T, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.find_by_id(executor, id)
            .await?
            .ok_or(AppError::NotFound(T::RESOURCE))
    }

    /// Busca a linha travando-a até o fim da transação (`FOR UPDATE`).
    pub async fn lock_by_id<'e, E>(&self, executor: E, id: EntityId) -> Result<T, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT * FROM {} WHERE id = $1 FOR UPDATE", T::TABLE);
        sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::NotFound(T::RESOURCE))
    }

    pub async fn create<'e, E>(&self, executor: E, fields: &T::Fields) -> Result<T, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let values = T::field_values(fields);

        let mut builder = QueryBuilder::new(format!("INSERT INTO {} (", T::TABLE));
        builder.push(
            values
                .iter()
                .map(|(column, _)| *column)
                .collect::<Vec<_>>()
                .join(", "),
        );
        builder.push(") VALUES (");
        for (i, (_, value)) in values.into_iter().enumerate() {
            if i > 0 {
                builder.push(", ");
            }
            value.push_to(&mut builder);
        }
        builder.push(") RETURNING *");

        builder
            .build_query_as::<T>()
            .fetch_one(executor)
            .await
            .map_err(map_constraint_violation)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: EntityId,
        fields: &T::Fields,
    ) -> Result<T, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut builder = QueryBuilder::new(format!("UPDATE {} SET ", T::TABLE));
        for (column, value) in T::field_values(fields) {
            builder.push(column).push(" = ");
            value.push_to(&mut builder);
            builder.push(", ");
        }
        builder.push("updated_at = NOW() WHERE id = ");
        builder.push_bind(id);
        builder.push(" RETURNING *");

        builder
            .build_query_as::<T>()
            .fetch_optional(executor)
            .await
            .map_err(map_constraint_violation)?
            .ok_or(AppError::NotFound(T::RESOURCE))
    }

    /// Apaga a linha e devolve o id apagado.
    /// Trava a linha antes de contar as referências, assim um feedback
    /// inserido em paralelo não escapa da verificação.
    pub async fn delete(&self, id: EntityId) -> Result<EntityId, AppError> {
        if T::PROTECTED_IDS.contains(&id) {
            return Err(AppError::ProtectedRecord(T::RESOURCE));
        }

        let mut tx = self.pool.begin().await?;

        self.lock_by_id(&mut *tx, id).await?;

        if let Some(column) = T::FEEDBACK_REFERENCE {
            let sql = format!("SELECT COUNT(*) FROM feedbacks WHERE {} = $1", column);
            let count: i64 = sqlx::query_scalar::<_, i64>(&sql).bind(id).fetch_one(&mut *tx).await?;

            if count > 0 {
                return Err(AppError::ReferencedByFeedback {
                    resource: T::RESOURCE,
                    count,
                });
            }
        }

        let sql = format!("DELETE FROM {} WHERE id = $1", T::TABLE);
        sqlx::query(&sql)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_constraint_violation)?;

        tx.commit().await?;
        Ok(id)
    }
}

// =============================================================================
//  ESQUEMAS DAS ENTIDADES
// =============================================================================

impl CrudEntity for Category {
    const TABLE: &'static str = "categories";
    const RESOURCE: Resource = Resource::Category;
    const FEEDBACK_REFERENCE: Option<&'static str> = Some("category_id");

    type Fields = CategoryPayload;

    fn field_values(fields: &Self::Fields) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("name", FieldValue::Text(fields.type_category.clone())),
            ("color", FieldValue::Text(fields.color_category.clone())),
        ]
    }
}

impl CrudEntity for Status {
    const TABLE: &'static str = "statuses";
    const RESOURCE: Resource = Resource::Status;
    const FEEDBACK_REFERENCE: Option<&'static str> = Some("status_id");
    const PROTECTED_IDS: &'static [EntityId] = &[INITIAL_STATUS_ID];

    type Fields = StatusPayload;

    fn field_values(fields: &Self::Fields) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("name", FieldValue::Text(fields.type_status.clone())),
            ("color", FieldValue::Text(fields.color_status.clone())),
        ]
    }
}

// TODO: empresas ainda são apagadas sem checar feedbacks (cascata no banco)
impl CrudEntity for Company {
    const TABLE: &'static str = "companies";
    const RESOURCE: Resource = Resource::Company;

    type Fields = CompanyPayload;

    fn field_values(fields: &Self::Fields) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("name", FieldValue::Text(fields.name.clone())),
            ("email", FieldValue::Text(fields.email.clone())),
            ("cnpj", FieldValue::Text(fields.cnpj.clone())),
        ]
    }
}

/// Colunas graváveis de `users`. A senha já chega com hash.
#[derive(Debug, Clone)]
pub struct UserFields {
    pub email: String,
    pub password_hash: String,
    pub company_id: Option<EntityId>,
}

impl CrudEntity for User {
    const TABLE: &'static str = "users";
    const RESOURCE: Resource = Resource::User;

    type Fields = UserFields;

    fn field_values(fields: &Self::Fields) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("email", FieldValue::Text(fields.email.clone())),
            ("password_hash", FieldValue::Text(fields.password_hash.clone())),
            ("company_id", FieldValue::OptionalId(fields.company_id)),
        ]
    }
}

/// Colunas graváveis de `feedbacks`.
#[derive(Debug, Clone)]
pub struct FeedbackFields {
    pub title: String,
    pub description: String,
    pub user_id: EntityId,
    pub company_id: EntityId,
    pub category_id: EntityId,
    pub status_id: EntityId,
}

impl CrudEntity for Feedback {
    const TABLE: &'static str = "feedbacks";
    const RESOURCE: Resource = Resource::Feedback;

    type Fields = FeedbackFields;

    fn field_values(fields: &Self::Fields) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("title", FieldValue::Text(fields.title.clone())),
            ("description", FieldValue::Text(fields.description.clone())),
            ("user_id", FieldValue::Id(fields.user_id)),
            ("company_id", FieldValue::Id(fields.company_id)),
            ("category_id", FieldValue::Id(fields.category_id)),
            ("status_id", FieldValue::Id(fields.status_id)),
        ]
    }
}

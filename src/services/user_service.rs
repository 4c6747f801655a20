// src/services/user_service.rs

use sqlx::PgPool;

use crate::{
    common::error::{AppError, Resource},
    db::{CrudRepository, UserFields},
    models::{
        auth::{Claims, UpdateUserPayload, User, UserSummary},
        company::Company,
        EntityId,
    },
    services::auth::hash_password,
};

#[derive(Clone)]
pub struct UserService {
    users: CrudRepository<User>,
    companies: CrudRepository<Company>,
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: CrudRepository::new(pool.clone()),
            companies: CrudRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn list(&self) -> Result<Vec<UserSummary>, AppError> {
        let users = self.users.list(&self.pool).await?;
        Ok(users.iter().map(UserSummary::from).collect())
    }

    pub async fn get(&self, id: EntityId) -> Result<UserSummary, AppError> {
        let user = self.users.get(&self.pool, id).await?;
        Ok(UserSummary::from(&user))
    }

    /// Substitui e-mail e empresa. A senha só muda quando uma nova é enviada.
    pub async fn update(
        &self,
        id: EntityId,
        payload: &UpdateUserPayload,
    ) -> Result<UserSummary, AppError> {
        let new_hash = match payload.password.as_deref() {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };

        let mut tx = self.pool.begin().await?;

        let current = self.users.lock_by_id(&mut *tx, id).await?;

        if let Some(company_id) = payload.company_id {
            self.companies
                .find_by_id(&mut *tx, company_id)
                .await?
                .ok_or(AppError::NotFound(Resource::Company))?;
        }

        let fields = UserFields {
            email: payload.email.clone(),
            password_hash: new_hash.unwrap_or(current.password_hash),
            company_id: payload.company_id,
        };
        let updated = self.users.update(&mut *tx, id, &fields).await?;

        tx.commit().await?;
        Ok(UserSummary::from(&updated))
    }

    /// Ninguém apaga a própria conta enquanto está logado com ela.
    pub async fn delete(&self, id: EntityId, caller: Option<&Claims>) -> Result<EntityId, AppError> {
        if caller.is_some_and(|claims| claims.user_id == id) {
            tracing::warn!("⛔ Usuário {} tentou apagar a própria conta.", id);
            return Err(AppError::Forbidden);
        }

        self.users.delete(id).await
    }
}

// src/services/reply_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{CrudRepository, ReplyRepository},
    models::{
        auth::{Claims, User},
        feedback::Feedback,
        reply::Reply,
        EntityId,
    },
    services::authorization::{can_reply, Actor, AuthorizationPolicy, FeedbackOwnership},
};

#[derive(Clone)]
pub struct ReplyService {
    repo: ReplyRepository,
    feedbacks: CrudRepository<Feedback>,
    users: CrudRepository<User>,
    policy: AuthorizationPolicy,
    pool: PgPool,
}

impl ReplyService {
    pub fn new(pool: PgPool, policy: AuthorizationPolicy) -> Self {
        Self {
            repo: ReplyRepository::new(pool.clone()),
            feedbacks: CrudRepository::new(pool.clone()),
            users: CrudRepository::new(pool.clone()),
            policy,
            pool,
        }
    }

    pub async fn list_for_feedback(&self, feedback_id: EntityId) -> Result<Vec<Reply>, AppError> {
        self.feedbacks.get(&self.pool, feedback_id).await?;
        self.repo.list_by_feedback(feedback_id).await
    }

    pub async fn create(
        &self,
        claims: &Claims,
        feedback_id: EntityId,
        title: &str,
        description: &str,
    ) -> Result<Reply, AppError> {
        let mut tx = self.pool.begin().await?;

        let feedback = self.feedbacks.lock_by_id(&mut *tx, feedback_id).await?;

        // A empresa de quem responde vem do cadastro, não do token.
        // Token de usuário que já não existe é tratado como inválido.
        let author = self
            .users
            .find_by_id(&mut *tx, claims.user_id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        let actor = Actor::from(&author);
        if !can_reply(&actor, &FeedbackOwnership::from(&feedback), &self.policy) {
            tracing::warn!(
                "⛔ Usuário {} sem permissão para responder o feedback {}.",
                author.id,
                feedback.id
            );
            return Err(AppError::Forbidden);
        }

        let reply = self
            .repo
            .create(&mut *tx, feedback.id, author.id, title, description)
            .await?;

        tx.commit().await?;
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::error::Resource,
        db::{FeedbackFields, UserFields},
        models::{catalog::{Category, CategoryPayload}, company::{Company, CompanyPayload}},
    };

    struct Fixture {
        service: ReplyService,
        author: User,
        staff: User,
        outsider: User,
        admin: User,
        feedback: Feedback,
    }

    async fn user(pool: &PgPool, email: &str, company_id: Option<EntityId>) -> Result<User, AppError> {
        CrudRepository::<User>::new(pool.clone())
            .create(
                pool,
                &UserFields { email: email.into(), password_hash: "x".into(), company_id },
            )
            .await
    }

    async fn fixture(pool: &PgPool, policy: AuthorizationPolicy) -> Result<Fixture, AppError> {
        let companies = CrudRepository::<Company>::new(pool.clone());
        let target = companies
            .create(pool, &CompanyPayload { name: "Alvo".into(), email: "a@a.com".into(), cnpj: "1".into() })
            .await?;
        let other = companies
            .create(pool, &CompanyPayload { name: "Outra".into(), email: "o@o.com".into(), cnpj: "2".into() })
            .await?;
        let category = CrudRepository::<Category>::new(pool.clone())
            .create(pool, &CategoryPayload { type_category: "Bug".into(), color_category: "#F00".into() })
            .await?;

        let author = user(pool, "autor@x.com", Some(other.id)).await?;
        let staff = user(pool, "staff@alvo.com", Some(target.id)).await?;
        let outsider = user(pool, "fora@x.com", Some(other.id)).await?;
        let admin = user(pool, "admin@echobox.app", Some(1)).await?;

        let feedback = CrudRepository::<Feedback>::new(pool.clone())
            .create(
                pool,
                &FeedbackFields {
                    title: "t".into(),
                    description: "d".into(),
                    user_id: author.id,
                    company_id: target.id,
                    category_id: category.id,
                    status_id: 1,
                },
            )
            .await?;

        Ok(Fixture {
            service: ReplyService::new(pool.clone(), policy),
            author,
            staff,
            outsider,
            admin,
            feedback,
        })
    }

    fn claims_for(user: &User, company_id: Option<EntityId>) -> Claims {
        Claims { user_id: user.id, email: user.email.clone(), company_id, exp: 0, iat: 0 }
    }

    #[sqlx::test]
    #[ignore = "requer PostgreSQL (DATABASE_URL)"]
    async fn replies_are_listed_oldest_first(pool: PgPool) -> Result<(), AppError> {
        let f = fixture(&pool, AuthorizationPolicy::default()).await?;
        let author = claims_for(&f.author, f.author.company_id);
        let staff = claims_for(&f.staff, f.staff.company_id);

        let r1 = f.service.create(&author, f.feedback.id, "1", "primeira").await?;
        let r2 = f.service.create(&staff, f.feedback.id, "2", "segunda").await?;
        let r3 = f.service.create(&author, f.feedback.id, "3", "terceira").await?;

        let ids: Vec<_> = f
            .service
            .list_for_feedback(f.feedback.id)
            .await?
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![r1.id, r2.id, r3.id]);
        assert_eq!(r2.author_email, "staff@alvo.com");

        assert!(matches!(
            f.service.list_for_feedback(9999).await,
            Err(AppError::NotFound(Resource::Feedback))
        ));
        Ok(())
    }

    #[sqlx::test]
    #[ignore = "requer PostgreSQL (DATABASE_URL)"]
    async fn company_claim_in_token_is_not_trusted(pool: PgPool) -> Result<(), AppError> {
        let f = fixture(&pool, AuthorizationPolicy::default()).await?;

        // O token diz "empresa alvo", mas o cadastro diz outra coisa
        let forged = claims_for(&f.outsider, Some(f.feedback.company_id));

        assert!(matches!(
            f.service.create(&forged, f.feedback.id, "t", "d").await,
            Err(AppError::Forbidden)
        ));
        Ok(())
    }

    #[sqlx::test]
    #[ignore = "requer PostgreSQL (DATABASE_URL)"]
    async fn admin_replies_only_when_enabled(pool: PgPool) -> Result<(), AppError> {
        let f = fixture(&pool, AuthorizationPolicy::default()).await?;
        let admin = claims_for(&f.admin, Some(1));

        assert!(matches!(
            f.service.create(&admin, f.feedback.id, "t", "d").await,
            Err(AppError::Forbidden)
        ));

        let permissive = ReplyService::new(
            pool.clone(),
            AuthorizationPolicy { admin_may_reply: true, ..Default::default() },
        );
        permissive.create(&admin, f.feedback.id, "t", "d").await?;
        Ok(())
    }
}

// src/services/feedback_service.rs

use sqlx::PgPool;

use crate::{
    common::error::{AppError, Resource},
    db::{CrudRepository, FeedbackFields, FeedbackRepository},
    models::{
        auth::{Claims, User},
        catalog::{Category, Status},
        company::Company,
        feedback::{
            CreateFeedbackPayload, Feedback, FeedbackDetail, FeedbackFilter, UpdateFeedbackPayload,
        },
        EntityId, INITIAL_STATUS_ID,
    },
    services::authorization::{
        can_change_status, Actor, AuthorizationPolicy, FeedbackOwnership, FeedbackUpdatePolicy,
    },
};

#[derive(Clone)]
pub struct FeedbackService {
    repo: FeedbackRepository,
    feedbacks: CrudRepository<Feedback>,
    users: CrudRepository<User>,
    companies: CrudRepository<Company>,
    categories: CrudRepository<Category>,
    statuses: CrudRepository<Status>,
    policy: AuthorizationPolicy,
    pool: PgPool,
}

impl FeedbackService {
    pub fn new(pool: PgPool, policy: AuthorizationPolicy) -> Self {
        Self {
            repo: FeedbackRepository::new(pool.clone()),
            feedbacks: CrudRepository::new(pool.clone()),
            users: CrudRepository::new(pool.clone()),
            companies: CrudRepository::new(pool.clone()),
            categories: CrudRepository::new(pool.clone()),
            statuses: CrudRepository::new(pool.clone()),
            policy,
            pool,
        }
    }

    pub async fn list(&self, filter: &FeedbackFilter) -> Result<Vec<FeedbackDetail>, AppError> {
        self.repo.list_details(filter).await
    }

    pub async fn get(&self, id: EntityId) -> Result<FeedbackDetail, AppError> {
        self.repo
            .find_detail(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound(Resource::Feedback))
    }

    pub async fn create(&self, payload: &CreateFeedbackPayload) -> Result<Feedback, AppError> {
        // Campos obrigatórios já passaram pelo validator
        let (Some(user_id), Some(company_id), Some(category_id)) =
            (payload.user_id, payload.company_id, payload.category_id)
        else {
            return Err(AppError::InternalServerError(anyhow::anyhow!(
                "payload de feedback sem ids obrigatórios"
            )));
        };
        let status_id = payload.status_id.unwrap_or(INITIAL_STATUS_ID);

        let mut tx = self.pool.begin().await?;

        self.users.get(&mut *tx, user_id).await?;
        self.companies.get(&mut *tx, company_id).await?;
        self.categories.get(&mut *tx, category_id).await?;
        self.statuses.get(&mut *tx, status_id).await?;

        let fields = FeedbackFields {
            title: payload.title.clone(),
            description: payload.description.clone(),
            user_id,
            company_id,
            category_id,
            status_id,
        };
        let feedback = self.feedbacks.create(&mut *tx, &fields).await?;

        tx.commit().await?;

        tracing::info!(
            "📝 Feedback {} criado pelo usuário {} para a empresa {}.",
            feedback.id,
            user_id,
            company_id
        );
        Ok(feedback)
    }

    /// PUT completo. Com a política `Open` qualquer um pode editar;
    /// com `Restricted` vale a mesma regra da troca de status.
    pub async fn update(
        &self,
        id: EntityId,
        payload: &UpdateFeedbackPayload,
        caller: Option<&Claims>,
    ) -> Result<Feedback, AppError> {
        let (Some(category_id), Some(status_id)) = (payload.category_id, payload.status_id) else {
            return Err(AppError::InternalServerError(anyhow::anyhow!(
                "payload de atualização sem ids obrigatórios"
            )));
        };

        let mut tx = self.pool.begin().await?;

        let current = self.feedbacks.lock_by_id(&mut *tx, id).await?;

        if self.policy.feedback_update == FeedbackUpdatePolicy::Restricted {
            let claims = caller.ok_or(AppError::MissingToken)?;
            self.authorize_status_change(claims, &current)?;
        }

        self.categories.get(&mut *tx, category_id).await?;
        self.statuses.get(&mut *tx, status_id).await?;

        let fields = FeedbackFields {
            title: payload.title.clone(),
            description: payload.description.clone(),
            user_id: current.user_id,
            company_id: current.company_id,
            category_id,
            status_id,
        };
        let updated = self.feedbacks.update(&mut *tx, id, &fields).await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Troca o status e devolve o feedback já com os dados de exibição.
    pub async fn change_status(
        &self,
        id: EntityId,
        status_id: EntityId,
        claims: &Claims,
    ) -> Result<FeedbackDetail, AppError> {
        let mut tx = self.pool.begin().await?;

        let feedback = self.feedbacks.lock_by_id(&mut *tx, id).await?;
        self.authorize_status_change(claims, &feedback)?;

        self.statuses.get(&mut *tx, status_id).await?;
        self.repo.update_status(&mut *tx, id, status_id).await?;

        let detail = self
            .repo
            .find_detail(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound(Resource::Feedback))?;

        tx.commit().await?;

        tracing::info!(
            "🔁 Feedback {} passou para o status {} (usuário {}).",
            id,
            status_id,
            claims.user_id
        );
        Ok(detail)
    }

    pub async fn delete(&self, id: EntityId) -> Result<EntityId, AppError> {
        self.feedbacks.delete(id).await
    }

    fn authorize_status_change(&self, claims: &Claims, feedback: &Feedback) -> Result<(), AppError> {
        let actor = Actor::from(claims);
        if !can_change_status(&actor, &FeedbackOwnership::from(feedback)) {
            tracing::warn!(
                "⛔ Usuário {} sem permissão para alterar o feedback {}.",
                claims.user_id,
                feedback.id
            );
            return Err(AppError::Forbidden);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::UserFields,
        models::{
            catalog::{CategoryPayload, StatusPayload},
            company::CompanyPayload,
            feedback::FeedbackQuery,
        },
    };

    struct Fixture {
        service: FeedbackService,
        author: User,
        company: Company,
        bug: Category,
        idea: Category,
        closed: Status,
    }

    async fn fixture(pool: &PgPool, policy: AuthorizationPolicy) -> Result<Fixture, AppError> {
        let company = CrudRepository::<Company>::new(pool.clone())
            .create(
                pool,
                &CompanyPayload { name: "Padaria".into(), email: "p@p.com".into(), cnpj: "1".into() },
            )
            .await?;
        let author = CrudRepository::<User>::new(pool.clone())
            .create(
                pool,
                &UserFields { email: "autor@x.com".into(), password_hash: "x".into(), company_id: None },
            )
            .await?;
        let categories = CrudRepository::<Category>::new(pool.clone());
        let bug = categories
            .create(pool, &CategoryPayload { type_category: "Bug".into(), color_category: "#F00".into() })
            .await?;
        let idea = categories
            .create(pool, &CategoryPayload { type_category: "Ideia".into(), color_category: "#0F0".into() })
            .await?;
        let closed = CrudRepository::<Status>::new(pool.clone())
            .create(pool, &StatusPayload { type_status: "Fechado".into(), color_status: "#000".into() })
            .await?;

        Ok(Fixture {
            service: FeedbackService::new(pool.clone(), policy),
            author,
            company,
            bug,
            idea,
            closed,
        })
    }

    fn payload(f: &Fixture, title: &str, description: &str, category_id: EntityId) -> CreateFeedbackPayload {
        CreateFeedbackPayload {
            title: title.into(),
            description: description.into(),
            user_id: Some(f.author.id),
            company_id: Some(f.company.id),
            category_id: Some(category_id),
            status_id: None,
        }
    }

    fn claims(user_id: EntityId, company_id: Option<EntityId>) -> Claims {
        Claims { user_id, email: "x@x.com".into(), company_id, exp: 0, iat: 0 }
    }

    fn filter(search: Option<&str>, category: Option<String>) -> FeedbackFilter {
        FeedbackFilter::from_query(FeedbackQuery {
            search: search.map(str::to_string),
            category,
            status: Some("all-status".into()),
            company: Some("all-companies".into()),
        })
        .unwrap()
    }

    #[sqlx::test]
    #[ignore = "requer PostgreSQL (DATABASE_URL)"]
    async fn new_feedback_starts_with_the_initial_status(pool: PgPool) -> Result<(), AppError> {
        let f = fixture(&pool, AuthorizationPolicy::default()).await?;

        let created = f.service.create(&payload(&f, "t", "d", f.bug.id)).await?;

        assert_eq!(created.status_id, INITIAL_STATUS_ID);
        Ok(())
    }

    #[sqlx::test]
    #[ignore = "requer PostgreSQL (DATABASE_URL)"]
    async fn listing_applies_search_and_exact_filters(pool: PgPool) -> Result<(), AppError> {
        let f = fixture(&pool, AuthorizationPolicy::default()).await?;
        let first = f.service.create(&payload(&f, "ABCdef", "corpo", f.bug.id)).await?;
        let second = f.service.create(&payload(&f, "outro", "tem abc no meio", f.idea.id)).await?;
        f.service.create(&payload(&f, "xyz", "nada", f.bug.id)).await?;

        let all = f.service.list(&filter(None, Some("all-categories".into()))).await?;
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].id < w[1].id));

        let found: Vec<_> = f
            .service
            .list(&filter(Some("abc"), None))
            .await?
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(found, vec![first.id, second.id]);

        let bugs_with_abc = f
            .service
            .list(&filter(Some("abc"), Some(f.bug.id.to_string())))
            .await?;
        assert_eq!(bugs_with_abc.len(), 1);
        assert_eq!(bugs_with_abc[0].id, first.id);
        assert_eq!(bugs_with_abc[0].category_name, "Bug");
        Ok(())
    }

    #[sqlx::test]
    #[ignore = "requer PostgreSQL (DATABASE_URL)"]
    async fn status_change_follows_the_authorization_rule(pool: PgPool) -> Result<(), AppError> {
        let f = fixture(&pool, AuthorizationPolicy::default()).await?;
        let feedback = f.service.create(&payload(&f, "t", "d", f.bug.id)).await?;

        let outsider = claims(f.author.id + 100, Some(f.company.id + 100));
        assert!(matches!(
            f.service.change_status(feedback.id, f.closed.id, &outsider).await,
            Err(AppError::Forbidden)
        ));

        let member = claims(f.author.id + 100, Some(f.company.id));
        let detail = f.service.change_status(feedback.id, f.closed.id, &member).await?;
        assert_eq!(detail.status_id, f.closed.id);
        assert_eq!(detail.status_name, "Fechado");

        let admin = claims(f.author.id + 100, Some(1));
        assert!(matches!(
            f.service.change_status(feedback.id, 9999, &admin).await,
            Err(AppError::NotFound(Resource::Status))
        ));
        assert!(matches!(
            f.service.change_status(9999, f.closed.id, &admin).await,
            Err(AppError::NotFound(Resource::Feedback))
        ));
        Ok(())
    }

    #[sqlx::test]
    #[ignore = "requer PostgreSQL (DATABASE_URL)"]
    async fn restricted_policy_gates_full_update(pool: PgPool) -> Result<(), AppError> {
        let policy = AuthorizationPolicy {
            feedback_update: FeedbackUpdatePolicy::Restricted,
            ..Default::default()
        };
        let f = fixture(&pool, policy).await?;
        let feedback = f.service.create(&payload(&f, "t", "d", f.bug.id)).await?;
        let update = UpdateFeedbackPayload {
            title: "novo".into(),
            description: "novo".into(),
            category_id: Some(f.idea.id),
            status_id: Some(f.closed.id),
        };

        assert!(matches!(
            f.service.update(feedback.id, &update, None).await,
            Err(AppError::MissingToken)
        ));
        assert!(matches!(
            f.service.update(feedback.id, &update, Some(&claims(9999, Some(9999)))).await,
            Err(AppError::Forbidden)
        ));

        let owner = claims(f.author.id, None);
        let updated = f.service.update(feedback.id, &update, Some(&owner)).await?;
        assert_eq!(updated.title, "novo");
        assert_eq!(updated.category_id, f.idea.id);
        assert_eq!(updated.user_id, f.author.id);
        Ok(())
    }
}

// src/config.rs

use std::{env, fmt::Display, str::FromStr, sync::Arc, time::Duration};

use anyhow::{anyhow, Context};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    services::{
        auth::AuthService,
        authorization::{AuthorizationPolicy, FeedbackUpdatePolicy},
        feedback_service::FeedbackService,
        reply_service::ReplyService,
        user_service::UserService,
    },
};

/// Configuração lida do ambiente (com suporte a `.env`).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub db_max_connections: u32,
    pub token_ttl_hours: i64,
    /// `None` libera qualquer origem.
    pub cors_origin: Option<String>,
    pub policy: AuthorizationPolicy,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow!("{} deve ser definida", key))
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            server_addr: lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            token_ttl_hours: parse_or(&lookup, "TOKEN_TTL_HOURS", 24)?,
            cors_origin: lookup("CORS_ORIGIN").filter(|v| !v.trim().is_empty()),
            policy: AuthorizationPolicy {
                feedback_update: parse_or(&lookup, "FEEDBACK_UPDATE_POLICY", FeedbackUpdatePolicy::Open)?,
                admin_may_reply: parse_or(&lookup, "REPLY_ADMIN_BYPASS", false)?,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("Valor inválido para {}: {}", key, e)),
        None => Ok(default),
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub settings: Arc<Settings>,
    pub i18n_store: Arc<I18nStore>,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub feedback_service: FeedbackService,
    pub reply_service: ReplyService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        let settings = Settings::from_env()?;

        let db_pool = PgPoolOptions::new()
            .max_connections(settings.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Self::build(settings, db_pool)
    }

    /// Monta o gráfico de dependências sobre um pool já criado.
    pub fn build(settings: Settings, db_pool: PgPool) -> anyhow::Result<Self> {
        let i18n_store = Arc::new(I18nStore::load()?);

        let auth_service = AuthService::new(
            db_pool.clone(),
            settings.jwt_secret.clone(),
            chrono::Duration::hours(settings.token_ttl_hours),
        );
        let user_service = UserService::new(db_pool.clone());
        let feedback_service = FeedbackService::new(db_pool.clone(), settings.policy);
        let reply_service = ReplyService::new(db_pool.clone(), settings.policy);

        Ok(Self {
            db_pool,
            settings: Arc::new(settings),
            i18n_store,
            auth_service,
            user_service,
            feedback_service,
            reply_service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> anyhow::Result<Settings> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://localhost/echobox"),
        ("JWT_SECRET", "segredo"),
    ];

    #[test]
    fn defaults_apply_when_optional_vars_are_missing() {
        let s = settings(&REQUIRED).unwrap();

        assert_eq!(s.server_addr, "0.0.0.0:3000");
        assert_eq!(s.db_max_connections, 5);
        assert_eq!(s.token_ttl_hours, 24);
        assert_eq!(s.cors_origin, None);
        assert_eq!(s.policy, AuthorizationPolicy::default());
    }

    #[test]
    fn policy_knobs_are_read() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("FEEDBACK_UPDATE_POLICY", "Restricted"));
        vars.push(("REPLY_ADMIN_BYPASS", "true"));
        vars.push(("CORS_ORIGIN", "http://localhost:5173"));

        let s = settings(&vars).unwrap();

        assert_eq!(s.policy.feedback_update, FeedbackUpdatePolicy::Restricted);
        assert!(s.policy.admin_may_reply);
        assert_eq!(s.cors_origin.as_deref(), Some("http://localhost:5173"));
    }

    #[test]
    fn missing_secret_is_an_error() {
        let err = settings(&[("DATABASE_URL", "postgres://localhost/echobox")]).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn unparsable_values_are_errors() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("TOKEN_TTL_HOURS", "um dia"));
        assert!(settings(&vars).is_err());

        let mut vars = REQUIRED.to_vec();
        vars.push(("FEEDBACK_UPDATE_POLICY", "talvez"));
        assert!(settings(&vars).is_err());
    }
}

// src/common/db_utils.rs

use crate::common::error::AppError;

/// Traduz as violações de restrição do Postgres para erros da aplicação.
/// Qualquer outro erro segue como `DatabaseError`.
pub(crate) fn map_constraint_violation(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() && db_err.constraint() == Some("users_email_key") {
            return AppError::EmailAlreadyExists;
        }
        if db_err.is_foreign_key_violation() {
            let constraint = db_err.constraint().unwrap_or("desconhecida").to_string();
            return AppError::InvalidReference(constraint);
        }
    }
    e.into()
}

pub mod auth;
pub mod catalog;
pub mod company;
pub mod feedback;
pub mod reply;

/// Identificador numérico de todas as entidades (coluna SERIAL).
pub type EntityId = i32;

/// Empresa administradora da plataforma. Seus membros têm poder sobre qualquer feedback.
pub const ADMIN_COMPANY_ID: EntityId = 1;

/// Status atribuído ao feedback quando nenhum é informado na criação.
pub const INITIAL_STATUS_ID: EntityId = 1;

/// Texto obrigatório: vazio ou só com espaços conta como ausente.
pub fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    use catalog::CategoryPayload;
    use feedback::CreateFeedbackPayload;

    #[test]
    fn whitespace_only_text_is_blank() {
        assert!(not_blank("Bug").is_ok());
        assert!(not_blank("").is_err());
        assert!(not_blank(" \t\n ").is_err());
    }

    #[test]
    fn blank_names_fail_validation_with_the_required_code() {
        let payload = CategoryPayload {
            type_category: "   ".into(),
            color_category: "#FF0000".into(),
        };

        let errors = payload.validate().unwrap_err();
        let field_errors = errors.field_errors();

        assert_eq!(field_errors["type_category"][0].code, "required");
        assert!(!field_errors.contains_key("color_category"));
    }

    #[test]
    fn missing_fields_deserialize_to_values_the_validator_rejects() {
        let payload: CreateFeedbackPayload =
            serde_json::from_str(r#"{"description":"veio frio","companyId":2}"#).unwrap();

        let errors = payload.validate().unwrap_err();
        let field_errors = errors.field_errors();

        assert!(field_errors.contains_key("title"));
        assert!(field_errors.contains_key("user_id"));
        assert!(field_errors.contains_key("category_id"));
        assert!(!field_errors.contains_key("company_id"));
        assert!(!field_errors.contains_key("status_id"));
    }
}

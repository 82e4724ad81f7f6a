use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    entity::sea_orm_active_enums::UserType,
    error::{AppError, AppResult},
};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub company: Option<String>,
    pub position: Option<String>,
    #[serde(default, rename = "type")]
    pub user_type: UserType,
}

impl RegisterRequest {
    pub fn validate(&self) -> AppResult<()> {
        validate_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::validation(
                "password",
                format!("must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        for (field, value) in [("company", &self.company), ("position", &self.position)] {
            if value.as_deref().is_some_and(|v| v.chars().count() > 40) {
                return Err(AppError::validation(field, "must be at most 40 characters"));
            }
        }
        Ok(())
    }
}

pub fn validate_email(email: &str) -> AppResult<()> {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return Err(AppError::validation("email", "must contain '@'"));
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(AppError::validation("email", "is not a valid address"));
    }
    if email.len() > 254 {
        return Err(AppError::validation("email", "is too long"));
    }
    Ok(())
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

/// Body for both account and order confirmation.
#[derive(Deserialize, Debug, ToSchema)]
pub struct ConfirmRequest {
    pub email: String,
    pub token: String,
}

impl ConfirmRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.email.trim().is_empty() {
            return Err(AppError::validation("email", "is required"));
        }
        if self.token.trim().is_empty() {
            return Err(AppError::validation("token", "is required"));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccountConfirmed {
    pub user_id: i64,
    pub email: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub exp: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            password: password.into(),
            company: None,
            position: None,
            user_type: UserType::Buyer,
        }
    }

    #[test]
    fn accepts_well_formed_registration() {
        assert!(register("buyer@example.com", "correct-horse").validate().is_ok());
    }

    #[test]
    fn rejects_short_password_with_field_detail() {
        let err = register("buyer@example.com", "short").validate().unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "password"));
    }

    #[test]
    fn rejects_email_without_domain() {
        assert!(validate_email("buyer@").is_err());
        assert!(validate_email("buyer.example.com").is_err());
        assert!(validate_email("buyer@localhost").is_err());
    }

    #[test]
    fn user_type_defaults_to_buyer() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"email":"a@b.io","password":"12345678"}"#).unwrap();
        assert_eq!(req.user_type, UserType::Buyer);

        let req: RegisterRequest =
            serde_json::from_str(r#"{"email":"a@b.io","password":"12345678","type":"shop"}"#)
                .unwrap();
        assert_eq!(req.user_type, UserType::Shop);
    }

    #[test]
    fn confirm_requires_both_fields() {
        let req = ConfirmRequest {
            email: "a@b.io".into(),
            token: " ".into(),
        };
        assert!(matches!(req.validate(), Err(AppError::Validation { ref field, .. }) if field == "token"));
    }
}

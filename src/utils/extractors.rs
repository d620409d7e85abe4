use crate::{
    error::{AppError, Result},
    models::UserRole,
    utils::jwt::Claims,
};

pub fn extract_user_id(claims: &Claims) -> Result<i32> {
    claims
        .sub
        .parse::<i32>()
        .map_err(|_| AppError::Unauthorized("Unauthorized".to_string()))
}

/// Ticket owners and admins may read or post on a ticket.
pub fn ensure_owner_or_admin(claims: &Claims, owner_id: i32) -> Result<()> {
    if claims.role == UserRole::Admin || extract_user_id(claims)? == owner_id {
        return Ok(());
    }

    Err(AppError::Forbidden("Access denied".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(sub: &str, role: UserRole) -> Claims {
        Claims {
            sub: sub.to_string(),
            role,
            exp: 0,
        }
    }

    #[test]
    fn non_numeric_subject_is_unauthorized() {
        assert!(matches!(
            extract_user_id(&claims("abc", UserRole::User)),
            Err(AppError::Unauthorized(_))
        ));
        assert_eq!(extract_user_id(&claims("12", UserRole::User)).unwrap(), 12);
    }

    #[test]
    fn owner_or_admin_access() {
        assert!(ensure_owner_or_admin(&claims("3", UserRole::User), 3).is_ok());
        assert!(ensure_owner_or_admin(&claims("9", UserRole::Admin), 3).is_ok());
        assert!(matches!(
            ensure_owner_or_admin(&claims("4", UserRole::User), 3),
            Err(AppError::Forbidden(_))
        ));
    }
}

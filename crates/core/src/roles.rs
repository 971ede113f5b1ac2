//! User role constants and validation.

/// Platform administrator: manages categories, challenges, users, and reviews.
pub const ROLE_ADMIN: &str = "admin";

/// Regular participant: applies to challenges and submits solutions.
pub const ROLE_TALENT: &str = "talent";

/// All assignable role names.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_TALENT];

/// Validate that a role string is one of the accepted values.
pub fn validate_role(role: &str) -> Result<(), String> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_accepted() {
        assert!(validate_role(ROLE_ADMIN).is_ok());
        assert!(validate_role(ROLE_TALENT).is_ok());
    }

    #[test]
    fn unknown_role_rejected() {
        let result = validate_role("superuser");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid role"));
    }
}

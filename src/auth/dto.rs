use serde::Deserialize;

/// Form body for both registration and login. Fields are optional so a
/// missing one is answered with a message rather than a 422.
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CredentialsForm {
    /// Trimmed username and the raw password, if both are present.
    pub fn into_parts(self) -> Option<(String, String)> {
        let username = self.username?.trim().to_string();
        let password = self.password?;
        if username.is_empty() || password.is_empty() {
            return None;
        }
        Some((username, password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(u: Option<&str>, p: Option<&str>) -> CredentialsForm {
        CredentialsForm {
            username: u.map(str::to_string),
            password: p.map(str::to_string),
        }
    }

    #[test]
    fn both_fields_required() {
        assert!(form(None, Some("pw")).into_parts().is_none());
        assert!(form(Some("alice"), None).into_parts().is_none());
        assert!(form(Some("   "), Some("pw")).into_parts().is_none());
        assert!(form(Some("alice"), Some("")).into_parts().is_none());
    }

    #[test]
    fn username_is_trimmed_password_is_not() {
        let (u, p) = form(Some("  alice "), Some(" pw ")).into_parts().unwrap();
        assert_eq!(u, "alice");
        assert_eq!(p, " pw ");
    }
}

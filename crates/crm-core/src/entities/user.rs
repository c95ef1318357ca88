use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const DEFAULT_ROLE: &str = "user";
/// Greeting used when the user has no first name on record.
pub const FALLBACK_GREETING: &str = "User";

fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}

const fn default_active() -> bool {
    true
}

/// An authenticated user's profile.
///
/// Cached alongside the credential after login/register. The login endpoint
/// of some backend versions returns only `id`, `email`, names and `role`, so
/// everything else is optional or defaulted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// Role such as `admin` or `user`.
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub organization_id: Option<i64>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, with = "crate::timestamp::optional")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// First and last name joined, skipping whichever is missing.
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        let parts = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    /// Name used to greet the user on the dashboard.
    #[must_use]
    pub fn greeting_name(&self) -> &str {
        self.first_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(FALLBACK_GREETING)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case("admin")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn make_user() -> User {
        User {
            id: 7,
            email: "ana@pyme.test".into(),
            first_name: Some("Ana".into()),
            last_name: Some("Ruiz".into()),
            role: "admin".into(),
            organization_id: Some(3),
            is_active: true,
            created_at: None,
        }
    }

    #[test]
    fn decodes_minimal_login_user() {
        let user: User = serde_json::from_str(
            r#"{"id": 1, "email": "a@b.com", "first_name": "A", "last_name": "B", "role": "user"}"#,
        )
        .expect("should decode");
        assert_eq!(user.organization_id, None);
        assert!(user.is_active);
        assert!(user.created_at.is_none());
    }

    #[test]
    fn decodes_full_record_with_naive_timestamp() {
        let user: User = serde_json::from_str(
            r#"{
                "id": 2, "email": "b@c.com", "first_name": null, "last_name": null,
                "role": "admin", "organization_id": 9, "is_active": false,
                "created_at": "2024-01-15T08:30:00"
            }"#,
        )
        .expect("should decode");
        assert_eq!(user.organization_id, Some(9));
        assert!(!user.is_active);
        assert_eq!(
            user.created_at.map(|dt| dt.to_rfc3339()),
            Some("2024-01-15T08:30:00+00:00".to_string())
        );
    }

    #[test]
    fn cached_record_survives_a_round_trip() {
        let user = make_user();
        let json = serde_json::to_string(&user).expect("serialize");
        let back: User = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, user);
    }

    #[test]
    fn full_name_skips_missing_parts() {
        let mut user = make_user();
        assert_eq!(user.full_name().as_deref(), Some("Ana Ruiz"));
        user.last_name = None;
        assert_eq!(user.full_name().as_deref(), Some("Ana"));
        user.first_name = Some("  ".into());
        assert_eq!(user.full_name(), None);
    }

    #[test]
    fn greeting_falls_back_when_first_name_missing() {
        let mut user = make_user();
        assert_eq!(user.greeting_name(), "Ana");
        user.first_name = None;
        assert_eq!(user.greeting_name(), "User");
    }

    #[test]
    fn admin_role_is_case_insensitive() {
        let mut user = make_user();
        assert!(user.is_admin());
        user.role = "user".into();
        assert!(!user.is_admin());
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn default_plan() -> String {
    "free".to_string()
}

/// An organization (the small business using the CRM).
///
/// Fetched per view and never persisted on the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub industry_type: Option<String>,
    /// Subscription tier: `free`, `basic`, `pro`, ...
    #[serde(default = "default_plan")]
    pub subscription_plan: String,
    #[serde(default, with = "crate::timestamp::optional")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub settings: Option<Map<String, Value>>,
}

/// Body of `POST /organizations`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateOrganization {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_plan: Option<String>,
}

/// Body of `PUT /organizations/my-organization`. Absent fields are left
/// unchanged by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UpdateOrganization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Map<String, Value>>,
}

impl UpdateOrganization {
    /// True when no field would be sent.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.industry_type.is_none()
            && self.subscription_plan.is_none()
            && self.settings.is_none()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_plan_defaults_to_free() {
        let org: Organization =
            serde_json::from_value(json!({"id": 1, "name": "Panadería Sol"})).expect("decode");
        assert_eq!(org.subscription_plan, "free");
        assert!(org.industry_type.is_none());
        assert!(org.settings.is_none());
    }

    #[test]
    fn settings_keep_arbitrary_json() {
        let org: Organization = serde_json::from_value(json!({
            "id": 1,
            "name": "Acme",
            "industry_type": "retail",
            "subscription_plan": "pro",
            "created_at": "2024-02-01T00:00:00Z",
            "settings": {"currency": "EUR", "seats": 5, "features": ["kanban"]}
        }))
        .expect("decode");
        let settings = org.settings.expect("settings");
        assert_eq!(settings["seats"], json!(5));
        assert_eq!(settings["features"], json!(["kanban"]));
    }

    #[test]
    fn create_body_omits_absent_fields() {
        let body = CreateOrganization {
            name: "Acme".into(),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&body).expect("encode"), json!({"name": "Acme"}));
    }

    #[test]
    fn update_body_only_sends_changed_fields() {
        let body = UpdateOrganization {
            subscription_plan: Some("basic".into()),
            ..Default::default()
        };
        assert!(!body.is_empty());
        assert_eq!(
            serde_json::to_value(&body).expect("encode"),
            json!({"subscription_plan": "basic"})
        );
        assert!(UpdateOrganization::default().is_empty());
    }
}

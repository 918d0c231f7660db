//! Project and API-key context types for the Memic API.

use serde::{Deserialize, Serialize};

use super::common;

/// A tenant-scoped container for files and search scope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    /// Project identifier.
    #[serde(deserialize_with = "common::id")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Owning organization.
    #[serde(default, deserialize_with = "common::id_or_default")]
    pub organization_id: String,
    /// Whether the project is active.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

fn default_active() -> bool {
    true
}

/// Organization, project and environment an API key is scoped to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiKeyContext {
    /// Organization identifier.
    #[serde(deserialize_with = "common::id")]
    pub organization_id: String,
    /// Organization display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    /// Project the key is bound to, if any.
    #[serde(default, deserialize_with = "common::optional_id", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Environment slug such as `staging` or `production`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_slug: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_defaults() {
        let project: Project = serde_json::from_str(r#"{"id": "proj-1", "name": "Project 1"}"#).unwrap();
        assert_eq!(project.id, "proj-1");
        assert_eq!(project.name, "Project 1");
        assert!(project.is_active);
        assert_eq!(project.organization_id, "");
    }

    #[test]
    fn test_numeric_organization_id() {
        let project: Project = serde_json::from_str(
            r#"{"id": 3, "name": "Archive", "organization_id": 9, "is_active": false}"#,
        )
        .unwrap();
        assert_eq!(project.id, "3");
        assert_eq!(project.organization_id, "9");

        let project: Project =
            serde_json::from_str(r#"{"id": 4, "name": "New", "organization_id": null}"#).unwrap();
        assert_eq!(project.organization_id, "");
    }

    #[test]
    fn test_context_parses() {
        let context: ApiKeyContext = serde_json::from_str(
            r#"{"organization_id": "org-123", "organization_name": "Test Org"}"#,
        )
        .unwrap();
        assert_eq!(context.organization_id, "org-123");
        assert_eq!(context.organization_name.as_deref(), Some("Test Org"));
        assert!(context.project_id.is_none());
    }
}

//! Session-related types.
//!
//! Types persisted in the session snapshot for authentication state.

use serde::{Deserialize, Serialize};

/// The signed-in user.
///
/// Minimal identity persisted to the session snapshot. The API token is
/// kept alongside so the session survives a restart exactly as the catalog
/// API issued it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's display name.
    pub name: String,
    /// User's email address.
    pub email: String,
    /// Bearer token issued by the catalog API, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl CurrentUser {
    /// Name to show in the header, falling back to the email address.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_email() {
        let user = CurrentUser {
            name: String::new(),
            email: "layla@example.com".to_string(),
            token: None,
        };
        assert_eq!(user.display_name(), "layla@example.com");

        let user = CurrentUser {
            name: "Layla".to_string(),
            email: "layla@example.com".to_string(),
            token: None,
        };
        assert_eq!(user.display_name(), "Layla");
    }

    #[test]
    fn test_token_is_omitted_when_absent() {
        let user = CurrentUser {
            name: "Layla".to_string(),
            email: "layla@example.com".to_string(),
            token: None,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("token"));

        let restored: CurrentUser = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.email, "layla@example.com");
        assert_eq!(restored.token, None);
    }
}

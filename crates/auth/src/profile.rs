//! `user_profiles` records, parsed at the system boundary.
//!
//! The profile store hands back raw strings; this is where `app_role` becomes
//! a [`Role`] so the rest of the crate never compares role text.

use serde::{Deserialize, Serialize};

use pitlane_core::{DomainError, DomainResult, UserId};

use crate::{Actor, Role};

/// A row of the external `user_profiles` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    #[serde(default)]
    pub app_role: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl UserProfile {
    /// Decode a single row as returned by the profile store's REST API.
    pub fn from_json(row: &str) -> DomainResult<Self> {
        serde_json::from_str(row).map_err(|e| DomainError::validation(format!("user profile: {e}")))
    }

    /// The profile's role. An absent or empty `app_role` means no role.
    pub fn role(&self) -> Option<Role> {
        match self.app_role.as_deref() {
            None | Some("") => None,
            Some(name) => Some(Role::parse(name)),
        }
    }

    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.role())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "0190a6f2-7c1e-7d4b-9a3e-2b9c1f0e5d11";

    #[test]
    fn decodes_row_with_role() {
        let row = format!(r#"{{"id":"{ID}","app_role":"Scrutineer","display_name":"Sam"}}"#);
        let profile = UserProfile::from_json(&row).unwrap();
        assert_eq!(profile.role(), Some(Role::Scrutineer));
        assert_eq!(profile.display_name.as_deref(), Some("Sam"));
    }

    #[test]
    fn null_and_empty_role_mean_no_role() {
        let row = format!(r#"{{"id":"{ID}","app_role":null}}"#);
        assert_eq!(UserProfile::from_json(&row).unwrap().role(), None);

        let row = format!(r#"{{"id":"{ID}","app_role":""}}"#);
        assert_eq!(UserProfile::from_json(&row).unwrap().role(), None);

        let row = format!(r#"{{"id":"{ID}"}}"#);
        let profile = UserProfile::from_json(&row).unwrap();
        assert!(!profile.actor().meets(&Role::Viewer));
    }

    #[test]
    fn unrecognized_role_is_kept_as_unknown() {
        let row = format!(r#"{{"id":"{ID}","app_role":"chief_judge"}}"#);
        let actor = UserProfile::from_json(&row).unwrap().actor();
        assert_eq!(actor.role, Some(Role::parse("chief_judge")));
        assert!(actor.role.as_ref().is_some_and(|role| !role.is_known()));
        assert!(actor.meets(&Role::Viewer));
        assert!(!actor.meets(&Role::TeamMember));
    }

    #[test]
    fn malformed_row_is_a_validation_error() {
        let err = UserProfile::from_json(r#"{"id":"nope"}"#).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.starts_with("user profile")));
    }
}

use serde::Serialize;
use thiserror::Error;

use pitlane_core::UserId;

use crate::{Actor, Rank, Role};

/// Does `actor_role` meet or exceed `required_role`?
///
/// This is the string-level entry point for callers that still hold raw
/// role text. An absent or empty actor role never passes. Role names are
/// compared case-insensitively and unrecognized names rank lowest, on both
/// sides: a misspelled `required_role` is satisfied by any present actor role.
pub fn meets_minimum_role(actor_role: Option<&str>, required_role: &str) -> bool {
    match actor_role {
        None | Some("") => false,
        Some(actor) => Role::parse(actor).meets(&Role::parse(required_role)),
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: no role assigned")]
    NoRole,

    #[error("forbidden: role '{actor}' does not meet required role '{required}'")]
    InsufficientRole { actor: Role, required: Role },
}

/// Authorize an actor against a minimum role.
///
/// - No IO
/// - No panics
/// - Same outcome as [`Actor::meets`], with a reason on denial
pub fn authorize(actor: &Actor, required: &Role) -> Result<(), AuthzError> {
    let Some(role) = actor.role() else {
        tracing::debug!(user_id = %actor.user_id, required = %required, "denied: no role");
        return Err(AuthzError::NoRole);
    };

    if !role.is_known() {
        tracing::warn!(
            user_id = %actor.user_id,
            role = %role,
            "unrecognized app_role, ranking as lowest"
        );
    }

    if role.meets(required) {
        Ok(())
    } else {
        tracing::debug!(
            user_id = %actor.user_id,
            role = %role,
            required = %required,
            "denied: insufficient role"
        );
        Err(AuthzError::InsufficientRole {
            actor: role.clone(),
            required: required.clone(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of an authorization decision.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    pub user_id: UserId,
    pub required_role: String,
    pub required_rank: Rank,
    pub actor_role: Option<String>,
    pub actor_rank: Option<Rank>,
    pub granted: bool,

    /// Human-readable reason for the decision.
    pub reason: String,

    /// If denied, this explains what was missing.
    pub denial_reason: Option<DenialReason>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DenialReason {
    pub kind: DenialKind,
    pub message: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    NoRole,
    InsufficientRank,
}

/// Explain why an authorization decision was made (or would be made).
///
/// The `granted` flag always agrees with [`authorize`].
pub fn explain_authorization(actor: &Actor, required: &Role) -> AuthorizationExplanation {
    let required_rank = required.rank();
    let satisfying = RoleRegistry::standard().satisfying(required);

    let Some(role) = actor.role() else {
        return AuthorizationExplanation {
            user_id: actor.user_id,
            required_role: required.to_string(),
            required_rank,
            actor_role: None,
            actor_rank: None,
            granted: false,
            reason: "Actor has no role assigned".to_string(),
            denial_reason: Some(DenialReason {
                kind: DenialKind::NoRole,
                message: "No app_role on the user's profile".to_string(),
                suggestions: vec![format!(
                    "Assign one of the following roles: {}",
                    satisfying.join(", ")
                )],
            }),
        };
    };

    let actor_rank = role.rank();
    let granted = actor_rank >= required_rank;

    let (reason, denial_reason) = if granted {
        let reason = if role.rank() == required_rank {
            format!("Role '{role}' has the same rank as '{required}' ({required_rank})")
        } else {
            format!(
                "Role '{role}' (rank {actor_rank}) outranks '{required}' (rank {required_rank})"
            )
        };
        (reason, None)
    } else {
        let mut suggestions = vec![format!(
            "Assign one of the following roles: {}",
            satisfying.join(", ")
        )];
        if !role.is_known() {
            suggestions.insert(
                0,
                format!(
                    "'{role}' is not a recognized role and ranks lowest; \
                     check the profile for a typo"
                ),
            );
        }
        (
            format!(
                "Role '{role}' (rank {actor_rank}) is below '{required}' (rank {required_rank})"
            ),
            Some(DenialReason {
                kind: DenialKind::InsufficientRank,
                message: format!("Requires rank {required_rank} or higher"),
                suggestions,
            }),
        )
    };

    AuthorizationExplanation {
        user_id: actor.user_id,
        required_role: required.to_string(),
        required_rank,
        actor_role: Some(role.to_string()),
        actor_rank: Some(actor_rank),
        granted,
        reason,
        denial_reason,
    }
}

/// Role definition with its rank (for audit/display).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleDefinition {
    pub name: String,
    pub rank: Rank,
    pub description: Option<String>,
}

/// Registry of all recognized roles, highest rank first.
#[derive(Debug, Clone, Serialize)]
pub struct RoleRegistry {
    pub roles: Vec<RoleDefinition>,
}

impl RoleRegistry {
    pub fn standard() -> Self {
        let mut roles: Vec<RoleDefinition> = Role::KNOWN
            .iter()
            .map(|role| RoleDefinition {
                name: role.as_str().to_string(),
                rank: role.rank(),
                description: role.description().map(str::to_string),
            })
            .collect();
        roles.sort_by(|a, b| b.rank.cmp(&a.rank).then_with(|| a.name.cmp(&b.name)));
        Self { roles }
    }

    /// Names of recognized roles that meet `required`.
    pub fn satisfying(&self, required: &Role) -> Vec<String> {
        let required_rank = required.rank();
        self.roles
            .iter()
            .filter(|def| def.rank >= required_rank)
            .map(|def| def.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Option<&str>) -> Actor {
        Actor::new(UserId::new(), role.map(Role::parse))
    }

    #[test]
    fn absent_actor_role_never_passes() {
        assert!(!meets_minimum_role(None, "viewer"));
        assert!(!meets_minimum_role(Some(""), "viewer"));
        assert!(!meets_minimum_role(None, ""));
        assert!(!meets_minimum_role(Some(""), "no_such_role"));
    }

    #[test]
    fn misspelled_required_role_is_unenforced() {
        assert!(meets_minimum_role(Some("team_member"), "admn"));
        assert!(meets_minimum_role(Some("whatever"), ""));
    }

    #[test]
    fn authorize_reports_missing_role() {
        assert_eq!(authorize(&actor(None), &Role::Viewer), Err(AuthzError::NoRole));
    }

    #[test]
    fn authorize_reports_insufficient_role() {
        let err = authorize(&actor(Some("team_leader")), &Role::InspectionResponsible).unwrap_err();
        assert_eq!(
            err,
            AuthzError::InsufficientRole {
                actor: Role::TeamLeader,
                required: Role::InspectionResponsible,
            }
        );
        assert_eq!(
            err.to_string(),
            "forbidden: role 'team_leader' does not meet required role 'inspection_responsible'"
        );
    }

    #[test]
    fn authorize_allows_ties() {
        assert!(authorize(&actor(Some("track_marshal")), &Role::Scrutineer).is_ok());
        assert!(authorize(&actor(Some("cm_judge")), &Role::DesignJudgeSoftware).is_ok());
    }

    #[test]
    fn explanation_agrees_with_authorize() {
        let cases = [None, Some("viewer"), Some("scrutineer"), Some("admin"), Some("intern")];
        for role in cases {
            let actor = actor(role);
            for required in Role::KNOWN {
                let explained = explain_authorization(&actor, &required);
                assert_eq!(explained.granted, authorize(&actor, &required).is_ok());
                assert_eq!(explained.granted, explained.denial_reason.is_none());
            }
        }
    }

    #[test]
    fn explanation_for_unknown_role_points_at_typo() {
        let explained = explain_authorization(&actor(Some("scrutinee")), &Role::Scrutineer);
        let denial = explained.denial_reason.unwrap();
        assert_eq!(denial.kind, DenialKind::InsufficientRank);
        assert!(denial.suggestions[0].contains("not a recognized role"));
        assert!(denial.suggestions[1].contains("scrutineer"));
        assert!(denial.suggestions[1].contains("admin"));
    }

    #[test]
    fn explanation_serializes() {
        let explained = explain_authorization(&actor(None), &Role::Admin);
        let json = serde_json::to_value(&explained).unwrap();
        assert_eq!(json["granted"], false);
        assert_eq!(json["required_rank"], 10);
        assert_eq!(json["denial_reason"]["kind"], "no_role");
    }

    #[test]
    fn registry_orders_by_rank_then_name() {
        let registry = RoleRegistry::standard();
        assert_eq!(registry.roles.len(), Role::KNOWN.len());
        assert_eq!(registry.roles[0].name, "admin");
        assert_eq!(registry.roles[1].name, "bp_judge");
        assert_eq!(registry.roles.last().map(|r| r.name.as_str()), Some("viewer"));
    }

    #[test]
    fn registry_satisfying_includes_ties() {
        let names = RoleRegistry::standard().satisfying(&Role::TrackMarshal);
        assert!(names.contains(&"scrutineer".to_string()));
        assert!(names.contains(&"track_marshal".to_string()));
        assert!(!names.contains(&"inspection_responsible".to_string()));
        assert_eq!(names.len(), 9);
    }
}

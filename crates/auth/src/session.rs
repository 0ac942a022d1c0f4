//! Auth-provider capabilities and the signed-in user's access level.
//!
//! The hosted provider owns sessions, token refresh and storage. This crate
//! only sees its answers: a user or nothing, and success or failure of the
//! callback exchanges.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pitlane_core::{DomainError, UserId};

use crate::{Actor, Role, UserProfile};

/// The authenticated user, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_confirmed_at: Option<DateTime<Utc>>,
}

impl AuthUser {
    pub fn is_email_confirmed(&self) -> bool {
        self.email_confirmed_at.is_some()
    }
}

/// A provider session, reduced to what authorization needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: AuthUser,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// One-time-password flavours accepted by the email confirmation callback.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpType {
    Signup,
    Invite,
    Magiclink,
    Recovery,
    EmailChange,
    Email,
}

impl OtpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpType::Signup => "signup",
            OtpType::Invite => "invite",
            OtpType::Magiclink => "magiclink",
            OtpType::Recovery => "recovery",
            OtpType::EmailChange => "email_change",
            OtpType::Email => "email",
        }
    }
}

impl FromStr for OtpType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "signup" => Ok(OtpType::Signup),
            "invite" => Ok(OtpType::Invite),
            "magiclink" => Ok(OtpType::Magiclink),
            "recovery" => Ok(OtpType::Recovery),
            "email_change" => Ok(OtpType::EmailChange),
            "email" => Ok(OtpType::Email),
            other => Err(DomainError::validation(format!("unsupported otp type '{other}'"))),
        }
    }
}

impl core::fmt::Display for OtpType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque capability backed by the hosted auth provider's client.
///
/// Every failure collapses to `None`/`false`; callers only branch on success.
pub trait AuthProvider {
    /// The user of the current session, if signed in.
    fn current_user(&self) -> Option<AuthUser>;

    /// Exchange an OAuth/PKCE authorization code for a session.
    fn exchange_code_for_session(&self, code: &str) -> bool;

    /// Verify an emailed one-time token and establish a session.
    fn verify_otp(&self, token_hash: &str, kind: OtpType) -> bool;
}

/// Read access to the external `user_profiles` store.
pub trait ProfileSource {
    fn fetch_profile(&self, user_id: UserId) -> Option<UserProfile>;
}

/// Resolve the signed-in user into an [`Actor`].
///
/// Signed out ⇒ `None`. Signed in without a profile ⇒ an actor with no role.
pub fn resolve_actor<A, P>(provider: &A, profiles: &P) -> Option<Actor>
where
    A: AuthProvider + ?Sized,
    P: ProfileSource + ?Sized,
{
    let user = provider.current_user()?;
    match profiles.fetch_profile(user.id) {
        Some(profile) => Some(profile.actor()),
        None => {
            tracing::debug!(user_id = %user.id, "no user profile, treating as no role");
            Some(Actor::without_role(user.id))
        }
    }
}

/// Does the signed-in user hold at least `required_role`?
///
/// `false` when signed out or when the user has no role. The required role
/// is parsed like any other role text, so an unrecognized name ranks lowest.
pub fn has_minimum_role<A, P>(provider: &A, profiles: &P, required_role: &str) -> bool
where
    A: AuthProvider + ?Sized,
    P: ProfileSource + ?Sized,
{
    resolve_actor(provider, profiles).is_some_and(|actor| actor.meets(&Role::parse(required_role)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::collections::HashMap;

    struct StubProvider(Option<AuthUser>);

    impl AuthProvider for StubProvider {
        fn current_user(&self) -> Option<AuthUser> {
            self.0.clone()
        }

        fn exchange_code_for_session(&self, _code: &str) -> bool {
            false
        }

        fn verify_otp(&self, _token_hash: &str, _kind: OtpType) -> bool {
            false
        }
    }

    struct StubProfiles(HashMap<UserId, UserProfile>);

    impl ProfileSource for StubProfiles {
        fn fetch_profile(&self, user_id: UserId) -> Option<UserProfile> {
            self.0.get(&user_id).cloned()
        }
    }

    fn user(id: UserId) -> AuthUser {
        AuthUser {
            id,
            email: Some("driver@example.com".to_string()),
            email_confirmed_at: None,
        }
    }

    fn profiles(id: UserId, app_role: Option<&str>) -> StubProfiles {
        let profile = UserProfile {
            id,
            app_role: app_role.map(str::to_string),
            display_name: None,
        };
        StubProfiles(HashMap::from([(id, profile)]))
    }

    #[test]
    fn signed_out_has_no_access() {
        let provider = StubProvider(None);
        let store = profiles(UserId::new(), Some("admin"));
        assert_eq!(resolve_actor(&provider, &store), None);
        assert!(!has_minimum_role(&provider, &store, "viewer"));
    }

    #[test]
    fn missing_profile_means_no_role() {
        let id = UserId::new();
        let provider = StubProvider(Some(user(id)));
        let store = StubProfiles(HashMap::new());
        assert_eq!(resolve_actor(&provider, &store), Some(Actor::without_role(id)));
        assert!(!has_minimum_role(&provider, &store, "viewer"));
    }

    #[test]
    fn signed_in_user_is_checked_against_profile_role() {
        let id = UserId::new();
        let provider = StubProvider(Some(user(id)));
        let store = profiles(id, Some("team_leader"));
        assert!(has_minimum_role(&provider, &store, "team_member"));
        assert!(has_minimum_role(&provider, &store, "TEAM_LEADER"));
        assert!(!has_minimum_role(&provider, &store, "inspection_responsible"));
    }

    #[test]
    fn otp_type_parsing() {
        assert_eq!("magiclink".parse::<OtpType>().unwrap(), OtpType::Magiclink);
        assert_eq!(OtpType::EmailChange.to_string(), "email_change");
        assert!("sms".parse::<OtpType>().is_err());
    }

    #[test]
    fn session_expiry() {
        let now = Utc::now();
        let session = Session {
            user: user(UserId::new()),
            expires_at: now + Duration::minutes(5),
        };
        assert!(!session.is_expired(now));
        assert!(session.is_expired(now + Duration::minutes(5)));
        assert!(!session.user.is_email_confirmed());
    }
}

//! `pitlane-auth`: role-based authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: the hosted
//! auth provider and the profile store are reached through traits.

pub mod authorize;
pub mod callback;
pub mod config;
pub mod principal;
pub mod profile;
pub mod roles;
pub mod session;

pub use authorize::{
    AuthorizationExplanation, AuthzError, RoleRegistry, authorize, explain_authorization,
    meets_minimum_role,
};
pub use callback::{CallbackQuery, Redirect, handle_email_confirmation, handle_oauth_callback};
pub use config::{AuthConfig, ConfigError};
pub use principal::Actor;
pub use profile::UserProfile;
pub use roles::{Rank, Role, UnknownRole};
pub use session::{
    AuthProvider, AuthUser, OtpType, ProfileSource, Session, has_minimum_role, resolve_actor,
};

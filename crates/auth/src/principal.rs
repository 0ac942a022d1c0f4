use serde::{Deserialize, Serialize};

use pitlane_core::UserId;

use crate::Role;

/// A resolved actor for authorization decisions.
///
/// `role` is `None` when the user has no role assigned on their profile (or
/// no profile at all). Such an actor is denied every role check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Option<Role>,
}

impl Actor {
    pub fn new(user_id: UserId, role: Option<Role>) -> Self {
        Self { user_id, role }
    }

    /// Actor that is signed in but has no role.
    pub fn without_role(user_id: UserId) -> Self {
        Self { user_id, role: None }
    }

    pub fn role(&self) -> Option<&Role> {
        self.role.as_ref()
    }

    /// Role-hierarchy check; `false` when no role is assigned.
    pub fn meets(&self, required: &Role) -> bool {
        self.role.as_ref().is_some_and(|role| role.meets(required))
    }
}

use std::collections::BTreeSet;

use serde::Serialize;

/// Closed set of roles the marketplace cares about.
///
/// External role strings arrive in several spellings (`ADMIN`, `ROLE_ADMIN`,
/// `role_admin`); they are folded into this enum once, when the token is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn parse(raw: &str) -> Option<Role> {
        let upper = raw.trim().to_ascii_uppercase();
        let bare = upper.strip_prefix("ROLE_").unwrap_or(&upper);

        match bare {
            "ADMIN" => Some(Role::Admin),
            "USER" => Some(Role::User),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub roles: BTreeSet<Role>,
}

impl Actor {
    /// Builds an actor from raw role strings; unrecognised roles are dropped.
    pub fn new<I, S>(user_id: impl Into<String>, raw_roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let user_id = user_id.into();
        let mut roles = BTreeSet::new();

        for raw in raw_roles {
            match Role::parse(raw.as_ref()) {
                Some(role) => {
                    roles.insert(role);
                }
                None => tracing::debug!(user_id = %user_id, role = raw.as_ref(), "ignoring unknown role"),
            }
        }

        Actor { user_id, roles }
    }

    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }
}

/// The authenticated caller for this request plus the bearer token to forward
/// to the trading engine.
#[derive(Debug, Clone)]
pub struct CurrentActor {
    pub actor: Actor,
    pub token: String,
}

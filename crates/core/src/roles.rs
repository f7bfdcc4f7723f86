//! Actor roles and the capabilities each one grants.
//!
//! Role names must match the values the Tashih service puts in the `role`
//! claim of its access tokens.

use serde::{Deserialize, Serialize};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MUSHOHEH: &str = "mushoheh";
pub const ROLE_USER: &str = "user";

/// Something an actor is allowed to do in the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Open the general dashboard.
    ViewDashboard,
    /// Open the tashih dashboard (statistics and review queues).
    ViewTashihDashboard,
    /// Submit TaqrirKhass / TaqrirJamai review decisions.
    Review,
}

const REVIEWER_CAPABILITIES: &[Capability] = &[
    Capability::ViewDashboard,
    Capability::ViewTashihDashboard,
    Capability::Review,
];

const USER_CAPABILITIES: &[Capability] = &[Capability::ViewDashboard];

/// Closed set of roles known to the client.
///
/// Any role string the client does not recognise decodes to
/// [`Role::Unknown`], which carries no capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Mushoheh,
    User,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Parse a role name from a token claim. Unknown names map to `Unknown`.
    pub fn from_name(name: &str) -> Self {
        match name {
            ROLE_ADMIN => Self::Admin,
            ROLE_MUSHOHEH => Self::Mushoheh,
            ROLE_USER => Self::User,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => ROLE_ADMIN,
            Self::Mushoheh => ROLE_MUSHOHEH,
            Self::User => ROLE_USER,
            Self::Unknown => "unknown",
        }
    }

    /// Capabilities granted to this role.
    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            Self::Admin | Self::Mushoheh => REVIEWER_CAPABILITIES,
            Self::User => USER_CAPABILITIES,
            Self::Unknown => &[],
        }
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Whether this role may open review screens and submit decisions.
    pub fn can_review(&self) -> bool {
        self.has(Capability::Review)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

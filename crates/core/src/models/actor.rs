//! The signed-in actor, materialized from the bearer credential.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::{deserialize_id, EntityId};

/// Identity and role decoded from the access token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    #[serde(alias = "user_id", deserialize_with = "deserialize_id")]
    pub id: EntityId,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: Role,
    /// Login name. TaqrirJamai review entries name their reviewer by it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Which actor field is compared against `TaqrirJamaiReview::reviewer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewerIdentity {
    #[default]
    Username,
    Email,
    Id,
}

impl FromStr for ReviewerIdentity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "username" => Ok(Self::Username),
            "email" => Ok(Self::Email),
            "id" => Ok(Self::Id),
            other => Err(CoreError::Validation(format!(
                "Invalid reviewer identity '{other}'. Must be one of: username, email, id"
            ))),
        }
    }
}

impl Actor {
    /// The value this actor is known by in review entries, if the token
    /// carries the selected field.
    pub fn reviewer_identity(&self, identity: ReviewerIdentity) -> Option<&str> {
        let value = match identity {
            ReviewerIdentity::Username => self.username.as_deref()?,
            ReviewerIdentity::Email => self.email.as_str(),
            ReviewerIdentity::Id => self.id.as_str(),
        };
        (!value.is_empty()).then_some(value)
    }

    pub fn can_review(&self) -> bool {
        self.role.can_review()
    }
}

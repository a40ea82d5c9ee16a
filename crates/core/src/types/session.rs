//! Authenticated session types.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// User role, as enumerated by the remote auth service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access: create, update, and delete products.
    Owner,
    /// Stock updates only; the server enforces the distinction.
    Worker,
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Owner => write!(f, "owner"),
            Self::Worker => write!(f, "worker"),
        }
    }
}

/// Error parsing a role from user input.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role {0:?}, expected \"owner\" or \"worker\"")]
pub struct RoleParseError(pub String);

impl core::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "worker" => Ok(Self::Worker),
            other => Err(RoleParseError(other.to_string())),
        }
    }
}

/// The authenticated identity returned by login/signup.
///
/// Persisted verbatim as the sole source of truth for "is a user logged
/// in". The bearer token is held as a [`SecretString`] so `Debug` output
/// redacts it; serde round-trips it through the persisted JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Server-side user id, required by the change-password endpoint.
    #[serde(rename = "_id")]
    pub user_id: String,
    /// Display name.
    pub name: String,
    /// Login username.
    pub username: String,
    /// Role granted at signup.
    pub role: Role,
    /// Bearer credential for all authenticated calls.
    #[serde(with = "secret_string")]
    pub token: SecretString,
    /// When this session was established locally.
    #[serde(default = "Utc::now")]
    pub logged_in_at: DateTime<Utc>,
}

impl Session {
    /// The bearer credential for authenticated remote calls.
    #[must_use]
    pub const fn credential(&self) -> &SecretString {
        &self.token
    }
}

/// Serde support for [`SecretString`] fields.
///
/// `secrecy` deliberately does not implement `Serialize`; the session file
/// is the one place the token legitimately leaves memory.
mod secret_string {
    use super::{ExposeSecret, SecretString};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &SecretString, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(value.expose_secret())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<SecretString, D::Error> {
        String::deserialize(de).map(SecretString::from)
    }
}

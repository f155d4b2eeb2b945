//! Who is calling into the core
//!
//! Sessions and logins live outside this crate; callers pass an explicit
//! [`Actor`] with each operation instead of the core reading ambient state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Submits annotations
    Annotator,
    /// Reviews and approves submissions
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Annotator => write!(f, "annotator"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "annotator" => Ok(Role::Annotator),
            "admin" => Ok(Role::Admin),
            other => Err(Error::InvalidInput(format!("unknown role: {}", other))),
        }
    }
}

/// Authenticated caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    pub role: Role,
}

impl Actor {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into().trim().to_string(),
            role,
        }
    }

    pub fn annotator(name: impl Into<String>) -> Self {
        Self::new(name, Role::Annotator)
    }

    pub fn admin(name: impl Into<String>) -> Self {
        Self::new(name, Role::Admin)
    }

    /// Fail with [`Error::Forbidden`] unless the actor holds `role`
    pub fn require(&self, role: Role) -> Result<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(Error::Forbidden(format!(
                "{} ({}) cannot perform {} operations",
                self.name, self.role, role
            )))
        }
    }
}

//! Who is committing
//!
//! Commit authorship comes from an [`IdentitySource`] rather than from process-wide
//! state, so commits can be built with a fixed identity in tests. [`EnvIdentity`]
//! is the source the CLI uses.

pub mod clock;

use crate::artifacts::objects::commit::Author;
use crate::errors::{Result, StoreError};
use chrono::{DateTime, FixedOffset};
use derive_new::new;

/// A name and an email, without a timestamp
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    /// Signature for this identity at `timestamp`
    pub fn at(&self, timestamp: DateTime<FixedOffset>) -> Author {
        Author::new(self.name.clone(), self.email.clone(), timestamp)
    }
}

pub trait IdentitySource {
    /// The default author, or [`StoreError::MissingIdentity`]
    fn author(&self) -> Result<Identity>;
}

/// Identity taken from `GIT_AUTHOR_NAME` and `GIT_AUTHOR_EMAIL`
#[derive(Debug, Clone, Default, new)]
pub struct EnvIdentity {
    author_name: Option<String>,
    author_email: Option<String>,
}

impl EnvIdentity {
    pub fn from_env() -> Self {
        let var = |key: &str| std::env::var(key).ok().filter(|value| !value.trim().is_empty());

        EnvIdentity {
            author_name: var("GIT_AUTHOR_NAME"),
            author_email: var("GIT_AUTHOR_EMAIL"),
        }
    }
}

impl IdentitySource for EnvIdentity {
    fn author(&self) -> Result<Identity> {
        let name = self
            .author_name
            .clone()
            .ok_or_else(|| StoreError::MissingIdentity("GIT_AUTHOR_NAME not set".into()))?;
        let email = self
            .author_email
            .clone()
            .ok_or_else(|| StoreError::MissingIdentity("GIT_AUTHOR_EMAIL not set".into()))?;

        Ok(Identity::new(name, email))
    }
}

/// Always the same author
#[derive(Debug, Clone, new)]
pub struct FixedIdentity(Identity);

impl IdentitySource for FixedIdentity {
    fn author(&self) -> Result<Identity> {
        Ok(self.0.clone())
    }
}

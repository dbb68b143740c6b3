//! API credential handling

use std::fmt;

use crate::{Error, Result};

/// API token passed to the remote command
///
/// `Debug` and `Display` never reveal the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Read the token from the process environment
    pub fn from_env(variable: &str) -> Result<Self> {
        Self::from_lookup(variable, |name| std::env::var(name).ok())
    }

    /// Read the token through `lookup`, rejecting missing or blank values
    pub fn from_lookup<F>(variable: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(variable) {
            Some(value) if !value.trim().is_empty() => Ok(Self(value.trim().to_string())),
            _ => Err(Error::configuration(format!(
                "Environment variable {} must hold the API token for remote uploads",
                variable
            ))),
        }
    }

    /// The raw value, for handing to the child process only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

impl fmt::Display for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

//! Reconciliation Scopes
//!
//! A scope is the isolation boundary within which logical IDs are unique
//! and reconciliation proceeds independently of other scopes (one cloud
//! account, one cluster). Each scope owns its own cache and store handles;
//! multiple scopes may reconcile concurrently.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::error::{CoreError, Result};
use crate::ids::LogicalId;

/// An isolation boundary for reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    /// Owning domain, e.g. one cloud account.
    pub domain: LogicalId,
    /// Optional sub-domain, e.g. one cluster inside the account.
    pub sub_domain: Option<LogicalId>,
}

impl Scope {
    /// Creates a scope for a domain.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyDomain`] if the domain identifier is empty.
    pub fn new(domain: impl Into<LogicalId>) -> Result<Self> {
        let domain = domain.into();
        if domain.is_empty() {
            return Err(CoreError::EmptyDomain);
        }
        Ok(Self {
            domain,
            sub_domain: None,
        })
    }

    /// Narrows the scope to a sub-domain.
    #[must_use]
    pub fn with_sub_domain(mut self, sub_domain: impl Into<LogicalId>) -> Self {
        self.sub_domain = Some(sub_domain.into());
        self
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.sub_domain {
            Some(sub) => write!(f, "{}/{}", self.domain, sub),
            None => write!(f, "{}", self.domain),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_display() {
        let scope = Scope::new("acct-1").unwrap().with_sub_domain("cluster-a");
        assert_eq!(scope.to_string(), "acct-1/cluster-a");
    }

    #[test]
    fn test_empty_domain_rejected() {
        assert!(matches!(Scope::new(""), Err(CoreError::EmptyDomain)));
    }
}

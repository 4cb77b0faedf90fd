//! Logs and log-sets discovered from the management API.

use serde::{Deserialize, Serialize};

/// A named grouping of logs owned by the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSet {
    /// Log-set identifier.
    pub id: String,
    /// Log-set display name.
    pub name: String,
}

impl LogSet {
    /// Creates a new log-set.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A log stream and the log-sets it is a member of.
///
/// A log may belong to zero, one, or many log-sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntity {
    /// Stable log identifier.
    pub id: String,
    /// Log display name.
    pub name: String,
    /// Log-sets this log belongs to, in listing order.
    #[serde(default)]
    pub logsets: Vec<LogSet>,
}

impl LogEntity {
    /// Creates a log with no log-set memberships.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            logsets: Vec::new(),
        }
    }

    /// Adds a log-set membership.
    pub fn with_logset(mut self, logset: LogSet) -> Self {
        self.logsets.push(logset);
        self
    }

    /// Returns the log-set names usage is attributed to.
    ///
    /// A log without memberships is attributed once, to an empty log-set
    /// name, so that it still produces a sample.
    pub fn membership_names(&self) -> Vec<&str> {
        if self.logsets.is_empty() {
            return vec![""];
        }
        self.logsets.iter().map(|set| set.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_names_in_listing_order() {
        let log = LogEntity::new("B", "beta")
            .with_logset(LogSet::new("1", "s1"))
            .with_logset(LogSet::new("2", "s2"));
        assert_eq!(log.membership_names(), vec!["s1", "s2"]);
    }

    #[test]
    fn test_orphan_log_has_single_membership() {
        let log = LogEntity::new("C", "gamma");
        assert_eq!(log.membership_names(), vec![""]);
    }
}

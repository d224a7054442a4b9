//! Policy persistence adapters
//!
//! An adapter is the storage backend supplying concrete policy rules. One
//! adapter instance is shared read-mostly across every domain's engine, so
//! implementations must be safe for concurrent use; the manager never
//! serializes adapter access on the engines' behalf.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{AuthzError, Result};

/// A single stored policy rule
///
/// `ptype` is the rule kind from the policy definition (`p` for policy
/// rules, `g` for grouping rules); `values` are the positional fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PolicyRule {
    /// Rule kind ("p", "g", ...)
    pub ptype: String,

    /// Positional rule fields (subject, object, action, ...)
    pub values: Vec<String>,
}

impl PolicyRule {
    /// Create a rule from a kind and its fields.
    pub fn new<I, S>(ptype: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ptype: ptype.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Policy persistence backend shared by all domains
#[async_trait]
pub trait PolicyAdapter: Send + Sync + std::fmt::Debug {
    /// Load the full rule set from the backend.
    async fn load_policy(&self) -> Result<Vec<PolicyRule>>;

    /// Replace the backend's rule set wholesale.
    async fn save_policy(&self, rules: &[PolicyRule]) -> Result<()>;

    /// Persist a single new rule.
    async fn add_rule(&self, rule: PolicyRule) -> Result<()>;

    /// Remove a single rule; removing an absent rule is not an error.
    async fn remove_rule(&self, rule: &PolicyRule) -> Result<()>;
}

/// In-memory adapter
///
/// Backing store for tests and for deployments that manage rules through
/// the CRUD surface only.
#[derive(Debug)]
pub struct MemoryAdapter {
    rules: RwLock<Vec<PolicyRule>>,
}

impl MemoryAdapter {
    /// Create an empty adapter.
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(Vec::new()),
        }
    }

    /// Create an adapter pre-seeded with rules.
    pub fn with_rules(rules: Vec<PolicyRule>) -> Self {
        Self {
            rules: RwLock::new(rules),
        }
    }

    /// Create a new adapter wrapped in Arc.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl Default for MemoryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PolicyAdapter for MemoryAdapter {
    async fn load_policy(&self) -> Result<Vec<PolicyRule>> {
        let rules = self.rules.read().await;
        Ok(rules.clone())
    }

    async fn save_policy(&self, rules: &[PolicyRule]) -> Result<()> {
        let mut stored = self.rules.write().await;
        *stored = rules.to_vec();
        Ok(())
    }

    async fn add_rule(&self, rule: PolicyRule) -> Result<()> {
        let mut stored = self.rules.write().await;
        if !stored.contains(&rule) {
            stored.push(rule);
        }
        Ok(())
    }

    async fn remove_rule(&self, rule: &PolicyRule) -> Result<()> {
        let mut stored = self.rules.write().await;
        stored.retain(|r| r != rule);
        Ok(())
    }
}

/// CSV file adapter
///
/// Reads rules from the stock comma-separated policy format:
///
/// ```text
/// p, alice, data1, read
/// p, bob, data2, write
/// g, alice, admin
/// ```
///
/// Incremental updates are not supported; `save_policy` rewrites the whole
/// file, matching the behavior of the original file-backed adapter.
#[derive(Debug)]
pub struct FileAdapter {
    path: PathBuf,
}

impl FileAdapter {
    /// Create an adapter over a policy file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse_line(line: &str) -> Option<PolicyRule> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let mut fields = line.split(',').map(str::trim);
        let ptype = fields.next()?.to_string();
        if ptype.is_empty() {
            return None;
        }

        Some(PolicyRule {
            ptype,
            values: fields.map(str::to_string).collect(),
        })
    }

    fn format_rule(rule: &PolicyRule) -> String {
        let mut line = rule.ptype.clone();
        for value in &rule.values {
            line.push_str(", ");
            line.push_str(value);
        }
        line
    }
}

#[async_trait]
impl PolicyAdapter for FileAdapter {
    async fn load_policy(&self) -> Result<Vec<PolicyRule>> {
        let text = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            AuthzError::PolicyLoad(format!(
                "failed to read policy file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let rules: Vec<PolicyRule> = text.lines().filter_map(Self::parse_line).collect();
        debug!("loaded {} rules from {}", rules.len(), self.path.display());
        Ok(rules)
    }

    async fn save_policy(&self, rules: &[PolicyRule]) -> Result<()> {
        let mut contents = String::new();
        for rule in rules {
            contents.push_str(&Self::format_rule(rule));
            contents.push('\n');
        }

        tokio::fs::write(&self.path, contents).await.map_err(|e| {
            AuthzError::Adapter(format!(
                "failed to write policy file {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    async fn add_rule(&self, _rule: PolicyRule) -> Result<()> {
        Err(AuthzError::Adapter(
            "file adapter does not support incremental updates; use save_policy".to_string(),
        ))
    }

    async fn remove_rule(&self, _rule: &PolicyRule) -> Result<()> {
        Err(AuthzError::Adapter(
            "file adapter does not support incremental updates; use save_policy".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_adapter_crud() {
        let adapter = MemoryAdapter::new();

        let rule = PolicyRule::new("p", ["alice", "data1", "read"]);
        adapter.add_rule(rule.clone()).await.unwrap();
        adapter.add_rule(rule.clone()).await.unwrap(); // duplicate ignored

        let rules = adapter.load_policy().await.unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0], rule);

        adapter.remove_rule(&rule).await.unwrap();
        assert!(adapter.load_policy().await.unwrap().is_empty());

        // Removing an absent rule is a no-op
        adapter.remove_rule(&rule).await.unwrap();
    }

    #[tokio::test]
    async fn test_file_adapter_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.csv");
        tokio::fs::write(&path, "# comment\np, alice, data1, read\n\ng, alice, admin\n")
            .await
            .unwrap();

        let adapter = FileAdapter::new(&path);
        let rules = adapter.load_policy().await.unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0], PolicyRule::new("p", ["alice", "data1", "read"]));
        assert_eq!(rules[1], PolicyRule::new("g", ["alice", "admin"]));
    }

    #[tokio::test]
    async fn test_file_adapter_missing_file_is_load_error() {
        let adapter = FileAdapter::new("/nonexistent/policy.csv");
        let err = adapter.load_policy().await.unwrap_err();
        assert!(matches!(err, AuthzError::PolicyLoad(_)));
    }

    #[tokio::test]
    async fn test_file_adapter_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.csv");

        let adapter = FileAdapter::new(&path);
        let rules = vec![
            PolicyRule::new("p", ["alice", "data1", "read"]),
            PolicyRule::new("p", ["bob", "data2", "write"]),
        ];
        adapter.save_policy(&rules).await.unwrap();

        assert_eq!(adapter.load_policy().await.unwrap(), rules);
    }

    #[tokio::test]
    async fn test_file_adapter_rejects_incremental_updates() {
        let adapter = FileAdapter::new("/tmp/unused.csv");
        let rule = PolicyRule::new("p", ["alice", "data1", "read"]);
        assert!(adapter.add_rule(rule.clone()).await.is_err());
        assert!(adapter.remove_rule(&rule).await.is_err());
    }
}

//! Policy engine capability traits and the reference engine
//!
//! The manager only cares about lifecycle: an engine is built from a model
//! and the shared adapter, told to load its rules, and then asked access
//! questions. Both sides of that contract are traits so alternative
//! evaluation libraries can be dropped in without touching the manager.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::adapter::{PolicyAdapter, PolicyRule};
use crate::error::{AuthzError, Result};
use crate::model::Model;

/// A constructed, per-domain authorization engine
#[async_trait]
pub trait PolicyEngine: Send + Sync + std::fmt::Debug {
    /// Load (or reload) the rule set from the adapter into the engine.
    async fn load_policy(&self) -> Result<()>;

    /// Answer whether `subject` may perform `action` on `object`.
    async fn enforce(&self, subject: &str, object: &str, action: &str) -> Result<bool>;

    /// Number of rules currently loaded.
    async fn rule_count(&self) -> usize;
}

/// Builds engines from a parsed model and the shared adapter
///
/// Construction must not load policies; the manager triggers the load as a
/// separate, explicit step so load failures can be told apart from
/// construction failures.
#[async_trait]
pub trait EngineFactory: Send + Sync {
    /// Construct an engine for the given model/adapter pairing.
    async fn build(
        &self,
        model: Model,
        adapter: Arc<dyn PolicyAdapter>,
    ) -> Result<Arc<dyn PolicyEngine>>;
}

/// Reference engine: positional wildcard matching
///
/// Matches the first three fields of each `p` rule against the request
/// triple. A field of `*` matches anything; embedded `*` expands to a
/// regex wildcard. Allow-on-first-match, deny when nothing matches.
/// Deliberately minimal; richer evaluation semantics belong to external
/// engine implementations behind [`PolicyEngine`].
#[derive(Debug)]
pub struct MatcherEngine {
    model: Model,
    adapter: Arc<dyn PolicyAdapter>,
    rules: RwLock<Vec<PolicyRule>>,
}

impl MatcherEngine {
    fn new(model: Model, adapter: Arc<dyn PolicyAdapter>) -> Self {
        Self {
            model,
            adapter,
            rules: RwLock::new(Vec::new()),
        }
    }

    /// The model this engine was built from.
    pub fn model(&self) -> &Model {
        &self.model
    }

    fn matches_pattern(pattern: &str, value: &str) -> bool {
        if pattern == "*" {
            return true;
        }

        if pattern.contains('*') {
            let regex_pattern = pattern.replace('.', r"\.").replace('*', ".*");
            if let Ok(regex) = regex::Regex::new(&format!("^{}$", regex_pattern)) {
                return regex.is_match(value);
            }
        }

        pattern == value
    }
}

#[async_trait]
impl PolicyEngine for MatcherEngine {
    async fn load_policy(&self) -> Result<()> {
        let loaded = self.adapter.load_policy().await.map_err(|e| match e {
            AuthzError::PolicyLoad(_) => e,
            other => AuthzError::PolicyLoad(other.to_string()),
        })?;

        let mut rules = self.rules.write().await;
        *rules = loaded;
        debug!("engine loaded {} rules", rules.len());

        Ok(())
    }

    async fn enforce(&self, subject: &str, object: &str, action: &str) -> Result<bool> {
        let rules = self.rules.read().await;

        for rule in rules.iter().filter(|r| r.ptype == "p") {
            if rule.values.len() < 3 {
                continue;
            }

            if Self::matches_pattern(&rule.values[0], subject)
                && Self::matches_pattern(&rule.values[1], object)
                && Self::matches_pattern(&rule.values[2], action)
            {
                return Ok(true);
            }
        }

        Ok(false)
    }

    async fn rule_count(&self) -> usize {
        let rules = self.rules.read().await;
        rules.len()
    }
}

/// Factory for [`MatcherEngine`]
pub struct MatcherEngineFactory;

impl MatcherEngineFactory {
    /// Create the factory wrapped in Arc, ready for injection.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self)
    }
}

#[async_trait]
impl EngineFactory for MatcherEngineFactory {
    async fn build(
        &self,
        model: Model,
        adapter: Arc<dyn PolicyAdapter>,
    ) -> Result<Arc<dyn PolicyEngine>> {
        // Positional matching needs at least a (sub, obj, act) triple on
        // both sides of the model.
        if model.request_tokens().len() < 3 {
            return Err(AuthzError::EngineConstruction(
                "matcher engine requires a request definition with at least 3 tokens".to_string(),
            ));
        }
        if model.policy_tokens().len() < 3 {
            return Err(AuthzError::EngineConstruction(
                "matcher engine requires a policy definition with at least 3 tokens".to_string(),
            ));
        }

        Ok(Arc::new(MatcherEngine::new(model, adapter)))
    }
}

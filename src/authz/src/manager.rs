//! Per-domain enforcer lifecycle manager
//!
//! Many domains share one persistence adapter while keeping their policy
//! model and loaded rules isolated. The manager constructs each domain's
//! engine at most once, lazily, and freezes the domain's config once its
//! engine exists. One manager instance owns all of this state; construct it
//! at startup and hand out references; there is no process-wide singleton.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::adapter::PolicyAdapter;
use crate::engine::{EngineFactory, PolicyEngine};
use crate::error::{AuthzError, Result};
use crate::model::Model;

/// Model source for one domain
///
/// At least one field must be non-empty. When both are set, `model_text`
/// wins: inline definitions skip the file read entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainConfig {
    /// Path to a model definition file
    pub model_path: String,

    /// Inline model definition text (takes precedence over `model_path`)
    pub model_text: String,
}

impl DomainConfig {
    /// Config carrying an inline model definition.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            model_text: text.into(),
            ..Default::default()
        }
    }

    /// Config pointing at a model definition file.
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            model_path: path.into(),
            ..Default::default()
        }
    }

    /// Whether at least one model source is set.
    pub fn is_valid(&self) -> bool {
        !self.model_text.is_empty() || !self.model_path.is_empty()
    }
}

/// The two per-domain maps, guarded together.
///
/// A single manager-wide lock protects both: the state machine (configured
/// → constructed → frozen) has to observe and mutate them atomically, and
/// per-domain locks would need their own synchronized creation, which just
/// moves the race one level down.
struct ManagerState {
    configs: HashMap<String, DomainConfig>,
    engines: HashMap<String, Arc<dyn PolicyEngine>>,
}

/// Manages one lazily-constructed policy engine per domain
pub struct EnforcerManager {
    state: RwLock<ManagerState>,
    adapter: Arc<dyn PolicyAdapter>,
    factory: Arc<dyn EngineFactory>,
    default_domain: String,
}

impl EnforcerManager {
    /// Create a manager with injected collaborators.
    ///
    /// The adapter is shared read-mostly across every domain's engine and
    /// must be safe for concurrent use; the manager serializes only its own
    /// construction path, never adapter access.
    pub fn new(
        adapter: Arc<dyn PolicyAdapter>,
        factory: Arc<dyn EngineFactory>,
        default_domain: impl Into<String>,
    ) -> Self {
        Self {
            state: RwLock::new(ManagerState {
                configs: HashMap::new(),
                engines: HashMap::new(),
            }),
            adapter,
            factory,
            default_domain: default_domain.into(),
        }
    }

    /// The domain `get_default` resolves to.
    pub fn default_domain(&self) -> &str {
        &self.default_domain
    }

    // Emptiness is the only rule enforced on domain names today; a
    // stricter charset can slot in here without touching callers.
    fn validate_domain(&self, domain: &str) -> Result<()> {
        if domain.is_empty() {
            return Err(AuthzError::InvalidDomain);
        }
        Ok(())
    }

    /// Register the model config for a domain, prior to construction.
    ///
    /// Overwrites any pending config for the domain. Fails with
    /// [`AuthzError::ConfigAlreadyFinalized`] once the domain's engine
    /// exists, leaving the stored config untouched.
    pub async fn set_config(&self, domain: &str, config: DomainConfig) -> Result<()> {
        self.validate_domain(domain)?;
        if !config.is_valid() {
            return Err(AuthzError::InvalidConfig);
        }

        let mut state = self.state.write().await;

        if state.engines.contains_key(domain) {
            error!(
                "cannot set config for domain {}: enforcer already exists",
                domain
            );
            return Err(AuthzError::ConfigAlreadyFinalized(domain.to_string()));
        }

        state.configs.insert(domain.to_string(), config);
        info!("domain config set for domain: {}", domain);

        Ok(())
    }

    /// Look up the stored config for a domain. Pure read, no side effects.
    pub async fn get_config(&self, domain: &str) -> Option<DomainConfig> {
        let state = self.state.read().await;
        state.configs.get(domain).cloned()
    }

    /// Whether an engine has been constructed for the domain.
    pub async fn has_engine(&self, domain: &str) -> bool {
        let state = self.state.read().await;
        state.engines.contains_key(domain)
    }

    /// Get the domain's engine, constructing it on first use.
    ///
    /// Uses double-checked locking: the hot path is a shared-lock lookup;
    /// on a miss the manager-wide exclusive lock is taken and the map
    /// re-checked, because another task may have finished construction
    /// while this one waited and two missed readers must not both build.
    /// Construction runs under the exclusive lock, so at most one
    /// construction of any kind is in flight at a time. A failed
    /// construction publishes nothing; the next call retries from the
    /// stored config.
    ///
    /// A miss may block behind another caller's in-flight construction,
    /// bounded by one model parse plus one policy load. No timeout is
    /// imposed here; callers that need a deadline wrap this call, and
    /// adapters own the deadlines of their backend I/O.
    pub async fn get_or_create(&self, domain: &str) -> Result<Arc<dyn PolicyEngine>> {
        self.validate_domain(domain)?;

        // First check: shared lock only
        {
            let state = self.state.read().await;
            if let Some(engine) = state.engines.get(domain) {
                debug!("enforcer found for domain: {}", domain);
                return Ok(Arc::clone(engine));
            }
        }

        // Miss: exclusive lock, then the double check
        let mut state = self.state.write().await;
        if let Some(engine) = state.engines.get(domain) {
            debug!(
                "enforcer already created by another task for domain: {}",
                domain
            );
            return Ok(Arc::clone(engine));
        }

        let Some(config) = state.configs.get(domain).cloned() else {
            error!("no config found for domain: {}", domain);
            return Err(AuthzError::NoConfigForDomain(domain.to_string()));
        };

        info!("creating new enforcer for domain: {}", domain);
        let engine = match self.build_engine(domain, &config).await {
            Ok(engine) => engine,
            Err(e) => {
                error!("failed to create enforcer for domain {}: {}", domain, e);
                return Err(e);
            }
        };

        state.engines.insert(domain.to_string(), Arc::clone(&engine));
        info!("enforcer created successfully for domain: {}", domain);

        Ok(engine)
    }

    /// Get the engine for the default domain.
    pub async fn get_default(&self) -> Result<Arc<dyn PolicyEngine>> {
        self.get_or_create(&self.default_domain).await
    }

    /// Atomically register a config and construct the engine.
    ///
    /// Unlike [`set_config`](Self::set_config) + [`get_or_create`](Self::get_or_create)
    /// this rejects a pre-existing engine with [`AuthzError::AlreadyExists`]
    /// instead of silently reusing it: the caller is asserting fresh
    /// creation. On construction failure the stored config is rolled back,
    /// returning the domain to unconfigured rather than configured-but-broken.
    pub async fn create_with_config(
        &self,
        domain: &str,
        config: DomainConfig,
    ) -> Result<Arc<dyn PolicyEngine>> {
        self.validate_domain(domain)?;
        if !config.is_valid() {
            return Err(AuthzError::InvalidConfig);
        }

        let mut state = self.state.write().await;

        if state.engines.contains_key(domain) {
            error!("enforcer already exists for domain: {}", domain);
            return Err(AuthzError::AlreadyExists(domain.to_string()));
        }

        state.configs.insert(domain.to_string(), config.clone());

        info!(
            "creating new enforcer with custom config for domain: {}",
            domain
        );
        match self.build_engine(domain, &config).await {
            Ok(engine) => {
                state.engines.insert(domain.to_string(), Arc::clone(&engine));
                info!("enforcer created successfully for domain: {}", domain);
                Ok(engine)
            }
            Err(e) => {
                state.configs.remove(domain);
                error!("failed to create enforcer for domain {}: {}", domain, e);
                Err(e)
            }
        }
    }

    /// Construction pipeline: model → engine → policy load.
    ///
    /// Callers serialize construction by holding the state write lock
    /// across this call. The pipeline touches no manager state itself, so
    /// on failure there is nothing to unwind here; the partially built
    /// engine is simply dropped.
    async fn build_engine(
        &self,
        domain: &str,
        config: &DomainConfig,
    ) -> Result<Arc<dyn PolicyEngine>> {
        // The store validates configs on the way in; construction is the
        // last gate before an engine is published, so check again.
        if !config.is_valid() {
            return Err(AuthzError::InvalidConfig);
        }

        let model = if !config.model_text.is_empty() {
            info!("creating enforcer for domain {} with model text", domain);
            Model::from_text(&config.model_text)?
        } else {
            info!(
                "creating enforcer for domain {} with model path: {}",
                domain, config.model_path
            );
            Model::from_path(&config.model_path).await?
        };

        let engine = self.factory.build(model, Arc::clone(&self.adapter)).await?;

        engine.load_policy().await?;

        Ok(engine)
    }
}

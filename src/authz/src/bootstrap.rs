//! Startup wiring for the enforcer manager
//!
//! Registers every configured domain and eagerly constructs the ones
//! flagged `auto_load`. Warm-up is best effort: a domain that fails to
//! build is logged and skipped so one broken model cannot take down
//! startup for the domains whose config is valid.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::adapter::PolicyAdapter;
use crate::config::AuthzConfig;
use crate::engine::EngineFactory;
use crate::manager::{DomainConfig, EnforcerManager};

/// Build an [`EnforcerManager`] from the `[authz]` config section.
///
/// Entries with neither model source set are skipped. Lazily-loaded
/// domains are only registered; `auto_load` domains are constructed
/// immediately, with failures downgraded to warnings.
pub async fn init_manager(
    adapter: Arc<dyn PolicyAdapter>,
    factory: Arc<dyn EngineFactory>,
    config: &AuthzConfig,
) -> Arc<EnforcerManager> {
    let manager = Arc::new(EnforcerManager::new(
        adapter,
        factory,
        config.default_domain(),
    ));

    for domain in &config.domains {
        let domain_config = DomainConfig {
            model_path: domain.model_path.clone(),
            model_text: domain.model_text.clone(),
        };

        if !domain_config.is_valid() {
            debug!(
                "skipping domain {} with no model source configured",
                domain.name
            );
            continue;
        }

        if let Err(e) = manager.set_config(&domain.name, domain_config).await {
            warn!("failed to set config for domain {}: {}", domain.name, e);
            continue;
        }

        if domain.auto_load {
            if let Err(e) = manager.get_or_create(&domain.name).await {
                // Best-effort warm-up: log and keep going
                warn!("failed to create enforcer for domain {}: {}", domain.name, e);
            }
        }
    }

    manager
}

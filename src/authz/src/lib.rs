//! # Domainguard Authorization Core
//!
//! Multi-domain authorization engine lifecycle management.
//!
//! ## Features
//!
//! - **Per-domain policy engines**: each tenant gets an isolated model and
//!   rule set over one shared persistence adapter
//! - **Lazy, at-most-once construction**: double-checked locking makes the
//!   first concurrent access build exactly one engine
//! - **Write-once configuration**: a domain's config freezes the moment
//!   its engine exists
//! - **Pluggable backends**: engines and adapters are capability traits;
//!   a reference wildcard-matcher engine and memory/file adapters ship
//!   in-crate
//! - **Config-driven warm-up**: `auto_load` domains build eagerly at
//!   startup, best effort
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use domainguard_authz::adapter::{MemoryAdapter, PolicyRule};
//! use domainguard_authz::engine::MatcherEngineFactory;
//! use domainguard_authz::manager::{DomainConfig, EnforcerManager};
//!
//! const MODEL: &str = r#"
//! [request_definition]
//! r = sub, obj, act
//!
//! [policy_definition]
//! p = sub, obj, act
//!
//! [policy_effect]
//! e = some(where (p.eft == allow))
//!
//! [matchers]
//! m = r.sub == p.sub && r.obj == p.obj && r.act == p.act
//! "#;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = Arc::new(MemoryAdapter::with_rules(vec![
//!         PolicyRule::new("p", ["alice", "data1", "read"]),
//!     ]));
//!     let manager =
//!         EnforcerManager::new(adapter, MatcherEngineFactory::new_shared(), "default");
//!
//!     manager
//!         .set_config("default", DomainConfig::from_text(MODEL))
//!         .await?;
//!
//!     let engine = manager.get_default().await?;
//!     assert!(engine.enforce("alice", "data1", "read").await?);
//!     assert!(!engine.enforce("bob", "data1", "read").await?);
//!
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod bootstrap;
pub mod config;
pub mod engine;
pub mod error;
pub mod manager;
pub mod model;

// Re-export commonly used types
pub use adapter::{FileAdapter, MemoryAdapter, PolicyAdapter, PolicyRule};
pub use config::{AuthzConfig, DomainEntry, DEFAULT_DOMAIN};
pub use engine::{EngineFactory, MatcherEngine, MatcherEngineFactory, PolicyEngine};
pub use error::{AuthzError, Result};
pub use manager::{DomainConfig, EnforcerManager};
pub use model::Model;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Error types for the authorization lifecycle core

use thiserror::Error;

/// Authorization manager errors
///
/// The manager never retries internally and never substitutes a default
/// engine on failure; every error here is returned to the immediate caller
/// so the authorization layer can fail closed.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// Empty or malformed domain key; rejected before any state mutation
    #[error("invalid domain name")]
    InvalidDomain,

    /// Neither model text nor model path set in the domain config
    #[error("domain config requires model_text or model_path")]
    InvalidConfig,

    /// `get_or_create` called before any config was registered
    #[error("no config found for domain: {0}")]
    NoConfigForDomain(String),

    /// `create_with_config` called for a domain whose engine already exists
    #[error("enforcer already exists for domain: {0}")]
    AlreadyExists(String),

    /// Config change attempted after the engine was constructed
    #[error("config already set for domain with existing enforcer: {0}")]
    ConfigAlreadyFinalized(String),

    /// Model definition (text or file) is syntactically invalid
    #[error("failed to parse model: {0}")]
    ModelParse(String),

    /// Adapter failed to supply policy rules during construction
    #[error("failed to load policy: {0}")]
    PolicyLoad(String),

    /// The underlying engine rejected the model/adapter pairing
    #[error("failed to create enforcer: {0}")]
    EngineConstruction(String),

    /// Adapter persistence error outside the construction path
    #[error("adapter error: {0}")]
    Adapter(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for authorization lifecycle operations
pub type Result<T> = std::result::Result<T, AuthzError>;

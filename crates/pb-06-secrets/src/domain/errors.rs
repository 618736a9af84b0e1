use pb_02_bls_signer::BlsError;
use thiserror::Error;

use super::config::SecretsManagerType;
use super::names::SecretName;

#[derive(Debug, Error)]
pub enum SecretsError {
    #[error("Secret {name} not found")]
    NotFound { name: SecretName },

    #[error("Secret {name} already exists")]
    AlreadyExists { name: SecretName },

    #[error("Secrets \"{name}\" has been already initialized")]
    AlreadyInitialized { name: SecretName },

    #[error("Unsupported secrets manager: {kind}")]
    UnsupportedBackend { kind: SecretsManagerType },

    #[error("Secrets manager config is missing {0}")]
    MissingConfig(&'static str),

    #[error("Invalid {name} material: {reason}")]
    InvalidKey { name: SecretName, reason: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Bls(#[from] BlsError),
}

pub type SecretsResult<T> = Result<T, SecretsError>;

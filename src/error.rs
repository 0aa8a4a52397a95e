//! Error types.

use crate::provider::ProviderError;
use axum::extract::rejection::JsonRejection;

/// Error enumerates the possible Angel Crab error states.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Returned when a challenge's `config` can't be decoded as a
    /// [`ProviderConfig`][crate::solver::credentials::ProviderConfig].
    #[error("error decoding solver config: {0}")]
    ConfigDecode(#[source] serde_json::Error),

    /// Returned when the secret named by a challenge's `secretName` doesn't exist in the
    /// challenge's resource namespace.
    #[error("secret \"{namespace}/{name}\" not found")]
    SecretNotFound { namespace: String, name: String },

    /// Returned when a secret exists but lacks one of the required credential keys
    /// (`account-name`, `api-key`).
    #[error("key {0:?} not found in secret data")]
    SecretFieldMissing(String),

    /// Returned when a [`FileSecretStore`][crate::secret_store::FileSecretStore] value isn't
    /// valid standard BASE64.
    #[error("secret \"{namespace}/{name}\" key {key:?} is not valid base64")]
    InvalidSecretEncoding {
        namespace: String,
        name: String,
        key: String,
        #[source]
        source: base64::DecodeError,
    },

    /// Returned when the cluster API fails while reading a secret for any reason other than the
    /// secret not existing.
    #[error("cluster API error: {0}")]
    Kube(#[from] kube::Error),

    /// Returned when the remote DNS provider lookup or mutation fails.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Returned when a challenge needs the secret store before
    /// [`Solver::initialize`][crate::solver::Solver::initialize] was called.
    #[error("solver has not been initialized")]
    NotInitialized,

    /// Returned for challenges received after the shutdown signal was raised.
    #[error("solver is shutting down")]
    ShuttingDown,

    /// Returned when neither the `GROUP_NAME` environment variable nor
    /// [`Config::group_name`][crate::config::Config::group_name] is set.
    #[error("GROUP_NAME must be specified")]
    MissingGroupName,

    /// Returned when the host controller addresses an API group this webhook doesn't serve.
    #[error("unknown API group \"{0}\"")]
    UnknownGroup(String),

    /// Returned when the host controller addresses a solver name that isn't registered.
    #[error("no solver registered as \"{0}\"")]
    UnknownSolver(String),

    /// Returned when clients `POST` invalid JSON.
    #[error(transparent)]
    JsonExtractorRejection(#[from] JsonRejection),

    /// Returned when a generic IO error occurs.
    #[error("an IO error occurred")]
    IO(#[from] std::io::Error),

    /// Returned when processing JSON from disk (e.g. to
    /// [trying to load a `Config`][crate::config::Config::try_from_file], or to
    /// [trying to load a `FileSecretStore`][crate::secret_store::FileSecretStore::try_from_file])
    /// fails due to invalid JSON content.
    #[error("invalid JSON")]
    InvalidJSON(#[from] serde_json::Error),
}

//! Namespace-scoped secret lookup.
//!
//! Challenges that don't embed provider credentials name a secret instead. The secret is
//! resolved in the challenge's resource namespace through a [`SecretStore`].
//!
//! Three implementations are provided. [`memory::InMemorySecretStore`] holds secrets in memory,
//! [`file::FileSecretStore`] loads them from a JSON file on startup, and
//! [`cluster::KubeSecretStore`] reads `v1/Secret` objects through the cluster API.

use crate::error::Error;
use std::collections::HashMap;
use std::sync::Arc;

pub mod file;
pub mod cluster;
pub mod memory;

#[allow(clippy::module_name_repetitions)]
pub use cluster::KubeSecretStore;
#[allow(clippy::module_name_repetitions)]
pub use file::FileSecretStore;
#[allow(clippy::module_name_repetitions)]
pub use memory::InMemorySecretStore;

/// The decoded payload of a secret: key to raw bytes.
pub type SecretData = HashMap<String, Vec<u8>>;

/// `DynSecretStore` is a type alias for a [`SecretStore`] shared between solvers.
#[allow(clippy::module_name_repetitions)]
pub type DynSecretStore = Arc<dyn SecretStore + Send + Sync>;

/// An async trait describing read access to secrets, keyed by namespace and name.
#[async_trait::async_trait]
#[allow(clippy::module_name_repetitions)]
pub trait SecretStore {
    /// Get the data of the secret `name` in `namespace`.
    ///
    /// Returns [`Error::SecretNotFound`] when no such secret exists.
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<SecretData, Error>;
}

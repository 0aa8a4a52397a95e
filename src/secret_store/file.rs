//! A JSON file-backed implementation of the [`SecretStore`][super::SecretStore] trait.
//!
//! Wraps a [`InMemorySecretStore`][super::memory::InMemorySecretStore] populated from a JSON file
//! on disk when the store is loaded.
use crate::error::Error;
use crate::secret_store::memory::InMemorySecretStore;
use crate::secret_store::{SecretData, SecretStore};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::HashMap;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// On-disk layout: namespace, then secret name, then key to BASE64 value (the same encoding a
/// Kubernetes `Secret` uses for its `data` field).
type SecretFile = HashMap<String, HashMap<String, HashMap<String, String>>>;

/// A file-backed secret store for running outside a cluster. The file is read once, by
/// [`FileSecretStore::try_from_file`]; later edits need a restart.
#[derive(Default, Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct FileSecretStore {
    secret_store: InMemorySecretStore,
    path: String,
}

impl FileSecretStore {
    /// Load a [`FileSecretStore`] from the JSON secrets file located at the given path, or
    /// return an Error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IO`] if the path can't be opened or read.
    ///
    /// Returns [`Error::InvalidJSON`] if the secrets file is invalid.
    ///
    /// Returns [`Error::InvalidSecretEncoding`] if a secret value isn't valid BASE64.
    pub async fn try_from_file(p: &str) -> Result<Self, Error> {
        let mut contents = vec![];
        File::open(p).await?.read_to_end(&mut contents).await?;
        let raw: SecretFile = serde_json::from_slice(&contents)?;
        Ok(Self {
            path: p.to_string(),
            secret_store: Self::decode(raw)?,
        })
    }

    /// The path the store was loaded from.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    fn decode(raw: SecretFile) -> Result<InMemorySecretStore, Error> {
        let mut secret_store = InMemorySecretStore::default();
        for (namespace, secrets) in raw {
            for (name, encoded) in secrets {
                let mut data = SecretData::with_capacity(encoded.len());
                for (key, value) in encoded {
                    let decoded = STANDARD.decode(value.as_bytes()).map_err(|source| {
                        Error::InvalidSecretEncoding {
                            namespace: namespace.clone(),
                            name: name.clone(),
                            key: key.clone(),
                            source,
                        }
                    })?;
                    data.insert(key, decoded);
                }
                secret_store.insert(&namespace, &name, data);
            }
        }
        Ok(secret_store)
    }
}

#[async_trait::async_trait]
impl SecretStore for FileSecretStore {
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<SecretData, Error> {
        self.secret_store.get_secret(namespace, name).await
    }
}

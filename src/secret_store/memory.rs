use crate::error::Error;
use crate::secret_store::{SecretData, SecretStore};
use std::collections::HashMap;

#[derive(Default, Debug, Clone)]
pub struct InMemorySecretStore {
    secrets: HashMap<String, HashMap<String, SecretData>>,
}

impl InMemorySecretStore {
    /// Add or replace the secret `name` in `namespace`.
    pub fn insert(&mut self, namespace: &str, name: &str, data: SecretData) {
        self.secrets
            .entry(namespace.to_string())
            .or_default()
            .insert(name.to_string(), data);
    }
}

#[async_trait::async_trait]
impl SecretStore for InMemorySecretStore {
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<SecretData, Error> {
        self.secrets
            .get(namespace)
            .and_then(|secrets| secrets.get(name))
            .cloned()
            .ok_or_else(|| Error::SecretNotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }
}

//! A [`SecretStore`][super::SecretStore] reading `v1/Secret` objects from the Kubernetes API.
use crate::error::Error;
use crate::secret_store::{SecretData, SecretStore};
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};

#[derive(Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct KubeSecretStore {
    client: Client,
}

impl KubeSecretStore {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connect using the in-cluster service account, or the local kubeconfig when running
    /// outside a cluster.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Kube`] if no usable cluster configuration is found.
    pub async fn try_default() -> Result<Self, Error> {
        Ok(Self::new(Client::try_default().await?))
    }
}

#[async_trait::async_trait]
impl SecretStore for KubeSecretStore {
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<SecretData, Error> {
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        match secrets.get(name).await {
            Ok(secret) => Ok(secret
                .data
                .unwrap_or_default()
                .into_iter()
                .map(|(key, value)| (key, value.0))
                .collect()),
            Err(kube::Error::Api(ae)) if ae.code == 404 => Err(Error::SecretNotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            }),
            Err(err) => Err(err.into()),
        }
    }
}

use crate::error::Error;
use crate::provider::netangels::Endpoints;
use crate::secret_store::{DynSecretStore, FileSecretStore, KubeSecretStore};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

pub type Shared = Arc<Config>;

/// Environment variable naming the API group the webhook serves. Takes precedence over
/// [`Config::group_name`].
pub const GROUP_NAME_ENV: &str = "GROUP_NAME";

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub api_bind_addr: SocketAddr,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub secret_store: SecretStoreConfig,
    #[serde(default)]
    pub netangels: Endpoints,
}

/// Where credential secrets are read from.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SecretStoreConfig {
    /// `v1/Secret` objects in the cluster the webhook runs in.
    #[default]
    Kubernetes,
    /// A JSON file, see [`FileSecretStore`].
    File { path: String },
}

impl Config {
    pub fn try_from_file(p: impl AsRef<Path>) -> Result<Self, Error> {
        let f = File::open(p)?;
        let reader = BufReader::new(f);
        let conf: Config = serde_json::from_reader(reader)?;
        Ok(conf)
    }

    /// The API group to serve: `GROUP_NAME` from the environment if set and non-empty, else the
    /// configured `group_name`.
    pub fn group_name(&self) -> Result<String, Error> {
        Self::pick_group_name(std::env::var(GROUP_NAME_ENV).ok(), self.group_name.as_deref())
    }

    fn pick_group_name(env: Option<String>, configured: Option<&str>) -> Result<String, Error> {
        env.filter(|g| !g.is_empty())
            .or_else(|| configured.filter(|g| !g.is_empty()).map(str::to_string))
            .ok_or(Error::MissingGroupName)
    }

    pub async fn secret_store(&self) -> Result<DynSecretStore, Error> {
        let secret_store: DynSecretStore = match &self.secret_store {
            SecretStoreConfig::Kubernetes => Arc::new(KubeSecretStore::try_default().await?),
            SecretStoreConfig::File { path } => {
                Arc::new(FileSecretStore::try_from_file(path).await?)
            }
        };
        Ok(secret_store)
    }
}

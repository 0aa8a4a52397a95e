//! Provider account credential resolution.
//!
//! Credentials come from one of two places, checked in order:
//!
//! 1. Inline in the challenge `config`, when it carries both `accountName` and `apiKey`.
//! 2. A secret named by the challenge `config`'s `secretName`, read from the challenge's resource
//!    namespace. The secret must hold both `account-name` and `api-key`.
//!
//! E.g. an issuer solver config of:
//! ```json
//! { "secretName": "netangels-credentials" }
//! ```
//!
//! with a secret `netangels-credentials` in the certificate's namespace holding `account-name`
//! and `api-key` keys.
use crate::error::Error;
use crate::secret_store::{SecretData, SecretStore};
use crate::solver::ChallengeRequest;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, error};

pub const ACCOUNT_NAME_KEY: &str = "account-name";
pub const API_KEY_KEY: &str = "api-key";

/// The provider specific part of a challenge. Every field is optional.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    #[serde(default, rename = "secretName")]
    pub secret_ref: String,
    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub api_key: String,
}

/// A provider account.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub account_name: String,
    pub api_key: String,
}

impl Credentials {
    /// True unless both the account name and API key are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.account_name.is_empty() || self.api_key.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account_name", &self.account_name)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Decode a challenge's `config`. An absent config decodes to [`ProviderConfig::default`].
///
/// # Errors
///
/// Returns [`Error::ConfigDecode`] if the config isn't an object of the expected shape.
pub fn load_config(config: Option<&serde_json::Value>) -> Result<ProviderConfig, Error> {
    debug!("loading solver config");
    match config {
        None => Ok(ProviderConfig::default()),
        Some(config) => ProviderConfig::deserialize(config).map_err(|err| {
            error!("error decoding solver config: {err}");
            Error::ConfigDecode(err)
        }),
    }
}

fn string_from_secret_data(data: &SecretData, key: &str) -> Result<String, Error> {
    match data.get(key) {
        Some(value) => Ok(String::from_utf8_lossy(value).into_owned()),
        None => {
            error!("key {key:?} not found in secret data");
            Err(Error::SecretFieldMissing(key.to_string()))
        }
    }
}

/// Resolve the provider account for a challenge. The secret store is only consulted when the
/// challenge doesn't carry inline credentials.
///
/// # Errors
///
/// Returns [`Error::ConfigDecode`] for a malformed challenge config.
///
/// Returns [`Error::NotInitialized`] if a secret is needed but no store was supplied.
///
/// Returns [`Error::SecretNotFound`] or [`Error::SecretFieldMissing`] if the referenced secret
/// doesn't exist or lacks a required key, or any other error of the secret store.
pub async fn resolve(
    challenge: &ChallengeRequest,
    secret_store: Option<&(dyn SecretStore + Send + Sync)>,
) -> Result<Credentials, Error> {
    let cfg = load_config(challenge.config.as_ref())?;
    if !cfg.account_name.is_empty() && !cfg.api_key.is_empty() {
        debug!("loading API credentials from config");
        return Ok(Credentials {
            account_name: cfg.account_name,
            api_key: cfg.api_key,
        });
    }

    let namespace = &challenge.resource_namespace;
    let secret_name = &cfg.secret_ref;
    debug!("loading API credentials from secret \"{namespace}/{secret_name}\"");
    let secret_store = secret_store.ok_or(Error::NotInitialized)?;
    let data = secret_store.get_secret(namespace, secret_name).await?;
    Ok(Credentials {
        account_name: string_from_secret_data(&data, ACCOUNT_NAME_KEY)?,
        api_key: string_from_secret_data(&data, API_KEY_KEY)?,
    })
}

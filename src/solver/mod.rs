//! DNS-01 challenge solvers.
//!
//! A [`Solver`] publishes and withdraws the `TXT` record for an [RFC-8555][RFC-8555] [DNS-01]
//! challenge on behalf of the host controller. Solvers keep no record state of their own: the
//! DNS provider is looked up on every call, so both operations are safe to repeat and safe to
//! run from several processes at once.
//!
//! [RFC-8555]: https://www.rfc-editor.org/rfc/rfc8555
//! [DNS-01]: https://www.rfc-editor.org/rfc/rfc8555#section-8.4

use crate::error::Error;
use crate::secret_store::DynSecretStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

pub mod credentials;
pub mod netangels;

pub use netangels::NetangelsSolver;

/// Receiving half of the process shutdown signal. Holds `true` once shutdown has begun.
pub type Shutdown = watch::Receiver<bool>;

/// `DynSolver` is a type alias for a [`Solver`] shared by the [HTTP API][crate::api] handlers.
#[allow(clippy::module_name_repetitions)]
pub type DynSolver = Arc<dyn Solver + Send + Sync>;

/// What the host controller asks of a solver.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Present,
    CleanUp,
}

/// A challenge as supplied by the host controller. Immutable for the duration of a call.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequest {
    #[serde(default)]
    pub uid: String,
    pub action: Action,
    #[serde(default, rename = "type")]
    pub challenge_type: String,
    #[serde(default)]
    pub dns_name: String,
    /// The expected `TXT` record value.
    pub key: String,
    #[serde(default)]
    pub resource_prefix: String,
    /// The name the `TXT` record is published under, e.g. `_acme-challenge.example.com.`.
    #[serde(rename = "resolvedFQDN")]
    pub resolved_fqdn: String,
    #[serde(default)]
    pub resolved_zone: String,
    #[serde(default)]
    pub allow_ambient_credentials: bool,
    /// The namespace secret references in `config` are resolved in.
    #[serde(default)]
    pub resource_namespace: String,
    /// Provider specific configuration, see [`credentials::ProviderConfig`].
    #[serde(default)]
    pub config: Option<serde_json::Value>,
}

/// A pluggable DNS-01 challenge solver for one DNS provider.
#[async_trait::async_trait]
pub trait Solver {
    /// The name the host controller routes this provider's challenges by.
    fn name(&self) -> &str;

    /// Hand the solver its secret store and shutdown signal. Called once, before the solver is
    /// shared.
    ///
    /// # Errors
    ///
    /// Implementations may refuse the supplied capabilities.
    fn initialize(&mut self, secret_store: DynSecretStore, shutdown: Shutdown)
        -> Result<(), Error>;

    /// Make sure the challenge's `TXT` record exists with the expected value.
    async fn present(&self, challenge: &ChallengeRequest) -> Result<(), Error>;

    /// Remove the challenge's `TXT` record.
    async fn clean_up(&self, challenge: &ChallengeRequest) -> Result<(), Error>;
}

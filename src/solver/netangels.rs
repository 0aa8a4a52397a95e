//! A [`Solver`] publishing challenge records at NetAngels.
//!
//! # Present
//!
//! The `TXT` record for the challenge's `resolvedFQDN` is looked up first:
//!
//! * found, holding the challenge key: nothing to do.
//! * found, holding another value: the record is updated to the key.
//! * not found: a record is created with the key and a TTL of [`CHALLENGE_TTL`].
//!
//! A failed lookup is treated as "not found", so provider hiccups during lookup turn into a
//! creation attempt rather than a failed challenge.
//!
//! # Clean Up
//!
//! The record is looked up and deleted by id. Here a failed lookup is an error: nothing is
//! deleted unless a record holding the challenge key was found. Other challenges for the same
//! name (e.g. a wildcard and an apex certificate) keep their records.
use crate::error::Error;
use crate::provider::{Connector, DnsProvider, NetangelsConnector, ProviderError};
use crate::secret_store::DynSecretStore;
use crate::solver::credentials;
use crate::solver::{ChallengeRequest, Shutdown, Solver};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};
use trust_dns_proto::rr::RecordType;

pub const NAME: &str = "netangels-dns-solver";

/// TTL in seconds of created or updated challenge records.
pub const CHALLENGE_TTL: u32 = 300;

/// Solves DNS-01 challenges against one provider account at a time. The provider client is
/// built on first use and reused for the life of the solver.
#[allow(clippy::module_name_repetitions)]
pub struct NetangelsSolver<C: Connector = NetangelsConnector> {
    connector: C,
    secret_store: Option<DynSecretStore>,
    shutdown: Option<Shutdown>,
    client: RwLock<Option<Arc<C::Provider>>>,
}

impl<C: Connector> NetangelsSolver<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            secret_store: None,
            shutdown: None,
            client: RwLock::new(None),
        }
    }

    fn shutting_down(&self) -> bool {
        self.shutdown.as_ref().map_or(false, |rx| *rx.borrow())
    }

    async fn provider(&self, challenge: &ChallengeRequest) -> Result<Arc<C::Provider>, Error> {
        if let Some(client) = self.client.read().await.as_ref() {
            return Ok(client.clone());
        }

        // Resolution happens under the write lock so concurrent first calls share one client.
        let mut cached = self.client.write().await;
        if let Some(client) = cached.as_ref() {
            return Ok(client.clone());
        }
        let creds = credentials::resolve(challenge, self.secret_store.as_deref()).await?;
        let client = Arc::new(self.connector.connect(&creds)?);
        if !creds.is_empty() {
            *cached = Some(client.clone());
        }
        Ok(client)
    }

    async fn load_credentials(
        &self,
        challenge: &ChallengeRequest,
    ) -> Result<Arc<C::Provider>, Error> {
        if self.shutting_down() {
            return Err(Error::ShuttingDown);
        }
        self.provider(challenge).await.map_err(|err| {
            error!("load credentials failed (check secret configuration): {err}");
            err
        })
    }
}

impl Default for NetangelsSolver {
    fn default() -> Self {
        Self::new(NetangelsConnector::default())
    }
}

#[async_trait::async_trait]
impl<C> Solver for NetangelsSolver<C>
where
    C: Connector + Send + Sync,
{
    fn name(&self) -> &str {
        NAME
    }

    fn initialize(&mut self, secret_store: DynSecretStore, shutdown: Shutdown) -> Result<(), Error> {
        info!("initializing netangels dns solver");
        self.secret_store = Some(secret_store);
        self.shutdown = Some(shutdown);
        Ok(())
    }

    async fn present(&self, challenge: &ChallengeRequest) -> Result<(), Error> {
        let fqdn = &challenge.resolved_fqdn;
        let key = &challenge.key;
        info!("presenting challenge for {fqdn}");
        let client = self.load_credentials(challenge).await?;

        let id = match client.get_record(fqdn, key, RecordType::TXT).await {
            Ok(record) if record.id != 0 && record.value == *key => record.id,
            Ok(record) if record.id != 0 => client
                .update_record(record.id, fqdn, key, RecordType::TXT, CHALLENGE_TTL)
                .await
                .map_err(|err| {
                    error!("presenting challenge failed: {err}");
                    err
                })?,
            lookup => {
                if let Err(err) = lookup {
                    debug!("no usable record for {fqdn} ({err}), creating one");
                }
                client
                    .add_record(fqdn, key, RecordType::TXT, CHALLENGE_TTL)
                    .await
                    .map_err(|err| {
                        error!("presenting challenge failed: {err}");
                        err
                    })?
            }
        };
        debug!("challenge for {fqdn} presented with record id {id}");
        Ok(())
    }

    async fn clean_up(&self, challenge: &ChallengeRequest) -> Result<(), Error> {
        let fqdn = &challenge.resolved_fqdn;
        info!("cleaning up challenge for {fqdn}");
        let client = self.load_credentials(challenge).await?;

        let record = client
            .get_record(fqdn, &challenge.key, RecordType::TXT)
            .await
            .map_err(|err| {
                error!("error on fetching record: {err}");
                err
            })?;
        if record.id == 0 || record.value != challenge.key {
            debug!("no record holding the challenge key for {fqdn}, nothing deleted");
            return Err(ProviderError::RecordNotFound {
                fqdn: fqdn.clone(),
                record_type: RecordType::TXT,
            }
            .into());
        }
        debug!("record({}) fetched for cleanup", record.id);

        client.remove_record(record.id).await.map_err(|err| {
            error!("record({}) has not been cleaned up: {err}", record.id);
            err
        })?;
        debug!("record({}) has been cleaned up", record.id);
        Ok(())
    }
}

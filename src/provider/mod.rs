//! Remote DNS provider access.
//!
//! The [`DnsProvider`] trait is the only way the [solver][crate::solver] touches authoritative
//! DNS state. Implementations are thin bindings to a provider's record API: they perform exactly
//! the remote call asked of them, with no caching of record state, no retries and no timeouts.
//! Retrying is left to the host controller, which re-invokes the whole challenge operation.
//!
//! One implementation is provided, [`netangels::NetangelsClient`], together with the
//! [`Connector`] that builds it from resolved [`Credentials`].

use crate::solver::credentials::Credentials;
use trust_dns_proto::rr::RecordType;

#[cfg(test)]
pub(crate) mod fake;
pub mod netangels;

pub use netangels::{NetangelsClient, NetangelsConnector};

/// A DNS record as reported by the provider. The provider owns the record; `id` is only valid
/// for the duration of the operation that looked it up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: u64,
    pub fqdn: String,
    pub value: String,
    pub record_type: RecordType,
    pub ttl: u32,
}

/// Errors returned by [`DnsProvider`] implementations.
#[derive(thiserror::Error, Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum ProviderError {
    /// No `record_type` record exists for `fqdn`.
    #[error("no {record_type} record found for \"{fqdn}\"")]
    RecordNotFound {
        fqdn: String,
        record_type: RecordType,
    },

    /// The account has no zone that `fqdn` belongs to.
    #[error("no DNS zone found for \"{0}\"")]
    ZoneNotFound(String),

    /// The provider rejected the account credentials.
    #[error("provider authentication failed: {0}")]
    Authentication(String),

    /// The HTTP request to the provider failed before a response was received.
    #[error("provider request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-success HTTP status.
    #[error("provider API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },
}

/// An async trait describing the record operations the solver needs from an authoritative DNS
/// provider.
#[async_trait::async_trait]
#[allow(clippy::module_name_repetitions)]
pub trait DnsProvider {
    /// Find the `record_type` record published under `fqdn`, preferring one whose value is
    /// `value`. Returns [`ProviderError::RecordNotFound`] when there is none.
    async fn get_record(
        &self,
        fqdn: &str,
        value: &str,
        record_type: RecordType,
    ) -> Result<Record, ProviderError>;

    /// Create a record, returning its provider id.
    async fn add_record(
        &self,
        fqdn: &str,
        value: &str,
        record_type: RecordType,
        ttl: u32,
    ) -> Result<u64, ProviderError>;

    /// Replace the content of record `id`, returning its provider id.
    async fn update_record(
        &self,
        id: u64,
        fqdn: &str,
        value: &str,
        record_type: RecordType,
        ttl: u32,
    ) -> Result<u64, ProviderError>;

    /// Delete record `id`.
    async fn remove_record(&self, id: u64) -> Result<(), ProviderError>;
}

/// Builds an authenticated [`DnsProvider`] client for a set of account [`Credentials`].
pub trait Connector {
    type Provider: DnsProvider + Send + Sync;

    /// Construct a client. No remote call is made here.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Request`] if the HTTP client can't be constructed.
    fn connect(&self, credentials: &Credentials) -> Result<Self::Provider, ProviderError>;
}

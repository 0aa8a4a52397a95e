//! A recording in-memory [`DnsProvider`] for exercising the solver without a remote API.
use crate::provider::{Connector, DnsProvider, ProviderError, Record};
use crate::solver::credentials::Credentials;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use trust_dns_proto::rr::RecordType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Get,
    Add {
        fqdn: String,
        value: String,
        record_type: RecordType,
        ttl: u32,
    },
    Update {
        id: u64,
        value: String,
    },
    Remove(u64),
}

#[derive(Debug, Default)]
pub(crate) struct Zone {
    pub records: BTreeMap<u64, Record>,
    pub calls: Vec<Call>,
    pub connects: Vec<Credentials>,
    pub next_id: u64,
    pub fail_lookups: bool,
    /// Lookups succeed but report id 0, as some provider APIs do for missing records.
    pub zero_id_lookups: bool,
    pub fail_mutations: bool,
}

impl Zone {
    pub fn mutations(&self) -> Vec<Call> {
        self.calls
            .iter()
            .filter(|c| **c != Call::Get)
            .cloned()
            .collect()
    }
}

/// Shared handle to a fake zone; every connected client sees the same records.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeConnector {
    pub zone: Arc<Mutex<Zone>>,
}

impl FakeConnector {
    pub fn with_record(id: u64, fqdn: &str, value: &str) -> Self {
        let connector = Self::default();
        {
            let mut zone = connector.zone.lock().unwrap();
            zone.records.insert(
                id,
                Record {
                    id,
                    fqdn: fqdn.to_string(),
                    value: value.to_string(),
                    record_type: RecordType::TXT,
                    ttl: 300,
                },
            );
            zone.next_id = id;
        }
        connector
    }

    pub fn zone(&self) -> std::sync::MutexGuard<'_, Zone> {
        self.zone.lock().unwrap()
    }
}

impl Connector for FakeConnector {
    type Provider = FakeProvider;

    fn connect(&self, credentials: &Credentials) -> Result<FakeProvider, ProviderError> {
        self.zone().connects.push(credentials.clone());
        Ok(FakeProvider {
            zone: self.zone.clone(),
        })
    }
}

#[derive(Debug)]
pub(crate) struct FakeProvider {
    zone: Arc<Mutex<Zone>>,
}

fn unavailable() -> ProviderError {
    ProviderError::Api {
        status: 503,
        body: "unavailable".to_string(),
    }
}

#[async_trait::async_trait]
impl DnsProvider for FakeProvider {
    async fn get_record(
        &self,
        fqdn: &str,
        value: &str,
        record_type: RecordType,
    ) -> Result<Record, ProviderError> {
        let mut zone = self.zone.lock().unwrap();
        zone.calls.push(Call::Get);
        if zone.fail_lookups {
            return Err(unavailable());
        }
        if zone.zero_id_lookups {
            return Ok(Record {
                id: 0,
                fqdn: fqdn.to_string(),
                value: value.to_string(),
                record_type,
                ttl: 0,
            });
        }
        let mut matching = zone
            .records
            .values()
            .filter(|r| r.fqdn == fqdn && r.record_type == record_type);
        let first = matching.next().cloned();
        let exact = zone
            .records
            .values()
            .find(|r| r.fqdn == fqdn && r.record_type == record_type && r.value == value)
            .cloned();
        exact.or(first).ok_or(ProviderError::RecordNotFound {
            fqdn: fqdn.to_string(),
            record_type,
        })
    }

    async fn add_record(
        &self,
        fqdn: &str,
        value: &str,
        record_type: RecordType,
        ttl: u32,
    ) -> Result<u64, ProviderError> {
        let mut zone = self.zone.lock().unwrap();
        zone.calls.push(Call::Add {
            fqdn: fqdn.to_string(),
            value: value.to_string(),
            record_type,
            ttl,
        });
        if zone.fail_mutations {
            return Err(unavailable());
        }
        zone.next_id += 1;
        let id = zone.next_id;
        zone.records.insert(
            id,
            Record {
                id,
                fqdn: fqdn.to_string(),
                value: value.to_string(),
                record_type,
                ttl,
            },
        );
        Ok(id)
    }

    async fn update_record(
        &self,
        id: u64,
        _fqdn: &str,
        value: &str,
        _record_type: RecordType,
        ttl: u32,
    ) -> Result<u64, ProviderError> {
        let mut zone = self.zone.lock().unwrap();
        zone.calls.push(Call::Update {
            id,
            value: value.to_string(),
        });
        if zone.fail_mutations {
            return Err(unavailable());
        }
        let record = zone.records.get_mut(&id).ok_or_else(unavailable)?;
        record.value = value.to_string();
        record.ttl = ttl;
        Ok(id)
    }

    async fn remove_record(&self, id: u64) -> Result<(), ProviderError> {
        let mut zone = self.zone.lock().unwrap();
        zone.calls.push(Call::Remove(id));
        if zone.fail_mutations {
            return Err(unavailable());
        }
        zone.records.remove(&id).map(|_| ()).ok_or_else(unavailable)
    }
}

//! NetAngels DNS API client.
//!
//! Authenticates by exchanging the account API key for a bearer token at the gateway token
//! endpoint (once per client), then manages records through the DNS API. Record lookups resolve
//! the owning zone first, by longest suffix match of the record name against the account's
//! zones.
use crate::provider::{Connector, DnsProvider, ProviderError, Record};
use crate::solver::credentials::Credentials;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::OnceCell;
use tracing::{debug, trace};
use trust_dns_proto::rr::RecordType;

pub const DEFAULT_API_URL: &str = "https://api-ms.netangels.ru/api/v1";
pub const DEFAULT_AUTH_URL: &str = "https://panel.netangels.ru/api/gateway/token/";

/// NetAngels API locations, overridable from the [`Config`][crate::config::Config].
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_auth_url() -> String {
    DEFAULT_AUTH_URL.to_string()
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            auth_url: default_auth_url(),
        }
    }
}

/// Builds [`NetangelsClient`]s against a fixed set of [`Endpoints`].
#[derive(Debug, Clone, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct NetangelsConnector {
    endpoints: Endpoints,
}

impl NetangelsConnector {
    #[must_use]
    pub fn new(endpoints: Endpoints) -> Self {
        Self { endpoints }
    }
}

impl Connector for NetangelsConnector {
    type Provider = NetangelsClient;

    fn connect(&self, credentials: &Credentials) -> Result<NetangelsClient, ProviderError> {
        let http = Client::builder().build()?;
        Ok(NetangelsClient {
            http,
            endpoints: self.endpoints.clone(),
            credentials: credentials.clone(),
            token: OnceCell::new(),
        })
    }
}

/// A [`DnsProvider`] backed by one NetAngels account.
#[allow(clippy::module_name_repetitions)]
pub struct NetangelsClient {
    http: Client,
    endpoints: Endpoints,
    credentials: Credentials,
    token: OnceCell<String>,
}

impl fmt::Debug for NetangelsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetangelsClient")
            .field("endpoints", &self.endpoints)
            .field("account_name", &self.credentials.account_name)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Deserialize)]
struct Listing<T> {
    #[serde(default = "Vec::new")]
    entities: Vec<T>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
struct Zone {
    id: u64,
    name: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
struct ApiRecord {
    id: u64,
    name: String,
    #[serde(rename = "type")]
    record_type: String,
    #[serde(default)]
    details: RecordDetails,
    #[serde(default)]
    ttl: Option<u32>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
struct RecordDetails {
    #[serde(default)]
    value: String,
}

#[derive(Serialize, Debug)]
struct RecordRequest<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    record_type: String,
    value: &'a str,
    ttl: u32,
}

/// NetAngels names records without the root label and compares them case-insensitively.
fn normalize(fqdn: &str) -> String {
    fqdn.trim_end_matches('.').to_ascii_lowercase()
}

fn find_zone<'a>(name: &str, zones: &'a [Zone]) -> Option<&'a Zone> {
    zones
        .iter()
        .filter(|zone| {
            let zone_name = normalize(&zone.name);
            name == zone_name || name.ends_with(&format!(".{zone_name}"))
        })
        .max_by_key(|zone| zone.name.trim_end_matches('.').len())
}

fn pick_record<'a>(
    name: &str,
    value: &str,
    record_type: RecordType,
    records: &'a [ApiRecord],
) -> Option<&'a ApiRecord> {
    let record_type = record_type.to_string();
    let mut candidates = records.iter().filter(|r| {
        normalize(&r.name) == name && r.record_type.eq_ignore_ascii_case(&record_type)
    });
    let first = candidates.next()?;
    if first.details.value == value {
        return Some(first);
    }
    Some(
        candidates
            .find(|r| r.details.value == value)
            .unwrap_or(first),
    )
}

async fn check(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Authentication(format!("HTTP {status}: {body}")));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

impl NetangelsClient {
    async fn token(&self) -> Result<&str, ProviderError> {
        let token = self
            .token
            .get_or_try_init(|| async {
                debug!(
                    "requesting API token for account \"{}\"",
                    self.credentials.account_name
                );
                let response = self
                    .http
                    .post(&self.endpoints.auth_url)
                    .form(&[("api_key", self.credentials.api_key.as_str())])
                    .send()
                    .await?;
                let token: TokenResponse = check(response).await?.json().await?;
                Ok::<_, ProviderError>(token.token)
            })
            .await?;
        Ok(token.as_str())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.endpoints.api_url.trim_end_matches('/'))
    }

    async fn zones(&self) -> Result<Vec<Zone>, ProviderError> {
        let response = self
            .http
            .get(self.url("dns/zones/"))
            .bearer_auth(self.token().await?)
            .send()
            .await?;
        let listing: Listing<Zone> = check(response).await?.json().await?;
        Ok(listing.entities)
    }

    async fn zone_records(&self, zone_id: u64) -> Result<Vec<ApiRecord>, ProviderError> {
        let response = self
            .http
            .get(self.url(&format!("dns/zones/{zone_id}/records/")))
            .bearer_auth(self.token().await?)
            .send()
            .await?;
        let listing: Listing<ApiRecord> = check(response).await?.json().await?;
        Ok(listing.entities)
    }
}

#[async_trait::async_trait]
impl DnsProvider for NetangelsClient {
    async fn get_record(
        &self,
        fqdn: &str,
        value: &str,
        record_type: RecordType,
    ) -> Result<Record, ProviderError> {
        let name = normalize(fqdn);
        let zones = self.zones().await?;
        let zone = find_zone(&name, &zones)
            .ok_or_else(|| ProviderError::ZoneNotFound(name.clone()))?;
        trace!("\"{name}\" belongs to zone {} ({})", zone.name, zone.id);

        let records = self.zone_records(zone.id).await?;
        let record = pick_record(&name, value, record_type, &records).ok_or_else(|| {
            ProviderError::RecordNotFound {
                fqdn: name.clone(),
                record_type,
            }
        })?;
        Ok(Record {
            id: record.id,
            fqdn: name,
            value: record.details.value.clone(),
            record_type,
            ttl: record.ttl.unwrap_or_default(),
        })
    }

    async fn add_record(
        &self,
        fqdn: &str,
        value: &str,
        record_type: RecordType,
        ttl: u32,
    ) -> Result<u64, ProviderError> {
        let name = normalize(fqdn);
        let response = self
            .http
            .post(self.url("dns/records/"))
            .bearer_auth(self.token().await?)
            .json(&RecordRequest {
                name: &name,
                record_type: record_type.to_string(),
                value,
                ttl,
            })
            .send()
            .await?;
        let record: ApiRecord = check(response).await?.json().await?;
        Ok(record.id)
    }

    async fn update_record(
        &self,
        id: u64,
        fqdn: &str,
        value: &str,
        record_type: RecordType,
        ttl: u32,
    ) -> Result<u64, ProviderError> {
        let name = normalize(fqdn);
        let response = self
            .http
            .put(self.url(&format!("dns/records/{id}/")))
            .bearer_auth(self.token().await?)
            .json(&RecordRequest {
                name: &name,
                record_type: record_type.to_string(),
                value,
                ttl,
            })
            .send()
            .await?;
        let record: ApiRecord = check(response).await?.json().await?;
        Ok(record.id)
    }

    async fn remove_record(&self, id: u64) -> Result<(), ProviderError> {
        let response = self
            .http
            .delete(self.url(&format!("dns/records/{id}/")))
            .bearer_auth(self.token().await?)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(id: u64, name: &str) -> Zone {
        Zone {
            id,
            name: name.to_string(),
        }
    }

    fn txt(id: u64, name: &str, value: &str) -> ApiRecord {
        ApiRecord {
            id,
            name: name.to_string(),
            record_type: "TXT".to_string(),
            details: RecordDetails {
                value: value.to_string(),
            },
            ttl: Some(300),
        }
    }

    #[test]
    fn normalize_strips_root_label() {
        assert_eq!(
            normalize("_acme-challenge.Example.COM."),
            "_acme-challenge.example.com"
        );
        assert_eq!(normalize("example.com"), "example.com");
    }

    #[test]
    fn find_zone_prefers_longest_suffix() {
        let zones = vec![
            zone(1, "example.com"),
            zone(2, "sub.example.com."),
            zone(3, "ample.com"),
        ];
        assert_eq!(
            find_zone("_acme-challenge.sub.example.com", &zones).map(|z| z.id),
            Some(2)
        );
        assert_eq!(
            find_zone("_acme-challenge.example.com", &zones).map(|z| z.id),
            Some(1)
        );
        assert_eq!(find_zone("example.org", &zones), None);
    }

    #[test]
    fn pick_record_prefers_matching_value() {
        let records = vec![
            txt(1, "_acme-challenge.example.com", "old"),
            txt(2, "_acme-challenge.example.com", "abc123"),
            txt(3, "other.example.com", "abc123"),
        ];
        let name = "_acme-challenge.example.com";
        assert_eq!(
            pick_record(name, "abc123", RecordType::TXT, &records).map(|r| r.id),
            Some(2)
        );
        assert_eq!(
            pick_record(name, "missing", RecordType::TXT, &records).map(|r| r.id),
            Some(1)
        );
    }

    #[test]
    fn pick_record_filters_type() {
        let mut a_record = txt(7, "_acme-challenge.example.com", "abc123");
        a_record.record_type = "A".to_string();
        assert_eq!(
            pick_record(
                "_acme-challenge.example.com",
                "abc123",
                RecordType::TXT,
                &[a_record]
            ),
            None
        );
    }

    #[test]
    fn listing_decodes_record_details() {
        let listing: Listing<ApiRecord> = serde_json::from_str(
            r#"{"count":1,"entities":[{"id":42,"name":"_acme-challenge.example.com","type":"TXT","ttl":300,"details":{"value":"abc123"}}]}"#,
        )
        .unwrap();
        assert_eq!(
            listing.entities,
            vec![txt(42, "_acme-challenge.example.com", "abc123")]
        );
    }

    #[test]
    fn debug_omits_api_key() {
        let client = NetangelsConnector::default()
            .connect(&Credentials {
                account_name: "acct".to_string(),
                api_key: "hunter2".to_string(),
            })
            .unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("acct"));
        assert!(!debug.contains("hunter2"));
    }
}

//! Angel Crab
//!
//! A [cert-manager] style webhook solver for [RFC-8555][RFC-8555] [DNS-01] challenges, publishing
//! challenge `TXT` records through the [NetAngels] DNS API.
//!
//! The host controller calls the [HTTP API][crate::api] to present or clean up a challenge. The
//! [solver][crate::solver] resolves the NetAngels account to act as (inline in the issuer config,
//! or from a [secret][crate::secret_store]) and reconciles the record against the
//! [provider][crate::provider], which is the only source of truth for record state.
//!
//! [cert-manager]: https://cert-manager.io/docs/configuration/acme/dns01/webhook/
//! [NetAngels]: https://www.netangels.ru
//! [RFC-8555]: https://www.rfc-editor.org/rfc/rfc8555
//! [DNS-01]: https://www.rfc-editor.org/rfc/rfc8555#section-8.4
//!
#![warn(clippy::pedantic)]

pub mod api;
pub mod config;
pub mod error;
pub mod provider;
pub mod secret_store;
pub mod solver;

pub use api::new as new_http;
pub use config::{Config, Shared};
pub use secret_store::{FileSecretStore, InMemorySecretStore, KubeSecretStore};
pub use solver::{NetangelsSolver, Solver};

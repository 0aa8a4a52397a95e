//! HTTP API through which the host controller drives solvers.
//!
//! # API Endpoints
//!
//! ## `/healthcheck` (GET)
//!
//!   Returns HTTP 200 (OK) and the JSON body `{"ok":"healthy"}` when the service is operational.
//!
//! ## `/apis/{group}/v1alpha1/{solver}` (POST)
//!
//!   Expects a JSON request body of the form:
//!
//!   ```json
//!   {
//!     "apiVersion": "acme.cert-manager.io/v1alpha1",
//!     "kind": "ChallengePayload",
//!     "request": {
//!       "uid": "6d9b5c1e-7f2a-4c1d-9a51-2b4d8f0e3c77",
//!       "action": "Present",
//!       "type": "dns-01",
//!       "dnsName": "example.com",
//!       "key": "LPsIwTo7o8BoG0-vjCyGQGBWSVIPxI-i_X336eUOQZo",
//!       "resolvedFQDN": "_acme-challenge.example.com.",
//!       "resolvedZone": "example.com.",
//!       "resourceNamespace": "cert-manager",
//!       "config": { "secretName": "netangels-credentials" }
//!     }
//!   }
//!   ```
//!
//!  Where `group` is the API group the webhook was started with and `solver` is the
//!  [name][crate::solver::Solver::name] of a registered solver. `action` is either `Present` or
//!  `CleanUp`.
//!
//!  Returns HTTP 200 (OK) and a JSON response body of the form:
//!
//!  ```json
//!  {
//!    "apiVersion": "acme.cert-manager.io/v1alpha1",
//!    "kind": "ChallengePayload",
//!    "response": { "uid": "6d9b5c1e-7f2a-4c1d-9a51-2b4d8f0e3c77", "success": true }
//!  }
//!  ```
//!
//!  When the solver fails, `success` is `false` and `status.message` describes the error. The
//!  host controller is expected to retry the challenge.
//!
//!  Unknown groups or solver names are answered with HTTP 404 (Not Found).

mod api_error;
mod model;
mod routes;
pub mod server;

pub use server::new;

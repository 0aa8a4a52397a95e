use crate::solver::ChallengeRequest;
use serde::{Deserialize, Serialize};

pub(super) const API_VERSION: &str = "acme.cert-manager.io/v1alpha1";
pub(super) const KIND: &str = "ChallengePayload";

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub(super) struct ChallengePayload {
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    pub request: ChallengeRequest,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(super) struct ChallengeResult {
    pub api_version: &'static str,
    pub kind: &'static str,
    pub response: ChallengeResponse,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct ChallengeResponse {
    pub uid: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct Status {
    pub message: String,
}

impl ChallengeResult {
    pub fn new(uid: String, outcome: Result<(), String>) -> Self {
        let response = match outcome {
            Ok(()) => ChallengeResponse {
                uid,
                success: true,
                status: None,
            },
            Err(message) => ChallengeResponse {
                uid,
                success: false,
                status: Some(Status { message }),
            },
        };
        Self {
            api_version: API_VERSION,
            kind: KIND,
            response,
        }
    }
}

//! Response envelope shared by the HTTP surface and the orchestrator queries.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseType {
    Success,
    Fail,
}

/// `{"type": ..., "message": ..., "data": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(rename = "type")]
    pub kind: ResponseType,
    pub message: Option<String>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            kind: ResponseType::Success,
            message: None,
            data,
        }
    }
}

impl ApiResponse<Option<()>> {
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            kind: ResponseType::Fail,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Runtime model settings the front-end settings page reads.
///
/// The relay has no runtime-tunable settings, so `chat_config` always answers
/// with `data: null`. The type fixes the field names the page expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    pub api_model: Option<String>,
    pub reverse_proxy: Option<String>,
    pub timeout_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let response = ApiResponse::success("gpt-4o");
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"type": "Success", "message": null, "data": "gpt-4o"})
        );
    }

    #[test]
    fn test_model_config_field_names() {
        let config = ModelConfig {
            api_model: Some("gpt-4o".to_string()),
            reverse_proxy: None,
            timeout_ms: Some(60_000),
        };
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({"apiModel": "gpt-4o", "reverseProxy": null, "timeoutMs": 60000})
        );
    }

    #[test]
    fn test_fail_envelope() {
        let response = ApiResponse::fail("Bad Gateway");
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"type": "Fail", "message": "Bad Gateway", "data": null})
        );
    }
}

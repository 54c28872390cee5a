//! JSON-RPC message types
//!
//! One request per line, one response per line.

use serde::{Deserialize, Serialize};

use crate::error::OrchestratorError;

pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;
pub const NOT_FOUND: i32 = -32004;
pub const EMPTY_STACK: i32 = -32005;
pub const CYCLE_DETECTED: i32 = -32009;

/// RPC request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub id: Option<serde_json::Value>,
    pub method: String,
    pub params: Option<serde_json::Value>,
}

impl RpcRequest {
    pub fn new(id: u64, method: &str, params: Option<serde_json::Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: Some(serde_json::json!(id)),
            method: method.to_string(),
            params,
        }
    }
}

/// RPC response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

/// RPC error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RpcResponse {
    /// Success response
    pub fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Error response
    pub fn error(id: Option<serde_json::Value>, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(RpcError {
                code,
                message,
                data: None,
            }),
        }
    }

    pub fn method_not_found(id: Option<serde_json::Value>, method: &str) -> Self {
        Self::error(id, METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }

    pub fn parse_error(message: String) -> Self {
        Self::error(None, PARSE_ERROR, message)
    }

    pub fn internal_error(id: Option<serde_json::Value>, message: String) -> Self {
        Self::error(id, INTERNAL_ERROR, message)
    }

    /// Typed core error, with its kind in `data`
    pub fn from_core_error(id: Option<serde_json::Value>, err: &OrchestratorError) -> Self {
        let code = match err {
            OrchestratorError::Validation(_) => INVALID_PARAMS,
            OrchestratorError::NotFound(_) => NOT_FOUND,
            OrchestratorError::EmptyStack => EMPTY_STACK,
            OrchestratorError::CycleDetected { .. } => CYCLE_DETECTED,
        };
        let mut response = Self::error(id, code, err.to_string());
        if let Some(error) = response.error.as_mut() {
            error.data = Some(serde_json::json!({ "kind": err.kind() }));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::NotificationId;

    #[test]
    fn test_request_deserialize() {
        let json = r#"{"jsonrpc":"2.0","id":1,"method":"list","params":null}"#;
        let req: RpcRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.method, "list");
        assert_eq!(req.id, Some(serde_json::json!(1)));
        assert!(req.params.is_none());
    }

    #[test]
    fn test_success_skips_error() {
        let resp = RpcResponse::success(Some(serde_json::json!(1)), serde_json::json!({"ok": true}));
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"result\""));
        assert!(!json.contains("\"error\""));
    }

    #[test]
    fn test_core_error_mapping() {
        let resp = RpcResponse::from_core_error(
            Some(serde_json::json!(2)),
            &OrchestratorError::NotFound(NotificationId::from_raw(9)),
        );
        let error = resp.error.unwrap();
        assert_eq!(error.code, NOT_FOUND);
        assert_eq!(error.data.unwrap()["kind"], "not_found");

        let resp = RpcResponse::from_core_error(None, &OrchestratorError::EmptyStack);
        assert_eq!(resp.error.unwrap().code, EMPTY_STACK);
    }

    #[test]
    fn test_method_not_found() {
        let resp = RpcResponse::method_not_found(None, "bogus");
        let error = resp.error.unwrap();
        assert_eq!(error.code, METHOD_NOT_FOUND);
        assert_eq!(error.message, "Method not found: bogus");
    }
}

use crate::models::ContentRecord;
use serde::{Deserialize, Serialize};

pub const PROTOCOL_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EdgebaseRequest {
    Ping,
    Health,
    CreateEdge {
        source_id: String,
        target_id: String,
        relationship_type: String,
        strength: f64,
    },
    RelatedNodes {
        node_id: String,
        #[serde(default)]
        relationship_type: Option<String>,
    },
    UpdateGraph {
        text: String,
    },
    AnalyzePair {
        first: ContentRecord,
        second: ContentRecord,
    },
    LinkPair {
        source_id: String,
        target_id: String,
        first: ContentRecord,
        second: ContentRecord,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EdgebaseResponse {
    pub status: String,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub version: String,
}

impl EdgebaseResponse {
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            status: "ok".to_string(),
            data: Some(data),
            error: None,
            version: PROTOCOL_VERSION.to_string(),
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            data: None,
            error: Some(msg.into()),
            version: PROTOCOL_VERSION.to_string(),
        }
    }

    pub fn pong() -> Self {
        Self::ok(serde_json::json!({"pong": true}))
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_tagged_by_action() {
        let request: EdgebaseRequest = serde_json::from_value(serde_json::json!({
            "action": "related_nodes",
            "node_id": "A"
        }))
        .unwrap();

        match request {
            EdgebaseRequest::RelatedNodes { node_id, relationship_type } => {
                assert_eq!(node_id, "A");
                assert!(relationship_type.is_none());
            }
            other => panic!("Unexpected request {other:?}"),
        }
    }

    #[test]
    fn test_analyze_pair_accepts_partial_records() {
        let request: EdgebaseRequest = serde_json::from_value(serde_json::json!({
            "action": "analyze_pair",
            "first": {},
            "second": {"title": "x"}
        }))
        .unwrap();

        assert!(matches!(
            request,
            EdgebaseRequest::AnalyzePair { ref first, .. } if first.is_empty()
        ));
    }

    #[test]
    fn test_error_response_shape() {
        let resp = EdgebaseResponse::err("boom");
        assert!(!resp.is_ok());
        assert_eq!(resp.error.as_deref(), Some("boom"));
        assert_eq!(resp.version, PROTOCOL_VERSION);
    }
}

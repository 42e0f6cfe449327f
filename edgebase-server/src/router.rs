use edgebase_core::ipc::{EdgebaseRequest, EdgebaseResponse};
use edgebase_core::{
    link_candidates, update_knowledge_graph, ContentRecord, EdgeStore, EdgebaseConfig, EdgebaseError,
    SimilarityAnalyzer,
};

/// Everything a request handler needs. Cheap to clone per connection.
#[derive(Debug, Clone)]
pub struct ServerState {
    pub store: EdgeStore,
    pub analyzer: SimilarityAnalyzer,
}

impl ServerState {
    pub fn new(store: EdgeStore, config: &EdgebaseConfig) -> Self {
        Self {
            store,
            analyzer: SimilarityAnalyzer::new(config.analysis.clone()),
        }
    }
}

pub async fn handle_request(request: EdgebaseRequest, state: &ServerState) -> EdgebaseResponse {
    match request {
        EdgebaseRequest::Ping => EdgebaseResponse::pong(),
        EdgebaseRequest::Health => {
            let sqlite_ver = match state.store.health_check().await {
                Ok(v) => v,
                Err(e) => return EdgebaseResponse::err(format!("DB Health Check failed: {}", e)),
            };
            let edges = match state.store.edge_count().await {
                Ok(n) => n,
                Err(e) => return EdgebaseResponse::err(format!("Edge count failed: {}", e)),
            };
            EdgebaseResponse::ok(serde_json::json!({
                "sqlite": sqlite_ver,
                "edges": edges,
                "status": "healthy"
            }))
        }
        EdgebaseRequest::CreateEdge {
            source_id,
            target_id,
            relationship_type,
            strength,
        } => match state
            .store
            .create_edge(&source_id, &target_id, &relationship_type, strength)
            .await
        {
            Ok(()) => EdgebaseResponse::ok(serde_json::json!({
                "created": true,
                "source_id": source_id,
                "target_id": target_id,
                "relationship_type": relationship_type,
            })),
            Err(e) => EdgebaseResponse::err(e.to_string()),
        },
        EdgebaseRequest::RelatedNodes {
            node_id,
            relationship_type,
        } => match state
            .store
            .get_related_nodes(&node_id, relationship_type.as_deref())
            .await
        {
            Ok(nodes) => EdgebaseResponse::ok(serde_json::json!({
                "node_id": node_id,
                "count": nodes.len(),
                "related": nodes,
            })),
            Err(e) => EdgebaseResponse::err(e.to_string()),
        },
        EdgebaseRequest::UpdateGraph { text } => match update_knowledge_graph(&state.store, &text).await {
            Ok(id) => EdgebaseResponse::ok(serde_json::json!({"id": id})),
            Err(e) => EdgebaseResponse::err(e.to_string()),
        },
        EdgebaseRequest::AnalyzePair { first, second } => match state.analyzer.analyze(&first, &second) {
            Ok(categories) => EdgebaseResponse::ok(serde_json::json!({"categories": categories})),
            Err(e) => EdgebaseResponse::err(e.to_string()),
        },
        EdgebaseRequest::LinkPair {
            source_id,
            target_id,
            first,
            second,
        } => match handle_link_pair(state, &source_id, &target_id, &first, &second).await {
            Ok(data) => EdgebaseResponse::ok(data),
            Err(e) => EdgebaseResponse::err(e.to_string()),
        },
    }
}

/// Analyze a pair and persist whatever categories it yields.
async fn handle_link_pair(
    state: &ServerState,
    source_id: &str,
    target_id: &str,
    first: &ContentRecord,
    second: &ContentRecord,
) -> Result<serde_json::Value, EdgebaseError> {
    let categories = state.analyzer.analyze(first, second)?;
    let linked = link_candidates(&state.store, source_id, target_id, &categories).await?;
    Ok(serde_json::json!({
        "categories": categories,
        "linked": linked,
    }))
}

use serde::{Deserialize, Serialize};

/// A stored edge row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Edge {
    pub id: i64,
    pub source_id: String,
    pub target_id: String,
    pub relationship_type: String,
    pub strength: f64,
}

/// An edge to be written. The conceptual key is `(source_id, target_id, relationship_type)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEdge {
    pub source_id: String,
    pub target_id: String,
    pub relationship_type: String,
    pub strength: f64,
}

impl NewEdge {
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        relationship_type: impl Into<String>,
        strength: f64,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            relationship_type: relationship_type.into(),
            strength,
        }
    }
}

/// One neighbor of a queried node, seen from that node's side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RelatedNode {
    pub node_id: String,
    pub relationship_type: String,
    pub strength: f64,
}

impl RelatedNode {
    pub fn new(node_id: impl Into<String>, relationship_type: impl Into<String>, strength: f64) -> Self {
        Self {
            node_id: node_id.into(),
            relationship_type: relationship_type.into(),
            strength,
        }
    }
}

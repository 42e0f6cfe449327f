//! Graph updater — wires free text and analyzer output into the edge store

use crate::concepts::extract_key_concepts;
use crate::edges::EdgeStore;
use crate::error::EdgebaseError;
use crate::models::NewEdge;
use crate::similarity::RelationCandidate;
use md5::{Digest, Md5};

/// Relationship label used between an information node and its key concepts.
pub const RELATED_TO: &str = "RELATED_TO";

/// Strength given to information-to-concept edges.
const CONCEPT_STRENGTH: f64 = 1.0;

/// Content-addressed node id: lowercase hex MD5 of the exact UTF-8 bytes.
///
/// Matches the ids already present in existing edge files, so re-ingesting a
/// text joins its earlier node instead of starting a second one.
pub fn information_id(text: &str) -> String {
    hex::encode(Md5::digest(text.as_bytes()))
}

/// Persist `text` as an information node linked to each of its key concepts.
///
/// All concept edges for one text are committed together. Text without
/// repeated tokens still gets an id but no edges.
pub async fn update_knowledge_graph(store: &EdgeStore, text: &str) -> Result<String, EdgebaseError> {
    let info_id = information_id(text);

    let edges: Vec<NewEdge> = extract_key_concepts(text)
        .into_iter()
        .map(|concept| NewEdge::new(info_id.as_str(), concept, RELATED_TO, CONCEPT_STRENGTH))
        .collect();

    let written = store.create_edges(&edges).await?;

    tracing::info!(info_id = %info_id, edges = written, "Updated knowledge graph with new information");
    Ok(info_id)
}

/// Persist similarity candidates as edges between two nodes.
///
/// Each candidate's category becomes the relationship type and its score the strength.
pub async fn link_candidates(
    store: &EdgeStore,
    source_id: &str,
    target_id: &str,
    candidates: &[RelationCandidate],
) -> Result<usize, EdgebaseError> {
    let edges: Vec<NewEdge> = candidates
        .iter()
        .map(|c| NewEdge::new(source_id, target_id, c.category.as_str(), c.score))
        .collect();

    let written = store.create_edges(&edges).await?;
    if written > 0 {
        tracing::info!(source_id, target_id, links = written, "Linked content pair");
    }
    Ok(written)
}

// ============================================================================
// TESTS
// ============================================================================

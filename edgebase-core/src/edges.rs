//! Edge store — durable, labeled, weighted graph edges over SQLite
//!
//! Edges are keyed by `(source_id, target_id, relationship_type)`:
//! - Writing an existing key replaces its strength and keeps its row id
//! - Neighbor lookups match the node on either end and report the other end
//! - Node ids and relationship labels are opaque strings, never validated

use crate::config::DatabaseConfig;
use crate::db;
use crate::error::EdgebaseError;
use crate::models::{Edge, NewEdge, RelatedNode};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::collections::HashSet;

const UPSERT_EDGE: &str = r#"
    INSERT INTO edges (source_id, target_id, relationship_type, strength)
    VALUES (?, ?, ?, ?)
    ON CONFLICT (source_id, target_id, relationship_type)
    DO UPDATE SET strength = excluded.strength
"#;

/// Handle to the edge database. Open once, clone freely, close on shutdown.
#[derive(Debug, Clone)]
pub struct EdgeStore {
    pool: SqlitePool,
}

impl EdgeStore {
    /// Connect to the configured database and bring its schema up to date.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, EdgebaseError> {
        let pool = db::create_pool(config).await?;
        db::migrate(&pool).await?;
        tracing::debug!(path = %config.path, "Edge store opened");
        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("Edge store closed");
    }

    pub async fn health_check(&self) -> Result<String, EdgebaseError> {
        Ok(db::health_check(&self.pool).await?)
    }

    /// Upsert one edge. A repeated key replaces the stored strength.
    ///
    /// NaN and infinite strengths are rejected before anything is written.
    pub async fn create_edge(
        &self,
        source_id: &str,
        target_id: &str,
        relationship_type: &str,
        strength: f64,
    ) -> Result<(), EdgebaseError> {
        check_strength(strength)?;

        sqlx::query(UPSERT_EDGE)
            .bind(source_id)
            .bind(target_id)
            .bind(relationship_type)
            .bind(strength)
            .execute(&self.pool)
            .await?;

        tracing::info!(source_id, target_id, relationship_type, strength, "Edge created");
        Ok(())
    }

    /// Upsert a batch of edges in a single transaction.
    ///
    /// Either every edge is committed or none is. Returns the number of distinct
    /// keys written; a key repeated within the batch counts once and its last
    /// strength wins.
    pub async fn create_edges(&self, edges: &[NewEdge]) -> Result<usize, EdgebaseError> {
        if edges.is_empty() {
            return Ok(0);
        }
        for edge in edges {
            check_strength(edge.strength)?;
        }

        let mut tx = self.pool.begin().await?;
        for edge in edges {
            upsert_in_tx(&mut tx, edge).await?;
        }
        tx.commit().await?;

        for edge in edges {
            tracing::info!(
                source_id = %edge.source_id,
                target_id = %edge.target_id,
                relationship_type = %edge.relationship_type,
                strength = edge.strength,
                "Edge created"
            );
        }

        let keys: HashSet<(&str, &str, &str)> = edges
            .iter()
            .map(|e| (e.source_id.as_str(), e.target_id.as_str(), e.relationship_type.as_str()))
            .collect();
        Ok(keys.len())
    }

    /// One-hop neighbors of `node_id`, in both directions.
    ///
    /// Each stored edge touching the node yields exactly one row, including a
    /// self-loop. With `relationship_type` set, only edges of that type are returned.
    pub async fn get_related_nodes(
        &self,
        node_id: &str,
        relationship_type: Option<&str>,
    ) -> Result<Vec<RelatedNode>, EdgebaseError> {
        let rows = sqlx::query_as::<_, RelatedNode>(
            r#"
            SELECT
                CASE WHEN source_id = ? THEN target_id ELSE source_id END AS node_id,
                relationship_type,
                strength
            FROM edges
            WHERE (source_id = ? OR target_id = ?)
              AND (? IS NULL OR relationship_type = ?)
            ORDER BY id
            "#,
        )
        .bind(node_id)
        .bind(node_id)
        .bind(node_id)
        .bind(relationship_type)
        .bind(relationship_type)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Fetch the stored row for one conceptual key.
    pub async fn get_edge(
        &self,
        source_id: &str,
        target_id: &str,
        relationship_type: &str,
    ) -> Result<Option<Edge>, EdgebaseError> {
        let edge = sqlx::query_as::<_, Edge>(
            r#"
            SELECT id, source_id, target_id, relationship_type, strength
            FROM edges
            WHERE source_id = ? AND target_id = ? AND relationship_type = ?
            "#,
        )
        .bind(source_id)
        .bind(target_id)
        .bind(relationship_type)
        .fetch_optional(&self.pool)
        .await?;

        Ok(edge)
    }

    pub async fn edge_count(&self) -> Result<i64, EdgebaseError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM edges")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}

fn check_strength(strength: f64) -> Result<(), EdgebaseError> {
    if strength.is_finite() {
        Ok(())
    } else {
        Err(EdgebaseError::InvalidStrength(strength))
    }
}

async fn upsert_in_tx(tx: &mut Transaction<'_, Sqlite>, edge: &NewEdge) -> Result<(), sqlx::Error> {
    sqlx::query(UPSERT_EDGE)
        .bind(&edge.source_id)
        .bind(&edge.target_id)
        .bind(&edge.relationship_type)
        .bind(edge.strength)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> EdgeStore {
        EdgeStore::open(&DatabaseConfig::in_memory())
            .await
            .expect("in-memory store")
    }

    // ========================================================================
    // TEST 1: created edge is visible from both endpoints
    // ========================================================================
    #[tokio::test]
    async fn test_create_edge_visible_from_both_ends() {
        let store = memory_store().await;
        store.create_edge("A", "B", "RELATED_TO", 0.8).await.unwrap();

        let from_a = store.get_related_nodes("A", None).await.unwrap();
        let from_b = store.get_related_nodes("B", None).await.unwrap();

        assert_eq!(from_a, vec![RelatedNode::new("B", "RELATED_TO", 0.8)]);
        assert_eq!(from_b, vec![RelatedNode::new("A", "RELATED_TO", 0.8)]);
    }

    // ========================================================================
    // TEST 2: stored row keeps exact values
    // ========================================================================
    #[tokio::test]
    async fn test_create_edge_stores_row() {
        let store = memory_store().await;
        store.create_edge("A", "B", "RELATED_TO", 0.8).await.unwrap();

        let edge = store.get_edge("A", "B", "RELATED_TO").await.unwrap().unwrap();
        assert_eq!(edge.source_id, "A");
        assert_eq!(edge.target_id, "B");
        assert_eq!(edge.relationship_type, "RELATED_TO");
        assert_eq!(edge.strength, 0.8);
    }

    // ========================================================================
    // TEST 3: repeated key replaces strength instead of appending
    // ========================================================================
    #[tokio::test]
    async fn test_create_edge_upserts_strength() {
        let store = memory_store().await;
        store.create_edge("A", "B", "RELATED_TO", 0.2).await.unwrap();
        let first = store.get_edge("A", "B", "RELATED_TO").await.unwrap().unwrap();

        store.create_edge("A", "B", "RELATED_TO", 0.9).await.unwrap();
        let second = store.get_edge("A", "B", "RELATED_TO").await.unwrap().unwrap();

        assert_eq!(store.edge_count().await.unwrap(), 1);
        assert_eq!(second.strength, 0.9);
        assert_eq!(second.id, first.id);
    }

    // ========================================================================
    // TEST 4: different types between same nodes are distinct edges
    // ========================================================================
    #[tokio::test]
    async fn test_get_related_nodes_all_types() {
        let store = memory_store().await;
        store.create_edge("A", "B", "RELATED_TO", 0.8).await.unwrap();
        store.create_edge("A", "C", "PART_OF", 0.9).await.unwrap();

        let related = store.get_related_nodes("A", None).await.unwrap();

        assert_eq!(related.len(), 2);
        assert!(related.contains(&RelatedNode::new("B", "RELATED_TO", 0.8)));
        assert!(related.contains(&RelatedNode::new("C", "PART_OF", 0.9)));
    }

    // ========================================================================
    // TEST 5: type filter applies in both directions
    // ========================================================================
    #[tokio::test]
    async fn test_get_related_nodes_type_filter_both_directions() {
        let store = memory_store().await;
        store.create_edge("A", "B", "PART_OF", 0.5).await.unwrap();
        store.create_edge("C", "A", "PART_OF", 0.6).await.unwrap();
        store.create_edge("A", "D", "RELATED_TO", 0.7).await.unwrap();

        let part_of = store.get_related_nodes("A", Some("PART_OF")).await.unwrap();
        let all = store.get_related_nodes("A", None).await.unwrap();

        assert_eq!(
            part_of,
            vec![
                RelatedNode::new("B", "PART_OF", 0.5),
                RelatedNode::new("C", "PART_OF", 0.6),
            ]
        );
        assert!(part_of.iter().all(|n| all.contains(n)));
        assert_eq!(all.len(), 3);
    }

    // ========================================================================
    // TEST 6: self-loop is reported once
    // ========================================================================
    #[tokio::test]
    async fn test_self_loop_not_double_counted() {
        let store = memory_store().await;
        store.create_edge("A", "A", "RELATED_TO", 1.0).await.unwrap();

        let related = store.get_related_nodes("A", None).await.unwrap();
        assert_eq!(related, vec![RelatedNode::new("A", "RELATED_TO", 1.0)]);
    }

    // ========================================================================
    // TEST 7: opposite directed edges are two rows
    // ========================================================================
    #[tokio::test]
    async fn test_reverse_edges_are_distinct_rows() {
        let store = memory_store().await;
        store.create_edge("A", "B", "RELATED_TO", 0.5).await.unwrap();
        store.create_edge("B", "A", "RELATED_TO", 0.5).await.unwrap();

        let related = store.get_related_nodes("A", None).await.unwrap();
        assert_eq!(related.len(), 2);
        assert!(related.iter().all(|n| n.node_id == "B"));
    }

    // ========================================================================
    // TEST 8: unknown node has no neighbors
    // ========================================================================
    #[tokio::test]
    async fn test_unknown_node_returns_empty() {
        let store = memory_store().await;
        store.create_edge("A", "B", "RELATED_TO", 0.5).await.unwrap();

        assert!(store.get_related_nodes("Z", None).await.unwrap().is_empty());
        assert!(store.get_related_nodes("A", Some("PART_OF")).await.unwrap().is_empty());
    }

    // ========================================================================
    // TEST 9: batch write is counted and upserts within itself
    // ========================================================================
    #[tokio::test]
    async fn test_create_edges_batch() {
        let store = memory_store().await;
        let batch = vec![
            NewEdge::new("doc", "rust", "RELATED_TO", 1.0),
            NewEdge::new("doc", "sqlite", "RELATED_TO", 1.0),
            NewEdge::new("doc", "rust", "RELATED_TO", 0.4),
        ];

        let written = store.create_edges(&batch).await.unwrap();

        assert_eq!(written, 2);
        assert_eq!(written as i64, store.edge_count().await.unwrap());
        let rust = store.get_edge("doc", "rust", "RELATED_TO").await.unwrap().unwrap();
        assert_eq!(rust.strength, 0.4);
    }

    // ========================================================================
    // TEST 10: empty batch is a no-op
    // ========================================================================
    #[tokio::test]
    async fn test_create_edges_empty_batch() {
        let store = memory_store().await;
        assert_eq!(store.create_edges(&[]).await.unwrap(), 0);
        assert_eq!(store.edge_count().await.unwrap(), 0);
    }

    // ========================================================================
    // TEST 11: writes after close surface as storage errors
    // ========================================================================
    #[tokio::test]
    async fn test_closed_store_reports_storage_error() {
        let store = memory_store().await;
        store.close().await;

        let err = store.create_edge("A", "B", "RELATED_TO", 0.5).await.unwrap_err();
        assert!(err.is_storage());
    }

    // ========================================================================
    // TEST 12: health check reports sqlite version
    // ========================================================================
    #[tokio::test]
    async fn test_health_check_returns_version() {
        let store = memory_store().await;
        let version = store.health_check().await.unwrap();
        assert!(version.starts_with('3'));
    }

    // ========================================================================
    // TEST 13: non-finite strengths are rejected without touching storage
    // ========================================================================
    #[tokio::test]
    async fn test_non_finite_strength_rejected() {
        let store = memory_store().await;

        for strength in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = store.create_edge("A", "B", "RELATED_TO", strength).await.unwrap_err();
            assert!(matches!(err, EdgebaseError::InvalidStrength(_)), "got {err}");
            assert!(!err.is_storage());
        }

        let batch = vec![
            NewEdge::new("A", "C", "RELATED_TO", 0.5),
            NewEdge::new("A", "D", "RELATED_TO", f64::NAN),
        ];
        let err = store.create_edges(&batch).await.unwrap_err();
        assert!(matches!(err, EdgebaseError::InvalidStrength(_)));

        assert_eq!(store.edge_count().await.unwrap(), 0);
        assert!(store.get_related_nodes("A", None).await.unwrap().is_empty());
    }
}

//! Knowledge extraction — pluggable text analysis feeding the edge store
//!
//! The heavy analysis (named entities, relationships, topic, sentiment) lives
//! behind the `TextAnalyzer` trait so it can be backed by an NLP service or a
//! test double. `extract_knowledge` runs the whole pipeline over one text and
//! never fails: any stage error yields an empty report carrying the message.

use crate::concepts::extract_key_concepts;
use crate::edges::EdgeStore;
use crate::error::EdgebaseError;
use crate::models::NewEdge;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Strength given to relationships reported by an analyzer.
const EXTRACTED_STRENGTH: f64 = 1.0;

// ============================================================================
// TextAnalyzer trait
// ============================================================================

/// Abstraction over text-analysis providers.
#[async_trait]
pub trait TextAnalyzer: Send + Sync {
    async fn extract_entities(&self, text: &str) -> Result<Vec<NamedEntity>, AnalyzerError>;

    async fn extract_relationships(&self, text: &str) -> Result<EntityGraph, AnalyzerError>;

    async fn analyze_topic(&self, text: &str) -> Result<TopicAnalysis, AnalyzerError>;

    async fn analyze_sentiment(&self, text: &str) -> Result<SentimentAnalysis, AnalyzerError>;

    /// Analyzer name for logging.
    fn name(&self) -> &str;
}

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("{stage} failed: {message}")]
    Stage { stage: &'static str, message: String },
}

// ============================================================================
// Result types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedEntity {
    pub text: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRelationship {
    pub subject: String,
    pub relationship: String,
    pub object: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityGraph {
    pub entities: Vec<NamedEntity>,
    pub relationships: Vec<EntityRelationship>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicAnalysis {
    pub topic: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    pub sentiment: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeReport {
    pub key_concepts: Vec<String>,
    pub named_entities: Vec<NamedEntity>,
    pub entities_and_relationships: EntityGraph,
    pub query_topic: Option<TopicAnalysis>,
    pub sentiment: Option<SentimentAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl KnowledgeReport {
    fn failed(message: String) -> Self {
        Self {
            error: Some(message),
            ..Default::default()
        }
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Run key-concept extraction and every analyzer stage over `text`.
pub async fn extract_knowledge(analyzer: &dyn TextAnalyzer, text: &str) -> KnowledgeReport {
    let preview: String = text.chars().take(100).collect();
    tracing::info!(analyzer = analyzer.name(), "Extracting knowledge from text: {}...", preview);

    match run_stages(analyzer, text).await {
        Ok(report) => {
            tracing::info!("Knowledge extraction completed successfully");
            tracing::debug!(?report, "Extracted knowledge");
            report
        }
        Err(e) => {
            tracing::error!(analyzer = analyzer.name(), error = %e, "Error in knowledge extraction");
            KnowledgeReport::failed(format!("Failed to extract knowledge: {}", e))
        }
    }
}

async fn run_stages(analyzer: &dyn TextAnalyzer, text: &str) -> Result<KnowledgeReport, AnalyzerError> {
    Ok(KnowledgeReport {
        key_concepts: extract_key_concepts(text),
        named_entities: analyzer.extract_entities(text).await?,
        entities_and_relationships: analyzer.extract_relationships(text).await?,
        query_topic: Some(analyzer.analyze_topic(text).await?),
        sentiment: Some(analyzer.analyze_sentiment(text).await?),
        error: None,
    })
}

/// Store every extracted `(subject, relationship, object)` triple as an edge.
pub async fn record_relationships(store: &EdgeStore, graph: &EntityGraph) -> Result<usize, EdgebaseError> {
    let edges: Vec<NewEdge> = graph
        .relationships
        .iter()
        .map(|r| NewEdge::new(r.subject.as_str(), r.object.as_str(), r.relationship.as_str(), EXTRACTED_STRENGTH))
        .collect();

    store.create_edges(&edges).await
}

// ============================================================================
// TESTS
// ============================================================================

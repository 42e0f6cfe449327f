pub mod concepts;
pub mod config;
pub mod db;
pub mod edges;
pub mod error;
pub mod extraction;
pub mod ipc;
pub mod models;
pub mod similarity;
pub mod updater;

pub use concepts::extract_key_concepts;
pub use config::{AnalysisConfig, DatabaseConfig, EdgebaseConfig, TimestampPolicy};
pub use edges::EdgeStore;
pub use error::EdgebaseError;
pub use extraction::{extract_knowledge, record_relationships, AnalyzerError, KnowledgeReport, TextAnalyzer};
pub use models::{ContentRecord, Edge, NewEdge, RelatedNode};
pub use similarity::{analyze_file_pair, RelationCandidate, RelationCategory, SimilarityAnalyzer};
pub use updater::{information_id, link_candidates, update_knowledge_graph};

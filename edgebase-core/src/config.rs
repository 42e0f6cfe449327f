use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Conventional location of the edge database, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "data/edgebase/knowledge_edges.db";

#[derive(Debug, Deserialize, Clone)]
pub struct EdgebaseConfig {
    pub service: ServiceConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub socket_path: String,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_connections: u32,
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_DB_PATH.to_string(),
            max_connections: 5,
            busy_timeout_ms: 5_000,
        }
    }
}

impl DatabaseConfig {
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// In-memory store, single connection so every caller sees the same database.
    pub fn in_memory() -> Self {
        Self {
            path: ":memory:".to_string(),
            max_connections: 1,
            ..Default::default()
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}

/// What the analyzer does with a timestamp it cannot parse.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimestampPolicy {
    /// Abort the whole pair analysis with a timestamp error.
    #[default]
    Fail,
    /// Drop the temporal category and keep the other comparators' results.
    Skip,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AnalysisConfig {
    pub content_threshold: f64,
    pub tag_threshold: f64,
    pub title_threshold: f64,
    pub on_bad_timestamp: TimestampPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            content_threshold: 0.3,
            tag_threshold: 0.0,
            title_threshold: 0.5,
            on_bad_timestamp: TimestampPolicy::Fail,
        }
    }
}

impl EdgebaseConfig {
    /// Load from a TOML file, then apply `EDGEBASE_<SECTION>__<KEY>` overrides.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("EDGEBASE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;
        s.try_deserialize()
    }
}

//! Similarity analyzer — proposes relationship labels for a pair of content records
//!
//! Four independent comparators, each active only when both records carry its field:
//! - **content**: word-set Jaccard, emitted as `SIMILAR_CONTENT` above the content threshold
//! - **tags**: exact-match tag-set Jaccard, emitted as `SHARED_TAGS` above the tag threshold
//! - **title**: word-set Jaccard, emitted as `RELATED_TOPIC` above the title threshold
//! - **timestamp**: elapsed time bucketed into `TEMPORALLY_CLOSE` / `SAME_DAY` / `SAME_WEEK`
//!
//! Output order is always content, tags, title, timestamp.

use crate::config::{AnalysisConfig, TimestampPolicy};
use crate::error::EdgebaseError;
use crate::models::ContentRecord;
use chrono::format::{parse, Parsed, StrftimeItems};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::Hash;

const HOUR_SECS: i64 = 3_600;
const DAY_SECS: i64 = 86_400;
const WEEK_SECS: i64 = 604_800;

/// Relationship label proposed by the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationCategory {
    SimilarContent,
    SharedTags,
    RelatedTopic,
    TemporallyClose,
    SameDay,
    SameWeek,
}

impl RelationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationCategory::SimilarContent => "SIMILAR_CONTENT",
            RelationCategory::SharedTags => "SHARED_TAGS",
            RelationCategory::RelatedTopic => "RELATED_TOPIC",
            RelationCategory::TemporallyClose => "TEMPORALLY_CLOSE",
            RelationCategory::SameDay => "SAME_DAY",
            RelationCategory::SameWeek => "SAME_WEEK",
        }
    }
}

impl std::fmt::Display for RelationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scored relationship candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelationCandidate {
    pub category: RelationCategory,
    pub score: f64,
}

impl RelationCandidate {
    pub fn new(category: RelationCategory, score: f64) -> Self {
        Self { category, score }
    }
}

/// Pair analyzer with configurable thresholds.
#[derive(Debug, Clone, Default)]
pub struct SimilarityAnalyzer {
    config: AnalysisConfig,
}

impl SimilarityAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Compare two records and return the categories they qualify for.
    ///
    /// An empty record on either side short-circuits to no categories.
    /// A malformed timestamp either fails the call or drops the temporal
    /// category, depending on `on_bad_timestamp`.
    pub fn analyze(
        &self,
        first: &ContentRecord,
        second: &ContentRecord,
    ) -> Result<Vec<RelationCandidate>, EdgebaseError> {
        tracing::debug!(?first, ?second, "Analyzing content pair");

        if first.is_empty() || second.is_empty() {
            tracing::warn!("One or both records are empty");
            return Ok(vec![]);
        }

        let mut categories = Vec::new();

        if let (Some(a), Some(b)) = (&first.content, &second.content) {
            let similarity = compare_content(a, b);
            tracing::debug!(similarity, "Content similarity");
            if similarity > self.config.content_threshold {
                categories.push(RelationCandidate::new(RelationCategory::SimilarContent, similarity));
            }
        }

        if let (Some(a), Some(b)) = (&first.tags, &second.tags) {
            let similarity = compare_tags(a, b);
            tracing::debug!(similarity, "Tag similarity");
            if similarity > self.config.tag_threshold {
                categories.push(RelationCandidate::new(RelationCategory::SharedTags, similarity));
            }
        }

        if let (Some(a), Some(b)) = (&first.title, &second.title) {
            let similarity = compare_titles(a, b);
            tracing::debug!(similarity, "Title similarity");
            if similarity > self.config.title_threshold {
                categories.push(RelationCandidate::new(RelationCategory::RelatedTopic, similarity));
            }
        }

        if let (Some(a), Some(b)) = (&first.timestamp, &second.timestamp) {
            match compare_timestamps(a, b) {
                Ok(relation) => {
                    tracing::debug!(?relation, "Time relation");
                    categories.extend(relation);
                }
                Err(e) if self.config.on_bad_timestamp == TimestampPolicy::Skip => {
                    tracing::warn!(error = %e, "Skipping temporal comparison");
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(count = categories.len(), "Analyzed content pair");
        Ok(categories)
    }
}

/// Analyze a pair with the default thresholds and a failing timestamp policy.
pub fn analyze_file_pair(
    first: &ContentRecord,
    second: &ContentRecord,
) -> Result<Vec<RelationCandidate>, EdgebaseError> {
    SimilarityAnalyzer::default().analyze(first, second)
}

/// `|A ∩ B| / |A ∪ B|`, defined as 0 when both sets are empty.
pub fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

fn word_set(text: &str) -> HashSet<String> {
    text.to_lowercase().split_whitespace().map(str::to_string).collect()
}

/// Jaccard over lower-cased whitespace-separated words.
pub fn compare_content(first: &str, second: &str) -> f64 {
    jaccard(&word_set(first), &word_set(second))
}

/// Jaccard over tag sets, case-sensitive.
pub fn compare_tags(first: &[String], second: &[String]) -> f64 {
    let a: HashSet<&str> = first.iter().map(String::as_str).collect();
    let b: HashSet<&str> = second.iter().map(String::as_str).collect();
    jaccard(&a, &b)
}

/// Same word-set Jaccard as content, applied to titles.
pub fn compare_titles(first: &str, second: &str) -> f64 {
    jaccard(&word_set(first), &word_set(second))
}

/// Bucket the distance between two instants. `None` means more than a week apart.
pub fn compare_timestamps(first: &str, second: &str) -> Result<Option<RelationCandidate>, EdgebaseError> {
    let t1 = parse_timestamp(first)?;
    let t2 = parse_timestamp(second)?;
    Ok(bucket_elapsed((t2 - t1).num_seconds().abs()))
}

fn bucket_elapsed(secs: i64) -> Option<RelationCandidate> {
    let category = if secs < HOUR_SECS {
        RelationCandidate::new(RelationCategory::TemporallyClose, 0.9)
    } else if secs < DAY_SECS {
        RelationCandidate::new(RelationCategory::SameDay, 0.7)
    } else if secs < WEEK_SECS {
        RelationCandidate::new(RelationCategory::SameWeek, 0.5)
    } else {
        return None;
    };
    Some(category)
}

/// Time-of-day layouts, longest first. `true` marks layouts without minutes.
const TIME_FORMATS: [(&str, bool); 3] = [("%H:%M:%S%.f", false), ("%H:%M", false), ("%H", true)];

/// Parse an ISO-8601 instant. Values without an offset are taken as UTC.
///
/// Accepts `T` or a space between date and time, a time of `HH`, `HH:MM` or
/// `HH:MM:SS[.fff]`, and an optional `Z`, `+HH:MM` or `+HHMM` offset. A bare
/// date is midnight UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, EdgebaseError> {
    let trimmed = value.trim();
    let normalized = match trimmed.strip_suffix(['Z', 'z']) {
        Some(stripped) => format!("{stripped}+00:00"),
        None => trimmed.to_string(),
    };

    let rfc3339_err = match DateTime::parse_from_rfc3339(&normalized) {
        Ok(dt) => return Ok(dt.with_timezone(&Utc)),
        Err(e) => e,
    };

    for sep in ['T', ' '] {
        for (time, hour_only) in TIME_FORMATS {
            for offset in ["%:z", "%z", ""] {
                let format = format!("%Y-%m-%d{sep}{time}{offset}");
                if let Some(dt) = parse_with(&normalized, &format, hour_only, !offset.is_empty()) {
                    return Ok(dt);
                }
            }
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(EdgebaseError::Timestamp {
        value: value.to_string(),
        source: rfc3339_err,
    })
}

fn parse_with(value: &str, format: &str, hour_only: bool, with_offset: bool) -> Option<DateTime<Utc>> {
    let mut parsed = Parsed::new();
    parse(&mut parsed, value, StrftimeItems::new(format)).ok()?;
    if hour_only {
        parsed.set_minute(0).ok()?;
    }
    if with_offset {
        parsed.to_datetime().ok().map(|dt| dt.with_timezone(&Utc))
    } else {
        parsed.to_naive_datetime_with_offset(0).ok().map(|naive| naive.and_utc())
    }
}

// ============================================================================
// TESTS
// ============================================================================

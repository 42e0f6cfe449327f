use serde::{Deserialize, Serialize};

/// A content item handed to the similarity analyzer. Every field is optional;
/// a missing field turns off the comparator that needs it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// ISO-8601 instant, e.g. `2024-03-01T10:00:00Z`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ContentRecord {
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.tags.is_none() && self.title.is_none() && self.timestamp.is_none()
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_keys_leave_record_empty() {
        let record: ContentRecord = serde_json::from_value(serde_json::json!({"author": "x"})).unwrap();
        assert!(record.is_empty());
    }

    #[test]
    fn test_single_key_makes_record_non_empty() {
        let record: ContentRecord = serde_json::from_value(serde_json::json!({"title": "x"})).unwrap();
        assert!(!record.is_empty());
        assert_eq!(record.title.as_deref(), Some("x"));
    }
}

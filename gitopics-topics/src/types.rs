//! Topic result types

use serde::{Deserialize, Serialize};
use std::fmt;

/// One labeled topic produced by the topic-extraction model.
///
/// The model internals are opaque; consumers only see the labels, the
/// external identifiers and descriptions the labels resolve to, and a
/// confidence score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicResult {
    /// Human-readable topic labels
    pub labels: Vec<String>,
    /// External identifiers (URIs) for the topic
    pub external_ids: Vec<String>,
    /// Topic descriptions
    pub descriptions: Vec<String>,
    /// Confidence score
    pub score: f64,
}

impl fmt::Display for TopicResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.labels.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_labels() {
        let topic = TopicResult {
            labels: vec!["parsing".to_string(), "compilers".to_string()],
            external_ids: vec!["https://example.org/topic/1".to_string()],
            descriptions: vec!["Parsing things".to_string()],
            score: 0.5,
        };
        assert_eq!(topic.to_string(), "parsing, compilers");
    }
}
